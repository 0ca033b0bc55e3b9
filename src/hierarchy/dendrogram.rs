//! Merge history of an agglomerative run.
//!
//! Cluster ids follow the SciPy/MATLAB convention: leaves are `0..n`, and the
//! `i`-th merge creates cluster `n + i`.

use crate::error::{Error, Result};

/// A dendrogram recording every merge of an agglomerative run.
///
/// Each merge combines two clusters into one, recording:
/// - Which clusters were merged
/// - The Ward cost of the merge
/// - The size of the resulting cluster
#[derive(Debug, Clone, PartialEq)]
pub struct Dendrogram {
    merges: Vec<Merge>,
    n_items: usize,
}

/// A single merge operation in the dendrogram.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Merge {
    /// First cluster being merged (id).
    pub cluster_a: usize,
    /// Second cluster being merged (id).
    pub cluster_b: usize,
    /// Dissimilarity at which the merge occurred.
    pub dissimilarity: f64,
    /// Size of resulting cluster.
    pub size: usize,
}

impl Dendrogram {
    /// Create an empty dendrogram over n leaves.
    pub fn new(n_items: usize) -> Self {
        Self {
            merges: Vec::with_capacity(n_items.saturating_sub(1)),
            n_items,
        }
    }

    /// Record a merge and return the id of the cluster it creates.
    pub fn add_merge(
        &mut self,
        cluster_a: usize,
        cluster_b: usize,
        dissimilarity: f64,
        size: usize,
    ) -> usize {
        let id = self.next_id();
        self.merges.push(Merge {
            cluster_a,
            cluster_b,
            dissimilarity,
            size,
        });
        id
    }

    /// Id the next merge will receive.
    pub fn next_id(&self) -> usize {
        self.n_items + self.merges.len()
    }

    /// Labels after replaying only the first `n - k` merges.
    ///
    /// Labels are positions in the active cluster list, where survivors keep
    /// their relative order and each merged cluster is appended. This is the
    /// same order the Ward engine reports its partition in.
    pub fn cut_to_k(&self, k: usize) -> Result<Vec<usize>> {
        if k == 0 || k > self.n_items {
            return Err(Error::InvalidClusterCount {
                requested: k,
                n_items: self.n_items,
            });
        }
        let n_merges = self.n_items - k;
        if n_merges > self.merges.len() {
            return Err(Error::InvalidParameter {
                name: "k",
                message: "dendrogram has too few merges for this cut",
            });
        }

        // parent[id] = id of the cluster that absorbed it.
        let mut parent: Vec<Option<usize>> = vec![None; self.n_items + n_merges];
        let mut active: Vec<usize> = (0..self.n_items).collect();

        for (i, merge) in self.merges.iter().take(n_merges).enumerate() {
            let new_id = self.n_items + i;
            for child in [merge.cluster_a, merge.cluster_b] {
                if child >= new_id {
                    return Err(Error::InvalidParameter {
                        name: "merge",
                        message: "merge references a cluster that did not exist yet",
                    });
                }
                parent[child] = Some(new_id);
            }
            active.retain(|&id| id != merge.cluster_a && id != merge.cluster_b);
            active.push(new_id);
        }

        let mut labels = Vec::with_capacity(self.n_items);
        for leaf in 0..self.n_items {
            let mut id = leaf;
            while let Some(p) = parent[id] {
                id = p;
            }
            let label = active
                .iter()
                .position(|&a| a == id)
                .ok_or(Error::InvalidParameter {
                    name: "merge",
                    message: "merge history is not a forest",
                })?;
            labels.push(label);
        }
        Ok(labels)
    }

    /// Number of original items.
    pub fn n_items(&self) -> usize {
        self.n_items
    }

    /// Number of merges recorded.
    pub fn n_merges(&self) -> usize {
        self.merges.len()
    }

    /// Iterate over merges.
    pub fn merges(&self) -> impl Iterator<Item = &Merge> {
        self.merges.iter()
    }

    /// Merge costs in merge order.
    pub fn dissimilarities(&self) -> Vec<f64> {
        self.merges.iter().map(|m| m.dissimilarity).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dendrogram_creation() {
        let dendro = Dendrogram::new(5);
        assert_eq!(dendro.n_items(), 5);
        assert_eq!(dendro.n_merges(), 0);
        assert_eq!(dendro.next_id(), 5);
    }

    #[test]
    fn test_dendrogram_merge_ids() {
        let mut dendro = Dendrogram::new(4);
        assert_eq!(dendro.add_merge(0, 1, 0.5, 2), 4);
        assert_eq!(dendro.add_merge(2, 3, 0.5, 2), 5);
        assert_eq!(dendro.add_merge(4, 5, 100.0, 4), 6);
        assert_eq!(dendro.n_merges(), 3);
        assert_eq!(dendro.dissimilarities(), vec![0.5, 0.5, 100.0]);
    }

    #[test]
    fn test_cut_replays_prefix() {
        let mut dendro = Dendrogram::new(4);
        dendro.add_merge(0, 1, 0.5, 2);
        dendro.add_merge(2, 3, 0.5, 2);
        dendro.add_merge(4, 5, 100.0, 4);

        assert_eq!(dendro.cut_to_k(4).unwrap(), vec![0, 1, 2, 3]);
        // {2}, {3}, {0,1}
        assert_eq!(dendro.cut_to_k(3).unwrap(), vec![2, 2, 0, 1]);
        assert_eq!(dendro.cut_to_k(2).unwrap(), vec![0, 0, 1, 1]);
        assert_eq!(dendro.cut_to_k(1).unwrap(), vec![0, 0, 0, 0]);
    }

    #[test]
    fn test_cut_out_of_range() {
        let dendro = Dendrogram::new(3);
        assert!(dendro.cut_to_k(0).is_err());
        assert!(dendro.cut_to_k(4).is_err());
        // Only the identity cut is available without merges.
        assert!(dendro.cut_to_k(2).is_err());
        assert_eq!(dendro.cut_to_k(3).unwrap(), vec![0, 1, 2]);
    }
}
