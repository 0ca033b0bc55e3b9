//! Agglomerative clustering under Ward's minimum-variance criterion.
//!
//! Start with one singleton cluster per sample, then repeatedly merge the pair
//! whose union increases total within-cluster sum of squares the least:
//!
//! ```text
//! Δ(A,B) = inertia(A∪B, μ_{A∪B}) - inertia(A, μ_A) - inertia(B, μ_B)
//! ```
//!
//! The cost is computed directly from centroids and inertias rather than with
//! the closed form `nₐnᵦ/(nₐ+nᵦ)·||μₐ-μᵦ||²`, so reported dissimilarities are the
//! literal variance increase of each merge.
//!
//! # Ordering
//!
//! Candidate pairs are enumerated as `(i, j)` with `i < j` over the current
//! cluster list. Survivors keep their relative order and each merged cluster is
//! appended, and the first pair with the minimum cost wins. Runs are therefore
//! fully deterministic, ties included.
//!
//! # Cost cache
//!
//! A merge only invalidates pairs that touch one of its parents. Pair costs are
//! cached by stable cluster id, and because relative order never changes a
//! cached pair is always evaluated with the same argument order, so cached and
//! recomputed costs are bit-identical.
//!
//! # Complexity
//!
//! O(k²) pairs per iteration on the first pass, O(k) fresh pairs afterwards,
//! each O(n·d). Memory is O(n²) for the pair cache. Suitable for small to
//! moderate n; down-sample exploratory runs (see [`crate::table::Sampling`]).

use super::geometry::{centroid, cluster_inertia};
use super::traits::Clustering;
use crate::error::{Error, Result};
use crate::hierarchy::{Dendrogram, Merge};
use crate::sample::{Dataset, Sample};
use std::collections::HashMap;

/// A non-empty group of samples plus the cost of the merge that produced it.
#[derive(Debug, Clone, PartialEq)]
pub struct Cluster {
    id: usize,
    members: Vec<usize>,
    dissimilarity: f64,
}

impl Cluster {
    fn singleton(idx: usize) -> Self {
        Self {
            id: idx,
            members: vec![idx],
            dissimilarity: 0.0,
        }
    }

    /// Stable id (dendrogram convention: leaves `0..n`, merges `n + i`).
    pub fn id(&self) -> usize {
        self.id
    }

    /// Dataset positions of the members.
    pub fn members(&self) -> &[usize] {
        &self.members
    }

    /// Ward cost of the merge that created this cluster (0 for singletons).
    pub fn dissimilarity(&self) -> f64 {
        self.dissimilarity
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Always false; clusters are never empty.
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    /// Member samples, resolved against the dataset they came from.
    pub fn samples<'a>(&'a self, dataset: &'a Dataset) -> impl Iterator<Item = &'a Sample> + 'a {
        self.members.iter().map(move |&i| dataset.sample(i))
    }
}

/// A candidate pairing of two current clusters with its Ward cost.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProvisionalMerge {
    /// Position of the first cluster in the current partition.
    pub left: usize,
    /// Position of the second cluster (`left < right`).
    pub right: usize,
    /// Increase in within-cluster sum of squares.
    pub cost: f64,
}

/// Merge loop state over one dataset.
///
/// [`Ward`] drives this to a target count; step it by hand to observe the
/// partition after each iteration.
#[derive(Debug)]
pub struct WardState<'a> {
    dataset: &'a Dataset,
    dims: Vec<usize>,
    clusters: Vec<Cluster>,
    dendrogram: Dendrogram,
    // cluster id -> inertia about its own centroid
    inertia: HashMap<usize, f64>,
    // (id, id) in partition order -> merge cost
    pair_costs: HashMap<(usize, usize), f64>,
}

impl<'a> WardState<'a> {
    /// Singleton partition over every sample, measured on `dims`.
    pub fn new(dataset: &'a Dataset, dims: Vec<usize>) -> Result<Self> {
        if dataset.is_empty() {
            return Err(Error::EmptyInput);
        }
        if dims.is_empty() {
            return Err(Error::InvalidParameter {
                name: "dimensions",
                message: "at least one dimension is required",
            });
        }
        if let Some(&d) = dims.iter().find(|&&d| d >= dataset.schema().len()) {
            return Err(Error::DimensionMismatch {
                expected: dataset.schema().len(),
                found: d + 1,
            });
        }

        let n = dataset.len();
        Ok(Self {
            dataset,
            dims,
            clusters: (0..n).map(Cluster::singleton).collect(),
            dendrogram: Dendrogram::new(n),
            inertia: (0..n).map(|i| (i, 0.0)).collect(),
            pair_costs: HashMap::new(),
        })
    }

    /// Current partition, in engine order.
    pub fn clusters(&self) -> &[Cluster] {
        &self.clusters
    }

    /// Merges performed so far.
    pub fn dendrogram(&self) -> &Dendrogram {
        &self.dendrogram
    }

    /// Sum of within-cluster inertia over the current partition.
    pub fn total_inertia(&self) -> f64 {
        self.clusters
            .iter()
            .map(|c| self.inertia.get(&c.id).copied().unwrap_or(0.0))
            .sum()
    }

    /// Score every current pair, in enumeration order.
    pub fn candidates(&mut self) -> Result<Vec<ProvisionalMerge>> {
        let k = self.clusters.len();
        let mut out = Vec::with_capacity(k * k.saturating_sub(1) / 2);
        for i in 0..k {
            for j in (i + 1)..k {
                let (a, b) = (&self.clusters[i], &self.clusters[j]);
                let cost = match self.pair_costs.get(&(a.id, b.id)) {
                    Some(&cost) => cost,
                    None => {
                        let cost = merge_cost(self.dataset, &self.dims, &self.inertia, a, b)?;
                        self.pair_costs.insert((a.id, b.id), cost);
                        cost
                    }
                };
                out.push(ProvisionalMerge {
                    left: i,
                    right: j,
                    cost,
                });
            }
        }
        Ok(out)
    }

    /// Perform the cheapest merge. Returns `None` once one cluster remains.
    pub fn step(&mut self) -> Result<Option<Merge>> {
        if self.clusters.len() < 2 {
            return Ok(None);
        }

        let candidates = self.candidates()?;
        let mut best = candidates[0];
        for c in &candidates[1..] {
            if c.cost < best.cost {
                best = *c;
            }
        }

        let (a, b) = (&self.clusters[best.left], &self.clusters[best.right]);
        let (id_a, id_b) = (a.id, b.id);
        let mut members = Vec::with_capacity(a.len() + b.len());
        members.extend_from_slice(&a.members);
        members.extend_from_slice(&b.members);

        let union_inertia = inertia_of(self.dataset, &self.dims, &members)?;
        let id = self
            .dendrogram
            .add_merge(id_a, id_b, best.cost, members.len());
        let merged = Cluster {
            id,
            members,
            dissimilarity: best.cost,
        };

        // Only the two parents can share samples with the union.
        self.clusters.retain(|c| c.id != id_a && c.id != id_b);
        self.clusters.push(merged);

        self.inertia.remove(&id_a);
        self.inertia.remove(&id_b);
        self.inertia.insert(id, union_inertia);
        self.pair_costs
            .retain(|&(x, y), _| x != id_a && x != id_b && y != id_a && y != id_b);

        tracing::debug!(
            clusters = self.clusters.len(),
            merged_a = id_a,
            merged_b = id_b,
            cost = best.cost,
            "merged cluster pair"
        );

        Ok(self.dendrogram.merges().last().copied())
    }

    /// Consume the state, keeping the partition and merge history.
    pub fn into_fit(self) -> WardFit {
        let total_inertia = self.total_inertia();
        WardFit {
            clusters: self.clusters,
            dendrogram: self.dendrogram,
            total_inertia,
        }
    }
}

fn inertia_of(dataset: &Dataset, dims: &[usize], members: &[usize]) -> Result<f64> {
    let refs: Vec<&Sample> = members.iter().map(|&i| dataset.sample(i)).collect();
    let center = centroid(&refs, dims, "center")?;
    Ok(cluster_inertia(&refs, &center, dims))
}

fn merge_cost(
    dataset: &Dataset,
    dims: &[usize],
    inertia: &HashMap<usize, f64>,
    a: &Cluster,
    b: &Cluster,
) -> Result<f64> {
    let mut united = Vec::with_capacity(a.len() + b.len());
    united.extend_from_slice(&a.members);
    united.extend_from_slice(&b.members);
    let united_inertia = inertia_of(dataset, dims, &united)?;

    let own = |c: &Cluster| match inertia.get(&c.id) {
        Some(&v) => Ok(v),
        None => inertia_of(dataset, dims, &c.members),
    };
    Ok(united_inertia - own(a)? - own(b)?)
}

/// Result of a full run: final partition plus merge history.
#[derive(Debug, Clone)]
pub struct WardFit {
    /// Final clusters, in engine order.
    pub clusters: Vec<Cluster>,
    /// Every merge, in the order performed.
    pub dendrogram: Dendrogram,
    /// Sum of within-cluster inertia over the final partition.
    pub total_inertia: f64,
}

impl WardFit {
    /// Largest merge cost among the final clusters.
    pub fn max_dissimilarity(&self) -> f64 {
        self.clusters
            .iter()
            .map(Cluster::dissimilarity)
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// One label per sample: the position of its cluster in [`Self::clusters`].
    pub fn labels(&self) -> Vec<usize> {
        let mut labels = vec![0; self.dendrogram.n_items()];
        for (pos, cluster) in self.clusters.iter().enumerate() {
            for &m in &cluster.members {
                labels[m] = pos;
            }
        }
        labels
    }
}

/// Ward's agglomerative clustering down to a target cluster count.
#[derive(Debug, Clone)]
pub struct Ward {
    n_clusters: usize,
    dimensions: Option<Vec<String>>,
}

impl Ward {
    /// Create a clusterer that stops at `n_clusters`.
    pub fn new(n_clusters: usize) -> Self {
        Self {
            n_clusters,
            dimensions: None,
        }
    }

    /// Cluster on a subset of the schema, in the given order. Default: all features.
    pub fn with_dimensions<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.dimensions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    /// Resolve the configured dimensions against a dataset's schema.
    pub fn dims_for(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        match &self.dimensions {
            Some(names) => dataset.schema().resolve(names),
            None => Ok(dataset.schema().all()),
        }
    }

    /// Run the merge loop and keep the merge history.
    pub fn fit(&self, dataset: &Dataset) -> Result<WardFit> {
        let n = dataset.len();
        if n == 0 {
            return Err(Error::EmptyInput);
        }
        if self.n_clusters == 0 || self.n_clusters > n {
            return Err(Error::InvalidClusterCount {
                requested: self.n_clusters,
                n_items: n,
            });
        }

        let mut state = WardState::new(dataset, self.dims_for(dataset)?)?;
        tracing::info!(
            samples = n,
            target = self.n_clusters,
            "starting ward clustering"
        );
        while state.clusters().len() > self.n_clusters {
            tracing::debug!(
                clusters = state.clusters().len(),
                "current number of clusters"
            );
            state.step()?;
        }
        Ok(state.into_fit())
    }

    /// Run the merge loop and return only the final partition.
    pub fn cluster(&self, dataset: &Dataset) -> Result<Vec<Cluster>> {
        Ok(self.fit(dataset)?.clusters)
    }
}

impl Clustering for Ward {
    fn fit_predict(&self, dataset: &Dataset) -> Result<Vec<usize>> {
        Ok(self.fit(dataset)?.labels())
    }

    fn n_clusters(&self) -> usize {
        self.n_clusters
    }
}
