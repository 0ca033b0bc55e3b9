//! Elbow sweep for choosing the number of clusters.
//!
//! For each count `k` in `1..=max_clusters`, run [`Ward`] from scratch and record
//! the largest merge cost among the final clusters. Plotted on a log10 scale,
//! the count where this curve bends is the usual choice of k.
//!
//! Runs share nothing but the immutable dataset. With the `parallel` feature
//! they are spread over the rayon pool; output order is ascending `k` either way.
//!
//! At `k == n` every cluster is a singleton with dissimilarity 0, which has no
//! logarithm. That point is reported with `log_dissimilarity: None`.

use super::ward::Ward;
use crate::error::{Error, Result};
use crate::sample::Dataset;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Default upper bound of the sweep.
pub const DEFAULT_MAX_CLUSTERS: usize = 15;

/// One sweep result.
#[derive(Debug, Clone, PartialEq)]
pub struct ElbowPoint {
    /// Target cluster count of this run.
    pub clusters_count: usize,
    /// Largest dissimilarity among the run's final clusters.
    pub dissimilarity: f64,
    /// `log10(dissimilarity)`, or `None` when it is not positive.
    pub log_dissimilarity: Option<f64>,
    /// Total within-cluster sum of squares of the run.
    pub total_inertia: f64,
}

impl ElbowPoint {
    /// `log10` of the dissimilarity, failing when it is not positive.
    pub fn log10(&self) -> Result<f64> {
        log10_dissimilarity(self.clusters_count, self.dissimilarity)
    }
}

/// `log10(value)` for a dissimilarity measured at `clusters_count`.
pub fn log10_dissimilarity(clusters_count: usize, value: f64) -> Result<f64> {
    if value > 0.0 {
        Ok(value.log10())
    } else {
        Err(Error::NonPositiveDissimilarity {
            clusters_count,
            value,
        })
    }
}

/// Sweep of independent Ward runs over increasing cluster counts.
#[derive(Debug, Clone)]
pub struct Elbow {
    max_clusters: usize,
    dimensions: Option<Vec<String>>,
}

impl Default for Elbow {
    fn default() -> Self {
        Self::new()
    }
}

impl Elbow {
    /// Sweep `1..=15`.
    pub fn new() -> Self {
        Self {
            max_clusters: DEFAULT_MAX_CLUSTERS,
            dimensions: None,
        }
    }

    /// Set the largest count to try.
    pub fn with_max_clusters(mut self, max_clusters: usize) -> Self {
        self.max_clusters = max_clusters;
        self
    }

    /// Cluster on a subset of the schema. Default: all features.
    pub fn with_dimensions<S: Into<String>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        self.dimensions = Some(names.into_iter().map(Into::into).collect());
        self
    }

    fn ward(&self, k: usize) -> Ward {
        match &self.dimensions {
            Some(names) => Ward::new(k).with_dimensions(names.iter().cloned()),
            None => Ward::new(k),
        }
    }

    fn run(&self, dataset: &Dataset, k: usize) -> Result<ElbowPoint> {
        tracing::info!(clusters_count = k, "starting sweep run");
        let fit = self.ward(k).fit(dataset)?;
        let dissimilarity = fit.max_dissimilarity();
        let log_dissimilarity = match log10_dissimilarity(k, dissimilarity) {
            Ok(v) => Some(v),
            Err(err) => {
                tracing::warn!(clusters_count = k, %err, "skipping log scale for this count");
                None
            }
        };
        Ok(ElbowPoint {
            clusters_count: k,
            dissimilarity,
            log_dissimilarity,
            total_inertia: fit.total_inertia,
        })
    }

    /// Run the sweep, one point per count in ascending order.
    ///
    /// `max_clusters` above the sample count is capped to it.
    pub fn sweep(&self, dataset: &Dataset) -> Result<Vec<ElbowPoint>> {
        if dataset.is_empty() {
            return Err(Error::EmptyInput);
        }
        if self.max_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }
        let upper = if self.max_clusters > dataset.len() {
            tracing::warn!(
                max_clusters = self.max_clusters,
                samples = dataset.len(),
                "capping sweep at the sample count"
            );
            dataset.len()
        } else {
            self.max_clusters
        };

        #[cfg(feature = "parallel")]
        let points = (1..=upper)
            .into_par_iter()
            .map(|k| self.run(dataset, k))
            .collect::<Result<Vec<_>>>();

        #[cfg(not(feature = "parallel"))]
        let points = (1..=upper)
            .map(|k| self.run(dataset, k))
            .collect::<Result<Vec<_>>>();

        points
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sample::{FeatureSchema, Sample};

    fn line(xs: &[f64]) -> Dataset {
        let schema = FeatureSchema::new("name", vec!["x".into()]);
        let samples = xs
            .iter()
            .enumerate()
            .map(|(i, &x)| Sample::new(format!("s{i}"), vec![x]))
            .collect();
        Dataset::new(schema, samples).unwrap()
    }

    #[test]
    fn test_sweep_counts_ascend() {
        let ds = line(&[0.0, 1.0, 5.0, 6.0, 20.0, 22.0]);
        let points = Elbow::new().with_max_clusters(4).sweep(&ds).unwrap();
        let counts: Vec<usize> = points.iter().map(|p| p.clusters_count).collect();
        assert_eq!(counts, vec![1, 2, 3, 4]);
    }

    #[test]
    fn test_signal_matches_independent_run() {
        let ds = line(&[0.0, 1.0, 5.0, 6.0, 20.0, 22.0]);
        let points = Elbow::new().with_max_clusters(5).sweep(&ds).unwrap();
        for p in &points {
            let fit = Ward::new(p.clusters_count).fit(&ds).unwrap();
            assert_eq!(p.dissimilarity, fit.max_dissimilarity());
            assert_eq!(p.log_dissimilarity, Some(fit.max_dissimilarity().log10()));
        }
        // Fewer clusters keep bigger merges.
        assert!(points[0].dissimilarity > points[1].dissimilarity);
    }

    #[test]
    fn test_all_singletons_have_no_log() {
        let ds = line(&[0.0, 3.0, 7.0]);
        let points = Elbow::new().sweep(&ds).unwrap();

        // Capped at the sample count.
        assert_eq!(points.len(), 3);
        let last = points.last().unwrap();
        assert_eq!(last.dissimilarity, 0.0);
        assert_eq!(last.log_dissimilarity, None);
        assert!(matches!(
            last.log10(),
            Err(Error::NonPositiveDissimilarity {
                clusters_count: 3,
                ..
            })
        ));
    }

    #[test]
    fn test_dimension_subset_changes_signal() {
        // x separates {a,b} from {c,d} tightly; y pulls a toward c instead.
        let schema = FeatureSchema::new("name", vec!["x".into(), "y".into()]);
        let samples = vec![
            Sample::new("a", vec![0.0, 0.0]),
            Sample::new("b", vec![1.0, 50.0]),
            Sample::new("c", vec![30.0, 1.0]),
            Sample::new("d", vec![31.0, 51.0]),
        ];
        let ds = Dataset::new(schema, samples).unwrap();

        let by_x = Elbow::new().with_dimensions(["x"]).sweep(&ds).unwrap();
        let full = Elbow::new().sweep(&ds).unwrap();
        assert_eq!(by_x.len(), 4);

        for p in &by_x {
            let fit = Ward::new(p.clusters_count)
                .with_dimensions(["x"])
                .fit(&ds)
                .unwrap();
            assert_eq!(p.dissimilarity, fit.max_dissimilarity());
        }
        // Two unit-spaced pairs on x alone; on both axes a-c and b-d merge at 450.5.
        assert_eq!(by_x[1].dissimilarity, 0.5);
        assert_eq!(full[1].dissimilarity, 450.5);
    }

    #[test]
    fn test_unknown_sweep_dimension() {
        let ds = line(&[0.0, 1.0, 2.0]);
        assert!(matches!(
            Elbow::new().with_dimensions(["nope"]).sweep(&ds),
            Err(Error::UnknownDimension(_))
        ));
    }

    #[test]
    fn test_zero_max_clusters() {
        let ds = line(&[0.0, 1.0]);
        assert!(Elbow::new().with_max_clusters(0).sweep(&ds).is_err());
    }

    #[test]
    fn test_log10_positive() {
        assert_eq!(log10_dissimilarity(2, 100.0).unwrap(), 2.0);
        assert!(log10_dissimilarity(2, -1.0).is_err());
    }
}
