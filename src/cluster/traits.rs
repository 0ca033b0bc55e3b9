//! Clustering traits.

use crate::error::Result;
use crate::sample::Dataset;

/// Trait for hard clustering algorithms.
pub trait Clustering {
    /// Fit the model to a dataset and return cluster assignments.
    ///
    /// Returns a vector of cluster labels, one per sample in dataset order.
    fn fit_predict(&self, dataset: &Dataset) -> Result<Vec<usize>>;

    /// Get the number of clusters.
    fn n_clusters(&self) -> usize;
}
