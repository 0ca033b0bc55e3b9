//! # wardclust
//!
//! Agglomerative clustering of named, multi-dimensional samples under Ward's
//! minimum-variance criterion, plus an elbow sweep for choosing how many
//! clusters to keep.
//!
//! Feature tables come in as CSV (identifier column, then integer feature
//! counts) and cluster membership goes back out as CSV. Enable the `parallel`
//! feature to run elbow sweep counts concurrently.

pub mod cluster;
pub mod config;
/// Error types used across `wardclust`.
pub mod error;
pub mod hierarchy;
pub mod pipeline;
pub mod sample;
pub mod table;


pub use cluster::{Cluster, Clustering, Elbow, ElbowPoint, Ward, WardFit, WardState};
pub use config::RunConfig;
pub use error::{Error, Result};
pub use hierarchy::{Dendrogram, Merge};
pub use sample::{Dataset, FeatureSchema, Sample};
pub use table::{Sampling, TableReader};
