//! Tabular input and output.
//!
//! Input: a header row (`<id label>,<dim 1>,...,<dim N>`) followed by one row
//! per sample with integer feature counts. Output: one row per
//! `(cluster, sample)` pair under `cluster_number,sample_name,<dims>...`.

mod reader;
mod writer;

pub use reader::{Sampling, TableReader};
pub use writer::{output_path, save_clusters, write_clusters};
