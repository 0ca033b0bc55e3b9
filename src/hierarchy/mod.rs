//! Hierarchy records produced by agglomerative runs.

mod dendrogram;

pub use dendrogram::{Dendrogram, Merge};
