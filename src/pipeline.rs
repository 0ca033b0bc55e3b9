//! End-to-end runs over a feature table on disk.
//!
//! The usual workflow is two passes: [`examine_dissimilarity`] on a
//! systematically down-sampled copy to pick k from the elbow curve, then
//! [`run`] on every row with `target_clusters = k`.

use crate::cluster::{Elbow, ElbowPoint, Ward};
use crate::config::RunConfig;
use crate::error::Result;
use crate::table::{save_clusters, Sampling, TableReader};
use std::path::{Path, PathBuf};

/// Elbow sweep over an examination-mode load of `input`.
pub fn examine_dissimilarity(
    input: impl AsRef<Path>,
    config: &RunConfig,
) -> Result<Vec<ElbowPoint>> {
    config.validate()?;
    let dataset = TableReader::new()
        .with_sampling(Sampling::Systematic {
            step: config.examination_step,
        })
        .load_path(input)?;

    let mut elbow = Elbow::new().with_max_clusters(config.max_clusters);
    if let Some(dims) = &config.dimensions {
        elbow = elbow.with_dimensions(dims.iter().cloned());
    }
    elbow.sweep(&dataset)
}

/// Cluster every row of `input` and save the membership table. Returns its path.
pub fn run(input: impl AsRef<Path>, config: &RunConfig) -> Result<PathBuf> {
    config.validate()?;
    let dataset = TableReader::new().load_path(input)?;

    let mut ward = Ward::new(config.target_clusters);
    if let Some(dims) = &config.dimensions {
        ward = ward.with_dimensions(dims.iter().cloned());
    }
    let clusters = ward.cluster(&dataset)?;
    save_clusters(&config.output_dir, &config.file_prefix, &dataset, &clusters)
}
