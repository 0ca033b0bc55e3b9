//! Run configuration.
//!
//! ```toml
//! target_clusters = 6
//! max_clusters = 15
//! examination_step = 5
//! output_dir = "csv"
//! file_prefix = "ward_method_result"
//! dimensions = ["love", "night"]   # optional; default is every feature
//! ```

use crate::cluster::elbow::DEFAULT_MAX_CLUSTERS;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Settings for [`crate::pipeline`] runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Cluster count of the full run.
    pub target_clusters: usize,
    /// Upper bound of the elbow sweep.
    pub max_clusters: usize,
    /// Keep every n-th row during examination.
    pub examination_step: usize,
    /// Directory the result table is written to.
    pub output_dir: PathBuf,
    /// Result file name prefix.
    pub file_prefix: String,
    /// Dimension subset, by name.
    pub dimensions: Option<Vec<String>>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            target_clusters: 4,
            max_clusters: DEFAULT_MAX_CLUSTERS,
            examination_step: 5,
            output_dir: PathBuf::from("csv"),
            file_prefix: "ward_method_result".to_string(),
            dimensions: None,
        }
    }
}

impl RunConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse, and validate a TOML file.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_toml_str(&std::fs::read_to_string(path)?)
    }

    /// Reject settings no run could use.
    pub fn validate(&self) -> Result<()> {
        if self.target_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "target_clusters",
                message: "must be at least 1",
            });
        }
        if self.max_clusters == 0 {
            return Err(Error::InvalidParameter {
                name: "max_clusters",
                message: "must be at least 1",
            });
        }
        if self.examination_step == 0 {
            return Err(Error::InvalidParameter {
                name: "examination_step",
                message: "must be at least 1",
            });
        }
        if matches!(&self.dimensions, Some(d) if d.is_empty()) {
            return Err(Error::InvalidParameter {
                name: "dimensions",
                message: "omit the key to use every feature",
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_fill_missing_keys() {
        let config = RunConfig::from_toml_str("target_clusters = 6\n").unwrap();
        assert_eq!(config.target_clusters, 6);
        assert_eq!(config.max_clusters, 15);
        assert_eq!(config.examination_step, 5);
        assert_eq!(config.output_dir, PathBuf::from("csv"));
        assert_eq!(config.dimensions, None);
    }

    #[test]
    fn test_dimensions_list() {
        let config = RunConfig::from_toml_str("dimensions = [\"love\", \"rain\"]\n").unwrap();
        assert_eq!(
            config.dimensions,
            Some(vec!["love".to_string(), "rain".to_string()])
        );
    }

    #[test]
    fn test_rejects_zero_step() {
        assert!(matches!(
            RunConfig::from_toml_str("examination_step = 0\n"),
            Err(Error::InvalidParameter {
                name: "examination_step",
                ..
            })
        ));
    }

    #[test]
    fn test_rejects_bad_toml() {
        assert!(matches!(
            RunConfig::from_toml_str("target_clusters = \"four\"\n"),
            Err(Error::Config(_))
        ));
    }
}
