use thiserror::Error;

/// Result alias for `wardclust`.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors returned by clustering, sweep, and table primitives.
#[derive(Debug, Error)]
pub enum Error {
    /// Input was empty.
    #[error("empty input provided")]
    EmptyInput,

    /// Invalid number of clusters requested.
    #[error("cannot create {requested} clusters from {n_items} samples")]
    InvalidClusterCount {
        /// Requested count.
        requested: usize,
        /// Number of samples.
        n_items: usize,
    },

    /// Averaged or took the centroid of zero samples.
    #[error("centroid of an empty cluster")]
    EmptyCluster,

    /// A dimension name is not part of the feature schema.
    #[error("unknown dimension '{0}'")]
    UnknownDimension(String),

    /// Sample vector length does not match the schema.
    #[error("dimension mismatch: expected {expected}, found {found}")]
    DimensionMismatch {
        /// Expected dimension.
        expected: usize,
        /// Found dimension.
        found: usize,
    },

    /// Log-scaling a dissimilarity that is zero or negative.
    #[error("dissimilarity {value} at {clusters_count} clusters has no logarithm")]
    NonPositiveDissimilarity {
        /// Cluster count of the offending run.
        clusters_count: usize,
        /// Raw dissimilarity.
        value: f64,
    },

    /// Input table row that cannot become a sample.
    #[error("malformed row at line {line}: {message}")]
    MalformedRow {
        /// 1-based line number in the input table (header is line 1).
        line: u64,
        /// What was wrong with it.
        message: String,
    },

    /// Invalid parameter value.
    #[error("invalid parameter '{name}': {message}")]
    InvalidParameter {
        /// Parameter name.
        name: &'static str,
        /// Error message.
        message: &'static str,
    },

    /// IO error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV framing error.
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),

    /// Run configuration could not be parsed.
    #[error("config error: {0}")]
    Config(#[from] toml::de::Error),
}
