//! Samples and the feature schema they are measured on.
//!
//! A [`Dataset`] pairs one [`FeatureSchema`] (the ordered dimension names taken
//! from a table header) with the [`Sample`]s loaded under it. Samples are never
//! mutated after load. Engines refer to them by position in the dataset, so two
//! samples with equal coordinates stay distinct.

use crate::error::{Error, Result};
use ndarray::Array1;
use std::collections::HashMap;

/// Ordered, named feature dimensions with a name→column lookup built once.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSchema {
    id_label: String,
    names: Vec<String>,
    index: HashMap<String, usize>,
}

impl FeatureSchema {
    /// Build a schema from the identifier column label and feature names.
    ///
    /// Duplicate names resolve to the first column carrying them.
    pub fn new(id_label: impl Into<String>, names: Vec<String>) -> Self {
        let mut index = HashMap::with_capacity(names.len());
        for (i, name) in names.iter().enumerate() {
            index.entry(name.clone()).or_insert(i);
        }
        Self {
            id_label: id_label.into(),
            names,
            index,
        }
    }

    /// Label of the identifier column (header cell 0).
    pub fn id_label(&self) -> &str {
        &self.id_label
    }

    /// Feature names in column order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of feature dimensions.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// True when the schema has no feature dimensions.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Column index of a dimension name.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    /// Resolve an ordered set of names into column indices.
    pub fn resolve<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<usize>> {
        names
            .iter()
            .map(|n| {
                let n = n.as_ref();
                self.index_of(n)
                    .ok_or_else(|| Error::UnknownDimension(n.to_string()))
            })
            .collect()
    }

    /// Every column index, in order.
    pub fn all(&self) -> Vec<usize> {
        (0..self.names.len()).collect()
    }
}

/// One named entity with a value per feature dimension.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    name: String,
    values: Array1<f64>,
}

impl Sample {
    /// Create a sample.
    pub fn new(name: impl Into<String>, values: impl Into<Array1<f64>>) -> Self {
        Self {
            name: name.into(),
            values: values.into(),
        }
    }

    /// Identifier (e.g. a document name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Coordinates, indexed by schema column.
    pub fn values(&self) -> &Array1<f64> {
        &self.values
    }

    /// Coordinate on one column.
    #[inline]
    pub fn value(&self, dim: usize) -> f64 {
        self.values[dim]
    }
}

/// Samples loaded under a single schema.
#[derive(Debug, Clone)]
pub struct Dataset {
    schema: FeatureSchema,
    samples: Vec<Sample>,
}

impl Dataset {
    /// Create a dataset, checking every sample against the schema width.
    pub fn new(schema: FeatureSchema, samples: Vec<Sample>) -> Result<Self> {
        if let Some(s) = samples.iter().find(|s| s.values.len() != schema.len()) {
            return Err(Error::DimensionMismatch {
                expected: schema.len(),
                found: s.values.len(),
            });
        }
        Ok(Self { schema, samples })
    }

    /// Schema shared by all samples.
    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Samples in load order.
    pub fn samples(&self) -> &[Sample] {
        &self.samples
    }

    /// Sample at a dataset position.
    pub fn sample(&self, idx: usize) -> &Sample {
        &self.samples[idx]
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    /// True when there are no samples.
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}
