//! Centroid and sum-of-squares arithmetic behind Ward's criterion.
//!
//! ```text
//! centroid(S)_d   = (1/|S|) Σ_{x∈S} x_d
//! sqd(a, b)       = Σ_d (a_d - b_d)²
//! inertia(S, c)   = Σ_{x∈S} sqd(c, x)
//! ```
//!
//! Every function works over an ordered list of column indices (`dims`) so a
//! caller can cluster on a subset of the schema.

use crate::error::{Error, Result};
use crate::sample::Sample;
use ndarray::Array1;

/// `x * x`.
#[inline]
pub fn square(x: f64) -> f64 {
    x * x
}

/// Arithmetic mean. Fails on an empty slice.
pub fn average(values: &[f64]) -> Result<f64> {
    if values.is_empty() {
        return Err(Error::EmptyCluster);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Synthetic sample at the per-dimension mean of `members`.
///
/// The result has the same width as the members; columns outside `dims` are
/// left at zero. `label` only names the point for diagnostics.
pub fn centroid(members: &[&Sample], dims: &[usize], label: &str) -> Result<Sample> {
    let first = members.first().ok_or(Error::EmptyCluster)?;
    let mut values: Array1<f64> = Array1::zeros(first.values().len());
    let mut column = Vec::with_capacity(members.len());
    for &d in dims {
        column.clear();
        column.extend(members.iter().map(|s| s.value(d)));
        values[d] = average(&column)?;
    }
    Ok(Sample::new(label, values))
}

/// Squared Euclidean distance between two points over `dims`.
#[inline]
pub fn sum_of_squared_distances(a: &Sample, b: &Sample, dims: &[usize]) -> f64 {
    dims.iter().map(|&d| square(a.value(d) - b.value(d))).sum()
}

/// Sum of squared distances from `center` to every member.
pub fn cluster_inertia(members: &[&Sample], center: &Sample, dims: &[usize]) -> f64 {
    members
        .iter()
        .map(|m| sum_of_squared_distances(center, m, dims))
        .sum()
}

/// Inertia of `members` about their own centroid.
pub fn within_cluster_sum_of_squares(members: &[&Sample], dims: &[usize]) -> Result<f64> {
    let center = centroid(members, dims, "centroid")?;
    Ok(cluster_inertia(members, &center, dims))
}
