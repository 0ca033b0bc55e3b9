//! Ward clustering and the elbow sweep built on it.
//!
//! ## Ward's Minimum-Variance Linkage
//!
//! Bottom-up: start with each sample as its own cluster, repeatedly merge the
//! pair whose union increases the total within-cluster sum of squares the
//! least, and stop at the target count.
//!
//! ```text
//! J = Σ_k Σ_{x ∈ C_k} ||x - μ_k||²
//! Δ(A,B) = J after merging A and B - J before
//! ```
//!
//! **When to use**: small to moderate sample counts where a deterministic,
//! merge-by-merge history matters more than speed. Every iteration rescans the
//! changed candidate pairs, so cost grows roughly cubically with n.
//!
//! ## Choosing k
//!
//! [`Elbow`] runs the engine once per candidate count and reports the largest
//! surviving merge cost. A sharp drop between `k - 1` and `k` means that `k`
//! avoided an expensive merge.
//!
//! ## Usage
//!
//! ```rust
//! use wardclust::cluster::{Clustering, Ward};
//! use wardclust::sample::{Dataset, FeatureSchema, Sample};
//!
//! let schema = FeatureSchema::new("name", vec!["x".into()]);
//! let samples = vec![
//!     Sample::new("A", vec![1.0]),
//!     Sample::new("B", vec![2.0]),
//!     Sample::new("C", vec![10.0]),
//!     Sample::new("D", vec![11.0]),
//! ];
//! let data = Dataset::new(schema, samples).unwrap();
//!
//! let labels = Ward::new(2).fit_predict(&data).unwrap();
//! assert_eq!(labels[0], labels[1]);
//! assert_ne!(labels[0], labels[2]);
//! ```

pub mod elbow;
pub mod geometry;
mod traits;
mod ward;

pub use elbow::{Elbow, ElbowPoint};
pub use traits::Clustering;
pub use ward::{Cluster, ProvisionalMerge, Ward, WardFit, WardState};
