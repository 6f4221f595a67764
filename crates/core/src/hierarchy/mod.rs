//! Method hierarchy resolution.
//!
//! - [`substitution`]: type parameter substitution along inheritance paths
//! - [`walker`]: direct supertype enumeration and inheritance queries
//! - [`subtyping`]: subtype checks used for return-type covariance
//! - [`signature`]: visible signatures, erasure keys and the super forest
//! - [`rules`]: override eligibility between two signatures
//! - [`builder`]: the recursive merge producing a [`HierarchyMap`]

pub mod builder;
pub mod map;
pub mod rules;
pub mod signature;
pub mod substitution;
pub mod subtyping;
pub mod walker;

pub use builder::HierarchyBuilder;
pub use map::HierarchyMap;
pub use signature::{ErasureKey, HierarchicalSignature, MethodSignature, is_subsignature};
pub use substitution::Substitutor;
pub use walker::{EdgeOrigin, SuperEdge, SupertypeWalker};
