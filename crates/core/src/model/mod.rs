//! In-memory program model.

pub mod link;
pub mod snapshot;

pub use snapshot::{MethodDecl, ProgramSnapshot, TypeDecl};
