pub mod cache;
pub mod config;
pub mod error;
pub mod hierarchy;
pub mod intern;
pub mod logging;
pub mod model;
pub mod query;

pub use config::EngineConfig;
pub use error::{HierarchyError, Result};
pub use hierarchy::{HierarchicalSignature, HierarchyMap, MethodSignature, Substitutor};
pub use hierscope_api::models::SearchScope;
pub use model::{MethodDecl, ProgramSnapshot, TypeDecl};
pub use query::HierarchyService;
pub use tokio_util::sync::CancellationToken;
