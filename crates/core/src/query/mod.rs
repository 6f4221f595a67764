pub mod service;

pub use service::HierarchyService;
