pub mod scope;
pub mod symbol;
pub mod types;

pub use scope::*;
pub use symbol::*;
pub use types::*;
