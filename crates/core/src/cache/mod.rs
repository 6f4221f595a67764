//! Memoization of hierarchy maps against the program model's modification stamp.

pub mod signature_cache;

pub use signature_cache::{CacheStats, SignatureCache};
