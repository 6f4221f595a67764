use hierscope_api::SearchScope;
use serde::Deserialize;

use crate::error::Result;

/// Engine-wide settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Treat `java.lang.Object` as the direct supertype of classes without an
    /// `extends` clause and of interfaces without super-interfaces.
    pub implicit_top_type: bool,
    /// Memoize hierarchy maps. Disabling it makes every query recompute.
    pub cache_enabled: bool,
    /// Scope used by queries that do not take an explicit one.
    pub default_scope: SearchScope,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            implicit_top_type: true,
            cache_enabled: true,
            default_scope: SearchScope::All,
        }
    }
}

impl EngineConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}
