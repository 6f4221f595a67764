use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// The subset of the type universe considered by a query.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Hash, Default)]
#[serde(tag = "kind", content = "data")]
pub enum SearchScope {
    /// Every type the model can resolve.
    #[default]
    All,
    /// Only types whose FQN starts with one of the package prefixes.
    Packages(Arc<BTreeSet<String>>),
    /// Only the listed types.
    Types(Arc<BTreeSet<String>>),
}

impl SearchScope {
    pub fn packages<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchScope::Packages(Arc::new(prefixes.into_iter().map(Into::into).collect()))
    }

    pub fn types<I, S>(fqns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        SearchScope::Types(Arc::new(fqns.into_iter().map(Into::into).collect()))
    }

    pub fn contains(&self, fqn: &str) -> bool {
        match self {
            SearchScope::All => true,
            SearchScope::Packages(prefixes) => prefixes.iter().any(|prefix| {
                fqn.strip_prefix(prefix.as_str())
                    .is_some_and(|rest| rest.is_empty() || rest.starts_with('.'))
            }),
            SearchScope::Types(fqns) => fqns.contains(fqn),
        }
    }
}
