use hierscope_api::models::MethodId;
use indexmap::IndexMap;

use super::signature::{ErasureKey, HierarchicalSignature};

/// Every method signature visible on one type, keyed by erasure.
///
/// A bucket with more than one entry holds conflicting declarations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HierarchyMap {
    entries: IndexMap<ErasureKey, Vec<HierarchicalSignature>>,
}

impl HierarchyMap {
    pub(crate) fn push(&mut self, key: ErasureKey, entry: HierarchicalSignature) {
        self.entries.entry(key).or_default().push(entry);
    }

    /// Number of distinct erasure keys.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total number of entries across all buckets.
    pub fn entry_count(&self) -> usize {
        self.entries.values().map(Vec::len).sum()
    }

    pub fn get(&self, key: &ErasureKey) -> Option<&[HierarchicalSignature]> {
        self.entries.get(key).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&ErasureKey, &[HierarchicalSignature])> {
        self.entries.iter().map(|(k, v)| (k, v.as_slice()))
    }

    /// All entries in map order.
    pub fn signatures(&self) -> impl Iterator<Item = &HierarchicalSignature> {
        self.entries.values().flatten()
    }

    /// The top-level entry for a declared method.
    pub fn find_method(&self, id: &MethodId) -> Option<&HierarchicalSignature> {
        self.signatures().find(|sig| sig.id() == id)
    }

    pub fn by_name<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a HierarchicalSignature> {
        self.signatures().filter(move |sig| sig.signature.name() == name)
    }

    /// Buckets holding conflicting entries.
    pub fn ambiguous(&self) -> impl Iterator<Item = (&ErasureKey, &[HierarchicalSignature])> {
        self.iter().filter(|(_, bucket)| bucket.len() > 1)
    }
}
