//! Recursive construction of the hierarchical signature map.
//!
//! A type's map starts from its own declared methods. The map of every
//! direct supertype is then built under the composed substitution and merged
//! in slot by slot: an inherited signature either overrides, is overridden
//! by, or clashes with what the slot already holds.

use hierscope_api::models::{TypeInfo, TypeRef};
use indexmap::IndexMap;
use std::collections::{HashMap, HashSet};
use tokio_util::sync::CancellationToken;

use super::map::HierarchyMap;
use super::rules::{is_more_specific, is_super_method, returns_compatible};
use super::signature::{ErasureKey, HierarchicalSignature, MethodSignature};
use super::substitution::Substitutor;
use super::walker::SupertypeWalker;
use crate::error::{HierarchyError, Result};
use crate::intern::SymbolTable;
use crate::logging::CONSISTENCY_TARGET;

pub struct HierarchyBuilder<'a> {
    walker: SupertypeWalker<'a>,
    symbols: &'a SymbolTable,
    cancel: &'a CancellationToken,
}

impl<'a> HierarchyBuilder<'a> {
    pub fn new(
        walker: SupertypeWalker<'a>,
        symbols: &'a SymbolTable,
        cancel: &'a CancellationToken,
    ) -> Self {
        Self {
            walker,
            symbols,
            cancel,
        }
    }

    pub fn walker(&self) -> &SupertypeWalker<'a> {
        &self.walker
    }

    /// Build the map of `ty` as seen through `substitutor`.
    pub fn build_map(
        &self,
        ty: &TypeInfo,
        name_filter: Option<&str>,
        substitutor: &Substitutor,
        include_privates: bool,
    ) -> Result<HierarchyMap> {
        let mut visited = HashSet::from([ty.fqn.clone()]);
        self.build(ty, name_filter, substitutor, include_privates, &mut visited, false)
    }

    fn build(
        &self,
        ty: &TypeInfo,
        name_filter: Option<&str>,
        substitutor: &Substitutor,
        include_privates: bool,
        visited: &mut HashSet<String>,
        raw_context: bool,
    ) -> Result<HierarchyMap> {
        if self.cancel.is_cancelled() {
            return Err(HierarchyError::Cancelled);
        }

        let mut level = Level::new(ty);
        self.collect_own(&mut level, name_filter, substitutor, include_privates, raw_context);

        for edge in self.walker.direct_supertypes(ty) {
            if !visited.insert(edge.info.fqn.clone()) {
                tracing::trace!(
                    "cyclic inheritance: {} already on the path from {}",
                    edge.info.fqn,
                    ty.fqn
                );
                continue;
            }

            let raw_super =
                (raw_context || edge.is_raw) && !edge.info.type_parameters.is_empty();
            let final_subst = edge.final_substitutor(substitutor, raw_context);
            let result = self.build(
                &edge.info,
                name_filter,
                &final_subst,
                false,
                visited,
                raw_super,
            );
            visited.remove(&edge.info.fqn);
            let super_map = result?;

            let mut detached = Vec::new();
            for (key, bucket) in super_map.iter() {
                for entry in bucket {
                    if !self.is_inherited(&edge.info, entry) {
                        continue;
                    }
                    let mut copy = entry.clone();
                    for orphan in self.detach_unrelated(&mut copy) {
                        detached.push((key.clone(), orphan));
                    }
                    self.put_in_map(&mut level, key.clone(), copy);
                }
            }
            // Supers split off above now compete for the slot directly.
            for (key, orphan) in detached {
                self.put_in_map(&mut level, key, orphan);
            }
        }

        Ok(level.finish())
    }

    fn collect_own(
        &self,
        level: &mut Level<'_>,
        name_filter: Option<&str>,
        substitutor: &Substitutor,
        include_privates: bool,
        raw_context: bool,
    ) {
        let model = self.walker.model();
        let methods = match name_filter {
            Some(name) => model.get_methods_by_name(&level.owner.fqn, name),
            None => model.get_methods(&level.owner.fqn),
        };

        let mut identity_groups: HashMap<ErasureKey, Vec<ErasureKey>> = HashMap::new();
        for method in methods {
            if !include_privates && method.is_private() {
                continue;
            }
            if !method.is_valid {
                tracing::error!(
                    target: CONSISTENCY_TARGET,
                    "stale method {} met while building {}",
                    method,
                    level.owner.fqn
                );
            }

            let identity_key = MethodSignature::declared(method.clone()).key(self.symbols);
            let signature = MethodSignature::new(method, substitutor.clone(), raw_context);
            let key = signature.key(self.symbols);
            identity_groups
                .entry(identity_key)
                .or_default()
                .push(key.clone());

            level
                .own
                .push((signature.name().to_string(), signature.parameter_types()));
            level
                .slots
                .entry(key)
                .or_default()
                .push(HierarchicalSignature::new(signature));
        }

        // Return types only separate slots where own methods share an erasure.
        level.ambiguous_returns = identity_groups
            .into_values()
            .filter(|keys| keys.len() > 1)
            .flatten()
            .collect();
    }

    /// Constructors and static interface methods are not inherited.
    fn is_inherited(&self, super_type: &TypeInfo, entry: &HierarchicalSignature) -> bool {
        let method = entry.method();
        if method.is_constructor() {
            return false;
        }
        if method.is_static() {
            let declared_in_interface = if method.declaring_type == super_type.fqn {
                super_type.is_interface()
            } else {
                self.walker
                    .resolve(&method.declaring_type)
                    .is_some_and(|t| t.is_interface())
            };
            return !declared_in_interface;
        }
        true
    }

    /// Split off supers whose declaring type is not an ancestor of the
    /// entry's own declaring type.
    fn detach_unrelated(&self, entry: &mut HierarchicalSignature) -> Vec<HierarchicalSignature> {
        let declaring = entry.signature.declaring_type().to_string();
        let (kept, detached): (Vec<_>, Vec<_>) =
            std::mem::take(&mut entry.supers).into_iter().partition(|sup| {
                self.walker
                    .is_inheritor_or_self(&declaring, sup.signature.declaring_type())
            });
        entry.supers = kept;
        detached
    }

    fn put_in_map(&self, level: &mut Level<'_>, key: ErasureKey, candidate: HierarchicalSignature) {
        let disambiguate = level.ambiguous_returns.contains(&key);
        let owner = level.owner;
        let bucket = level.slots.entry(key.clone()).or_default();

        let slot = if disambiguate {
            bucket
                .iter()
                .position(|e| self.same_slot(owner, &e.signature, &candidate.signature))
        } else if bucket.is_empty() {
            None
        } else {
            Some(0)
        };
        let Some(slot) = slot else {
            bucket.push(candidate);
            return;
        };

        let existing = &mut bucket[slot];
        let walker = &self.walker;
        if is_more_specific(walker, &candidate.signature, &existing.signature)
            && is_super_method(walker, owner, &candidate.signature, &existing.signature)
        {
            let replaced = std::mem::replace(existing, candidate);
            merge_supers(existing, replaced);
        } else if existing.id() == candidate.id()
            || is_super_method(walker, owner, &existing.signature, &candidate.signature)
        {
            merge_supers(existing, candidate);
        } else {
            let params = candidate.signature.parameter_types();
            let name = candidate.signature.name();
            let shadowed_by_own = level
                .own
                .iter()
                .any(|(own_name, own_params)| own_name == name && *own_params == params);
            let already_clashing = level.clashes.iter().any(|(k, c)| {
                *k == key
                    && (c.id() == candidate.id() || c.signature.parameter_types() == params)
            });
            if !shadowed_by_own && !already_clashing {
                tracing::debug!(
                    "unresolved clash in {}: {} against {}",
                    owner.fqn,
                    candidate.signature,
                    bucket[slot].signature
                );
                level.clashes.push((key, candidate));
            }
        }
    }

    fn same_slot(&self, owner: &TypeInfo, a: &MethodSignature, b: &MethodSignature) -> bool {
        a.method.is_static()
            || b.method.is_static()
            || owner.is_annotation()
            || returns_compatible(&self.walker, a, b)
    }
}

/// Record `sup` as a super-signature of `target`, deduplicated by method
/// identity.
pub fn merge_supers(target: &mut HierarchicalSignature, sup: HierarchicalSignature) {
    if let Some(present) = target.supers.iter_mut().find(|s| s.id() == sup.id()) {
        for nested in sup.supers {
            merge_supers(present, nested);
        }
        return;
    }
    if target.id() == sup.id() {
        for nested in sup.supers {
            merge_supers(target, nested);
        }
    } else {
        target.supers.push(sup);
    }
}

/// Working state for one type while its map is being merged.
struct Level<'t> {
    owner: &'t TypeInfo,
    slots: IndexMap<ErasureKey, Vec<HierarchicalSignature>>,
    clashes: Vec<(ErasureKey, HierarchicalSignature)>,
    own: Vec<(String, Vec<TypeRef>)>,
    ambiguous_returns: HashSet<ErasureKey>,
}

impl<'t> Level<'t> {
    fn new(owner: &'t TypeInfo) -> Self {
        Self {
            owner,
            slots: IndexMap::new(),
            clashes: Vec::new(),
            own: Vec::new(),
            ambiguous_returns: HashSet::new(),
        }
    }

    fn finish(self) -> HierarchyMap {
        let mut map = HierarchyMap::default();
        for (key, bucket) in self.slots {
            for entry in bucket {
                map.push(key.clone(), entry);
            }
        }
        for (key, entry) in self.clashes {
            map.push(key, entry);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierscope_api::models::{MemberKind, MethodId, MethodInfo};
    use std::sync::Arc;

    fn node(decl: &str) -> HierarchicalSignature {
        HierarchicalSignature::new(MethodSignature::declared(Arc::new(MethodInfo {
            id: MethodId::new(decl, 0),
            name: "m".into(),
            kind: MemberKind::Method,
            declaring_type: decl.into(),
            return_type: TypeRef::void(),
            parameters: vec![],
            type_parameters: vec![],
            modifiers: vec![],
            is_physical: true,
            is_valid: true,
        })))
    }

    fn with_supers(mut sig: HierarchicalSignature, supers: Vec<HierarchicalSignature>) -> HierarchicalSignature {
        sig.supers = supers;
        sig
    }

    #[test]
    fn test_merge_supers_dedupes_by_identity() {
        let mut target = with_supers(node("C"), vec![node("I")]);
        merge_supers(&mut target, with_supers(node("I"), vec![node("J")]));
        assert_eq!(target.supers.len(), 1);
        assert_eq!(target.supers[0].supers.len(), 1);
        assert_eq!(target.supers[0].supers[0].id(), &MethodId::new("J", 0));
    }

    #[test]
    fn test_merge_same_method_adopts_missing_supers() {
        let mut target = with_supers(node("B"), vec![node("I")]);
        merge_supers(&mut target, with_supers(node("B"), vec![node("I"), node("J")]));
        let ids: Vec<_> = target.supers.iter().map(|s| s.id().declaring_type.clone()).collect();
        assert_eq!(ids, vec!["I", "J"]);
    }

    #[test]
    fn test_merge_unrelated_appends() {
        let mut target = node("C");
        merge_supers(&mut target, node("A"));
        merge_supers(&mut target, node("B"));
        assert_eq!(target.supers.len(), 2);
    }
}
