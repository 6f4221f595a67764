//! Direct supertype enumeration.
//!
//! The walker turns the syntactic `extends`/`implements` clauses exposed by
//! the program model into resolved edges, each carrying the substitution of
//! the supertype's parameters in terms of the subtype's variables.

use hierscope_api::models::{
    CapturedVar, OBJECT_FQN, SearchScope, TypeInfo, TypeKind, TypeRef, TypeVarOwner,
};
use hierscope_api::provider::ProgramModel;
use std::cell::Cell;
use std::collections::{HashSet, VecDeque};
use std::sync::Arc;

use super::substitution::Substitutor;

/// Where a supertype edge comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EdgeOrigin {
    Extends,
    Implements,
    /// The single base type of an anonymous class.
    AnonymousBase,
    /// `java.lang.Object`, added for types that declare no supertype of their kind.
    ImplicitTop,
}

/// One resolved direct supertype.
#[derive(Debug, Clone)]
pub struct SuperEdge {
    pub info: Arc<TypeInfo>,
    /// The declared reference after capture conversion.
    pub declared: TypeRef,
    /// Supertype parameters in terms of the subtype's own variables.
    pub substitutor: Substitutor,
    /// The supertype is generic but was referenced without arguments.
    pub is_raw: bool,
    pub origin: EdgeOrigin,
}

impl SuperEdge {
    /// The substitutor seen by the supertype when the subtype itself is seen
    /// through `derived`.
    pub fn final_substitutor(&self, derived: &Substitutor, raw_context: bool) -> Substitutor {
        Substitutor::for_supertype(&self.info, &self.substitutor, derived, raw_context)
    }
}

/// Resolves supertypes against a program model within one search scope.
///
/// Capture variables are numbered per walker, so a fresh walker per
/// computation keeps results deterministic.
pub struct SupertypeWalker<'a> {
    model: &'a dyn ProgramModel,
    scope: &'a SearchScope,
    implicit_top_type: bool,
    next_capture: Cell<u32>,
}

impl<'a> SupertypeWalker<'a> {
    pub fn new(model: &'a dyn ProgramModel, scope: &'a SearchScope, implicit_top_type: bool) -> Self {
        Self {
            model,
            scope,
            implicit_top_type,
            next_capture: Cell::new(0),
        }
    }

    pub fn model(&self) -> &'a dyn ProgramModel {
        self.model
    }

    pub fn scope(&self) -> &'a SearchScope {
        self.scope
    }

    pub fn resolve(&self, fqn: &str) -> Option<Arc<TypeInfo>> {
        self.model.get_type_info(fqn, self.scope)
    }

    /// Lazily enumerate the direct supertypes of `ty`: `extends` first, then
    /// `implements`. Unresolvable or out-of-scope supertypes are skipped.
    pub fn direct_supertypes(&self, ty: &TypeInfo) -> Supertypes<'_, 'a> {
        let mut declared = Vec::new();
        let superclass = self.model.get_superclass(&ty.fqn);

        if ty.kind == TypeKind::Anonymous {
            let base = superclass.or_else(|| self.model.get_interfaces(&ty.fqn).into_iter().next());
            if let Some(base) = base {
                declared.push((base, EdgeOrigin::AnonymousBase));
            }
        } else {
            let interfaces = self.model.get_interfaces(&ty.fqn);
            let needs_top = if ty.is_interface() {
                interfaces.is_empty()
            } else {
                superclass.is_none()
            };
            if let Some(superclass) = superclass {
                declared.push((superclass, EdgeOrigin::Extends));
            }
            if needs_top && self.implicit_top_type && !ty.is_top_type() {
                declared.push((TypeRef::object(), EdgeOrigin::ImplicitTop));
            }
            declared.extend(interfaces.into_iter().map(|i| (i, EdgeOrigin::Implements)));
        }

        Supertypes {
            walker: self,
            subtype: ty.fqn.clone(),
            declared: declared.into_iter(),
        }
    }

    /// Resolve a declared reference into an edge, applying capture conversion.
    pub fn resolve_ref(&self, declared: &TypeRef, origin: EdgeOrigin) -> Option<SuperEdge> {
        let fqn = declared.class_fqn()?;
        let info = self.resolve(fqn)?;
        let declared = self.capture(&info, declared);
        let args = declared.type_args();
        let is_raw = args.is_empty() && !info.type_parameters.is_empty();
        let substitutor = Substitutor::empty().put_all(&info, args);
        Some(SuperEdge {
            info,
            declared,
            substitutor,
            is_raw,
            origin,
        })
    }

    /// Capture conversion of top-level wildcard arguments: each wildcard
    /// becomes a fresh captured variable bounded by the wildcard bound, or by
    /// the formal parameter's first bound.
    pub fn capture(&self, info: &TypeInfo, ty: &TypeRef) -> TypeRef {
        let TypeRef::Generic { base, args } = ty else {
            return ty.clone();
        };
        if !args.iter().any(|a| matches!(a, TypeRef::Wildcard { .. })) {
            return ty.clone();
        }

        let formal_bounds: Vec<TypeRef> = info
            .type_parameters
            .iter()
            .map(|p| {
                p.bounds
                    .first()
                    .cloned()
                    .unwrap_or_else(TypeRef::object)
            })
            .collect();
        // Formal bounds may mention the type's own parameters.
        let formal_subst = Substitutor::empty().put_all(info, args);

        let new_args = args
            .iter()
            .enumerate()
            .map(|(idx, arg)| {
                let formal = || {
                    formal_bounds
                        .get(idx)
                        .map(|b| formal_subst.substitute(b))
                        .filter(|b| !matches!(b, TypeRef::Wildcard { .. }))
                        .unwrap_or_else(TypeRef::object)
                };
                match arg {
                    TypeRef::Wildcard {
                        bound: Some(bound),
                        is_upper_bound: true,
                    } => self.fresh_capture((**bound).clone(), None),
                    TypeRef::Wildcard {
                        bound: Some(bound),
                        is_upper_bound: false,
                    } => self.fresh_capture(formal(), Some((**bound).clone())),
                    TypeRef::Wildcard { bound: None, .. } => self.fresh_capture(formal(), None),
                    other => other.clone(),
                }
            })
            .collect();

        TypeRef::Generic {
            base: base.clone(),
            args: new_args,
        }
    }

    fn fresh_capture(&self, upper: TypeRef, lower: Option<TypeRef>) -> TypeRef {
        let index = self.next_capture.get();
        self.next_capture.set(index + 1);
        TypeRef::Captured(CapturedVar {
            index,
            upper: Box::new(upper),
            lower: lower.map(Box::new),
        })
    }

    /// Direct supertypes of an instantiated type, with its arguments applied.
    ///
    /// `List<? extends Number>` is captured first, so the result mentions the
    /// captured variable rather than the wildcard.
    pub fn supertypes_of(&self, ty: &TypeRef) -> Vec<TypeRef> {
        let Some(receiver) = self.resolve_ref(ty, EdgeOrigin::Extends) else {
            return Vec::new();
        };
        let raw = receiver.is_raw;
        self.direct_supertypes(&receiver.info)
            .map(|edge| {
                let subst = edge.final_substitutor(&receiver.substitutor, raw);
                instantiate(&edge.info, &subst, raw || edge.is_raw)
            })
            .collect()
    }

    /// Whether `sub` inherits from `sup`; `strict` excludes `sub == sup`.
    pub fn is_inheritor(&self, sub: &str, sup: &str, strict: bool) -> bool {
        if sub == sup {
            return !strict;
        }
        if sup == OBJECT_FQN {
            return self.resolve(sub).is_some_and(|info| !info.is_top_type());
        }
        let Some(start) = self.resolve(sub) else {
            return false;
        };

        let mut seen: HashSet<String> = HashSet::new();
        seen.insert(start.fqn.clone());
        let mut queue = VecDeque::from([start]);
        while let Some(current) = queue.pop_front() {
            for edge in self.direct_supertypes(&current) {
                if edge.info.fqn == sup {
                    return true;
                }
                if seen.insert(edge.info.fqn.clone()) {
                    queue.push_back(edge.info);
                }
            }
        }
        false
    }

    pub fn is_inheritor_or_self(&self, sub: &str, sup: &str) -> bool {
        self.is_inheritor(sub, sup, false)
    }

    /// View `ty` as an instantiation of `target`, if `target` is among its supertypes.
    pub fn as_supertype(&self, ty: &TypeRef, target: &str) -> Option<TypeRef> {
        let fqn = ty.class_fqn()?;
        if fqn == target {
            return Some(ty.clone());
        }

        let mut seen: HashSet<String> = HashSet::from([fqn.to_string()]);
        let mut queue = VecDeque::from([ty.clone()]);
        while let Some(current) = queue.pop_front() {
            for sup in self.supertypes_of(&current) {
                let Some(sup_fqn) = sup.class_fqn() else {
                    continue;
                };
                if sup_fqn == target {
                    return Some(sup);
                }
                if seen.insert(sup_fqn.to_string()) {
                    queue.push_back(sup);
                }
            }
        }
        None
    }
}

/// Lazy iterator over the direct supertypes of one type.
pub struct Supertypes<'w, 'a> {
    walker: &'w SupertypeWalker<'a>,
    subtype: String,
    declared: std::vec::IntoIter<(TypeRef, EdgeOrigin)>,
}

impl Iterator for Supertypes<'_, '_> {
    type Item = SuperEdge;

    fn next(&mut self) -> Option<SuperEdge> {
        for (declared, origin) in self.declared.by_ref() {
            match self.walker.resolve_ref(&declared, origin) {
                Some(edge) => return Some(edge),
                None => {
                    tracing::trace!(
                        "skipping supertype {} of {}: unresolved or out of scope",
                        declared,
                        self.subtype
                    );
                }
            }
        }
        None
    }
}

/// `info` applied to its parameters as seen through `subst`.
pub fn instantiate(info: &TypeInfo, subst: &Substitutor, raw: bool) -> TypeRef {
    if raw || info.type_parameters.is_empty() {
        return TypeRef::id(info.fqn.clone());
    }
    let owner = TypeVarOwner::Type(info.fqn.clone());
    let args = info
        .type_parameters
        .iter()
        .map(|p| subst.substitute(&TypeRef::Var(p.as_var(owner.clone()))))
        .collect();
    TypeRef::generic(info.fqn.clone(), args)
}
