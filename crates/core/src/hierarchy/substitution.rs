//! Type parameter substitution.
//!
//! A [`Substitutor`] maps type variables to the types they stand for along an
//! inheritance path. A variable mapped to `None` is raw: it erases instead of
//! being replaced, which is distinct from a variable that is simply absent.

use hierscope_api::models::{TypeInfo, TypeParameter, TypeRef, TypeVar, TypeVarOwner};
use std::collections::HashMap;
use std::sync::Arc;

/// Immutable mapping from type variables to concrete types.
///
/// Every update returns a new substitutor; clones share the underlying map.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Substitutor {
    map: Arc<HashMap<TypeVar, Option<TypeRef>>>,
}

impl Substitutor {
    /// The identity substitution.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    /// The binding of `var`: `None` when absent, `Some(None)` when raw.
    pub fn binding(&self, var: &TypeVar) -> Option<Option<&TypeRef>> {
        self.map.get(var).map(Option::as_ref)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&TypeVar, Option<&TypeRef>)> {
        self.map.iter().map(|(var, ty)| (var, ty.as_ref()))
    }

    /// A copy with one mapping added or overwritten.
    pub fn put(&self, var: TypeVar, ty: Option<TypeRef>) -> Self {
        let mut map = (*self.map).clone();
        map.insert(var, ty);
        Self { map: Arc::new(map) }
    }

    /// Positional mapping of `ty`'s parameters to `args`.
    ///
    /// A non-generic type leaves the substitutor unchanged. An empty argument
    /// list on a generic type is a raw usage and maps every parameter to `None`.
    pub fn put_all(&self, ty: &TypeInfo, args: &[TypeRef]) -> Self {
        if ty.type_parameters.is_empty() {
            return self.clone();
        }
        let owner = TypeVarOwner::Type(ty.fqn.clone());
        if args.is_empty() {
            return self.raw_for(&owner, &ty.type_parameters);
        }
        if args.len() != ty.type_parameters.len() {
            tracing::debug!(
                "{} expects {} type arguments, got {}",
                ty.fqn,
                ty.type_parameters.len(),
                args.len()
            );
        }

        let mut map = (*self.map).clone();
        for (i, param) in ty.type_parameters.iter().enumerate() {
            map.insert(param.as_var(owner.clone()), args.get(i).cloned());
        }
        Self { map: Arc::new(map) }
    }

    /// A copy where every parameter in `params` is explicitly raw.
    pub fn raw_for(&self, owner: &TypeVarOwner, params: &[TypeParameter]) -> Self {
        if params.is_empty() {
            return self.clone();
        }
        let mut map = (*self.map).clone();
        for param in params {
            map.insert(param.as_var(owner.clone()), None);
        }
        Self { map: Arc::new(map) }
    }

    /// Whether any of `params` is raw-mapped.
    pub fn is_raw_for(&self, owner: &TypeVarOwner, params: &[TypeParameter]) -> bool {
        params
            .iter()
            .any(|p| matches!(self.binding(&p.as_var(owner.clone())), Some(None)))
    }

    /// Apply this substitution to a type.
    pub fn substitute(&self, ty: &TypeRef) -> TypeRef {
        if self.map.is_empty() {
            return ty.clone();
        }
        match ty {
            TypeRef::Var(var) => match self.map.get(var) {
                Some(Some(bound)) => bound.clone(),
                Some(None) => var.erasure_type(),
                None => ty.clone(),
            },
            TypeRef::Generic { base, args } => {
                if base.class_fqn().is_none() {
                    tracing::warn!("generic instantiation over a non-class base: {}", ty);
                    return ty.clone();
                }
                // A raw argument anywhere makes the whole instantiation raw.
                if args.iter().any(|arg| self.erases(arg)) {
                    return base.erasure();
                }
                TypeRef::Generic {
                    base: base.clone(),
                    args: args.iter().map(|arg| self.substitute(arg)).collect(),
                }
            }
            TypeRef::Array {
                element,
                dimensions,
            } => TypeRef::array(self.substitute(element), *dimensions),
            TypeRef::Wildcard {
                bound,
                is_upper_bound,
            } => TypeRef::Wildcard {
                bound: bound.as_ref().map(|b| Box::new(self.substitute(b))),
                is_upper_bound: *is_upper_bound,
            },
            TypeRef::Captured(cap) => {
                let mut cap = cap.clone();
                cap.upper = Box::new(self.substitute(&cap.upper));
                cap.lower = cap.lower.map(|l| Box::new(self.substitute(&l)));
                TypeRef::Captured(cap)
            }
            TypeRef::Unknown => {
                tracing::warn!("substituting into an unknown type");
                TypeRef::Unknown
            }
            TypeRef::Raw(_) | TypeRef::Id(_) => ty.clone(),
        }
    }

    fn erases(&self, ty: &TypeRef) -> bool {
        match ty {
            TypeRef::Var(var) => matches!(self.map.get(var), Some(None)),
            TypeRef::Generic { args, .. } => args.iter().any(|arg| self.erases(arg)),
            TypeRef::Array { element, .. } => self.erases(element),
            TypeRef::Wildcard {
                bound: Some(bound), ..
            } => self.erases(bound),
            _ => false,
        }
    }

    /// `inner` followed by `self`: every output of `inner` is pushed through
    /// `self`. Mappings of `self` that `inner` does not shadow are kept.
    pub fn compose(&self, inner: &Substitutor) -> Substitutor {
        if inner.is_empty() {
            return self.clone();
        }
        let mut map = (*self.map).clone();
        for (var, ty) in inner.map.iter() {
            map.insert(var.clone(), ty.as_ref().map(|t| self.substitute(t)));
        }
        Self { map: Arc::new(map) }
    }

    /// The substitutor seen by a supertype reached through one edge.
    ///
    /// `edge` maps the supertype's parameters in terms of the subtype's
    /// variables; `derived` maps those variables to what the caller sees. In
    /// a raw context the edge mapping is discarded and every supertype
    /// parameter becomes raw.
    pub fn for_supertype(
        super_type: &TypeInfo,
        edge: &Substitutor,
        derived: &Substitutor,
        raw_context: bool,
    ) -> Substitutor {
        let params = &super_type.type_parameters;
        if params.is_empty() {
            return Substitutor::empty();
        }
        let owner = TypeVarOwner::Type(super_type.fqn.clone());
        let raw_edge;
        let edge = if raw_context {
            raw_edge = Substitutor::empty().raw_for(&owner, params);
            &raw_edge
        } else {
            edge
        };

        let mut map = HashMap::with_capacity(params.len());
        for param in params {
            let var = param.as_var(owner.clone());
            let mapped = match edge.binding(&var) {
                Some(None) => None,
                Some(Some(ty)) => Some(derived.substitute(ty)),
                None => Some(derived.substitute(&TypeRef::Var(var.clone()))),
            };
            map.insert(var, mapped);
        }
        Self { map: Arc::new(map) }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hierscope_api::models::TypeKind;

    fn generic_type(fqn: &str, params: &[&str]) -> TypeInfo {
        TypeInfo {
            fqn: fqn.to_string(),
            kind: TypeKind::Interface,
            modifiers: vec![],
            type_parameters: params.iter().map(|p| TypeParameter::new(*p)).collect(),
        }
    }

    fn var(owner: &str, name: &str) -> TypeVar {
        TypeVar::new(name, TypeVarOwner::Type(owner.to_string()))
    }

    #[test]
    fn test_put_all_binds_positionally() {
        let map = generic_type("Map", &["K", "V"]);
        let s = Substitutor::empty().put_all(
            &map,
            &[TypeRef::id("java.lang.String"), TypeRef::id("java.lang.Integer")],
        );
        assert_eq!(
            s.substitute(&TypeRef::Var(var("Map", "V"))),
            TypeRef::id("java.lang.Integer")
        );
    }

    #[test]
    fn test_put_all_without_args_is_raw() {
        let list = generic_type("List", &["E"]);
        let s = Substitutor::empty().put_all(&list, &[]);
        assert_eq!(s.binding(&var("List", "E")), Some(None));
        assert!(s.is_raw_for(&TypeVarOwner::Type("List".into()), &list.type_parameters));
        assert_eq!(s.substitute(&TypeRef::Var(var("List", "E"))), TypeRef::object());
    }

    #[test]
    fn test_non_generic_type_leaves_substitutor_unchanged() {
        let plain = generic_type("Plain", &[]);
        let s = Substitutor::empty().put(var("X", "T"), Some(TypeRef::id("A")));
        assert_eq!(s.put_all(&plain, &[TypeRef::id("B")]), s);
    }

    #[test]
    fn test_absent_variable_is_untouched() {
        let s = Substitutor::empty().put(var("X", "T"), Some(TypeRef::id("A")));
        let other = TypeRef::Var(var("Y", "T"));
        assert_eq!(s.substitute(&other), other);
    }

    #[test]
    fn test_raw_argument_collapses_generic() {
        let t = var("Box", "T");
        let s = Substitutor::empty().put(t.clone(), None);
        let list_of_t = TypeRef::generic("java.util.List", vec![TypeRef::Var(t)]);
        assert_eq!(s.substitute(&list_of_t), TypeRef::id("java.util.List"));
    }

    #[test]
    fn test_substitute_through_arrays_and_wildcards() {
        let t = var("Box", "T");
        let s = Substitutor::empty().put(t.clone(), Some(TypeRef::array(TypeRef::raw("int"), 1)));
        assert_eq!(
            s.substitute(&TypeRef::array(TypeRef::Var(t.clone()), 1)),
            TypeRef::array(TypeRef::raw("int"), 2)
        );
        let wild = TypeRef::generic("List", vec![TypeRef::extends(TypeRef::Var(t))]);
        assert_eq!(
            s.substitute(&wild),
            TypeRef::generic(
                "List",
                vec![TypeRef::extends(TypeRef::array(TypeRef::raw("int"), 1))]
            )
        );
    }

    #[test]
    fn test_compose_chains_two_levels() {
        // class B<U> extends A<List<U>>, seen as B<String>
        let t = var("A", "T");
        let u = var("B", "U");
        let edge = Substitutor::empty().put(
            t.clone(),
            Some(TypeRef::generic("List", vec![TypeRef::Var(u.clone())])),
        );
        let outer = Substitutor::empty().put(u, Some(TypeRef::id("String")));
        let composed = outer.compose(&edge);
        assert_eq!(
            composed.substitute(&TypeRef::Var(t)),
            TypeRef::generic("List", vec![TypeRef::id("String")])
        );
    }

    #[test]
    fn test_for_supertype_in_raw_context() {
        let a = generic_type("A", &["T"]);
        let edge = Substitutor::empty().put(var("A", "T"), Some(TypeRef::id("String")));
        let s = Substitutor::for_supertype(&a, &edge, &Substitutor::empty(), true);
        assert_eq!(s.binding(&var("A", "T")), Some(None));

        let s = Substitutor::for_supertype(&a, &edge, &Substitutor::empty(), false);
        assert_eq!(
            s.substitute(&TypeRef::Var(var("A", "T"))),
            TypeRef::id("String")
        );
    }

    #[test]
    fn test_unknown_is_best_effort() {
        let s = Substitutor::empty().put(var("X", "T"), None);
        assert_eq!(s.substitute(&TypeRef::Unknown), TypeRef::Unknown);
    }
}
