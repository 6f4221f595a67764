//! Type parameter linking.
//!
//! Declarations refer to type parameters by bare name (`Id("T")`). Linking
//! rewrites those names into [`TypeVar`]s bound to their declaring type or
//! method, with the erasure of the leftmost bound precomputed. Method type
//! parameters shadow type parameters of the enclosing type.

use hierscope_api::models::{TypeParameter, TypeRef, TypeVar, TypeVarOwner};
use std::collections::{HashMap, HashSet};

/// Names in scope at a declaration site.
#[derive(Debug, Clone, Default)]
pub struct VarScope {
    vars: HashMap<String, TypeVar>,
}

impl VarScope {
    pub fn get(&self, name: &str) -> Option<&TypeVar> {
        self.vars.get(name)
    }

    /// Declare `params` on `owner`, on top of `self`.
    ///
    /// Returns the nested scope and the parameters with linked bounds.
    pub fn declare(
        &self,
        owner: &TypeVarOwner,
        params: &[TypeParameter],
    ) -> (VarScope, Vec<TypeParameter>) {
        if params.is_empty() {
            return (self.clone(), Vec::new());
        }

        let mut scope = self.clone();
        for param in params {
            let mut seen = HashSet::new();
            let erasure = erasure_of(&param.name, params, self, &mut seen);
            scope.vars.insert(
                param.name.clone(),
                TypeVar::new(param.name.clone(), owner.clone()).with_erasure(erasure),
            );
        }

        let linked = params
            .iter()
            .map(|param| TypeParameter {
                name: param.name.clone(),
                bounds: param.bounds.iter().map(|b| scope.link(b)).collect(),
            })
            .collect();
        (scope, linked)
    }

    /// Rewrite parameter names in `ty` into variables.
    pub fn link(&self, ty: &TypeRef) -> TypeRef {
        if self.vars.is_empty() {
            return ty.clone();
        }
        match ty {
            TypeRef::Id(name) | TypeRef::Raw(name) => match self.vars.get(name) {
                Some(var) => TypeRef::Var(var.clone()),
                None => ty.clone(),
            },
            TypeRef::Generic { base, args } => TypeRef::Generic {
                base: base.clone(),
                args: args.iter().map(|arg| self.link(arg)).collect(),
            },
            TypeRef::Array {
                element,
                dimensions,
            } => TypeRef::array(self.link(element), *dimensions),
            TypeRef::Wildcard {
                bound,
                is_upper_bound,
            } => TypeRef::Wildcard {
                bound: bound.as_ref().map(|b| Box::new(self.link(b))),
                is_upper_bound: *is_upper_bound,
            },
            _ => ty.clone(),
        }
    }
}

/// Erasure of parameter `name`: the class of its leftmost bound, following
/// bounds that are themselves parameters. `None` means `java.lang.Object`.
fn erasure_of(
    name: &str,
    params: &[TypeParameter],
    outer: &VarScope,
    seen: &mut HashSet<String>,
) -> Option<String> {
    if !seen.insert(name.to_string()) {
        // `T extends U, U extends T` is malformed; fall back to Object.
        return None;
    }
    let param = params.iter().find(|p| p.name == name)?;
    let bound = param.bounds.first()?;
    match bound {
        TypeRef::Id(bound_name) | TypeRef::Raw(bound_name) => {
            if params.iter().any(|p| &p.name == bound_name) {
                erasure_of(bound_name, params, outer, seen)
            } else if let Some(var) = outer.get(bound_name) {
                var.erasure.clone()
            } else {
                bound.class_fqn().map(str::to_string)
            }
        }
        other => other.class_fqn().map(str::to_string),
    }
}
