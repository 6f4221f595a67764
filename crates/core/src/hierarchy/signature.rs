use hierscope_api::models::{MethodId, MethodInfo, TypeParameter, TypeRef, TypeVarOwner};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use super::substitution::Substitutor;
use crate::intern::{Symbol, SymbolTable};

/// A method as seen from a particular point of the hierarchy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MethodSignature {
    pub method: Arc<MethodInfo>,
    pub substitutor: Substitutor,
    /// Seen through a raw supertype: every visible type is erased.
    pub is_raw: bool,
}

impl MethodSignature {
    pub fn new(method: Arc<MethodInfo>, substitutor: Substitutor, is_raw: bool) -> Self {
        Self {
            method,
            substitutor,
            is_raw,
        }
    }

    /// The declaration itself, under the identity substitution.
    pub fn declared(method: Arc<MethodInfo>) -> Self {
        Self::new(method, Substitutor::empty(), false)
    }

    pub fn id(&self) -> &MethodId {
        &self.method.id
    }

    pub fn name(&self) -> &str {
        &self.method.name
    }

    pub fn declaring_type(&self) -> &str {
        &self.method.declaring_type
    }

    pub fn parameter_count(&self) -> usize {
        self.method.parameters.len()
    }

    fn visible(&self, ty: &TypeRef) -> TypeRef {
        let ty = self.substitutor.substitute(ty);
        if self.is_raw { ty.erasure() } else { ty }
    }

    pub fn parameter_types(&self) -> Vec<TypeRef> {
        self.method
            .parameter_types()
            .map(|ty| self.visible(ty))
            .collect()
    }

    pub fn return_type(&self) -> TypeRef {
        self.visible(&self.method.return_type)
    }

    pub fn erased_parameter_types(&self) -> Vec<TypeRef> {
        self.parameter_types().iter().map(TypeRef::erasure).collect()
    }

    /// Method type parameters; a raw view has none.
    pub fn type_parameters(&self) -> &[TypeParameter] {
        if self.is_raw {
            &[]
        } else {
            &self.method.type_parameters
        }
    }

    pub fn key(&self, symbols: &SymbolTable) -> ErasureKey {
        ErasureKey {
            name: symbols.intern(&self.method.name),
            params: self
                .erased_parameter_types()
                .iter()
                .map(|ty| symbols.intern(&ty.to_string()))
                .collect(),
        }
    }
}

impl fmt::Display for MethodSignature {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}(", self.declaring_type(), self.name())?;
        for (i, ty) in self.parameter_types().iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", ty)?;
        }
        f.write_str(")")
    }
}

/// Interned method name plus erased visible parameter types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErasureKey {
    pub name: Symbol,
    pub params: Vec<Symbol>,
}

impl ErasureKey {
    pub fn display(&self, symbols: &SymbolTable) -> String {
        let params: Vec<&str> = self.params.iter().map(|p| symbols.resolve(*p)).collect();
        format!("{}({})", symbols.resolve(self.name), params.join(", "))
    }
}

/// A visible signature together with the signatures it overrides.
///
/// Supers are owned: cloning copies the whole forest, so two entries never
/// share a branch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchicalSignature {
    pub signature: MethodSignature,
    pub supers: Vec<HierarchicalSignature>,
}

impl HierarchicalSignature {
    pub fn new(signature: MethodSignature) -> Self {
        Self {
            signature,
            supers: Vec::new(),
        }
    }

    pub fn method(&self) -> &Arc<MethodInfo> {
        &self.signature.method
    }

    pub fn id(&self) -> &MethodId {
        self.signature.id()
    }

    /// Whether `id` occurs anywhere among the (transitive) supers.
    pub fn has_super(&self, id: &MethodId) -> bool {
        self.supers
            .iter()
            .any(|sup| sup.id() == id || sup.has_super(id))
    }

    /// Every transitive super method, depth first, each listed once.
    pub fn all_super_methods(&self) -> Vec<Arc<MethodInfo>> {
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        self.collect_supers(&mut seen, &mut out);
        out
    }

    fn collect_supers(&self, seen: &mut HashSet<MethodId>, out: &mut Vec<Arc<MethodInfo>>) {
        for sup in &self.supers {
            if seen.insert(sup.id().clone()) {
                out.push(sup.method().clone());
            }
            sup.collect_supers(seen, out);
        }
    }
}

/// Substitutor renaming `from`'s method type parameters onto `to`'s.
///
/// `None` when the generic arities differ.
pub fn method_renaming(from: &MethodSignature, to: &MethodSignature) -> Option<Substitutor> {
    let from_params = from.type_parameters();
    let to_params = to.type_parameters();
    if from_params.len() != to_params.len() {
        return None;
    }
    let from_owner = TypeVarOwner::Method(from.id().clone());
    let to_owner = TypeVarOwner::Method(to.id().clone());
    Some(
        from_params
            .iter()
            .zip(to_params)
            .fold(Substitutor::empty(), |acc, (f, t)| {
                acc.put(
                    f.as_var(from_owner.clone()),
                    Some(TypeRef::Var(t.as_var(to_owner.clone()))),
                )
            }),
    )
}

/// JLS 8.4.2: `sub`'s signature equals `sup`'s (modulo method type
/// parameter renaming), or equals its erasure when `sub` is not generic.
pub fn is_subsignature(sup: &MethodSignature, sub: &MethodSignature) -> bool {
    if sup.name() != sub.name() || sup.parameter_count() != sub.parameter_count() {
        return false;
    }
    if sup.is_raw || sub.is_raw {
        return sup.erased_parameter_types() == sub.erased_parameter_types();
    }

    let sub_params = sub.parameter_types();
    let sup_params = sup.parameter_types();
    if let Some(renaming) = method_renaming(sup, sub) {
        let renamed: Vec<TypeRef> = sup_params.iter().map(|t| renaming.substitute(t)).collect();
        if renamed == sub_params {
            return true;
        }
    }
    sub.type_parameters().is_empty()
        && sup_params
            .iter()
            .map(TypeRef::erasure)
            .eq(sub_params.iter().cloned())
}
