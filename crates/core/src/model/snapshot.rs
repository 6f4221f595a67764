use dashmap::DashMap;
use hierscope_api::models::{
    MemberKind, MethodId, MethodInfo, ParameterInfo, SearchScope, TypeInfo, TypeKind,
    TypeParameter, TypeRef, TypeVarOwner,
};
use hierscope_api::provider::{
    InheritanceProvider, MemberProvider, ModificationTracker, TypeProvider,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use super::link::VarScope;
use crate::error::Result;

fn yes() -> bool {
    true
}

/// Declaration of one type, before linking.
///
/// Type parameters are referenced by bare name (`TypeRef::Id("T")`) in
/// bounds, supertypes and method signatures.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TypeDecl {
    pub fqn: String,
    pub kind: TypeKind,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub superclass: Option<TypeRef>,
    #[serde(default)]
    pub interfaces: Vec<TypeRef>,
    #[serde(default)]
    pub methods: Vec<MethodDecl>,
}

impl TypeDecl {
    pub fn new(fqn: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            fqn: fqn.into(),
            kind,
            modifiers: Vec::new(),
            type_parameters: Vec::new(),
            superclass: None,
            interfaces: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn class(fqn: impl Into<String>) -> Self {
        Self::new(fqn, TypeKind::Class)
    }

    pub fn interface(fqn: impl Into<String>) -> Self {
        Self::new(fqn, TypeKind::Interface)
    }

    pub fn enumeration(fqn: impl Into<String>) -> Self {
        Self::new(fqn, TypeKind::Enum)
    }

    pub fn annotation(fqn: impl Into<String>) -> Self {
        Self::new(fqn, TypeKind::Annotation)
    }

    /// An anonymous class over `base`.
    pub fn anonymous(fqn: impl Into<String>, base: TypeRef) -> Self {
        let mut decl = Self::new(fqn, TypeKind::Anonymous);
        decl.superclass = Some(base);
        decl
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    pub fn type_param(self, name: impl Into<String>) -> Self {
        self.type_param_bounded(name, Vec::new())
    }

    pub fn type_param_bounded(mut self, name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        self.type_parameters.push(TypeParameter::bounded(name, bounds));
        self
    }

    /// The `extends` clause: the superclass of a class, a super-interface of
    /// an interface.
    pub fn extends(mut self, ty: TypeRef) -> Self {
        if matches!(self.kind, TypeKind::Interface | TypeKind::Annotation) {
            self.interfaces.push(ty);
        } else {
            self.superclass = Some(ty);
        }
        self
    }

    pub fn implements(mut self, ty: TypeRef) -> Self {
        self.interfaces.push(ty);
        self
    }

    pub fn method(mut self, method: MethodDecl) -> Self {
        self.methods.push(method);
        self
    }
}

/// Declaration of one method or constructor, before linking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MethodDecl {
    pub name: String,
    #[serde(default = "TypeRef::void")]
    pub return_type: TypeRef,
    #[serde(default)]
    pub parameters: Vec<TypeRef>,
    /// The last parameter is declared with `...`.
    #[serde(default)]
    pub varargs: bool,
    #[serde(default)]
    pub type_parameters: Vec<TypeParameter>,
    #[serde(default)]
    pub modifiers: Vec<String>,
    #[serde(default)]
    pub constructor: bool,
    #[serde(default = "yes")]
    pub physical: bool,
    #[serde(default = "yes")]
    pub valid: bool,
}

impl MethodDecl {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            return_type: TypeRef::void(),
            parameters: Vec::new(),
            varargs: false,
            type_parameters: Vec::new(),
            modifiers: Vec::new(),
            constructor: false,
            physical: true,
            valid: true,
        }
    }

    pub fn constructor(name: impl Into<String>) -> Self {
        let mut decl = Self::new(name);
        decl.constructor = true;
        decl
    }

    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = ty;
        self
    }

    pub fn param(mut self, ty: TypeRef) -> Self {
        self.parameters.push(ty);
        self
    }

    pub fn varargs(mut self) -> Self {
        self.varargs = true;
        self
    }

    pub fn type_param(self, name: impl Into<String>) -> Self {
        self.type_param_bounded(name, Vec::new())
    }

    pub fn type_param_bounded(mut self, name: impl Into<String>, bounds: Vec<TypeRef>) -> Self {
        self.type_parameters.push(TypeParameter::bounded(name, bounds));
        self
    }

    pub fn modifier(mut self, modifier: impl Into<String>) -> Self {
        self.modifiers.push(modifier.into());
        self
    }

    /// A copy that does not live in any source file.
    pub fn synthetic(mut self) -> Self {
        self.physical = false;
        self
    }

    /// A declaration already removed from the program.
    pub fn stale(mut self) -> Self {
        self.valid = false;
        self
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct SnapshotFile {
    #[serde(default)]
    types: Vec<TypeDecl>,
}

#[derive(Debug, Clone)]
struct TypeEntry {
    info: Arc<TypeInfo>,
    superclass: Option<TypeRef>,
    interfaces: Vec<TypeRef>,
    methods: Vec<Arc<MethodInfo>>,
}

/// Concurrent in-memory program model.
///
/// Every upsert or removal advances the modification stamp.
#[derive(Debug, Default)]
pub struct ProgramSnapshot {
    types: DashMap<String, TypeEntry>,
    stamp: AtomicU64,
}

impl ProgramSnapshot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a snapshot from `{ "types": [ ... ] }`.
    pub fn from_json(json: &str) -> Result<Self> {
        let snapshot = Self::new();
        snapshot.load_json(json)?;
        Ok(snapshot)
    }

    /// Add the declarations in `json`, returning how many types were loaded.
    pub fn load_json(&self, json: &str) -> Result<usize> {
        let file: SnapshotFile = serde_json::from_str(json)?;
        let count = file.types.len();
        for decl in file.types {
            self.upsert(decl);
        }
        tracing::debug!("loaded {} type declarations", count);
        Ok(count)
    }

    /// Insert or replace a type declaration.
    pub fn upsert(&self, decl: TypeDecl) {
        let entry = link_decl(decl);
        self.types.insert(entry.info.fqn.clone(), entry);
        self.stamp.fetch_add(1, Ordering::AcqRel);
    }

    pub fn remove(&self, fqn: &str) -> bool {
        let removed = self.types.remove(fqn).is_some();
        if removed {
            self.stamp.fetch_add(1, Ordering::AcqRel);
        }
        removed
    }

    /// Advance the stamp without changing any declaration.
    pub fn touch(&self) {
        self.stamp.fetch_add(1, Ordering::AcqRel);
    }

    pub fn contains(&self, fqn: &str) -> bool {
        self.types.contains_key(fqn)
    }

    pub fn type_count(&self) -> usize {
        self.types.len()
    }

    /// Look up a declared method by identity.
    pub fn method(&self, id: &MethodId) -> Option<Arc<MethodInfo>> {
        let entry = self.types.get(&id.declaring_type)?;
        entry.methods.get(id.index as usize).cloned()
    }
}

fn link_decl(decl: TypeDecl) -> TypeEntry {
    let owner = TypeVarOwner::Type(decl.fqn.clone());
    let (scope, type_parameters) = VarScope::default().declare(&owner, &decl.type_parameters);

    let methods = decl
        .methods
        .iter()
        .enumerate()
        .map(|(index, method)| Arc::new(link_method(&decl.fqn, index as u32, method, &scope)))
        .collect();

    TypeEntry {
        info: Arc::new(TypeInfo {
            fqn: decl.fqn,
            kind: decl.kind,
            modifiers: decl.modifiers,
            type_parameters,
        }),
        superclass: decl.superclass.as_ref().map(|s| scope.link(s)),
        interfaces: decl.interfaces.iter().map(|i| scope.link(i)).collect(),
        methods,
    }
}

fn link_method(declaring_type: &str, index: u32, decl: &MethodDecl, outer: &VarScope) -> MethodInfo {
    let id = MethodId::new(declaring_type, index);
    let owner = TypeVarOwner::Method(id.clone());
    let (scope, type_parameters) = outer.declare(&owner, &decl.type_parameters);

    let last = decl.parameters.len().saturating_sub(1);
    let parameters = decl
        .parameters
        .iter()
        .enumerate()
        .map(|(i, ty)| ParameterInfo {
            name: format!("arg{}", i),
            type_ref: scope.link(ty),
            is_varargs: decl.varargs && i == last,
        })
        .collect();

    MethodInfo {
        id,
        name: decl.name.clone(),
        kind: if decl.constructor {
            MemberKind::Constructor
        } else {
            MemberKind::Method
        },
        declaring_type: declaring_type.to_string(),
        return_type: scope.link(&decl.return_type),
        parameters,
        type_parameters,
        modifiers: decl.modifiers.clone(),
        is_physical: decl.physical,
        is_valid: decl.valid,
    }
}

impl TypeProvider for ProgramSnapshot {
    fn get_type_info(&self, fqn: &str, scope: &SearchScope) -> Option<Arc<TypeInfo>> {
        if !scope.contains(fqn) {
            return None;
        }
        self.types.get(fqn).map(|entry| entry.info.clone())
    }
}

impl InheritanceProvider for ProgramSnapshot {
    fn get_superclass(&self, fqn: &str) -> Option<TypeRef> {
        self.types.get(fqn).and_then(|entry| entry.superclass.clone())
    }

    fn get_interfaces(&self, fqn: &str) -> Vec<TypeRef> {
        self.types
            .get(fqn)
            .map(|entry| entry.interfaces.clone())
            .unwrap_or_default()
    }
}

impl MemberProvider for ProgramSnapshot {
    fn get_methods(&self, type_fqn: &str) -> Vec<Arc<MethodInfo>> {
        self.types
            .get(type_fqn)
            .map(|entry| entry.methods.clone())
            .unwrap_or_default()
    }
}

impl ModificationTracker for ProgramSnapshot {
    fn modification_count(&self) -> u64 {
        self.stamp.load(Ordering::Acquire)
    }
}
