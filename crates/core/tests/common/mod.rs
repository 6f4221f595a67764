use hierscope_api::models::{MethodInfo, OBJECT_FQN, SearchScope, TypeInfo, TypeRef};
use hierscope_api::provider::{
    InheritanceProvider, MemberProvider, ModificationTracker, ProgramModel, TypeProvider,
};
use hierscope_core::hierarchy::HierarchicalSignature;
use hierscope_core::{
    EngineConfig, HierarchyMap, HierarchyService, MethodDecl, ProgramSnapshot, TypeDecl,
};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

/// A snapshot that counts how often declared members are read.
///
/// Every hierarchy build reads the members of each type it visits, so the
/// counter tells cached answers from recomputed ones.
#[derive(Default)]
pub struct CountingModel {
    pub snapshot: ProgramSnapshot,
    member_reads: AtomicUsize,
}

#[allow(dead_code)]
impl CountingModel {
    pub fn new(snapshot: ProgramSnapshot) -> Self {
        Self {
            snapshot,
            member_reads: AtomicUsize::new(0),
        }
    }

    pub fn member_reads(&self) -> usize {
        self.member_reads.load(Ordering::SeqCst)
    }
}

impl TypeProvider for CountingModel {
    fn get_type_info(&self, fqn: &str, scope: &SearchScope) -> Option<Arc<TypeInfo>> {
        self.snapshot.get_type_info(fqn, scope)
    }
}

impl InheritanceProvider for CountingModel {
    fn get_superclass(&self, fqn: &str) -> Option<TypeRef> {
        self.snapshot.get_superclass(fqn)
    }

    fn get_interfaces(&self, fqn: &str) -> Vec<TypeRef> {
        self.snapshot.get_interfaces(fqn)
    }
}

impl MemberProvider for CountingModel {
    fn get_methods(&self, type_fqn: &str) -> Vec<Arc<MethodInfo>> {
        self.member_reads.fetch_add(1, Ordering::SeqCst);
        self.snapshot.get_methods(type_fqn)
    }
}

impl ModificationTracker for CountingModel {
    fn modification_count(&self) -> u64 {
        self.snapshot.modification_count()
    }
}

/// `public` instance method with the given parameters returning `void`.
#[allow(dead_code)]
pub fn public(name: &str, params: Vec<TypeRef>) -> MethodDecl {
    params
        .into_iter()
        .fold(MethodDecl::new(name).modifier("public"), MethodDecl::param)
}

#[allow(dead_code)]
pub fn default_method(name: &str) -> MethodDecl {
    MethodDecl::new(name).modifier("public").modifier("default")
}

#[allow(dead_code)]
pub fn abstract_method(name: &str) -> MethodDecl {
    MethodDecl::new(name).modifier("public").modifier("abstract")
}

/// `java.lang.Object` with a few of its methods.
#[allow(dead_code)]
pub fn object_decl() -> TypeDecl {
    TypeDecl::class(OBJECT_FQN)
        .method(
            public("equals", vec![TypeRef::object()]).returns(TypeRef::raw("boolean")),
        )
        .method(public("hashCode", vec![]).returns(TypeRef::raw("int")))
        .method(public("toString", vec![]).returns(TypeRef::id("java.lang.String")))
}

#[allow(dead_code)]
pub fn snapshot_of(decls: Vec<TypeDecl>) -> ProgramSnapshot {
    let snapshot = ProgramSnapshot::new();
    for decl in decls {
        snapshot.upsert(decl);
    }
    snapshot
}

#[allow(dead_code)]
pub fn service_of(decls: Vec<TypeDecl>) -> (Arc<ProgramSnapshot>, HierarchyService) {
    service_with_config(decls, EngineConfig::default())
}

#[allow(dead_code)]
pub fn service_with_config(
    decls: Vec<TypeDecl>,
    config: EngineConfig,
) -> (Arc<ProgramSnapshot>, HierarchyService) {
    let snapshot = Arc::new(snapshot_of(decls));
    let model: Arc<dyn ProgramModel> = snapshot.clone();
    (snapshot, HierarchyService::with_config(model, config))
}

/// The first declared method of `fqn` named `name`.
#[allow(dead_code)]
pub fn method(model: &ProgramSnapshot, fqn: &str, name: &str) -> Arc<MethodInfo> {
    model
        .get_methods_by_name(fqn, name)
        .into_iter()
        .next()
        .unwrap_or_else(|| panic!("{}#{} not declared", fqn, name))
}

/// `decl#name` for every top-level entry, in map order.
#[allow(dead_code)]
pub fn entry_names(map: &HierarchyMap) -> Vec<String> {
    map.signatures().map(describe).collect()
}

#[allow(dead_code)]
pub fn describe(sig: &HierarchicalSignature) -> String {
    format!("{}#{}", sig.signature.declaring_type(), sig.signature.name())
}

/// `decl#name` of every direct super.
#[allow(dead_code)]
pub fn super_names(sig: &HierarchicalSignature) -> Vec<String> {
    sig.supers.iter().map(describe).collect()
}

#[allow(dead_code)]
pub fn only<'a>(map: &'a HierarchyMap, name: &'a str) -> &'a HierarchicalSignature {
    let found: Vec<_> = map.by_name(name).collect();
    assert_eq!(found.len(), 1, "expected exactly one `{}` entry", name);
    found[0]
}
