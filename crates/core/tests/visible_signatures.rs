mod common;

use common::*;
use hierscope_api::models::{OBJECT_FQN, SearchScope, TypeRef};
use hierscope_core::{CancellationToken, EngineConfig, HierarchyError, MethodDecl, TypeDecl};

#[test]
fn test_type_without_supertypes_lists_own_non_private_methods() {
    let (_, service) = service_of(vec![
        TypeDecl::class("com.acme.Plain")
            .method(public("run", vec![]))
            .method(public("run", vec![TypeRef::raw("int")]))
            .method(MethodDecl::new("secret").modifier("private")),
    ]);

    let map = service
        .visible_signatures("com.acme.Plain", &CancellationToken::new())
        .unwrap();
    assert_eq!(entry_names(&map), vec!["com.acme.Plain#run", "com.acme.Plain#run"]);
    assert_eq!(map.len(), 2);
    assert_eq!(map.ambiguous().count(), 0);
    assert!(map.signatures().all(|sig| sig.supers.is_empty()));
}

#[test]
fn test_inherited_methods_are_substituted() {
    let (_, service) = service_of(vec![
        TypeDecl::class("Box")
            .type_param("T")
            .method(public("get", vec![]).returns(TypeRef::id("T")))
            .method(public("put", vec![TypeRef::id("T")])),
        TypeDecl::class("IntBox").extends(TypeRef::generic("Box", vec![TypeRef::id("java.lang.Integer")])),
    ]);

    let map = service
        .visible_signatures("IntBox", &CancellationToken::new())
        .unwrap();
    let get = only(&map, "get");
    assert_eq!(get.signature.return_type(), TypeRef::id("java.lang.Integer"));
    let put = only(&map, "put");
    assert_eq!(
        put.signature.parameter_types(),
        vec![TypeRef::id("java.lang.Integer")]
    );
    assert_eq!(
        put.signature.key(service.symbols()).display(service.symbols()),
        "put(java.lang.Integer)"
    );
}

#[test]
fn test_substitution_composes_across_levels() {
    let (_, service) = service_of(vec![
        TypeDecl::class("A")
            .type_param("T")
            .method(public("f", vec![TypeRef::id("T")])),
        TypeDecl::class("B")
            .type_param("U")
            .extends(TypeRef::generic(
                "A",
                vec![TypeRef::generic("java.util.List", vec![TypeRef::id("U")])],
            )),
        TypeDecl::class("C").extends(TypeRef::generic("B", vec![TypeRef::id("java.lang.String")])),
    ]);

    let map = service.visible_signatures("C", &CancellationToken::new()).unwrap();
    let f = only(&map, "f");
    assert_eq!(
        f.signature.parameter_types(),
        vec![TypeRef::generic(
            "java.util.List",
            vec![TypeRef::id("java.lang.String")]
        )]
    );
}

#[test]
fn test_override_links_super_chain() {
    let (_, service) = service_of(vec![
        TypeDecl::class("A").method(public("m", vec![])),
        TypeDecl::class("B").extends(TypeRef::id("A")).method(public("m", vec![])),
        TypeDecl::class("C").extends(TypeRef::id("B")),
    ]);

    let map = service.visible_signatures("C", &CancellationToken::new()).unwrap();
    let m = only(&map, "m");
    assert_eq!(describe(m), "B#m");
    assert_eq!(super_names(m), vec!["A#m"]);
}

#[test]
fn test_own_entries_come_before_inherited_ones() {
    let (_, service) = service_of(vec![
        TypeDecl::class("A").method(public("inherited", vec![])),
        TypeDecl::class("B").extends(TypeRef::id("A")).method(public("own", vec![])),
    ]);

    let map = service.visible_signatures("B", &CancellationToken::new()).unwrap();
    assert_eq!(entry_names(&map), vec!["B#own", "A#inherited"]);
}

#[test]
fn test_implicit_object_supertype() {
    let decls = || {
        vec![
            object_decl(),
            TypeDecl::class("A").method(public("m", vec![])),
        ]
    };

    let (_, service) = service_of(decls());
    let map = service.visible_signatures("A", &CancellationToken::new()).unwrap();
    assert!(map.by_name("hashCode").next().is_some());
    assert_eq!(map.len(), 4);

    let config = EngineConfig {
        implicit_top_type: false,
        ..EngineConfig::default()
    };
    let (_, service) = service_with_config(decls(), config);
    let map = service.visible_signatures("A", &CancellationToken::new()).unwrap();
    assert_eq!(entry_names(&map), vec!["A#m"]);
}

#[test]
fn test_object_method_redeclared_in_interface() {
    let (_, service) = service_of(vec![
        object_decl(),
        TypeDecl::interface("I").method(
            abstract_method("equals")
                .param(TypeRef::object())
                .returns(TypeRef::raw("boolean")),
        ),
        TypeDecl::class("C").implements(TypeRef::id("I")),
    ]);

    let map = service.visible_signatures("C", &CancellationToken::new()).unwrap();
    let equals = only(&map, "equals");
    assert_eq!(describe(equals), format!("{}#equals", OBJECT_FQN));
    assert_eq!(super_names(equals), vec!["I#equals"]);
}

#[test]
fn test_anonymous_class_has_single_base() {
    let (_, service) = service_of(vec![
        TypeDecl::interface("Runnable").method(abstract_method("run")),
        TypeDecl::anonymous("Outer$1", TypeRef::id("Runnable")).method(public("run", vec![])),
    ]);

    let map = service
        .visible_signatures("Outer$1", &CancellationToken::new())
        .unwrap();
    let run = only(&map, "run");
    assert_eq!(describe(run), "Outer$1#run");
    assert_eq!(super_names(run), vec!["Runnable#run"]);
}

#[test]
fn test_scope_limits_supertypes() {
    let (_, service) = service_of(vec![
        TypeDecl::class("org.lib.Base").method(public("inherited", vec![])),
        TypeDecl::class("com.acme.Derived")
            .extends(TypeRef::id("org.lib.Base"))
            .method(public("own", vec![])),
    ]);
    let cancel = CancellationToken::new();

    let narrow = service
        .visible_signatures_in("com.acme.Derived", &SearchScope::packages(["com.acme"]), &cancel)
        .unwrap();
    assert_eq!(entry_names(&narrow), vec!["com.acme.Derived#own"]);

    let wide = service
        .visible_signatures_in("com.acme.Derived", &SearchScope::All, &cancel)
        .unwrap();
    assert_eq!(wide.len(), 2);
}

#[test]
fn test_unknown_type_is_not_found() {
    let (_, service) = service_of(vec![]);
    let err = service
        .visible_signatures("nope.Missing", &CancellationToken::new())
        .unwrap_err();
    assert!(matches!(err, HierarchyError::TypeNotFound(ref fqn) if fqn == "nope.Missing"));
}

#[test]
fn test_build_full_map_with_name_filter_and_privates() {
    let (_, service) = service_of(vec![
        TypeDecl::class("A")
            .method(MethodDecl::new("m").modifier("private"))
            .method(public("n", vec![])),
    ]);

    let map = service
        .build_full_map(
            "A",
            Some("m"),
            &hierscope_core::Substitutor::empty(),
            true,
            &SearchScope::All,
            &CancellationToken::new(),
        )
        .unwrap();
    assert_eq!(entry_names(&map), vec!["A#m"]);
}

#[test]
fn test_enum_inherits_interface_methods() {
    let (_, service) = service_of(vec![
        object_decl(),
        TypeDecl::interface("Named").method(abstract_method("label").returns(TypeRef::id("java.lang.String"))),
        TypeDecl::enumeration("Color")
            .implements(TypeRef::id("Named"))
            .method(public("label", vec![]).returns(TypeRef::id("java.lang.String"))),
    ]);

    let map = service.visible_signatures("Color", &CancellationToken::new()).unwrap();
    let label = only(&map, "label");
    assert_eq!(describe(label), "Color#label");
    assert_eq!(super_names(label), vec!["Named#label"]);
    // An enum without an extends clause still sees java.lang.Object.
    assert!(map.by_name("hashCode").next().is_some());
}
