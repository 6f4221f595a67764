mod common;

use common::*;
use hierscope_api::models::{SearchScope, TypeRef};
use hierscope_core::hierarchy::SupertypeWalker;
use hierscope_core::{CancellationToken, MethodDecl, TypeDecl};

#[test]
fn test_raw_supertype_erases_and_still_matches() {
    let (snapshot, service) = service_of(vec![
        TypeDecl::class("Box")
            .type_param("T")
            .method(public("put", vec![TypeRef::id("T")]))
            .method(public(
                "putAll",
                vec![TypeRef::generic("java.util.List", vec![TypeRef::id("T")])],
            )),
        TypeDecl::class("RawBox")
            .extends(TypeRef::id("Box"))
            .method(public("put", vec![TypeRef::object()]))
            .method(public("putAll", vec![TypeRef::id("java.util.List")])),
    ]);
    let cancel = CancellationToken::new();

    let map = service.visible_signatures("RawBox", &cancel).unwrap();
    assert_eq!(map.ambiguous().count(), 0);
    for name in ["put", "putAll"] {
        let entry = only(&map, name);
        assert_eq!(describe(entry), format!("RawBox#{}", name));
        assert_eq!(super_names(entry), vec![format!("Box#{}", name)]);
        assert!(entry.supers[0].signature.is_raw);
    }

    let put_all = method(&snapshot, "Box", "putAll");
    let raw_view = &only(&map, "putAll").supers[0];
    assert_eq!(raw_view.id(), &put_all.id);
    assert_eq!(
        raw_view.signature.parameter_types(),
        vec![TypeRef::id("java.util.List")]
    );
}

#[test]
fn test_raw_context_propagates_to_generic_ancestors() {
    let (_, service) = service_of(vec![
        TypeDecl::interface("Source")
            .type_param("E")
            .method(abstract_method("take").returns(TypeRef::id("E"))),
        TypeDecl::class("Impl")
            .type_param("X")
            .implements(TypeRef::generic("Source", vec![TypeRef::id("X")])),
        TypeDecl::class("Legacy").extends(TypeRef::id("Impl")),
    ]);

    let map = service
        .visible_signatures("Legacy", &CancellationToken::new())
        .unwrap();
    let take = only(&map, "take");
    assert!(take.signature.is_raw);
    assert_eq!(take.signature.return_type(), TypeRef::object());
}

#[test]
fn test_generic_methods_override_after_renaming() {
    let (snapshot, service) = service_of(vec![
        TypeDecl::interface("Mapper").method(
            abstract_method("map")
                .type_param("T")
                .param(TypeRef::id("T"))
                .returns(TypeRef::id("T")),
        ),
        TypeDecl::class("Identity")
            .implements(TypeRef::id("Mapper"))
            .method(
                public("map", vec![])
                    .type_param("U")
                    .param(TypeRef::id("U"))
                    .returns(TypeRef::id("U")),
            ),
    ]);
    let cancel = CancellationToken::new();

    let map = service.visible_signatures("Identity", &cancel).unwrap();
    let entry = only(&map, "map");
    assert_eq!(describe(entry), "Identity#map");
    assert_eq!(super_names(entry), vec!["Mapper#map"]);

    let sub = method(&snapshot, "Identity", "map");
    let sup = method(&snapshot, "Mapper", "map");
    assert!(service.is_super_method_smart(&sub, &sup, &cancel).unwrap());
}

#[test]
fn test_bounded_parameter_erases_to_bound() {
    let (_, service) = service_of(vec![
        TypeDecl::class("Numbers")
            .type_param_bounded("N", vec![TypeRef::id("java.lang.Number")])
            .method(public("add", vec![TypeRef::id("N")])),
    ]);

    let map = service
        .visible_signatures("Numbers", &CancellationToken::new())
        .unwrap();
    let (key, _) = map.iter().next().unwrap();
    assert_eq!(key.display(service.symbols()), "add(java.lang.Number)");
}

#[test]
fn test_generic_overloads_distinct_by_erasure() {
    let (_, service) = service_of(vec![
        TypeDecl::class("Sink")
            .type_param("T")
            .method(public("accept", vec![TypeRef::id("T")]))
            .method(public("accept", vec![TypeRef::id("java.lang.String")])),
        TypeDecl::class("IntSink").extends(TypeRef::generic("Sink", vec![TypeRef::id("java.lang.Integer")])),
    ]);

    let map = service
        .visible_signatures("IntSink", &CancellationToken::new())
        .unwrap();
    assert_eq!(map.len(), 2);
    assert_eq!(map.ambiguous().count(), 0);
}

#[test]
fn test_instantiated_receiver_is_captured() {
    let snapshot = snapshot_of(vec![
        TypeDecl::interface("java.util.Collection").type_param("E"),
        TypeDecl::interface("java.util.List")
            .type_param("E")
            .extends(TypeRef::generic("java.util.Collection", vec![TypeRef::id("E")])),
    ]);
    let scope = SearchScope::All;
    let walker = SupertypeWalker::new(&snapshot, &scope, true);

    let receiver = TypeRef::generic(
        "java.util.List",
        vec![TypeRef::extends(TypeRef::id("java.lang.Number"))],
    );
    let supers = walker.supertypes_of(&receiver);
    assert_eq!(supers.len(), 1);
    let TypeRef::Generic { args, .. } = &supers[0] else {
        panic!("expected an instantiated Collection");
    };
    let TypeRef::Captured(cap) = &args[0] else {
        panic!("wildcard should be captured");
    };
    assert_eq!(*cap.upper, TypeRef::id("java.lang.Number"));
    assert!(walker.is_inheritor("java.util.List", "java.util.Collection", true));
    assert!(
        walker
            .as_supertype(&receiver, "java.util.Collection")
            .is_some()
    );
}

#[test]
fn test_method_type_parameter_shadows_class_parameter() {
    let (_, service) = service_of(vec![
        TypeDecl::class("Holder")
            .type_param("T")
            .method(MethodDecl::new("convert").modifier("public").type_param("T").param(TypeRef::id("T"))),
        TypeDecl::class("StringHolder").extends(TypeRef::generic("Holder", vec![TypeRef::id("java.lang.String")])),
    ]);

    let map = service
        .visible_signatures("StringHolder", &CancellationToken::new())
        .unwrap();
    let (key, _) = map.iter().next().unwrap();
    // The method's own T is untouched by the class substitution.
    assert_eq!(key.display(service.symbols()), "convert(java.lang.Object)");
}
