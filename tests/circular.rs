use named_di::{DiError, Injectable, NamedServices, Resolver, ResolverContext, DiResult, ServiceCollection};
use std::sync::Arc;

#[test]
fn test_self_circular_dependency() {
    struct SelfReferencing;

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<SelfReferencing, _>(|r| {
        let _ = r.get::<SelfReferencing>();
        SelfReferencing
    });

    let sp = sc.build();
    match sp.get::<SelfReferencing>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 2);
            assert!(path[0].contains("SelfReferencing"));
            assert!(path[1].contains("SelfReferencing"));
        }
        _ => panic!("Expected Circular error"),
    }
}

#[test]
fn test_two_level_circular_through_activation() {
    struct A {
        _b: Arc<B>,
    }
    struct B {
        _a: Arc<A>,
    }

    impl Injectable for A {
        fn activate(r: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(A { _b: r.get::<B>()? })
        }
    }
    impl Injectable for B {
        fn activate(r: &ResolverContext<'_>) -> DiResult<Self> {
            Ok(B { _a: r.get::<A>()? })
        }
    }

    let mut sc = ServiceCollection::new();
    sc.add_transient::<A, A>();
    sc.add_transient::<B, B>();

    let sp = sc.build();
    match sp.get::<A>() {
        Err(DiError::Circular(path)) => {
            assert_eq!(path.len(), 3);
            assert!(path[0].ends_with("::A"));
            assert!(path[1].ends_with("::B"));
            assert!(path[2].ends_with("::A"));
        }
        Err(other) => panic!("Expected Circular error, got {}", other),
        Ok(_) => panic!("Expected Circular error"),
    }

    // The resolution stack unwinds cleanly, so unrelated lookups still work
    assert!(matches!(sp.get::<String>(), Err(DiError::NotFound { .. })));
}

#[test]
fn test_named_self_reference_is_circular() {
    #[derive(Debug)]
    struct Node;

    let named = NamedServices::new(Arc::new(named_di::MarkerRegistry::new()));
    let lookup = named.clone();
    let mut sc = ServiceCollection::new();
    named
        .add_transient_factory_as::<Node, Node, _, _>(&mut sc, "loop", move |r| {
            let _ = lookup.get_named::<Node, _>(r, "loop");
            Node
        })
        .unwrap();

    let sp = sc.build();
    let err = named.get_required_named::<Node, _>(&sp, "loop").unwrap_err();
    match err {
        DiError::Circular(path) => {
            assert_eq!(path.len(), 2);
            assert!(path[0].contains("\"loop\""));
        }
        other => panic!("Expected Circular error, got {}", other),
    }
}
