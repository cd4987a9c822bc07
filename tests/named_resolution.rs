/// Named resolution through the facade, on both the native and compound-key paths.

use named_di::{
    implements, DiError, DiResult, Injectable, Key, MarkerRegistry, NamedServices, Resolver, ResolverContext,
    ResolverCore, ServiceCollection, ServiceType,
};
use std::sync::Arc;

trait ITestService: Send + Sync {
    fn kind(&self) -> &'static str;
}

impl std::fmt::Debug for dyn ITestService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.kind())
    }
}

struct TestService1;
struct TestService2;

impl ITestService for TestService1 {
    fn kind(&self) -> &'static str {
        "one"
    }
}

impl ITestService for TestService2 {
    fn kind(&self) -> &'static str {
        "two"
    }
}

impl Injectable for TestService1 {
    fn activate(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(TestService1)
    }
}

impl Injectable for TestService2 {
    fn activate(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(TestService2)
    }
}

implements!(dyn ITestService => [TestService1, TestService2]);

fn isolated() -> NamedServices {
    NamedServices::new(Arc::new(MarkerRegistry::new()))
}

fn both_paths() -> Vec<(&'static str, ServiceCollection)> {
    // Trace output is visible with `--nocapture`
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();

    vec![
        ("fallback", ServiceCollection::new()),
        ("native", ServiceCollection::with_native_naming()),
    ]
}

#[test]
fn test_named_singleton_end_to_end() {
    for (path, mut sc) in both_paths() {
        let named = isolated();
        named
            .add_singleton_as::<dyn ITestService, TestService1, _>(&mut sc, "svc1")
            .unwrap();
        let sp = sc.build();

        assert!(sp.try_get::<dyn ITestService>().unwrap().is_none(), "{}", path);

        let first = named.get_named::<dyn ITestService, _>(&sp, "svc1").unwrap().unwrap();
        assert_eq!(first.kind(), "one", "{}", path);

        let second = named.get_required_named::<dyn ITestService, _>(&sp, "svc1").unwrap();
        assert!(Arc::ptr_eq(&first, &second), "{}", path);
    }
}

#[test]
fn test_two_transients_under_one_name() {
    for (path, mut sc) in both_paths() {
        let named = isolated();
        named
            .add_transient_as::<dyn ITestService, TestService1, _>(&mut sc, "svc1")
            .unwrap();
        named
            .add_transient_as::<dyn ITestService, TestService2, _>(&mut sc, "svc1")
            .unwrap();
        let sp = sc.build();

        let all = named.get_all_named::<dyn ITestService, _>(&sp, "svc1").unwrap();
        let mut kinds: Vec<_> = all.iter().map(|s| s.kind()).collect();
        kinds.sort_unstable();
        assert_eq!(kinds, vec!["one", "two"], "{}", path);

        // Single resolution picks the last registration
        let last = named.get_required_named::<dyn ITestService, _>(&sp, "svc1").unwrap();
        assert_eq!(last.kind(), "two", "{}", path);
    }
}

#[test]
fn test_missing_required_names_type_and_name() {
    for (path, sc) in both_paths() {
        let named = isolated();
        let sp = sc.build();

        let err = named
            .get_required_named::<dyn ITestService, _>(&sp, "missing")
            .unwrap_err();
        assert!(err.is_not_found(), "{}", path);
        let message = err.to_string();
        assert!(message.contains("ITestService"), "{}: {}", path, message);
        assert!(message.contains("missing"), "{}: {}", path, message);
    }
}

#[test]
fn test_round_trip_is_keyed_by_type_and_name() {
    for (path, mut sc) in both_paths() {
        let named = isolated();
        named
            .add_singleton_as::<dyn ITestService, TestService1, _>(&mut sc, "a")
            .unwrap();
        let sp = sc.build();

        assert!(named.get_named::<dyn ITestService, _>(&sp, "a").unwrap().is_some(), "{}", path);
        assert!(named.get_named::<dyn ITestService, _>(&sp, "b").unwrap().is_none(), "{}", path);
        assert!(named.get_named::<TestService1, _>(&sp, "a").unwrap().is_none(), "{}", path);
        assert!(named.get_all_named::<dyn ITestService, _>(&sp, "b").unwrap().is_empty(), "{}", path);
    }
}

#[test]
fn test_names_are_case_insensitive() {
    for (path, mut sc) in both_paths() {
        let named = isolated();
        named
            .add_singleton_as::<dyn ITestService, TestService2, _>(&mut sc, "Primary")
            .unwrap();
        let sp = sc.build();

        for name in ["Primary", "PRIMARY", "primary", "pRiMaRy"] {
            let found = named.get_required_named::<dyn ITestService, _>(&sp, name).unwrap();
            assert_eq!(found.kind(), "two", "{} / {}", path, name);
        }
    }
}

#[test]
fn test_unnamed_registrations_do_not_answer_named_lookups() {
    for (path, mut sc) in both_paths() {
        let named = isolated();
        sc.add_transient::<dyn ITestService, TestService1>();
        named
            .add_transient_as::<dyn ITestService, TestService2, _>(&mut sc, "special")
            .unwrap();
        let sp = sc.build();

        assert_eq!(sp.get_required::<dyn ITestService>().kind(), "one", "{}", path);
        assert_eq!(sp.get_all::<dyn ITestService>().unwrap().len(), 1, "{}", path);
        assert!(named.get_named::<dyn ITestService, _>(&sp, "one").unwrap().is_none(), "{}", path);
        assert_eq!(
            named.get_required_named::<dyn ITestService, _>(&sp, "special").unwrap().kind(),
            "two",
            "{}",
            path
        );
    }
}

#[test]
fn test_resolution_validates_before_touching_the_container() {
    for (path, sc) in both_paths() {
        let named = isolated();
        let sp = sc.build();
        let ty = ServiceType::of::<dyn ITestService>();

        assert!(matches!(named.try_get_named_service(&sp, &ty, ""), Err(DiError::InvalidArgument("service_name"))), "{}", path);
        assert!(matches!(named.get_required_named_service(&sp, &ty, ""), Err(DiError::InvalidArgument("service_name"))), "{}", path);
        assert!(matches!(named.get_named_services(&sp, &ty, ""), Err(DiError::InvalidArgument("service_name"))), "{}", path);

        let compound = named.keys().build_key(&ty, "x").unwrap();
        assert!(matches!(named.try_get_named_service(&sp, &compound, ""), Err(DiError::InvalidArgument("service_type"))), "{}", path);
        assert!(matches!(named.get_required_named_service(&sp, &compound, "x"), Err(DiError::InvalidArgument("service_type"))), "{}", path);
        assert!(matches!(named.get_named_services(&sp, &compound, "x"), Err(DiError::InvalidArgument("service_type"))), "{}", path);
    }
}

#[test]
fn test_resolution_through_trait_objects() {
    let named = isolated();
    let mut sc = ServiceCollection::new();
    named
        .add_singleton_factory_as::<dyn ITestService, _, _, _>(&mut sc, "f", |_| TestService1)
        .unwrap();
    let sp = sc.build();

    let resolver: &dyn ResolverCore = &sp;
    let any = named
        .get_required_named_service(resolver, &ServiceType::of::<dyn ITestService>(), "f")
        .unwrap();
    let service = named_di::downcast_service::<dyn ITestService>(any).unwrap();
    assert_eq!(service.kind(), "one");
}

#[test]
fn test_fallback_keys_are_plain_type_keys() {
    let named = isolated();
    let mut sc = ServiceCollection::new();
    named
        .add_singleton_as::<dyn ITestService, TestService1, _>(&mut sc, "svc1")
        .unwrap();
    let sp = sc.build();

    let compound = named
        .keys()
        .build_key(&ServiceType::of::<dyn ITestService>(), "SVC1")
        .unwrap();
    assert!(sp.is_registered(&Key::Type(compound)));
    assert!(!sp.supports_named_services());
}

#[test]
fn test_facades_with_different_registries_do_not_see_each_other() {
    let registering = isolated();
    let resolving = isolated();
    let mut sc = ServiceCollection::new();
    registering
        .add_singleton_as::<dyn ITestService, TestService1, _>(&mut sc, "svc1")
        .unwrap();
    let sp = sc.build();

    assert!(resolving.get_named::<dyn ITestService, _>(&sp, "svc1").unwrap().is_none());
    assert!(registering.get_named::<dyn ITestService, _>(&sp, "svc1").unwrap().is_some());
}
