/// The injectable NamedServiceFactory helper.

use named_di::{
    DiError, DiResult, Injectable, Lifetime, MarkerRegistry, NamedServiceFactory, NamedServices, Resolver,
    ResolverContext, ServiceCollection, ServiceType, SupportsNamedResolution, SupportsRequiredNamedResolution,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

#[derive(Debug)]
struct Endpoint {
    url: String,
}

/// Consumer that picks its dependencies by name at construction.
struct Client {
    primary: Arc<Endpoint>,
    backups: Vec<Arc<Endpoint>>,
}

impl Injectable for Client {
    fn activate(r: &ResolverContext<'_>) -> DiResult<Self> {
        let factory = r.get::<NamedServiceFactory>()?;
        Ok(Client {
            primary: factory.get_required_named::<Endpoint>("primary")?,
            backups: factory.get_all_named::<Endpoint>("backup")?,
        })
    }
}

fn endpoints(named: &NamedServices, sc: &mut ServiceCollection) {
    named
        .add_singleton_instance_as::<Endpoint, _, _>(&mut *sc, "primary", Arc::new(Endpoint { url: "https://a".into() }))
        .unwrap();
    named
        .add_singleton_instance_as::<Endpoint, _, _>(&mut *sc, "backup", Arc::new(Endpoint { url: "https://b".into() }))
        .unwrap();
    named
        .add_singleton_instance_as::<Endpoint, _, _>(&mut *sc, "backup", Arc::new(Endpoint { url: "https://c".into() }))
        .unwrap();
}

#[test]
fn test_factory_is_registered_by_fallback_registration() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::new();
    endpoints(&named, &mut sc);
    sc.add_transient::<Client, Client>();

    let sp = sc.build();
    let factory = sp.get_required::<NamedServiceFactory>();
    assert!(!factory.is_native());
    assert!(!factory.is_scoped());

    let client = sp.get_required::<Client>();
    assert_eq!(client.primary.url, "https://a");
    let backups: Vec<_> = client.backups.iter().map(|e| e.url.as_str()).collect();
    assert_eq!(backups, vec!["https://b", "https://c"]);
}

#[test]
fn test_factory_agrees_with_the_facade() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::new();
    endpoints(&named, &mut sc);
    let sp = sc.build();
    let factory = sp.get_required::<NamedServiceFactory>();

    let via_factory = factory.get_required_named::<Endpoint>("PRIMARY").unwrap();
    let via_facade = named.get_required_named::<Endpoint, _>(&sp, "primary").unwrap();
    assert!(Arc::ptr_eq(&via_factory, &via_facade));

    assert_eq!(factory.get_all_named::<Endpoint>("backup").unwrap().len(), 2);
    assert!(factory.get_named::<Endpoint>("nothing").unwrap().is_none());
    assert!(factory.get_all_named::<Endpoint>("nothing").unwrap().is_empty());
    assert!(factory.get_required_named::<Endpoint>("nothing").unwrap_err().is_not_found());
    assert!(named.markers().get("nothing").is_none());
}

#[test]
fn test_native_factory_uses_the_provider_directly() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::with_native_naming();
    endpoints(&named, &mut sc);
    let sp = sc.build();

    let factory = NamedServiceFactory::new(&sp, named.markers().clone());
    assert!(factory.is_native());

    let ty = ServiceType::of::<Endpoint>();
    assert!(SupportsNamedResolution::get_named_service(&factory, &ty, "primary").unwrap().is_some());
    assert_eq!(SupportsNamedResolution::get_named_services(&factory, &ty, "backup").unwrap().len(), 2);
    let err = SupportsRequiredNamedResolution::get_required_named_service(&factory, &ty, "missing").unwrap_err();
    assert_eq!(
        err.to_string(),
        format!("No service of type '{}' with the name 'missing' was found.", ty)
    );
    assert!(named.markers().is_empty());
}

#[test]
fn test_factory_outliving_its_provider() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::new();
    endpoints(&named, &mut sc);
    let sp = sc.build();
    let factory = sp.get_required::<NamedServiceFactory>();
    drop(sp);

    assert!(matches!(factory.get_named::<Endpoint>("primary"), Err(DiError::InvalidState(_))));
}

#[derive(Debug)]
struct Connection {
    id: usize,
}

/// Scoped consumer that finds its connection through the injected factory.
struct RequestHandler {
    connection: Arc<Connection>,
}

impl Injectable for RequestHandler {
    fn activate(r: &ResolverContext<'_>) -> DiResult<Self> {
        let factory = r.get::<NamedServiceFactory>()?;
        Ok(RequestHandler {
            connection: factory.get_required_named::<Connection>("request")?,
        })
    }
}

/// Singleton consumer; it only ever sees the root provider.
struct Directory {
    factory: Arc<NamedServiceFactory>,
}

impl Injectable for Directory {
    fn activate(r: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(Directory {
            factory: r.get::<NamedServiceFactory>()?,
        })
    }
}

fn request_services(named: &NamedServices, sc: &mut ServiceCollection) {
    let next = Arc::new(AtomicUsize::new(0));
    named
        .add_scoped_factory_as::<Connection, _, _, _>(&mut *sc, "request", move |_| Connection {
            id: next.fetch_add(1, Ordering::SeqCst),
        })
        .unwrap();
    sc.add_scoped::<RequestHandler, RequestHandler>();
    sc.add_type::<Directory, Directory>(Lifetime::Singleton);
}

#[test]
fn test_factory_resolves_scoped_named_services_inside_a_scope() {
    for native in [false, true] {
        let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
        let mut sc = if native {
            ServiceCollection::with_native_naming()
        } else {
            ServiceCollection::new()
        };
        named.add_named_service_factory(&mut sc);
        request_services(&named, &mut sc);
        let sp = sc.build();

        let scope = sp.create_scope();
        let factory = scope.get_required::<NamedServiceFactory>();
        assert!(factory.is_scoped());
        assert_eq!(factory.is_native(), native);

        let via_factory = factory.get_required_named::<Connection>("REQUEST").unwrap();
        let via_facade = named.get_required_named::<Connection, _>(&scope, "request").unwrap();
        assert!(Arc::ptr_eq(&via_factory, &via_facade));

        let handler = scope.get_required::<RequestHandler>();
        assert!(Arc::ptr_eq(&handler.connection, &via_facade));

        let other = sp.create_scope().get_required::<RequestHandler>();
        assert_ne!(other.connection.id, handler.connection.id);
    }
}

#[test]
fn test_singleton_consumers_get_a_root_bound_factory() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::new();
    request_services(&named, &mut sc);
    let sp = sc.build();

    let scope = sp.create_scope();
    let directory = scope.get_required::<Directory>();
    assert!(!directory.factory.is_scoped());

    // Scoped services stay out of reach of anything owned by the root
    let err = directory.factory.get_required_named::<Connection>("request").unwrap_err();
    assert!(matches!(err, DiError::WrongLifetime(_)));
    assert!(scope.get_required::<NamedServiceFactory>().get_required_named::<Connection>("request").is_ok());
}

#[test]
fn test_scope_bound_factory_outliving_its_scope() {
    let named = NamedServices::new(Arc::new(MarkerRegistry::new()));
    let mut sc = ServiceCollection::new();
    request_services(&named, &mut sc);
    let sp = sc.build();

    let scope = sp.create_scope();
    let factory = scope.get_required::<NamedServiceFactory>();
    drop(scope);

    assert!(matches!(factory.get_named::<Connection>("request"), Err(DiError::InvalidState(_))));
}
