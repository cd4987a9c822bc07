use named_di::{implements, DiError, Injectable, Lifetime, Resolver, ResolverContext, DiResult, ServiceCollection};
use std::sync::{Arc, Mutex};

#[test]
fn test_concrete_singleton() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(42usize);
    sc.add_singleton("hello".to_string());

    let sp = sc.build();

    let num1 = sp.get_required::<usize>();
    let num2 = sp.get_required::<usize>();
    let str1 = sp.get_required::<String>();
    let str2 = sp.get_required::<String>();

    assert_eq!(*num1, 42);
    assert_eq!(*str1, "hello");
    assert!(Arc::ptr_eq(&num1, &num2));
    assert!(Arc::ptr_eq(&str1, &str2));
}

#[test]
fn test_factory_with_dependencies() {
    struct Config {
        port: u16,
    }

    struct Server {
        config: Arc<Config>,
        name: String,
    }

    let mut sc = ServiceCollection::new();
    sc.add_singleton(Config { port: 8080 });
    sc.add_singleton_factory::<Server, _>(|r| Server {
        config: r.get_required::<Config>(),
        name: "MyServer".to_string(),
    });

    let sp = sc.build();
    let server = sp.get_required::<Server>();

    assert_eq!(server.config.port, 8080);
    assert_eq!(server.name, "MyServer");
}

#[test]
fn test_transient_creates_new_instances() {
    let counter = Arc::new(Mutex::new(0));
    let counter_clone = counter.clone();

    let mut sc = ServiceCollection::new();
    sc.add_transient_factory::<String, _>(move |_| {
        let mut c = counter_clone.lock().unwrap();
        *c += 1;
        format!("instance_{}", *c)
    });

    let sp = sc.build();
    let s1 = sp.get_required::<String>();
    let s2 = sp.get_required::<String>();

    assert_eq!(*s1, "instance_1");
    assert_eq!(*s2, "instance_2");
    assert!(!Arc::ptr_eq(&s1, &s2));
}

trait Logger: Send + Sync {
    fn log(&self, message: &str) -> String;
}

struct ConsoleLogger;

impl Logger for ConsoleLogger {
    fn log(&self, message: &str) -> String {
        format!("[console] {}", message)
    }
}

impl Injectable for ConsoleLogger {
    fn activate(_: &ResolverContext<'_>) -> DiResult<Self> {
        Ok(ConsoleLogger)
    }
}

implements!(dyn Logger => [ConsoleLogger]);

#[test]
fn test_trait_object_by_activation() {
    let mut sc = ServiceCollection::new();
    sc.add_type::<dyn Logger, ConsoleLogger>(Lifetime::Singleton);

    let sp = sc.build();
    let a = sp.get_required::<dyn Logger>();
    let b = sp.get_required::<dyn Logger>();
    assert_eq!(a.log("hi"), "[console] hi");
    assert!(Arc::ptr_eq(&a, &b));
}

#[test]
fn test_trait_factory() {
    let mut sc = ServiceCollection::new();
    sc.add_trait_factory::<dyn Logger, _>(Lifetime::Transient, |_| Arc::new(ConsoleLogger) as Arc<dyn Logger>);

    let sp = sc.build();
    assert_eq!(sp.get_required::<dyn Logger>().log("x"), "[console] x");
    assert_eq!(sp.get_all::<dyn Logger>().unwrap().len(), 1);
}

#[test]
fn test_missing_service() {
    let sp = ServiceCollection::new().build();
    match sp.get::<u64>() {
        Err(DiError::NotFound { service, name }) => {
            assert_eq!(service, "u64");
            assert!(name.is_none());
        }
        _ => panic!("Expected NotFound"),
    }
    assert!(sp.try_get::<u64>().unwrap().is_none());
    assert!(sp.get_all::<u64>().unwrap().is_empty());
}

#[test]
fn test_descriptor_introspection() {
    let mut sc = ServiceCollection::new();
    sc.add_singleton(1u8);
    sc.add_transient::<ConsoleLogger, ConsoleLogger>();

    let lifetimes: Vec<Lifetime> = sc.descriptors().map(|d| d.lifetime()).collect();
    assert_eq!(lifetimes, vec![Lifetime::Singleton, Lifetime::Transient]);
    assert!(sc
        .descriptors()
        .any(|d| d.implementation_type().to_string().ends_with("ConsoleLogger")));
}
