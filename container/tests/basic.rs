use fibre_container::{Container, ContainerError, EntryKind, Lifetime, Token};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

// --- Test Fixtures ---

#[derive(Debug, PartialEq, Eq)]
struct Config {
  url: String,
}

struct Counter(usize);

fn counting_factory(
  calls: Arc<AtomicUsize>,
) -> impl Fn(&Container) -> fibre_container::Result<Counter> + Send + Sync {
  move |_| Ok(Counter(calls.fetch_add(1, Ordering::SeqCst)))
}

// --- Registration ---

#[test]
fn test_duplicate_registration_fails_in_every_lifecycle() {
  let c = Container::new();
  c.singleton_fn("Service", |_| Ok(1u32)).unwrap();

  let attempts = [
    c.transient_fn("Service", |_| Ok(2u32)),
    c.scoped_fn("Service", |_| Ok(3u32)),
    c.singleton_fn("Service", |_| Ok(4u32)),
    c.instance("Service", 5u32),
  ];

  for attempt in attempts {
    match attempt {
      Err(ContainerError::DuplicateRegistration { id, existing }) => {
        assert_eq!(id.as_str(), "Service");
        assert_eq!(existing, EntryKind::Singleton);
      }
      other => panic!("expected DuplicateRegistration, got {:?}", other),
    }
  }

  // The first registration is still the one served.
  assert_eq!(*c.resolve::<u32>("Service").unwrap(), 1);
}

#[test]
fn test_instance_blocks_later_factory_registration() {
  let c = Container::new();
  c.instance("Config", Config { url: "db://".into() }).unwrap();

  let err = c.singleton_fn("Config", |_| Ok(0u8)).unwrap_err();
  assert!(matches!(
    err,
    ContainerError::DuplicateRegistration { existing: EntryKind::Instance, .. }
  ));
  assert_eq!(c.bound("Config"), Some(EntryKind::Instance));
}

#[test]
fn test_register_with_explicit_lifetime() {
  let c = Container::new();
  c.register(Lifetime::Scoped, "Request", fibre_container::Factory::callable(|_| Ok(7u64)))
    .unwrap();
  assert_eq!(c.bound("Request"), Some(EntryKind::Scoped));
  assert_eq!(*c.resolve::<u64>("Request").unwrap(), 7);
}

#[test]
fn test_blank_identifiers_are_invalid_keys() {
  let c = Container::new();
  assert!(matches!(c.has(""), Err(ContainerError::InvalidKey(_))));
  assert!(matches!(c.make("   "), Err(ContainerError::InvalidKey(_))));
  assert!(matches!(c.instance("", 1u8), Err(ContainerError::InvalidKey(_))));
  assert!(c.is_empty());
}

// --- Lifecycles ---

#[test]
fn test_singleton_is_built_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c = Container::new();
  c.singleton_fn("Counter", counting_factory(calls.clone())).unwrap();

  let r1 = c.resolve::<Counter>("Counter").unwrap();
  let r2 = c.resolve::<Counter>("Counter").unwrap();

  assert!(Arc::ptr_eq(&r1, &r2));
  assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn test_transient_is_built_every_time() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c = Container::new();
  c.transient_fn("Counter", counting_factory(calls.clone())).unwrap();

  let r1 = c.resolve::<Counter>("Counter").unwrap();
  let r2 = c.resolve::<Counter>("Counter").unwrap();

  assert!(!Arc::ptr_eq(&r1, &r2));
  assert_eq!((r1.0, r2.0), (0, 1));
}

#[test]
fn test_plain_binding_is_not_cached() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c = Container::new();
  let factory = counting_factory(calls.clone());
  c.bind("Counter", fibre_container::Factory::callable(factory)).unwrap();

  let r1 = c.make("Counter").unwrap();
  let r2 = c.make("Counter").unwrap();

  assert!(!r1.ptr_eq(&r2));
  assert_eq!(c.bound("Counter"), Some(EntryKind::Binding));
}

#[test]
fn test_scoped_is_shared_within_a_scope_only() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c = Container::new();
  c.scoped_fn("Counter", counting_factory(calls.clone())).unwrap();

  let first = c.resolve::<Counter>("Counter").unwrap();
  let again = c.resolve::<Counter>("Counter").unwrap();
  assert!(Arc::ptr_eq(&first, &again));

  c.begin_scope();
  let next = c.resolve::<Counter>("Counter").unwrap();
  assert!(!Arc::ptr_eq(&first, &next));
  assert_eq!(calls.load(Ordering::SeqCst), 2);
  assert_eq!(c.scope_generation(), 1);
}

#[test]
fn test_begin_scope_leaves_singletons_and_instances_alone() {
  let c = Container::new();
  c.singleton_fn("Shared", |_| Ok(String::from("shared"))).unwrap();
  c.instance("Config", Config { url: "db://".into() }).unwrap();

  let shared = c.resolve::<String>("Shared").unwrap();
  let config = c.resolve::<Config>("Config").unwrap();

  c.begin_scope();
  c.begin_scope();

  assert!(Arc::ptr_eq(&shared, &c.resolve::<String>("Shared").unwrap()));
  assert!(Arc::ptr_eq(&config, &c.resolve::<Config>("Config").unwrap()));
  assert_eq!(c.len(), 2);
}

#[test]
fn test_begin_scope_without_scoped_services_is_harmless() {
  let c = Container::new();
  c.begin_scope();
  c.begin_scope();
  assert_eq!(c.scope_generation(), 2);
}

#[test]
fn test_instance_is_returned_unchanged() {
  let c = Container::new();
  let cfg = Arc::new(Config {
    url: "postgres://localhost".into(),
  });
  c.instance_arc("Config", cfg.clone()).unwrap();

  assert!(c.has("Config").unwrap());
  let resolved = c.resolve::<Config>("Config").unwrap();
  assert!(Arc::ptr_eq(&cfg, &resolved));
}

// --- Lookup Failures ---

#[test]
fn test_unknown_service() {
  let c = Container::new();
  let err = c.make("Nope").unwrap_err();
  assert!(err.is_unknown_service());
  assert!(!c.has("Nope").unwrap());
}

#[test]
fn test_resolving_as_the_wrong_type() {
  let c = Container::new();
  c.instance("Port", 8080u16).unwrap();
  match c.resolve::<u32>("Port") {
    Err(ContainerError::TypeMismatch { id, expected }) => {
      assert_eq!(id.as_str(), "Port");
      assert_eq!(expected, "u32");
    }
    other => panic!("expected TypeMismatch, got {:?}", other.map(|_| ())),
  }
}

#[test]
fn test_typed_tokens() {
  const PORT: &str = "http.port";
  let c = Container::new();
  c.instance(PORT, 8080u16).unwrap();

  let token: Token<u16> = Token::new(PORT);
  assert_eq!(*c.get(&token).unwrap(), 8080);
  assert_eq!(token.id().as_str(), PORT);
}

#[test]
fn test_token_keyed_by_type_name() {
  let c = Container::new();
  c.instance(
    "Config",
    Config {
      url: "sqlite::memory:".into(),
    },
  )
  .unwrap();

  let token = Token::<Config>::of_type();
  assert_eq!(token.id().as_str(), "Config");
  assert_eq!(c.get(&token).unwrap().url, "sqlite::memory:");
}

#[test]
fn test_forget_removes_registration_and_cache() {
  let calls = Arc::new(AtomicUsize::new(0));
  let c = Container::new();
  c.singleton_fn("Counter", counting_factory(calls.clone())).unwrap();
  c.resolve::<Counter>("Counter").unwrap();

  assert!(c.forget("Counter"));
  assert!(!c.forget("Counter"));
  assert!(c.make("Counter").unwrap_err().is_unknown_service());

  // Re-registering starts from a fresh cache.
  c.singleton_fn("Counter", counting_factory(calls.clone())).unwrap();
  assert_eq!(c.resolve::<Counter>("Counter").unwrap().0, 1);
}

#[test]
fn test_containers_are_isolated() {
  let a = Container::new();
  let b = Container::new();
  a.instance("Only", 1u8).unwrap();

  assert!(a.has("Only").unwrap());
  assert!(!b.has("Only").unwrap());
}
