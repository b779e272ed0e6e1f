use fibre_container::{Constructor, Container, ContainerError};

fn main() {
  let container = Container::new();

  // Nothing registered under this identifier.
  match container.make("UnregisteredService") {
    Err(err @ ContainerError::UnknownService { .. }) => println!("Lookup failed: {}", err),
    other => println!("Unexpected outcome: {:?}", other),
  }

  // Two services that need each other.
  let a = Constructor::new("A", |_| Ok(())).param("b", "B");
  let b = Constructor::new("B", |_| Ok(())).param("a", "A");
  container.singleton("A", a).expect("register A");
  container.singleton("B", b).expect("register B");

  match container.make("A") {
    Err(err @ ContainerError::CyclicDependency { .. }) => println!("Wiring failed: {}", err),
    other => println!("Unexpected outcome: {:?}", other),
  }

  // A constructor parameter with no declared type.
  let untyped = Constructor::new("Widget", |_| Ok(())).untyped("size");
  container.transient("Widget", untyped).expect("register Widget");
  if let Err(err) = container.make("Widget") {
    println!("Build failed: {}", err);
  }
}
