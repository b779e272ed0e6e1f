//! Type-erased resolved values.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// A resolved service value.
///
/// The payload is always an `Arc<T>` boxed behind `dyn Any`, so both concrete
/// types and trait objects (`Arc<dyn Trait>`) can be stored and handed out.
/// Cloning an `Instance` shares the same payload.
#[derive(Clone)]
pub struct Instance {
  value: Arc<dyn Any + Send + Sync>,
  type_name: &'static str,
}

impl Instance {
  /// Wraps an owned value.
  pub fn new<T: Any + Send + Sync>(value: T) -> Self {
    Self::from_arc(Arc::new(value))
  }

  /// Wraps an existing shared value, which may be a trait object.
  pub fn from_arc<T: ?Sized + Any + Send + Sync>(value: Arc<T>) -> Self {
    Self {
      value: Arc::new(value),
      type_name: std::any::type_name::<T>(),
    }
  }

  /// Returns the stored value if it was registered as `T`.
  pub fn downcast<T: ?Sized + Any + Send + Sync>(&self) -> Option<Arc<T>> {
    self.value.downcast_ref::<Arc<T>>().cloned()
  }

  pub fn is<T: ?Sized + Any + Send + Sync>(&self) -> bool {
    self.value.is::<Arc<T>>()
  }

  /// Returns `true` if both handles share the same payload.
  pub fn ptr_eq(&self, other: &Instance) -> bool {
    Arc::ptr_eq(&self.value, &other.value)
  }

  /// Name of the type the value was stored as.
  pub fn type_name(&self) -> &'static str {
    self.type_name
  }
}

impl fmt::Debug for Instance {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Instance({})", self.type_name)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  trait Shape: Send + Sync {
    fn sides(&self) -> u32;
  }
  struct Square;
  impl Shape for Square {
    fn sides(&self) -> u32 {
      4
    }
  }

  #[test]
  fn trait_objects_round_trip() {
    let shape: Arc<dyn Shape> = Arc::new(Square);
    let instance = Instance::from_arc(shape);
    assert_eq!(instance.downcast::<dyn Shape>().unwrap().sides(), 4);
    assert!(instance.downcast::<Square>().is_none());
  }

  #[test]
  fn clones_share_the_payload() {
    let a = Instance::new(7u32);
    let b = a.clone();
    assert!(a.ptr_eq(&b));
    assert!(!a.ptr_eq(&Instance::new(7u32)));
    assert!(Arc::ptr_eq(&a.downcast::<u32>().unwrap(), &b.downcast::<u32>().unwrap()));
  }
}
