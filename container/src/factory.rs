//! Factories: explicit constructor descriptors and plain callables.
//!
//! Rust cannot enumerate constructor parameters at runtime, so a type opts in
//! by describing its constructor: an ordered list of [`Parameter`]s naming the
//! service identifier each one is resolved from, plus a build function that
//! receives the resolved [`Arguments`]. The [`Injectable`] trait and the
//! [`injectable!`](crate::injectable) macro are the usual ways to produce one.

use crate::container::Container;
use crate::error::{ContainerError, Result};
use crate::id::{short_type_name, ServiceId};
use crate::instance::Instance;
use std::any::Any;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

/// One declared constructor parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parameter {
  name: String,
  declared: Option<ServiceId>,
  variadic: bool,
}

impl Parameter {
  /// A parameter resolved from the service registered under `ty`.
  pub fn typed(name: impl Into<String>, ty: impl Into<ServiceId>) -> Self {
    Self {
      name: name.into(),
      declared: Some(ty.into()),
      variadic: false,
    }
  }

  /// A parameter resolved from the conventional identifier of `T`.
  pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
    Self::typed(name, ServiceId::of::<T>())
  }

  /// A parameter without a declared type. Resolution refuses to guess and
  /// fails with `MissingTypeAnnotation`.
  pub fn untyped(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      declared: None,
      variadic: false,
    }
  }

  /// An open-ended trailing parameter. Never resolved by the container.
  pub fn variadic(name: impl Into<String>) -> Self {
    Self {
      name: name.into(),
      declared: None,
      variadic: true,
    }
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn declared_type(&self) -> Option<&ServiceId> {
    self.declared.as_ref()
  }

  pub fn is_variadic(&self) -> bool {
    self.variadic
  }
}

/// The resolved values handed to a constructor's build function.
#[derive(Debug, Default)]
pub struct Arguments {
  values: HashMap<String, (ServiceId, Instance)>,
}

impl Arguments {
  pub(crate) fn with_capacity(capacity: usize) -> Self {
    Self {
      values: HashMap::with_capacity(capacity),
    }
  }

  pub(crate) fn insert(&mut self, parameter: &str, id: ServiceId, value: Instance) {
    self.values.insert(parameter.to_owned(), (id, value));
  }

  /// Returns the value resolved for `parameter`, downcast to `T`.
  pub fn get<T: ?Sized + Any + Send + Sync>(&self, parameter: &str) -> Result<Arc<T>> {
    let (id, value) = self.lookup(parameter)?;
    value.downcast::<T>().ok_or_else(|| ContainerError::TypeMismatch {
      id: id.clone(),
      expected: std::any::type_name::<T>(),
    })
  }

  /// Returns the untyped value resolved for `parameter`.
  pub fn instance(&self, parameter: &str) -> Result<Instance> {
    self.lookup(parameter).map(|(_, value)| value.clone())
  }

  pub fn len(&self) -> usize {
    self.values.len()
  }

  pub fn is_empty(&self) -> bool {
    self.values.is_empty()
  }

  fn lookup(&self, parameter: &str) -> Result<&(ServiceId, Instance)> {
    self
      .values
      .get(parameter)
      .ok_or_else(|| ContainerError::MissingArgument {
        parameter: parameter.to_owned(),
      })
  }
}

type BuildFn = dyn Fn(&Arguments) -> Result<Instance> + Send + Sync;

/// Explicit description of how to construct a concrete type.
#[derive(Clone)]
pub struct Constructor {
  concrete: String,
  parameters: Vec<Parameter>,
  build: Arc<BuildFn>,
}

impl Constructor {
  /// Describes a constructor producing values of `T`.
  pub fn new<T, F>(concrete: impl Into<String>, build: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Arguments) -> Result<T> + Send + Sync + 'static,
  {
    Self::raw(concrete, move |args| build(args).map(Instance::new))
  }

  /// Describes a constructor producing an already type-erased value, e.g. a
  /// trait object wrapped with [`Instance::from_arc`].
  pub fn raw<F>(concrete: impl Into<String>, build: F) -> Self
  where
    F: Fn(&Arguments) -> Result<Instance> + Send + Sync + 'static,
  {
    Self {
      concrete: concrete.into(),
      parameters: Vec::new(),
      build: Arc::new(build),
    }
  }

  /// The descriptor of an [`Injectable`] type.
  pub fn of<T: Injectable>() -> Self {
    let mut ctor = Self::new(T::concrete_name(), T::construct);
    ctor.parameters = T::parameters();
    ctor
  }

  pub fn param(mut self, name: impl Into<String>, ty: impl Into<ServiceId>) -> Self {
    self.parameters.push(Parameter::typed(name, ty));
    self
  }

  pub fn param_of<D: ?Sized>(mut self, name: impl Into<String>) -> Self {
    self.parameters.push(Parameter::of::<D>(name));
    self
  }

  pub fn untyped(mut self, name: impl Into<String>) -> Self {
    self.parameters.push(Parameter::untyped(name));
    self
  }

  pub fn variadic(mut self, name: impl Into<String>) -> Self {
    self.parameters.push(Parameter::variadic(name));
    self
  }

  pub fn concrete(&self) -> &str {
    &self.concrete
  }

  pub fn parameters(&self) -> &[Parameter] {
    &self.parameters
  }

  pub(crate) fn build(&self, args: &Arguments) -> Result<Instance> {
    (self.build)(args)
  }

  /// Checks the descriptor is invocable as written.
  pub(crate) fn validate(&self) -> std::result::Result<(), String> {
    if self.concrete.trim().is_empty() {
      return Err("constructor has no concrete type name".to_owned());
    }
    let mut seen = HashSet::with_capacity(self.parameters.len());
    for (idx, param) in self.parameters.iter().enumerate() {
      if !seen.insert(param.name.as_str()) {
        return Err(format!("parameter '{}' is declared twice", param.name));
      }
      if param.variadic && idx + 1 != self.parameters.len() {
        return Err(format!(
          "variadic parameter '{}' must be the last parameter",
          param.name
        ));
      }
    }
    Ok(())
  }
}

impl fmt::Debug for Constructor {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("Constructor")
      .field("concrete", &self.concrete)
      .field("parameters", &self.parameters)
      .finish()
  }
}

/// A type that describes its own constructor.
pub trait Injectable: Any + Send + Sync + Sized {
  /// Name used to key contextual overrides. Defaults to the short type name.
  fn concrete_name() -> String {
    short_type_name::<Self>().to_owned()
  }

  /// Declared constructor parameters, in order.
  fn parameters() -> Vec<Parameter> {
    Vec::new()
  }

  fn construct(args: &Arguments) -> Result<Self>;
}

type CallableFn = dyn Fn(&Container) -> Result<Instance> + Send + Sync;

/// What the container invokes to produce a value.
#[derive(Clone)]
pub enum Factory {
  /// A described constructor whose parameters the container resolves.
  Constructor(Constructor),
  /// A closure that receives the container and builds the value itself.
  Callable(Arc<CallableFn>),
}

impl Factory {
  /// Wraps a closure producing values of `T`.
  pub fn callable<T, F>(f: F) -> Self
  where
    T: Any + Send + Sync,
    F: Fn(&Container) -> Result<T> + Send + Sync + 'static,
  {
    Factory::Callable(Arc::new(move |c: &Container| f(c).map(Instance::new)))
  }

  /// Wraps a closure producing type-erased values.
  pub fn callable_raw<F>(f: F) -> Self
  where
    F: Fn(&Container) -> Result<Instance> + Send + Sync + 'static,
  {
    Factory::Callable(Arc::new(f))
  }

  /// The constructor factory of an [`Injectable`] type.
  pub fn of<T: Injectable>() -> Self {
    Factory::Constructor(Constructor::of::<T>())
  }
}

impl From<Constructor> for Factory {
  fn from(ctor: Constructor) -> Self {
    Factory::Constructor(ctor)
  }
}

impl fmt::Debug for Factory {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Factory::Constructor(ctor) => ctor.fmt(f),
      Factory::Callable(_) => f.write_str("Callable"),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn noop() -> Constructor {
    Constructor::new("Noop", |_| Ok(()))
  }

  #[test]
  fn well_formed_descriptors_validate() {
    let ctor = noop().param("logger", "Logger").variadic("rest");
    assert!(ctor.validate().is_ok());
    assert_eq!(ctor.parameters().len(), 2);
  }

  #[test]
  fn duplicate_parameter_names_are_rejected() {
    let ctor = noop().param("a", "A").param("a", "B");
    assert!(ctor.validate().unwrap_err().contains("declared twice"));
  }

  #[test]
  fn variadic_must_come_last() {
    let ctor = noop().variadic("rest").param("a", "A");
    assert!(ctor.validate().unwrap_err().contains("must be the last"));
  }

  #[test]
  fn blank_concrete_name_is_rejected() {
    let ctor = Constructor::new(" ", |_| Ok(()));
    assert!(ctor.validate().is_err());
  }

  #[test]
  fn arguments_report_missing_and_mismatched_values() {
    let mut args = Arguments::default();
    args.insert("port", "Port".into(), Instance::new(8080u16));

    assert_eq!(*args.get::<u16>("port").unwrap(), 8080);
    assert!(matches!(
      args.get::<String>("port"),
      Err(ContainerError::TypeMismatch { .. })
    ));
    assert!(matches!(
      args.get::<u16>("host"),
      Err(ContainerError::MissingArgument { .. })
    ));
  }
}
