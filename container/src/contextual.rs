//! Contextual bindings: per-constructor, per-parameter substitutions.

use crate::container::Container;
use crate::error::Result;
use crate::id::ServiceId;

/// First step of `container.when::<T>().needs("Dep").give("Other")`.
#[must_use = "a contextual binding does nothing until `give` is called"]
pub struct ContextualBindingBuilder<'c> {
  container: &'c Container,
  concrete: String,
}

impl<'c> ContextualBindingBuilder<'c> {
  pub(crate) fn new(container: &'c Container, concrete: String) -> Self {
    Self {
      container,
      concrete,
    }
  }

  /// The declared parameter type to intercept.
  pub fn needs(self, dependency: impl Into<ServiceId>) -> ContextualNeeds<'c> {
    ContextualNeeds {
      container: self.container,
      concrete: self.concrete,
      needs: dependency.into(),
    }
  }
}

/// Second step: names the replacement identifier.
#[must_use = "a contextual binding does nothing until `give` is called"]
pub struct ContextualNeeds<'c> {
  container: &'c Container,
  concrete: String,
  needs: ServiceId,
}

impl ContextualNeeds<'_> {
  /// Resolves the intercepted parameter from `target` instead.
  ///
  /// `target` does not have to be registered yet; a missing target surfaces
  /// as `UnknownService` when the concrete type is built. Installing the same
  /// (concrete, parameter type) pair again replaces the previous target.
  pub fn give(self, target: impl Into<ServiceId>) -> Result<()> {
    let concrete = ServiceId::parse(&self.concrete)?;
    self.needs.validate()?;
    let target = target.into();
    target.validate()?;
    self
      .container
      .add_contextual(concrete.to_string(), self.needs, target);
    Ok(())
  }
}
