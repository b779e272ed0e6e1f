//! Service identifiers and typed service tokens.

use crate::error::{ContainerError, Result};
use std::borrow::Borrow;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

/// The string key naming a registrable service.
///
/// By convention this is a type name (`"Logger"`) or an alias (`"log"`).
/// Cloning is a reference-count bump.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ServiceId(Arc<str>);

impl ServiceId {
  pub fn new(id: impl AsRef<str>) -> Self {
    Self(Arc::from(id.as_ref()))
  }

  /// Builds an identifier, rejecting empty or whitespace-only keys.
  pub fn parse(id: impl AsRef<str>) -> Result<Self> {
    let raw = id.as_ref();
    if raw.trim().is_empty() {
      return Err(ContainerError::InvalidKey(raw.to_owned()));
    }
    Ok(Self::new(raw))
  }

  /// The identifier conventionally used for `T`: its unqualified type name.
  pub fn of<T: ?Sized>() -> Self {
    Self::new(short_type_name::<T>())
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  pub(crate) fn validate(&self) -> Result<()> {
    if self.0.trim().is_empty() {
      return Err(ContainerError::InvalidKey(self.0.to_string()));
    }
    Ok(())
  }
}

impl fmt::Debug for ServiceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "ServiceId({:?})", &*self.0)
  }
}

impl fmt::Display for ServiceId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

impl Borrow<str> for ServiceId {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl AsRef<str> for ServiceId {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ServiceId {
  fn from(s: &str) -> Self {
    Self::new(s)
  }
}

impl From<String> for ServiceId {
  fn from(s: String) -> Self {
    Self(Arc::from(s))
  }
}

impl From<&String> for ServiceId {
  fn from(s: &String) -> Self {
    Self::new(s)
  }
}

impl From<&ServiceId> for ServiceId {
  fn from(s: &ServiceId) -> Self {
    s.clone()
  }
}

/// Strips module paths from `std::any::type_name`, keeping generic arguments.
///
/// `my_app::services::Logger` becomes `Logger`; `Repo<my_app::User>` keeps its
/// arguments as written by the compiler after the outer path is removed.
pub fn short_type_name<T: ?Sized>() -> &'static str {
  let full = std::any::type_name::<T>();
  let head_end = full.find('<').unwrap_or(full.len());
  let start = full[..head_end].rfind("::").map(|i| i + 2).unwrap_or(0);
  &full[start..]
}

/// A typed handle for a service contract.
///
/// A token pairs the string identifier with the Rust type stored under it, so
/// `Container::get` can resolve and downcast in one step. The identifier is
/// kept for diagnostics and for interop with the string API.
pub struct Token<T: ?Sized> {
  id: ServiceId,
  _marker: PhantomData<fn() -> Arc<T>>,
}

impl<T: ?Sized> Token<T> {
  pub fn new(id: impl Into<ServiceId>) -> Self {
    Self {
      id: id.into(),
      _marker: PhantomData,
    }
  }

  /// A token keyed by the unqualified name of `T`.
  pub fn of_type() -> Self {
    Self::new(ServiceId::of::<T>())
  }

  pub fn id(&self) -> &ServiceId {
    &self.id
  }
}

impl<T: ?Sized> Clone for Token<T> {
  fn clone(&self) -> Self {
    Self::new(self.id.clone())
  }
}

impl<T: ?Sized> fmt::Debug for Token<T> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "Token<{}>({})", std::any::type_name::<T>(), self.id)
  }
}
