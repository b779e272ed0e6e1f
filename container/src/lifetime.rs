//! Lifecycle kinds a registration can carry.

use std::fmt;

/// How often a registered factory is invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lifetime {
  /// A plain binding. Resolved fresh on every `make`, like a transient.
  Binding,
  /// Invoked on every resolution; nothing is cached.
  Transient,
  /// Invoked at most once per container; the result is shared.
  Singleton,
  /// Invoked at most once per scope; the cache is dropped by `begin_scope`.
  Scoped,
}

/// What kind of entry currently occupies an identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntryKind {
  Binding,
  Transient,
  Singleton,
  Scoped,
  Instance,
}

impl From<Lifetime> for EntryKind {
  fn from(lifetime: Lifetime) -> Self {
    match lifetime {
      Lifetime::Binding => EntryKind::Binding,
      Lifetime::Transient => EntryKind::Transient,
      Lifetime::Singleton => EntryKind::Singleton,
      Lifetime::Scoped => EntryKind::Scoped,
    }
  }
}

impl fmt::Display for EntryKind {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let s = match self {
      EntryKind::Binding => "a binding",
      EntryKind::Transient => "a transient",
      EntryKind::Singleton => "a singleton",
      EntryKind::Scoped => "a scoped service",
      EntryKind::Instance => "an instance",
    };
    f.write_str(s)
  }
}
