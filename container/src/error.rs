//! Error type for every fallible container operation.

use crate::id::ServiceId;
use crate::lifetime::EntryKind;
use thiserror::Error;

/// Boxed error produced by user-supplied factories.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The main error type for the `fibre_container` library.
#[derive(Debug, Error)]
pub enum ContainerError {
  #[error("Invalid service identifier {0:?}: identifiers must be non-empty")]
  InvalidKey(String),

  #[error("The service '{id}' is already registered in the container as {existing}")]
  DuplicateRegistration { id: ServiceId, existing: EntryKind },

  #[error("Invalid factory for '{id}': {reason}")]
  InvalidFactory { id: ServiceId, reason: String },

  #[error("No definition found for '{id}'. Ensure the service is registered")]
  UnknownService { id: ServiceId },

  #[error("The alias '{alias}' is already in use")]
  DuplicateAlias { alias: ServiceId },

  #[error("Parameter '{parameter}' of '{concrete}' has no declared type")]
  MissingTypeAnnotation { concrete: String, parameter: String },

  #[error("Circular dependency detected: {}", join_path(.path))]
  CyclicDependency { path: Vec<ServiceId> },

  #[error("Resolution of '{id}' exceeded the maximum depth of {limit}")]
  ResolutionDepthExceeded { id: ServiceId, limit: usize },

  #[error("The service '{id}' does not hold a value of type {expected}")]
  TypeMismatch { id: ServiceId, expected: &'static str },

  #[error("Constructor requested argument '{parameter}' which was not resolved")]
  MissingArgument { parameter: String },

  #[error("Factory for '{id}' failed: {source}")]
  Construction {
    id: ServiceId,
    #[source]
    source: BoxError,
  },

  #[error("Failed to read configuration file: {0}")]
  ConfigRead(#[from] std::io::Error),

  #[error("Failed to parse configuration: {0}")]
  ConfigParse(String),
}

/// A specialized `Result` type for `fibre_container` operations.
pub type Result<T, E = ContainerError> = std::result::Result<T, E>;

fn join_path(path: &[ServiceId]) -> String {
  path
    .iter()
    .map(ServiceId::as_str)
    .collect::<Vec<_>>()
    .join(" -> ")
}

impl ContainerError {
  /// Wraps an arbitrary factory error, attributing it to `id`.
  pub fn construction(id: impl Into<ServiceId>, source: impl Into<BoxError>) -> Self {
    ContainerError::Construction {
      id: id.into(),
      source: source.into(),
    }
  }

  /// Returns `true` for errors caused by a missing registration.
  pub fn is_unknown_service(&self) -> bool {
    matches!(self, ContainerError::UnknownService { .. })
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn cycle_message_names_the_full_path() {
    let err = ContainerError::CyclicDependency {
      path: vec!["A".into(), "B".into(), "A".into()],
    };
    assert_eq!(err.to_string(), "Circular dependency detected: A -> B -> A");
  }

  #[test]
  fn duplicate_message_names_existing_kind() {
    let err = ContainerError::DuplicateRegistration {
      id: "Logger".into(),
      existing: EntryKind::Singleton,
    };
    assert_eq!(
      err.to_string(),
      "The service 'Logger' is already registered in the container as a singleton"
    );
  }
}
