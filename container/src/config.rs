//! Declarative container configuration.
//!
//! ```yaml
//! name: app
//! max_resolution_depth: 64
//! aliases:
//!   log: Logger
//! contextual:
//!   - when: ReportService
//!     needs: Storage
//!     give: S3Storage
//! ```

use crate::error::{ContainerError, Result};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

pub const DEFAULT_MAX_RESOLUTION_DEPTH: usize = 256;

fn default_name() -> String {
  "default".to_string()
}

fn default_max_resolution_depth() -> usize {
  DEFAULT_MAX_RESOLUTION_DEPTH
}

/// Settings for a [`Container`](crate::Container).
#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct ContainerConfig {
  /// Shown in log events.
  #[serde(default = "default_name")]
  pub name: String,
  /// Deepest allowed chain of nested resolutions.
  #[serde(default = "default_max_resolution_depth")]
  pub max_resolution_depth: usize,
  /// Alias name to target identifier.
  #[serde(default)]
  pub aliases: BTreeMap<String, String>,
  #[serde(default)]
  pub contextual: Vec<ContextualRule>,
}

/// One `when .. needs .. give ..` override.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ContextualRule {
  pub when: String,
  pub needs: String,
  pub give: String,
}

impl Default for ContainerConfig {
  fn default() -> Self {
    Self {
      name: default_name(),
      max_resolution_depth: DEFAULT_MAX_RESOLUTION_DEPTH,
      aliases: BTreeMap::new(),
      contextual: Vec::new(),
    }
  }
}

impl ContainerConfig {
  pub fn from_yaml_str(source: &str) -> Result<Self> {
    let config: Self =
      serde_yaml::from_str(source).map_err(|e| ContainerError::ConfigParse(e.to_string()))?;
    config.validated()
  }

  pub fn from_json_str(source: &str) -> Result<Self> {
    let config: Self =
      serde_json::from_str(source).map_err(|e| ContainerError::ConfigParse(e.to_string()))?;
    config.validated()
  }

  /// Loads a `.yaml`/`.yml` or `.json` file.
  pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
    let path = path.as_ref();
    let source = fs::read_to_string(path)?;
    match path.extension().and_then(|e| e.to_str()) {
      Some("yaml") | Some("yml") => Self::from_yaml_str(&source),
      Some("json") => Self::from_json_str(&source),
      other => Err(ContainerError::ConfigParse(format!(
        "unsupported configuration format {:?} for {}",
        other.unwrap_or(""),
        path.display()
      ))),
    }
  }

  fn validated(self) -> Result<Self> {
    if self.max_resolution_depth == 0 {
      return Err(ContainerError::ConfigParse(
        "max_resolution_depth must be greater than zero".to_string(),
      ));
    }
    Ok(self)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use pretty_assertions::assert_eq;

  #[test]
  fn empty_yaml_document_uses_defaults() {
    let config = ContainerConfig::from_yaml_str("{}").unwrap();
    assert_eq!(config, ContainerConfig::default());
  }

  #[test]
  fn yaml_with_aliases_and_rules() {
    let config = ContainerConfig::from_yaml_str(
      r#"
name: web
max_resolution_depth: 32
aliases:
  log: Logger
contextual:
  - when: Mailer
    needs: Transport
    give: SmtpTransport
"#,
    )
    .unwrap();

    assert_eq!(config.name, "web");
    assert_eq!(config.max_resolution_depth, 32);
    assert_eq!(config.aliases.get("log").map(String::as_str), Some("Logger"));
    assert_eq!(
      config.contextual,
      vec![ContextualRule {
        when: "Mailer".to_string(),
        needs: "Transport".to_string(),
        give: "SmtpTransport".to_string(),
      }]
    );
  }

  #[test]
  fn unknown_fields_are_rejected() {
    let err = ContainerConfig::from_json_str(r#"{"nmae": "typo"}"#).unwrap_err();
    assert!(matches!(err, ContainerError::ConfigParse(_)));
  }

  #[test]
  fn zero_depth_is_rejected() {
    assert!(ContainerConfig::from_json_str(r#"{"max_resolution_depth": 0}"#).is_err());
  }
}
