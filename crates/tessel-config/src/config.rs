use std::path::Path;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::presentation::PresentationEntry;
use crate::sentinel::Sentinel;
use crate::view::RequiredRule;

/// Default message for an empty required field.
///
/// Rendered with minijinja; the context has `path` (full field path) and
/// `key` (nearest object key).
pub const DEFAULT_REQUIRED_MESSAGE: &str = "{{ key }} is required";

/// Reconciler settings as stored in a config file.
///
/// ```yaml
/// sentinel: "<+input>"
/// requiredMessage: "{{ path }} is required"
/// required:
///   - pattern: "artifacts.*.spec.region"
///     when: { path: "type", ancestor: 2, equals: "aws_ecr" }
/// presentation:
///   - pattern: "infrastructure.spec.namespace"
///     labelKey: "pipeline.infraNamespace"
///   - pattern: "artifacts.*.spec.tagType"
///     options: ["value", "regex"]
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcilerConfig {
  #[serde(default)]
  pub sentinel: Sentinel,
  #[serde(default = "default_required_message")]
  pub required_message: String,
  #[serde(default)]
  pub required: Vec<RequiredRule>,
  #[serde(default)]
  pub presentation: Vec<PresentationEntry>,
}

fn default_required_message() -> String {
  DEFAULT_REQUIRED_MESSAGE.to_string()
}

impl Default for ReconcilerConfig {
  fn default() -> Self {
    Self {
      sentinel: Sentinel::default(),
      required_message: default_required_message(),
      required: Vec::new(),
      presentation: Vec::new(),
    }
  }
}

impl ReconcilerConfig {
  /// Parse config text in the given format.
  pub fn parse(text: &str, format: DocumentFormat) -> Result<Self, ConfigError> {
    format.parse(text)
  }
}

/// On-disk encoding of configuration and pipeline documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocumentFormat {
  Json,
  Yaml,
}

impl DocumentFormat {
  /// `.yaml`/`.yml` files are YAML; anything else is JSON.
  pub fn from_path(path: &Path) -> Self {
    match path.extension().and_then(|e| e.to_str()) {
      Some(ext) if ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml") => {
        DocumentFormat::Yaml
      }
      _ => DocumentFormat::Json,
    }
  }

  pub fn parse<T: DeserializeOwned>(self, text: &str) -> Result<T, ConfigError> {
    match self {
      DocumentFormat::Json => Ok(serde_json::from_str(text)?),
      DocumentFormat::Yaml => Ok(serde_yaml::from_str(text)?),
    }
  }
}

#[cfg(test)]
mod tests {
  use std::path::PathBuf;

  use crate::ControlKind;

  use super::*;

  #[test]
  fn test_empty_config_uses_defaults() {
    let config = ReconcilerConfig::parse("{}", DocumentFormat::Json).unwrap();
    assert_eq!(config, ReconcilerConfig::default());
    assert_eq!(config.sentinel.as_str(), "<+input>");
  }

  #[test]
  fn test_yaml_config() {
    let text = r#"
sentinel: "${input}"
required:
  - pattern: "artifacts.*.spec.region"
    views: [deployment_form]
    when: { path: "type", ancestor: 2, equals: "aws_ecr" }
presentation:
  - pattern: "artifacts.*.spec.tagType"
    options: ["value", "regex"]
"#;
    let config = ReconcilerConfig::parse(text, DocumentFormat::Yaml).unwrap();
    assert_eq!(config.sentinel.as_str(), "${input}");
    assert_eq!(config.required.len(), 1);
    assert_eq!(config.presentation[0].control_kind(), ControlKind::Select);
  }

  #[test]
  fn test_bad_sentinel_rejected() {
    let err = ReconcilerConfig::parse(r#"{"sentinel": ""}"#, DocumentFormat::Json).unwrap_err();
    assert!(matches!(err, ConfigError::Json(_)));
  }

  #[test]
  fn test_bad_pattern_rejected() {
    let err = ReconcilerConfig::parse(
      r#"{"required": [{"pattern": "a..b"}]}"#,
      DocumentFormat::Json,
    );
    assert!(err.is_err());
  }

  #[test]
  fn test_format_from_path() {
    assert_eq!(
      DocumentFormat::from_path(&PathBuf::from("pipeline.YML")),
      DocumentFormat::Yaml
    );
    assert_eq!(
      DocumentFormat::from_path(&PathBuf::from("inputs.json")),
      DocumentFormat::Json
    );
    assert_eq!(
      DocumentFormat::from_path(&PathBuf::from("inputs")),
      DocumentFormat::Json
    );
  }
}
