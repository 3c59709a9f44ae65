use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::ConfigError;

/// The literal marking a template leaf as "supplied at run time".
pub const RUNTIME_INPUT: &str = "<+input>";

/// A validated sentinel string.
///
/// Matching is exact: no trimming, no prefix matching, no coercion of
/// non-string values.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Sentinel(String);

impl Sentinel {
  pub fn new(value: impl Into<String>) -> Result<Self, ConfigError> {
    let value = value.into();
    if value.is_empty() {
      return Err(ConfigError::InvalidSentinel {
        value,
        reason: "must not be empty",
      });
    }
    if value.chars().any(char::is_whitespace) {
      return Err(ConfigError::InvalidSentinel {
        value,
        reason: "must not contain whitespace",
      });
    }
    Ok(Self(value))
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }

  /// True iff `value` is a JSON string exactly equal to the sentinel.
  pub fn matches(&self, value: &Value) -> bool {
    matches!(value, Value::String(s) if s == &self.0)
  }
}

impl Default for Sentinel {
  fn default() -> Self {
    Self(RUNTIME_INPUT.to_string())
  }
}

impl<'de> Deserialize<'de> for Sentinel {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let value = String::deserialize(deserializer)?;
    Self::new(value).map_err(serde::de::Error::custom)
  }
}
