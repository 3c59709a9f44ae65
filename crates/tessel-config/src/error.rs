use thiserror::Error;

/// Malformed path or pattern text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathError {
  #[error("empty key at offset {offset} in '{path}'")]
  EmptyKey { path: String, offset: usize },

  #[error("unterminated bracket at offset {offset} in '{path}'")]
  UnterminatedBracket { path: String, offset: usize },

  #[error("invalid index '{index}' in '{path}'")]
  InvalidIndex { path: String, index: String },

  #[error("unexpected character '{found}' at offset {offset} in '{path}'")]
  UnexpectedChar {
    path: String,
    offset: usize,
    found: char,
  },

  #[error("wildcard not allowed in a concrete path: '{path}'")]
  WildcardInPath { path: String },
}

/// Invalid reconciler configuration.
///
/// These indicate a caller defect, so they are raised at the API boundary
/// instead of being folded into validation output.
#[derive(Debug, Error)]
pub enum ConfigError {
  #[error("invalid sentinel '{value}': {reason}")]
  InvalidSentinel { value: String, reason: &'static str },

  #[error("invalid path: {0}")]
  Path(#[from] PathError),

  #[error("failed to parse config as JSON: {0}")]
  Json(#[from] serde_json::Error),

  #[error("failed to parse config as YAML: {0}")]
  Yaml(#[from] serde_yaml::Error),
}
