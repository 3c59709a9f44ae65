//! Reconciler construction errors.
//!
//! Validation failures are data, not errors: they are returned as an
//! [`crate::ErrorTree`]. These variants only cover caller defects.

use tessel_config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum ReconcileError {
  /// The configured required-field message does not compile.
  #[error("invalid message template '{template}': {message}")]
  MessageTemplate { template: String, message: String },

  #[error(transparent)]
  Config(#[from] ConfigError),
}
