use minijinja::{Environment, context};
use tessel_config::{DEFAULT_REQUIRED_MESSAGE, FieldPath};
use tracing::warn;

use crate::error::ReconcileError;

/// The "field is required" message, rendered per field with minijinja.
///
/// The template sees `path` (e.g. `artifacts.primary.spec.tag`) and `key`
/// (e.g. `tag`).
#[derive(Debug)]
pub struct MessageTemplate {
  env: Environment<'static>,
  source: String,
}

impl MessageTemplate {
  /// Compile-check `source` so syntax errors surface at construction.
  pub fn new(source: impl Into<String>) -> Result<Self, ReconcileError> {
    let source = source.into();
    Environment::new()
      .template_from_str(&source)
      .map_err(|e| ReconcileError::MessageTemplate {
        template: source.clone(),
        message: e.to_string(),
      })?;
    Ok(Self {
      env: Environment::new(),
      source,
    })
  }

  pub fn source(&self) -> &str {
    &self.source
  }

  pub fn render(&self, path: &FieldPath) -> String {
    let key = path.last_key().unwrap_or_default();
    let ctx = context! {
      path => path.to_string(),
      key => key,
    };
    match self.env.render_str(&self.source, ctx) {
      Ok(message) => message,
      Err(e) => {
        warn!(path = %path, error = %e, "failed to render required message");
        format!("{path} is required")
      }
    }
  }
}

impl Default for MessageTemplate {
  fn default() -> Self {
    Self {
      env: Environment::new(),
      source: DEFAULT_REQUIRED_MESSAGE.to_string(),
    }
  }
}
