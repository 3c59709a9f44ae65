use serde::{Serialize, Serializer};
use serde_json::Value;
use tessel_config::{FieldPath, Sentinel};
use tracing::{debug, instrument};

use crate::document::{self, Leaves};
use crate::walk::RuntimeFields;

/// A validation message attached to one field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
  pub path: FieldPath,
  pub message: String,
}

/// Validation messages keyed by field path.
///
/// Entries keep the order in which fields were validated. [`ErrorTree::to_value`]
/// lays them out as a JSON document shaped like the data that was validated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ErrorTree {
  errors: Vec<FieldError>,
}

impl ErrorTree {
  pub fn new() -> Self {
    Self::default()
  }

  /// Attach `message` at `path`, replacing any earlier message there.
  pub fn insert(&mut self, path: FieldPath, message: impl Into<String>) {
    let message = message.into();
    match self.errors.iter_mut().find(|e| e.path == path) {
      Some(existing) => existing.message = message,
      None => self.errors.push(FieldError { path, message }),
    }
  }

  pub fn get(&self, path: &FieldPath) -> Option<&str> {
    self
      .errors
      .iter()
      .find(|e| &e.path == path)
      .map(|e| e.message.as_str())
  }

  pub fn contains(&self, path: &FieldPath) -> bool {
    self.get(path).is_some()
  }

  pub fn is_empty(&self) -> bool {
    self.errors.is_empty()
  }

  pub fn len(&self) -> usize {
    self.errors.len()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, FieldError> {
    self.errors.iter()
  }

  /// The tree as a JSON document; `{}` when there are no errors.
  pub fn to_value(&self) -> Value {
    let mut root = Value::Object(Default::default());
    for error in &self.errors {
      document::set(&mut root, &error.path, Value::String(error.message.clone()));
    }
    root
  }
}

impl<'a> IntoIterator for &'a ErrorTree {
  type Item = &'a FieldError;
  type IntoIter = std::slice::Iter<'a, FieldError>;

  fn into_iter(self) -> Self::IntoIter {
    self.errors.iter()
  }
}

impl Serialize for ErrorTree {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    self.to_value().serialize(serializer)
  }
}

/// No usable value: empty, or the data still carries the sentinel itself.
pub(crate) fn is_unresolved(sentinel: &Sentinel, value: Option<&Value>) -> bool {
  document::is_empty(value) || value.is_some_and(|v| sentinel.matches(v))
}

/// Check every required runtime field of `template` for a value in `data`.
///
/// A field is checked when the template holds the sentinel at its path and
/// `is_required(path, data)` holds. A data value that is absent, `null`, `""`,
/// `[]` or still the sentinel gets `error_factory(path)` in the returned tree.
/// Every field is checked; one error does not stop the others.
#[instrument(skip_all)]
pub fn validate_required_fields<P, F>(
  sentinel: &Sentinel,
  data: &Value,
  template: &Value,
  is_required: P,
  error_factory: F,
) -> ErrorTree
where
  P: Fn(&FieldPath, &Value) -> bool,
  F: Fn(&FieldPath) -> String,
{
  let root = FieldPath::root();
  let mut errors = ErrorTree::new();
  let mut checked = 0usize;

  for path in RuntimeFields::new(sentinel, template, &root) {
    if !is_required(&path, data) {
      continue;
    }
    checked += 1;
    if is_unresolved(sentinel, document::get(data, &path)) {
      let message = error_factory(&path);
      errors.insert(path, message);
    }
  }

  debug!(checked, errors = errors.len(), "validated required runtime fields");
  errors
}

/// Where a template leaf stands relative to the data document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldState {
  /// Not a runtime input; the template value is used as is.
  Fixed,
  /// Runtime input with no usable value in the data yet.
  Pending,
  /// Runtime input with a value supplied by the data.
  Resolved,
}

/// Per-leaf comparison of a template against a data document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldDescriptor<'a> {
  pub path: FieldPath,
  pub is_runtime: bool,
  pub is_required: bool,
  pub state: FieldState,
  pub current_value: Option<&'a Value>,
}

/// Describe every leaf of `template` against `data`.
///
/// Requiredness is only evaluated for runtime leaves; fixed leaves are never
/// required.
pub fn describe_fields<'a, P>(
  sentinel: &Sentinel,
  template: &Value,
  data: &'a Value,
  is_required: P,
) -> Vec<FieldDescriptor<'a>>
where
  P: Fn(&FieldPath, &Value) -> bool,
{
  Leaves::new(template, &FieldPath::root())
    .map(|(path, node)| {
      let is_runtime = sentinel.matches(node);
      let current_value = document::get(data, &path);
      let state = if !is_runtime {
        FieldState::Fixed
      } else if is_unresolved(sentinel, current_value) {
        FieldState::Pending
      } else {
        FieldState::Resolved
      };
      let is_required = is_runtime && is_required(&path, data);
      FieldDescriptor {
        path,
        is_runtime,
        is_required,
        state,
        current_value,
      }
    })
    .collect()
}
