//! Tessel Reconcile
//!
//! Walks a pipeline template and a user-supplied data document in lockstep to
//! decide which fields are runtime inputs (`<+input>`), whether required ones
//! have been filled in, and which input controls a form needs to show.
//!
//! # Example
//!
//! ```
//! use serde_json::json;
//! use tessel_config::FieldPath;
//!
//! let template = json!({
//!   "artifacts": { "primary": { "spec": { "connectorRef": "<+input>", "tag": "<+input>" } } }
//! });
//! let data = json!({
//!   "artifacts": { "primary": { "spec": { "connectorRef": "", "tag": "v1" } } }
//! });
//!
//! let errors = tessel_reconcile::validate_required_fields(
//!   &data,
//!   &template,
//!   |_, _| true,
//!   |path| format!("{path} is required"),
//! );
//! assert_eq!(errors.len(), 1);
//! assert!(errors.contains(&FieldPath::parse("artifacts.primary.spec.connectorRef").unwrap()));
//! ```
//!
//! The free functions use the standard `<+input>` sentinel. A [`Reconciler`]
//! built from a [`tessel_config::ReconcilerConfig`] carries a custom sentinel,
//! a required-field policy, a presentation table and a message template.

pub mod document;
mod error;
mod merge;
mod message;
mod policy;
mod reconciler;
mod render;
mod validate;
mod walk;

pub use error::ReconcileError;
pub use merge::MergeOutcome;
pub use message::MessageTemplate;
pub use policy::RequiredPolicy;
pub use reconciler::Reconciler;
pub use render::{PresentationTable, RenderFields, RenderableField};
pub use validate::{ErrorTree, FieldDescriptor, FieldError, FieldState};
pub use walk::{RuntimeFieldIter, RuntimeFields};

use serde_json::Value;
use tessel_config::FieldPath;

use crate::render::EMPTY_PRESENTATION;
use crate::walk::{DEFAULT_SENTINEL, ROOT_PATH};

/// True iff `value` is exactly the `<+input>` string.
pub fn is_runtime_input(value: &Value) -> bool {
  DEFAULT_SENTINEL.matches(value)
}

/// Lazy, restartable sequence of runtime-input paths at or under `base_path`.
pub fn collect_runtime_fields<'a>(template: &'a Value, base_path: &'a FieldPath) -> RuntimeFields<'a> {
  RuntimeFields::new(&DEFAULT_SENTINEL, template, base_path)
}

/// Error tree for required runtime fields left empty in `data`.
///
/// Absent, `null`, `""`, `[]` and a leftover `<+input>` all count as empty.
pub fn validate_required_fields<P, F>(
  data: &Value,
  template: &Value,
  is_required: P,
  error_factory: F,
) -> ErrorTree
where
  P: Fn(&FieldPath, &Value) -> bool,
  F: Fn(&FieldPath) -> String,
{
  validate::validate_required_fields(&DEFAULT_SENTINEL, data, template, is_required, error_factory)
}

/// Per-leaf descriptors of `template` compared against `data`.
pub fn describe_fields<'a, P>(template: &Value, data: &'a Value, is_required: P) -> Vec<FieldDescriptor<'a>>
where
  P: Fn(&FieldPath, &Value) -> bool,
{
  validate::describe_fields(&DEFAULT_SENTINEL, template, data, is_required)
}

/// Render descriptors with default presentation (label = field key, text control).
pub fn render_runtime_inputs<'a>(template: &'a Value, data_binding_prefix: &FieldPath) -> RenderFields<'a> {
  RenderFields::new(
    RuntimeFields::new(&DEFAULT_SENTINEL, template, &ROOT_PATH).iter(),
    &EMPTY_PRESENTATION,
    data_binding_prefix.clone(),
  )
}

pub fn merge_input_sets(template: &Value, input_sets: &[Value]) -> MergeOutcome {
  merge::merge_input_sets(&DEFAULT_SENTINEL, template, input_sets)
}

pub fn runtime_skeleton(template: &Value) -> Option<Value> {
  merge::runtime_skeleton(&DEFAULT_SENTINEL, template)
}

pub fn clear_runtime_inputs(data: &Value, template: &Value) -> Value {
  merge::clear_runtime_inputs(&DEFAULT_SENTINEL, data, template)
}
