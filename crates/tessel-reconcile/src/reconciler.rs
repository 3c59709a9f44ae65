use serde_json::Value;
use tessel_config::{DocumentFormat, FieldPath, ReconcilerConfig, Sentinel, ViewKind};
use tracing::debug;

use crate::error::ReconcileError;
use crate::merge::{self, MergeOutcome};
use crate::message::MessageTemplate;
use crate::policy::RequiredPolicy;
use crate::render::{PresentationTable, RenderFields};
use crate::validate::{self, ErrorTree, FieldDescriptor};
use crate::walk::{ROOT_PATH, RuntimeFields};

/// A configured reconciler.
///
/// Owns everything the operations need (sentinel, required-field policy,
/// presentation table, error message), so there is no ambient state. All
/// methods take fresh document snapshots and never mutate them.
#[derive(Debug, Default)]
pub struct Reconciler {
  sentinel: Sentinel,
  policy: RequiredPolicy,
  presentation: PresentationTable,
  message: MessageTemplate,
}

impl Reconciler {
  pub fn new(config: ReconcilerConfig) -> Result<Self, ReconcileError> {
    let message = MessageTemplate::new(config.required_message)?;
    debug!(
      sentinel = config.sentinel.as_str(),
      rules = config.required.len(),
      presentation = config.presentation.len(),
      "reconciler configured"
    );
    Ok(Self {
      sentinel: config.sentinel,
      policy: RequiredPolicy::new(config.required),
      presentation: PresentationTable::new(config.presentation),
      message,
    })
  }

  /// Parse config text and build a reconciler from it.
  pub fn load(text: &str, format: DocumentFormat) -> Result<Self, ReconcileError> {
    Self::new(ReconcilerConfig::parse(text, format)?)
  }

  pub fn sentinel(&self) -> &Sentinel {
    &self.sentinel
  }

  pub fn policy(&self) -> &RequiredPolicy {
    &self.policy
  }

  pub fn is_runtime_input(&self, value: &Value) -> bool {
    self.sentinel.matches(value)
  }

  pub fn collect_runtime_fields<'a>(
    &'a self,
    template: &'a Value,
    base: &'a FieldPath,
  ) -> RuntimeFields<'a> {
    RuntimeFields::new(&self.sentinel, template, base)
  }

  pub fn describe_fields<'a>(
    &self,
    template: &Value,
    data: &'a Value,
    view: ViewKind,
  ) -> Vec<FieldDescriptor<'a>> {
    validate::describe_fields(&self.sentinel, template, data, self.policy.predicate(view))
  }

  /// Validate `data` for `view` using the configured policy and message.
  pub fn validate(&self, data: &Value, template: &Value, view: ViewKind) -> ErrorTree {
    validate::validate_required_fields(
      &self.sentinel,
      data,
      template,
      self.policy.predicate(view),
      |path| self.message.render(path),
    )
  }

  pub fn render_runtime_inputs<'a>(
    &'a self,
    template: &'a Value,
    data_binding_prefix: &FieldPath,
  ) -> RenderFields<'a> {
    RenderFields::new(
      RuntimeFields::new(&self.sentinel, template, &ROOT_PATH).iter(),
      &self.presentation,
      data_binding_prefix.clone(),
    )
  }

  pub fn merge_input_sets(&self, template: &Value, input_sets: &[Value]) -> MergeOutcome {
    merge::merge_input_sets(&self.sentinel, template, input_sets)
  }

  pub fn runtime_skeleton(&self, template: &Value) -> Option<Value> {
    merge::runtime_skeleton(&self.sentinel, template)
  }

  pub fn clear_runtime_inputs(&self, data: &Value, template: &Value) -> Value {
    merge::clear_runtime_inputs(&self.sentinel, data, template)
  }
}
