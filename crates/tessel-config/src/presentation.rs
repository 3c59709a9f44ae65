use serde::{Deserialize, Serialize};

use crate::pattern::PathPattern;

/// The kind of input control a form layer should draw for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ControlKind {
  Text,
  Select,
  Checkbox,
}

/// How fields matching `pattern` are presented.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresentationEntry {
  pub pattern: PathPattern,
  /// i18n key for the field label; defaults to the field's own key.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub label_key: Option<String>,
  /// Explicit control; defaults to `select` when `options` is set, `text` otherwise.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub control: Option<ControlKind>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
}

impl PresentationEntry {
  pub fn control_kind(&self) -> ControlKind {
    match (self.control, &self.options) {
      (Some(control), _) => control,
      (None, Some(_)) => ControlKind::Select,
      (None, None) => ControlKind::Text,
    }
  }
}
