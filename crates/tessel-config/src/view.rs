use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::path::FieldPath;
use crate::pattern::PathPattern;

/// The kind of form a document is being reconciled for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewKind {
  /// Run/deploy form: every runtime field must be supplied.
  DeploymentForm,
  /// Saving an input set: partial input sets are allowed.
  InputSetForm,
  /// Trigger configuration: the trigger must carry complete inputs.
  TriggerForm,
  /// Editing the template itself: runtime fields stay runtime.
  TemplateEditor,
}

impl ViewKind {
  /// Requiredness for runtime fields no rule mentions.
  pub fn requires_runtime_fields(self) -> bool {
    match self {
      ViewKind::DeploymentForm | ViewKind::TriggerForm => true,
      ViewKind::InputSetForm | ViewKind::TemplateEditor => false,
    }
  }
}

/// Test applied to a data value by a [`Condition`].
///
/// With neither `equals` nor `one_of` set, the condition holds when the
/// value is present and not null.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
  pub path: FieldPath,
  /// `None` resolves `path` from the document root; `Some(n)` resolves it
  /// from the field's n-th ancestor (1 = parent).
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub ancestor: Option<usize>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub equals: Option<Value>,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub one_of: Option<Vec<Value>>,
}

impl Condition {
  /// The absolute data path this condition reads for `field`.
  ///
  /// Returns `None` when the field is not deep enough for the requested
  /// ancestor.
  pub fn resolve(&self, field: &FieldPath) -> Option<FieldPath> {
    match self.ancestor {
      None => Some(self.path.clone()),
      Some(levels) => {
        let keep = field.len().checked_sub(levels)?;
        let base: FieldPath = field.segments()[..keep].iter().cloned().collect();
        Some(base.join(&self.path))
      }
    }
  }

  /// Evaluate against the value found at the resolved path.
  pub fn test(&self, value: Option<&Value>) -> bool {
    let Some(value) = value.filter(|v| !v.is_null()) else {
      return false;
    };
    if let Some(expected) = &self.equals
      && expected != value
    {
      return false;
    }
    if let Some(options) = &self.one_of
      && !options.contains(value)
    {
      return false;
    }
    true
  }
}

/// One entry of the required-field table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RequiredRule {
  pub pattern: PathPattern,
  /// Views the rule applies to; empty means every view.
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub views: Vec<ViewKind>,
  #[serde(default = "default_required")]
  pub required: bool,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub when: Option<Condition>,
}

fn default_required() -> bool {
  true
}

impl RequiredRule {
  pub fn applies_to(&self, view: ViewKind, field: &FieldPath) -> bool {
    (self.views.is_empty() || self.views.contains(&view)) && self.pattern.matches(field)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn test_condition_resolves_from_ancestor() {
    let condition = Condition {
      path: FieldPath::parse("type").unwrap(),
      ancestor: Some(2),
      equals: Some(json!("aws_ecr")),
      one_of: None,
    };
    let field = FieldPath::parse("artifacts.primary.spec.region").unwrap();
    assert_eq!(
      condition.resolve(&field).unwrap().to_string(),
      "artifacts.primary.type"
    );

    let shallow = FieldPath::parse("region").unwrap();
    assert_eq!(condition.resolve(&shallow), None);
  }

  #[test]
  fn test_condition_test() {
    let condition = Condition {
      path: FieldPath::parse("image.type").unwrap(),
      ancestor: None,
      equals: None,
      one_of: Some(vec![json!("aws_ecr"), json!("gcr")]),
    };
    assert!(condition.test(Some(&json!("gcr"))));
    assert!(!condition.test(Some(&json!("docker"))));
    assert!(!condition.test(None));
    assert!(!condition.test(Some(&json!(null))));
  }

  #[test]
  fn test_rule_deserializes_with_defaults() {
    let rule: RequiredRule = serde_json::from_value(json!({
      "pattern": "artifacts.*.spec.region",
      "when": { "path": "type", "ancestor": 2, "equals": "aws_ecr" }
    }))
    .unwrap();
    assert!(rule.required);
    assert!(rule.views.is_empty());
    assert!(rule.applies_to(
      ViewKind::TemplateEditor,
      &FieldPath::parse("artifacts.primary.spec.region").unwrap()
    ));
  }
}
