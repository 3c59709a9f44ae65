//! Centralized "is this runtime field required?" decisions.
//!
//! Every view kind has a default. Rules in the table override it for the paths
//! they match; the last matching rule wins. A rule with a `when` condition sets
//! `required` when the condition holds and the opposite when it does not, so
//! "region is required only for ECR images" is a single rule.

use serde_json::Value;
use tessel_config::{FieldPath, RequiredRule, ViewKind};
use tracing::trace;

use crate::document;

#[derive(Debug, Clone, Default)]
pub struct RequiredPolicy {
  rules: Vec<RequiredRule>,
}

impl RequiredPolicy {
  pub fn new(rules: Vec<RequiredRule>) -> Self {
    Self { rules }
  }

  pub fn rules(&self) -> &[RequiredRule] {
    &self.rules
  }

  /// Decide requiredness of `field` in `view`, evaluating conditions against `data`.
  pub fn is_required(&self, view: ViewKind, field: &FieldPath, data: &Value) -> bool {
    let mut required = view.requires_runtime_fields();
    for rule in self.rules.iter().filter(|r| r.applies_to(view, field)) {
      let holds = match &rule.when {
        None => true,
        Some(condition) => condition
          .resolve(field)
          .is_some_and(|target| condition.test(document::get(data, &target))),
      };
      required = if holds { rule.required } else { !rule.required };
      trace!(field = %field, pattern = %rule.pattern, holds, required, "required rule matched");
    }
    required
  }

  /// The predicate form consumed by [`crate::validate_required_fields`].
  pub fn predicate(&self, view: ViewKind) -> impl Fn(&FieldPath, &Value) -> bool + '_ {
    move |field, data| self.is_required(view, field, data)
  }
}
