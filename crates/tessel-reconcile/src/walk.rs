use std::sync::LazyLock;

use serde_json::Value;
use tessel_config::{FieldPath, Sentinel};

use crate::document::Leaves;

/// The `<+input>` sentinel used by the free functions of this crate.
pub(crate) static DEFAULT_SENTINEL: LazyLock<Sentinel> = LazyLock::new(Sentinel::default);

pub(crate) static ROOT_PATH: FieldPath = FieldPath::ROOT;

/// Every runtime-input leaf at or under a base path of a template.
///
/// This is a cheap description of a traversal, not the traversal itself:
/// each call to [`RuntimeFields::iter`] starts over from the base path, so the
/// sequence can be consumed any number of times.
#[derive(Debug, Clone, Copy)]
pub struct RuntimeFields<'a> {
  template: &'a Value,
  base: &'a FieldPath,
  sentinel: &'a Sentinel,
}

impl<'a> RuntimeFields<'a> {
  pub fn new(sentinel: &'a Sentinel, template: &'a Value, base: &'a FieldPath) -> Self {
    Self {
      template,
      base,
      sentinel,
    }
  }

  pub fn iter(&self) -> RuntimeFieldIter<'a> {
    RuntimeFieldIter {
      sentinel: self.sentinel,
      leaves: Leaves::new(self.template, self.base),
    }
  }
}

impl<'a> IntoIterator for RuntimeFields<'a> {
  type Item = FieldPath;
  type IntoIter = RuntimeFieldIter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

impl<'a> IntoIterator for &RuntimeFields<'a> {
  type Item = FieldPath;
  type IntoIter = RuntimeFieldIter<'a>;

  fn into_iter(self) -> Self::IntoIter {
    self.iter()
  }
}

/// One pass over a [`RuntimeFields`] sequence.
#[derive(Debug, Clone)]
pub struct RuntimeFieldIter<'a> {
  sentinel: &'a Sentinel,
  leaves: Leaves<'a>,
}

impl Iterator for RuntimeFieldIter<'_> {
  type Item = FieldPath;

  fn next(&mut self) -> Option<FieldPath> {
    let sentinel = self.sentinel;
    self
      .leaves
      .find(|(_, value)| sentinel.matches(value))
      .map(|(path, _)| path)
  }
}
