use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::OverrideError;

/// Something addressable by a string identifier within its list.
pub trait Keyed {
  fn identifier(&self) -> &str;
}

/// A generic sub-resource entry: an identifier plus arbitrary fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
  pub identifier: String,
  #[serde(flatten)]
  pub spec: Map<String, Value>,
}

impl Entry {
  pub fn new(identifier: impl Into<String>) -> Self {
    Self {
      identifier: identifier.into(),
      spec: Map::new(),
    }
  }

  pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
    self.spec.insert(key.into(), value);
    self
  }
}

impl Keyed for Entry {
  fn identifier(&self) -> &str {
    &self.identifier
  }
}

/// Patch `base` with `overrides` by identifier.
///
/// An override whose identifier matches a base entry replaces it in place;
/// any other override is appended. Base order is preserved.
pub fn apply_overrides<T: Keyed + Clone>(base: &[T], overrides: &[T]) -> Vec<T> {
  apply_overrides_by(base, overrides, |entry| Some(entry.identifier()))
}

/// [`apply_overrides`] with a caller-supplied identifier.
///
/// Entries whose identifier is `None` never match anything and are always
/// appended. When an identifier repeats, the first position is kept and the
/// last value wins.
pub fn apply_overrides_by<T, F>(base: &[T], overrides: &[T], key: F) -> Vec<T>
where
  T: Clone,
  F: Fn(&T) -> Option<&str>,
{
  let mut result: Vec<T> = base.to_vec();
  let mut positions: HashMap<String, usize> = HashMap::new();
  for (index, entry) in base.iter().enumerate() {
    if let Some(id) = key(entry) {
      positions.entry(id.to_string()).or_insert(index);
    }
  }

  for entry in overrides {
    match key(entry) {
      Some(id) => match positions.get(id) {
        Some(&index) => result[index] = entry.clone(),
        None => {
          positions.insert(id.to_string(), result.len());
          result.push(entry.clone());
        }
      },
      None => result.push(entry.clone()),
    }
  }

  result
}

/// Remove the entry at `index`; the only way entries leave a list.
pub fn remove_at<T>(list: &mut Vec<T>, index: usize) -> Result<T, OverrideError> {
  if index >= list.len() {
    return Err(OverrideError::IndexOutOfRange {
      index,
      len: list.len(),
    });
  }
  Ok(list.remove(index))
}
