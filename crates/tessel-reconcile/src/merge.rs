//! Input-set merging and runtime skeleton extraction.

use serde::Serialize;
use serde_json::{Map, Value};
use tessel_config::{FieldPath, Sentinel};
use tracing::{debug, instrument};

use crate::document::{self, Leaves};
use crate::validate::is_unresolved;
use crate::walk::RuntimeFields;

/// Keys carried into a skeleton object next to its runtime fields so that
/// array elements stay recognizable (`stages[1]` is still stage `deploy`).
const IDENTITY_KEYS: [&str; 2] = ["identifier", "type"];

/// Result of applying input sets to a template.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MergeOutcome {
  /// The template with every resolvable runtime field filled in.
  pub merged: Value,
  /// Runtime fields no input set supplied a value for.
  pub unresolved: Vec<FieldPath>,
  /// Non-empty input-set leaves that do not correspond to a runtime field.
  pub ignored: Vec<FieldPath>,
}

impl MergeOutcome {
  pub fn is_complete(&self) -> bool {
    self.unresolved.is_empty()
  }
}

/// Fill the template's runtime fields from `input_sets`, later sets winning.
///
/// Only runtime fields take values; fixed template values are never
/// overwritten. Empty values and values that are still the sentinel do not
/// count as supplied. Inputs are not mutated.
#[instrument(skip_all, fields(input_sets = input_sets.len()))]
pub fn merge_input_sets(sentinel: &Sentinel, template: &Value, input_sets: &[Value]) -> MergeOutcome {
  let root = FieldPath::root();
  let runtime: Vec<FieldPath> = RuntimeFields::new(sentinel, template, &root).iter().collect();

  let mut merged = template.clone();
  let mut unresolved = Vec::new();

  for path in &runtime {
    let supplied = input_sets
      .iter()
      .rev()
      .map(|set| document::get(set, path))
      .find(|value| !is_unresolved(sentinel, *value))
      .flatten();
    match supplied {
      Some(value) => document::set(&mut merged, path, value.clone()),
      None => unresolved.push(path.clone()),
    }
  }

  let mut ignored: Vec<FieldPath> = Vec::new();
  for set in input_sets {
    for (path, value) in Leaves::new(set, &root) {
      if is_blank(value) {
        continue;
      }
      let covered = runtime.iter().any(|r| path.starts_with(r));
      if !covered && !ignored.contains(&path) {
        ignored.push(path);
      }
    }
  }

  debug!(
    runtime = runtime.len(),
    unresolved = unresolved.len(),
    ignored = ignored.len(),
    "merged input sets"
  );

  MergeOutcome {
    merged,
    unresolved,
    ignored,
  }
}

/// A leaf that carries no input: empty by [`document::is_empty`] or `{}`.
fn is_blank(value: &Value) -> bool {
  document::is_empty(Some(value)) || value.as_object().is_some_and(Map::is_empty)
}

/// The runtime-only view of a template, i.e. the shape an input set for it
/// has to take.
///
/// Objects keep their runtime fields plus identity keys, and arrays keep element
/// positions (elements without runtime fields become `null`, trailing ones
/// are dropped). Returns `None` when the template has no runtime field.
pub fn runtime_skeleton(sentinel: &Sentinel, template: &Value) -> Option<Value> {
  match template {
    Value::Object(map) => {
      let children: Vec<(&String, Option<Value>)> = map
        .iter()
        .map(|(key, child)| (key, runtime_skeleton(sentinel, child)))
        .collect();
      if children.iter().all(|(_, child)| child.is_none()) {
        return None;
      }
      let out: Map<String, Value> = children
        .into_iter()
        .filter_map(|(key, child)| match child {
          Some(child) => Some((key.clone(), child)),
          None if IDENTITY_KEYS.contains(&key.as_str()) => {
            map.get(key).cloned().map(|value| (key.clone(), value))
          }
          None => None,
        })
        .collect();
      Some(Value::Object(out))
    }
    Value::Array(items) => {
      let mut out: Vec<Value> = items
        .iter()
        .map(|item| runtime_skeleton(sentinel, item).unwrap_or(Value::Null))
        .collect();
      while out.last().is_some_and(Value::is_null) {
        out.pop();
      }
      (!out.is_empty()).then_some(Value::Array(out))
    }
    leaf if sentinel.matches(leaf) => Some(leaf.clone()),
    _ => None,
  }
}

/// Copy of `data` with every runtime field that still holds the sentinel
/// replaced by `""`, so the form shows an empty control instead of the marker.
pub fn clear_runtime_inputs(sentinel: &Sentinel, data: &Value, template: &Value) -> Value {
  let root = FieldPath::root();
  let mut cleared = data.clone();
  for path in RuntimeFields::new(sentinel, template, &root) {
    if document::get(data, &path).is_some_and(|v| sentinel.matches(v)) {
      document::set(&mut cleared, &path, Value::String(String::new()));
    }
  }
  cleared
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn paths(list: &[FieldPath]) -> Vec<String> {
    list.iter().map(ToString::to_string).collect()
  }

  #[test]
  fn test_merge_fills_runtime_fields_only() {
    let template = json!({
      "service": { "identifier": "checkout", "image": "<+input>", "tag": "<+input>" }
    });
    let input = json!({
      "service": { "identifier": "hijack", "image": "nginx", "tag": "" }
    });
    let outcome = merge_input_sets(&Sentinel::default(), &template, &[input]);

    assert_eq!(
      outcome.merged,
      json!({ "service": { "identifier": "checkout", "image": "nginx", "tag": "<+input>" } })
    );
    assert_eq!(paths(&outcome.unresolved), vec!["service.tag"]);
    assert_eq!(paths(&outcome.ignored), vec!["service.identifier"]);
    assert!(!outcome.is_complete());
  }

  #[test]
  fn test_later_input_sets_win() {
    let template = json!({ "a": "<+input>", "b": "<+input>" });
    let first = json!({ "a": "one", "b": "one" });
    let second = json!({ "a": "two", "b": "<+input>" });
    let outcome = merge_input_sets(&Sentinel::default(), &template, &[first, second]);
    assert_eq!(outcome.merged, json!({ "a": "two", "b": "one" }));
    assert!(outcome.is_complete());
  }

  #[test]
  fn test_empty_objects_are_not_ignored() {
    let template = json!({ "a": { "b": "<+input>" } });
    let sentinel = Sentinel::default();

    let blank = merge_input_sets(&sentinel, &template, &[json!({})]);
    assert!(blank.ignored.is_empty());
    assert_eq!(paths(&blank.unresolved), vec!["a.b"]);

    let nested = merge_input_sets(&sentinel, &template, &[json!({ "a": {} }), json!({ "c": {} })]);
    assert!(nested.ignored.is_empty());
  }

  #[test]
  fn test_whole_value_runtime_field_takes_structured_input() {
    let template = json!({ "spec": { "paths": "<+input>" } });
    let input = json!({ "spec": { "paths": ["a.yaml", "b.yaml"] } });
    let outcome = merge_input_sets(&Sentinel::default(), &template, &[input]);
    assert_eq!(outcome.merged, json!({ "spec": { "paths": ["a.yaml", "b.yaml"] } }));
    assert!(outcome.ignored.is_empty());
  }

  #[test]
  fn test_skeleton_keeps_runtime_fields_and_identity() {
    let template = json!({
      "stages": [
        { "identifier": "build", "type": "CI", "spec": { "image": "golang" } },
        { "identifier": "deploy", "type": "Deployment", "spec": { "env": "<+input>", "replicas": 2 } }
      ],
      "timeout": "10m"
    });
    let skeleton = runtime_skeleton(&Sentinel::default(), &template).unwrap();
    assert_eq!(
      skeleton,
      json!({
        "stages": [
          null,
          { "identifier": "deploy", "type": "Deployment", "spec": { "env": "<+input>" } }
        ]
      })
    );
  }

  #[test]
  fn test_skeleton_drops_trailing_fixed_elements() {
    let template = json!({ "list": ["<+input>", "fixed", { "a": 1 }] });
    let skeleton = runtime_skeleton(&Sentinel::default(), &template).unwrap();
    assert_eq!(skeleton, json!({ "list": ["<+input>"] }));
  }

  #[test]
  fn test_skeleton_none_without_runtime_fields() {
    assert_eq!(runtime_skeleton(&Sentinel::default(), &json!({ "a": [1, {}] })), None);
  }

  #[test]
  fn test_clear_runtime_inputs() {
    let template = json!({ "a": "<+input>", "b": "<+input>", "c": "fixed" });
    let data = json!({ "a": "<+input>", "b": "set", "c": "<+input>" });
    let cleared = clear_runtime_inputs(&Sentinel::default(), &data, &template);
    // `c` is not runtime in the template, so its value is left alone.
    assert_eq!(cleared, json!({ "a": "", "b": "set", "c": "<+input>" }));
  }
}
