//! Safe access into JSON documents by [`FieldPath`].
//!
//! Reads never fail: a missing parent, an out-of-range index or a scalar where
//! a container is expected all read as "absent".

use serde_json::{Map, Value};
use tessel_config::{FieldPath, PathSegment};

/// Look up `path` in `root`.
pub fn get<'a>(root: &'a Value, path: &FieldPath) -> Option<&'a Value> {
  path
    .segments()
    .iter()
    .try_fold(root, |node, segment| match (segment, node) {
      (PathSegment::Key(k), Value::Object(map)) => map.get(k),
      (PathSegment::Index(i), Value::Array(items)) => items.get(*i),
      _ => None,
    })
}

/// Write `value` at `path`, creating intermediate containers.
///
/// A scalar in the way is replaced by the container the path needs. Array
/// gaps are filled with `null`.
pub fn set(root: &mut Value, path: &FieldPath, value: Value) {
  let mut node = root;
  for segment in path.segments() {
    node = match segment {
      PathSegment::Key(k) => {
        if !node.is_object() {
          *node = Value::Object(Map::new());
        }
        let Some(map) = node.as_object_mut() else {
          return;
        };
        map.entry(k.clone()).or_insert(Value::Null)
      }
      PathSegment::Index(i) => {
        if !node.is_array() {
          *node = Value::Array(Vec::new());
        }
        let Some(items) = node.as_array_mut() else {
          return;
        };
        if items.len() <= *i {
          items.resize(*i + 1, Value::Null);
        }
        &mut items[*i]
      }
    };
  }
  *node = value;
}

/// Absent, `null`, `""` or `[]`.
pub fn is_empty(value: Option<&Value>) -> bool {
  match value {
    None | Some(Value::Null) => true,
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Array(items)) => items.is_empty(),
    Some(_) => false,
  }
}

/// Depth-first walk over every leaf of a document.
///
/// Object keys are visited in document order, array indices ascending.
/// Empty objects and arrays count as leaves.
#[derive(Debug, Clone)]
pub struct Leaves<'a> {
  stack: Vec<(FieldPath, &'a Value)>,
}

impl<'a> Leaves<'a> {
  /// Walk the subtree at `base`; nothing is yielded when `base` is absent.
  pub fn new(root: &'a Value, base: &FieldPath) -> Self {
    let stack = get(root, base)
      .map(|node| vec![(base.clone(), node)])
      .unwrap_or_default();
    Self { stack }
  }
}

impl<'a> Iterator for Leaves<'a> {
  type Item = (FieldPath, &'a Value);

  fn next(&mut self) -> Option<Self::Item> {
    while let Some((path, node)) = self.stack.pop() {
      match node {
        Value::Object(map) if !map.is_empty() => {
          for (key, child) in map.iter().rev() {
            self.stack.push((path.child(key.as_str()), child));
          }
        }
        Value::Array(items) if !items.is_empty() => {
          for (index, child) in items.iter().enumerate().rev() {
            self.stack.push((path.child(index), child));
          }
        }
        leaf => return Some((path, leaf)),
      }
    }
    None
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  fn path(text: &str) -> FieldPath {
    FieldPath::parse(text).unwrap()
  }

  #[test]
  fn test_get_nested() {
    let doc = json!({ "a": { "b": [ { "c": 1 }, { "c": 2 } ] } });
    assert_eq!(get(&doc, &path("a.b[1].c")), Some(&json!(2)));
    assert_eq!(get(&doc, &FieldPath::root()), Some(&doc));
  }

  #[test]
  fn test_get_shape_mismatch_is_absent() {
    let doc = json!({ "a": "scalar", "list": [1] });
    assert_eq!(get(&doc, &path("a.b")), None);
    assert_eq!(get(&doc, &path("list[4]")), None);
    assert_eq!(get(&doc, &path("list.x")), None);
    assert_eq!(get(&doc, &path("missing.deep.path")), None);
  }

  #[test]
  fn test_set_creates_containers() {
    let mut doc = Value::Null;
    set(&mut doc, &path("a.list[2].name"), json!("x"));
    assert_eq!(doc, json!({ "a": { "list": [null, null, { "name": "x" }] } }));
  }

  #[test]
  fn test_set_replaces_scalar_in_the_way() {
    let mut doc = json!({ "a": 5 });
    set(&mut doc, &path("a.b"), json!(true));
    assert_eq!(doc, json!({ "a": { "b": true } }));
  }

  #[test]
  fn test_set_root() {
    let mut doc = json!({ "a": 1 });
    set(&mut doc, &FieldPath::root(), json!("replaced"));
    assert_eq!(doc, json!("replaced"));
  }

  #[test]
  fn test_is_empty() {
    assert!(is_empty(None));
    assert!(is_empty(Some(&json!(null))));
    assert!(is_empty(Some(&json!(""))));
    assert!(is_empty(Some(&json!([]))));
    assert!(!is_empty(Some(&json!(" "))));
    assert!(!is_empty(Some(&json!(0))));
    assert!(!is_empty(Some(&json!(false))));
    assert!(!is_empty(Some(&json!({}))));
  }

  #[test]
  fn test_leaves_in_document_order() {
    let doc = json!({ "z": 1, "a": [ "x", { "m": true } ], "e": {} });
    let paths: Vec<String> = Leaves::new(&doc, &FieldPath::root())
      .map(|(p, _)| p.to_string())
      .collect();
    assert_eq!(paths, vec!["z", "a[0]", "a[1].m", "e"]);
  }
}
