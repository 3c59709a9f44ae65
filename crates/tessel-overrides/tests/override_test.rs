//! Override merging over entries and whole service documents.

use std::collections::BTreeSet;

use proptest::prelude::*;
use serde_json::json;
use tessel_overrides::{Entry, apply_overrides, override_service, remove_at};

fn entry(id: &str, v: i64) -> Entry {
  Entry::new(id).with("v", json!(v))
}

fn entries(prefix: &'static str, max: usize) -> impl Strategy<Value = Vec<Entry>> {
  prop::collection::btree_set(0u8..32, 0..max).prop_map(move |ids: BTreeSet<u8>| {
    ids
      .into_iter()
      .map(|id| entry(&format!("{prefix}{id}"), i64::from(id)))
      .collect()
  })
}

#[test]
fn test_replace_then_append() {
  let result = apply_overrides(&[entry("a", 1)], &[entry("a", 2), entry("b", 3)]);
  assert_eq!(result, vec![entry("a", 2), entry("b", 3)]);
}

#[test]
fn test_remove_then_override() {
  let mut list = apply_overrides(&[entry("a", 1), entry("b", 2)], &[entry("c", 3)]);
  remove_at(&mut list, 1).unwrap();
  assert_eq!(list, vec![entry("a", 1), entry("c", 3)]);
  assert!(remove_at(&mut list, 2).is_err());
}

#[test]
fn test_override_service() {
  let service = json!({
    "identifier": "checkout",
    "serviceDefinition": {
      "type": "Kubernetes",
      "spec": {
        "manifests": [
          { "manifest": { "identifier": "values", "type": "Values", "spec": { "branch": "main" } } },
          { "manifest": { "identifier": "chart", "type": "HelmChart" } }
        ],
        "variables": [
          { "name": "replicas", "type": "Number", "value": 2 },
          { "name": "logLevel", "type": "String", "value": "info" }
        ]
      }
    }
  });
  let overrides = json!({
    "environmentRef": "prod",
    "variables": [
      { "name": "replicas", "type": "Number", "value": 6 },
      { "name": "region", "type": "String", "value": "eu-west-1" }
    ],
    "manifests": [
      { "manifest": { "identifier": "values", "type": "Values", "spec": { "branch": "release" } } }
    ],
    "configFiles": [
      { "configFile": { "identifier": "nginx", "spec": { "path": "/etc/nginx.conf" } } }
    ]
  });

  let result = override_service(&service, &overrides).unwrap();
  let spec = &result["serviceDefinition"]["spec"];

  assert_eq!(
    spec["variables"],
    json!([
      { "name": "replicas", "type": "Number", "value": 6 },
      { "name": "logLevel", "type": "String", "value": "info" },
      { "name": "region", "type": "String", "value": "eu-west-1" }
    ])
  );
  assert_eq!(spec["manifests"][0]["manifest"]["spec"]["branch"], json!("release"));
  assert_eq!(spec["manifests"][1]["manifest"]["identifier"], json!("chart"));
  assert_eq!(spec["configFiles"].as_array().map(Vec::len), Some(1));
  // Only sub-resources are taken from the override document.
  assert_eq!(result.get("environmentRef"), None);
  assert_eq!(result["identifier"], json!("checkout"));
}

#[test]
fn test_override_service_without_overrides_is_identity() {
  let service = json!({ "serviceDefinition": { "spec": { "variables": [ { "name": "a" } ] } } });
  assert_eq!(override_service(&service, &json!({})).unwrap(), service);
}

#[test]
fn test_unnamed_variable_is_appended() {
  let service = json!({ "serviceDefinition": { "spec": { "variables": [ { "name": "a" } ] } } });
  let overrides = json!({ "variables": [ { "value": 1 } ] });
  let result = override_service(&service, &overrides).unwrap();
  assert_eq!(
    result["serviceDefinition"]["spec"]["variables"],
    json!([ { "name": "a" }, { "value": 1 } ])
  );
}

#[test]
fn test_base_list_of_wrong_shape_is_an_error() {
  let service = json!({ "serviceDefinition": { "spec": { "configFiles": "none" } } });
  let overrides = json!({ "configFiles": [] });
  let err = override_service(&service, &overrides).unwrap_err();
  assert_eq!(
    err.to_string(),
    "configFiles at 'serviceDefinition.spec.configFiles' must be a list"
  );
}

proptest! {
  #[test]
  fn empty_overrides_leave_base_unchanged(base in entries("b", 8)) {
    prop_assert_eq!(apply_overrides(&base, &[]), base);
  }

  #[test]
  fn novel_overrides_append_after_base(base in entries("b", 8), overrides in entries("o", 8)) {
    let result = apply_overrides(&base, &overrides);
    prop_assert_eq!(result.len(), base.len() + overrides.len());
    prop_assert_eq!(&result[..base.len()], &base[..]);
    prop_assert_eq!(&result[base.len()..], &overrides[..]);
  }

  #[test]
  fn self_override_is_identity(base in entries("b", 8)) {
    prop_assert_eq!(apply_overrides(&base, &base), base);
  }
}

