//! Document-level overrides of a service definition.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tessel_config::{FieldPath, PathSegment};
use tessel_reconcile::document;
use tracing::{debug, instrument};

use crate::error::OverrideError;
use crate::merge::apply_overrides_by;

/// The parts of a service an override document may patch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SubResource {
  Variables,
  Manifests,
  ConfigFiles,
  ApplicationSettings,
  ConnectionStrings,
}

impl SubResource {
  pub const ALL: [SubResource; 5] = [
    SubResource::Variables,
    SubResource::Manifests,
    SubResource::ConfigFiles,
    SubResource::ApplicationSettings,
    SubResource::ConnectionStrings,
  ];

  /// Key of this sub-resource in both the service spec and an override document.
  pub fn key(self) -> &'static str {
    match self {
      SubResource::Variables => "variables",
      SubResource::Manifests => "manifests",
      SubResource::ConfigFiles => "configFiles",
      SubResource::ApplicationSettings => "applicationSettings",
      SubResource::ConnectionStrings => "connectionStrings",
    }
  }

  /// Where the sub-resource lives inside a service document.
  pub fn service_path(self) -> FieldPath {
    FieldPath::from_segments(vec![
      PathSegment::from("serviceDefinition"),
      PathSegment::from("spec"),
      PathSegment::from(self.key()),
    ])
  }

  /// Path of the identifier inside each list element.
  ///
  /// `None` for single-valued sub-resources, which an override replaces whole.
  pub fn identifier_path(self) -> Option<FieldPath> {
    let segments: &[&str] = match self {
      SubResource::Variables => &["name"],
      SubResource::Manifests => &["manifest", "identifier"],
      SubResource::ConfigFiles => &["configFile", "identifier"],
      SubResource::ApplicationSettings | SubResource::ConnectionStrings => return None,
    };
    Some(segments.iter().copied().map(PathSegment::from).collect())
  }
}

/// Apply every sub-resource present in `overrides` onto `service`.
///
/// List sub-resources are patched by identifier (see
/// [`apply_overrides`](crate::apply_overrides)); single-valued ones are
/// replaced. Everything else in the service is left untouched.
#[instrument(skip_all)]
pub fn override_service(service: &Value, overrides: &Value) -> Result<Value, OverrideError> {
  let mut result = service.clone();

  for resource in SubResource::ALL {
    let Some(patch) = overrides.get(resource.key()) else {
      continue;
    };
    let target = resource.service_path();

    let merged = match resource.identifier_path() {
      Some(id_path) => {
        let patch = list_at(resource, patch, &FieldPath::root().child(resource.key()))?;
        let base = match document::get(service, &target) {
          None | Some(Value::Null) => &[][..],
          Some(value) => list_at(resource, value, &target)?,
        };
        let merged = apply_overrides_by(base, patch, |entry| {
          document::get(entry, &id_path).and_then(Value::as_str)
        });
        debug!(
          resource = resource.key(),
          base = base.len(),
          overrides = patch.len(),
          result = merged.len(),
          "applied overrides"
        );
        Value::Array(merged)
      }
      None => {
        debug!(resource = resource.key(), "replaced");
        patch.clone()
      }
    };

    document::set(&mut result, &target, merged);
  }

  Ok(result)
}

fn list_at<'a>(
  resource: SubResource,
  value: &'a Value,
  path: &FieldPath,
) -> Result<&'a [Value], OverrideError> {
  value
    .as_array()
    .map(Vec::as_slice)
    .ok_or_else(|| OverrideError::NotAList {
      resource: resource.key(),
      path: path.to_string(),
    })
}
