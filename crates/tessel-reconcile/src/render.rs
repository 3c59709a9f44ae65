use serde::Serialize;
use tessel_config::{ControlKind, FieldPath, PresentationEntry};

use crate::walk::RuntimeFieldIter;

/// Presentation lookup for runtime fields. The first matching entry wins.
#[derive(Debug, Clone, Default)]
pub struct PresentationTable {
  entries: Vec<PresentationEntry>,
}

pub(crate) static EMPTY_PRESENTATION: PresentationTable = PresentationTable {
  entries: Vec::new(),
};

impl PresentationTable {
  pub fn new(entries: Vec<PresentationEntry>) -> Self {
    Self { entries }
  }

  pub fn lookup(&self, path: &FieldPath) -> Option<&PresentationEntry> {
    self.entries.iter().find(|e| e.pattern.matches(path))
  }

  /// Build the render descriptor for `path`, bound under `prefix`.
  pub fn describe(&self, path: FieldPath, prefix: &FieldPath) -> RenderableField {
    let entry = self.lookup(&path);
    let label_key = entry
      .and_then(|e| e.label_key.clone())
      .or_else(|| path.last_key().map(str::to_string))
      .unwrap_or_else(|| "value".to_string());
    let control = entry.map_or(ControlKind::Text, PresentationEntry::control_kind);
    let options = entry.and_then(|e| e.options.clone());

    RenderableField {
      binding: prefix.join(&path),
      path,
      label_key,
      control,
      options,
    }
  }
}

/// What a form layer needs to draw one runtime field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderableField {
  /// Path in the template.
  pub path: FieldPath,
  /// Path the control writes to in the form's data.
  pub binding: FieldPath,
  pub label_key: String,
  pub control: ControlKind,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub options: Option<Vec<String>>,
}

/// Render descriptors for the runtime fields of a template, in traversal order.
#[derive(Debug, Clone)]
pub struct RenderFields<'a> {
  fields: RuntimeFieldIter<'a>,
  table: &'a PresentationTable,
  prefix: FieldPath,
}

impl<'a> RenderFields<'a> {
  pub(crate) fn new(
    fields: RuntimeFieldIter<'a>,
    table: &'a PresentationTable,
    prefix: FieldPath,
  ) -> Self {
    Self {
      fields,
      table,
      prefix,
    }
  }
}

impl Iterator for RenderFields<'_> {
  type Item = RenderableField;

  fn next(&mut self) -> Option<RenderableField> {
    let path = self.fields.next()?;
    Some(self.table.describe(path, &self.prefix))
  }
}
