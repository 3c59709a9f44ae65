//! Typed addressing into configuration documents.
//!
//! A [`FieldPath`] is an ordered list of object keys and array indices. Its text
//! form is the familiar `a.b[0].c`; keys that would be ambiguous in that form are
//! written bracket-quoted, e.g. `spec["image.tag"]`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PathError;

/// One step of a [`FieldPath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathSegment {
  Key(String),
  Index(usize),
}

impl From<&str> for PathSegment {
  fn from(key: &str) -> Self {
    PathSegment::Key(key.to_string())
  }
}

impl From<String> for PathSegment {
  fn from(key: String) -> Self {
    PathSegment::Key(key)
  }
}

impl From<usize> for PathSegment {
  fn from(index: usize) -> Self {
    PathSegment::Index(index)
  }
}

/// A concrete location in a configuration document.
///
/// The empty path addresses the document root.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FieldPath {
  segments: Vec<PathSegment>,
}

impl FieldPath {
  /// The document root, usable in `static` items.
  pub const ROOT: FieldPath = FieldPath {
    segments: Vec::new(),
  };

  /// The document root.
  pub fn root() -> Self {
    Self::default()
  }

  pub fn from_segments(segments: Vec<PathSegment>) -> Self {
    Self { segments }
  }

  /// Parse the `a.b[0].c` text form.
  pub fn parse(text: &str) -> Result<Self, PathError> {
    let segments = parse_segments(text, false)?
      .into_iter()
      .map(|raw| match raw {
        RawSegment::Key(k) => Ok(PathSegment::Key(k)),
        RawSegment::Index(i) => Ok(PathSegment::Index(i)),
        RawSegment::AnyKey | RawSegment::AnyIndex => Err(PathError::WildcardInPath {
          path: text.to_string(),
        }),
      })
      .collect::<Result<Vec<_>, _>>()?;
    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[PathSegment] {
    &self.segments
  }

  pub fn len(&self) -> usize {
    self.segments.len()
  }

  pub fn is_root(&self) -> bool {
    self.segments.is_empty()
  }

  /// Returns a new path with `segment` appended.
  pub fn child(&self, segment: impl Into<PathSegment>) -> Self {
    let mut segments = Vec::with_capacity(self.segments.len() + 1);
    segments.extend(self.segments.iter().cloned());
    segments.push(segment.into());
    Self { segments }
  }

  /// Concatenate `other` after this path.
  pub fn join(&self, other: &FieldPath) -> Self {
    let mut segments = self.segments.clone();
    segments.extend(other.segments.iter().cloned());
    Self { segments }
  }

  /// The path of the containing node, or `None` at the root.
  pub fn parent(&self) -> Option<Self> {
    let (_, rest) = self.segments.split_last()?;
    Some(Self {
      segments: rest.to_vec(),
    })
  }

  pub fn last(&self) -> Option<&PathSegment> {
    self.segments.last()
  }

  /// The nearest object key, skipping trailing indices.
  ///
  /// `manifests[0].spec.paths[2]` yields `paths`.
  pub fn last_key(&self) -> Option<&str> {
    self.segments.iter().rev().find_map(|s| match s {
      PathSegment::Key(k) => Some(k.as_str()),
      PathSegment::Index(_) => None,
    })
  }

  pub fn starts_with(&self, prefix: &FieldPath) -> bool {
    self.segments.starts_with(&prefix.segments)
  }
}

impl FromIterator<PathSegment> for FieldPath {
  fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
    Self {
      segments: iter.into_iter().collect(),
    }
  }
}

impl FromStr for FieldPath {
  type Err = PathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for FieldPath {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in self.segments.iter().enumerate() {
      match segment {
        PathSegment::Key(k) => write_key(f, k, i == 0)?,
        PathSegment::Index(idx) => write!(f, "[{idx}]")?,
      }
    }
    Ok(())
  }
}

impl Serialize for FieldPath {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for FieldPath {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    Self::parse(&text).map_err(serde::de::Error::custom)
  }
}

/// Whether a key can be written bare (`a.key`) instead of quoted (`a["key"]`).
pub(crate) fn is_plain_key(key: &str) -> bool {
  !key.is_empty()
    && key != "*"
    && !key
      .chars()
      .any(|c| matches!(c, '.' | '[' | ']' | '"' | '\\') || c.is_whitespace())
}

pub(crate) fn write_key(f: &mut fmt::Formatter<'_>, key: &str, first: bool) -> fmt::Result {
  if is_plain_key(key) {
    if !first {
      f.write_str(".")?;
    }
    f.write_str(key)
  } else {
    f.write_str("[\"")?;
    for c in key.chars() {
      if matches!(c, '"' | '\\') {
        f.write_str("\\")?;
      }
      write!(f, "{c}")?;
    }
    f.write_str("\"]")
  }
}

/// Segment as read from text, before deciding whether wildcards are allowed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum RawSegment {
  Key(String),
  Index(usize),
  AnyKey,
  AnyIndex,
}

/// Shared tokenizer for paths and patterns.
pub(crate) fn parse_segments(text: &str, allow_wildcards: bool) -> Result<Vec<RawSegment>, PathError> {
  let chars: Vec<char> = text.chars().collect();
  let mut segments = Vec::new();
  let mut pos = 0;
  let err_path = || text.to_string();

  while pos < chars.len() {
    match chars[pos] {
      '[' => {
        let (segment, next) = parse_bracket(text, &chars, pos)?;
        segments.push(segment);
        pos = next;
      }
      '.' if segments.is_empty() => {
        return Err(PathError::EmptyKey {
          path: err_path(),
          offset: pos,
        });
      }
      c => {
        // A key: either the first segment or preceded by '.'.
        let start = if c == '.' { pos + 1 } else { pos };
        if c != '.' && !segments.is_empty() {
          return Err(PathError::UnexpectedChar {
            path: err_path(),
            offset: pos,
            found: c,
          });
        }
        if start < chars.len() && chars[start] == '[' {
          return Err(PathError::EmptyKey {
            path: err_path(),
            offset: start,
          });
        }
        let mut end = start;
        while end < chars.len() && !matches!(chars[end], '.' | '[') {
          if matches!(chars[end], ']' | '"') {
            return Err(PathError::UnexpectedChar {
              path: err_path(),
              offset: end,
              found: chars[end],
            });
          }
          end += 1;
        }
        if end == start {
          return Err(PathError::EmptyKey {
            path: err_path(),
            offset: start,
          });
        }
        let key: String = chars[start..end].iter().collect();
        if key == "*" && allow_wildcards {
          segments.push(RawSegment::AnyKey);
        } else if key == "*" {
          return Err(PathError::WildcardInPath { path: err_path() });
        } else {
          segments.push(RawSegment::Key(key));
        }
        pos = end;
      }
    }
  }

  if text.ends_with('.') {
    return Err(PathError::EmptyKey {
      path: err_path(),
      offset: chars.len(),
    });
  }

  if !allow_wildcards
    && segments
      .iter()
      .any(|s| matches!(s, RawSegment::AnyKey | RawSegment::AnyIndex))
  {
    return Err(PathError::WildcardInPath { path: err_path() });
  }

  Ok(segments)
}

fn parse_bracket(text: &str, chars: &[char], open: usize) -> Result<(RawSegment, usize), PathError> {
  let unterminated = || PathError::UnterminatedBracket {
    path: text.to_string(),
    offset: open,
  };
  let mut pos = open + 1;

  if chars.get(pos) == Some(&'"') {
    pos += 1;
    let mut key = String::new();
    loop {
      match chars.get(pos) {
        None => return Err(unterminated()),
        Some('\\') => {
          let escaped = chars.get(pos + 1).ok_or_else(unterminated)?;
          key.push(*escaped);
          pos += 2;
        }
        Some('"') => {
          pos += 1;
          break;
        }
        Some(c) => {
          key.push(*c);
          pos += 1;
        }
      }
    }
    if chars.get(pos) != Some(&']') {
      return Err(unterminated());
    }
    return Ok((RawSegment::Key(key), pos + 1));
  }

  let close = chars[pos..]
    .iter()
    .position(|c| *c == ']')
    .map(|p| p + pos)
    .ok_or_else(unterminated)?;
  let inner: String = chars[pos..close].iter().collect();

  if inner == "*" {
    return Ok((RawSegment::AnyIndex, close + 1));
  }

  let index = inner
    .parse::<usize>()
    .map_err(|_| PathError::InvalidIndex {
      path: text.to_string(),
      index: inner.clone(),
    })?;
  Ok((RawSegment::Index(index), close + 1))
}
