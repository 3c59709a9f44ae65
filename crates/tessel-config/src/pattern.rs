use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::PathError;
use crate::path::{FieldPath, PathSegment, RawSegment, parse_segments, write_key};

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PatternSegment {
  Key(String),
  Index(usize),
  /// `*` - any object key.
  AnyKey,
  /// `[*]` - any array index.
  AnyIndex,
}

/// A [`FieldPath`] with wildcards, used by rule and presentation tables.
///
/// `stages[*].spec.artifacts.*.spec.tag` matches the `tag` of every artifact
/// in every stage.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathPattern {
  segments: Vec<PatternSegment>,
}

impl PathPattern {
  pub fn parse(text: &str) -> Result<Self, PathError> {
    let segments = parse_segments(text, true)?
      .into_iter()
      .map(|raw| match raw {
        RawSegment::Key(k) => PatternSegment::Key(k),
        RawSegment::Index(i) => PatternSegment::Index(i),
        RawSegment::AnyKey => PatternSegment::AnyKey,
        RawSegment::AnyIndex => PatternSegment::AnyIndex,
      })
      .collect();
    Ok(Self { segments })
  }

  pub fn segments(&self) -> &[PatternSegment] {
    &self.segments
  }

  /// Whole-path match: same length, every segment compatible.
  pub fn matches(&self, path: &FieldPath) -> bool {
    self.segments.len() == path.len()
      && self
        .segments
        .iter()
        .zip(path.segments())
        .all(|(pattern, segment)| match (pattern, segment) {
          (PatternSegment::Key(p), PathSegment::Key(k)) => p == k,
          (PatternSegment::Index(p), PathSegment::Index(i)) => p == i,
          (PatternSegment::AnyKey, PathSegment::Key(_)) => true,
          (PatternSegment::AnyIndex, PathSegment::Index(_)) => true,
          _ => false,
        })
  }
}

impl From<&FieldPath> for PathPattern {
  fn from(path: &FieldPath) -> Self {
    let segments = path
      .segments()
      .iter()
      .map(|s| match s {
        PathSegment::Key(k) => PatternSegment::Key(k.clone()),
        PathSegment::Index(i) => PatternSegment::Index(*i),
      })
      .collect();
    Self { segments }
  }
}

impl FromStr for PathPattern {
  type Err = PathError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    Self::parse(s)
  }
}

impl fmt::Display for PathPattern {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for (i, segment) in self.segments.iter().enumerate() {
      match segment {
        PatternSegment::Key(k) => write_key(f, k, i == 0)?,
        PatternSegment::Index(idx) => write!(f, "[{idx}]")?,
        PatternSegment::AnyKey if i == 0 => f.write_str("*")?,
        PatternSegment::AnyKey => f.write_str(".*")?,
        PatternSegment::AnyIndex => f.write_str("[*]")?,
      }
    }
    Ok(())
  }
}

impl Serialize for PathPattern {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_str(self)
  }
}

impl<'de> Deserialize<'de> for PathPattern {
  fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    let text = String::deserialize(deserializer)?;
    Self::parse(&text).map_err(serde::de::Error::custom)
  }
}
