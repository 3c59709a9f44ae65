//! Tessel Config
//!
//! Serializable types shared by the tessel crates: the runtime-input sentinel,
//! typed field paths and path patterns, the required-field rule table and the
//! presentation table.
//!
//! Configuration can be loaded from JSON or YAML. Invalid sentinels, paths and
//! patterns are rejected while deserializing, so a loaded [`ReconcilerConfig`]
//! is always usable.

mod config;
mod error;
mod path;
mod pattern;
mod presentation;
mod sentinel;
mod view;

pub use config::{DEFAULT_REQUIRED_MESSAGE, DocumentFormat, ReconcilerConfig};
pub use error::{ConfigError, PathError};
pub use path::{FieldPath, PathSegment};
pub use pattern::{PathPattern, PatternSegment};
pub use presentation::{ControlKind, PresentationEntry};
pub use sentinel::{RUNTIME_INPUT, Sentinel};
pub use view::{Condition, RequiredRule, ViewKind};
