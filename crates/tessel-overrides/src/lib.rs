//! Identifier-keyed overrides for sub-resource lists.
//!
//! An override list patches a base list: entries with a known identifier
//! replace the base entry in place, new identifiers are appended. Nothing is
//! ever removed implicitly; [`remove_at`] is the only way out of a list.

mod error;
mod merge;
mod service;

pub use error::OverrideError;
pub use merge::{Entry, Keyed, apply_overrides, apply_overrides_by, remove_at};
pub use service::{SubResource, override_service};
