use thiserror::Error;

#[derive(Debug, Error)]
pub enum OverrideError {
  /// Explicit removal pointed past the end of the list.
  #[error("cannot remove entry {index}: list has {len} entries")]
  IndexOutOfRange { index: usize, len: usize },

  /// A sub-resource that must be a list is something else.
  #[error("{resource} at '{path}' must be a list")]
  NotAList { resource: &'static str, path: String },
}
