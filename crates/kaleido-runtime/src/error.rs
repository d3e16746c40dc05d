#![forbid(unsafe_code)]

//! Store errors.

/// Errors from store operations.
///
/// Reads and writes at missing paths are not errors. Transform failures are
/// reported with the caller's own error type through
/// [`Scope::try_update`](crate::Scope::try_update).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// `undo(steps)` reached before the first history entry, or `steps` was 0.
    UndoOutOfRange {
        /// Steps requested.
        steps: usize,
        /// Steps that could have been taken from the current position.
        available: usize,
    },
    /// A configuration document could not be parsed.
    Config(String),
}

impl std::fmt::Display for StoreError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UndoOutOfRange { steps, available } => write!(
                f,
                "cannot undo {steps} step(s): {available} available"
            ),
            Self::Config(msg) => write!(f, "invalid store config: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}
