//! Error types for slotboard-grid.

use thiserror::Error;

/// Result type for grid operations.
pub type Result<T> = std::result::Result<T, GridError>;

/// Errors raised while addressing or reshaping the grid.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridError {
    /// Slot index outside `0..SLOT_COUNT`.
    #[error("invalid slot index {index} (board has {len} slots)")]
    InvalidIndex { index: usize, len: usize },

    /// Kind matrix is not exactly ROWS × COLS.
    #[error("invalid grid shape: {0}")]
    InvalidShape(String),

    /// Integer that is not one of the known slot kinds.
    #[error("unknown slot kind {0} (expected 20, 40 or 60)")]
    UnknownKind(u32),

    /// Text that is not a number at all.
    #[error("not a slot kind: {0:?}")]
    UnparsableKind(String),
}
