//! Error types for state construction, tuning and snapshots
//!
//! Per-tick simulation never fails: out-of-bounds queries are walls and wrong-kind
//! entities are no-ops. Errors only surface when building or loading state.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum SimError {
    /// A snake boss needs at least its head
    #[error("snake boss needs at least one segment, got {0}")]
    InvalidSegmentCount(usize),

    #[error("grid cell ({x}, {y}) is outside the world")]
    OutOfBounds { x: i32, y: i32 },

    /// Spawn position lands on a wall
    #[error("spawn cell ({x}, {y}) is blocked")]
    BlockedSpawn { x: i32, y: i32 },

    #[error("invalid tuning: {0}")]
    InvalidTuning(String),

    #[error("snapshot encoding failed: {0}")]
    Snapshot(#[from] serde_json::Error),

    #[error("unsupported snapshot version {0}")]
    UnsupportedSnapshotVersion(u32),
}
