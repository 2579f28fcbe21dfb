//! Error types shared by every backend.

/// Result alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by grid construction, configuration and backends.
///
/// "No path found", "no map set" and result-buffer overflow are *not*
/// errors: they are normal outcomes encoded as absent paths.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A blocked-cell mask does not match the declared dimensions.
    #[error("grid mask has {actual} cells, expected {width}x{height}")]
    DimensionMismatch {
        /// Declared width.
        width: i32,
        /// Declared height.
        height: i32,
        /// Number of cells actually supplied.
        actual: usize,
    },

    /// Dimensions that the operation cannot work with.
    #[error("invalid grid dimensions {width}x{height}")]
    InvalidDimensions {
        /// Requested width.
        width: i32,
        /// Requested height.
        height: i32,
    },

    /// A [`SearchConfig`](crate::SearchConfig) field is out of range.
    #[error("invalid search configuration: {0}")]
    InvalidConfig(&'static str),

    /// Backend-specific failure (device loss, buffer mapping, ...).
    #[error("backend failure: {0}")]
    Backend(#[source] Box<dyn std::error::Error + Send + Sync>),
}
