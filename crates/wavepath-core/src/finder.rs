//! The backend-agnostic pathfinder contract.

use std::sync::Arc;

use crate::error::Result;
use crate::grid::Grid;
use crate::request::PathItem;

/// Batch shortest-path search over a static obstacle grid.
///
/// Implementations must produce identical paths for the same grid and batch
/// (within their iteration cap and capacity limits), so callers can swap one
/// backend for another without touching call sites.
pub trait Pathfinder {
    /// Short backend name for logs ("cpu", "gpu").
    fn name(&self) -> &'static str;

    /// Install the grid used by subsequent searches.
    ///
    /// Any backend state sized to a previous grid is rebuilt when the
    /// dimensions change.
    fn set_map(&mut self, grid: Arc<Grid>) -> Result<()>;

    /// Resolve every item in `items`, writing each `path` in place.
    ///
    /// Calling this before any [`set_map`](Pathfinder::set_map) is a no-op.
    /// Unreachable destinations leave `path` as `None`; errors are reserved
    /// for unrecoverable backend failures.
    fn find_paths(&mut self, items: &mut [PathItem]) -> Result<()>;
}

impl<P: Pathfinder + ?Sized> Pathfinder for Box<P> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn set_map(&mut self, grid: Arc<Grid>) -> Result<()> {
        (**self).set_map(grid)
    }

    fn find_paths(&mut self, items: &mut [PathItem]) -> Result<()> {
        (**self).find_paths(items)
    }
}
