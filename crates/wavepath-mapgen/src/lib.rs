//! Grid and workload generators for wavepath.
//!
//! [`maze`] carves a perfect maze (every pair of free cells is connected by
//! exactly one simple path), and [`random_requests`] draws batches of
//! distinct free-cell endpoint pairs from any grid.

pub mod maze;
pub mod requests;

pub use maze::maze;
pub use requests::random_requests;
