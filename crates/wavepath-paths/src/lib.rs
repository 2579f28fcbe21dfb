//! Wavefront (breadth-first) pathfinding on obstacle grids.
//!
//! This crate holds the parts of the search that every backend shares and
//! the thread-parallel backend itself:
//!
//! - **Neighbour order** ([`DIRECTIONS`]): west, east, north, south; the
//!   tie-break that makes paths reproducible across backends
//! - **Visitation records** ([`VisitMap`], [`backtrack`]): "first reached at
//!   round" stamps and the backward walk that turns them into a path
//! - **CPU backend** ([`CpuPathfinder`]): one independent search per request
//!   on the rayon pool
//! - **Distance maps** ([`bfs_distances`]): a plain queue BFS used to check
//!   results
//!
//! # Stamp convention
//!
//! | Cell | Stamp |
//! |---|---|
//! | unvisited | `0` |
//! | source | `1` |
//! | first reached in round `r` | `r + 1` |

mod cpu;
mod distance;
mod neighbors;
mod visit;

pub use cpu::{CpuPathfinder, search};
pub use distance::{UNREACHABLE, bfs_distances, shortest_distance};
pub use neighbors::{DIRECTIONS, cardinal};
pub use visit::{SOURCE_STAMP, UNVISITED, VisitMap, backtrack};
