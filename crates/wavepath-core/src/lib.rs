//! **wavepath-core**: shared types for batch grid pathfinding.
//!
//! This crate provides the pieces every backend agrees on: geometry
//! primitives, the obstacle [`Grid`], path requests and their result slots,
//! the [`Pathfinder`] facade, [`SearchConfig`] and the shared [`Error`].

pub mod config;
pub mod error;
pub mod finder;
pub mod geom;
pub mod grid;
pub mod request;

pub use config::SearchConfig;
pub use error::{Error, Result};
pub use finder::Pathfinder;
pub use geom::{Point, Range};
pub use grid::Grid;
pub use request::{PathItem, PathRequest, batch_from};
