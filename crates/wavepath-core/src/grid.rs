//! The [`Grid`] type: an obstacle mask, immutable once shared.
//!
//! A grid is built once per map generation, then handed to every backend as
//! an `Arc<Grid>`. Cells are stored row-major (`y * width + x`), which is also
//! the layout the compute backend uploads.

use crate::error::{Error, Result};
use crate::geom::{Point, Range};

/// Character used for blocked cells by [`Grid::parse`] and the `Display` impl.
pub const BLOCKED_CHAR: char = '#';

/// A 2D obstacle grid: every cell is either free or blocked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid {
    width: i32,
    height: i32,
    blocked: Vec<bool>,
}

impl Grid {
    /// Create a grid of the given dimensions with every cell free.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            width: w,
            height: h,
            blocked: vec![false; (w as usize) * (h as usize)],
        }
    }

    /// Create a grid from a row-major blocked-cell mask.
    ///
    /// Fails with [`Error::DimensionMismatch`] if `blocked.len()` is not
    /// exactly `width * height`.
    pub fn from_blocked(width: i32, height: i32, blocked: Vec<bool>) -> Result<Self> {
        if width < 0 || height < 0 {
            return Err(Error::InvalidDimensions { width, height });
        }
        if blocked.len() != (width as usize) * (height as usize) {
            return Err(Error::DimensionMismatch {
                width,
                height,
                actual: blocked.len(),
            });
        }
        Ok(Self {
            width,
            height,
            blocked,
        })
    }

    /// Create a grid by evaluating `is_blocked` once per cell, in row-major
    /// order.
    pub fn from_fn(width: i32, height: i32, mut is_blocked: impl FnMut(Point) -> bool) -> Self {
        let mut grid = Self::new(width, height);
        for p in grid.bounds() {
            let i = grid.index_unchecked(p);
            grid.blocked[i] = is_blocked(p);
        }
        grid
    }

    /// Parse an ASCII picture: `#` is blocked, any other character is free.
    ///
    /// Leading/trailing blank lines and surrounding whitespace on each line
    /// are ignored, so indented raw string literals work as fixtures. All rows
    /// must have the same length.
    pub fn parse(text: &str) -> Result<Self> {
        let rows: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty())
            .collect();
        let height = rows.len() as i32;
        let width = rows.first().map_or(0, |r| r.chars().count()) as i32;
        let mut blocked = Vec::with_capacity((width * height) as usize);
        for row in &rows {
            if row.chars().count() as i32 != width {
                return Err(Error::DimensionMismatch {
                    width,
                    height,
                    actual: blocked.len() + row.chars().count(),
                });
            }
            blocked.extend(row.chars().map(|c| c == BLOCKED_CHAR));
        }
        Self::from_blocked(width, height, blocked)
    }

    /// Width in cells.
    #[inline]
    pub fn width(&self) -> i32 {
        self.width
    }

    /// Height in cells.
    #[inline]
    pub fn height(&self) -> i32 {
        self.height
    }

    /// Number of cells (`width * height`).
    #[inline]
    pub fn len(&self) -> usize {
        self.blocked.len()
    }

    /// Whether the grid has no cells.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocked.is_empty()
    }

    /// The bounding range `[0,0)-(width,height)`.
    #[inline]
    pub fn bounds(&self) -> Range {
        Range::new(0, 0, self.width, self.height)
    }

    /// Whether `p` lies inside the grid.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height
    }

    /// Flat row-major index of `p`, or `None` when out of bounds.
    #[inline]
    pub fn index(&self, p: Point) -> Option<usize> {
        if self.contains(p) {
            Some(self.index_unchecked(p))
        } else {
            None
        }
    }

    #[inline]
    fn index_unchecked(&self, p: Point) -> usize {
        (p.y as usize) * (self.width as usize) + (p.x as usize)
    }

    /// Whether `p` is blocked. Out-of-bounds cells count as blocked.
    #[inline]
    pub fn is_blocked(&self, p: Point) -> bool {
        self.index(p).is_none_or(|i| self.blocked[i])
    }

    /// Whether `p` is in bounds and free.
    #[inline]
    pub fn is_free(&self, p: Point) -> bool {
        !self.is_blocked(p)
    }

    /// Mark `p` blocked or free. No-op when out of bounds.
    ///
    /// Only usable while the grid is still uniquely owned, i.e. before it is
    /// wrapped in an `Arc` and handed to a backend.
    pub fn set_blocked(&mut self, p: Point, blocked: bool) {
        if let Some(i) = self.index(p) {
            self.blocked[i] = blocked;
        }
    }

    /// The row-major blocked-cell mask.
    #[inline]
    pub fn mask(&self) -> &[bool] {
        &self.blocked
    }

    /// All free cells in row-major order.
    pub fn free_cells(&self) -> Vec<Point> {
        self.bounds().iter().filter(|&p| self.is_free(p)).collect()
    }
}

impl std::fmt::Display for Grid {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = if self.is_blocked(Point::new(x, y)) {
                    BLOCKED_CHAR
                } else {
                    '.'
                };
                write!(f, "{c}")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_grid_is_all_free() {
        let g = Grid::new(4, 3);
        assert_eq!(g.len(), 12);
        assert_eq!(g.free_cells().len(), 12);
        assert!(g.is_free(Point::new(3, 2)));
    }

    #[test]
    fn out_of_bounds_is_blocked() {
        let g = Grid::new(2, 2);
        assert!(g.is_blocked(Point::new(-1, 0)));
        assert!(g.is_blocked(Point::new(2, 0)));
        assert!(g.is_blocked(Point::new(0, 2)));
        assert_eq!(g.index(Point::new(1, 1)), Some(3));
        assert_eq!(g.index(Point::new(2, 1)), None);
    }

    #[test]
    fn from_blocked_rejects_wrong_mask_size() {
        let err = Grid::from_blocked(3, 3, vec![false; 8]).unwrap_err();
        assert!(matches!(
            err,
            Error::DimensionMismatch {
                width: 3,
                height: 3,
                actual: 8
            }
        ));
    }

    #[test]
    fn parse_and_display_round_trip() {
        let g = Grid::parse(
            "
            ..#
            .##
            ...
            ",
        )
        .unwrap();
        assert_eq!((g.width(), g.height()), (3, 3));
        assert!(g.is_blocked(Point::new(2, 0)));
        assert!(g.is_blocked(Point::new(1, 1)));
        assert!(g.is_free(Point::new(0, 1)));
        assert_eq!(g.to_string(), "..#\n.##\n...\n");
    }

    #[test]
    fn parse_rejects_ragged_rows() {
        assert!(Grid::parse("...\n..\n").is_err());
    }

    #[test]
    fn from_fn_accepts_stateful_closures() {
        // Block every third cell visited; only works if each cell is visited
        // exactly once, row by row.
        let mut visited = 0;
        let g = Grid::from_fn(4, 3, |_| {
            visited += 1;
            visited % 3 == 0
        });
        assert_eq!(visited, 12);
        assert_eq!(g.to_string(), "..#.\n.#..\n#..#\n");
    }

    #[test]
    fn from_fn_and_set_blocked() {
        let mut g = Grid::from_fn(5, 5, |p| p.x == 2);
        assert_eq!(g.free_cells().len(), 20);
        g.set_blocked(Point::new(2, 4), false);
        assert!(g.is_free(Point::new(2, 4)));
        g.set_blocked(Point::new(9, 9), true);
        assert_eq!(g.free_cells().len(), 21);
    }
}
