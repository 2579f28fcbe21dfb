//! Cell coordinates and rectangular cell ranges.
//!
//! X grows to the east and Y grows to the south, so "north" of a cell is
//! `y - 1`.

use std::fmt;
use std::ops::Add;

/// A grid cell, or a unit step between cells.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    #[inline]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// The cell `dx` columns and `dy` rows away.
    #[inline]
    pub const fn shift(self, dx: i32, dy: i32) -> Self {
        Self::new(self.x + dx, self.y + dy)
    }

    /// Number of unit steps between the two cells on an open grid.
    #[inline]
    pub fn manhattan(self, other: Point) -> i32 {
        (self.x - other.x).abs() + (self.y - other.y).abs()
    }

    /// Whether a single W/E/N/S move leads from `self` to `other`.
    #[inline]
    pub fn is_adjacent(self, other: Point) -> bool {
        self.manhattan(other) == 1
    }
}

impl Add for Point {
    type Output = Self;

    #[inline]
    fn add(self, step: Self) -> Self {
        self.shift(step.x, step.y)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// Cells with `min.x <= x < max.x` and `min.y <= y < max.y`.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Range {
    pub min: Point,
    pub max: Point,
}

impl Range {
    /// Span the two corners, whichever order they come in.
    #[inline]
    pub fn new(x0: i32, y0: i32, x1: i32, y1: i32) -> Self {
        Self {
            min: Point::new(x0.min(x1), y0.min(y1)),
            max: Point::new(x0.max(x1), y0.max(y1)),
        }
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.max.x <= self.min.x || self.max.y <= self.min.y
    }

    /// Cell count.
    #[inline]
    pub fn len(self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.max.x - self.min.x) as usize * (self.max.y - self.min.y) as usize
        }
    }

    #[inline]
    pub fn contains(self, p: Point) -> bool {
        (self.min.x..self.max.x).contains(&p.x) && (self.min.y..self.max.y).contains(&p.y)
    }

    /// Visit every cell, row by row.
    #[inline]
    pub fn iter(self) -> RangeIter {
        RangeIter {
            range: self,
            next: self.min,
        }
    }
}

impl IntoIterator for Range {
    type Item = Point;
    type IntoIter = RangeIter;

    #[inline]
    fn into_iter(self) -> RangeIter {
        self.iter()
    }
}

/// Row-major walk over a [`Range`].
#[derive(Clone, Debug)]
pub struct RangeIter {
    range: Range,
    next: Point,
}

impl RangeIter {
    fn remaining(&self) -> usize {
        if self.range.is_empty() || self.next.y >= self.range.max.y {
            return 0;
        }
        let row = (self.range.max.x - self.range.min.x) as usize;
        let rest_of_row = (self.range.max.x - self.next.x) as usize;
        rest_of_row + (self.range.max.y - self.next.y - 1) as usize * row
    }
}

impl Iterator for RangeIter {
    type Item = Point;

    #[inline]
    fn next(&mut self) -> Option<Point> {
        if self.remaining() == 0 {
            return None;
        }
        let here = self.next;
        self.next.x += 1;
        if self.next.x == self.range.max.x {
            self.next = Point::new(self.range.min.x, self.next.y + 1);
        }
        Some(here)
    }

    #[inline]
    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for RangeIter {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_and_adjacency() {
        let a = Point::new(1, 2);
        assert_eq!(a + Point::new(-1, 0), Point::new(0, 2));
        assert_eq!(a.shift(2, -2), Point::new(3, 0));
        assert_eq!(Point::new(0, 0).manhattan(Point::new(6, 6)), 12);
        assert!(a.is_adjacent(Point::new(1, 3)));
        assert!(!a.is_adjacent(Point::new(2, 3)));
        assert!(!a.is_adjacent(a));
    }

    #[test]
    fn range_corners_in_any_order() {
        let r = Range::new(3, 2, 0, 0);
        assert_eq!(r, Range::new(0, 0, 3, 2));
        assert_eq!(r.len(), 6);
        assert!(r.contains(Point::new(2, 1)));
        assert!(!r.contains(Point::new(3, 1)));
        assert!(!r.contains(Point::new(0, -1)));
    }

    #[test]
    fn iteration_is_row_major_and_exact() {
        let r = Range::new(0, 0, 3, 2);
        let mut it = r.iter();
        assert_eq!(it.len(), 6);
        assert_eq!(it.next(), Some(Point::new(0, 0)));
        assert_eq!(it.len(), 5);
        let rest: Vec<_> = it.collect();
        assert_eq!(rest[2], Point::new(0, 1));
        assert_eq!(rest.last(), Some(&Point::new(2, 1)));
    }

    #[test]
    fn empty_range_yields_nothing() {
        let r = Range::new(0, 0, 0, 5);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.iter().count(), 0);
    }
}
