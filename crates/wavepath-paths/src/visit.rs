//! Visitation records and path reconstruction.
//!
//! Both backends share one stamping convention: the source is stamped `1`,
//! and a cell first reached in wavefront round `r` is stamped `r + 1`, so a
//! cell at distance `d` carries `d + 1`. `0` means unvisited. Stamps never
//! change once written within a search.
//!
//! Reconstruction walks back from the destination, at each step taking the
//! first neighbour (in [`DIRECTIONS`](crate::DIRECTIONS) order) whose stamp
//! is one less than the current cell's. The compute backend's `backtrack.wgsl`
//! implements the same walk on device.

use wavepath_core::Point;

use crate::neighbors::cardinal;

/// Stamp value for cells not yet reached.
pub const UNVISITED: u32 = 0;

/// Stamp carried by the source cell.
pub const SOURCE_STAMP: u32 = 1;

/// Per-request "first visited at round" record over a whole grid.
#[derive(Debug, Clone)]
pub struct VisitMap {
    width: i32,
    height: i32,
    stamps: Vec<u32>,
}

impl VisitMap {
    /// An all-unvisited record for a `width` x `height` grid.
    pub fn new(width: i32, height: i32) -> Self {
        let w = width.max(0);
        let h = height.max(0);
        Self {
            width: w,
            height: h,
            stamps: vec![UNVISITED; (w as usize) * (h as usize)],
        }
    }

    #[inline]
    fn index(&self, p: Point) -> Option<usize> {
        if p.x >= 0 && p.y >= 0 && p.x < self.width && p.y < self.height {
            Some((p.y as usize) * (self.width as usize) + (p.x as usize))
        } else {
            None
        }
    }

    /// Stamp at `p`; out-of-bounds cells read as [`UNVISITED`].
    #[inline]
    pub fn get(&self, p: Point) -> u32 {
        self.index(p).map_or(UNVISITED, |i| self.stamps[i])
    }

    /// Whether `p` has been reached.
    #[inline]
    pub fn is_visited(&self, p: Point) -> bool {
        self.get(p) != UNVISITED
    }

    /// Record that `p` was first reached with `stamp`.
    ///
    /// Already-visited cells keep their stamp.
    #[inline]
    pub fn stamp(&mut self, p: Point, stamp: u32) {
        if let Some(i) = self.index(p) {
            if self.stamps[i] == UNVISITED {
                self.stamps[i] = stamp;
            }
        }
    }

    /// Reconstruct the path ending at `destination`.
    ///
    /// Returns `None` if the destination was never reached.
    pub fn backtrack(&self, destination: Point) -> Option<Vec<Point>> {
        backtrack(|p| self.get(p), destination)
    }
}

/// Walk back from `destination` through strictly decreasing stamps.
///
/// `stamp_at` must return [`UNVISITED`] for cells outside the grid. The
/// returned path runs source-first and has exactly `stamp_at(destination)`
/// cells. Returns `None` when the destination is unvisited or the record has
/// a gap (which a correct wavefront never produces).
pub fn backtrack(stamp_at: impl Fn(Point) -> u32, destination: Point) -> Option<Vec<Point>> {
    let last = stamp_at(destination);
    if last == UNVISITED {
        return None;
    }

    let mut path = vec![destination; last as usize];
    let mut cur = destination;
    for want in (SOURCE_STAMP..last).rev() {
        cur = cardinal(cur).into_iter().find(|&n| stamp_at(n) == want)?;
        path[(want - 1) as usize] = cur;
    }
    Some(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stamps_are_write_once() {
        let mut v = VisitMap::new(3, 3);
        let p = Point::new(1, 1);
        assert!(!v.is_visited(p));
        v.stamp(p, 4);
        v.stamp(p, 2);
        assert_eq!(v.get(p), 4);
        v.stamp(Point::new(5, 5), 1);
        assert_eq!(v.get(Point::new(5, 5)), UNVISITED);
    }

    #[test]
    fn backtrack_prefers_west_then_east_then_north_then_south() {
        // Destination (1,1) stamped 3; both (0,1) [west] and (1,0) [north]
        // carry stamp 2. West wins.
        let mut v = VisitMap::new(3, 3);
        v.stamp(Point::new(0, 0), 1);
        v.stamp(Point::new(0, 1), 2);
        v.stamp(Point::new(1, 0), 2);
        v.stamp(Point::new(1, 1), 3);
        assert_eq!(
            v.backtrack(Point::new(1, 1)).unwrap(),
            vec![Point::new(0, 0), Point::new(0, 1), Point::new(1, 1)]
        );
    }

    #[test]
    fn backtrack_of_source_is_single_cell() {
        let mut v = VisitMap::new(2, 2);
        v.stamp(Point::new(1, 0), SOURCE_STAMP);
        assert_eq!(v.backtrack(Point::new(1, 0)), Some(vec![Point::new(1, 0)]));
    }

    #[test]
    fn backtrack_unvisited_or_gapped() {
        let mut v = VisitMap::new(4, 1);
        assert_eq!(v.backtrack(Point::new(3, 0)), None);
        v.stamp(Point::new(0, 0), 1);
        v.stamp(Point::new(3, 0), 4);
        assert_eq!(v.backtrack(Point::new(3, 0)), None);
    }
}
