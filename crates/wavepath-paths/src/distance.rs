use std::collections::VecDeque;

use wavepath_core::{Grid, Point};

use crate::neighbors::cardinal;

/// Sentinel value meaning "unreachable" in distance maps.
pub const UNREACHABLE: i32 = i32::MAX;

/// Single-source breadth-first distance map over the free cells of `grid`.
///
/// Returns one entry per cell in row-major order: the number of unit steps
/// from `source`, or [`UNREACHABLE`]. A blocked or out-of-bounds source
/// reaches nothing. Uses a plain FIFO queue, so it serves as an independent
/// check on the wavefront backends.
pub fn bfs_distances(grid: &Grid, source: Point) -> Vec<i32> {
    let mut dist = vec![UNREACHABLE; grid.len()];
    let Some(si) = grid.index(source).filter(|_| grid.is_free(source)) else {
        return dist;
    };
    dist[si] = 0;

    let mut queue: VecDeque<Point> = VecDeque::new();
    queue.push_back(source);

    while let Some(cp) = queue.pop_front() {
        let Some(ci) = grid.index(cp) else {
            continue;
        };
        let nd = dist[ci] + 1;
        for np in cardinal(cp) {
            if grid.is_blocked(np) {
                continue;
            }
            let Some(ni) = grid.index(np) else {
                continue;
            };
            if dist[ni] != UNREACHABLE {
                continue;
            }
            dist[ni] = nd;
            queue.push_back(np);
        }
    }

    dist
}

/// Shortest unweighted distance from `from` to `to`, if any path exists.
pub fn shortest_distance(grid: &Grid, from: Point, to: Point) -> Option<u32> {
    let i = grid.index(to)?;
    match bfs_distances(grid, from)[i] {
        UNREACHABLE => None,
        d => Some(d as u32),
    }
}
