//! Randomized depth-first maze carving.

use rand::{Rng, RngExt};
use wavepath_core::{Error, Grid, Point, Result};

/// Two-cell steps between maze rooms, in the same W, E, N, S order the
/// search backends use.
const STEPS: [Point; 4] = [
    Point::new(-2, 0),
    Point::new(2, 0),
    Point::new(0, -2),
    Point::new(0, 2),
];

/// Generate a `width` x `height` maze.
///
/// Every cell starts blocked. Rooms live on odd coordinates; a depth-first
/// walk from a random room carves each unvisited neighbouring room together
/// with the wall between them, backing up when it gets stuck. The result is
/// a spanning tree over all rooms with a solid border.
///
/// Both dimensions must be odd and at least 3, otherwise
/// [`Error::InvalidDimensions`] is returned.
pub fn maze(width: i32, height: i32, rng: &mut impl Rng) -> Result<Grid> {
    if width < 3 || height < 3 || width % 2 == 0 || height % 2 == 0 {
        return Err(Error::InvalidDimensions { width, height });
    }

    let mut grid = Grid::from_fn(width, height, |_| true);

    // Pick any interior cell, then snap it onto the odd lattice.
    let mut start = Point::new(
        rng.random_range(1..width - 1),
        rng.random_range(1..height - 1),
    );
    start.x |= 1;
    start.y |= 1;

    grid.set_blocked(start, false);
    let mut stack = vec![start];
    let mut open = Vec::with_capacity(STEPS.len());

    while let Some(&cur) = stack.last() {
        open.clear();
        open.extend(
            STEPS
                .iter()
                .map(|&d| cur + d)
                .filter(|&n| is_room(&grid, n) && grid.is_blocked(n)),
        );
        if open.is_empty() {
            stack.pop();
            continue;
        }
        let next = open[rng.random_range(0..open.len())];
        let wall = Point::new((cur.x + next.x) / 2, (cur.y + next.y) / 2);
        grid.set_blocked(wall, false);
        grid.set_blocked(next, false);
        stack.push(next);
    }

    Ok(grid)
}

/// Rooms are the odd-coordinate cells strictly inside the border.
fn is_room(grid: &Grid, p: Point) -> bool {
    p.x > 0 && p.y > 0 && p.x < grid.width() - 1 && p.y < grid.height() - 1
}
