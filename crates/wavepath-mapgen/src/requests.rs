//! Random request batches.

use rand::{Rng, RngExt};
use wavepath_core::{Grid, PathRequest};

/// Draw up to `count` requests whose endpoints are all distinct free cells.
///
/// `2 * count` cells are picked without replacement by a partial
/// Fisher-Yates shuffle of the free cells and paired off in draw order.
/// When the grid has fewer than `2 * count` free cells, as many pairs as fit
/// are returned.
pub fn random_requests(grid: &Grid, count: usize, rng: &mut impl Rng) -> Vec<PathRequest> {
    let mut cells = grid.free_cells();
    let picks = (count * 2).min(cells.len() & !1);
    for i in 0..picks {
        let j = rng.random_range(i..cells.len());
        cells.swap(i, j);
    }
    cells[..picks]
        .chunks_exact(2)
        .map(|pair| PathRequest::new(pair[0], pair[1]))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::collections::HashSet;

    #[test]
    fn endpoints_are_distinct_free_cells() {
        let grid = Grid::from_fn(12, 12, |p| (p.x + p.y) % 3 == 0);
        let mut rng = StdRng::seed_from_u64(8);
        let reqs = random_requests(&grid, 30, &mut rng);
        assert_eq!(reqs.len(), 30);

        let mut seen = HashSet::new();
        for r in &reqs {
            for p in [r.source, r.destination] {
                assert!(grid.is_free(p));
                assert!(seen.insert(p), "{p} drawn twice");
            }
        }
    }

    #[test]
    fn short_grid_yields_fewer_pairs() {
        // Five free cells leave room for two pairs.
        let grid = Grid::from_fn(5, 2, |p| p.y == 1);
        let mut rng = StdRng::seed_from_u64(0);
        assert_eq!(random_requests(&grid, 10, &mut rng).len(), 2);
        assert!(random_requests(&Grid::new(0, 0), 4, &mut rng).is_empty());
    }

    #[test]
    fn zero_count_is_empty() {
        let mut rng = StdRng::seed_from_u64(0);
        assert!(random_requests(&Grid::new(4, 4), 0, &mut rng).is_empty());
    }
}
