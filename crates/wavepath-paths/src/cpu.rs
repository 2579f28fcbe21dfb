//! Thread-parallel wavefront search.
//!
//! Every request in a batch is an independent unit of work on the rayon pool:
//! it owns its [`VisitMap`], reads the shared grid, and writes only its own
//! [`PathItem`]. No locking is needed and the result does not depend on how
//! many workers run.

use std::sync::Arc;

use rayon::prelude::*;
use wavepath_core::{Grid, PathItem, PathRequest, Pathfinder, Point, Result, SearchConfig};

use crate::neighbors::cardinal;
use crate::visit::{SOURCE_STAMP, VisitMap};

/// Breadth-first wavefront search for one request.
///
/// Runs at most `max_iterations` rounds and stops as soon as the destination
/// is stamped. Returns the source-first path, or `None` if the destination
/// is unreachable or further than `max_iterations` steps away.
pub fn search(grid: &Grid, request: PathRequest, max_iterations: u32) -> Option<Vec<Point>> {
    let PathRequest {
        source,
        destination,
    } = request;
    if source == destination {
        return Some(vec![source]);
    }

    let mut visits = VisitMap::new(grid.width(), grid.height());
    visits.stamp(source, SOURCE_STAMP);

    let mut frontier = vec![source];
    let mut next = Vec::new();
    let mut found = false;

    for round in 1..=max_iterations {
        next.clear();
        'expand: for &cell in &frontier {
            for n in cardinal(cell) {
                if grid.is_blocked(n) || visits.is_visited(n) {
                    continue;
                }
                visits.stamp(n, round + 1);
                if n == destination {
                    found = true;
                    break 'expand;
                }
                next.push(n);
            }
        }
        if found || next.is_empty() {
            break;
        }
        std::mem::swap(&mut frontier, &mut next);
    }

    if !found {
        return None;
    }
    visits.backtrack(destination)
}

/// [`Pathfinder`] that runs one [`search`] per request on the rayon pool.
#[derive(Debug, Clone)]
pub struct CpuPathfinder {
    grid: Option<Arc<Grid>>,
    max_iterations: u32,
}

impl CpuPathfinder {
    /// Create a backend; only `config.max_iterations` is used.
    pub fn new(config: SearchConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            grid: None,
            max_iterations: config.max_iterations,
        })
    }

    /// The round cap this backend was built with.
    pub fn max_iterations(&self) -> u32 {
        self.max_iterations
    }

    /// The grid currently installed, if any.
    pub fn grid(&self) -> Option<&Arc<Grid>> {
        self.grid.as_ref()
    }
}

impl Pathfinder for CpuPathfinder {
    fn name(&self) -> &'static str {
        "cpu"
    }

    fn set_map(&mut self, grid: Arc<Grid>) -> Result<()> {
        log::debug!("cpu: map set to {}x{}", grid.width(), grid.height());
        self.grid = Some(grid);
        Ok(())
    }

    fn find_paths(&mut self, items: &mut [PathItem]) -> Result<()> {
        let Some(grid) = self.grid.as_deref() else {
            log::debug!("cpu: find_paths before set_map, nothing to do");
            return Ok(());
        };
        let max_iterations = self.max_iterations;

        items.par_iter_mut().for_each(|item| {
            item.path = search(grid, item.request, max_iterations);
        });

        log::debug!(
            "cpu: resolved {}/{} requests",
            items.iter().filter(|i| i.path.is_some()).count(),
            items.len()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distance::shortest_distance;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use wavepath_core::batch_from;

    fn req(sx: i32, sy: i32, dx: i32, dy: i32) -> PathRequest {
        PathRequest::new(Point::new(sx, sy), Point::new(dx, dy))
    }

    fn finder(grid: Grid, max_iterations: u32) -> CpuPathfinder {
        let mut f =
            CpuPathfinder::new(SearchConfig::default().with_max_iterations(max_iterations))
                .unwrap();
        f.set_map(Arc::new(grid)).unwrap();
        f
    }

    /// A resolved path starts at the source, ends at the destination, moves
    /// one unit step at a time, never repeats a cell and never enters a wall.
    fn assert_valid_path(grid: &Grid, request: PathRequest, path: &[Point]) {
        assert_eq!(path.first(), Some(&request.source));
        assert_eq!(path.last(), Some(&request.destination));
        for w in path.windows(2) {
            assert!(w[0].is_adjacent(w[1]), "{} -> {} is not a unit step", w[0], w[1]);
        }
        let mut seen = std::collections::HashSet::new();
        for p in path {
            assert!(grid.is_free(*p), "{p} is blocked");
            assert!(seen.insert(*p), "{p} repeated");
        }
    }

    #[test]
    fn open_seven_by_seven_corner_to_corner() {
        let grid = Grid::new(7, 7);
        let r = req(0, 0, 6, 6);
        let path = search(&grid, r, 100).unwrap();
        assert_eq!(path.len(), 13);
        assert_valid_path(&grid, r, &path);
    }

    #[test]
    fn open_grid_prefers_west_east_before_north_south() {
        // Backtracking from (2,2) scans W first, so the path arrives along
        // the bottom row and leaves the source going south.
        let grid = Grid::new(3, 3);
        let path = search(&grid, req(0, 0, 2, 2), 10).unwrap();
        assert_eq!(
            path,
            vec![
                Point::new(0, 0),
                Point::new(0, 1),
                Point::new(0, 2),
                Point::new(1, 2),
                Point::new(2, 2),
            ]
        );
    }

    #[test]
    fn full_height_wall_blocks_regardless_of_cap() {
        let grid = Grid::from_fn(9, 6, |p| p.x == 4);
        for cap in [1, 10, 1000] {
            assert_eq!(search(&grid, req(0, 0, 8, 5), cap), None);
        }
    }

    #[test]
    fn cap_is_a_hard_distance_ceiling() {
        let grid = Grid::new(10, 1);
        let r = req(0, 0, 9, 0);
        assert_eq!(search(&grid, r, 8), None);
        assert_eq!(search(&grid, r, 9).map(|p| p.len()), Some(10));
    }

    #[test]
    fn adjacent_and_identical_endpoints() {
        let grid = Grid::new(3, 3);
        assert_eq!(
            search(&grid, req(1, 1, 2, 1), 1),
            Some(vec![Point::new(1, 1), Point::new(2, 1)])
        );
        assert_eq!(search(&grid, req(1, 1, 1, 1), 1), Some(vec![Point::new(1, 1)]));
    }

    #[test]
    fn find_paths_before_set_map_is_noop() {
        let mut f = CpuPathfinder::new(SearchConfig::default()).unwrap();
        let mut batch = batch_from([req(0, 0, 1, 0)]);
        f.find_paths(&mut batch).unwrap();
        assert!(batch[0].path.is_none());
    }

    #[test]
    fn stale_result_is_cleared_when_map_changes() {
        let mut f = finder(Grid::new(5, 5), 50);
        let mut batch = batch_from([req(0, 0, 4, 0)]);
        f.find_paths(&mut batch).unwrap();
        assert!(batch[0].path.is_some());

        f.set_map(Arc::new(Grid::from_fn(5, 5, |p| p.x == 2))).unwrap();
        f.find_paths(&mut batch).unwrap();
        assert!(batch[0].path.is_none());
    }

    #[test]
    fn paths_are_shortest_on_random_mazes() {
        let mut rng = StdRng::seed_from_u64(7);
        let grid = wavepath_mapgen::maze(31, 21, &mut rng).unwrap();
        let requests = wavepath_mapgen::random_requests(&grid, 40, &mut rng);
        let mut f = finder(grid.clone(), 10_000);
        let mut batch = batch_from(requests);
        f.find_paths(&mut batch).unwrap();

        for item in &batch {
            let want = shortest_distance(&grid, item.request.source, item.request.destination);
            let path = item.path.as_ref().expect("maze is a spanning tree");
            assert_eq!(Some(path.len() as u32 - 1), want);
            assert_valid_path(&grid, item.request, path);
        }
    }

    #[test]
    fn unreachable_pairs_report_no_path() {
        let grid = Grid::parse(
            "
            ..#..
            ..#..
            ###..
            .....
            ",
        )
        .unwrap();
        let mut f = finder(grid, 100);
        let mut batch = batch_from([req(0, 0, 4, 3), req(1, 1, 0, 3), req(3, 0, 0, 3)]);
        f.find_paths(&mut batch).unwrap();
        assert!(batch[0].path.is_none());
        assert!(batch[1].path.is_none());
        assert_eq!(batch[2].path_len(), 7);
    }

    #[test]
    fn results_do_not_depend_on_worker_count() {
        let mut rng = StdRng::seed_from_u64(11);
        let grid = wavepath_mapgen::maze(41, 41, &mut rng).unwrap();
        let requests = wavepath_mapgen::random_requests(&grid, 32, &mut rng);
        let mut f = finder(grid, 10_000);

        let mut many = batch_from(requests.iter().copied());
        f.find_paths(&mut many).unwrap();

        let single = rayon::ThreadPoolBuilder::new()
            .num_threads(1)
            .build()
            .unwrap();
        let mut one = batch_from(requests.iter().copied());
        single.install(|| f.find_paths(&mut one)).unwrap();

        assert_eq!(many, one);
    }

    #[test]
    fn find_paths_is_idempotent() {
        let mut rng = StdRng::seed_from_u64(3);
        let grid = wavepath_mapgen::maze(21, 21, &mut rng).unwrap();
        let requests = wavepath_mapgen::random_requests(&grid, 10, &mut rng);
        let mut f = finder(grid, 10_000);
        let mut batch = batch_from(requests);
        f.find_paths(&mut batch).unwrap();
        let first = batch.clone();
        f.find_paths(&mut batch).unwrap();
        assert_eq!(first, batch);
    }
}
