//! Batch pathfinding demo: one maze, one batch, both backends.
//!
//! Run: cargo run --release
//! Set `RUST_LOG=debug` to see per-call dispatch details.

use std::sync::Arc;
use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;

use wavepath_core::{PathItem, PathRequest, Pathfinder, SearchConfig, batch_from};
use wavepath_paths::CpuPathfinder;
use wavepath_wgpu::GpuPathfinder;

const WIDTH: i32 = 159;
const HEIGHT: i32 = 119;
const BATCH: usize = 64;
const RUNS: u32 = 10;
const SEED: u64 = 0x5eed;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        log::error!("{e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let mut rng = StdRng::seed_from_u64(SEED);
    let grid = Arc::new(wavepath_mapgen::maze(WIDTH, HEIGHT, &mut rng)?);
    let requests = wavepath_mapgen::random_requests(&grid, BATCH, &mut rng);
    log::info!(
        "maze {WIDTH}x{HEIGHT}, {} free cells, {} requests",
        grid.free_cells().len(),
        requests.len()
    );

    let config = SearchConfig::default().with_result_capacity(1 << 18);

    let mut backends: Vec<Box<dyn Pathfinder>> = vec![Box::new(CpuPathfinder::new(config)?)];
    match GpuPathfinder::new(config) {
        Ok(gpu) => backends.push(Box::new(gpu)),
        Err(e) => log::warn!("gpu backend unavailable, running cpu only: {e}"),
    }

    let mut outcomes = Vec::with_capacity(backends.len());
    for backend in &mut backends {
        backend.set_map(grid.clone())?;
        let (batch, mean) = bench(backend.as_mut(), &requests)?;
        let resolved = batch.iter().filter(|i| i.path.is_some()).count();
        let cells: usize = batch.iter().map(PathItem::path_len).sum();
        log::info!(
            "{:>3}: {:>9.3?} per call, {resolved}/{} resolved, {cells} path cells",
            backend.name(),
            mean,
            batch.len()
        );
        outcomes.push((backend.name(), batch));
    }

    if let [(a, first), (b, second)] = outcomes.as_slice() {
        let mismatched: Vec<usize> = first
            .iter()
            .zip(second)
            .enumerate()
            .filter(|(_, (x, y))| x.path != y.path)
            .map(|(i, _)| i)
            .collect();
        if mismatched.is_empty() {
            log::info!("{a} and {b} agree on every path");
        } else {
            log::warn!("{a} and {b} disagree on requests {mismatched:?}");
        }
    }
    Ok(())
}

/// Run `RUNS` calls over the same batch and return it with the mean wall
/// time per call. Every call overwrites the previous results.
fn bench(
    finder: &mut dyn Pathfinder,
    requests: &[PathRequest],
) -> wavepath_core::Result<(Vec<PathItem>, Duration)> {
    let mut total = Duration::ZERO;
    let mut batch = batch_from(requests.iter().copied());
    for _ in 0..RUNS {
        let start = Instant::now();
        finder.find_paths(&mut batch)?;
        total += start.elapsed();
    }
    Ok((batch, total / RUNS))
}
