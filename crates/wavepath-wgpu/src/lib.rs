//! Compute-shader backend for wavepath using wgpu.
//!
//! The whole batch is searched at once: a 3-D dispatch of
//! `ceil(w/16) x ceil(h/16) x batch` invocations advances every request's
//! wavefront by one round per compute pass, then a single backtracking pass
//! packs every path into one shared result buffer. Both kernels live next to
//! this file (`wave.wgsl`, `backtrack.wgsl`).
//!
//! Uses:
//! - [`wgpu`] for device access and compute dispatch
//! - [`bytemuck`] for the host mirrors of the buffer layouts
//! - [`pollster`] to block on adapter and device requests

mod context;
mod error;
pub mod layout;

use std::sync::Arc;
use std::sync::mpsc;

use wgpu::util::DeviceExt;

use wavepath_core::{Grid, PathItem, Pathfinder, Result, SearchConfig};

use layout::{ITERATION_OFFSET, Params, RequestRecord, StampEpoch};

pub use context::request_device;
pub use error::GpuError;

// ---------------------------------------------------------------------------
// Map-sized resources
// ---------------------------------------------------------------------------

/// Buffers whose size depends on the grid dimensions.
///
/// Rebuilt whenever `set_map` sees new dimensions, so nothing here can
/// outlive the grid shape it was sized for.
struct MapBuffers {
    width: i32,
    height: i32,
    rounds: u32,
    mask: wgpu::Buffer,
    slab: wgpu::Buffer,
    iterations: wgpu::Buffer,
    wave_group: wgpu::BindGroup,
    backtrack_group: wgpu::BindGroup,
}

// ---------------------------------------------------------------------------
// GpuPathfinder
// ---------------------------------------------------------------------------

/// Breadth-first wavefront search run as wgpu compute dispatches.
///
/// Implements [`Pathfinder`]; results match the CPU backend cell for cell
/// as long as the batch fits in `max_batch` and its paths fit in
/// `result_capacity`.
pub struct GpuPathfinder {
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: SearchConfig,
    wave: wgpu::ComputePipeline,
    backtrack: wgpu::ComputePipeline,
    params: wgpu::Buffer,
    batch: wgpu::Buffer,
    results: wgpu::Buffer,
    batch_readback: wgpu::Buffer,
    results_readback: wgpu::Buffer,
    map: Option<MapBuffers>,
    epoch: StampEpoch,
}

impl GpuPathfinder {
    /// Acquire a device and build the backend on it.
    pub fn new(config: SearchConfig) -> std::result::Result<Self, GpuError> {
        let (device, queue) = request_device()?;
        Self::with_device(device, queue, config)
    }

    /// Build the backend on an existing device.
    ///
    /// Compiles both kernels and allocates every buffer whose size does not
    /// depend on the grid.
    pub fn with_device(
        device: wgpu::Device,
        queue: wgpu::Queue,
        config: SearchConfig,
    ) -> std::result::Result<Self, GpuError> {
        config.validate().map_err(GpuError::Config)?;

        let limit = device.limits().max_compute_workgroups_per_dimension;
        if config.max_batch > limit {
            return Err(GpuError::BatchTooLarge {
                max_batch: config.max_batch,
                limit,
            });
        }

        let wave = compute_pipeline(&device, "wave", include_str!("wave.wgsl"));
        let backtrack = compute_pipeline(&device, "backtrack", include_str!("backtrack.wgsl"));

        let params = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("params"),
            size: size_of::<Params>() as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let batch_size = layout::batch_bytes(config.max_batch);
        let batch = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch"),
            size: batch_size,
            usage: wgpu::BufferUsages::STORAGE
                | wgpu::BufferUsages::COPY_DST
                | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let batch_readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("batch readback"),
            size: batch_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let results_size = layout::result_bytes(config.result_capacity);
        let results = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("results"),
            size: results_size,
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_SRC,
            mapped_at_creation: false,
        });
        let results_readback = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("results readback"),
            size: results_size,
            usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        log::debug!(
            "gpu: backend ready (max_batch {}, result capacity {}, max iterations {})",
            config.max_batch,
            config.result_capacity,
            config.max_iterations
        );

        Ok(Self {
            device,
            queue,
            config,
            wave,
            backtrack,
            params,
            batch,
            results,
            batch_readback,
            results_readback,
            map: None,
            epoch: StampEpoch::default(),
        })
    }

    /// The configuration this backend was built with.
    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    fn allocate_map(&self, grid: &Grid, mask: &[u32]) -> std::result::Result<MapBuffers, GpuError> {
        let (width, height) = (grid.width(), grid.height());

        let bytes = layout::slab_bytes(width, height, self.config.max_batch);
        let limits = self.device.limits();
        let limit = u64::from(limits.max_storage_buffer_binding_size).min(limits.max_buffer_size);
        if bytes > limit {
            return Err(GpuError::SlabTooLarge { bytes, limit });
        }

        // Zero-sized storage bindings are invalid; an empty grid gets one
        // blocked placeholder cell that no invocation ever reads.
        let mask = if mask.is_empty() { &[1][..] } else { mask };
        let mask = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("mask"),
                contents: bytemuck::cast_slice(mask),
                usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            });

        // Fresh buffers are zeroed, which reads as unvisited for base 0.
        let slab = self.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("slab"),
            size: bytes.max(4),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let rounds = layout::rounds_for(self.config.max_iterations, grid.len());
        let table: Vec<u32> = (0..rounds).collect();
        let iterations = self
            .device
            .create_buffer_init(&wgpu::util::BufferInitDescriptor {
                label: Some("iteration table"),
                contents: bytemuck::cast_slice(&table),
                usage: wgpu::BufferUsages::COPY_SRC,
            });

        let wave_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("wave bg"),
            layout: &self.wave.get_bind_group_layout(0),
            entries: &[
                entry(0, &self.params),
                entry(1, &mask),
                entry(2, &self.batch),
                entry(3, &slab),
            ],
        });
        let backtrack_group = self.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("backtrack bg"),
            layout: &self.backtrack.get_bind_group_layout(0),
            entries: &[
                entry(0, &self.params),
                entry(1, &self.batch),
                entry(2, &slab),
                entry(3, &self.results),
            ],
        });

        log::debug!("gpu: allocated {width}x{height} map, slab {bytes} bytes, {rounds} rounds");

        Ok(MapBuffers {
            width,
            height,
            rounds,
            mask,
            slab,
            iterations,
            wave_group,
            backtrack_group,
        })
    }

    /// Map both readback buffers after `submission` and copy them out.
    fn read_back(
        &self,
        submission: wgpu::SubmissionIndex,
        batch: u32,
    ) -> std::result::Result<(Vec<RequestRecord>, Vec<[i32; 2]>), GpuError> {
        let batch_slice = self.batch_readback.slice(..layout::batch_bytes(batch));
        let results_slice = self.results_readback.slice(..);

        let (tx, rx) = mpsc::channel();
        let batch_tx = tx.clone();
        batch_slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = batch_tx.send(r);
        });
        results_slice.map_async(wgpu::MapMode::Read, move |r| {
            let _ = tx.send(r);
        });

        self.device.poll(wgpu::PollType::Wait {
            submission_index: Some(submission),
            timeout: None,
        })?;
        for r in rx.iter().take(2) {
            r?;
        }

        let records = {
            let view = batch_slice.get_mapped_range();
            let header = size_of::<layout::BatchHeader>();
            bytemuck::cast_slice::<u8, RequestRecord>(&view[header..]).to_vec()
        };
        let cells = {
            let view = results_slice.get_mapped_range();
            bytemuck::cast_slice::<u8, [i32; 2]>(&view).to_vec()
        };
        self.batch_readback.unmap();
        self.results_readback.unmap();
        Ok((records, cells))
    }
}

impl Pathfinder for GpuPathfinder {
    fn name(&self) -> &'static str {
        "gpu"
    }

    fn set_map(&mut self, grid: Arc<Grid>) -> Result<()> {
        let mask: Vec<u32> = grid.mask().iter().map(|&b| u32::from(b)).collect();

        if let Some(map) = &self.map {
            if map.width == grid.width() && map.height == grid.height() {
                self.queue
                    .write_buffer(&map.mask, 0, bytemuck::cast_slice(&mask));
                log::debug!("gpu: mask refreshed");
                return Ok(());
            }
        }

        // Drop the old buffers first so a failed allocation leaves no map.
        self.map = None;
        self.map = Some(self.allocate_map(&grid, &mask)?);
        self.epoch.reset();
        Ok(())
    }

    fn find_paths(&mut self, items: &mut [PathItem]) -> Result<()> {
        let Some(map) = &self.map else {
            log::debug!("gpu: find_paths before set_map, nothing to do");
            return Ok(());
        };

        let max_batch = self.config.max_batch as usize;
        if items.len() > max_batch {
            log::warn!(
                "gpu: batch of {} exceeds max_batch {}; requests {}.. left unresolved",
                items.len(),
                max_batch,
                max_batch
            );
            for item in &mut items[max_batch..] {
                item.path = None;
            }
        }
        let n = items.len().min(max_batch);
        if n == 0 {
            return Ok(());
        }
        let count = n as u32;

        let claim = self.epoch.claim(map.rounds);
        let params = Params {
            width: map.width as u32,
            height: map.height as u32,
            base: claim.base,
            iteration: 0,
            capacity: self.config.result_capacity,
            count,
            _pad: [0; 2],
        };
        self.queue
            .write_buffer(&self.params, 0, bytemuck::bytes_of(&params));
        self.queue.write_buffer(
            &self.batch,
            0,
            &layout::encode_batch(items[..n].iter().map(|i| i.request)),
        );

        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("find paths"),
            });
        if claim.clear {
            log::debug!("gpu: stamp range exhausted, clearing slab");
            encoder.clear_buffer(&map.slab, 0, None);
        }

        let (gx, gy, gz) = layout::wave_groups(map.width, map.height, count);
        for i in 0..map.rounds {
            encoder.copy_buffer_to_buffer(
                &map.iterations,
                u64::from(i) * 4,
                &self.params,
                ITERATION_OFFSET,
                4u64,
            );
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("wave"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.wave);
            pass.set_bind_group(0, &map.wave_group, &[]);
            pass.dispatch_workgroups(gx, gy, gz);
        }
        {
            let mut pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
                label: Some("backtrack"),
                timestamp_writes: None,
            });
            pass.set_pipeline(&self.backtrack);
            pass.set_bind_group(0, &map.backtrack_group, &[]);
            pass.dispatch_workgroups(layout::backtrack_groups(count), 1, 1);
        }

        encoder.copy_buffer_to_buffer(
            &self.batch,
            0,
            &self.batch_readback,
            0,
            layout::batch_bytes(count),
        );
        encoder.copy_buffer_to_buffer(
            &self.results,
            0,
            &self.results_readback,
            0,
            layout::result_bytes(self.config.result_capacity),
        );

        log::debug!(
            "gpu: {} rounds of {gx}x{gy}x{gz} workgroups, base {}",
            map.rounds,
            claim.base
        );
        let submission = self.queue.submit(Some(encoder.finish()));
        let (records, cells) = self.read_back(submission, count)?;

        let lengths: Vec<u32> = records.iter().map(|r| r.completed).collect();
        let paths = layout::slice_results(&lengths, &cells);
        for (item, path) in items.iter_mut().zip(paths) {
            item.path = path;
        }

        log::debug!(
            "gpu: resolved {}/{} requests",
            items.iter().filter(|i| i.path.is_some()).count(),
            items.len()
        );
        Ok(())
    }
}

fn compute_pipeline(device: &wgpu::Device, label: &str, source: &str) -> wgpu::ComputePipeline {
    let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
        label: Some(label),
        source: wgpu::ShaderSource::Wgsl(source.into()),
    });
    device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
        label: Some(label),
        layout: None,
        module: &module,
        entry_point: Some("main"),
        compilation_options: Default::default(),
        cache: None,
    })
}

fn entry(binding: u32, buffer: &wgpu::Buffer) -> wgpu::BindGroupEntry<'_> {
    wgpu::BindGroupEntry {
        binding,
        resource: buffer.as_entire_binding(),
    }
}
