//! Host-side mirrors of the kernel buffer layouts, plus the arithmetic the
//! driver does around them (dispatch geometry, stamp epochs, result slicing).
//!
//! Everything here is plain data and runs without a device.

use bytemuck::{Pod, Zeroable};
use wavepath_core::{PathRequest, Point};

// ---------------------------------------------------------------------------
// GPU types (must match wave.wgsl and backtrack.wgsl)
// ---------------------------------------------------------------------------

/// Wavefront workgroup edge; the kernel is `@workgroup_size(16, 16, 1)`.
pub const WAVE_TILE: u32 = 16;

/// Backtracking workgroup size; one invocation per request.
pub const BACKTRACK_GROUP: u32 = 64;

/// Per-call parameters shared by both kernels.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Params {
    pub width: u32,
    pub height: u32,
    /// Stamps `<= base` read as unvisited.
    pub base: u32,
    /// Rewritten from the iteration table before every wavefront pass.
    pub iteration: u32,
    pub capacity: u32,
    pub count: u32,
    pub _pad: [u32; 2],
}

/// Byte offset of [`Params::iteration`].
pub const ITERATION_OFFSET: u64 = 12;

/// Leading words of the batch buffer.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct BatchHeader {
    pub count: u32,
    pub _reserved: u32,
}

/// One request slot. `completed` is written by the backtracking kernel.
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct RequestRecord {
    pub source: [i32; 2],
    pub destination: [i32; 2],
    pub completed: u32,
    pub _reserved: u32,
}

impl From<PathRequest> for RequestRecord {
    fn from(r: PathRequest) -> Self {
        Self {
            source: [r.source.x, r.source.y],
            destination: [r.destination.x, r.destination.y],
            completed: 0,
            _reserved: 0,
        }
    }
}

/// Size of a batch buffer holding `n` records.
pub const fn batch_bytes(n: u32) -> u64 {
    (size_of::<BatchHeader>() + size_of::<RequestRecord>() * n as usize) as u64
}

/// Size of the packed result buffer for `capacity` cells.
pub const fn result_bytes(capacity: u32) -> u64 {
    (size_of::<[i32; 2]>() * capacity as usize) as u64
}

/// Size of the visitation slab: one `u32` per cell per batch slot.
pub fn slab_bytes(width: i32, height: i32, max_batch: u32) -> u64 {
    let cells = (width.max(0) as u64) * (height.max(0) as u64);
    cells * u64::from(max_batch) * size_of::<u32>() as u64
}

/// Serialise a batch into the byte image of the batch buffer.
pub fn encode_batch(requests: impl ExactSizeIterator<Item = PathRequest>) -> Vec<u8> {
    let header = BatchHeader {
        count: requests.len() as u32,
        _reserved: 0,
    };
    let records: Vec<RequestRecord> = requests.map(RequestRecord::from).collect();
    let mut bytes = Vec::with_capacity(batch_bytes(header.count) as usize);
    bytes.extend_from_slice(bytemuck::bytes_of(&header));
    bytes.extend_from_slice(bytemuck::cast_slice(&records));
    bytes
}

// ---------------------------------------------------------------------------
// Dispatch geometry
// ---------------------------------------------------------------------------

/// Workgroup counts for one wavefront pass over `batch` requests.
pub fn wave_groups(width: i32, height: i32, batch: u32) -> (u32, u32, u32) {
    (
        (width.max(0) as u32).div_ceil(WAVE_TILE),
        (height.max(0) as u32).div_ceil(WAVE_TILE),
        batch,
    )
}

/// Workgroup count for the backtracking pass.
pub fn backtrack_groups(batch: u32) -> u32 {
    batch.div_ceil(BACKTRACK_GROUP)
}

/// Wavefront passes to dispatch per call.
///
/// A shortest path on a grid of `cells` cells has fewer than `cells` steps,
/// so rounds past that can never stamp anything new.
pub fn rounds_for(max_iterations: u32, cells: usize) -> u32 {
    let cells = u32::try_from(cells.max(1)).unwrap_or(u32::MAX);
    max_iterations.min(cells)
}

// ---------------------------------------------------------------------------
// Stamp epochs
// ---------------------------------------------------------------------------

/// Stamp range claimed by one call.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Claim {
    /// Stamps written this call are `base + 1 ..= base + rounds + 1`.
    pub base: u32,
    /// The slab must be zeroed before the first pass.
    pub clear: bool,
}

/// Generation counter that lets the slab be reused without clearing.
///
/// Each call claims a stamp range strictly above everything any earlier
/// call wrote, so stale cells always compare as unvisited. Only when the
/// range would wrap `u32` does the slab need a real clear.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StampEpoch {
    next_base: u32,
}

impl StampEpoch {
    /// An epoch whose next claim starts at `next_base`.
    #[cfg(test)]
    pub(crate) fn starting_at(next_base: u32) -> Self {
        Self { next_base }
    }

    /// Forget all history; valid only for a zeroed slab.
    pub fn reset(&mut self) {
        self.next_base = 0;
    }

    /// Claim the range for a call running `rounds` wavefront passes.
    pub fn claim(&mut self, rounds: u32) -> Claim {
        let span = rounds.saturating_add(1);
        match self.next_base.checked_add(span) {
            Some(end) => {
                let base = self.next_base;
                self.next_base = end;
                Claim { base, clear: false }
            }
            None => {
                self.next_base = span;
                Claim {
                    base: 0,
                    clear: true,
                }
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Result slicing
// ---------------------------------------------------------------------------

/// Split the packed result buffer into per-request paths.
///
/// `lengths[i]` is the `completed` count the backtracking kernel wrote for
/// request `i`; paths are laid out back to back in request order. A zero
/// length means no path. The first request whose cells would run past the
/// end of `cells` and every request after it get `None`.
pub fn slice_results(lengths: &[u32], cells: &[[i32; 2]]) -> Vec<Option<Vec<Point>>> {
    let mut out = Vec::with_capacity(lengths.len());
    let mut offset = 0usize;
    for (i, &len) in lengths.iter().enumerate() {
        let len = len as usize;
        if len == 0 {
            out.push(None);
            continue;
        }
        let end = offset + len;
        if end > cells.len() {
            log::warn!(
                "gpu: result buffer full ({} cells); dropping requests {}..{}",
                cells.len(),
                i,
                lengths.len()
            );
            out.resize(lengths.len(), None);
            break;
        }
        out.push(Some(
            cells[offset..end]
                .iter()
                .map(|&[x, y]| Point::new(x, y))
                .collect(),
        ));
        offset = end;
    }
    out
}
