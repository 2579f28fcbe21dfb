use wavepath_core::Error;

/// Failures raised by the compute backend.
///
/// Device setup problems surface from [`GpuPathfinder::new`](crate::GpuPathfinder::new);
/// the remaining variants can only occur on a live device.
#[derive(Debug, thiserror::Error)]
pub enum GpuError {
    #[error("invalid configuration: {0}")]
    Config(#[source] Error),

    #[error("no suitable GPU adapter: {0}")]
    NoAdapter(#[from] wgpu::RequestAdapterError),

    #[error("device request failed: {0}")]
    DeviceRequest(#[from] wgpu::RequestDeviceError),

    #[error("visitation slab needs {bytes} bytes, device allows {limit}")]
    SlabTooLarge { bytes: u64, limit: u64 },

    #[error("max_batch {max_batch} exceeds the device's {limit} workgroups per dimension")]
    BatchTooLarge { max_batch: u32, limit: u32 },

    #[error("device poll failed: {0}")]
    Poll(#[from] wgpu::PollError),

    #[error("buffer map failed: {0}")]
    Map(#[from] wgpu::BufferAsyncError),
}

impl From<GpuError> for Error {
    fn from(e: GpuError) -> Self {
        Error::Backend(Box::new(e))
    }
}
