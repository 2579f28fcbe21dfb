//! Adapter and device acquisition.

use crate::error::GpuError;

/// Request a high-performance adapter and a compute-capable device.
///
/// Blocks on the async wgpu calls with `pollster`. The device is created
/// with the adapter's own limits so large grids can use the full storage
/// buffer binding size.
pub fn request_device() -> Result<(wgpu::Device, wgpu::Queue), GpuError> {
    pollster::block_on(request_device_async())
}

async fn request_device_async() -> Result<(wgpu::Device, wgpu::Queue), GpuError> {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });

    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: None,
            force_fallback_adapter: false,
        })
        .await?;

    let info = adapter.get_info();
    log::info!(
        "gpu: using adapter {} ({:?}, {:?})",
        info.name,
        info.backend,
        info.device_type
    );

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("wavepath"),
            required_limits: adapter.limits(),
            ..Default::default()
        })
        .await?;
    Ok((device, queue))
}
