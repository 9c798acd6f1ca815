//! Reverse-Z depth buffer.
//!
//! The near plane maps to 1.0 and the far plane to 0.0, which keeps float
//! precision where the 0.1..2000 frustum needs it.

/// Depth attachment matching the colour target's size and sample count.
pub struct DepthBuffer {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl DepthBuffer {
    pub const FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

    /// Reverse-Z clear value: 0.0 represents the far plane.
    pub const CLEAR_VALUE: f32 = 0.0;

    /// Reverse-Z comparison: closer fragments have higher depth values.
    pub const COMPARE_FUNCTION: wgpu::CompareFunction = wgpu::CompareFunction::GreaterEqual;

    pub fn new(device: &wgpu::Device, width: u32, height: u32, sample_count: u32) -> Self {
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("depth-buffer"),
            size: wgpu::Extent3d {
                width: width.max(1),
                height: height.max(1),
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format: Self::FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            texture,
            view,
            width: width.max(1),
            height: height.max(1),
            sample_count,
        }
    }

    /// Recreate at new dimensions. No-op if they are unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        *self = Self::new(device, width, height, self.sample_count);
    }

    /// Depth-stencil state for pipelines that write depth.
    pub fn write_state() -> wgpu::DepthStencilState {
        Self::state(true, Self::COMPARE_FUNCTION)
    }

    /// Depth-stencil state for pipelines that test but never write.
    pub fn read_only_state() -> wgpu::DepthStencilState {
        Self::state(false, Self::COMPARE_FUNCTION)
    }

    /// Depth-stencil state for draws that ignore depth entirely.
    pub fn disabled_state() -> wgpu::DepthStencilState {
        Self::state(false, wgpu::CompareFunction::Always)
    }

    fn state(write: bool, compare: wgpu::CompareFunction) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: Self::FORMAT,
            depth_write_enabled: write,
            depth_compare: compare,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }
}

/// Create a headless device and queue for tests. `None` when no adapter exists.
#[cfg(test)]
pub(crate) fn create_test_device_queue() -> Option<(wgpu::Device, wgpu::Queue)> {
    pollster::block_on(async {
        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                power_preference: wgpu::PowerPreference::default(),
                compatible_surface: None,
                force_fallback_adapter: false,
            })
            .await
            .ok()?;

        adapter
            .request_device(&wgpu::DeviceDescriptor::default())
            .await
            .ok()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_z_constants() {
        assert_eq!(DepthBuffer::FORMAT, wgpu::TextureFormat::Depth32Float);
        assert_eq!(DepthBuffer::CLEAR_VALUE, 0.0);
        assert_eq!(
            DepthBuffer::COMPARE_FUNCTION,
            wgpu::CompareFunction::GreaterEqual
        );
    }

    #[test]
    fn test_states() {
        assert!(DepthBuffer::write_state().depth_write_enabled);
        let read_only = DepthBuffer::read_only_state();
        assert!(!read_only.depth_write_enabled);
        assert_eq!(read_only.depth_compare, wgpu::CompareFunction::GreaterEqual);
        let disabled = DepthBuffer::disabled_state();
        assert!(!disabled.depth_write_enabled);
        assert_eq!(disabled.depth_compare, wgpu::CompareFunction::Always);
    }

    #[test]
    fn test_dimensions_and_sample_count() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 1920, 1080, 4);
        assert_eq!((depth.width(), depth.height()), (1920, 1080));
        assert_eq!(depth.texture.sample_count(), 4);
    }

    #[test]
    fn test_resize_keeps_sample_count() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut depth = DepthBuffer::new(&device, 800, 600, 4);
        depth.resize(&device, 1024, 768);
        assert_eq!((depth.width(), depth.height()), (1024, 768));
        assert_eq!(depth.sample_count(), 4);
    }

    #[test]
    fn test_zero_size_clamped() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let depth = DepthBuffer::new(&device, 0, 0, 1);
        assert_eq!((depth.width(), depth.height()), (1, 1));
    }
}
