//! Multisampled colour target resolved into the swapchain image.

/// Colour attachment rendered at `sample_count` samples and resolved into the
/// surface texture at the end of the pass.
pub struct MsaaBuffer {
    pub view: wgpu::TextureView,
    format: wgpu::TextureFormat,
    width: u32,
    height: u32,
    sample_count: u32,
}

impl MsaaBuffer {
    /// `None` when `sample_count` is 1; the pass then draws straight into the surface.
    pub fn new(
        device: &wgpu::Device,
        format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        sample_count: u32,
    ) -> Option<Self> {
        if sample_count <= 1 {
            return None;
        }
        let (width, height) = (width.max(1), height.max(1));
        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("msaa-color"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count,
            dimension: wgpu::TextureDimension::D2,
            format,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        Some(Self {
            view: texture.create_view(&wgpu::TextureViewDescriptor::default()),
            format,
            width,
            height,
            sample_count,
        })
    }

    /// Recreate at new dimensions. No-op if they are unchanged.
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        if self.width == width.max(1) && self.height == height.max(1) {
            return;
        }
        if let Some(next) = Self::new(device, self.format, width, height, self.sample_count) {
            *self = next;
        }
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device_queue;

    #[test]
    fn test_single_sample_needs_no_buffer() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        assert!(
            MsaaBuffer::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb, 64, 64, 1).is_none()
        );
    }

    #[test]
    fn test_resize() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let mut msaa =
            MsaaBuffer::new(&device, wgpu::TextureFormat::Rgba8UnormSrgb, 64, 64, 4).unwrap();
        msaa.resize(&device, 128, 32);
        assert_eq!(msaa.size(), (128, 32));
    }
}
