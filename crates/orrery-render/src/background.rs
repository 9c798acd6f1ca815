//! Fullscreen background image drawn behind everything else.

use crate::depth::DepthBuffer;
use crate::texture::ManagedTexture;

pub const BACKGROUND_SHADER_SOURCE: &str = include_str!("background.wgsl");

/// Fullscreen-triangle pipeline sampling the texture bound at group 0.
///
/// Depth is attached but neither tested nor written, so anything drawn later
/// covers the background.
pub struct BackgroundPipeline {
    pub pipeline: wgpu::RenderPipeline,
}

impl BackgroundPipeline {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("background-shader"),
            source: wgpu::ShaderSource::Wgsl(BACKGROUND_SHADER_SOURCE.into()),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("background-pipeline-layout"),
            bind_group_layouts: &[texture_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("background-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: Some(DepthBuffer::disabled_state()),
            multisample: wgpu::MultisampleState {
                count: sample_count,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        Self { pipeline }
    }

    pub fn draw<'a>(&self, render_pass: &mut wgpu::RenderPass<'a>, texture: &ManagedTexture) {
        render_pass.set_pipeline(&self.pipeline);
        render_pass.set_bind_group(0, &texture.bind_group, &[]);
        render_pass.draw(0..3, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device_queue;
    use crate::texture::{TEXTURE_FORMAT, TextureManager};

    #[test]
    fn test_shader_has_entry_points() {
        assert!(BACKGROUND_SHADER_SOURCE.contains("fn vs_main"));
        assert!(BACKGROUND_SHADER_SOURCE.contains("fn fs_main"));
    }

    #[test]
    fn test_pipeline_creation_with_msaa() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let textures = TextureManager::new(&device);
        let _pipeline = BackgroundPipeline::new(&device, TEXTURE_FORMAT, 4, textures.bind_group_layout());
    }
}
