//! Instanced starfield sprites.
//!
//! Each star is one instance of a six-vertex quad expanded in clip space, so
//! stars stay screen-aligned at any camera angle.

use bytemuck::{Pod, Zeroable};
use orrery_scene::Starfield;

use crate::buffer::BufferAllocator;
use crate::depth::DepthBuffer;
use crate::mesh_pipeline::uniform_layout;

pub const STARFIELD_SHADER_SOURCE: &str = include_str!("starfield.wgsl");

/// Vertices per star quad.
const QUAD_VERTICES: u32 = 6;

/// Sprite colour and size. Bound at group 1, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct StarfieldUniform {
    /// Linear colour (rgb) and sprite size (w).
    pub color_size: [f32; 4],
    /// x = 1.0 when sprites shrink with distance.
    pub flags: [f32; 4],
}

impl StarfieldUniform {
    pub fn new(starfield: &Starfield) -> Self {
        let color = starfield.color.to_linear();
        Self {
            color_size: color.extend(starfield.size).to_array(),
            flags: [
                if starfield.size_attenuation { 1.0 } else { 0.0 },
                0.0,
                0.0,
                0.0,
            ],
        }
    }
}

/// Star positions and sprite parameters uploaded to the GPU.
pub struct StarfieldBuffers {
    pub instance_buffer: wgpu::Buffer,
    pub uniform_buffer: wgpu::Buffer,
    pub bind_group: wgpu::BindGroup,
    pub instance_count: u32,
}

/// Starfield pipeline: frame uniform at group 0, sprite uniform at group 1.
pub struct StarfieldPipeline {
    pub pipeline: wgpu::RenderPipeline,
    pub starfield_bind_group_layout: wgpu::BindGroupLayout,
}

impl StarfieldPipeline {
    /// `frame_bind_group_layout` is the frame uniform layout shared with the mesh pipelines.
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        frame_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("starfield-shader"),
            source: wgpu::ShaderSource::Wgsl(STARFIELD_SHADER_SOURCE.into()),
        });

        let starfield_bind_group_layout = uniform_layout(
            device,
            "starfield-bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<StarfieldUniform>(),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("starfield-pipeline-layout"),
            bind_group_layouts: &[frame_bind_group_layout, &starfield_bind_group_layout],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("starfield-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[instance_layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                cull_mode: None,
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::write_state()),
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

        Self {
            pipeline,
            starfield_bind_group_layout,
        }
    }

    /// Upload star positions and sprite parameters.
    pub fn upload(&self, device: &wgpu::Device, starfield: &Starfield) -> StarfieldBuffers {
        let allocator = BufferAllocator::new(device);
        let positions: Vec<[f32; 3]> = starfield.points().iter().map(|p| p.to_array()).collect();
        let instance_buffer = allocator.create_vertex_buffer("starfield-instances", &positions);
        let uniform_buffer =
            allocator.create_uniform_buffer("starfield-uniform", &StarfieldUniform::new(starfield));

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("starfield-bind-group"),
            layout: &self.starfield_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: uniform_buffer.as_entire_binding(),
            }],
        });

        StarfieldBuffers {
            instance_buffer,
            uniform_buffer,
            bind_group,
            instance_count: positions.len() as u32,
        }
    }
}

fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: std::mem::size_of::<[f32; 3]>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &[wgpu::VertexAttribute {
            offset: 0,
            shader_location: 0,
            format: wgpu::VertexFormat::Float32x3,
        }],
    }
}

/// Draw every star with a single instanced call.
pub fn draw_starfield<'a>(
    render_pass: &mut wgpu::RenderPass<'a>,
    pipeline: &StarfieldPipeline,
    frame_bind_group: &wgpu::BindGroup,
    buffers: &StarfieldBuffers,
) {
    if buffers.instance_count == 0 {
        return;
    }
    render_pass.set_pipeline(&pipeline.pipeline);
    render_pass.set_bind_group(0, frame_bind_group, &[]);
    render_pass.set_bind_group(1, &buffers.bind_group, &[]);
    render_pass.set_vertex_buffer(0, buffers.instance_buffer.slice(..));
    render_pass.draw(0..QUAD_VERTICES, 0..buffers.instance_count);
}
