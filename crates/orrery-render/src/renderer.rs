//! Draws an [`Orrery`] frame: background, opaque bodies, stars, then rings.

use std::path::Path;
use std::sync::Arc;

use bytemuck::Zeroable;
use glam::Vec3;
use orrery_scene::{Orrery, Scene};

use crate::background::BackgroundPipeline;
use crate::buffer::{BufferAllocator, IndexData, MeshBuffer};
use crate::depth::DepthBuffer;
use crate::geometry::tessellate;
use crate::gpu::{RenderContext, SurfaceError};
use crate::mesh_pipeline::{FrameUniform, MeshPipelines, MeshUniform, MeshVariant};
use crate::msaa::MsaaBuffer;
use crate::pass::{FrameEncoder, RenderPassBuilder};
use crate::starfield_pipeline::{StarfieldBuffers, StarfieldPipeline, draw_starfield};
use crate::texture::{ManagedTexture, TextureManager};

/// Renderer settings chosen by the host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RendererOptions {
    /// Requested MSAA sample count; lowered if the adapter cannot do it.
    pub sample_count: u32,
    /// Colour the frame is cleared to before the background is drawn.
    pub clear_color: wgpu::Color,
}

impl Default for RendererOptions {
    fn default() -> Self {
        Self {
            sample_count: 4,
            clear_color: wgpu::Color::BLACK,
        }
    }
}

/// GPU state of one mesh instance.
struct GpuMesh {
    name: String,
    buffer: MeshBuffer,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    texture: Arc<ManagedTexture>,
    variant: MeshVariant,
}

/// Owns every pipeline, buffer and texture needed to draw one [`Scene`].
///
/// Meshes are uploaded once in [`Scene::mesh_instances`] order; each frame
/// only rewrites the uniform buffers.
pub struct SceneRenderer {
    background_pipeline: BackgroundPipeline,
    background_texture: Arc<ManagedTexture>,
    mesh_pipelines: MeshPipelines,
    starfield_pipeline: StarfieldPipeline,
    starfield: StarfieldBuffers,
    frame_buffer: wgpu::Buffer,
    frame_bind_group: wgpu::BindGroup,
    meshes: Vec<GpuMesh>,
    depth: DepthBuffer,
    msaa: Option<MsaaBuffer>,
    clear_color: wgpu::Color,
    sample_count: u32,
}

impl SceneRenderer {
    /// Upload `scene` and build the pipelines. Textures are resolved against
    /// `texture_dir`; missing ones render white.
    pub fn new(
        ctx: &RenderContext,
        scene: &Scene,
        texture_dir: &Path,
        options: RendererOptions,
    ) -> Self {
        let device = &ctx.device;
        let queue = &ctx.queue;
        let format = ctx.surface_format;
        let (width, height) = ctx.size();
        let sample_count = ctx.supported_sample_count(options.sample_count);

        let mut textures = TextureManager::new(device);
        let background_pipeline =
            BackgroundPipeline::new(device, format, sample_count, textures.bind_group_layout());
        let mesh_pipelines =
            MeshPipelines::new(device, format, sample_count, textures.bind_group_layout());
        let starfield_pipeline = StarfieldPipeline::new(
            device,
            format,
            sample_count,
            &mesh_pipelines.frame_bind_group_layout,
        );

        let background_texture =
            textures.load_or_white(device, queue, &scene.background.texture.resolve(texture_dir));
        let starfield = starfield_pipeline.upload(device, &scene.starfield);

        let allocator = BufferAllocator::new(device);
        let frame_buffer = allocator.create_uniform_buffer("frame-uniform", &FrameUniform::zeroed());
        let frame_bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("frame-bind-group"),
            layout: &mesh_pipelines.frame_bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: frame_buffer.as_entire_binding(),
            }],
        });

        let meshes = scene
            .mesh_instances()
            .into_iter()
            .map(|instance| {
                let node = instance.node;
                let data = tessellate(&node.geometry);
                let buffer =
                    allocator.create_mesh(&node.name, &data.vertices, IndexData::U16(&data.indices));
                let uniform_buffer = allocator.create_uniform_buffer(
                    &format!("{}-uniform", node.name),
                    &MeshUniform::new(instance.world, &node.material),
                );
                let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                    label: Some(&format!("{}-bind-group", node.name)),
                    layout: &mesh_pipelines.mesh_bind_group_layout,
                    entries: &[wgpu::BindGroupEntry {
                        binding: 0,
                        resource: uniform_buffer.as_entire_binding(),
                    }],
                });
                let texture = textures.load_or_white(
                    device,
                    queue,
                    &node.material.texture.resolve(texture_dir),
                );
                GpuMesh {
                    name: node.name.clone(),
                    buffer,
                    uniform_buffer,
                    bind_group,
                    texture,
                    variant: MeshVariant::of(&node.material),
                }
            })
            .collect::<Vec<_>>();

        log::info!(
            "Scene uploaded: {} meshes, {} stars, {} textures, {sample_count}x MSAA",
            meshes.len(),
            starfield.instance_count,
            textures.len()
        );

        Self {
            background_pipeline,
            background_texture,
            mesh_pipelines,
            starfield_pipeline,
            starfield,
            frame_buffer,
            frame_bind_group,
            meshes,
            depth: DepthBuffer::new(device, width, height, sample_count),
            msaa: MsaaBuffer::new(device, format, width, height, sample_count),
            clear_color: options.clear_color,
            sample_count,
        }
    }

    /// Resize the depth and MSAA targets. Call after [`RenderContext::resize`].
    pub fn resize(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        self.depth.resize(device, width, height);
        if let Some(msaa) = &mut self.msaa {
            msaa.resize(device, width, height);
        }
    }

    /// MSAA sample count actually in use.
    pub fn sample_count(&self) -> u32 {
        self.sample_count
    }

    /// Render and present one frame of `orrery`.
    pub fn render(&self, ctx: &RenderContext, orrery: &Orrery) -> Result<(), SurfaceError> {
        let transparent = self.write_uniforms(&ctx.queue, orrery);

        let surface_texture = ctx.get_current_texture()?;
        let mut frame = FrameEncoder::new(&ctx.device, &ctx.queue, surface_texture);

        let mut builder = RenderPassBuilder::new()
            .clear_color(self.clear_color)
            .depth(&self.depth)
            .label("orrery-scene-pass");
        if let Some(msaa) = &self.msaa {
            builder = builder.msaa(&msaa.view);
        }

        if let Some(mut pass) = frame.begin_render_pass(&builder) {
            self.background_pipeline.draw(&mut pass, &self.background_texture);

            for mesh in self.meshes.iter().filter(|m| !m.variant.transparent) {
                self.draw_mesh(&mut pass, mesh);
            }

            draw_starfield(
                &mut pass,
                &self.starfield_pipeline,
                &self.frame_bind_group,
                &self.starfield,
            );

            for index in transparent {
                self.draw_mesh(&mut pass, &self.meshes[index]);
            }
        }

        frame.submit();
        Ok(())
    }

    /// Upload this frame's uniforms. Returns the transparent meshes in
    /// back-to-front order.
    fn write_uniforms(&self, queue: &wgpu::Queue, orrery: &Orrery) -> Vec<usize> {
        let scene = orrery.scene();
        let camera = orrery.camera();
        let frame = FrameUniform::new(camera, orrery.viewport(), &scene.ambient, &scene.point_light);
        queue.write_buffer(&self.frame_buffer, 0, bytemuck::bytes_of(&frame));

        let mut transparent = Vec::new();
        for (index, (mesh, instance)) in self.meshes.iter().zip(scene.mesh_instances()).enumerate() {
            debug_assert_eq!(mesh.name, instance.node.name);
            let uniform = MeshUniform::new(instance.world, &instance.node.material);
            queue.write_buffer(&mesh.uniform_buffer, 0, bytemuck::bytes_of(&uniform));
            if mesh.variant.transparent {
                transparent.push((index, instance.world.w_axis.truncate()));
            }
        }
        back_to_front(camera.position, &transparent)
    }

    fn draw_mesh<'a>(&self, pass: &mut wgpu::RenderPass<'a>, mesh: &GpuMesh) {
        pass.set_pipeline(self.mesh_pipelines.get(mesh.variant));
        pass.set_bind_group(0, &self.frame_bind_group, &[]);
        pass.set_bind_group(1, &mesh.texture.bind_group, &[]);
        pass.set_bind_group(2, &mesh.bind_group, &[]);
        mesh.buffer.bind(pass);
        mesh.buffer.draw(pass);
    }
}

/// Sort `(index, centre)` pairs farthest-first from `eye`.
fn back_to_front(eye: Vec3, items: &[(usize, Vec3)]) -> Vec<usize> {
    let mut sorted = items.to_vec();
    sorted.sort_by(|a, b| {
        let da = a.1.distance_squared(eye);
        let db = b.1.distance_squared(eye);
        db.total_cmp(&da)
    });
    sorted.into_iter().map(|(index, _)| index).collect()
}
