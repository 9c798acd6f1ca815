//! Pipelines for textured sphere and ring meshes.
//!
//! Group 0 holds the per-frame camera and light uniform, group 1 the albedo
//! texture from [`TextureManager`](crate::texture::TextureManager), group 2 the
//! per-mesh model matrix and material parameters.

use std::num::NonZeroU64;

use bytemuck::{Pod, Zeroable};
use glam::Mat4;
use orrery_scene::{AmbientLight, Camera, Material, PointLight, Shading, Viewport};

use crate::buffer::MeshVertex;
use crate::depth::DepthBuffer;

/// WGSL source shared by every mesh pipeline variant.
pub const MESH_SHADER_SOURCE: &str = include_str!("mesh.wgsl");

/// Per-frame camera and lighting state.
///
/// Bound at group 0, binding 0. Visible to vertex and fragment stages.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct FrameUniform {
    /// View-projection matrix (64 bytes).
    pub view_proj: [[f32; 4]; 4],
    /// Camera position (xyz), w unused.
    pub camera_pos: [f32; 4],
    /// Viewport width and height in pixels, zw unused.
    pub viewport: [f32; 4],
    /// Point light position (xyz) and range (w).
    pub light_position_range: [f32; 4],
    /// Point light linear colour (rgb) and intensity (w).
    pub light_color_intensity: [f32; 4],
    /// Ambient radiance (rgb) and point light decay exponent (w).
    pub ambient_decay: [f32; 4],
}

impl FrameUniform {
    pub fn new(
        camera: &Camera,
        viewport: Viewport,
        ambient: &AmbientLight,
        light: &PointLight,
    ) -> Self {
        let light_color = light.color.to_linear();
        let ambient = ambient.radiance();
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            viewport: [viewport.width() as f32, viewport.height() as f32, 0.0, 0.0],
            light_position_range: light.position.extend(light.range).to_array(),
            light_color_intensity: light_color.extend(light.intensity).to_array(),
            ambient_decay: ambient.extend(light.decay).to_array(),
        }
    }
}

/// Model matrix and material parameters of one mesh instance.
///
/// Bound at group 2, binding 0.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct MeshUniform {
    pub model: [[f32; 4]; 4],
    /// x = 1.0 when lit, y = opacity.
    pub params: [f32; 4],
}

impl MeshUniform {
    pub fn new(world: Mat4, material: &Material) -> Self {
        let lit = match material.shading {
            Shading::Lit => 1.0,
            Shading::Unlit => 0.0,
        };
        Self {
            model: world.to_cols_array_2d(),
            params: [lit, material.opacity, 0.0, 0.0],
        }
    }
}

/// Blending and culling combination a mesh is drawn with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshVariant {
    pub transparent: bool,
    pub double_sided: bool,
}

impl MeshVariant {
    pub const ALL: [MeshVariant; 4] = [
        MeshVariant::new(false, false),
        MeshVariant::new(false, true),
        MeshVariant::new(true, false),
        MeshVariant::new(true, true),
    ];

    pub const fn new(transparent: bool, double_sided: bool) -> Self {
        Self {
            transparent,
            double_sided,
        }
    }

    pub fn of(material: &Material) -> Self {
        Self::new(material.is_transparent(), material.double_sided)
    }

    fn index(self) -> usize {
        ((self.transparent as usize) << 1) | self.double_sided as usize
    }

    fn cull_mode(self) -> Option<wgpu::Face> {
        if self.double_sided {
            None
        } else {
            Some(wgpu::Face::Back)
        }
    }

    fn blend(self) -> Option<wgpu::BlendState> {
        self.transparent.then_some(wgpu::BlendState::ALPHA_BLENDING)
    }

    /// Transparent meshes test depth but leave it for what lies behind them.
    fn depth_stencil(self) -> wgpu::DepthStencilState {
        if self.transparent {
            DepthBuffer::read_only_state()
        } else {
            DepthBuffer::write_state()
        }
    }
}

/// Mesh pipelines for every [`MeshVariant`] plus their bind group layouts.
pub struct MeshPipelines {
    variants: [wgpu::RenderPipeline; 4],
    /// Frame uniform layout (group 0).
    pub frame_bind_group_layout: wgpu::BindGroupLayout,
    /// Mesh uniform layout (group 2).
    pub mesh_bind_group_layout: wgpu::BindGroupLayout,
}

impl MeshPipelines {
    /// `texture_bind_group_layout` is the layout for group 1 (texture + sampler).
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        sample_count: u32,
        texture_bind_group_layout: &wgpu::BindGroupLayout,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mesh-shader"),
            source: wgpu::ShaderSource::Wgsl(MESH_SHADER_SOURCE.into()),
        });

        let frame_bind_group_layout = uniform_layout(
            device,
            "mesh-frame-bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<FrameUniform>(),
        );
        let mesh_bind_group_layout = uniform_layout(
            device,
            "mesh-instance-bgl",
            wgpu::ShaderStages::VERTEX_FRAGMENT,
            std::mem::size_of::<MeshUniform>(),
        );

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("mesh-pipeline-layout"),
            bind_group_layouts: &[
                &frame_bind_group_layout,
                texture_bind_group_layout,
                &mesh_bind_group_layout,
            ],
            immediate_size: 0,
        });

        let variants = MeshVariant::ALL.map(|variant| {
            create_variant(
                device,
                &shader,
                &pipeline_layout,
                surface_format,
                sample_count,
                variant,
            )
        });

        Self {
            variants,
            frame_bind_group_layout,
            mesh_bind_group_layout,
        }
    }

    pub fn get(&self, variant: MeshVariant) -> &wgpu::RenderPipeline {
        &self.variants[variant.index()]
    }
}

fn create_variant(
    device: &wgpu::Device,
    shader: &wgpu::ShaderModule,
    layout: &wgpu::PipelineLayout,
    surface_format: wgpu::TextureFormat,
    sample_count: u32,
    variant: MeshVariant,
) -> wgpu::RenderPipeline {
    let label = match (variant.transparent, variant.double_sided) {
        (false, false) => "mesh-opaque-pipeline",
        (false, true) => "mesh-opaque-double-sided-pipeline",
        (true, false) => "mesh-transparent-pipeline",
        (true, true) => "mesh-transparent-double-sided-pipeline",
    };

    device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
        label: Some(label),
        layout: Some(layout),
        vertex: wgpu::VertexState {
            module: shader,
            entry_point: Some("vs_main"),
            buffers: &[MeshVertex::layout()],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        },
        primitive: wgpu::PrimitiveState {
            topology: wgpu::PrimitiveTopology::TriangleList,
            strip_index_format: None,
            front_face: wgpu::FrontFace::Ccw,
            cull_mode: variant.cull_mode(),
            unclipped_depth: false,
            polygon_mode: wgpu::PolygonMode::Fill,
            conservative: false,
        },
        depth_stencil: Some(variant.depth_stencil()),
        multisample: wgpu::MultisampleState {
            count: sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        },
        fragment: Some(wgpu::FragmentState {
            module: shader,
            entry_point: Some("fs_main"),
            targets: &[Some(wgpu::ColorTargetState {
                format: surface_format,
                blend: variant.blend(),
                write_mask: wgpu::ColorWrites::ALL,
            })],
            compilation_options: wgpu::PipelineCompilationOptions::default(),
        }),
        multiview_mask: None,
        cache: None,
    })
}

/// Layout with a single uniform buffer at binding 0.
pub(crate) fn uniform_layout(
    device: &wgpu::Device,
    label: &str,
    visibility: wgpu::ShaderStages,
    size: usize,
) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: NonZeroU64::new(size as u64),
            },
            count: None,
        }],
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device_queue;
    use crate::texture::{TEXTURE_FORMAT, TextureManager};
    use glam::Vec3;
    use orrery_scene::TextureAsset;

    fn material(shading: Shading, opacity: f32, double_sided: bool) -> Material {
        Material {
            shading,
            texture: TextureAsset::Earth,
            opacity,
            double_sided,
        }
    }

    #[test]
    fn test_frame_uniform_size() {
        assert_eq!(std::mem::size_of::<FrameUniform>(), 144);
    }

    #[test]
    fn test_mesh_uniform_size() {
        assert_eq!(std::mem::size_of::<MeshUniform>(), 80);
    }

    #[test]
    fn test_frame_uniform_packs_light() {
        let camera = Camera::default();
        let light = PointLight::default();
        let ambient = AmbientLight::default();
        let uniform = FrameUniform::new(&camera, Viewport::new(800, 600), &ambient, &light);

        assert_eq!(uniform.viewport, [800.0, 600.0, 0.0, 0.0]);
        assert_eq!(uniform.light_position_range[3], light.range);
        assert_eq!(uniform.light_color_intensity[3], light.intensity);
        assert_eq!(uniform.ambient_decay[3], light.decay);
        let radiance = ambient.radiance();
        assert!((Vec3::from_slice(&uniform.ambient_decay[..3]) - radiance).length() < 1e-6);
    }

    #[test]
    fn test_mesh_uniform_flags() {
        let world = Mat4::from_translation(Vec3::new(28.0, 0.0, 0.0));
        let lit = MeshUniform::new(world, &material(Shading::Lit, 1.0, false));
        assert_eq!(lit.params, [1.0, 1.0, 0.0, 0.0]);
        assert_eq!(lit.model[3][0], 28.0);

        let ring = MeshUniform::new(world, &material(Shading::Unlit, 0.8, true));
        assert_eq!(ring.params[0], 0.0);
        assert!((ring.params[1] - 0.8).abs() < 1e-6);
    }

    #[test]
    fn test_variant_indices_are_distinct() {
        let mut seen: Vec<usize> = MeshVariant::ALL.iter().map(|v| v.index()).collect();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_variant_index_packs_transparency_high() {
        assert_eq!(MeshVariant::new(false, false).index(), 0);
        assert_eq!(MeshVariant::new(false, true).index(), 1);
        assert_eq!(MeshVariant::new(true, false).index(), 2);
        assert_eq!(MeshVariant::new(true, true).index(), 3);
    }

    #[test]
    fn test_variant_of_ring_material() {
        let ring = MeshVariant::of(&material(Shading::Unlit, 0.8, true));
        assert!(ring.transparent);
        assert!(ring.double_sided);
        assert_eq!(ring.cull_mode(), None);
        assert!(!ring.depth_stencil().depth_write_enabled);
        assert_eq!(ring.blend(), Some(wgpu::BlendState::ALPHA_BLENDING));
    }

    #[test]
    fn test_variant_of_planet_material() {
        let planet = MeshVariant::of(&material(Shading::Lit, 1.0, false));
        assert_eq!(planet, MeshVariant::new(false, false));
        assert_eq!(planet.cull_mode(), Some(wgpu::Face::Back));
        assert!(planet.depth_stencil().depth_write_enabled);
        assert_eq!(planet.blend(), None);
    }

    #[test]
    fn test_pipeline_creation() {
        let Some((device, _queue)) = create_test_device_queue() else {
            return;
        };
        let textures = TextureManager::new(&device);
        let pipelines =
            MeshPipelines::new(&device, TEXTURE_FORMAT, 1, textures.bind_group_layout());
        for variant in MeshVariant::ALL {
            let _ = pipelines.get(variant);
        }
    }
}
