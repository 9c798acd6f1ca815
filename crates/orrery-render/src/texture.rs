//! GPU texture management: image decoding, caching, mipmap generation, and bind groups.
//!
//! [`TextureManager`] decodes image files with the `image` crate, uploads them
//! as `Rgba8UnormSrgb` with a full mip chain and hands out
//! [`Arc<ManagedTexture>`]s with a ready-to-bind [`wgpu::BindGroup`]. Files that
//! fail to load are replaced by a shared 1×1 white texture so a missing asset
//! never stops the scene from rendering.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Format of every texture the manager creates.
pub const TEXTURE_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Rgba8UnormSrgb;

const WHITE_KEY: &str = "<white>";

/// A GPU texture with its view, bind group, and metadata.
pub struct ManagedTexture {
    pub texture: wgpu::Texture,
    pub view: wgpu::TextureView,
    /// Pre-built bind group (texture + sampler) for group 1 of the scene pipelines.
    pub bind_group: wgpu::BindGroup,
    /// Width and height in texels.
    pub dimensions: (u32, u32),
    pub mip_level_count: u32,
}

/// Errors that can occur during texture creation.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    /// The image file could not be opened or decoded.
    #[error("failed to load image {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Pixel data length doesn't match `width × height × 4`.
    #[error("texture data size ({actual}) does not match expected ({expected}) for {width}x{height}")]
    DataSizeMismatch {
        actual: usize,
        expected: usize,
        width: u32,
        height: u32,
    },

    /// Width or height is zero.
    #[error("texture dimensions must be non-zero, got {width}x{height}")]
    ZeroDimensions { width: u32, height: u32 },

    /// Larger than the device's 2D texture limit.
    #[error("texture {width}x{height} exceeds device limit {limit}")]
    TooLarge { width: u32, height: u32, limit: u32 },
}

/// Calculates the number of mip levels for the given dimensions.
pub fn mip_level_count(width: u32, height: u32) -> u32 {
    32 - width.max(height).max(1).leading_zeros()
}

/// WGSL shader for mipmap generation via fullscreen blit.
const BLIT_SHADER_SOURCE: &str = r#"
@group(0) @binding(0) var src_texture: texture_2d<f32>;
@group(0) @binding(1) var src_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
};

@vertex
fn vs_main(@builtin(vertex_index) idx: u32) -> VertexOutput {
    let uv = vec2<f32>(f32((idx << 1u) & 2u), f32(idx & 2u));
    var out: VertexOutput;
    out.position = vec4<f32>(uv * 2.0 - 1.0, 0.0, 1.0);
    out.uv = vec2<f32>(uv.x, 1.0 - uv.y);
    return out;
}

@fragment
fn fs_main(in: VertexOutput) -> @location(0) vec4<f32> {
    return textureSample(src_texture, src_sampler, in.uv);
}
"#;

/// Texture cache keyed by file path, with shared sampler and bind group layout.
pub struct TextureManager {
    textures: HashMap<String, Arc<ManagedTexture>>,
    sampler: wgpu::Sampler,
    bind_group_layout: wgpu::BindGroupLayout,
    blit_pipeline: wgpu::RenderPipeline,
    blit_bind_group_layout: wgpu::BindGroupLayout,
    blit_sampler: wgpu::Sampler,
}

impl TextureManager {
    pub fn new(device: &wgpu::Device) -> Self {
        let sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("sampler-linear"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            mipmap_filter: wgpu::MipmapFilterMode::Linear,
            ..Default::default()
        });

        let bind_group_layout = texture_sampler_layout(device, "texture-bind-group-layout");
        let blit_bind_group_layout = texture_sampler_layout(device, "blit-bind-group-layout");

        let blit_shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("blit-shader"),
            source: wgpu::ShaderSource::Wgsl(BLIT_SHADER_SOURCE.into()),
        });
        let blit_pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("blit-pipeline-layout"),
            bind_group_layouts: &[&blit_bind_group_layout],
            immediate_size: 0,
        });
        let blit_pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mipmap-pipeline"),
            layout: Some(&blit_pipeline_layout),
            vertex: wgpu::VertexState {
                module: &blit_shader,
                entry_point: Some("vs_main"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState::default(),
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &blit_shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: TEXTURE_FORMAT,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let blit_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("blit-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        Self {
            textures: HashMap::new(),
            sampler,
            bind_group_layout,
            blit_pipeline,
            blit_bind_group_layout,
            blit_sampler,
        }
    }

    /// Decode an image file and upload it with mipmaps. Cached by path.
    pub fn load(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        let key = path.to_string_lossy().into_owned();
        if let Some(existing) = self.textures.get(&key) {
            return Ok(Arc::clone(existing));
        }

        let image = image::open(path)
            .map_err(|source| TextureError::Decode {
                path: path.to_path_buf(),
                source,
            })?
            .to_rgba8();
        let (width, height) = image.dimensions();
        self.create_texture(device, queue, &key, image.as_raw(), width, height, true)
    }

    /// Like [`load`](Self::load), but logs the failure and returns the white
    /// fallback texture instead of an error.
    pub fn load_or_white(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        path: &Path,
    ) -> Arc<ManagedTexture> {
        match self.load(device, queue, path) {
            Ok(texture) => texture,
            Err(err) => {
                log::warn!("{err}; rendering untextured");
                self.white(device, queue)
            }
        }
    }

    /// Shared 1×1 opaque white texture.
    pub fn white(&mut self, device: &wgpu::Device, queue: &wgpu::Queue) -> Arc<ManagedTexture> {
        if let Some(existing) = self.textures.get(WHITE_KEY) {
            return Arc::clone(existing);
        }
        let texture = self.upload(device, queue, WHITE_KEY, &[255; 4], 1, 1, false);
        self.textures
            .insert(WHITE_KEY.to_string(), Arc::clone(&texture));
        texture
    }

    /// Create a 2D sRGB texture from tightly packed RGBA8 pixels. Cached by name.
    #[allow(clippy::too_many_arguments)]
    pub fn create_texture(
        &mut self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
        generate_mipmaps: bool,
    ) -> Result<Arc<ManagedTexture>, TextureError> {
        if let Some(existing) = self.textures.get(name) {
            return Ok(Arc::clone(existing));
        }

        validate_dimensions(width, height, device.limits().max_texture_dimension_2d)?;
        validate_data_size(data, width, height)?;

        let managed = self.upload(device, queue, name, data, width, height, generate_mipmaps);
        self.textures.insert(name.to_string(), Arc::clone(&managed));
        log::info!(
            "Created texture '{name}' ({width}x{height}, {} mips)",
            managed.mip_level_count
        );
        Ok(managed)
    }

    #[allow(clippy::too_many_arguments)]
    fn upload(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        name: &str,
        data: &[u8],
        width: u32,
        height: u32,
        generate_mipmaps: bool,
    ) -> Arc<ManagedTexture> {
        let mip_levels = if generate_mipmaps {
            mip_level_count(width, height)
        } else {
            1
        };
        let size = wgpu::Extent3d {
            width,
            height,
            depth_or_array_layers: 1,
        };

        let texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some(name),
            size,
            mip_level_count: mip_levels,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: TEXTURE_FORMAT,
            usage: wgpu::TextureUsages::TEXTURE_BINDING
                | wgpu::TextureUsages::COPY_DST
                | wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        queue.write_texture(
            wgpu::TexelCopyTextureInfo {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            data,
            wgpu::TexelCopyBufferLayout {
                offset: 0,
                bytes_per_row: Some(width * 4),
                rows_per_image: None,
            },
            size,
        );

        if mip_levels > 1 {
            self.generate_mipmaps(device, queue, &texture, mip_levels);
        }

        let view = texture.create_view(&wgpu::TextureViewDescriptor::default());
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{name}-bind-group")),
            layout: &self.bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: wgpu::BindingResource::TextureView(&view),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::Sampler(&self.sampler),
                },
            ],
        });

        Arc::new(ManagedTexture {
            texture,
            view,
            bind_group,
            dimensions: (width, height),
            mip_level_count: mip_levels,
        })
    }

    /// Number of cached textures, the white fallback included.
    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }

    /// Layout of group 1 (texture + sampler) in every scene pipeline.
    pub fn bind_group_layout(&self) -> &wgpu::BindGroupLayout {
        &self.bind_group_layout
    }

    /// Fill mip levels 1.. by repeatedly blitting the previous level.
    fn generate_mipmaps(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        texture: &wgpu::Texture,
        mip_count: u32,
    ) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("mipmap-encoder"),
        });

        for level in 1..mip_count {
            let src_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level - 1,
                mip_level_count: Some(1),
                ..Default::default()
            });
            let dst_view = texture.create_view(&wgpu::TextureViewDescriptor {
                base_mip_level: level,
                mip_level_count: Some(1),
                ..Default::default()
            });

            let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
                label: Some("mipmap-bind-group"),
                layout: &self.blit_bind_group_layout,
                entries: &[
                    wgpu::BindGroupEntry {
                        binding: 0,
                        resource: wgpu::BindingResource::TextureView(&src_view),
                    },
                    wgpu::BindGroupEntry {
                        binding: 1,
                        resource: wgpu::BindingResource::Sampler(&self.blit_sampler),
                    },
                ],
            });

            let mut pass = encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
                label: Some("mipmap-pass"),
                color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                    view: &dst_view,
                    resolve_target: None,
                    ops: wgpu::Operations {
                        load: wgpu::LoadOp::Clear(wgpu::Color::BLACK),
                        store: wgpu::StoreOp::Store,
                    },
                    depth_slice: None,
                })],
                depth_stencil_attachment: None,
                ..Default::default()
            });

            pass.set_pipeline(&self.blit_pipeline);
            pass.set_bind_group(0, &bind_group, &[]);
            pass.draw(0..3, 0..1);
        }

        queue.submit(std::iter::once(encoder.finish()));
    }
}

fn texture_sampler_layout(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[
            wgpu::BindGroupLayoutEntry {
                binding: 0,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Texture {
                    sample_type: wgpu::TextureSampleType::Float { filterable: true },
                    view_dimension: wgpu::TextureViewDimension::D2,
                    multisampled: false,
                },
                count: None,
            },
            wgpu::BindGroupLayoutEntry {
                binding: 1,
                visibility: wgpu::ShaderStages::FRAGMENT,
                ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                count: None,
            },
        ],
    })
}

fn validate_dimensions(width: u32, height: u32, limit: u32) -> Result<(), TextureError> {
    if width == 0 || height == 0 {
        return Err(TextureError::ZeroDimensions { width, height });
    }
    if width > limit || height > limit {
        return Err(TextureError::TooLarge {
            width,
            height,
            limit,
        });
    }
    Ok(())
}

fn validate_data_size(data: &[u8], width: u32, height: u32) -> Result<(), TextureError> {
    let expected = width as usize * height as usize * 4;
    if data.len() != expected {
        return Err(TextureError::DataSizeMismatch {
            actual: data.len(),
            expected,
            width,
            height,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::depth::create_test_device_queue;

    #[test]
    fn test_mipmap_level_count_calculation() {
        assert_eq!(mip_level_count(1, 1), 1);
        assert_eq!(mip_level_count(2, 2), 2);
        assert_eq!(mip_level_count(4, 4), 3);
        assert_eq!(mip_level_count(256, 256), 9);
        assert_eq!(mip_level_count(512, 256), 10);
        assert_eq!(mip_level_count(2048, 1024), 12);
        assert_eq!(mip_level_count(300, 150), 9);
    }

    #[test]
    fn test_validation() {
        assert!(matches!(
            validate_dimensions(0, 4, 8192),
            Err(TextureError::ZeroDimensions { .. })
        ));
        assert!(matches!(
            validate_dimensions(16384, 4, 8192),
            Err(TextureError::TooLarge { .. })
        ));
        assert!(validate_dimensions(4, 4, 8192).is_ok());
        assert!(matches!(
            validate_data_size(&[0; 32], 4, 4),
            Err(TextureError::DataSizeMismatch { expected: 64, .. })
        ));
    }

    #[test]
    fn test_create_texture_with_mipmaps() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        let data = vec![255u8; 256 * 256 * 4];
        let tex = manager
            .create_texture(&device, &queue, "mipmapped", &data, 256, 256, true)
            .unwrap();
        assert_eq!(tex.mip_level_count, 9);
        assert_eq!(tex.dimensions, (256, 256));
    }

    #[test]
    fn test_texture_cache_deduplicates() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        assert!(manager.is_empty());
        let data = vec![255u8; 16];
        let a = manager
            .create_texture(&device, &queue, "shared", &data, 2, 2, false)
            .unwrap();
        let b = manager
            .create_texture(&device, &queue, "shared", &data, 2, 2, false)
            .unwrap();
        assert!(Arc::ptr_eq(&a, &b));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_missing_file_is_decode_error() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        let result = manager.load(&device, &queue, Path::new("/nonexistent/earth.jpg"));
        assert!(matches!(result, Err(TextureError::Decode { .. })));
    }

    #[test]
    fn test_missing_file_falls_back_to_white() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let mut manager = TextureManager::new(&device);
        let a = manager.load_or_white(&device, &queue, Path::new("/nonexistent/mars.jpg"));
        let b = manager.load_or_white(&device, &queue, Path::new("/nonexistent/pluto.jpg"));
        assert_eq!(a.dimensions, (1, 1));
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[test]
    fn test_load_png_from_disk() {
        let Some((device, queue)) = create_test_device_queue() else {
            return;
        };
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saturn ring.png");
        image::RgbaImage::from_pixel(8, 4, image::Rgba([200, 180, 120, 128]))
            .save(&path)
            .unwrap();

        let mut manager = TextureManager::new(&device);
        let tex = manager.load(&device, &queue, &path).unwrap();
        assert_eq!(tex.dimensions, (8, 4));
        assert_eq!(tex.mip_level_count, 4);
    }
}
