//! wgpu renderer for the orrery: GPU context, render targets, textures,
//! tessellation and the pipelines that draw an [`orrery_scene::Scene`].

pub mod background;
pub mod buffer;
pub mod depth;
pub mod geometry;
pub mod gpu;
pub mod mesh_pipeline;
pub mod msaa;
pub mod pass;
pub mod renderer;
pub mod starfield_pipeline;
pub mod texture;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, MeshVertex};
pub use depth::DepthBuffer;
pub use geometry::{MeshData, ring, tessellate, uv_sphere};
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use msaa::MsaaBuffer;
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use renderer::{RendererOptions, SceneRenderer};
pub use texture::{ManagedTexture, TextureError, TextureManager};
