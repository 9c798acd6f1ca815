//! Render pass abstraction for reducing wgpu boilerplate.
//!
//! [`RenderPassBuilder`] describes the attachments declaratively and
//! [`FrameEncoder`] owns one frame's command encoder and surface texture.

use crate::depth::DepthBuffer;

/// Depth attachment cleared at the start of the pass.
#[derive(Debug)]
pub struct DepthAttachmentConfig {
    pub view: wgpu::TextureView,
    pub clear_value: f32,
}

/// Builder for configuring render pass descriptors with a fluent API.
#[derive(Debug)]
pub struct RenderPassBuilder {
    clear_color: wgpu::Color,
    depth_attachment: Option<DepthAttachmentConfig>,
    msaa_target: Option<wgpu::TextureView>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderPassBuilder {
    /// A builder that clears to black and has no depth or MSAA attachment.
    pub fn new() -> Self {
        Self {
            clear_color: wgpu::Color::BLACK,
            depth_attachment: None,
            msaa_target: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Attach a depth buffer, cleared to the reverse-Z far value.
    pub fn depth(mut self, depth: &DepthBuffer) -> Self {
        self.depth_attachment = Some(DepthAttachmentConfig {
            view: depth.view.clone(),
            clear_value: DepthBuffer::CLEAR_VALUE,
        });
        self
    }

    /// Render into a multisampled target and resolve into the frame's surface texture.
    pub fn msaa(mut self, view: &wgpu::TextureView) -> Self {
        self.msaa_target = Some(view.clone());
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn create_render_pass<'encoder>(
        &'encoder self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        surface_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        // With MSAA the multisampled samples are only needed until the resolve.
        let (view, resolve_target, store) = match &self.msaa_target {
            Some(msaa) => (msaa, Some(surface_view), wgpu::StoreOp::Discard),
            None => (surface_view, None, wgpu::StoreOp::Store),
        };

        let color_attachment = wgpu::RenderPassColorAttachment {
            view,
            resolve_target,
            ops: wgpu::Operations {
                load: wgpu::LoadOp::Clear(self.clear_color),
                store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth_attachment
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: &depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Discard,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// One frame's command encoder and surface texture.
///
/// [`submit`](Self::submit) finishes the encoder and presents. Dropping an
/// unsubmitted encoder submits and presents anyway, with a warning.
pub struct FrameEncoder<'q> {
    encoder: Option<wgpu::CommandEncoder>,
    queue: &'q wgpu::Queue,
    surface_texture: Option<wgpu::SurfaceTexture>,
    surface_view: wgpu::TextureView,
}

impl<'q> FrameEncoder<'q> {
    pub fn new(
        device: &wgpu::Device,
        queue: &'q wgpu::Queue,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder: Some(encoder),
            queue,
            surface_texture: Some(surface_texture),
            surface_view,
        }
    }

    /// Begin a render pass targeting this frame's surface texture.
    ///
    /// Returns `None` once the frame has been submitted.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &'a RenderPassBuilder,
    ) -> Option<wgpu::RenderPass<'a>> {
        let encoder = self.encoder.as_mut()?;
        Some(builder.create_render_pass(encoder, &self.surface_view))
    }

    /// Submit the command buffer to the queue and present the surface texture.
    pub fn submit(mut self) {
        self.finish();
    }

    fn finish(&mut self) {
        if let (Some(encoder), Some(surface_texture)) =
            (self.encoder.take(), self.surface_texture.take())
        {
            self.queue.submit([encoder.finish()]);
            surface_texture.present();
        }
    }
}

impl Drop for FrameEncoder<'_> {
    fn drop(&mut self) {
        if self.encoder.is_some() {
            log::warn!("FrameEncoder dropped without explicit submit() - auto-submitting");
            self.finish();
        }
    }
}
