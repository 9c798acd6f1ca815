//! The application context: scene, camera and viewport owned in one place.

use crate::camera::{Camera, CameraRig};
use crate::graph::Scene;
use crate::viewport::Viewport;

/// Everything that changes while the orrery runs.
///
/// The host creates one, calls [`tick`](Self::tick) at a fixed rate and
/// [`resize`](Self::resize) whenever the window changes size.
#[derive(Debug, Clone)]
pub struct Orrery {
    scene: Scene,
    camera: Camera,
    rig: CameraRig,
    viewport: Viewport,
    ticks: u64,
}

impl Orrery {
    /// Take ownership of a built scene. The camera keeps its current position
    /// until the first tick moves it onto the rig's orbit.
    pub fn new(scene: Scene, mut camera: Camera, rig: CameraRig, viewport: Viewport) -> Self {
        camera.set_aspect_ratio(viewport.width() as f32, viewport.height() as f32);
        camera.look_at(glam::Vec3::ZERO);
        Self {
            scene,
            camera,
            rig,
            viewport,
            ticks: 0,
        }
    }

    /// Advance the animation by one step.
    ///
    /// Order: sun spin, body spins, pivot revolutions, camera orbit.
    pub fn tick(&mut self) {
        self.scene.advance();
        self.rig.advance(&mut self.camera);
        self.ticks += 1;
    }

    /// Follow a window resize. Returns the clamped size when it changed.
    pub fn resize(&mut self, width: u32, height: u32) -> Option<(u32, u32)> {
        let (w, h) = self.viewport.resize(width, height)?;
        self.camera.set_aspect_ratio(w as f32, h as f32);
        log::debug!("Viewport resized to {w}x{h}");
        Some((w, h))
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn rig(&self) -> &CameraRig {
        &self.rig
    }

    /// Adjust the orbit from user input. The camera is re-placed immediately
    /// so the change is visible before the next tick.
    pub fn adjust_rig(&mut self, f: impl FnOnce(&mut CameraRig)) {
        f(&mut self.rig);
        self.rig.apply(&mut self.camera);
    }

    /// Number of ticks since creation.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }
}
