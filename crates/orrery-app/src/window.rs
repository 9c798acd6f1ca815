//! Window creation and event handling via winit.
//!
//! Provides [`AppState`] which implements winit's [`ApplicationHandler`] trait,
//! and a [`run`] function to start the event loop.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use orrery_config::Config;
use orrery_render::{
    RenderContext, RendererOptions, SceneRenderer, SurfaceError, init_render_context_blocking,
};
use orrery_scene::Orrery;
use tracing::{debug, error, info, instrument, warn};
use winit::application::ApplicationHandler;
use winit::event::WindowEvent;
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::window::{Fullscreen, Window, WindowAttributes, WindowId};

use crate::game_loop::GameLoop;
use crate::input::MouseState;
use crate::orbit_controls::OrbitControls;

/// Returns [`WindowAttributes`] based on the given configuration.
pub fn window_attributes_from_config(config: &Config) -> WindowAttributes {
    let attrs = WindowAttributes::default()
        .with_title(config.window.title.clone())
        .with_inner_size(winit::dpi::LogicalSize::new(
            config.window.width as f64,
            config.window.height as f64,
        ));
    if config.window.fullscreen {
        attrs.with_fullscreen(Some(Fullscreen::Borderless(None)))
    } else {
        attrs
    }
}

/// Convert the configured sRGB clear colour to a wgpu colour.
pub fn clear_color_from_config(config: &Config) -> wgpu::Color {
    let [r, g, b] = config.render.clear_color;
    wgpu::Color { r, g, b, a: 1.0 }
}

/// Application state: the orrery plus the window and GPU resources that show it.
pub struct AppState {
    pub config: Config,
    pub orrery: Orrery,
    pub window: Option<Arc<Window>>,
    pub gpu: Option<RenderContext>,
    pub renderer: Option<SceneRenderer>,
    pub game_loop: GameLoop,
    pub mouse: MouseState,
    pub controls: OrbitControls,
    /// Directory holding `config.ron`, re-read when the window regains focus.
    pub config_dir: Option<PathBuf>,
    stats_started: Instant,
    stats_frames: u32,
}

impl AppState {
    pub fn new(config: Config, orrery: Orrery) -> Self {
        Self {
            game_loop: GameLoop::new(config.render.tick_rate),
            controls: OrbitControls::new(config.controls.clone()),
            config,
            orrery,
            window: None,
            gpu: None,
            renderer: None,
            mouse: MouseState::new(),
            config_dir: None,
            stats_started: Instant::now(),
            stats_frames: 0,
        }
    }

    /// Enable config hot-reload from `dir`.
    #[must_use]
    pub fn with_config_dir(mut self, dir: Option<PathBuf>) -> Self {
        self.config_dir = dir;
        self
    }

    /// Re-read `config.ron` and apply the sections that can change while
    /// running: controls, tick rate and frame stats. Returns `true` when any
    /// of them changed.
    pub fn reload_config(&mut self) -> bool {
        let Some(dir) = &self.config_dir else {
            return false;
        };
        let fresh = match self.config.reload(dir) {
            Ok(Some(fresh)) => fresh,
            Ok(None) => return false,
            Err(e) => {
                warn!("Config reload failed, keeping current settings: {e}");
                return false;
            }
        };

        let mut changed = false;
        if fresh.controls != self.config.controls {
            self.controls = OrbitControls::new(fresh.controls.clone());
            self.config.controls = fresh.controls;
            changed = true;
        }
        if fresh.render.tick_rate != self.config.render.tick_rate {
            self.game_loop = GameLoop::new(fresh.render.tick_rate);
            self.config.render.tick_rate = fresh.render.tick_rate;
            changed = true;
        }
        if fresh.debug.frame_stats_interval != self.config.debug.frame_stats_interval {
            self.config.debug.frame_stats_interval = fresh.debug.frame_stats_interval;
            self.stats_frames = 0;
            self.stats_started = Instant::now();
            changed = true;
        }
        if changed {
            info!("Config reloaded from {}", dir.display());
        }
        changed
    }

    /// Follow a change of the window's physical size.
    pub fn resize(&mut self, width: u32, height: u32) {
        let Some((w, h)) = self.orrery.resize(width, height) else {
            return;
        };
        if let Some(gpu) = &mut self.gpu {
            gpu.resize(w, h);
            if let Some(renderer) = &mut self.renderer {
                renderer.resize(&gpu.device, w, h);
            }
        }
        info!("Window resized to {w}x{h}");
    }

    /// Run due ticks, apply mouse input and draw one frame.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        let orrery = &mut self.orrery;
        self.game_loop.tick(|| orrery.tick());

        self.controls.apply(&self.mouse, &mut self.orrery);
        self.mouse.clear_transients();

        if let (Some(gpu), Some(renderer)) = (&self.gpu, &self.renderer) {
            match renderer.render(gpu, &self.orrery) {
                Ok(()) => {}
                Err(SurfaceError::Timeout) => debug!("Surface timeout, skipping frame"),
                Err(SurfaceError::Lost) => warn!("Surface lost, skipping frame"),
                Err(SurfaceError::OutOfMemory) => {
                    error!("GPU out of memory, shutting down");
                    event_loop.exit();
                    return;
                }
            }
        }

        self.record_frame();
        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }

    fn record_frame(&mut self) {
        let interval = self.config.debug.frame_stats_interval;
        if interval == 0 {
            return;
        }
        self.stats_frames += 1;
        if self.stats_frames < interval {
            return;
        }
        let elapsed = self.stats_started.elapsed().as_secs_f64();
        let fps = if elapsed > 0.0 {
            self.stats_frames as f64 / elapsed
        } else {
            0.0
        };
        info!(
            fps = (fps * 10.0).round() / 10.0,
            ticks = self.orrery.ticks(),
            angle = self.orrery.rig().angle(),
            "Frame stats"
        );
        self.stats_frames = 0;
        self.stats_started = Instant::now();
    }
}

impl ApplicationHandler for AppState {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = window_attributes_from_config(&self.config);
        let window = match event_loop.create_window(attrs) {
            Ok(window) => Arc::new(window),
            Err(e) => {
                error!("Window creation failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let size = window.inner_size();
        self.orrery.resize(size.width, size.height);
        info!(
            "Window created: {}x{} (scale: {:.2})",
            size.width,
            size.height,
            window.scale_factor()
        );

        let gpu = match init_render_context_blocking(window.clone(), self.config.window.vsync) {
            Ok(gpu) => gpu,
            Err(e) => {
                error!("GPU initialization failed: {e}");
                event_loop.exit();
                return;
            }
        };

        let options = RendererOptions {
            sample_count: self.config.render.msaa_samples,
            clear_color: clear_color_from_config(&self.config),
        };
        let renderer = SceneRenderer::new(
            &gpu,
            self.orrery.scene(),
            &self.config.assets.texture_dir,
            options,
        );

        self.gpu = Some(gpu);
        self.renderer = Some(renderer);
        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested => {
                info!("Close requested, shutting down");
                event_loop.exit();
            }
            WindowEvent::Resized(new_size) => {
                self.resize(new_size.width, new_size.height);
            }
            WindowEvent::ScaleFactorChanged { .. } => {
                if let Some(size) = self.window.as_ref().map(|w| w.inner_size()) {
                    self.resize(size.width, size.height);
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse.on_cursor_moved(position.x, position.y);
            }
            WindowEvent::CursorLeft { .. } => self.mouse.on_cursor_left(),
            WindowEvent::Focused(true) => {
                self.reload_config();
            }
            WindowEvent::MouseInput { state, button, .. } => {
                self.mouse.on_button(button, state);
            }
            WindowEvent::MouseWheel { delta, .. } => self.mouse.on_scroll(delta),
            WindowEvent::RedrawRequested => self.redraw(event_loop),
            _ => {}
        }
    }
}

/// Creates an event loop and runs the orrery until the window closes.
#[instrument(skip_all)]
pub fn run(app: &mut AppState) -> Result<(), winit::error::EventLoopError> {
    let event_loop = EventLoop::new()?;
    event_loop.run_app(app)
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::{Camera, CameraRig, SceneBuilder, SystemTable, Viewport};

    fn app() -> AppState {
        let config = Config::default();
        let table = SystemTable::default();
        let scene = SceneBuilder::new(&table).star_count(16).star_seed(Some(3)).build();
        let orrery = Orrery::new(
            scene,
            Camera::default(),
            CameraRig::default(),
            Viewport::new(config.window.width, config.window.height),
        );
        AppState::new(config, orrery)
    }

    #[test]
    fn test_app_state_starts_without_window() {
        let state = app();
        assert!(state.window.is_none());
        assert!(state.gpu.is_none());
        assert!(state.renderer.is_none());
        assert_eq!(state.orrery.viewport().size(), (1280, 720));
    }

    #[test]
    fn test_resize_without_gpu_updates_viewport() {
        let mut state = app();
        state.resize(1920, 1080);
        assert_eq!(state.orrery.viewport().size(), (1920, 1080));
        assert!((state.orrery.camera().aspect_ratio - 1920.0 / 1080.0).abs() < 1e-6);
    }

    #[test]
    fn test_zero_resize_is_clamped() {
        let mut state = app();
        state.resize(0, 0);
        assert_eq!(state.orrery.viewport().size(), (1, 1));
    }

    #[test]
    fn test_clear_color_from_config() {
        let mut config = Config::default();
        config.render.clear_color = [0.1, 0.2, 0.3];
        let color = clear_color_from_config(&config);
        assert_eq!((color.r, color.g, color.b, color.a), (0.1, 0.2, 0.3, 1.0));
    }

    #[test]
    fn test_window_attributes_from_config() {
        let mut config = Config::default();
        config.window.fullscreen = true;
        let attrs = window_attributes_from_config(&config);
        assert_eq!(attrs.title, "Orrery");
        assert!(attrs.fullscreen.is_some());
    }

    #[test]
    fn test_reload_without_config_dir_is_noop() {
        let mut state = app();
        assert!(!state.reload_config());
    }

    #[test]
    fn test_reload_applies_live_sections() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = app().with_config_dir(Some(dir.path().to_path_buf()));
        state.config.save(dir.path()).unwrap();
        assert!(!state.reload_config());

        let mut edited = state.config.clone();
        edited.controls.enabled = false;
        edited.render.tick_rate = 30;
        edited.window.width = 640;
        edited.save(dir.path()).unwrap();

        assert!(state.reload_config());
        assert!(!state.controls.is_enabled());
        assert_eq!(state.config.render.tick_rate, 30);
        // Window size only applies at startup.
        assert_eq!(state.config.window.width, 1280);
    }

    #[test]
    fn test_reload_keeps_settings_on_parse_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = app().with_config_dir(Some(dir.path().to_path_buf()));
        std::fs::write(dir.path().join(orrery_config::CONFIG_FILE), "{{broken").unwrap();
        assert!(!state.reload_config());
        assert!(state.controls.is_enabled());
    }

    #[test]
    fn test_frame_stats_reset_after_interval() {
        let mut state = app();
        state.config.debug.frame_stats_interval = 3;
        for _ in 0..3 {
            state.record_frame();
        }
        assert_eq!(state.stats_frames, 0);
        state.record_frame();
        assert_eq!(state.stats_frames, 1);
    }
}
