//! Mouse orbit controls layered on top of the automatic camera orbit.

use orrery_config::ControlsConfig;
use orrery_scene::Orrery;

use crate::input::MouseState;

/// Turns left-drag and wheel input into camera rig adjustments.
///
/// Horizontal drag shifts the orbit angle, vertical drag raises or lowers the
/// camera, and the wheel scales the orbit radius. All adjustments are clamped
/// by the configured limits.
#[derive(Debug, Clone)]
pub struct OrbitControls {
    config: ControlsConfig,
}

impl OrbitControls {
    pub fn new(config: ControlsConfig) -> Self {
        Self { config }
    }

    pub fn is_enabled(&self) -> bool {
        self.config.enabled
    }

    /// Apply this frame's mouse input. Returns `true` when the rig changed.
    pub fn apply(&self, mouse: &MouseState, orrery: &mut Orrery) -> bool {
        if !self.config.enabled {
            return false;
        }

        let drag = if mouse.is_left_pressed() {
            mouse.delta()
        } else {
            glam::Vec2::ZERO
        };
        let scroll = mouse.scroll();
        if drag == glam::Vec2::ZERO && scroll == 0.0 {
            return false;
        }

        let c = &self.config;
        orrery.adjust_rig(|rig| {
            if drag.x != 0.0 {
                rig.rotate_by(-drag.x * c.rotate_sensitivity);
            }
            if drag.y != 0.0 {
                rig.raise_by(drag.y * c.pan_sensitivity, c.height_range);
            }
            if scroll != 0.0 {
                // Scrolling away from the user moves the camera closer.
                let factor = (1.0 - scroll * c.zoom_sensitivity).max(0.1);
                rig.zoom_by(factor, c.min_radius, c.max_radius);
            }
        });
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use orrery_scene::{Camera, CameraRig, SceneBuilder, SystemTable, Viewport};
    use winit::event::{ElementState, MouseButton, MouseScrollDelta};

    fn orrery() -> Orrery {
        let table = SystemTable::default();
        let scene = SceneBuilder::new(&table).star_count(0).star_seed(Some(1)).build();
        Orrery::new(
            scene,
            Camera::default(),
            CameraRig::default(),
            Viewport::new(1280, 720),
        )
    }

    fn drag(dx: f64, dy: f64) -> MouseState {
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(400.0, 300.0);
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        mouse.on_cursor_moved(400.0 + dx, 300.0 + dy);
        mouse
    }

    #[test]
    fn test_horizontal_drag_rotates() {
        let controls = OrbitControls::new(ControlsConfig::default());
        let mut orrery = orrery();
        assert!(controls.apply(&drag(-100.0, 0.0), &mut orrery));
        // -100 px × 0.005 rad/px, negated.
        assert!((orrery.rig().angle() - 0.5).abs() < 1e-5);
        assert!((orrery.camera().position - orrery.rig().position()).length() < 1e-4);
    }

    #[test]
    fn test_vertical_drag_raises_within_range() {
        let config = ControlsConfig::default();
        let controls = OrbitControls::new(config.clone());
        let mut orrery = orrery();
        controls.apply(&drag(0.0, 20.0), &mut orrery);
        assert!((orrery.rig().height - 150.0).abs() < 1e-4);

        controls.apply(&drag(0.0, 100_000.0), &mut orrery);
        assert_eq!(orrery.rig().height, config.height_range[1]);
    }

    #[test]
    fn test_scroll_zooms_within_range() {
        let config = ControlsConfig::default();
        let controls = OrbitControls::new(config.clone());
        let mut orrery = orrery();

        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, 1.0));
        controls.apply(&mouse, &mut orrery);
        assert!((orrery.rig().radius - 126.0).abs() < 1e-3);

        let mut mouse = MouseState::new();
        mouse.on_scroll(MouseScrollDelta::LineDelta(0.0, -1000.0));
        controls.apply(&mouse, &mut orrery);
        assert_eq!(orrery.rig().radius, config.max_radius);
    }

    #[test]
    fn test_move_without_button_does_nothing() {
        let controls = OrbitControls::new(ControlsConfig::default());
        let mut orrery = orrery();
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(0.0, 0.0);
        mouse.on_cursor_moved(50.0, 50.0);
        let before = orrery.rig().clone();
        assert!(!controls.apply(&mouse, &mut orrery));
        assert_eq!(orrery.rig(), &before);
    }

    #[test]
    fn test_click_after_hover_does_not_rotate() {
        let controls = OrbitControls::new(ControlsConfig::default());
        let mut orrery = orrery();
        let mut mouse = MouseState::new();
        mouse.on_cursor_moved(100.0, 300.0);
        mouse.on_cursor_moved(300.0, 300.0);
        mouse.on_button(MouseButton::Left, ElementState::Pressed);
        let before = orrery.rig().clone();
        assert!(!controls.apply(&mouse, &mut orrery));
        assert_eq!(orrery.rig(), &before);
    }

    #[test]
    fn test_disabled_controls_do_nothing() {
        let controls = OrbitControls::new(ControlsConfig {
            enabled: false,
            ..ControlsConfig::default()
        });
        let mut orrery = orrery();
        let before = orrery.rig().clone();
        assert!(!controls.is_enabled());
        assert!(!controls.apply(&drag(80.0, 80.0), &mut orrery));
        assert_eq!(orrery.rig(), &before);
    }
}
