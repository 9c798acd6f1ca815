//! Desktop shell for the orrery.
//!
//! Owns the window, drives the fixed-rate animation from redraws, forwards
//! mouse input to the orbit controls and hands each frame to the renderer.

pub mod game_loop;
pub mod input;
pub mod orbit_controls;
pub mod platform;
pub mod window;

pub use game_loop::GameLoop;
pub use input::MouseState;
pub use orbit_controls::OrbitControls;
pub use platform::{PlatformDirs, PlatformError};
pub use window::{AppState, run};
