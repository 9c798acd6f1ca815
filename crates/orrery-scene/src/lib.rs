//! Host-agnostic core of the orrery: the body table, the scene graph built
//! from it, and the per-tick animation of spins, revolutions and the camera.
//!
//! Nothing in this crate touches a window or the GPU. A host owns one
//! [`Orrery`], calls [`Orrery::tick`] at a fixed rate, forwards window
//! resizes to [`Orrery::resize`], and hands [`Orrery::scene`] and
//! [`Orrery::camera`] to a renderer.

pub mod assets;
pub mod body;
pub mod camera;
pub mod context;
pub mod error;
pub mod graph;
pub mod light;
pub mod starfield;
pub mod viewport;

pub use assets::TextureAsset;
pub use body::{CelestialBody, RingSpec, SunSpec, SystemTable};
pub use camera::{Camera, CameraRig};
pub use context::Orrery;
pub use error::SystemError;
pub use graph::{
    Geometry, Material, MeshInstance, MeshNode, PivotNode, Scene, SceneBuilder, Shading,
};
pub use light::{AmbientLight, Color, PointLight};
pub use starfield::Starfield;
pub use viewport::Viewport;
