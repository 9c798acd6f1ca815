//! Scene graph: sun, pivots, bodies, rings, lights, background and stars.
//!
//! The graph is shallow. Every body hangs off a pivot at the origin; turning
//! the pivot about +Y revolves the body, turning the body mesh about its own
//! +Y spins it. World transforms are derived on demand from the angles, so the
//! only mutable state is the angles themselves.

use std::f32::consts::FRAC_PI_2;

use glam::{Mat4, Quat, Vec3};

use crate::assets::TextureAsset;
use crate::body::{CelestialBody, SystemTable};
use crate::camera::wrap_angle;
use crate::light::{AmbientLight, PointLight};
use crate::starfield::{DEFAULT_STAR_COUNT, Starfield};

/// Width and height segments of every sphere.
pub const SPHERE_SEGMENTS: u32 = 30;
/// Angular segments of every ring.
pub const RING_SEGMENTS: u32 = 32;
/// Opacity of ring materials.
pub const RING_OPACITY: f32 = 0.8;

/// Shape of a mesh, tessellated by the renderer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Geometry {
    Sphere {
        radius: f32,
        width_segments: u32,
        height_segments: u32,
    },
    /// Flat annulus in the local XY plane.
    Ring {
        inner_radius: f32,
        outer_radius: f32,
        theta_segments: u32,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shading {
    /// Texture colour only, no lighting.
    Unlit,
    /// Lit by the ambient and point lights.
    Lit,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Material {
    pub shading: Shading,
    pub texture: TextureAsset,
    /// Values below 1.0 are alpha blended.
    pub opacity: f32,
    /// Draw back faces too.
    pub double_sided: bool,
}

impl Material {
    pub fn is_transparent(&self) -> bool {
        self.opacity < 1.0
    }
}

/// A textured mesh with a fixed placement and a spin angle about its local +Y.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshNode {
    pub name: String,
    pub geometry: Geometry,
    pub material: Material,
    pub translation: Vec3,
    /// Rotation applied before spin, e.g. to lay a ring flat.
    pub base_rotation: Quat,
    /// Self-rotation in `[0, 2π)`.
    pub spin: f32,
    /// Added to `spin` every tick.
    pub spin_speed: f32,
}

impl MeshNode {
    /// Transform relative to the parent: `T · base · R_y(spin)`.
    pub fn local_matrix(&self) -> Mat4 {
        Mat4::from_translation(self.translation)
            * Mat4::from_quat(self.base_rotation)
            * Mat4::from_rotation_y(self.spin)
    }

    pub(crate) fn advance_spin(&mut self) {
        self.spin = wrap_angle(self.spin + self.spin_speed);
    }
}

/// Invisible anchor at the origin carrying one body and optionally its ring.
#[derive(Debug, Clone, PartialEq)]
pub struct PivotNode {
    pub body: CelestialBody,
    /// Orbital revolution in `[0, 2π)`.
    pub revolution: f32,
    pub mesh: MeshNode,
    pub ring: Option<MeshNode>,
}

impl PivotNode {
    fn new(body: &CelestialBody) -> Self {
        let offset = Vec3::new(body.orbital_distance, 0.0, 0.0);
        let mesh = MeshNode {
            name: body.name.clone(),
            geometry: Geometry::Sphere {
                radius: body.radius,
                width_segments: SPHERE_SEGMENTS,
                height_segments: SPHERE_SEGMENTS,
            },
            material: Material {
                shading: Shading::Lit,
                texture: body.texture.clone(),
                opacity: 1.0,
                double_sided: false,
            },
            translation: offset,
            base_rotation: Quat::IDENTITY,
            spin: 0.0,
            spin_speed: body.self_rotation_speed,
        };
        // The ring shares the body's pivot and offset but never spins.
        let ring = body.ring.as_ref().map(|ring| MeshNode {
            name: format!("{} ring", body.name),
            geometry: Geometry::Ring {
                inner_radius: ring.inner_radius,
                outer_radius: ring.outer_radius,
                theta_segments: RING_SEGMENTS,
            },
            material: Material {
                shading: Shading::Unlit,
                texture: ring.texture.clone(),
                opacity: RING_OPACITY,
                double_sided: true,
            },
            translation: offset,
            base_rotation: Quat::from_rotation_x(-FRAC_PI_2),
            spin: 0.0,
            spin_speed: 0.0,
        });

        Self {
            body: body.clone(),
            revolution: 0.0,
            mesh,
            ring,
        }
    }

    pub fn matrix(&self) -> Mat4 {
        Mat4::from_rotation_y(self.revolution)
    }

    /// World position of the body's centre.
    pub fn body_position(&self) -> Vec3 {
        self.matrix().transform_point3(self.mesh.translation)
    }

    pub(crate) fn advance_revolution(&mut self) {
        self.revolution = wrap_angle(self.revolution + self.body.orbital_revolution_speed);
    }
}

/// Screen-filling background image.
#[derive(Debug, Clone, PartialEq)]
pub struct Background {
    pub texture: TextureAsset,
}

/// A mesh paired with its world transform for one frame.
#[derive(Debug, Clone, Copy)]
pub struct MeshInstance<'a> {
    pub node: &'a MeshNode,
    pub world: Mat4,
}

/// The complete scene.
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Background,
    pub ambient: AmbientLight,
    pub point_light: PointLight,
    pub starfield: Starfield,
    pub sun: MeshNode,
    pub pivots: Vec<PivotNode>,
}

impl Scene {
    /// Every mesh with its world transform: the sun first, then each pivot's
    /// body followed by its ring. The order is stable for the scene's lifetime.
    pub fn mesh_instances(&self) -> Vec<MeshInstance<'_>> {
        let mut out = Vec::with_capacity(1 + self.pivots.len() * 2);
        out.push(MeshInstance {
            node: &self.sun,
            world: self.sun.local_matrix(),
        });
        for pivot in &self.pivots {
            let parent = pivot.matrix();
            out.push(MeshInstance {
                node: &pivot.mesh,
                world: parent * pivot.mesh.local_matrix(),
            });
            if let Some(ring) = &pivot.ring {
                out.push(MeshInstance {
                    node: ring,
                    world: parent * ring.local_matrix(),
                });
            }
        }
        out
    }

    pub fn pivot(&self, name: &str) -> Option<&PivotNode> {
        self.pivots.iter().find(|p| p.body.name == name)
    }

    /// Animation steps 1-3: sun spin, body spins, pivot revolutions.
    pub(crate) fn advance(&mut self) {
        self.sun.advance_spin();
        for pivot in &mut self.pivots {
            pivot.mesh.advance_spin();
        }
        for pivot in &mut self.pivots {
            pivot.advance_revolution();
        }
    }
}

/// Builds a [`Scene`] from a [`SystemTable`].
pub struct SceneBuilder<'a> {
    table: &'a SystemTable,
    star_count: u32,
    star_seed: Option<u64>,
    ambient: AmbientLight,
    point_light: PointLight,
}

impl<'a> SceneBuilder<'a> {
    pub fn new(table: &'a SystemTable) -> Self {
        Self {
            table,
            star_count: DEFAULT_STAR_COUNT,
            star_seed: None,
            ambient: AmbientLight::default(),
            point_light: PointLight::default(),
        }
    }

    pub fn star_count(mut self, count: u32) -> Self {
        self.star_count = count;
        self
    }

    pub fn star_seed(mut self, seed: Option<u64>) -> Self {
        self.star_seed = seed;
        self
    }

    pub fn ambient(mut self, ambient: AmbientLight) -> Self {
        self.ambient = ambient;
        self
    }

    pub fn point_light(mut self, light: PointLight) -> Self {
        self.point_light = light;
        self
    }

    pub fn build(self) -> Scene {
        let sun_spec = &self.table.sun;
        let sun = MeshNode {
            name: "Sun".to_string(),
            geometry: Geometry::Sphere {
                radius: sun_spec.radius,
                width_segments: SPHERE_SEGMENTS,
                height_segments: SPHERE_SEGMENTS,
            },
            material: Material {
                shading: Shading::Unlit,
                texture: sun_spec.texture.clone(),
                opacity: 1.0,
                double_sided: false,
            },
            translation: Vec3::ZERO,
            base_rotation: Quat::IDENTITY,
            spin: 0.0,
            spin_speed: sun_spec.self_rotation_speed,
        };

        let pivots: Vec<_> = self.table.bodies.iter().map(PivotNode::new).collect();
        log::info!(
            "Built scene: {} bodies, {} rings, {} stars",
            pivots.len(),
            pivots.iter().filter(|p| p.ring.is_some()).count(),
            self.star_count
        );

        Scene {
            background: Background {
                texture: self.table.background.clone(),
            },
            ambient: self.ambient,
            point_light: self.point_light,
            starfield: Starfield::generate(self.star_count, self.star_seed),
            sun,
            pivots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scene() -> Scene {
        SceneBuilder::new(&SystemTable::default())
            .star_seed(Some(3))
            .build()
    }

    #[test]
    fn test_one_pivot_per_body() {
        let scene = scene();
        assert_eq!(scene.pivots.len(), 9);
        for pivot in &scene.pivots {
            assert_eq!(pivot.mesh.name, pivot.body.name);
        }
    }

    #[test]
    fn test_rings_only_on_saturn_and_uranus() {
        let scene = scene();
        for pivot in &scene.pivots {
            let ringed = matches!(pivot.body.name.as_str(), "Saturn" | "Uranus");
            assert_eq!(pivot.ring.is_some(), ringed, "{}", pivot.body.name);
        }
    }

    #[test]
    fn test_body_sits_at_orbital_distance_on_pivot_x_axis() {
        for pivot in &scene().pivots {
            assert_eq!(
                pivot.mesh.translation,
                Vec3::new(pivot.body.orbital_distance, 0.0, 0.0)
            );
        }
    }

    #[test]
    fn test_ring_shares_body_offset_and_lies_flat() {
        let scene = scene();
        let saturn = scene.pivot("Saturn").unwrap();
        let ring = saturn.ring.as_ref().unwrap();
        assert_eq!(ring.translation, saturn.mesh.translation);
        // The ring's local +Z (its face normal) should point along world ±Y.
        let normal = ring.local_matrix().transform_vector3(Vec3::Z);
        assert!((normal.y.abs() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_ring_material() {
        let scene = scene();
        let ring = scene.pivot("Uranus").unwrap().ring.as_ref().unwrap();
        assert_eq!(ring.material.shading, Shading::Unlit);
        assert!(ring.material.double_sided);
        assert!(ring.material.is_transparent());
        assert_eq!(ring.material.opacity, 0.8);
        assert_eq!(ring.material.texture, TextureAsset::UranusRing);
        assert_eq!(
            ring.geometry,
            Geometry::Ring {
                inner_radius: 7.0,
                outer_radius: 12.0,
                theta_segments: 32
            }
        );
    }

    #[test]
    fn test_sun_is_unlit_and_planets_lit() {
        let scene = scene();
        assert_eq!(scene.sun.material.shading, Shading::Unlit);
        assert_eq!(scene.sun.material.texture, TextureAsset::Sun);
        assert!(
            scene
                .pivots
                .iter()
                .all(|p| p.mesh.material.shading == Shading::Lit)
        );
    }

    #[test]
    fn test_lights_and_background() {
        let scene = scene();
        assert_eq!(scene.point_light.position, Vec3::ZERO);
        assert_eq!(scene.point_light.intensity, 2.0);
        assert_eq!(scene.point_light.range, 3000.0);
        assert_eq!(scene.background.texture, TextureAsset::Stars);
        assert_eq!(scene.starfield.len(), 8000);
    }

    #[test]
    fn test_mesh_instance_order_and_count() {
        let scene = scene();
        let instances = scene.mesh_instances();
        // sun + 9 bodies + 2 rings
        assert_eq!(instances.len(), 12);
        assert_eq!(instances[0].node.name, "Sun");
        let names: Vec<_> = instances.iter().map(|i| i.node.name.as_str()).collect();
        let saturn = names.iter().position(|n| *n == "Saturn").unwrap();
        assert_eq!(names[saturn + 1], "Saturn ring");
    }

    #[test]
    fn test_world_position_follows_revolution() {
        let mut scene = scene();
        let earth = scene.pivots.iter_mut().find(|p| p.body.name == "Earth").unwrap();
        earth.revolution = FRAC_PI_2;
        // R_y(90°) takes +X to -Z.
        let pos = earth.body_position();
        assert!((pos - Vec3::new(0.0, 0.0, -62.0)).length() < 1e-4);
    }

    #[test]
    fn test_spin_does_not_move_body() {
        let mut scene = scene();
        scene.pivots[2].mesh.spin = 1.0;
        let world = scene.mesh_instances()[3].world;
        let centre = world.transform_point3(Vec3::ZERO);
        assert!((centre - Vec3::new(62.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn test_advance_increments_each_angle_by_its_speed() {
        let mut scene = scene();
        scene.advance();
        assert!((scene.sun.spin - 0.004).abs() < 1e-7);
        let mars = scene.pivot("Mars").unwrap();
        assert!((mars.mesh.spin - 0.018).abs() < 1e-7);
        assert!((mars.revolution - 0.008).abs() < 1e-7);
        let saturn = scene.pivot("Saturn").unwrap();
        assert_eq!(saturn.ring.as_ref().unwrap().spin, 0.0);
    }
}
