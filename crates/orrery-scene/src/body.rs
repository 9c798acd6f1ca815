//! The declarative body table: one row per planet plus the sun.
//!
//! Both the scene builder and the animation driver read their constants from
//! here, so a custom system only has to swap the table.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::assets::TextureAsset;
use crate::error::SystemError;

/// An annulus attached to a body, e.g. Saturn's rings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RingSpec {
    pub inner_radius: f32,
    pub outer_radius: f32,
    pub texture: TextureAsset,
}

/// One orbiting body.
///
/// Speeds are radians per tick. The body sits `orbital_distance` units along
/// the x-axis of its pivot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CelestialBody {
    pub name: String,
    pub radius: f32,
    pub texture: TextureAsset,
    pub orbital_distance: f32,
    pub self_rotation_speed: f32,
    pub orbital_revolution_speed: f32,
    #[serde(default)]
    pub ring: Option<RingSpec>,
}

/// The central star. It spins but never revolves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SunSpec {
    pub radius: f32,
    pub texture: TextureAsset,
    pub self_rotation_speed: f32,
}

/// Sun, bodies and background texture of one system.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemTable {
    pub sun: SunSpec,
    pub bodies: Vec<CelestialBody>,
    #[serde(default = "default_background")]
    pub background: TextureAsset,
}

fn default_background() -> TextureAsset {
    TextureAsset::Stars
}

impl CelestialBody {
    fn new(
        name: &str,
        radius: f32,
        texture: TextureAsset,
        orbital_distance: f32,
        self_rotation_speed: f32,
        orbital_revolution_speed: f32,
    ) -> Self {
        Self {
            name: name.to_string(),
            radius,
            texture,
            orbital_distance,
            self_rotation_speed,
            orbital_revolution_speed,
            ring: None,
        }
    }

    fn with_ring(mut self, inner_radius: f32, outer_radius: f32, texture: TextureAsset) -> Self {
        self.ring = Some(RingSpec {
            inner_radius,
            outer_radius,
            texture,
        });
        self
    }

    fn validate(&self) -> Result<(), SystemError> {
        let invalid = |reason: String| SystemError::InvalidBody {
            body: self.name.clone(),
            reason,
        };
        if !(self.radius > 0.0) {
            return Err(invalid(format!("radius {} must be positive", self.radius)));
        }
        if !(self.orbital_distance >= 0.0) {
            return Err(invalid(format!(
                "orbital distance {} must not be negative",
                self.orbital_distance
            )));
        }
        if !self.self_rotation_speed.is_finite() || !self.orbital_revolution_speed.is_finite() {
            return Err(invalid("speeds must be finite".to_string()));
        }
        if let Some(ring) = &self.ring
            && !(ring.inner_radius >= 0.0 && ring.inner_radius < ring.outer_radius)
        {
            return Err(invalid(format!(
                "ring radii {}..{} are not an annulus",
                ring.inner_radius, ring.outer_radius
            )));
        }
        Ok(())
    }
}

impl SystemTable {
    /// Load a table from a RON file and validate every row.
    pub fn load(path: &Path) -> Result<Self, SystemError> {
        let contents = std::fs::read_to_string(path).map_err(|source| SystemError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_ron(&contents)?;
        log::info!(
            "Loaded system table with {} bodies from {}",
            table.bodies.len(),
            path.display()
        );
        Ok(table)
    }

    /// Parse and validate a table from RON text.
    pub fn from_ron(contents: &str) -> Result<Self, SystemError> {
        let table: SystemTable = ron::from_str(contents)?;
        table.validate()?;
        Ok(table)
    }

    /// Check every row for dimensions the scene cannot be built from.
    pub fn validate(&self) -> Result<(), SystemError> {
        if !(self.sun.radius > 0.0) {
            return Err(SystemError::InvalidBody {
                body: "Sun".to_string(),
                reason: format!("radius {} must be positive", self.sun.radius),
            });
        }
        self.bodies.iter().try_for_each(CelestialBody::validate)
    }

    /// Look up a body by name.
    pub fn body(&self, name: &str) -> Option<&CelestialBody> {
        self.bodies.iter().find(|b| b.name == name)
    }
}

impl Default for SystemTable {
    /// The solar system: nine bodies, Saturn and Uranus ringed.
    fn default() -> Self {
        use TextureAsset as T;
        Self {
            sun: SunSpec {
                radius: 16.0,
                texture: T::Sun,
                self_rotation_speed: 0.004,
            },
            bodies: vec![
                CelestialBody::new("Mercury", 4.2, T::Mercury, 28.0, 0.004, 0.04),
                CelestialBody::new("Venus", 5.8, T::Venus, 44.0, 0.002, 0.02),
                CelestialBody::new("Earth", 6.0, T::Earth, 62.0, 0.02, 0.01),
                CelestialBody::new("Mars", 5.0, T::Mars, 78.0, 0.018, 0.008),
                CelestialBody::new("Jupiter", 12.0, T::Jupiter, 100.0, 0.04, 0.006),
                CelestialBody::new("Saturn", 10.0, T::Saturn, 138.0, 0.038, 0.009).with_ring(
                    10.0,
                    20.0,
                    T::SaturnRing,
                ),
                CelestialBody::new("Uranus", 7.0, T::Uranus, 176.0, 0.03, 0.004).with_ring(
                    7.0,
                    12.0,
                    T::UranusRing,
                ),
                CelestialBody::new("Neptune", 7.0, T::Neptune, 200.0, 0.032, 0.006),
                CelestialBody::new("Pluto", 3.2, T::Pluto, 216.0, 0.008, 0.008),
            ],
            background: T::Stars,
        }
    }
}
