//! Scene lights: one ambient term and one point light at the sun.

use glam::Vec3;

/// An sRGB colour with components in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color::from_hex(0xffffff);

    /// Build a colour from a `0xRRGGBB` literal.
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Convert to linear RGB for shading.
    pub fn to_linear(self) -> Vec3 {
        fn channel(c: f32) -> f32 {
            if c <= 0.04045 {
                c / 12.92
            } else {
                ((c + 0.055) / 1.055).powf(2.4)
            }
        }
        Vec3::new(channel(self.r), channel(self.g), channel(self.b))
    }
}

/// Uniform light added to every lit surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    /// Linear contribution fed to the shader.
    pub fn radiance(&self) -> Vec3 {
        self.color.to_linear() * self.intensity
    }
}

/// Omnidirectional light with a finite range.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PointLight {
    pub position: Vec3,
    pub color: Color,
    pub intensity: f32,
    /// Beyond this distance the light contributes nothing.
    pub range: f32,
    /// Exponent of the windowed falloff.
    pub decay: f32,
}

impl PointLight {
    /// Attenuation factor at `distance`, in `[0, 1]`.
    ///
    /// `(1 - d / range)^decay`, reaching exactly zero at `range`. The shader
    /// evaluates the same expression per fragment.
    pub fn attenuation(&self, distance: f32) -> f32 {
        if distance >= self.range {
            return 0.0;
        }
        (1.0 - distance / self.range).max(0.0).powf(self.decay)
    }
}

impl Default for AmbientLight {
    fn default() -> Self {
        Self {
            color: Color::from_hex(0x333333),
            intensity: 1.0,
        }
    }
}

impl Default for PointLight {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            color: Color::WHITE,
            intensity: 2.0,
            range: 3000.0,
            decay: 1.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_hex_channels() {
        let c = Color::from_hex(0x336699);
        assert!((c.r - 0.2).abs() < 1e-6);
        assert!((c.g - 0.4).abs() < 1e-6);
        assert!((c.b - 0.6).abs() < 1e-6);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Color::from_hex(0x000000).to_linear(), Vec3::ZERO);
        let white = Color::WHITE.to_linear();
        assert!((white - Vec3::ONE).length() < 1e-6);
    }

    #[test]
    fn test_ambient_is_dim_grey() {
        let radiance = AmbientLight::default().radiance();
        assert!(radiance.x > 0.0 && radiance.x < 0.1);
        assert_eq!(radiance.x, radiance.y);
        assert_eq!(radiance.y, radiance.z);
    }

    #[test]
    fn test_attenuation_is_one_at_source() {
        assert_eq!(PointLight::default().attenuation(0.0), 1.0);
    }

    #[test]
    fn test_attenuation_zero_at_and_beyond_range() {
        let light = PointLight::default();
        assert_eq!(light.attenuation(3000.0), 0.0);
        assert_eq!(light.attenuation(5000.0), 0.0);
    }

    #[test]
    fn test_attenuation_monotonic() {
        let light = PointLight::default();
        let mut prev = light.attenuation(0.0);
        for d in (100..3000).step_by(100) {
            let a = light.attenuation(d as f32);
            assert!(a < prev, "attenuation should fall with distance");
            prev = a;
        }
    }

    #[test]
    fn test_outer_planets_still_lit() {
        // Pluto orbits at 216 units; most of the light should still reach it.
        assert!(PointLight::default().attenuation(216.0) > 0.9);
    }
}
