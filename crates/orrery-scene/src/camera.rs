//! Perspective camera and the rig that orbits it around the origin.

use glam::{Mat3, Mat4, Quat, Vec3};

/// A camera that generates view and projection matrices for rendering.
#[derive(Debug, Clone)]
pub struct Camera {
    pub position: Vec3,
    /// Rotation as a unit quaternion; identity looks down -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    /// Near clip plane distance (always positive).
    pub near: f32,
    /// Far clip plane distance (always positive, > near).
    pub far: f32,
}

impl Camera {
    /// A camera at the origin with the given vertical field of view in degrees.
    pub fn perspective(fov_degrees: f32, aspect_ratio: f32, near: f32, far: f32) -> Self {
        Self {
            fov_y: fov_degrees.to_radians(),
            aspect_ratio,
            near,
            far,
            ..Self::default()
        }
    }

    /// Compute the view matrix (inverse of camera transform).
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.rotation, self.position).inverse()
    }

    /// Compute the projection matrix with reverse-Z.
    pub fn projection_matrix(&self) -> Mat4 {
        // Near maps to z=1, far to z=0: pass far as "near" and near as "far".
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// The forward direction vector (-Z in camera space).
    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    /// The up direction vector (+Y in camera space).
    pub fn up(&self) -> Vec3 {
        self.rotation * Vec3::Y
    }

    /// Turn the camera to face `target`, keeping world +Y as up.
    pub fn look_at(&mut self, target: Vec3) {
        let forward = (target - self.position).normalize_or_zero();
        if forward == Vec3::ZERO || forward.cross(Vec3::Y).length_squared() < 1e-12 {
            return;
        }
        let right = forward.cross(Vec3::Y).normalize();
        let up = right.cross(forward);
        self.rotation = Quat::from_mat3(&Mat3::from_cols(right, up, -forward)).normalize();
    }

    /// Update the aspect ratio for perspective projection.
    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        self.aspect_ratio = width / height;
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 45f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 0.1,
            far: 2000.0,
        }
    }
}

/// Drives a [`Camera`] around a horizontal circle centred on the origin.
///
/// Each [`advance`](Self::advance) adds `step` to the orbit angle and places the
/// camera at `(radius·sin θ, height, radius·cos θ)`, facing the origin.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraRig {
    angle: f32,
    pub radius: f32,
    pub height: f32,
    pub step: f32,
}

impl CameraRig {
    pub fn new(radius: f32, height: f32, step: f32) -> Self {
        Self {
            angle: 0.0,
            radius,
            height,
            step,
        }
    }

    /// Current orbit angle, wrapped into `[0, 2π)`.
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Advance one tick and re-place the camera.
    pub fn advance(&mut self, camera: &mut Camera) {
        self.rotate_by(self.step);
        self.apply(camera);
    }

    /// Place the camera for the current angle without advancing.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position();
        camera.look_at(Vec3::ZERO);
    }

    /// Camera position for the current angle.
    pub fn position(&self) -> Vec3 {
        let (sin, cos) = self.angle.sin_cos();
        Vec3::new(self.radius * sin, self.height, self.radius * cos)
    }

    /// Shift the orbit angle, e.g. from a mouse drag.
    pub fn rotate_by(&mut self, delta: f32) {
        self.angle = wrap_angle(self.angle + delta);
    }

    /// Raise or lower the camera, clamped to `range`.
    pub fn raise_by(&mut self, delta: f32, range: [f32; 2]) {
        self.height = (self.height + delta).clamp(range[0], range[1]);
    }

    /// Scale the orbit radius, clamped to `[min, max]`.
    pub fn zoom_by(&mut self, factor: f32, min: f32, max: f32) {
        self.radius = (self.radius * factor).clamp(min, max);
    }
}

impl Default for CameraRig {
    fn default() -> Self {
        Self::new(140.0, 140.0, 0.001)
    }
}

/// Wrap an angle into `[0, 2π)`.
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(std::f32::consts::TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if wrapped >= std::f32::consts::TAU {
        0.0
    } else {
        wrapped
    }
}
