//! CPU tessellation of sphere and ring geometry.
//!
//! UVs follow wgpu's convention: v = 0 is the top row of the image.

use std::f32::consts::{PI, TAU};

use orrery_scene::Geometry;

use crate::buffer::MeshVertex;

/// Tessellated vertices and triangle-list indices, counter-clockwise when
/// viewed from the front.
#[derive(Debug, Clone, PartialEq)]
pub struct MeshData {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u16>,
}

/// Tessellate a scene geometry description.
pub fn tessellate(geometry: &Geometry) -> MeshData {
    match *geometry {
        Geometry::Sphere {
            radius,
            width_segments,
            height_segments,
        } => uv_sphere(radius, width_segments, height_segments),
        Geometry::Ring {
            inner_radius,
            outer_radius,
            theta_segments,
        } => ring(inner_radius, outer_radius, theta_segments),
    }
}

/// Latitude/longitude sphere centred on the origin with +Y as the pole.
///
/// Produces `(w + 1) × (h + 1)` vertices, duplicating the seam column so the
/// texture wraps cleanly, and skips the degenerate triangles at both poles.
pub fn uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> MeshData {
    let ws = width_segments.max(3);
    let hs = height_segments.max(2);

    let mut vertices = Vec::with_capacity(((ws + 1) * (hs + 1)) as usize);
    for iy in 0..=hs {
        let v = iy as f32 / hs as f32;
        let (sin_v, cos_v) = (v * PI).sin_cos();
        for ix in 0..=ws {
            let u = ix as f32 / ws as f32;
            let (sin_u, cos_u) = (u * TAU).sin_cos();
            let normal = [-cos_u * sin_v, cos_v, sin_u * sin_v];
            vertices.push(MeshVertex {
                position: normal.map(|c| c * radius),
                normal,
                uv: [u, v],
            });
        }
    }

    let row = ws + 1;
    let mut indices = Vec::with_capacity((ws * (hs - 1) * 6) as usize);
    for iy in 0..hs {
        for ix in 0..ws {
            let a = (iy * row + ix + 1) as u16;
            let b = (iy * row + ix) as u16;
            let c = ((iy + 1) * row + ix) as u16;
            let d = ((iy + 1) * row + ix + 1) as u16;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != hs - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    MeshData { vertices, indices }
}

/// Flat annulus in the XY plane facing +Z.
///
/// The texture is mapped planar across the outer square, so a radial strip
/// image wraps around the ring the same way for any radii.
pub fn ring(inner_radius: f32, outer_radius: f32, theta_segments: u32) -> MeshData {
    let segments = theta_segments.max(3);
    let mut vertices = Vec::with_capacity(((segments + 1) * 2) as usize);
    for radius in [inner_radius, outer_radius] {
        for i in 0..=segments {
            let (sin, cos) = (i as f32 / segments as f32 * TAU).sin_cos();
            let (x, y) = (radius * cos, radius * sin);
            vertices.push(MeshVertex {
                position: [x, y, 0.0],
                normal: [0.0, 0.0, 1.0],
                uv: [
                    (x / outer_radius + 1.0) / 2.0,
                    1.0 - (y / outer_radius + 1.0) / 2.0,
                ],
            });
        }
    }

    let mut indices = Vec::with_capacity((segments * 6) as usize);
    for i in 0..segments {
        let a = i as u16;
        let b = (i + segments + 1) as u16;
        let c = (i + segments + 2) as u16;
        let d = (i + 1) as u16;
        indices.extend_from_slice(&[a, b, d, b, c, d]);
    }

    MeshData { vertices, indices }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn triangle_normal(mesh: &MeshData, tri: &[u16]) -> Vec3 {
        let p = |i: u16| Vec3::from(mesh.vertices[i as usize].position);
        let (a, b, c) = (p(tri[0]), p(tri[1]), p(tri[2]));
        (b - a).cross(c - a)
    }

    #[test]
    fn test_sphere_counts() {
        let mesh = uv_sphere(16.0, 30, 30);
        assert_eq!(mesh.vertices.len(), 31 * 31);
        // 30 columns × (2 × 30 − 2) triangles.
        assert_eq!(mesh.indices.len(), 30 * 58 * 3);
    }

    #[test]
    fn test_sphere_vertices_on_surface() {
        let mesh = uv_sphere(6.0, 30, 30);
        for v in &mesh.vertices {
            let p = Vec3::from(v.position);
            assert!((p.length() - 6.0).abs() < 1e-4);
            assert!((Vec3::from(v.normal) - p / 6.0).length() < 1e-5);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_sphere_top_row_is_north_pole() {
        let mesh = uv_sphere(1.0, 8, 4);
        let first = mesh.vertices[0];
        assert!((first.position[1] - 1.0).abs() < 1e-6);
        assert_eq!(first.uv[1], 0.0);
    }

    #[test]
    fn test_sphere_winding_faces_outward() {
        let mesh = uv_sphere(10.0, 30, 30);
        for tri in mesh.indices.chunks(3) {
            let centroid = tri
                .iter()
                .map(|&i| Vec3::from(mesh.vertices[i as usize].position))
                .sum::<Vec3>()
                / 3.0;
            assert!(triangle_normal(&mesh, tri).dot(centroid) > 0.0);
        }
    }

    #[test]
    fn test_sphere_indices_fit_u16() {
        let mesh = uv_sphere(1.0, 30, 30);
        let max = *mesh.indices.iter().max().unwrap() as usize;
        assert!(max < mesh.vertices.len());
    }

    #[test]
    fn test_ring_counts() {
        let mesh = ring(10.0, 20.0, 32);
        assert_eq!(mesh.vertices.len(), 66);
        assert_eq!(mesh.indices.len(), 192);
    }

    #[test]
    fn test_ring_vertices_between_radii() {
        let mesh = ring(7.0, 12.0, 32);
        for v in &mesh.vertices {
            let r = Vec3::from(v.position).length();
            assert!(r > 7.0 - 1e-4 && r < 12.0 + 1e-4);
            assert_eq!(v.position[2], 0.0);
            assert!((0.0..=1.0).contains(&v.uv[0]));
            assert!((0.0..=1.0).contains(&v.uv[1]));
        }
    }

    #[test]
    fn test_ring_faces_positive_z() {
        let mesh = ring(10.0, 20.0, 32);
        for tri in mesh.indices.chunks(3) {
            assert!(triangle_normal(&mesh, tri).z > 0.0);
        }
    }

    #[test]
    fn test_tessellate_dispatches() {
        let sphere = tessellate(&Geometry::Sphere {
            radius: 2.0,
            width_segments: 30,
            height_segments: 30,
        });
        assert_eq!(sphere.vertices.len(), 961);
        let annulus = tessellate(&Geometry::Ring {
            inner_radius: 1.0,
            outer_radius: 2.0,
            theta_segments: 32,
        });
        assert_eq!(annulus.indices.len(), 192);
    }
}
