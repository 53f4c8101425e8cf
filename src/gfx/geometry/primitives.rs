//! # Primitive Shape Generation
//!
//! This module contains functions to generate common 3D primitive shapes.
//! All shapes are generated with proper normals and texture coordinates.

use super::GeometryData;
use std::f32::consts::PI;

/// Generate a UV sphere with specified radius and resolution
///
/// # Arguments
/// * `radius` - Radius of the sphere
/// * `longitude_segments` - Number of vertical segments (longitude lines)
/// * `latitude_segments` - Number of horizontal segments (latitude lines)
///
/// Returns a sphere centered at the origin.
pub fn generate_sphere(radius: f32, longitude_segments: u32, latitude_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let long_segs = longitude_segments.max(3);
    let lat_segs = latitude_segments.max(2);

    // Generate vertices
    for lat in 0..=lat_segs {
        let theta = lat as f32 * PI / lat_segs as f32; // 0 to PI
        let sin_theta = theta.sin();
        let cos_theta = theta.cos();

        for long in 0..=long_segs {
            let phi = long as f32 * 2.0 * PI / long_segs as f32; // 0 to 2*PI
            let sin_phi = phi.sin();
            let cos_phi = phi.cos();

            // Spherical to Cartesian coordinates
            let x = sin_theta * cos_phi;
            let y = cos_theta; // Y-up for rendering
            let z = sin_theta * sin_phi;

            data.vertices.push([x * radius, y * radius, z * radius]);
            data.normals.push([x, y, z]);

            let u = long as f32 / long_segs as f32;
            let v = lat as f32 / lat_segs as f32;
            data.tex_coords.push([u, v]);
        }
    }

    // Generate indices
    for lat in 0..lat_segs {
        for long in 0..long_segs {
            let first = lat * (long_segs + 1) + long;
            let second = first + long_segs + 1;

            data.indices.push(first);
            data.indices.push(second);
            data.indices.push(first + 1);

            data.indices.push(second);
            data.indices.push(second + 1);
            data.indices.push(first + 1);
        }
    }

    data
}

/// Generate a plane in the XY plane
///
/// # Arguments
/// * `width` - Width of the plane (X direction)
/// * `height` - Height of the plane (Y direction)
/// * `width_segments` - Number of subdivisions along width
/// * `height_segments` - Number of subdivisions along height
///
/// Returns a plane centered at the origin with its normal pointing along
/// positive Z. Lay it on the ground by rotating -90 degrees about X.
///
/// Negative or zero sizes are not rejected; they produce a mirrored or
/// degenerate plane.
pub fn generate_plane(width: f32, height: f32, width_segments: u32, height_segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let w_segs = width_segments.max(1);
    let h_segs = height_segments.max(1);

    for y in 0..=h_segs {
        let v = y as f32 / h_segs as f32;
        let pos_y = (v - 0.5) * height;

        for x in 0..=w_segs {
            let u = x as f32 / w_segs as f32;
            let pos_x = (u - 0.5) * width;

            data.vertices.push([pos_x, pos_y, 0.0]);
            data.normals.push([0.0, 0.0, 1.0]);
            data.tex_coords.push([u, v]);
        }
    }

    // Counter-clockwise when viewed from +Z
    for y in 0..h_segs {
        for x in 0..w_segs {
            let i = y * (w_segs + 1) + x;
            let next_row = i + w_segs + 1;

            data.indices.push(i);
            data.indices.push(i + 1);
            data.indices.push(next_row);

            data.indices.push(next_row);
            data.indices.push(i + 1);
            data.indices.push(next_row + 1);
        }
    }

    data
}

/// Generate a Y-aligned cylinder, optionally tapered
///
/// # Arguments
/// * `radius_top` - Radius of the upper cap
/// * `radius_bottom` - Radius of the lower cap
/// * `height` - Height of the cylinder (along Y-axis)
/// * `segments` - Number of circular segments
///
/// Returns a cylinder centered at the origin extending from -height/2 to height/2 in Y.
pub fn generate_cylinder(radius_top: f32, radius_bottom: f32, height: f32, segments: u32) -> GeometryData {
    let mut data = GeometryData::new();

    let segs = segments.max(3);
    let half_height = height * 0.5;

    // Side normals tilt outwards by the taper slope
    let slope = if height != 0.0 {
        (radius_bottom - radius_top) / height
    } else {
        0.0
    };
    let normal_len = (1.0 + slope * slope).sqrt();

    // Generate side vertices
    for i in 0..=segs {
        let angle = i as f32 * 2.0 * PI / segs as f32;
        let cos_a = angle.cos();
        let sin_a = angle.sin();
        let normal = [cos_a / normal_len, slope / normal_len, sin_a / normal_len];
        let u = i as f32 / segs as f32;

        // Bottom vertex
        data.vertices.push([radius_bottom * cos_a, -half_height, radius_bottom * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 0.0]);

        // Top vertex
        data.vertices.push([radius_top * cos_a, half_height, radius_top * sin_a]);
        data.normals.push(normal);
        data.tex_coords.push([u, 1.0]);
    }

    // Side faces
    for i in 0..segs {
        let bottom_current = i * 2;
        let top_current = bottom_current + 1;
        let bottom_next = (i + 1) * 2;
        let top_next = bottom_next + 1;

        data.indices.push(bottom_current);
        data.indices.push(top_current);
        data.indices.push(bottom_next);

        data.indices.push(top_current);
        data.indices.push(top_next);
        data.indices.push(bottom_next);
    }

    // Cap centers
    let center_bottom_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, -half_height, 0.0]);
    data.normals.push([0.0, -1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    let center_top_idx = data.vertices.len() as u32;
    data.vertices.push([0.0, half_height, 0.0]);
    data.normals.push([0.0, 1.0, 0.0]);
    data.tex_coords.push([0.5, 0.5]);

    // Bottom cap
    for i in 0..segs {
        let current = i * 2;
        let next = (i + 1) * 2;

        data.indices.push(center_bottom_idx);
        data.indices.push(current);
        data.indices.push(next);
    }

    // Top cap
    for i in 0..segs {
        let current = i * 2 + 1;
        let next = (i + 1) * 2 + 1;

        data.indices.push(center_top_idx);
        data.indices.push(next);
        data.indices.push(current);
    }

    data
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_generation() {
        let sphere = generate_sphere(0.15, 8, 8);
        assert_eq!(sphere.vertices.len(), 81); // 9x9 grid
        assert_eq!(sphere.indices.len(), 8 * 8 * 6);
        assert_eq!(sphere.vertices.len(), sphere.normals.len());
        assert_eq!(sphere.vertices.len(), sphere.tex_coords.len());

        for v in &sphere.vertices {
            let r = (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
            assert!((r - 0.15).abs() < 1e-5);
        }
    }

    #[test]
    fn test_plane_generation() {
        let plane = generate_plane(2.0, 2.0, 2, 2);
        assert_eq!(plane.vertices.len(), 9); // 3x3 grid
        assert_eq!(plane.indices.len(), 24); // 4 quads * 2 triangles * 3 indices
    }

    #[test]
    fn test_plane_extent_matches_size() {
        let plane = generate_plane(4.0, 1.5, 1, 1);
        let max_x = plane.vertices.iter().map(|v| v[0]).fold(f32::MIN, f32::max);
        let max_y = plane.vertices.iter().map(|v| v[1]).fold(f32::MIN, f32::max);
        assert_eq!(max_x, 2.0);
        assert_eq!(max_y, 0.75);
    }

    #[test]
    fn test_tapered_cylinder_radii() {
        let stalk = generate_cylinder(0.10, 0.15, 2.0, 8);
        // 9 side pairs + 2 cap centers
        assert_eq!(stalk.vertex_count(), 20);
        // 8 side quads + 8 bottom + 8 top triangles
        assert_eq!(stalk.triangle_count(), 32);

        let radius_at = |y: f32| {
            stalk
                .vertices
                .iter()
                .filter(|v| (v[1] - y).abs() < 1e-6)
                .map(|v| (v[0] * v[0] + v[2] * v[2]).sqrt())
                .fold(0.0f32, f32::max)
        };
        assert!((radius_at(-1.0) - 0.15).abs() < 1e-5);
        assert!((radius_at(1.0) - 0.10).abs() < 1e-5);
    }

    #[test]
    fn test_cylinder_indices_in_range() {
        let spike = generate_cylinder(0.01, 0.01, 0.2, 4);
        let count = spike.vertex_count() as u32;
        assert!(spike.indices.iter().all(|&i| i < count));
    }
}
