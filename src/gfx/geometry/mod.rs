//! # Procedural Geometry Generation
//!
//! This module provides functions to generate the primitive shapes the farm
//! scene is assembled from, so no external model files are needed.
//!
//! ## Supported Primitives
//!
//! - **Plane**: Flat plane with configurable size and subdivisions
//! - **Sphere**: UV sphere with configurable radius and resolution
//! - **Cylinder**: Y-aligned cylinder with independent top and bottom radius
//!
//! ## Usage
//!
//! ```rust
//! use farm_twin::gfx::geometry::{generate_cylinder, generate_plane, generate_sphere};
//!
//! // A 20x20 ground plane
//! let ground = generate_plane(20.0, 20.0, 1, 1);
//!
//! // A tapered stalk, 2 units tall
//! let stalk = generate_cylinder(0.10, 0.15, 2.0, 8);
//!
//! // A small head
//! let head = generate_sphere(0.15, 8, 8);
//! # assert!(ground.triangle_count() > 0 && stalk.triangle_count() > 0 && head.triangle_count() > 0);
//! ```

pub mod primitives;

pub use primitives::*;

use crate::gfx::scene::vertex::Vertex3D;

/// Represents generated geometry data ready for GPU upload
#[derive(Debug, Clone, PartialEq)]
pub struct GeometryData {
    /// Vertex positions (x, y, z)
    pub vertices: Vec<[f32; 3]>,
    /// Texture coordinates (u, v)
    pub tex_coords: Vec<[f32; 2]>,
    /// Normal vectors (x, y, z)
    pub normals: Vec<[f32; 3]>,
    /// Triangle indices (counter-clockwise winding)
    pub indices: Vec<u32>,
}

impl GeometryData {
    /// Create a new empty geometry data structure
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            tex_coords: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Get the number of vertices in this geometry
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of triangles in this geometry
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Interleaves positions and normals into the vertex format the renderer uploads
    pub fn to_vertices(&self) -> Vec<Vertex3D> {
        (0..self.vertices.len())
            .map(|i| Vertex3D {
                position: self.vertices[i],
                normal: self.normals.get(i).copied().unwrap_or([0.0, 1.0, 0.0]),
            })
            .collect()
    }
}

impl Default for GeometryData {
    fn default() -> Self {
        Self::new()
    }
}
