//! Procedural plant models
//!
//! Plants are assembled from the primitives in [`crate::gfx::geometry`]. Every
//! dimension and colour is fixed; a model depends only on its variant.

use std::f32::consts::PI;

use cgmath::{Matrix4, Rad, Vector3};

use crate::gfx::{
    geometry::{generate_cylinder, generate_plane, generate_sphere, GeometryData},
    resources::material::Material,
};

use super::field::PlantVariant;

/// One mesh of a plant, positioned relative to the plant's base
#[derive(Debug, Clone, PartialEq)]
pub struct PlantPart {
    pub name: String,
    pub geometry: GeometryData,
    pub material: Material,
    pub transform: Matrix4<f32>,
}

/// A full plant placed at `offset` from the field slot
#[derive(Debug, Clone, PartialEq)]
pub struct PlantInstance {
    pub offset: Vector3<f32>,
    pub parts: Vec<PlantPart>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlantModel {
    pub variant: PlantVariant,
    pub instances: Vec<PlantInstance>,
}

impl PlantModel {
    pub fn part_count(&self) -> usize {
        self.instances.iter().map(|i| i.parts.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

const CORN_LEAF_COUNT: usize = 6;
const WHEAT_SPIKE_COUNT: usize = 8;
const WHEAT_GRID_SPACING: f32 = 0.5;

#[derive(Debug, Default, Clone, Copy)]
pub struct ProceduralModelFactory;

impl ProceduralModelFactory {
    pub fn new() -> Self {
        Self
    }

    pub fn build(&self, variant: PlantVariant) -> PlantModel {
        let instances = match variant {
            PlantVariant::Corn => vec![PlantInstance {
                offset: Vector3::new(0.0, 0.0, 0.0),
                parts: corn_parts(),
            }],
            PlantVariant::Wheat => {
                let parts = wheat_parts();
                // 3x3 grid around the slot, every cell owns its own copy
                let mut instances = Vec::with_capacity(9);
                for x in -1..=1 {
                    for z in -1..=1 {
                        instances.push(PlantInstance {
                            offset: Vector3::new(
                                x as f32 * WHEAT_GRID_SPACING,
                                0.0,
                                z as f32 * WHEAT_GRID_SPACING,
                            ),
                            parts: parts.clone(),
                        });
                    }
                }
                instances
            }
            PlantVariant::None => Vec::new(),
        };
        PlantModel { variant, instances }
    }
}

fn at(x: f32, y: f32, z: f32) -> Matrix4<f32> {
    Matrix4::from_translation(Vector3::new(x, y, z))
}

fn corn_parts() -> Vec<PlantPart> {
    let mut parts = Vec::with_capacity(CORN_LEAF_COUNT + 2);

    parts.push(PlantPart {
        name: "corn stalk".to_string(),
        geometry: generate_cylinder(0.1, 0.15, 2.0, 8),
        material: Material::from_hex("corn stalk", 0x2d5016),
        transform: at(0.0, 1.0, 0.0),
    });

    for i in 0..CORN_LEAF_COUNT {
        let side = if i % 2 == 0 { 1.0 } else { -1.0 };
        parts.push(PlantPart {
            name: format!("corn leaf {i}"),
            geometry: generate_plane(0.8, 0.3, 1, 1),
            material: Material::from_hex("corn leaf", 0x4a7c2a),
            transform: at(0.2 * side, 0.3 + i as f32 * 0.3, 0.0)
                * Matrix4::from_angle_z(Rad(PI / 6.0 * side)),
        });
    }

    parts.push(PlantPart {
        name: "corn ear".to_string(),
        geometry: generate_cylinder(0.08, 0.08, 0.3, 8),
        material: Material::from_hex("corn ear", 0xd4af37),
        transform: at(0.0, 1.8, 0.0),
    });

    parts
}

fn wheat_parts() -> Vec<PlantPart> {
    let mut parts = Vec::with_capacity(WHEAT_SPIKE_COUNT + 2);

    parts.push(PlantPart {
        name: "wheat stalk".to_string(),
        geometry: generate_cylinder(0.05, 0.08, 1.2, 6),
        material: Material::from_hex("wheat stalk", 0x4a7c2a),
        transform: at(0.0, 0.6, 0.0),
    });

    parts.push(PlantPart {
        name: "wheat head".to_string(),
        geometry: generate_sphere(0.15, 8, 8),
        material: Material::from_hex("wheat head", 0xd4af37),
        transform: at(0.0, 1.3, 0.0),
    });

    for i in 0..WHEAT_SPIKE_COUNT {
        let theta = i as f32 * 2.0 * PI / WHEAT_SPIKE_COUNT as f32;
        parts.push(PlantPart {
            name: format!("wheat spike {i}"),
            geometry: generate_cylinder(0.01, 0.01, 0.2, 4),
            material: Material::from_hex("wheat spike", 0xc9a961),
            transform: at(theta.cos() * 0.12, 1.4, theta.sin() * 0.12)
                * Matrix4::from_angle_z(Rad(theta)),
        });
    }

    parts
}
