//! Farm domain: field descriptors, procedural plants and the scene layout

pub mod builder;
pub mod field;
pub mod plant;

pub use builder::{field_slot, SceneBuilder};
pub use field::{FieldDescriptor, PlantVariant};
pub use plant::{PlantInstance, PlantModel, PlantPart, ProceduralModelFactory};
