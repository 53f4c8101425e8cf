// src/gfx/resources/mod.rs
//! GPU resource management
//!
//! Handles, materials, global bindings and the generation lifecycle that
//! decides when GPU memory is released.

pub mod global_bindings;
pub mod handle;
pub mod lifecycle;
pub mod material;
pub mod texture_resource;

// Re-export main types
pub use global_bindings::{update_global_ubo, GlobalBindings, GlobalUBO, SceneLighting};
pub use handle::{ResourceBackend, ResourceHandle, ResourceKind, ResourceTracker};
pub use lifecycle::{DisposeReport, Generation, GenerationState, ResourceLifecycleManager};
pub use material::Material;
pub use texture_resource::TextureResource;
