//! # Graphics Module
//!
//! Everything between a scene graph and pixels on screen.
//!
//! - **Camera** ([`camera`]) - pointer sampling and the orbit pose
//! - **Geometry** ([`geometry`]) - procedural primitives
//! - **Rendering** ([`rendering`]) - render loop, pipelines and the wgpu engine
//! - **Resources** ([`resources`]) - handles, materials and generation lifecycle
//! - **Scene** ([`scene`]) - the node tree a build produces
//! - **Viewport** ([`viewport`]) - the surface a generation draws into

pub mod camera;
pub mod geometry;
pub mod rendering;
pub mod resources;
pub mod scene;
pub mod viewport;

// Re-export commonly used types
pub use rendering::render_engine::RenderEngine;
pub use viewport::{SurfaceAttachment, Viewport};
