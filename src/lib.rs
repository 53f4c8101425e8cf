// src/lib.rs
//! Farm Twin
//!
//! A procedural 3D farm-field viewer built on wgpu and winit. An ordered list
//! of [`FieldDescriptor`](farm::FieldDescriptor)s becomes a scene of plots,
//! labels and crop models, viewed through a pointer-driven orbit camera.

pub mod app;
pub mod config;
pub mod error;
pub mod farm;
pub mod gfx;
pub mod prelude;
pub mod view;
pub mod wgpu_utils;

#[cfg(test)]
pub(crate) mod testing;

// Re-export main types for convenience
pub use app::FarmTwinApp;
pub use config::ViewerConfig;
pub use error::FarmTwinError;

/// Creates a viewer configured from the environment
pub fn default() -> FarmTwinApp {
    FarmTwinApp::new(ViewerConfig::from_env())
}
