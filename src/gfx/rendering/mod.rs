// src/gfx/rendering/mod.rs
//! Core rendering functionality
//!
//! The per-frame [`RenderLoop`] and the wgpu [`RenderEngine`] that draws its frames.

pub mod pipeline_manager;
pub mod render_engine;
pub mod render_loop;

// Re-export main types
pub use pipeline_manager::{PipelineConfig, PipelineManager, PipelineStats};
pub use render_engine::RenderEngine;
pub use render_loop::{CancellationToken, FrameContext, FrameSink, RenderLoop, Tick};
