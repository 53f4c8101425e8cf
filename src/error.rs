//! Error types
//!
//! Library errors are `thiserror` enums; the demo binary wraps them in `anyhow`.

use thiserror::Error;

use crate::gfx::resources::{handle::ResourceHandle, lifecycle::GenerationState};

/// Top-level error for setting up and running the viewer
#[derive(Debug, Error)]
pub enum FarmTwinError {
    #[error("failed to create event loop: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),
    #[error("failed to create surface: {0}")]
    CreateSurface(#[from] wgpu::CreateSurfaceError),
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to request device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error(transparent)]
    Render(#[from] RenderError),
    #[error(transparent)]
    Lifecycle(#[from] LifecycleError),
}

/// Errors raised while drawing a single frame
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("surface error: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("output surface is detached")]
    Detached,
}

/// Violations of the generation and handle lifecycle
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LifecycleError {
    #[error("illegal generation transition {from:?} -> {to:?}")]
    IllegalTransition {
        from: GenerationState,
        to: GenerationState,
    },
    #[error("resource {0} is not live")]
    UnknownHandle(ResourceHandle),
}
