//! Pointer-driven camera
//!
//! The pointer is sampled into a [`PointerSlot`], the [`CameraController`]
//! turns a sample into a [`CameraPose`], and [`Projection`] plus
//! [`CameraUniform`] carry the pose to the GPU.

pub mod camera_controller;
pub mod camera_utils;
pub mod pointer;

pub use camera_controller::{CameraController, CameraPose};
pub use camera_utils::{CameraUniform, Projection, OPENGL_TO_WGPU_MATRIX};
pub use pointer::{PointerInput, PointerListener, PointerSample, PointerSlot};
