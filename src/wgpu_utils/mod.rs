//! Small wgpu helpers shared by the render engine and the material cache

pub mod binding_types;
pub mod uniform_buffer;

pub use uniform_buffer::UniformBuffer;
