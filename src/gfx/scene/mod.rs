//! # Scene Graph
//!
//! The tree of nodes produced by one build of the farm scene.
//!
//! - [`SceneGraph`] - root node plus background colour, with traversal helpers
//! - [`SceneNode`] - group, mesh or light node with a local transform
//! - [`Drawable`] - geometry plus one or more materials, each with a GPU handle
//! - [`Vertex3D`] - GPU vertex layout

pub mod node;
pub mod scene;
pub mod vertex;

pub use node::{Drawable, Light, MaterialSet, MaterialSlot, NodeKind, NodeRole, SceneNode};
pub use scene::{SceneGraph, SceneStatistics};
pub use vertex::Vertex3D;
