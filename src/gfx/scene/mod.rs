//! # Scene Management Module
//!
//! The scene is a flat arena of [`SceneNode`]s with parent indices forming
//! the ownership chain: loaded models become a group node with one child per
//! sub-mesh, so clicking any part of a composite object can resolve through
//! its group's name. World transforms compose through the chain.

pub mod node;
pub mod scene;
pub mod vertex;

// Re-export main types
pub use node::{DrawNode, Mesh, SceneNode};
pub use scene::Scene;
pub use vertex::Vertex3D;
