//! # Graphics Module
//!
//! Everything the showroom needs to draw and query the 3D scene:
//!
//! - **Camera** ([`camera`]) - orbit camera with drag/zoom/pan controls
//! - **Rendering** ([`rendering`]) - wgpu render engine with shadow mapping
//! - **Scene** ([`scene`]) - named node arena with parent links and meshes
//! - **Picking** ([`picking`]) - mouse-ray intersection against node AABBs
//! - **Geometry** ([`geometry`]) - procedural shapes for the environment
//! - **Resources** ([`resources`]) - materials, textures, global uniforms

pub mod camera;
pub mod geometry;
pub mod picking;
pub mod rendering;
pub mod resources;
pub mod scene;

// Re-export commonly used types
pub use camera::orbit_camera::{CameraPose, OrbitCamera};
pub use rendering::render_engine::RenderEngine;
