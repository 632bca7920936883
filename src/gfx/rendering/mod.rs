//! Rendering pipeline: wgpu surface management, shadow pass, main lit pass,
//! and the UI overlay hook.

pub mod render_engine;

pub use render_engine::RenderEngine;
