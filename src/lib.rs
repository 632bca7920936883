// src/lib.rs
//! Showroom
//!
//! An interactive 3D portfolio room built on wgpu and winit: orbit the
//! scene, click the PC, TV, bookshelf or posters, and the camera flies in
//! while the matching content panel opens.

pub mod app;
pub mod audio;
pub mod config;
pub mod content;
pub mod environment;
pub mod error;
pub mod gfx;
pub mod interaction;
pub mod prelude;
pub mod ui;
pub mod wgpu_utils;

// Re-export main types for convenience
pub use app::ShowroomApp;

/// Creates a Showroom application with configuration loaded from disk
pub fn default() -> ShowroomApp {
    pollster::block_on(ShowroomApp::new(config::AppConfig::load()))
}
