//! 2D overlay: imgui integration and the portfolio content panels.

pub mod manager;
pub mod panels;

pub use manager::UiManager;
pub use panels::{PanelAction, PanelController};
