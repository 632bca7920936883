//! # Showroom Prelude
//!
//! Brings the commonly used types into scope:
//!
//! ```no_run
//! use showroom::prelude::*;
//!
//! fn main() -> anyhow::Result<()> {
//!     showroom::default().run()
//! }
//! ```

// Application
pub use crate::app::ShowroomApp;
pub use crate::config::AppConfig;
pub use crate::default;

// Scene and camera
pub use crate::gfx::camera::{CameraManager, CameraPose, OrbitCamera};
pub use crate::gfx::scene::{Scene, SceneNode};

// Interaction core
pub use crate::content::SectionId;
pub use crate::interaction::{
    CameraSequencer, InteractableRegistry, InteractionSession, SequencerEvent, SequencerPhase,
};

// UI
pub use crate::ui::{PanelController, UiManager};
