//! Error types for asset loading.
//!
//! Everything here degrades gracefully at the call site: a missing room
//! model leaves the scene without interactables, a missing bird model falls
//! back to procedural geometry, missing music disables the toggle.

use std::path::PathBuf;

/// Failure while bringing an external asset into the scene.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse model {path}: {source}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("failed to decode audio {path}: {source}")]
    Audio {
        path: PathBuf,
        #[source]
        source: rodio::decoder::DecoderError,
    },

    #[error("no audio output device available: {0}")]
    AudioDevice(#[from] rodio::StreamError),

    #[error("failed to open audio sink: {0}")]
    AudioSink(#[from] rodio::PlayError),
}
