//! Background music playback.
//!
//! A single looping track behind a play/pause toggle. Construction fails
//! when the file or an output device is missing; the app keeps running with
//! the toggle disabled in that case.

use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use log::info;
use rodio::{Decoder, OutputStream, OutputStreamHandle, Sink, Source};

use crate::error::AssetError;

const MUSIC_VOLUME: f32 = 0.3;

pub struct MusicPlayer {
    // Held alive for the duration of playback; dropping it kills the sink.
    _stream: OutputStream,
    _handle: OutputStreamHandle,
    sink: Sink,
    playing: bool,
}

impl MusicPlayer {
    /// Opens the default output device and queues `path` on an infinite
    /// loop, paused.
    pub fn new(path: &str) -> Result<Self, AssetError> {
        let (stream, handle) = OutputStream::try_default()?;
        let sink = Sink::try_new(&handle)?;

        let file = File::open(Path::new(path)).map_err(|source| AssetError::Io {
            path: path.into(),
            source,
        })?;
        let decoder = Decoder::new(BufReader::new(file)).map_err(|source| AssetError::Audio {
            path: path.into(),
            source,
        })?;

        sink.append(decoder.repeat_infinite());
        sink.set_volume(MUSIC_VOLUME);
        sink.pause();

        info!("Music ready: {path}");
        Ok(Self {
            _stream: stream,
            _handle: handle,
            sink,
            playing: false,
        })
    }

    /// Flips between playing and paused, returning the new state.
    pub fn toggle(&mut self) -> bool {
        if self.playing {
            self.sink.pause();
        } else {
            self.sink.play();
        }
        self.playing = !self.playing;
        self.playing
    }

    pub fn is_playing(&self) -> bool {
        self.playing
    }
}
