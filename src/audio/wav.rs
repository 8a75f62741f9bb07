//! WAV-backed tracks
//!
//! `WavTrack` decodes its asset fully on `load()` and renders it in a loop,
//! keeping its position across pause/play.

use std::path::{Path, PathBuf};

use log::{debug, warn};
use uuid::Uuid;

use super::io::{decode_loop, DEFAULT_SAMPLE_RATE};
use super::track::{AudioTrack, TrackBackend};

/// Resolve a source reference against an asset root
///
/// Leading slashes are stripped so web-style refs (`/qish.mp3`) stay inside
/// the root.
pub fn resolve_source(asset_root: &Path, source_ref: &str) -> PathBuf {
    asset_root.join(source_ref.trim_start_matches('/'))
}

/// Looping track decoded from a WAV asset
#[derive(Debug)]
pub struct WavTrack {
    id: Uuid,
    asset_root: PathBuf,
    sample_rate: u32,
    source_ref: Option<String>,
    samples: Option<Vec<f32>>,
    cursor: usize,
    volume: f32,
    playing: bool,
    disposed: bool,
}

impl WavTrack {
    pub fn new(asset_root: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            asset_root: asset_root.into(),
            sample_rate,
            source_ref: None,
            samples: None,
            cursor: 0,
            volume: 1.0,
            playing: false,
            disposed: false,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn source_ref(&self) -> Option<&str> {
        self.source_ref.as_deref()
    }

    /// Current read position in samples
    pub fn position(&self) -> usize {
        self.cursor
    }

    /// Length of the decoded loop in samples (0 if not loaded)
    pub fn loop_len(&self) -> usize {
        self.samples.as_ref().map_or(0, Vec::len)
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl AudioTrack for WavTrack {
    fn load(&mut self, source_ref: &str) {
        if self.disposed {
            return;
        }

        self.source_ref = Some(source_ref.to_string());
        self.cursor = 0;

        let path = resolve_source(&self.asset_root, source_ref);
        match decode_loop(&path, self.sample_rate) {
            Ok(samples) => {
                debug!(
                    "[TRACK {}] Loaded '{}' ({} samples)",
                    self.id,
                    source_ref,
                    samples.len()
                );
                self.samples = Some(samples);
            }
            Err(e) => {
                warn!(
                    "[TRACK {}] Could not load '{}' ({}): {}; track stays silent",
                    self.id,
                    source_ref,
                    e.error_code(),
                    e
                );
                self.samples = None;
            }
        }
    }

    fn play(&mut self) {
        if self.samples.is_none() || self.disposed {
            debug!("[TRACK {}] Play ignored, nothing loaded", self.id);
            return;
        }
        self.playing = true;
    }

    fn pause(&mut self) {
        self.playing = false;
    }

    fn set_volume(&mut self, volume: f32) {
        self.volume = volume.clamp(0.0, 1.0);
    }

    fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.playing = false;
        self.samples = None;
        self.disposed = true;
        debug!("[TRACK {}] Disposed", self.id);
    }

    fn is_loaded(&self) -> bool {
        self.samples.is_some()
    }

    fn is_playing(&self) -> bool {
        self.playing
    }

    fn volume(&self) -> f32 {
        self.volume
    }

    fn render(&mut self, out: &mut [f32]) {
        if !self.playing {
            return;
        }
        let Some(samples) = self.samples.as_ref() else {
            return;
        };

        for sample in out.iter_mut() {
            *sample += samples[self.cursor] * self.volume;
            self.cursor = (self.cursor + 1) % samples.len();
        }
    }
}

/// Creates `WavTrack`s resolving refs under one asset root
#[derive(Debug, Clone)]
pub struct WavBackend {
    asset_root: PathBuf,
    sample_rate: u32,
}

impl WavBackend {
    pub fn new(asset_root: impl Into<PathBuf>, sample_rate: u32) -> Self {
        Self {
            asset_root: asset_root.into(),
            sample_rate,
        }
    }

    pub fn asset_root(&self) -> &Path {
        &self.asset_root
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }
}

impl Default for WavBackend {
    fn default() -> Self {
        Self::new("assets", DEFAULT_SAMPLE_RATE)
    }
}

impl TrackBackend for WavBackend {
    type Track = WavTrack;

    fn create_track(&mut self) -> WavTrack {
        WavTrack::new(self.asset_root.clone(), self.sample_rate)
    }
}
