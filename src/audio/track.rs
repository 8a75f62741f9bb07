//! Audio Track Controller trait
//!
//! Base traits for looping audio resources. The mix engine only ever talks
//! to these traits, never to a concrete audio API.

/// One loop-capable audio resource bound to a source reference
///
/// Implementations must tolerate every call in any order: `play()` on a track
/// whose load failed is a no-op, and calls after `dispose()` do nothing.
pub trait AudioTrack {
    /// Allocate the underlying resource for `source_ref`, loop it and preload
    ///
    /// Load failures are logged and leave the track silent; they are never
    /// returned to the caller.
    fn load(&mut self, source_ref: &str);

    /// Start or resume playback at the current volume
    fn play(&mut self);

    /// Pause without resetting position
    fn pause(&mut self);

    /// Apply a volume in `0.0..=1.0`, effective immediately even while paused
    fn set_volume(&mut self, volume: f32);

    /// Stop playback and release the resource
    fn dispose(&mut self);

    /// Whether the resource loaded successfully and has not been disposed
    fn is_loaded(&self) -> bool;

    /// Whether the track is currently producing audio
    fn is_playing(&self) -> bool;

    /// Last applied volume
    fn volume(&self) -> f32;

    /// Mix this track's output into `out`
    ///
    /// Backends without an offline render path leave `out` untouched.
    fn render(&mut self, _out: &mut [f32]) {}
}

/// Creates fresh, unloaded tracks
pub trait TrackBackend {
    type Track: AudioTrack;

    fn create_track(&mut self) -> Self::Track;
}
