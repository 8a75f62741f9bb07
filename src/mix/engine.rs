//! Mix Engine
//!
//! Owns every live track of a session: one season track plus any number of
//! ambient layers. Every controller it creates is disposed exactly once, on
//! replacement, removal or teardown.
//!
//! Layers are session-scoped and survive season changes; the season track is
//! season-scoped and is replaced whenever a season is selected.

use log::{debug, info};

use super::layer::{ActiveLayer, LayerToggle, SeasonTrack, DEFAULT_LAYER_VOLUME};
use super::volume::{effective_volume, MixState, Volume};
use crate::audio::{AudioTrack, TrackBackend};
use crate::catalog::{Season, Sound};

/// Default volume of the season track
pub const DEFAULT_SEASON_VOLUME: Volume = Volume::MAX;

/// Default master volume
pub const DEFAULT_MASTER_VOLUME: Volume = Volume::new(70);

struct SeasonSlot<T> {
    state: SeasonTrack,
    track: T,
}

struct LayerSlot<T> {
    layer: ActiveLayer,
    track: T,
}

/// Coordinates all concurrently active tracks of one session
pub struct MixEngine<B: TrackBackend> {
    backend: B,
    season: Option<SeasonSlot<B::Track>>,
    /// Insertion order; at most one slot per sound id
    layers: Vec<LayerSlot<B::Track>>,
    mix: MixState,
    season_volume: Volume,
    layer_volume: Volume,
}

impl<B: TrackBackend> MixEngine<B> {
    /// Create an engine with default volumes (master 70, season 100, layer 70)
    pub fn new(backend: B) -> Self {
        Self::with_volumes(
            backend,
            DEFAULT_MASTER_VOLUME,
            DEFAULT_SEASON_VOLUME,
            DEFAULT_LAYER_VOLUME,
        )
    }

    /// Create an engine with custom initial volumes
    ///
    /// # Arguments
    /// * `master` - Initial master volume
    /// * `season_volume` - Individual volume given to every season track
    /// * `layer_volume` - Individual volume given to newly added layers
    pub fn with_volumes(backend: B, master: Volume, season_volume: Volume, layer_volume: Volume) -> Self {
        Self {
            backend,
            season: None,
            layers: Vec::new(),
            mix: MixState::new(master),
            season_volume,
            layer_volume,
        }
    }

    // ========================================================================
    // Season Track
    // ========================================================================

    /// Replace the season track with one playing `season.audio_sound_ref`
    ///
    /// Active layers are left untouched.
    pub fn select_season(&mut self, season: &Season) {
        if let Some(mut old) = self.season.take() {
            debug!("[MIX] Replacing season track {}", old.state.season_id);
            old.track.pause();
            old.track.dispose();
        }

        let state = SeasonTrack {
            season_id: season.id,
            volume: self.season_volume,
            is_playing: true,
        };
        let mut track = self.backend.create_track();
        track.load(&season.audio_sound_ref);
        track.set_volume(effective_volume(state.volume, &self.mix));
        track.play();

        info!("[MIX] Season '{}' selected ({})", season.id, season.audio_sound_ref);
        self.season = Some(SeasonSlot { state, track });
    }

    /// Change the season track's individual volume
    ///
    /// Returns false if no season is selected.
    pub fn set_season_volume(&mut self, volume: Volume) -> bool {
        let mix = self.mix;
        match self.season.as_mut() {
            Some(slot) => {
                slot.state.volume = volume;
                slot.track.set_volume(effective_volume(volume, &mix));
                true
            }
            None => false,
        }
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Add `sound` as a playing layer, or remove it if already active
    pub fn toggle_layer(&mut self, sound: &Sound) -> LayerToggle {
        if let Some(pos) = self.position(&sound.id) {
            let mut slot = self.layers.remove(pos);
            slot.track.pause();
            slot.track.dispose();
            debug!("[MIX] Layer '{}' removed", sound.id);
            return LayerToggle::Removed;
        }

        let layer = ActiveLayer {
            sound_id: sound.id.clone(),
            individual_volume: self.layer_volume,
            is_playing: true,
        };
        let mut track = self.backend.create_track();
        track.load(&sound.source_ref);
        track.set_volume(effective_volume(layer.individual_volume, &self.mix));
        track.play();

        debug!("[MIX] Layer '{}' added", sound.id);
        self.layers.push(LayerSlot { layer, track });
        LayerToggle::Added
    }

    /// Set a layer's individual volume and reapply its effective volume
    ///
    /// Returns false (no-op) if the layer is not active.
    pub fn set_layer_volume(&mut self, sound_id: &str, volume: Volume) -> bool {
        let mix = self.mix;
        match self.slot_mut(sound_id) {
            Some(slot) => {
                slot.layer.individual_volume = volume;
                slot.track.set_volume(effective_volume(volume, &mix));
                true
            }
            None => {
                debug!("[MIX] Volume change for inactive layer '{}' ignored", sound_id);
                false
            }
        }
    }

    /// Flip a layer between playing and paused
    ///
    /// Returns the new playing flag, or None if the layer is not active.
    pub fn toggle_layer_playback(&mut self, sound_id: &str) -> Option<bool> {
        let slot = self.slot_mut(sound_id)?;
        slot.layer.is_playing = !slot.layer.is_playing;
        if slot.layer.is_playing {
            slot.track.play();
        } else {
            slot.track.pause();
        }
        Some(slot.layer.is_playing)
    }

    // ========================================================================
    // Master Controls
    // ========================================================================

    pub fn set_master_volume(&mut self, volume: Volume) {
        self.mix.master_volume = volume;
        self.apply_volumes();
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.mix.is_muted = muted;
        self.apply_volumes();
    }

    /// Resume the season track and every layer
    pub fn play_all(&mut self) {
        if let Some(slot) = self.season.as_mut() {
            slot.state.is_playing = true;
            slot.track.play();
        }
        for slot in &mut self.layers {
            slot.layer.is_playing = true;
            slot.track.play();
        }
        debug!("[MIX] Play all");
    }

    /// Pause the season track and every layer
    pub fn stop_all(&mut self) {
        if let Some(slot) = self.season.as_mut() {
            slot.state.is_playing = false;
            slot.track.pause();
        }
        for slot in &mut self.layers {
            slot.layer.is_playing = false;
            slot.track.pause();
        }
        debug!("[MIX] Stop all");
    }

    /// Dispose every controller and clear all state
    pub fn teardown(&mut self) {
        let had_tracks = self.season.is_some() || !self.layers.is_empty();

        if let Some(mut slot) = self.season.take() {
            slot.track.pause();
            slot.track.dispose();
        }
        for mut slot in self.layers.drain(..) {
            slot.track.pause();
            slot.track.dispose();
        }

        if had_tracks {
            info!("[MIX] Torn down");
        }
    }

    /// Sum every playing track into `out`
    pub fn render(&mut self, out: &mut [f32]) {
        if let Some(slot) = self.season.as_mut() {
            slot.track.render(out);
        }
        for slot in &mut self.layers {
            slot.track.render(out);
        }
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn mix_state(&self) -> MixState {
        self.mix
    }

    pub fn season_track(&self) -> Option<&SeasonTrack> {
        self.season.as_ref().map(|slot| &slot.state)
    }

    pub fn season_controller(&self) -> Option<&B::Track> {
        self.season.as_ref().map(|slot| &slot.track)
    }

    /// Effective volume of the season track, computed now
    pub fn season_effective_volume(&self) -> Option<f32> {
        self.season
            .as_ref()
            .map(|slot| effective_volume(slot.state.volume, &self.mix))
    }

    /// Active layers in the order they were added
    pub fn layers(&self) -> impl Iterator<Item = &ActiveLayer> + '_ {
        self.layers.iter().map(|slot| &slot.layer)
    }

    pub fn layer(&self, sound_id: &str) -> Option<&ActiveLayer> {
        self.layers
            .iter()
            .find(|slot| slot.layer.sound_id == sound_id)
            .map(|slot| &slot.layer)
    }

    pub fn layer_controller(&self, sound_id: &str) -> Option<&B::Track> {
        self.layers
            .iter()
            .find(|slot| slot.layer.sound_id == sound_id)
            .map(|slot| &slot.track)
    }

    /// Effective volume of a layer, computed now
    pub fn layer_effective_volume(&self, sound_id: &str) -> Option<f32> {
        self.layer(sound_id)
            .map(|layer| effective_volume(layer.individual_volume, &self.mix))
    }

    pub fn has_layer(&self, sound_id: &str) -> bool {
        self.position(sound_id).is_some()
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    // ========================================================================
    // Internal
    // ========================================================================

    fn position(&self, sound_id: &str) -> Option<usize> {
        self.layers.iter().position(|slot| slot.layer.sound_id == sound_id)
    }

    fn slot_mut(&mut self, sound_id: &str) -> Option<&mut LayerSlot<B::Track>> {
        self.layers.iter_mut().find(|slot| slot.layer.sound_id == sound_id)
    }

    /// Reapply effective volume to every loaded controller, paused ones included
    fn apply_volumes(&mut self) {
        let mix = self.mix;
        if let Some(slot) = self.season.as_mut() {
            slot.track.set_volume(effective_volume(slot.state.volume, &mix));
        }
        for slot in &mut self.layers {
            slot.track.set_volume(effective_volume(slot.layer.individual_volume, &mix));
        }
    }
}

impl<B: TrackBackend> Drop for MixEngine<B> {
    fn drop(&mut self) {
        self.teardown();
    }
}
