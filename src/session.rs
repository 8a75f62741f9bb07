//! Meditation session
//!
//! A `Session` is the explicit object a front end constructs when a
//! meditation starts and ends when it leaves: it owns the mix engine, the
//! countdown and the ticker that drives it. Ending the session (explicitly or
//! by dropping it) cancels the ticker and disposes every track.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::audio::TrackBackend;
use crate::catalog::{SeasonId, SoundCatalog};
use crate::config::SessionConfig;
use crate::error::{AmbientError, Result};
use crate::mix::{LayerToggle, MixEngine, Volume};
use crate::timer::{SessionTimer, Tick, Ticker, TimerEvent, TimerState};

/// Season track as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonSnapshot {
    pub season_id: SeasonId,
    pub volume: Volume,
    pub effective_volume: f32,
    pub is_playing: bool,
}

/// One active layer as seen by the presentation layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSnapshot {
    pub sound_id: String,
    pub display_name: String,
    pub individual_volume: Volume,
    pub effective_volume: f32,
    pub is_playing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSnapshot {
    pub state: TimerState,
    pub duration_secs: u32,
    pub remaining_secs: u32,
    /// `MM:SS`
    pub remaining: String,
}

/// Everything needed to render session controls
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub session_id: Uuid,
    pub season: Option<SeasonSnapshot>,
    pub layers: Vec<LayerSnapshot>,
    pub master_volume: Volume,
    pub is_muted: bool,
    pub timer: Option<TimerSnapshot>,
}

/// One meditation session
pub struct Session<B: TrackBackend, T: Ticker> {
    id: Uuid,
    started_at: DateTime<Utc>,
    catalog: Arc<SoundCatalog>,
    config: SessionConfig,
    mix: MixEngine<B>,
    /// Created on first season selection
    timer: Option<SessionTimer>,
    ticker: T,
    ended: bool,
}

impl<B: TrackBackend, T: Ticker> Session<B, T> {
    /// Start a session
    ///
    /// # Errors
    /// * `InvalidConfig` - If `config` fails validation
    pub fn new(catalog: Arc<SoundCatalog>, config: SessionConfig, backend: B, ticker: T) -> Result<Self> {
        config.validate()?;

        let mix = MixEngine::with_volumes(
            backend,
            config.master_volume,
            config.season_volume,
            config.layer_volume,
        );
        let id = Uuid::new_v4();
        info!("[SESSION {}] Started", id);

        Ok(Self {
            id,
            started_at: Utc::now(),
            catalog,
            config,
            mix,
            timer: None,
            ticker,
            ended: false,
        })
    }

    // ========================================================================
    // Sound Controls
    // ========================================================================

    /// Switch to `season`, replacing the season track
    ///
    /// Every selection creates a fresh idle countdown with the configured
    /// default duration, cancelling any run in progress. Active layers carry
    /// over.
    pub fn select_season(&mut self, season_id: SeasonId) -> Result<()> {
        let catalog = Arc::clone(&self.catalog);
        let season = catalog
            .season(season_id)
            .ok_or_else(|| AmbientError::UnknownSeason {
                season: season_id.to_string(),
            })?;

        let timer = self.config.timer()?;
        self.ticker.cancel();
        self.timer = Some(timer);

        self.mix.select_season(season);
        Ok(())
    }

    /// Add or remove the layer for `sound_id`
    pub fn toggle_sound(&mut self, sound_id: &str) -> Result<LayerToggle> {
        let catalog = Arc::clone(&self.catalog);
        let sound = catalog
            .sound(sound_id)
            .ok_or_else(|| AmbientError::UnknownSound {
                sound_id: sound_id.to_string(),
            })?;
        Ok(self.mix.toggle_layer(sound))
    }

    pub fn set_layer_volume(&mut self, sound_id: &str, volume: Volume) -> bool {
        self.mix.set_layer_volume(sound_id, volume)
    }

    pub fn toggle_layer_playback(&mut self, sound_id: &str) -> Option<bool> {
        self.mix.toggle_layer_playback(sound_id)
    }

    pub fn set_master_volume(&mut self, volume: Volume) {
        self.mix.set_master_volume(volume);
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.mix.set_muted(muted);
    }

    pub fn play_all(&mut self) {
        self.mix.play_all();
    }

    pub fn stop_all(&mut self) {
        self.mix.stop_all();
    }

    /// Mix one block of every playing track into `out`
    pub fn render(&mut self, out: &mut [f32]) {
        self.mix.render(out);
    }

    // ========================================================================
    // Timer Controls
    // ========================================================================

    /// Start or resume the countdown and its ticker
    ///
    /// No-op before a season is selected, while running, or once completed.
    /// If the ticker cannot start, the countdown is put back in the state it
    /// was in and false is returned.
    pub fn start_timer(&mut self) -> bool {
        let Some(timer) = self.timer.as_mut() else {
            debug!("[SESSION {}] No season selected, timer not started", self.id);
            return false;
        };

        let resuming = timer.is_paused();
        if !timer.start() {
            return false;
        }
        if self.ticker.start() {
            return true;
        }

        warn!("[SESSION {}] Ticker unavailable, countdown not started", self.id);
        if resuming {
            timer.pause();
        } else {
            timer.reset(None);
        }
        false
    }

    pub fn pause_timer(&mut self) -> bool {
        let paused = self.timer.as_mut().map_or(false, SessionTimer::pause);
        if paused {
            self.ticker.cancel();
        }
        paused
    }

    /// Cancel any pending tick and return the countdown to idle
    pub fn reset_timer(&mut self, new_duration: Option<u32>) -> bool {
        self.ticker.cancel();
        self.timer
            .as_mut()
            .map_or(false, |timer| timer.reset(new_duration))
    }

    pub fn set_timer_duration(&mut self, secs: u32) -> bool {
        self.timer
            .as_mut()
            .map_or(false, |timer| timer.set_duration(secs))
    }

    /// Advance the countdown by one second
    ///
    /// Returns the completion event once per run; the ticker is cancelled at
    /// that point.
    pub fn on_tick(&mut self) -> Option<TimerEvent> {
        let event = self.timer.as_mut()?.tick();
        if let Some(TimerEvent::Completed { duration_secs, .. }) = event {
            self.ticker.cancel();
            info!("[SESSION {}] Countdown of {}s finished", self.id, duration_secs);
        }
        event
    }

    /// Advance on a tick delivered by the ticker, ignoring stale ones
    pub fn handle_tick(&mut self, tick: Tick) -> Option<TimerEvent> {
        if !self.ticker.is_current(&tick) {
            debug!("[SESSION {}] Dropping stale tick {}", self.id, tick.generation);
            return None;
        }
        self.on_tick()
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Cancel the ticker and dispose every track
    ///
    /// Safe to call more than once; dropping the session calls it too.
    pub fn end(&mut self) {
        if self.ended {
            return;
        }
        self.ticker.cancel();
        self.mix.teardown();
        self.timer = None;
        self.ended = true;

        let lasted = Utc::now().signed_duration_since(self.started_at);
        info!("[SESSION {}] Ended after {}s", self.id, lasted.num_seconds());
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    // ========================================================================
    // State Queries
    // ========================================================================

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn started_at(&self) -> DateTime<Utc> {
        self.started_at
    }

    pub fn catalog(&self) -> &SoundCatalog {
        &self.catalog
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn mix(&self) -> &MixEngine<B> {
        &self.mix
    }

    pub fn timer(&self) -> Option<&SessionTimer> {
        self.timer.as_ref()
    }

    pub fn ticker(&self) -> &T {
        &self.ticker
    }

    /// Current state for rendering controls
    pub fn snapshot(&self) -> SessionSnapshot {
        let mix_state = self.mix.mix_state();

        let season = self.mix.season_track().map(|track| SeasonSnapshot {
            season_id: track.season_id,
            volume: track.volume,
            effective_volume: self.mix.season_effective_volume().unwrap_or(0.0),
            is_playing: track.is_playing,
        });

        let layers = self
            .mix
            .layers()
            .map(|layer| LayerSnapshot {
                sound_id: layer.sound_id.clone(),
                display_name: self
                    .catalog
                    .sound(&layer.sound_id)
                    .map(|s| s.display_name.clone())
                    .unwrap_or_else(|| layer.sound_id.clone()),
                individual_volume: layer.individual_volume,
                effective_volume: self.mix.layer_effective_volume(&layer.sound_id).unwrap_or(0.0),
                is_playing: layer.is_playing,
            })
            .collect();

        let timer = self.timer.as_ref().map(|timer| TimerSnapshot {
            state: timer.state(),
            duration_secs: timer.duration_secs(),
            remaining_secs: timer.remaining_secs(),
            remaining: timer.format_remaining(),
        });

        SessionSnapshot {
            session_id: self.id,
            season,
            layers,
            master_volume: mix_state.master_volume,
            is_muted: mix_state.is_muted,
            timer,
        }
    }
}

impl<B: TrackBackend, T: Ticker> Drop for Session<B, T> {
    fn drop(&mut self) {
        self.end();
    }
}
