//! Track state owned by the mix engine

use serde::{Deserialize, Serialize};

use super::volume::Volume;
use crate::catalog::SeasonId;

/// Default individual volume for a freshly added layer
pub const DEFAULT_LAYER_VOLUME: Volume = Volume::new(70);

/// A user-added ambient sound layered over the season track
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveLayer {
    pub sound_id: String,
    pub individual_volume: Volume,
    pub is_playing: bool,
}

/// The single looping track of the selected season
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeasonTrack {
    pub season_id: SeasonId,
    pub volume: Volume,
    pub is_playing: bool,
}

/// Outcome of `MixEngine::toggle_layer`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayerToggle {
    Added,
    Removed,
}
