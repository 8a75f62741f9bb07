//! Volume math
//!
//! `effective = muted ? 0 : min(1, individual/100 * master/100)`, recomputed
//! on every change and never cached.

use serde::{Deserialize, Serialize};

/// Integer volume percentage, always within `0..=100`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(from = "u16", into = "u8")]
pub struct Volume(u8);

impl Volume {
    pub const MAX: Volume = Volume(100);
    pub const MUTE: Volume = Volume(0);

    /// Create a volume, clamping anything above 100
    pub const fn new(percent: u16) -> Self {
        if percent > 100 {
            Volume(100)
        } else {
            Volume(percent as u8)
        }
    }

    pub fn get(self) -> u8 {
        self.0
    }

    /// As a `0.0..=1.0` fraction
    pub fn fraction(self) -> f32 {
        self.0 as f32 / 100.0
    }
}

impl Default for Volume {
    fn default() -> Self {
        Volume::MAX
    }
}

impl From<u16> for Volume {
    fn from(percent: u16) -> Self {
        Volume::new(percent)
    }
}

impl From<Volume> for u8 {
    fn from(volume: Volume) -> Self {
        volume.0
    }
}

/// Session-wide master volume and mute flag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MixState {
    pub master_volume: Volume,
    pub is_muted: bool,
}

impl MixState {
    pub fn new(master_volume: Volume) -> Self {
        Self {
            master_volume,
            is_muted: false,
        }
    }
}

impl Default for MixState {
    fn default() -> Self {
        Self::new(Volume::new(70))
    }
}

/// Volume actually applied to a track
pub fn effective_volume(individual: Volume, mix: &MixState) -> f32 {
    if mix.is_muted {
        return 0.0;
    }
    (individual.fraction() * mix.master_volume.fraction()).min(1.0)
}
