//! Mix Engine Module
//!
//! - Volume math (`Volume`, `MixState`, effective volume)
//! - Track state (`ActiveLayer`, `SeasonTrack`)
//! - `MixEngine` coordinating the season track and ambient layers

pub mod engine;
pub mod layer;
pub mod volume;

pub use engine::{MixEngine, DEFAULT_MASTER_VOLUME, DEFAULT_SEASON_VOLUME};
pub use layer::{ActiveLayer, LayerToggle, SeasonTrack, DEFAULT_LAYER_VOLUME};
pub use volume::{effective_volume, MixState, Volume};
