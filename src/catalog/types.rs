//! Catalog data types
//!
//! Sounds, categories and seasons are immutable once loaded.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::AmbientError;

/// The four seasons a session can be themed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonId {
    Spring,
    Summer,
    Autumn,
    Winter,
}

impl SeasonId {
    /// All seasons in calendar order
    pub const ALL: [SeasonId; 4] = [
        SeasonId::Spring,
        SeasonId::Summer,
        SeasonId::Autumn,
        SeasonId::Winter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            SeasonId::Spring => "spring",
            SeasonId::Summer => "summer",
            SeasonId::Autumn => "autumn",
            SeasonId::Winter => "winter",
        }
    }
}

impl fmt::Display for SeasonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeasonId {
    type Err = AmbientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "spring" => Ok(SeasonId::Spring),
            "summer" => Ok(SeasonId::Summer),
            "autumn" | "fall" => Ok(SeasonId::Autumn),
            "winter" => Ok(SeasonId::Winter),
            _ => Err(AmbientError::UnknownSeason {
                season: s.to_string(),
            }),
        }
    }
}

/// A loopable ambient sound
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sound {
    /// Unique identifier
    pub id: String,
    pub display_name: String,
    /// Opaque reference handed unmodified to the audio backend
    pub source_ref: String,
    pub category_id: String,
    pub season_id: SeasonId,
    /// Display only
    #[serde(default)]
    pub emoji: String,
}

/// Grouping of sounds for browsing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundCategory {
    pub id: String,
    pub display_name: String,
    #[serde(default)]
    pub color_hint: String,
}

/// A season theme with its background music
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Season {
    pub id: SeasonId,
    pub display_name: String,
    #[serde(default)]
    pub background_asset_ref: String,
    /// Source of the looping season track
    pub audio_sound_ref: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_season_id_parse() {
        assert_eq!("winter".parse::<SeasonId>().unwrap(), SeasonId::Winter);
        assert_eq!(" Spring ".parse::<SeasonId>().unwrap(), SeasonId::Spring);
        assert_eq!("fall".parse::<SeasonId>().unwrap(), SeasonId::Autumn);
    }

    #[test]
    fn test_season_id_parse_unknown() {
        let err = "monsoon".parse::<SeasonId>().unwrap_err();
        assert_eq!(err.error_code(), "UNKNOWN_SEASON");
    }

    #[test]
    fn test_season_id_serde_lowercase() {
        let json = serde_json::to_string(&SeasonId::Autumn).unwrap();
        assert_eq!(json, "\"autumn\"");
        let back: SeasonId = serde_json::from_str("\"summer\"").unwrap();
        assert_eq!(back, SeasonId::Summer);
    }

    #[test]
    fn test_season_id_display() {
        for season in SeasonId::ALL {
            assert_eq!(season.to_string(), season.as_str());
        }
    }
}
