//! Sound Catalog
//!
//! Read-only lookups over the available sounds, categories and seasons.
//! Lookups never fail: an unknown category or a season without a curated
//! list yields an empty sequence.

mod builtin;
mod types;

pub use types::{Season, SeasonId, Sound, SoundCategory};

use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::{AmbientError, Result};

/// Static catalog of sounds, categories and seasons
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SoundCatalog {
    #[serde(default)]
    categories: Vec<SoundCategory>,
    #[serde(default)]
    sounds: Vec<Sound>,
    #[serde(default)]
    seasons: Vec<Season>,
    /// Per-season allow-list of sound ids, in display order
    #[serde(default)]
    curated: BTreeMap<SeasonId, Vec<String>>,
}

impl Default for SoundCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

impl SoundCatalog {
    /// The catalog shipped with the crate
    pub fn builtin() -> Self {
        builtin::builtin_catalog()
    }

    /// Parse a catalog from its JSON representation
    pub fn from_json_str(json: &str) -> Result<Self> {
        let catalog: SoundCatalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(AmbientError::FileNotFound {
                path: path.to_path_buf(),
            });
        }

        let content = fs::read_to_string(path).map_err(|e| AmbientError::FileReadError {
            path: path.to_path_buf(),
            source: e,
        })?;

        let catalog = Self::from_json_str(&content)?;
        debug!(
            "Loaded catalog from {}: {} sounds, {} seasons",
            path.display(),
            catalog.sounds.len(),
            catalog.seasons.len()
        );
        Ok(catalog)
    }

    /// Serialize the catalog to pretty JSON
    pub fn to_json_string(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    fn validate(&self) -> Result<()> {
        if let Some(id) = first_duplicate(self.sounds.iter().map(|s| s.id.as_str())) {
            return Err(duplicate(format!("sound id '{}'", id)));
        }
        if let Some(id) = first_duplicate(self.categories.iter().map(|c| c.id.as_str())) {
            return Err(duplicate(format!("category id '{}'", id)));
        }
        if let Some(id) = first_duplicate(self.seasons.iter().map(|s| s.id)) {
            return Err(duplicate(format!("season id '{}'", id)));
        }
        for (season, ids) in &self.curated {
            if let Some(id) = first_duplicate(ids.iter().map(String::as_str)) {
                return Err(duplicate(format!("curated sound '{}' for {}", id, season)));
            }
        }
        Ok(())
    }

    /// All sounds in catalog order
    pub fn sounds(&self) -> &[Sound] {
        &self.sounds
    }

    /// Sounds belonging to a category
    pub fn sounds_in_category(&self, category_id: &str) -> Vec<&Sound> {
        self.sounds
            .iter()
            .filter(|s| s.category_id == category_id)
            .collect()
    }

    /// Sounds hand-picked for a season, in curated order
    ///
    /// Curated lists may include sounds whose own season differs. Ids in the
    /// allow-list that are not in the catalog are skipped.
    pub fn curated_for(&self, season: SeasonId) -> Vec<&Sound> {
        self.curated
            .get(&season)
            .map(|ids| ids.iter().filter_map(|id| self.sound(id)).collect())
            .unwrap_or_default()
    }

    pub fn sound(&self, id: &str) -> Option<&Sound> {
        self.sounds.iter().find(|s| s.id == id)
    }

    pub fn categories(&self) -> &[SoundCategory] {
        &self.categories
    }

    pub fn category(&self, id: &str) -> Option<&SoundCategory> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn seasons(&self) -> &[Season] {
        &self.seasons
    }

    pub fn season(&self, id: SeasonId) -> Option<&Season> {
        self.seasons.iter().find(|s| s.id == id)
    }
}

fn first_duplicate<T: Ord + Copy>(items: impl IntoIterator<Item = T>) -> Option<T> {
    let mut seen = BTreeSet::new();
    items.into_iter().find(|item| !seen.insert(*item))
}

fn duplicate(what: String) -> AmbientError {
    AmbientError::InvalidConfig {
        reason: format!("duplicate {} in catalog", what),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_has_all_seasons() {
        let catalog = SoundCatalog::builtin();
        for season in SeasonId::ALL {
            assert!(catalog.season(season).is_some(), "missing {}", season);
            assert!(!catalog.curated_for(season).is_empty());
        }
    }

    #[test]
    fn test_winter_season_track() {
        let catalog = SoundCatalog::builtin();
        let winter = catalog.season(SeasonId::Winter).unwrap();
        assert_eq!(winter.audio_sound_ref, "/qish.mp3");
    }

    #[test]
    fn test_builtin_sound_ids_unique() {
        let catalog = SoundCatalog::builtin();
        assert!(catalog.validate().is_ok());
        let mut ids: Vec<_> = catalog.sounds().iter().map(|s| s.id.as_str()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), catalog.sounds().len());
    }

    #[test]
    fn test_filter_by_category() {
        let catalog = SoundCatalog::builtin();
        let water = catalog.sounds_in_category("water");
        assert!(!water.is_empty());
        assert!(water.iter().all(|s| s.category_id == "water"));
    }

    #[test]
    fn test_unknown_category_is_empty() {
        let catalog = SoundCatalog::builtin();
        assert!(catalog.sounds_in_category("space").is_empty());
        assert!(catalog.category("space").is_none());
    }

    #[test]
    fn test_curated_is_allow_list_not_filter() {
        let catalog = SoundCatalog::builtin();
        let autumn = catalog.curated_for(SeasonId::Autumn);
        // Rain is a spring sound but curated for autumn
        let rain = autumn.iter().find(|s| s.id == "rain").unwrap();
        assert_eq!(rain.season_id, SeasonId::Spring);
    }

    #[test]
    fn test_missing_curated_season_is_empty() {
        let json = r#"{
            "sounds": [{"id": "fire", "display_name": "Fire", "source_ref": "fire.wav",
                        "category_id": "cozy", "season_id": "winter"}],
            "curated": {"winter": ["fire", "ghost"]}
        }"#;
        let catalog = SoundCatalog::from_json_str(json).unwrap();
        assert!(catalog.curated_for(SeasonId::Summer).is_empty());
        let winter: Vec<_> = catalog.curated_for(SeasonId::Winter).iter().map(|s| s.id.clone()).collect();
        assert_eq!(winter, vec!["fire".to_string()]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let json = r#"{
            "sounds": [
                {"id": "fire", "display_name": "Fire", "source_ref": "a.wav", "category_id": "c", "season_id": "winter"},
                {"id": "fire", "display_name": "Fire 2", "source_ref": "b.wav", "category_id": "c", "season_id": "winter"}
            ]
        }"#;
        let err = SoundCatalog::from_json_str(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
    }

    #[test]
    fn test_duplicate_season_rejected() {
        let json = r#"{
            "seasons": [
                {"id": "winter", "display_name": "Winter", "audio_sound_ref": "/qish.wav"},
                {"id": "winter", "display_name": "Deep Winter", "audio_sound_ref": "/qish2.wav"}
            ]
        }"#;
        let err = SoundCatalog::from_json_str(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("season id 'winter'"));
    }

    #[test]
    fn test_repeated_curated_entry_rejected() {
        let json = r#"{
            "sounds": [
                {"id": "fire", "display_name": "Fire", "source_ref": "a.wav", "category_id": "cozy", "season_id": "winter"}
            ],
            "curated": {"winter": ["fire", "fire"]}
        }"#;
        let err = SoundCatalog::from_json_str(json).unwrap_err();
        assert_eq!(err.error_code(), "INVALID_CONFIG");
        assert!(err.to_string().contains("curated sound 'fire' for winter"));
    }

    #[test]
    fn test_json_roundtrip_preserves_curation() {
        let catalog = SoundCatalog::builtin();
        let json = catalog.to_json_string().unwrap();
        let back = SoundCatalog::from_json_str(&json).unwrap();
        assert_eq!(back.curated_for(SeasonId::Winter), catalog.curated_for(SeasonId::Winter));
    }

    #[test]
    fn test_missing_file() {
        let err = SoundCatalog::from_json_file(Path::new("/nonexistent/catalog.json")).unwrap_err();
        assert_eq!(err.error_code(), "FILE_NOT_FOUND");
    }
}
