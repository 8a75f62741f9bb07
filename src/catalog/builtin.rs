//! Builtin sound catalog

use std::collections::BTreeMap;

use super::types::{Season, SeasonId, Sound, SoundCategory};
use super::SoundCatalog;

// (id, display name, color hint)
const CATEGORIES: &[(&str, &str, &str)] = &[
    ("nature", "Nature", "#4caf50"),
    ("water", "Water", "#2196f3"),
    ("weather", "Weather", "#90a4ae"),
    ("cozy", "Cozy", "#ff7043"),
];

// (id, display name, source, category, season, emoji)
const SOUNDS: &[(&str, &str, &str, &str, SeasonId, &str)] = &[
    ("birds", "Birds", "/sounds/birds.mp3", "nature", SeasonId::Spring, "🐦"),
    ("forest", "Forest", "/sounds/forest.mp3", "nature", SeasonId::Summer, "🌲"),
    ("crickets", "Crickets", "/sounds/crickets.mp3", "nature", SeasonId::Summer, "🦗"),
    ("leaves", "Rustling Leaves", "/sounds/leaves.mp3", "nature", SeasonId::Autumn, "🍂"),
    ("rain", "Rain", "/sounds/rain.mp3", "weather", SeasonId::Spring, "🌧️"),
    ("thunder", "Thunderstorm", "/sounds/thunder.mp3", "weather", SeasonId::Summer, "⛈️"),
    ("wind", "Wind", "/sounds/wind.mp3", "weather", SeasonId::Autumn, "🌬️"),
    ("snow", "Snowfall", "/sounds/snow.mp3", "weather", SeasonId::Winter, "❄️"),
    ("ocean", "Ocean Waves", "/sounds/ocean.mp3", "water", SeasonId::Summer, "🌊"),
    ("river", "River", "/sounds/river.mp3", "water", SeasonId::Spring, "🏞️"),
    ("waterfall", "Waterfall", "/sounds/waterfall.mp3", "water", SeasonId::Summer, "💧"),
    ("fire", "Fireplace", "/sounds/fire.mp3", "cozy", SeasonId::Winter, "🔥"),
    ("cafe", "Café", "/sounds/cafe.mp3", "cozy", SeasonId::Autumn, "☕"),
];

// (id, display name, background, season track)
const SEASONS: &[(SeasonId, &str, &str, &str)] = &[
    (SeasonId::Spring, "Spring", "/bahor.jpg", "/bahor.mp3"),
    (SeasonId::Summer, "Summer", "/yoz.jpg", "/yoz.mp3"),
    (SeasonId::Autumn, "Autumn", "/kuz.jpg", "/kuz.mp3"),
    (SeasonId::Winter, "Winter", "/qish.jpg", "/qish.mp3"),
];

// Hand-picked; not derived from each sound's own season.
const CURATED: &[(SeasonId, &[&str])] = &[
    (SeasonId::Spring, &["birds", "rain", "river", "wind"]),
    (SeasonId::Summer, &["ocean", "crickets", "thunder", "forest", "waterfall"]),
    (SeasonId::Autumn, &["leaves", "wind", "rain", "cafe", "fire"]),
    (SeasonId::Winter, &["fire", "snow", "wind", "cafe"]),
];

pub(super) fn builtin_catalog() -> SoundCatalog {
    let categories = CATEGORIES
        .iter()
        .map(|(id, name, color)| SoundCategory {
            id: id.to_string(),
            display_name: name.to_string(),
            color_hint: color.to_string(),
        })
        .collect();

    let sounds = SOUNDS
        .iter()
        .map(|(id, name, source, category, season, emoji)| Sound {
            id: id.to_string(),
            display_name: name.to_string(),
            source_ref: source.to_string(),
            category_id: category.to_string(),
            season_id: *season,
            emoji: emoji.to_string(),
        })
        .collect();

    let seasons = SEASONS
        .iter()
        .map(|(id, name, background, audio)| Season {
            id: *id,
            display_name: name.to_string(),
            background_asset_ref: background.to_string(),
            audio_sound_ref: audio.to_string(),
        })
        .collect();

    let curated: BTreeMap<SeasonId, Vec<String>> = CURATED
        .iter()
        .map(|(season, ids)| (*season, ids.iter().map(|id| id.to_string()).collect()))
        .collect();

    SoundCatalog {
        categories,
        sounds,
        seasons,
        curated,
    }
}
