//! WAV Backend Tests
//!
//! Sessions rendering real WAV assets from a temporary asset root.

use std::path::Path;
use std::sync::Arc;

use ambient::audio::{decode_loop, write_mixdown, AudioTrack, WavBackend};
use ambient::catalog::{SeasonId, SoundCatalog};
use ambient::mix::{MixEngine, Volume};
use ambient::session::Session;
use ambient::timer::ManualTicker;
use ambient::SessionConfig;
use approx::assert_relative_eq;
use hound::{SampleFormat, WavSpec, WavWriter};
use tempfile::tempdir;

const RATE: u32 = 8000;

/// Constant-level mono WAV, one second long
fn write_dc(path: &Path, level: f32) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    let spec = WavSpec {
        channels: 1,
        sample_rate: RATE,
        bits_per_sample: 32,
        sample_format: SampleFormat::Float,
    };
    let mut writer = WavWriter::create(path, spec).unwrap();
    for _ in 0..RATE {
        writer.write_sample(level).unwrap();
    }
    writer.finalize().unwrap();
}

fn catalog_json() -> &'static str {
    r#"{
        "categories": [{"id": "cozy", "display_name": "Cozy"}],
        "sounds": [
            {"id": "fire", "display_name": "Fireplace", "source_ref": "/sounds/fire.wav",
             "category_id": "cozy", "season_id": "winter", "emoji": "🔥"},
            {"id": "snow", "display_name": "Snowfall", "source_ref": "/sounds/snow.mp3",
             "category_id": "cozy", "season_id": "winter"}
        ],
        "seasons": [
            {"id": "winter", "display_name": "Winter", "audio_sound_ref": "/qish.wav"}
        ],
        "curated": {"winter": ["fire", "snow"]}
    }"#
}

fn config_for(root: &Path) -> SessionConfig {
    SessionConfig {
        asset_root: root.to_path_buf(),
        sample_rate: RATE,
        ..SessionConfig::default()
    }
}

#[test]
fn test_session_renders_season_and_layer() {
    let dir = tempdir().unwrap();
    write_dc(&dir.path().join("qish.wav"), 0.5);
    write_dc(&dir.path().join("sounds/fire.wav"), 0.25);

    let config = config_for(dir.path());
    let catalog = Arc::new(SoundCatalog::from_json_str(catalog_json()).unwrap());
    let mut session = Session::new(catalog, config.clone(), config.wav_backend(), ManualTicker::new()).unwrap();

    session.select_season(SeasonId::Winter).unwrap();
    session.toggle_sound("fire").unwrap();
    session.set_master_volume(Volume::new(100));

    let mut block = vec![0.0f32; 64];
    session.render(&mut block);
    // 0.5 * 1.0 + 0.25 * 0.7
    assert_relative_eq!(block[10], 0.675, epsilon = 1e-5);

    session.set_muted(true);
    let mut muted = vec![0.0f32; 64];
    session.render(&mut muted);
    assert!(muted.iter().all(|s| *s == 0.0));
}

#[test]
fn test_undecodable_layer_stays_silent() {
    let dir = tempdir().unwrap();
    write_dc(&dir.path().join("qish.wav"), 0.5);
    std::fs::create_dir_all(dir.path().join("sounds")).unwrap();
    std::fs::write(dir.path().join("sounds/snow.mp3"), b"ID3 compressed audio").unwrap();

    let config = config_for(dir.path());
    let catalog = Arc::new(SoundCatalog::from_json_str(catalog_json()).unwrap());
    let mut session = Session::new(catalog, config.clone(), config.wav_backend(), ManualTicker::new()).unwrap();

    session.select_season(SeasonId::Winter).unwrap();
    session.toggle_sound("snow").unwrap();

    let snow = session.mix().layer_controller("snow").unwrap();
    assert!(!snow.is_loaded());
    assert!(!snow.is_playing());
    assert!(session.mix().season_controller().unwrap().is_playing());

    // The rest of the session keeps working
    assert!(session.set_layer_volume("snow", Volume::new(10)));
    assert!(session.start_timer());
}

#[test]
fn test_paused_layer_resumes_where_it_stopped() {
    let dir = tempdir().unwrap();
    write_dc(&dir.path().join("sounds/fire.wav"), 0.25);

    let catalog = SoundCatalog::from_json_str(catalog_json()).unwrap();
    let mut mix = MixEngine::new(WavBackend::new(dir.path(), RATE));
    mix.toggle_layer(catalog.sound("fire").unwrap());

    let mut block = vec![0.0f32; 100];
    mix.render(&mut block);
    assert_eq!(mix.layer_controller("fire").unwrap().position(), 100);

    assert_eq!(mix.toggle_layer_playback("fire"), Some(false));
    mix.render(&mut block);
    assert_eq!(mix.layer_controller("fire").unwrap().position(), 100);

    mix.toggle_layer_playback("fire");
    mix.render(&mut block[..50]);
    assert_eq!(mix.layer_controller("fire").unwrap().position(), 150);
}

#[test]
fn test_mixdown_file_contains_rendered_session() {
    let dir = tempdir().unwrap();
    write_dc(&dir.path().join("qish.wav"), 0.5);

    let config = config_for(dir.path());
    let catalog = Arc::new(SoundCatalog::from_json_str(catalog_json()).unwrap());
    let mut session = Session::new(catalog, config.clone(), config.wav_backend(), ManualTicker::new()).unwrap();
    session.select_season(SeasonId::Winter).unwrap();

    let mut rendered = vec![0.0f32; RATE as usize];
    session.render(&mut rendered);
    session.end();

    let out = dir.path().join("mix.wav");
    write_mixdown(&out, &rendered, RATE).unwrap();

    let back = decode_loop(&out, RATE).unwrap();
    assert_eq!(back.len(), RATE as usize);
    assert_relative_eq!(back[100], 0.35, epsilon = 1e-3);
}
