//! Configuration and CLI helper tests

use std::fs;
use std::path::PathBuf;

use ambient::catalog::{SeasonId, SoundCatalog};
use ambient::cli::commands::scan_assets;
use ambient::cli::{Cli, Commands};
use ambient::SessionConfig;
use clap::Parser;
use pretty_assertions::assert_eq;
use tempfile::tempdir;

#[test]
fn test_config_points_at_custom_catalog() {
    let dir = tempdir().unwrap();
    let catalog_path = dir.path().join("catalog.json");
    fs::write(
        &catalog_path,
        r#"{
            "sounds": [{"id": "gong", "display_name": "Gong", "source_ref": "gong.wav",
                        "category_id": "bells", "season_id": "spring"}],
            "seasons": [{"id": "spring", "display_name": "Spring", "audio_sound_ref": "bahor.wav"}],
            "curated": {"spring": ["gong"]}
        }"#,
    )
    .unwrap();

    let config_path = dir.path().join("ambient.json");
    let config_json = serde_json::json!({
        "catalog_path": catalog_path,
        "default_duration_secs": 900,
    });
    fs::write(&config_path, config_json.to_string()).unwrap();

    let config = SessionConfig::load(&config_path).unwrap();
    assert_eq!(config.default_duration_secs, 900);

    let catalog = config.catalog().unwrap();
    assert_eq!(catalog.sounds().len(), 1);
    assert_eq!(catalog.curated_for(SeasonId::Spring)[0].id, "gong");
}

#[test]
fn test_config_round_trips_through_json() {
    let config = SessionConfig::default();
    let json = config.to_json_string().unwrap();
    let back: SessionConfig = serde_json::from_str(&json).unwrap();
    assert_eq!(back, config);
}

#[test]
fn test_scan_assets_reports_missing_and_unused() {
    let dir = tempdir().unwrap();
    let root = dir.path();
    fs::create_dir_all(root.join("sounds")).unwrap();
    fs::write(root.join("qish.mp3"), b"winter").unwrap();
    fs::write(root.join("sounds/fire.mp3"), b"fire").unwrap();
    fs::write(root.join("sounds/notes.txt"), b"todo").unwrap();

    let catalog = SoundCatalog::builtin();
    let report = scan_assets(&catalog, root);

    assert_eq!(report.found, vec!["/qish.mp3".to_string(), "/sounds/fire.mp3".to_string()]);
    assert!(report.missing.contains(&"/yoz.mp3".to_string()));
    assert!(report.missing.contains(&"/sounds/ocean.mp3".to_string()));
    assert_eq!(report.unreferenced, vec![root.join("sounds/notes.txt")]);
}

#[test]
fn test_scan_assets_on_missing_root() {
    let catalog = SoundCatalog::builtin();
    let report = scan_assets(&catalog, &PathBuf::from("/nonexistent/ambient-assets"));
    assert!(report.found.is_empty());
    assert_eq!(
        report.missing.len(),
        catalog.seasons().len() + catalog.sounds().len()
    );
}

#[test]
fn test_cli_parses_session_command() {
    let cli = Cli::try_parse_from([
        "ambient-cli",
        "--config",
        "ambient.json",
        "session",
        "--season",
        "winter",
        "-l",
        "fire",
        "-l",
        "snow",
        "--minutes",
        "5",
        "--silent",
    ])
    .unwrap();

    assert_eq!(cli.config, Some(PathBuf::from("ambient.json")));
    match cli.command {
        Some(Commands::Session(args)) => {
            assert_eq!(args.season, "winter");
            assert_eq!(args.layers, vec!["fire".to_string(), "snow".to_string()]);
            assert_eq!(args.minutes, Some(5));
            assert!(args.silent);
            assert!(!args.realtime);
        }
        other => panic!("unexpected command: {:?}", other),
    }
}

#[test]
fn test_silent_session_runs_to_completion() {
    let cli = Cli::try_parse_from([
        "ambient-cli", "session", "--season", "autumn", "--layer", "rain", "--minutes", "5", "--silent",
    ])
    .unwrap();
    let Some(Commands::Session(args)) = cli.command else {
        panic!("expected session command");
    };

    let config = SessionConfig::default();
    ambient::cli::commands::run_session(&config, &args).unwrap();
}

#[test]
fn test_session_rejects_non_preset_minutes() {
    let cli = Cli::try_parse_from([
        "ambient-cli", "session", "--season", "spring", "--minutes", "7", "--silent",
    ])
    .unwrap();
    let Some(Commands::Session(args)) = cli.command else {
        panic!("expected session command");
    };

    let err = ambient::cli::commands::run_session(&SessionConfig::default(), &args).unwrap_err();
    assert_eq!(err.error_code(), "INVALID_DURATION");
}
