//! CLI Command Implementations
//!
//! Implements the actual logic for each CLI command.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{Receiver, RecvTimeoutError};
use std::sync::Arc;
use std::time::Duration;

use log::info;
use walkdir::WalkDir;

use super::SessionArgs;
use crate::audio::{resolve_source, MixdownWriter, MockBackend, TrackBackend};
use crate::catalog::{SeasonId, Sound, SoundCatalog};
use crate::config::SessionConfig;
use crate::error::{AmbientError, Result};
use crate::mix::Volume;
use crate::session::Session;
use crate::timer::{ManualTicker, ThreadTicker, Tick, Ticker, TimerEvent};

/// List sounds, optionally filtered by category and/or season curation.
pub fn list_catalog(config: &SessionConfig, category: Option<&str>, season: Option<&str>) -> Result<()> {
    let catalog = config.catalog()?;

    let mut sounds: Vec<&Sound> = match season {
        Some(season) => catalog.curated_for(season.parse::<SeasonId>()?),
        None => catalog.sounds().iter().collect(),
    };
    if let Some(category) = category {
        sounds.retain(|s| s.category_id == category);
    }

    if sounds.is_empty() {
        println!("No sounds match.");
        return Ok(());
    }

    for sound in sounds {
        println!(
            "{} {:<10} {:<18} {:<8} {}",
            sound.emoji, sound.id, sound.display_name, sound.category_id, sound.season_id
        );
    }

    Ok(())
}

/// List seasons with their background tracks.
pub fn list_seasons(config: &SessionConfig) -> Result<()> {
    let catalog = config.catalog()?;

    for season in catalog.seasons() {
        let curated: Vec<&str> = catalog
            .curated_for(season.id)
            .iter()
            .map(|s| s.id.as_str())
            .collect();
        println!(
            "{:<7} {:<8} track: {:<12} curated: {}",
            season.id,
            season.display_name,
            season.audio_sound_ref,
            curated.join(", ")
        );
    }

    Ok(())
}

/// Print the effective configuration as JSON.
pub fn print_config(config: &SessionConfig) -> Result<()> {
    println!("{}", config.to_json_string()?);
    Ok(())
}

/// Result of matching catalog refs against files under the asset root
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct AssetReport {
    /// Source refs that resolve to a file
    pub found: Vec<String>,
    /// Source refs with no file behind them
    pub missing: Vec<String>,
    /// Files under the root no catalog entry refers to
    pub unreferenced: Vec<PathBuf>,
}

/// Match every season track and sound in `catalog` against `asset_root`.
pub fn scan_assets(catalog: &SoundCatalog, asset_root: &Path) -> AssetReport {
    let files: BTreeSet<PathBuf> = WalkDir::new(asset_root)
        .into_iter()
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_type().is_file())
        .map(|entry| entry.into_path())
        .collect();

    let refs: BTreeSet<&str> = catalog
        .seasons()
        .iter()
        .map(|s| s.audio_sound_ref.as_str())
        .chain(catalog.sounds().iter().map(|s| s.source_ref.as_str()))
        .collect();

    let mut report = AssetReport::default();
    let mut referenced = BTreeSet::new();

    for source_ref in refs {
        let path = resolve_source(asset_root, source_ref);
        if files.contains(&path) {
            report.found.push(source_ref.to_string());
            referenced.insert(path);
        } else {
            report.missing.push(source_ref.to_string());
        }
    }

    report.unreferenced = files.difference(&referenced).cloned().collect();
    report
}

/// Report catalog sounds missing from the asset root.
pub fn check_assets(config: &SessionConfig) -> Result<()> {
    let catalog = config.catalog()?;
    info!("Checking assets under: {}", config.asset_root.display());

    let report = scan_assets(&catalog, &config.asset_root);

    println!("Found: {}", report.found.len());
    for source_ref in &report.missing {
        println!("  missing  {}", source_ref);
    }
    for path in &report.unreferenced {
        println!("  unused   {}", path.display());
    }
    if report.missing.is_empty() {
        println!("All catalog sounds resolve.");
    } else {
        println!("{} sound(s) will play silently.", report.missing.len());
    }

    Ok(())
}

/// Run a meditation session until its countdown completes.
pub fn run_session(config: &SessionConfig, args: &SessionArgs) -> Result<()> {
    let season: SeasonId = args.season.parse()?;
    let catalog = Arc::new(config.catalog()?);

    if args.silent {
        drive_session(config, catalog, MockBackend::new(), season, args)
    } else {
        drive_session(config, catalog, config.wav_backend(), season, args)
    }
}

fn drive_session<B: TrackBackend>(
    config: &SessionConfig,
    catalog: Arc<SoundCatalog>,
    backend: B,
    season: SeasonId,
    args: &SessionArgs,
) -> Result<()> {
    let mut mixdown = match &args.out {
        Some(path) => Some(MixdownWriter::create(path, config.sample_rate)?),
        None => None,
    };
    let mut block = vec![0.0f32; samples_per_tick(config)];

    if args.realtime {
        let (ticker, ticks) = ThreadTicker::new(config.tick_interval());
        let mut session = Session::new(catalog, config.clone(), backend, ticker)?;
        prepare_session(&mut session, season, args)?;

        // A live ticker delivers well within two intervals
        let patience = config.tick_interval() * 2 + Duration::from_millis(500);
        loop {
            let tick = next_tick(&ticks, session.ticker(), patience)?;
            if !session.ticker().is_current(&tick) {
                continue;
            }
            render_block(&mut session, &mut block, mixdown.as_mut())?;
            let event = session.handle_tick(tick);
            report_progress(&session);
            if let Some(event) = event {
                return finish(session, event, mixdown, args);
            }
        }
    } else {
        let mut session = Session::new(catalog, config.clone(), backend, ManualTicker::new())?;
        prepare_session(&mut session, season, args)?;

        loop {
            render_block(&mut session, &mut block, mixdown.as_mut())?;
            match session.on_tick() {
                Some(event) => return finish(session, event, mixdown, args),
                None if session.timer().map_or(false, |t| t.is_running()) => {
                    report_progress(&session)
                }
                None => {
                    return Err(AmbientError::InvalidConfig {
                        reason: "timer stopped without completing".to_string(),
                    })
                }
            }
        }
    }
}

fn prepare_session<B: TrackBackend, T: Ticker>(
    session: &mut Session<B, T>,
    season: SeasonId,
    args: &SessionArgs,
) -> Result<()> {
    session.select_season(season)?;

    for layer in &args.layers {
        session.toggle_sound(layer)?;
    }
    if let Some(master) = args.master {
        session.set_master_volume(Volume::new(master));
    }
    if args.mute {
        session.set_muted(true);
    }
    if let Some(minutes) = args.minutes {
        let secs = minutes.saturating_mul(60);
        if !session.set_timer_duration(secs) {
            return Err(AmbientError::InvalidDuration {
                seconds: secs,
                allowed: session.config().duration_presets_secs.clone(),
            });
        }
    }

    if !session.start_timer() {
        return Err(ticker_stopped());
    }
    println!(
        "Session {} started: {} with {} layer(s), {}",
        session.id(),
        season,
        session.mix().layer_count(),
        session.timer().map(|t| t.format_remaining()).unwrap_or_default()
    );
    Ok(())
}

/// Wait for the next tick, failing once the ticker has gone quiet for good
fn next_tick<T: Ticker>(ticks: &Receiver<Tick>, ticker: &T, patience: Duration) -> Result<Tick> {
    loop {
        match ticks.recv_timeout(patience) {
            Ok(tick) => return Ok(tick),
            Err(RecvTimeoutError::Timeout) if ticker.is_active() => continue,
            Err(_) => return Err(ticker_stopped()),
        }
    }
}

fn ticker_stopped() -> AmbientError {
    AmbientError::Io(std::io::Error::new(
        std::io::ErrorKind::BrokenPipe,
        "ticker stopped before the session completed",
    ))
}

fn samples_per_tick(config: &SessionConfig) -> usize {
    (config.sample_rate as u64 * config.tick_interval_ms / 1000) as usize
}

fn render_block<B: TrackBackend, T: Ticker>(
    session: &mut Session<B, T>,
    block: &mut [f32],
    mixdown: Option<&mut MixdownWriter>,
) -> Result<()> {
    let Some(writer) = mixdown else {
        return Ok(());
    };
    block.fill(0.0);
    session.render(block);
    writer.write_block(block)
}

fn report_progress<B: TrackBackend, T: Ticker>(session: &Session<B, T>) {
    if let Some(timer) = session.timer() {
        if timer.remaining_secs() % 60 == 0 && timer.remaining_secs() > 0 {
            println!("  {} remaining", timer.format_remaining());
        }
    }
}

fn finish<B: TrackBackend, T: Ticker>(
    mut session: Session<B, T>,
    event: TimerEvent,
    mixdown: Option<MixdownWriter>,
    args: &SessionArgs,
) -> Result<()> {
    let TimerEvent::Completed { duration_secs, at } = event;
    println!(
        "\u{1F514} Session complete: {} min at {}",
        duration_secs / 60,
        at.format("%H:%M:%S")
    );

    if args.json {
        println!("{}", serde_json::to_string_pretty(&session.snapshot())?);
    }

    session.end();

    if let (Some(writer), Some(path)) = (mixdown, args.out.as_ref()) {
        let written = writer.samples_written();
        writer.finalize()?;
        println!("Mixdown written: {} ({} samples)", path.display(), written);
    }

    Ok(())
}
