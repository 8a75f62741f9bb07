//! Ambient CLI
//!
//! Command-line interface for the Ambient session engine.

use clap::Parser;
use env_logger::Env;
use log::info;

use ambient::cli::{commands, Cli, Commands};
use ambient::{Result, SessionConfig};

fn main() {
    let cli = Cli::parse();

    let default_filter = if cli.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(Env::default().default_filter_or(default_filter)).init();

    info!("Ambient v{}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = run(cli) {
        eprintln!("error[{}]: {}", e.error_code(), e);
        for suggestion in e.recovery_suggestions() {
            eprintln!("  hint: {}", suggestion);
        }
        std::process::exit(1);
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = SessionConfig::load_or_default(cli.config.as_deref())?;

    match cli.command {
        Some(cmd) => handle_command(cmd, &config),
        None => {
            println!("Ambient v{}", env!("CARGO_PKG_VERSION"));
            println!("Use --help for available commands");
            Ok(())
        }
    }
}

fn handle_command(cmd: Commands, config: &SessionConfig) -> Result<()> {
    match cmd {
        Commands::Catalog { category, season } => {
            commands::list_catalog(config, category.as_deref(), season.as_deref())
        }
        Commands::Seasons => commands::list_seasons(config),
        Commands::Session(args) => commands::run_session(config, &args),
        Commands::CheckAssets => commands::check_assets(config),
        Commands::Config => commands::print_config(config),
    }
}
