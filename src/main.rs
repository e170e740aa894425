mod cli;
mod config;
mod db;
mod models;
mod tracker;
mod utils;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use clap::Parser;

use cli::args::{Cli, Commands};
use cli::handlers;
use config::AppConfig;
use db::{SqliteStore, Store};
use tracker::Tracker;

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let mut config = AppConfig::load().context("Loading config")?;
    if let Some(path) = cli.db {
        config.storage.db_path = Some(path);
    }

    // Ensure data directory exists and open DB
    let db_path = config.ensure_db_dir()?;
    let store = SqliteStore::open(&db_path)
        .with_context(|| format!("Opening database at {:?}", db_path))?;

    let today = Local::now().date_naive();
    let mut tracker = Tracker::open(store, today).context("Loading saved progress")?;

    match cli.command {
        Some(Commands::Setup {
            goal,
            days,
            initial,
        }) => {
            handlers::handle_setup(&mut tracker, &config, goal, days.as_deref(), initial, today)?;
        }

        Some(Commands::Tips) => handlers::handle_tips()?,

        Some(cmd) => {
            ensure_setup(&mut tracker, &config, today)?;
            match cmd {
                Commands::Log {
                    date,
                    memorized,
                    revised,
                } => {
                    handlers::handle_log(
                        &mut tracker,
                        date.as_deref(),
                        memorized.as_deref(),
                        revised.as_deref(),
                        today,
                    )?;
                }
                Commands::Today => handlers::handle_today(&tracker, &config, today)?,
                Commands::History => handlers::handle_history(&tracker, &config)?,
                Commands::Stats => handlers::handle_stats(&tracker, today)?,
                Commands::Badges { category } => {
                    handlers::handle_badges(&tracker, category.as_deref(), today)?;
                }
                Commands::Export => handlers::handle_export(&tracker)?,
                Commands::Setup { .. } | Commands::Tips => unreachable!(),
            }
        }

        // No subcommand → dashboard
        None => {
            ensure_setup(&mut tracker, &config, today)?;
            handlers::handle_today(&tracker, &config, today)?;
        }
    }

    Ok(())
}

/// Create a plan from the config defaults when none is stored yet.
fn ensure_setup<S: Store>(tracker: &mut Tracker<S>, config: &AppConfig, today: NaiveDate) -> Result<()> {
    if !tracker.is_set_up() {
        eprintln!("No plan found. Creating one from config defaults (change it with `rafiq setup`)...");
        handlers::handle_setup(tracker, config, None, None, None, today)?;
    }
    Ok(())
}
