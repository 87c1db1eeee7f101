//! Command-line entry point for the CRM aggregation engine.
//!
//! # Responsibility
//! - Resolve database, owner and logging settings from flags or environment.
//! - Run one aggregation against a SQLite database and print it as JSON.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use crm_core::{
    default_log_level, init_logging, open_db, ActivityService, DashboardService, LogDiagnostics,
    OwnerId, SqliteStores, StatisticsService, SystemClock,
};
use log::info;
use serde::Serialize;

/// Activity feed, statistics and dashboard for one CRM owner.
#[derive(Parser)]
#[command(name = "crm")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Aggregate CRM activity, statistics and dashboards from a SQLite store")]
struct Cli {
    /// SQLite database file (created and migrated when missing)
    #[arg(long, env = "CRM_DB_PATH")]
    db: Option<PathBuf>,

    /// Owner whose data is aggregated
    #[arg(long, env = "CRM_OWNER_ID")]
    owner: Option<OwnerId>,

    /// trace|debug|info|warn|error; defaults by build profile
    #[arg(long, env = "CRM_LOG_LEVEL")]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; logging is off when unset
    #[arg(long, env = "CRM_LOG_DIR")]
    log_dir: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Recent activity feed, newest first
    Activity {
        /// Maximum events; non-positive selects the default of 20
        #[arg(short, long, default_value_t = 20, allow_negative_numbers = true)]
        limit: i64,
    },

    /// Per-kind counters
    Stats,

    /// Statistics, activity and recent-item panels in one response
    Dashboard,

    /// Print core version and a liveness check
    Ping,
}

/// Database and owner a data command runs against.
#[derive(Debug)]
struct Target {
    db: PathBuf,
    owner: OwnerId,
}

impl Cli {
    fn target(&self) -> Result<Target> {
        let db = self
            .db
            .clone()
            .context("--db (or CRM_DB_PATH) is required for this command")?;
        let owner = self
            .owner
            .context("--owner (or CRM_OWNER_ID) is required for this command")?;
        Ok(Target { db, owner })
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    if let Some(log_dir) = cli.log_dir.as_deref() {
        let level = cli
            .log_level
            .as_deref()
            .unwrap_or_else(|| default_log_level());
        init_logging(level, log_dir).context("failed to initialize logging")?;
    }

    if let Commands::Ping = cli.command {
        println!("crm_core ping={}", crm_core::ping());
        println!("crm_core version={}", crm_core::core_version());
        return Ok(());
    }

    let target = cli.target()?;
    let conn = open_db(&target.db)
        .with_context(|| format!("failed to open database {}", target.db.display()))?;
    let stores = SqliteStores::new(&conn);
    let diagnostics = LogDiagnostics;
    let clock = SystemClock;

    match cli.command {
        Commands::Activity { limit } => {
            let feed = ActivityService::new(stores.sources(), &diagnostics)
                .recent_activity(target.owner, limit)
                .context("failed to build activity feed")?;
            print_json(&feed)?;
        }
        Commands::Stats => {
            let stats = StatisticsService::new(stores.sources(), &diagnostics, &clock)
                .statistics(target.owner);
            print_json(&stats)?;
        }
        Commands::Dashboard => {
            let dashboard = DashboardService::new(stores.sources(), &diagnostics, &clock)
                .dashboard(target.owner)
                .context("failed to build dashboard")?;
            print_json(&dashboard)?;
        }
        Commands::Ping => {}
    }

    info!(
        "event=cli_command module=cli status=ok owner_id={}",
        target.owner
    );
    Ok(())
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let rendered = serde_json::to_string_pretty(value).context("failed to render JSON")?;
    println!("{rendered}");
    Ok(())
}
