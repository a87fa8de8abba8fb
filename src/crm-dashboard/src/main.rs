//! CRM Dashboard — computes the analytics dashboard from a CRM snapshot.
//!
//! Reads a JSON snapshot (leads, clients, payments, campaigns), builds the
//! report for the given instant and prints it as JSON on stdout.

use anyhow::Context;
use chrono::{DateTime, FixedOffset, Utc};
use clap::Parser;
use crm_core::config::{AppConfig, MAX_WINDOW_DAYS};
use crm_core::types::Snapshot;
use crm_core::CrmError;
use crm_reporting::{build_dashboard, top_countries};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Parser, Debug)]
#[command(name = "crm-dashboard")]
#[command(about = "Compute CRM dashboard analytics from a data snapshot")]
#[command(version)]
struct Cli {
    /// Path to the JSON snapshot
    #[arg(long)]
    snapshot: PathBuf,

    /// Instant to compute the dashboard for, RFC 3339 (defaults to now)
    #[arg(long)]
    now: Option<String>,

    /// Calendar offset from UTC in minutes (overrides config)
    #[arg(long, env = "CRM_DASHBOARD__DASHBOARD__UTC_OFFSET_MINUTES", allow_hyphen_values = true)]
    utc_offset_minutes: Option<i32>,

    /// Days in the activity chart, 1 to 366 (overrides config)
    #[arg(
        long,
        env = "CRM_DASHBOARD__DASHBOARD__WINDOW_DAYS",
        value_parser = clap::value_parser!(u32).range(1..=i64::from(MAX_WINDOW_DAYS))
    )]
    window_days: Option<u32>,

    /// Pretty-print the JSON output
    #[arg(long, default_value_t = false)]
    pretty: bool,
}

fn main() -> anyhow::Result<()> {
    // Load configuration; the log filter comes from it, so report failures
    // once tracing is up.
    let (mut config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log.filter.clone().into()),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    let cli = Cli::parse();

    // Apply CLI overrides
    if let Some(offset) = cli.utc_offset_minutes {
        config.dashboard.utc_offset_minutes = offset;
    }
    if let Some(days) = cli.window_days {
        config.dashboard.window_days = days;
    }

    let now = resolve_now(cli.now.as_deref(), config.dashboard.offset())?;

    info!(
        snapshot = %cli.snapshot.display(),
        now = %now.to_rfc3339(),
        window_days = config.dashboard.window_days,
        "Configuration loaded"
    );

    let snapshot = load_snapshot(&cli.snapshot)
        .with_context(|| format!("loading snapshot {}", cli.snapshot.display()))?;

    info!(
        leads = snapshot.leads.len(),
        clients = snapshot.clients.len(),
        payments = snapshot.payments.len(),
        campaigns = snapshot.campaigns.len(),
        "Snapshot loaded"
    );

    let report = build_dashboard(&snapshot, now, config.dashboard.window_days);

    let top = top_countries(&report.country_distribution, 3);
    if top.is_empty() {
        warn!("No lead carries a country");
    }
    info!(
        leads = report.leads.total,
        lead_trend = %report.leads.trend.value,
        revenue = report.revenue.total,
        revenue_trend = %report.revenue.trend.value,
        click_rate = %report.campaigns.click_rate,
        top_countries = ?top,
        "Dashboard ready"
    );

    let out = if cli.pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };
    println!("{out}");

    Ok(())
}

fn load_snapshot(path: &Path) -> Result<Snapshot, CrmError> {
    let raw = std::fs::read_to_string(path)?;
    Snapshot::from_json(&raw).map_err(|e| CrmError::Snapshot(e.to_string()))
}

/// The instant the dashboard is computed for, expressed in the calendar
/// offset. Only place the clock is read.
fn resolve_now(raw: Option<&str>, offset: FixedOffset) -> Result<DateTime<FixedOffset>, CrmError> {
    match raw {
        Some(raw) => DateTime::parse_from_rfc3339(raw)
            .map(|dt| dt.with_timezone(&offset))
            .map_err(|e| CrmError::InvalidTimestamp(format!("{raw}: {e}"))),
        None => Ok(Utc::now().with_timezone(&offset)),
    }
}
