use analytics::{ReportingEngine, TrendPeriod};
use anyhow::{Context, bail};
use clap::Parser;
use configuration::{Config, OutputFormat, SourceKind, load_config};
use core_types::Dataset;
use database::{DbRepository, connect, load_csv};

mod cli;
mod logging;
mod render;

use cli::{Cli, Commands};
use render::{Report, render};

/// The main entry point for the sales reporting tool.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Parse command-line arguments
    let cli = Cli::parse();

    // Defaults, then config file, then environment, then flags.
    let mut config = load_config(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    config.validate()?;

    let _guard = logging::init(&config.logging)?;
    tracing::debug!(command = ?cli.command, source = ?config.source.kind, "Starting");

    match cli.command {
        Commands::NormalizeDates => handle_normalize_dates(&config).await,
        command => {
            let dataset = load_dataset(&config).await?;
            let engine = ReportingEngine::new(config.reports.top_customers)?;
            run_report(&engine, &dataset, command, config.output.format)
        }
    }
}

// ==============================================================================
// Data Loading
// ==============================================================================

/// Reads the whole sales table from the configured source.
async fn load_dataset(config: &Config) -> anyhow::Result<Dataset> {
    let dataset = match config.source.kind {
        SourceKind::Csv => load_csv(&config.source.csv_path, &config.source, &config.ingest)
            .with_context(|| {
                format!("failed to load {}", config.source.csv_path.display())
            })?,
        SourceKind::Postgres => {
            let pool = connect().await?;
            DbRepository::new(pool, &config.source.table)?
                .fetch_dataset(&config.ingest)
                .await?
        }
    };
    Ok(dataset)
}

// ==============================================================================
// Command Handlers
// ==============================================================================

fn run_report(
    engine: &ReportingEngine,
    dataset: &Dataset,
    command: Commands,
    format: OutputFormat,
) -> anyhow::Result<()> {
    match command {
        Commands::Audit => print(&engine.completeness_audit(dataset), format),
        Commands::Delays { same_day } => print(&engine.shipping_delays(dataset, same_day), format),
        Commands::Delivery => print(&engine.delivery_by_state(dataset), format),
        Commands::Trends { period } => match TrendPeriod::from(period) {
            TrendPeriod::Yearly => print(&engine.yearly_trend(dataset), format),
            TrendPeriod::Quarterly => print(&engine.quarterly_trend(dataset), format),
            TrendPeriod::Monthly => print(&engine.monthly_trend(dataset), format),
        },
        Commands::Profitability { level } => print(&engine.profitability(dataset, level.into()), format),
        Commands::Customers => print(&engine.customer_metrics(dataset), format),
        Commands::Kpi => print(&engine.kpi_summary(dataset), format),
        Commands::All => print(&engine.full_report(dataset), format),
        Commands::NormalizeDates => bail!("normalize-dates does not produce a report"),
    }
}

async fn handle_normalize_dates(config: &Config) -> anyhow::Result<()> {
    if config.source.kind != SourceKind::Postgres {
        bail!("normalize-dates rewrites the database table; run it with --source postgres");
    }
    let pool = connect().await?;
    let repo = DbRepository::new(pool, &config.source.table)?;
    let outcome = repo.normalize_dates(&config.ingest).await?;
    print(&outcome, config.output.format)
}

fn print<R: Report>(report: &R, format: OutputFormat) -> anyhow::Result<()> {
    println!("{}", render(report, format)?);
    Ok(())
}
