use analytics::{AnalyticsError, SummaryTable};
use analyzer::RecommendationSet;
use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use comfy_table::{Table, presets::UTF8_FULL};
use configuration::{Config, SourceKind, ZoomPreset, load_config};
use core_types::RecoveryDays;
use engine::{EventOutcome, EventStudy, StudyReport, ZoomReport};
use market_data::{CsvPriceSource, PriceSource, YahooChartClient};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the Aftershock event-study application.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load RUST_LOG and config overrides from a .env file, if one exists.
    dotenvy::dotenv().ok();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Run(args) => handle_run(args).await?,
    }
    Ok(())
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Measures how a basket of assets reacted to market-moving events.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Download prices and analyse every configured event at every zoom level.
    Run(RunArgs),
}

#[derive(Parser)]
struct RunArgs {
    /// Path to the study configuration.
    #[arg(long, default_value = "config.toml")]
    config: PathBuf,

    /// Where prices come from. Overrides `data.source`.
    #[arg(long, value_enum)]
    source: Option<SourceKind>,

    /// Wide price CSV for the csv source. Overrides `data.csv_path`.
    #[arg(long)]
    prices: Option<PathBuf>,

    /// Zoom half-width in days. Repeat to analyse several; replaces the presets.
    #[arg(long = "zoom")]
    zooms: Vec<u32>,

    /// First date of history to request (format: YYYY-MM-DD). Overrides `study.start_date`.
    #[arg(long)]
    from: Option<NaiveDate>,

    /// End of the requested history, exclusive (format: YYYY-MM-DD). Overrides `study.end_date`.
    #[arg(long)]
    to: Option<NaiveDate>,

    /// Print the full report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

// ==============================================================================
// Run Command Logic
// ==============================================================================

async fn handle_run(args: RunArgs) -> anyhow::Result<()> {
    let config = load_config(&args.config)
        .with_context(|| format!("failed to load {}", args.config.display()))?;

    let start = args.from.unwrap_or(config.study.start_date);
    let end = args.to.unwrap_or(config.study.end_date);
    anyhow::ensure!(start < end, "start date {start} must be before end date {end}");

    let source: Box<dyn PriceSource> = match args.source.unwrap_or(config.data.source) {
        SourceKind::Csv => {
            let path = args
                .prices
                .or_else(|| config.data.csv_path.clone())
                .context("the csv source needs --prices or data.csv_path")?;
            Box::new(CsvPriceSource::new(path))
        }
        SourceKind::Yahoo => Box::new(YahooChartClient::new()?),
    };

    let table = source
        .fetch_prices(&config.study.tickers, start, end)
        .await
        .map_err(|e| AnalyticsError::DataUnavailable(e.to_string()))?;
    tracing::info!(
        rows = table.len(),
        first = ?table.dates().first(),
        last = ?table.dates().last(),
        "Price history loaded."
    );

    let presets: Vec<ZoomPreset> = if args.zooms.is_empty() {
        config.zoom.presets.clone()
    } else {
        args.zooms
            .iter()
            .map(|&days| ZoomPreset::new(format!("±{days} days"), Some(days)))
            .collect()
    };

    let study = EventStudy::from_config(&config)?;
    let report = study.run(&table, &config.events, &presets);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_report(&report, &config);
    }
    Ok(())
}

// ==============================================================================
// Rendering
// ==============================================================================

fn print_report(report: &StudyReport, config: &Config) {
    for outcome in &report.outcomes {
        match outcome {
            EventOutcome::Completed(event) => {
                println!(
                    "\n=== {} (requested {}, trading day used {}) ===",
                    event.event.label, event.event.date, event.anchor
                );
                for zoom in &event.zooms {
                    print_zoom(zoom, config);
                }
            }
            EventOutcome::Failed { event, error } => {
                println!("\n=== {} ({}) skipped: {} ===", event.label, event.date, error);
            }
        }
    }
}

fn print_zoom(zoom: &ZoomReport, config: &Config) {
    println!(
        "\n--- {}: ±{} days, {} trading rows ---",
        zoom.label, zoom.effective_zoom, zoom.visible_rows
    );
    if let Some(summary) = &zoom.summary {
        println!("{}", summary_table(summary, config));
    }
    if let Some(recommendations) = &zoom.recommendations {
        print_recommendations(recommendations, config);
    }
    for note in &zoom.notes {
        println!("note: {note}");
    }
}

fn summary_table(summary: &SummaryTable, config: &Config) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "Asset",
        "Pre-Event Return",
        "Post-Event Return",
        "Max Drawdown",
        "Volatility",
        "Days to Recovery",
        "Beta",
    ]);
    for row in &summary.rows {
        table.add_row(vec![
            config.label_for(&row.ticker).to_string(),
            percent(row.pre_return),
            percent(row.post_return),
            percent(row.max_drawdown),
            percent(row.volatility),
            recovery(row.days_to_recovery),
            number(row.beta),
        ]);
    }
    table
}

fn print_recommendations(recommendations: &RecommendationSet, config: &Config) {
    println!("Recommendations:");
    for line in recommendations.describe(|ticker| config.label_for(ticker).to_string()) {
        println!("  - {line}");
    }
}

fn percent(value: f64) -> String {
    if value.is_finite() {
        format!("{:.2}%", value * 100.0)
    } else {
        "n/a".to_string()
    }
}

fn number(value: f64) -> String {
    if value.is_finite() {
        format!("{value:.2}")
    } else {
        "n/a".to_string()
    }
}

fn recovery(days: RecoveryDays) -> String {
    match days {
        RecoveryDays::Recovered(days) => days.to_string(),
        RecoveryDays::Unbounded => "not recovered".to_string(),
    }
}
