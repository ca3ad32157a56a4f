use analytics::{AnalysisOptions, ReportEntry, SalesAnalyzer};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Cell, CellAlignment, Table};
use configuration::ReportFormat;
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the sales report application.
fn main() -> Result<()> {
    // Load environment variables from .env file, if there is one
    dotenvy::dotenv().ok();

    init_tracing();

    // Parse command-line arguments
    let cli = Cli::parse();

    // Execute the appropriate command
    match cli.command {
        Commands::Analyze(args) => handle_analyze(args),
    }
}

/// Logs go to stderr so a JSON report on stdout stays machine-readable.
fn init_tracing() {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install tracing subscriber: {e}");
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Per-seller revenue, profit and bonus report from sales records.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a JSON dataset of sellers, products and purchase records.
    Analyze(AnalyzeArgs),
}

#[derive(Parser)]
struct AnalyzeArgs {
    /// Path to the JSON dataset (sellers, products, purchase_records).
    #[arg(long)]
    data: PathBuf,

    /// Path to the report configuration. Defaults to ./report.toml when present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output format. Overrides `report.format` from the configuration.
    #[arg(long, value_enum)]
    format: Option<ReportFormat>,

    /// Write the report to this file instead of stdout.
    #[arg(long)]
    output: Option<PathBuf>,
}

// ==============================================================================
// Analyze Command Logic
// ==============================================================================

/// Handles loading inputs, running the analysis and rendering the result.
fn handle_analyze(args: AnalyzeArgs) -> Result<()> {
    let config = configuration::load_config(args.config.as_deref())
        .context("Failed to load report configuration")?;
    let options = AnalysisOptions::from_config(&config);

    let raw = std::fs::read_to_string(&args.data)
        .with_context(|| format!("Failed to read dataset {}", args.data.display()))?;
    let data: serde_json::Value = serde_json::from_str(&raw)
        .with_context(|| format!("Dataset {} is not valid JSON", args.data.display()))?;

    tracing::info!(dataset = %args.data.display(), "Starting sales analysis.");
    let report = SalesAnalyzer::new()
        .analyze_value(Some(&data), &options)
        .context("Sales analysis failed")?;

    let rendered = match args.format.unwrap_or(config.report.format) {
        ReportFormat::Table => render_table(&report).to_string(),
        ReportFormat::Json => serde_json::to_string_pretty(&report)?,
    };

    match args.output {
        Some(path) => {
            std::fs::write(&path, rendered)
                .with_context(|| format!("Failed to write report to {}", path.display()))?;
            tracing::info!(output = %path.display(), "Report written.");
        }
        None => println!("{rendered}"),
    }

    Ok(())
}

/// Builds the terminal table for a finished report.
fn render_table(report: &[ReportEntry]) -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL).set_header(vec![
        "#", "Seller", "Name", "Revenue", "Profit", "Sales", "Bonus", "Top products",
    ]);

    for (rank, entry) in report.iter().enumerate() {
        let top_products = entry
            .top_products
            .iter()
            .map(|p| format!("{} x{}", p.sku, p.quantity))
            .collect::<Vec<_>>()
            .join(", ");

        table.add_row(vec![
            Cell::new(rank + 1),
            Cell::new(&entry.seller_id),
            Cell::new(&entry.name),
            Cell::new(format!("{:.2}", entry.revenue)).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", entry.profit)).set_alignment(CellAlignment::Right),
            Cell::new(entry.sales_count).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", entry.bonus)).set_alignment(CellAlignment::Right),
            Cell::new(top_products),
        ]);
    }

    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use analytics::TopProduct;
    use rust_decimal_macros::dec;

    #[test]
    fn cli_parses_analyze_arguments() {
        let cli = Cli::try_parse_from([
            "sales-report",
            "analyze",
            "--data",
            "demos/dataset.json",
            "--format",
            "json",
        ])
        .unwrap();

        let Commands::Analyze(args) = cli.command;
        assert_eq!(args.data, PathBuf::from("demos/dataset.json"));
        assert_eq!(args.format, Some(ReportFormat::Json));
        assert!(args.config.is_none());
    }

    #[test]
    fn table_lists_every_seller_with_two_decimals() {
        let report = vec![ReportEntry {
            seller_id: "seller_1".to_string(),
            name: "Alexey Petrov".to_string(),
            revenue: dec!(62.5),
            profit: dec!(28.1),
            sales_count: 2,
            top_products: vec![TopProduct { sku: "SKU_001".to_string(), quantity: 1 }],
            bonus: dec!(4.22),
        }];

        let rendered = render_table(&report).to_string();
        assert!(rendered.contains("Alexey Petrov"));
        assert!(rendered.contains("62.50"));
        assert!(rendered.contains("28.10"));
        assert!(rendered.contains("SKU_001 x1"));
    }
}
