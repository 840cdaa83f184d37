use anyhow::{Context, Result, bail};
use clap::Parser;
use moneez_core::{
    Ledger, category_coverage, current_balance, layout_year, round_cents, search_text,
};
use moneez_ingest::ingest_all;
use std::path::PathBuf;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

mod chart;
mod config;

use chart::SvgCanvas;
use config::{Config, load_config};

#[derive(Parser, Debug)]
#[command(
    name = "moneez",
    version,
    about = "Generate a yearly stacked-bar overview from bank CSV exports"
)]
struct Cli {
    /// JSON config naming the input files, category rules and colors
    #[arg(value_name = "CONFIG-FILE")]
    config_file: PathBuf,

    /// The year for which to generate an overview
    #[arg(value_name = "YEAR")]
    year: i32,

    /// Seconds to wait between placing bars (cosmetic)
    #[arg(short, long, value_name = "SECONDS")]
    wait: Option<f64>,

    /// Where to write the chart (default: moneez-<YEAR>.svg)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Print transactions whose name, usage or type contains TERM
    #[arg(long, value_name = "TERM")]
    search: Option<String>,

    /// Print which categories exist and which lack a color
    #[arg(long)]
    categories: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // All mutations are committed before any pause, so exiting here
    // never leaves partial state behind.
    tokio::spawn(async {
        if tokio::signal::ctrl_c().await.is_ok() {
            println!("Program interrupted by user");
            std::process::exit(0);
        }
    });

    tokio::task::spawn_blocking(move || run(cli))
        .await
        .context("report task panicked")?
}

fn run(cli: Cli) -> Result<()> {
    let pacing = match cli.wait {
        Some(secs) => Some(
            Duration::try_from_secs_f64(secs)
                .with_context(|| format!("invalid --wait value: {secs}"))?,
        ),
        None => None,
    };

    let config = load_config(&cli.config_file)?;
    let maps = config.category_maps();
    let sources = config.input_sources()?;

    let mut ledger = Ledger::new();
    ingest_all(&sources, &config.currency, &maps, &mut ledger)?;

    if cli.categories {
        print_categories(&config);
    }

    if let Some(term) = &cli.search {
        let results = search_text(&ledger, term);
        for txn in &results.matches {
            println!("{txn}");
        }
        println!("{} results", results.count());
    }

    for year in ledger.years() {
        println!("{year}");
        for flow in ledger.year_summary(year) {
            println!("{flow}");
        }
    }

    if ledger.is_empty() {
        bail!("no transactions found in the configured input files");
    }
    let balance = current_balance(&ledger)?;
    println!(
        "The current balance is: {:.2} {}",
        round_cents(balance),
        config.currency
    );

    let buckets = ledger.year(cli.year);
    if buckets.is_empty() {
        tracing::warn!("no transactions in {}", cli.year);
    }
    let layout = layout_year(&buckets, &maps, config.default_color.as_deref());

    let output = cli
        .output
        .unwrap_or_else(|| PathBuf::from(format!("moneez-{}.svg", cli.year)));
    let mut canvas = SvgCanvas::new(output, &layout);
    layout.draw(&mut canvas, pacing)?;
    canvas.save()?;
    println!("Wrote {}", canvas.path().display());

    Ok(())
}

fn print_categories(config: &Config) {
    let coverage = category_coverage(&config.category_maps());
    let join = |set: &std::collections::BTreeSet<String>| {
        set.iter().map(String::as_str).collect::<Vec<_>>().join(", ")
    };
    println!("The following categories exist: {}", join(&coverage.categories));
    println!(
        "The following categories do not have an associated color: {}",
        join(&coverage.uncolored)
    );
}
