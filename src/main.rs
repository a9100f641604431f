mod app;

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use km_explorer::archive::{CollectionReport, load_collection};
use km_explorer::config::ExplorerConfig;
use km_explorer::explorer::categories::CategoryExtractor;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Harvested collection metadata (JSON array).
    #[arg(long, default_value = "km_archive/metadata/all_objects.json")]
    records: PathBuf,
    /// Explorer settings as JSON; missing keys keep their defaults.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Overrides the layout jitter seed.
    #[arg(long)]
    seed: Option<u64>,
    /// Print a collection summary and exit.
    #[arg(long)]
    report: bool,
}

fn load_config(args: &Args) -> Result<ExplorerConfig> {
    let mut config = match &args.config {
        Some(path) => ExplorerConfig::load(path)?,
        None => ExplorerConfig::default(),
    };
    if let Some(seed) = args.seed {
        config.layout.seed = seed;
    }
    Ok(config)
}

fn print_report(args: &Args, config: &ExplorerConfig) -> Result<()> {
    let records = load_collection(&args.records)?;
    let categories = CategoryExtractor::new(config.categories.clone()).extract(&records);
    print!("{}", CollectionReport::new(&records, &categories));
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = load_config(&args)?;

    if args.report {
        return print_report(&args, &config);
    }

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "km-explorer",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::ExplorerApp::new(
                cc,
                args.records.clone(),
                config,
            )))
        }),
    )
    .map_err(|err| anyhow::anyhow!("{err}"))
}
