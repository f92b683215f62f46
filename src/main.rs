use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{ArgAction, Parser};

use credit_lens::config::DashboardConfig;
use credit_lens::data::loader::load_file;
use credit_lens::report::DashboardSummary;
use credit_lens::store::RecordStore;

/// Classification metrics for a loan dataset with three model predictions.
#[derive(Parser, Debug)]
#[command(name = "credit-lens", version, about)]
struct Args {
    /// Input file (.csv, .json or .parquet)
    data: PathBuf,

    /// Print the summary as JSON instead of a text table
    #[arg(long, action = ArgAction::SetTrue)]
    json: bool,

    /// JSON file with page size and histogram bin edges
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let config = match &args.config {
        Some(path) => DashboardConfig::from_path(path)?,
        None => DashboardConfig::default(),
    };

    let mut store = RecordStore::with_page_size(config.page_size);
    match load_file(&args.data) {
        Ok(rows) => {
            store.load(&rows);
        }
        Err(e) => store.load_failed(format!("{e:#}")),
    }

    if let Some(err) = store.load_error() {
        bail!("{}: {err}", store.status_line());
    }
    if store.is_empty() {
        bail!("{}", store.status_line());
    }

    let summary = DashboardSummary::build(&store, &config);
    if args.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&summary).context("serialising summary")?
        );
    } else {
        println!("{}", store.status_line());
        println!();
        print!("{summary}");
    }
    Ok(())
}
