use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};

use marine_pollution_dashboard::config::DashboardConfig;
use marine_pollution_dashboard::data::cache::DatasetCache;
use marine_pollution_dashboard::data::export::{export_to_path, EXPORT_FILE_NAME};
use marine_pollution_dashboard::data::{filter_dataset, DateSelection, IncidentFilter};
use marine_pollution_dashboard::report::render_summary;

use crate::app;

#[derive(Parser, Debug)]
#[command(
    name = "marine-pollution-dashboard",
    about = "Explore marine pollution incidents in a dashboard or from the command line",
    version
)]
pub(crate) struct Cli {
    #[command(flatten)]
    config: DashboardConfig,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Open the interactive dashboard (default command)
    View,
    /// Print incident metrics, top pollution types, monthly trend and awareness
    Summary(FilterArgs),
    /// Write the filtered incidents to a CSV file
    Export(ExportArgs),
}

#[derive(Args, Debug)]
struct FilterArgs {
    /// Only incidents in this country (exact match)
    #[arg(long)]
    country: Option<String>,
    /// Only incidents of this normalized pollution type, e.g. "Oil Spill"
    #[arg(long)]
    pollution_type: Option<String>,
    /// First day of the date range (YYYY-MM-DD)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day of the date range (YYYY-MM-DD)
    #[arg(long)]
    to: Option<NaiveDate>,
}

impl FilterArgs {
    fn to_filter(&self) -> IncidentFilter {
        IncidentFilter {
            country: self.country.clone(),
            pollution_type: self.pollution_type.clone(),
            dates: DateSelection::from_endpoints(self.from, self.to),
        }
    }
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    filter: FilterArgs,
    /// Destination file
    #[arg(long, short, default_value = EXPORT_FILE_NAME)]
    output: PathBuf,
}

pub(crate) fn run() -> Result<()> {
    let cli = Cli::parse();
    let config = cli.config;

    match cli.command.unwrap_or(Command::View) {
        Command::View => {
            app::run(config).map_err(|e| anyhow::anyhow!("running dashboard: {e}"))
        }
        Command::Summary(args) => {
            let mut cache = DatasetCache::new();
            let dataset = cache
                .get_or_load(&config.data_source())
                .context("loading incident data")?;
            let filtered = filter_dataset(&dataset, &args.to_filter());
            print!("{}", render_summary(&filtered, &dataset, config.top_n));
            Ok(())
        }
        Command::Export(args) => {
            let mut cache = DatasetCache::new();
            let dataset = cache
                .get_or_load(&config.data_source())
                .context("loading incident data")?;
            let filtered = filter_dataset(&dataset, &args.filter.to_filter());
            export_to_path(&filtered, &args.output)
                .with_context(|| format!("writing {}", args.output.display()))?;
            println!(
                "Wrote {} of {} incidents to {}",
                filtered.len(),
                dataset.len(),
                args.output.display()
            );
            Ok(())
        }
    }
}
