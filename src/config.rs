use std::path::PathBuf;

use clap::Args;

use crate::data::DataSource;

/// Workbook loaded when nothing else is configured.
pub const DEFAULT_SOURCE: &str = "Marine Pollution data.xlsx";

/// Sheet holding the observations inside the default workbook.
pub const DEFAULT_SHEET: &str = "ENV_Marine_Pollution_Obs_data_v";

/// Number of bars in the "most common pollution types" chart.
pub const DEFAULT_TOP_N: usize = 10;

/// Settings shared by the dashboard and the headless commands.
///
/// Every value can come from a flag or an environment variable.
#[derive(Args, Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Incident data file (.xlsx, .csv, .parquet or .json)
    #[arg(long, global = true, env = "MARINE_DASHBOARD_SOURCE", default_value = DEFAULT_SOURCE)]
    pub source: PathBuf,

    /// Sheet to read when the source is a workbook
    #[arg(long, global = true, env = "MARINE_DASHBOARD_SHEET", default_value = DEFAULT_SHEET)]
    pub sheet: String,

    /// How many pollution types the bar chart shows
    #[arg(long, global = true, env = "MARINE_DASHBOARD_TOP_N", default_value_t = DEFAULT_TOP_N)]
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from(DEFAULT_SOURCE),
            sheet: DEFAULT_SHEET.to_string(),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    pub fn data_source(&self) -> DataSource {
        DataSource::new(self.source.clone(), self.sheet.clone())
    }
}
