use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;

use marine_pollution_dashboard::config::DashboardConfig;
use marine_pollution_dashboard::data::cache::{DatasetCache, SourceKey};
use marine_pollution_dashboard::data::export::export_to_path;
use marine_pollution_dashboard::data::{
    filter_dataset, DataError, DataSource, DateSelection, IncidentDataset, IncidentFilter,
};

use crate::color::ColorMap;

/// Date picker bounds used when the dataset has no valid dates.
fn fallback_date_bounds() -> (NaiveDate, NaiveDate) {
    let earliest = NaiveDate::from_ymd_opt(1900, 1, 1).unwrap_or(NaiveDate::MIN);
    (earliest, chrono::Local::now().date_naive())
}

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Normalized datasets loaded during this session.
    pub cache: DatasetCache,

    /// Source of the dataset on screen.
    pub source: Option<DataSource>,

    /// Cache key the dataset on screen was stored under.
    pub source_key: Option<SourceKey>,

    /// Normalized dataset (None until a file loads).
    pub dataset: Option<Arc<IncidentDataset>>,

    /// `None` means all countries.
    pub selected_country: Option<String>,

    /// `None` means all pollution types.
    pub selected_pollution_type: Option<String>,

    /// Inclusive date picker selection.
    pub date_start: NaiveDate,
    pub date_end: NaiveDate,

    /// Picker limits, from the dataset's date bounds.
    pub date_bounds: (NaiveDate, NaiveDate),

    /// Incidents passing the current filter (recomputed on every change).
    pub filtered: IncidentDataset,

    /// Pollution type colours.
    pub color_map: ColorMap,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(config: DashboardConfig) -> Self {
        let (start, end) = fallback_date_bounds();
        Self {
            config,
            cache: DatasetCache::new(),
            source: None,
            source_key: None,
            dataset: None,
            selected_country: None,
            selected_pollution_type: None,
            date_start: start,
            date_end: end,
            date_bounds: (start, end),
            filtered: IncidentDataset::from_records(Vec::new(), Vec::new()),
            color_map: ColorMap::default(),
            status_message: None,
        }
    }

    /// Load `source` through the cache and show it.
    pub fn load_source(&mut self, source: DataSource) {
        let loaded = SourceKey::for_source(&source)
            .and_then(|key| self.cache.get_or_load(&source).map(|dataset| (key, dataset)));
        match loaded {
            Ok((key, dataset)) => {
                log::info!(
                    "Loaded {} incidents with columns {:?}",
                    dataset.len(),
                    dataset.column_names
                );
                self.source = Some(source);
                self.source_key = Some(key);
                self.set_dataset(dataset);
            }
            Err(e) => self.report_load_error(&e),
        }
    }

    /// Drop the cached copy of the current source and read it again.
    ///
    /// The entry is removed under the key it was loaded with, which differs
    /// from the file's current key once the file has been edited.
    pub fn reload(&mut self) {
        let Some(source) = self.source.clone() else {
            return;
        };
        if let Some(key) = self.source_key.take() {
            self.cache.invalidate(&key);
        }
        self.load_source(source);
    }

    fn report_load_error(&mut self, e: &DataError) {
        log::error!("Failed to load data: {e:#}");
        self.dataset = None;
        self.source_key = None;
        self.filtered = IncidentDataset::from_records(Vec::new(), Vec::new());
        self.status_message = Some(format!("Error: {e}"));
    }

    /// Ingest a newly loaded dataset, reset selections and colours.
    pub fn set_dataset(&mut self, dataset: Arc<IncidentDataset>) {
        self.selected_country = None;
        self.selected_pollution_type = None;
        self.date_bounds = dataset.date_bounds.unwrap_or_else(fallback_date_bounds);
        (self.date_start, self.date_end) = self.date_bounds;
        self.color_map = ColorMap::new(&dataset.pollution_types);

        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// The filter described by the current widget selections.
    pub fn current_filter(&self) -> IncidentFilter {
        IncidentFilter {
            country: self.selected_country.clone(),
            pollution_type: self.selected_pollution_type.clone(),
            dates: Some(DateSelection::Range {
                start: self.date_start,
                end: self.date_end,
            }),
        }
    }

    /// Recompute `filtered` after a selection change.
    pub fn refilter(&mut self) {
        if let Some(ds) = &self.dataset {
            self.filtered = filter_dataset(ds, &self.current_filter());
        }
    }

    pub fn set_country(&mut self, country: Option<String>) {
        self.selected_country = country;
        self.refilter();
    }

    pub fn set_pollution_type(&mut self, pollution_type: Option<String>) {
        self.selected_pollution_type = pollution_type;
        self.refilter();
    }

    pub fn set_date_range(&mut self, start: NaiveDate, end: NaiveDate) {
        self.date_start = start;
        self.date_end = end;
        self.refilter();
    }

    /// Write the filtered incidents to `path`, reporting the outcome in the
    /// status line.
    pub fn export_filtered(&mut self, path: &Path) {
        match export_to_path(&self.filtered, path) {
            Ok(()) => {
                self.status_message = Some(format!(
                    "Exported {} incidents to {}",
                    self.filtered.len(),
                    path.display()
                ));
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status_message = Some(format!("Error: export failed: {e}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use marine_pollution_dashboard::data::IncidentRecord;

    use super::*;

    fn incident(country: &str, ptype: &str, date: Option<(i32, u32, u32)>) -> IncidentRecord {
        IncidentRecord {
            country: Some(country.to_string()),
            incident_date: date
                .and_then(|(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
                .and_then(|d| d.and_hms_opt(0, 0, 0)),
            pollution_quantity: None,
            latitude: 1.3,
            longitude: 103.8,
            pollution_type: ptype.to_string(),
            material: None,
            aware_ans: None,
            extra: BTreeMap::new(),
        }
    }

    fn loaded_state() -> AppState {
        let mut state = AppState::new(DashboardConfig::default());
        state.set_dataset(Arc::new(IncidentDataset::from_records(
            vec![
                incident("Indonesia", "Oil Spill", Some((2020, 1, 1))),
                incident("Indonesia", "Plastic Waste", Some((2021, 6, 1))),
                incident("Singapore", "Oil Spill", Some((2020, 3, 1))),
                incident("Singapore", "Oil Spill", None),
            ],
            Vec::new(),
        )));
        state
    }

    #[test]
    fn new_dataset_selects_full_date_span() {
        let state = loaded_state();
        assert_eq!(
            (state.date_start, state.date_end),
            (
                NaiveDate::from_ymd_opt(2020, 1, 1).unwrap(),
                NaiveDate::from_ymd_opt(2021, 6, 1).unwrap()
            )
        );
        // The picker always constrains dates, so undated rows are hidden.
        assert_eq!(state.filtered.len(), 3);
    }

    #[test]
    fn selections_narrow_the_view() {
        let mut state = loaded_state();
        state.set_country(Some("Indonesia".into()));
        assert_eq!(state.filtered.len(), 2);

        state.set_pollution_type(Some("Oil Spill".into()));
        assert_eq!(state.filtered.len(), 1);

        state.set_country(None);
        state.set_pollution_type(None);
        let d = NaiveDate::from_ymd_opt(2020, 3, 1).unwrap();
        state.set_date_range(d, d);
        assert_eq!(state.filtered.len(), 1);
    }

    #[test]
    fn missing_source_sets_error_status() {
        let mut state = AppState::new(DashboardConfig::default());
        state.load_source(DataSource::new("/no/such/marine.xlsx", "Sheet1"));
        assert!(state.dataset.is_none());
        assert!(state
            .status_message
            .as_deref()
            .is_some_and(|m| m.starts_with("Error")));
    }

    #[test]
    fn reload_after_edit_replaces_the_cached_entry() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("incidents.csv");
        let header = "Country,inc_date,pollution_qty,LAT_1,LONG,pollution_type\n";
        std::fs::write(&path, format!("{header}Fiji,2020-01-01,1,-17.7,178.0,Sewage\n")).unwrap();

        let mut state = AppState::new(DashboardConfig::default());
        state.load_source(DataSource::new(&path, "Sheet1"));
        assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(1));

        std::fs::write(
            &path,
            format!("{header}Fiji,2020-01-01,1,-17.7,178.0,Sewage\nTonga,2020-02-02,2,-21.1,-175.2,Oil spill\n"),
        )
        .unwrap();
        // Force a distinct modification time regardless of filesystem granularity.
        std::fs::File::options()
            .write(true)
            .open(&path)
            .unwrap()
            .set_modified(std::time::SystemTime::now() + std::time::Duration::from_secs(120))
            .unwrap();

        state.reload();
        assert_eq!(state.dataset.as_ref().map(|d| d.len()), Some(2));
        assert_eq!(state.cache.len(), 1);
        assert_eq!(
            state.source_key,
            Some(SourceKey::for_source(&DataSource::new(&path, "Sheet1")).unwrap())
        );
    }
}
