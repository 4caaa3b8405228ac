//! Summaries derived from a (usually filtered) dataset for the dashboard
//! views. Every function returns empty or zero results for an empty dataset.

use std::collections::{BTreeMap, HashMap};

use chrono::{Datelike, NaiveDate};

use super::model::IncidentDataset;
use super::schema::AWARE_ANS;

/// Headline numbers shown above the charts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SummaryMetrics {
    pub total_incidents: usize,
    pub unique_countries: usize,
    pub unique_pollution_types: usize,
}

pub fn summary_metrics(dataset: &IncidentDataset) -> SummaryMetrics {
    SummaryMetrics {
        total_incidents: dataset.len(),
        unique_countries: dataset.countries.len(),
        unique_pollution_types: dataset.pollution_types.len(),
    }
}

/// Count occurrences and sort by count descending, then label ascending.
fn ranked_counts<'a>(labels: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for label in labels {
        *counts.entry(label).or_default() += 1;
    }
    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(label, n)| (label.to_string(), n))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
    ranked
}

/// The `n` most frequent pollution types.
pub fn top_pollution_types(dataset: &IncidentDataset, n: usize) -> Vec<(String, usize)> {
    let mut ranked = ranked_counts(dataset.records.iter().map(|r| r.pollution_type.as_str()));
    ranked.truncate(n);
    ranked
}

/// Which rows fed the bar chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartScope {
    Filtered,
    /// The filter matched nothing, so the full dataset is shown instead.
    AllData,
}

/// Top pollution types of `filtered`, falling back to `full` when the filter
/// matched nothing.
pub fn top_pollution_types_with_fallback(
    filtered: &IncidentDataset,
    full: &IncidentDataset,
    n: usize,
) -> (ChartScope, Vec<(String, usize)>) {
    if filtered.is_empty() && !full.is_empty() {
        (ChartScope::AllData, top_pollution_types(full, n))
    } else {
        (ChartScope::Filtered, top_pollution_types(filtered, n))
    }
}

/// Incident counts per calendar month, keyed by the first day of the month.
/// Undated rows are skipped.
pub fn monthly_trend(dataset: &IncidentDataset) -> BTreeMap<NaiveDate, usize> {
    let mut trend = BTreeMap::new();
    for day in dataset.records.iter().filter_map(|r| r.incident_day()) {
        if let Some(month) = NaiveDate::from_ymd_opt(day.year(), day.month(), 1) {
            *trend.entry(month).or_default() += 1;
        }
    }
    trend
}

/// Breakdown of the public-awareness answers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Awareness {
    /// The source has no `aware_ans` column.
    ColumnMissing,
    /// Counts per non-missing answer, most frequent first. May be empty.
    Counts(Vec<(String, usize)>),
}

pub fn awareness_breakdown(dataset: &IncidentDataset) -> Awareness {
    if !dataset.has_column(AWARE_ANS) {
        return Awareness::ColumnMissing;
    }
    Awareness::Counts(ranked_counts(
        dataset.records.iter().filter_map(|r| r.aware_ans.as_deref()),
    ))
}

/// A map marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MapPoint {
    pub longitude: f64,
    pub latitude: f64,
    pub pollution_type: String,
    pub country: Option<String>,
}

pub fn map_points(dataset: &IncidentDataset) -> Vec<MapPoint> {
    dataset
        .records
        .iter()
        .map(|r| MapPoint {
            longitude: r.longitude,
            latitude: r.latitude,
            pollution_type: r.pollution_type.clone(),
            country: r.country.clone(),
        })
        .collect()
}
