//! Plain-text rendering of the dashboard summaries for the command line.

use std::fmt::Write as _;

use crate::data::aggregate::{
    awareness_breakdown, monthly_trend, summary_metrics, top_pollution_types_with_fallback,
    Awareness, ChartScope,
};
use crate::data::IncidentDataset;

/// Render metrics, top pollution types, monthly trend and awareness answers
/// for `filtered`, with `full` as the bar chart fallback.
pub fn render_summary(filtered: &IncidentDataset, full: &IncidentDataset, top_n: usize) -> String {
    let mut out = String::new();
    let metrics = summary_metrics(filtered);

    let _ = writeln!(out, "Total incidents:        {}", metrics.total_incidents);
    let _ = writeln!(out, "Unique countries:       {}", metrics.unique_countries);
    let _ = writeln!(out, "Unique pollution types: {}", metrics.unique_pollution_types);

    let (scope, top) = top_pollution_types_with_fallback(filtered, full, top_n);
    let _ = writeln!(out);
    match scope {
        ChartScope::Filtered => {
            let _ = writeln!(out, "Top {top_n} pollution types:");
        }
        ChartScope::AllData => {
            let _ = writeln!(
                out,
                "No incidents match the filter. Top {top_n} pollution types (all data):"
            );
        }
    }
    if top.is_empty() {
        let _ = writeln!(out, "  (no data)");
    }
    for (label, count) in &top {
        let _ = writeln!(out, "  {count:>6}  {label}");
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Incidents per month:");
    let trend = monthly_trend(filtered);
    if trend.is_empty() {
        let _ = writeln!(out, "  (no valid dates)");
    }
    for (month, count) in &trend {
        let _ = writeln!(out, "  {}  {count:>6}", month.format("%Y-%m"));
    }

    let _ = writeln!(out);
    let _ = writeln!(out, "Public awareness (aware_ans):");
    match awareness_breakdown(filtered) {
        Awareness::ColumnMissing => {
            let _ = writeln!(out, "  (column not present in this dataset)");
        }
        Awareness::Counts(counts) if counts.is_empty() => {
            let _ = writeln!(out, "  (no answers for this filter)");
        }
        Awareness::Counts(counts) => {
            for (answer, count) in &counts {
                let _ = writeln!(out, "  {count:>6}  {answer}");
            }
        }
    }

    out
}
