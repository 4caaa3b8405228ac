use std::collections::BTreeMap;
use std::f32::consts::TAU;

use chrono::Datelike;
use eframe::egui::{self, Color32, RichText, Sense, Shape, Stroke, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints, Points};

use marine_pollution_dashboard::data::aggregate::{
    awareness_breakdown, map_points, monthly_trend, summary_metrics,
    top_pollution_types_with_fallback, Awareness, ChartScope,
};
use marine_pollution_dashboard::data::IncidentDataset;

use crate::color::{blues, generate_palette, OCEAN_DARK, OCEAN_MID};
use crate::state::AppState;

const CHART_HEIGHT: f32 = 340.0;

fn section_header(ui: &mut Ui, title: &str, caption: &str) {
    ui.heading(RichText::new(title).color(OCEAN_DARK));
    ui.label(RichText::new(caption).small().weak());
}

fn placeholder(ui: &mut Ui, message: &str) {
    ui.label(RichText::new(format!("ℹ {message}")).italics());
}

// ---------------------------------------------------------------------------
// Headline metrics
// ---------------------------------------------------------------------------

pub fn metrics_row(ui: &mut Ui, state: &AppState) {
    let metrics = summary_metrics(&state.filtered);
    ui.columns(3, |cols| {
        for (col, (label, value)) in cols.iter_mut().zip([
            ("Total incidents", metrics.total_incidents),
            ("Unique countries", metrics.unique_countries),
            ("Unique pollution types", metrics.unique_pollution_types),
        ]) {
            col.vertical(|ui: &mut Ui| {
                ui.label(RichText::new(label).weak());
                ui.label(RichText::new(value.to_string()).size(28.0).strong());
            });
        }
    });
}

// ---------------------------------------------------------------------------
// Incident map (longitude / latitude scatter)
// ---------------------------------------------------------------------------

pub fn incident_map(ui: &mut Ui, state: &AppState) {
    section_header(
        ui,
        "Incident Locations",
        "Geographic position of each incident, coloured by pollution type.",
    );
    if state.filtered.is_empty() {
        placeholder(ui, "The map cannot be drawn because no incidents match the filter.");
        return;
    }

    // One series per pollution type so the legend doubles as a colour key.
    let mut by_type: BTreeMap<String, Vec<[f64; 2]>> = BTreeMap::new();
    for p in map_points(&state.filtered) {
        by_type
            .entry(p.pollution_type)
            .or_default()
            .push([p.longitude, p.latitude]);
    }

    Plot::new("incident_map")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .data_aspect(1.0)
        .include_x(-180.0)
        .include_x(180.0)
        .include_y(-90.0)
        .include_y(90.0)
        .x_axis_label("Longitude")
        .y_axis_label("Latitude")
        .label_formatter(|name, value| {
            if name.is_empty() {
                String::new()
            } else {
                format!("{name}\nlat {:.3}, lon {:.3}", value.y, value.x)
            }
        })
        .show(ui, |plot_ui| {
            for (ptype, coords) in by_type {
                let color = state.color_map.color_for(&ptype);
                plot_ui.points(
                    Points::new(PlotPoints::from(coords))
                        .name(ptype)
                        .color(color)
                        .radius(3.0),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Most common pollution types (bar chart)
// ---------------------------------------------------------------------------

pub fn pollution_bar_chart(ui: &mut Ui, state: &AppState, dataset: &IncidentDataset) {
    let top_n = state.config.top_n;
    section_header(
        ui,
        "Most Common Pollution Types",
        &format!("The {top_n} pollution types that occur most often in the filtered data."),
    );

    let (scope, top) = top_pollution_types_with_fallback(&state.filtered, dataset, top_n);
    if scope == ChartScope::AllData {
        ui.label(
            RichText::new("No incidents match the filter. Showing all countries and pollution types.")
                .color(Color32::from_rgb(0xb2, 0x6a, 0x00)),
        );
    }
    if top.is_empty() {
        placeholder(ui, "No pollution type data to chart for this selection.");
        return;
    }

    let shades = blues(top.len());
    Plot::new("pollution_bar_chart")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .y_axis_label("Incidents")
        .show_x(false)
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            for (i, ((label, count), color)) in top.iter().zip(shades).enumerate() {
                let bar = Bar::new(i as f64, *count as f64).width(0.7);
                plot_ui.bar_chart(BarChart::new(vec![bar]).name(label).color(color));
            }
        });
}

// ---------------------------------------------------------------------------
// Monthly time trend
// ---------------------------------------------------------------------------

pub fn trend_chart(ui: &mut Ui, state: &AppState) {
    section_header(ui, "Incident Trend Over Time", "Number of incidents per month.");
    if state.filtered.is_empty() {
        placeholder(ui, "The time trend cannot be drawn.");
        return;
    }
    let trend = monthly_trend(&state.filtered);
    if trend.is_empty() {
        placeholder(ui, "No valid incident dates in this selection.");
        return;
    }

    // x is a fractional year: 2020.0 = January 2020, 2020.5 = July 2020.
    let coords: Vec<[f64; 2]> = trend
        .iter()
        .map(|(month, n)| {
            let x = month.year() as f64 + month.month0() as f64 / 12.0;
            [x, *n as f64]
        })
        .collect();

    Plot::new("trend_chart")
        .height(CHART_HEIGHT * 0.75)
        .x_axis_label("Month")
        .y_axis_label("Incidents")
        .include_y(0.0)
        .label_formatter(|_, value| {
            let (year, month) = nearest_month(value.x);
            format!("{year}-{month:02}: {:.0} incidents", value.y)
        })
        .show(ui, |plot_ui| {
            plot_ui.line(
                Line::new(PlotPoints::from(coords.clone()))
                    .color(OCEAN_DARK)
                    .width(2.0),
            );
            plot_ui.points(Points::new(PlotPoints::from(coords)).color(OCEAN_MID).radius(3.5));
        });
}

/// Calendar month closest to a fractional-year x coordinate, as (year, 1..=12).
fn nearest_month(x: f64) -> (i32, u32) {
    let months = (x * 12.0).round() as i64;
    (months.div_euclid(12) as i32, months.rem_euclid(12) as u32 + 1)
}

// ---------------------------------------------------------------------------
// Public awareness (donut chart)
// ---------------------------------------------------------------------------

pub fn awareness_pie(ui: &mut Ui, state: &AppState) {
    section_header(
        ui,
        "Public Awareness and Education",
        "How aware the public was of each incident.",
    );
    if state.filtered.is_empty() {
        placeholder(ui, "The awareness chart cannot be drawn because no incidents match the filter.");
        return;
    }
    let counts = match awareness_breakdown(&state.filtered) {
        Awareness::ColumnMissing => {
            placeholder(ui, "The 'aware_ans' column is not present in this dataset.");
            return;
        }
        Awareness::Counts(counts) if counts.is_empty() => {
            placeholder(ui, "No 'aware_ans' answers for the selected filter.");
            return;
        }
        Awareness::Counts(counts) => counts,
    };

    let total: usize = counts.iter().map(|(_, n)| n).sum();
    let colors = generate_palette(counts.len());

    ui.horizontal(|ui: &mut Ui| {
        let size = 220.0;
        let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let radius = size * 0.48;

        let mut angle = -TAU / 4.0;
        for ((_, n), color) in counts.iter().zip(&colors) {
            let sweep = TAU * (*n as f32 / total as f32);
            // Fan of thin triangles; each is convex even when the slice is not.
            let steps = ((sweep / TAU) * 96.0).ceil().max(1.0) as usize;
            for s in 0..steps {
                let a0 = angle + sweep * s as f32 / steps as f32;
                let a1 = angle + sweep * (s + 1) as f32 / steps as f32;
                let p0 = center + radius * egui::vec2(a0.cos(), a0.sin());
                let p1 = center + radius * egui::vec2(a1.cos(), a1.sin());
                painter.add(Shape::convex_polygon(vec![center, p0, p1], *color, Stroke::NONE));
            }
            angle += sweep;
        }
        painter.circle_filled(center, radius * 0.3, ui.visuals().panel_fill);

        ui.vertical(|ui: &mut Ui| {
            for ((answer, n), color) in counts.iter().zip(&colors) {
                let pct = 100.0 * *n as f64 / total as f64;
                ui.horizontal(|ui: &mut Ui| {
                    ui.label(RichText::new("■").color(*color));
                    ui.label(format!("{answer}: {n} ({pct:.1}%)"));
                });
            }
        });
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hover_month_stays_in_calendar_range() {
        assert_eq!(nearest_month(2020.0), (2020, 1));
        assert_eq!(nearest_month(2020.0 + 11.0 / 12.0), (2020, 12));
        assert_eq!(nearest_month(2020.0 + 11.4 / 12.0), (2020, 12));
        assert_eq!(nearest_month(2020.0 + 11.7 / 12.0), (2021, 1));
        assert_eq!(nearest_month(2020.0 + 1.0 / 12.0), (2020, 2));
    }
}
