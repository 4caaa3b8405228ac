use eframe::egui::{self, RichText, Ui};
use egui_extras::{Column, TableBuilder};

use marine_pollution_dashboard::data::model::format_timestamp;
use marine_pollution_dashboard::data::schema::EXPORT_COLUMNS;

use crate::color::OCEAN_DARK;
use crate::state::AppState;
use crate::ui::panels::save_export_dialog;

const ROW_HEIGHT: f32 = 18.0;

/// Detail table of the filtered incidents plus the export button.
pub fn detail_table(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("Incident Details").color(OCEAN_DARK));
    if state.filtered.is_empty() {
        ui.label(RichText::new("ℹ The data table cannot be shown.").italics());
        return;
    }

    let records = &state.filtered.records;
    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .cell_layout(egui::Layout::left_to_right(egui::Align::Center))
        .columns(Column::auto().at_least(80.0), EXPORT_COLUMNS.len() - 1)
        .column(Column::remainder())
        .min_scrolled_height(0.0)
        .max_scroll_height(300.0)
        .header(20.0, |mut header| {
            for name in EXPORT_COLUMNS {
                header.col(|ui| {
                    ui.strong(name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, records.len(), |mut row| {
                let rec = &records[row.index()];
                let cells = [
                    rec.country.clone().unwrap_or_default(),
                    rec.incident_date
                        .as_ref()
                        .map(format_timestamp)
                        .unwrap_or_default(),
                    rec.pollution_type.clone(),
                    rec.material.clone().unwrap_or_default(),
                    format!("{:.4}", rec.latitude),
                    format!("{:.4}", rec.longitude),
                ];
                for cell in cells {
                    row.col(|ui| {
                        ui.label(cell);
                    });
                }
            });
        });

    ui.add_space(8.0);
    if ui.button("⬇ Download filtered data (.csv)").clicked() {
        save_export_dialog(state);
    }
}
