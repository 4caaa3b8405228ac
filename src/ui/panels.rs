use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};
use egui_extras::DatePickerButton;

use marine_pollution_dashboard::data::export::EXPORT_FILE_NAME;
use marine_pollution_dashboard::data::DataSource;

use crate::color::OCEAN_DARK;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("Filter Data").color(OCEAN_DARK));
    ui.separator();

    // Cheap `Arc` clone so we can mutate state inside the widgets.
    let Some(dataset) = state.dataset.clone() else {
        ui.label("No dataset loaded.");
        return;
    };

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // ---- Date range ----
            ui.strong("Date range");
            let (lo, hi) = state.date_bounds;
            let mut start = state.date_start;
            let mut end = state.date_end;
            egui::Grid::new("date_range").num_columns(2).show(ui, |ui: &mut Ui| {
                ui.label("From");
                ui.add(DatePickerButton::new(&mut start).id_salt("date_start"));
                ui.end_row();
                ui.label("To");
                ui.add(DatePickerButton::new(&mut end).id_salt("date_end"));
                ui.end_row();
            });
            let start = start.clamp(lo, hi);
            let end = end.clamp(lo, hi);
            if (start, end) != (state.date_start, state.date_end) {
                state.set_date_range(start, end);
            }
            if start > end {
                ui.label(
                    RichText::new("Start is after end: showing the start day only.")
                        .small()
                        .color(Color32::DARK_RED),
                );
            }
            if ui.small_button("Full range").clicked() {
                state.set_date_range(lo, hi);
            }
            ui.separator();

            // ---- Country ----
            ui.strong("Country");
            let mut country = state.selected_country.clone();
            egui::ComboBox::from_id_salt("country")
                .selected_text(country.as_deref().unwrap_or("All countries"))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut country, None, "All countries");
                    for c in &dataset.countries {
                        ui.selectable_value(&mut country, Some(c.clone()), c.as_str());
                    }
                });
            if country != state.selected_country {
                state.set_country(country);
            }
            ui.separator();

            // ---- Pollution type (with colour swatches) ----
            ui.strong("Pollution type");
            let mut ptype = state.selected_pollution_type.clone();
            egui::ComboBox::from_id_salt("pollution_type")
                .selected_text(ptype.as_deref().unwrap_or("All pollution types"))
                .width(ui.available_width())
                .show_ui(ui, |ui: &mut Ui| {
                    ui.selectable_value(&mut ptype, None, "All pollution types");
                    for (t, color) in state.color_map.legend_entries() {
                        let text = RichText::new(t.as_str()).color(color);
                        ui.selectable_value(&mut ptype, Some(t), text);
                    }
                });
            if ptype != state.selected_pollution_type {
                state.set_pollution_type(ptype);
            }

            ui.add_space(16.0);
            ui.separator();
            ui.label(RichText::new("Protect the ocean, protect the future.").italics());
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            if ui
                .add_enabled(state.source.is_some(), egui::Button::new("Reload"))
                .clicked()
            {
                state.reload();
                ui.close_menu();
            }
            if ui
                .add_enabled(!state.filtered.is_empty(), egui::Button::new("Export filtered CSV…"))
                .clicked()
            {
                save_export_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} incidents loaded, {} shown",
                ds.len(),
                state.filtered.len()
            ));
            ui.separator();
        }

        if let Some(msg) = &state.status_message {
            let color = if msg.starts_with("Error") {
                Color32::RED
            } else {
                OCEAN_DARK
            };
            ui.label(RichText::new(msg).color(color));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Open marine pollution data")
        .add_filter(
            "Supported files",
            &["xlsx", "xlsm", "xls", "ods", "csv", "parquet", "pq", "json"],
        )
        .add_filter("Spreadsheet", &["xlsx", "xlsm", "xls", "ods"])
        .add_filter("CSV", &["csv"])
        .add_filter("Parquet", &["parquet", "pq"])
        .add_filter("JSON", &["json"])
        .pick_file();

    if let Some(path) = file {
        let sheet = state.config.sheet.clone();
        state.load_source(DataSource::new(path, sheet));
    }
}

pub fn save_export_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Export filtered incidents")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        state.export_filtered(&path);
    }
}
