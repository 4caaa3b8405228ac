use eframe::egui::{self, RichText, ScrollArea, Ui};

use marine_pollution_dashboard::config::DashboardConfig;

use crate::color::OCEAN_DARK;
use crate::state::AppState;
use crate::ui::{charts, panels, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct MarinePollutionApp {
    pub state: AppState,
}

impl MarinePollutionApp {
    /// Create the app and load the configured source straight away.
    pub fn new(config: DashboardConfig) -> Self {
        let source = config.data_source();
        let mut state = AppState::new(config);
        state.load_source(source);
        Self { state }
    }
}

impl eframe::App for MarinePollutionApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        egui::TopBottomPanel::top("top_bar").show(ctx, |ui| {
            panels::top_bar(ui, &mut self.state);
        });

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: dashboard ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui: &mut Ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("🌍 Marine Pollution Dashboard").size(26.0).color(OCEAN_DARK));
    ui.label("Interactive visualisation of marine pollution incidents.");
    ui.add_space(8.0);

    let Some(dataset) = state.dataset.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a file to explore incidents  (File → Open…)");
        });
        return;
    };

    charts::metrics_row(ui, state);
    ui.separator();

    ui.columns(2, |cols| {
        charts::incident_map(&mut cols[0], state);
        charts::pollution_bar_chart(&mut cols[1], state, &dataset);
    });
    ui.separator();

    charts::trend_chart(ui, state);
    ui.separator();

    charts::awareness_pie(ui, state);
    ui.separator();

    table::detail_table(ui, state);

    ui.add_space(16.0);
    ui.vertical_centered(|ui: &mut Ui| {
        ui.label(
            RichText::new("Made to raise awareness of how much our oceans need protecting.")
                .small()
                .weak(),
        );
    });
}

/// Open the dashboard window.
pub fn run(config: DashboardConfig) -> eframe::Result {
    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1280.0, 860.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Marine Pollution Dashboard",
        options,
        Box::new(|cc| {
            cc.egui_ctx.set_visuals(egui::Visuals::light());
            Ok(Box::new(MarinePollutionApp::new(config)))
        }),
    )
}
