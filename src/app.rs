use eframe::egui::{self, RichText, ScrollArea, Ui};

use crate::data::service::DatasetService;
use crate::state::{AppState, ChartTab};
use crate::ui::panels::{self, PanelAction};
use crate::ui::{plot, table};

// ---------------------------------------------------------------------------
// eframe App implementation
// ---------------------------------------------------------------------------

pub struct BikeDashApp {
    /// Source of the current dataset; replaced when another file is opened.
    service: DatasetService,
    pub state: AppState,
}

impl BikeDashApp {
    pub fn new(service: DatasetService, state: AppState) -> Self {
        Self { service, state }
    }

    fn open(&mut self, path: std::path::PathBuf) {
        log::info!("Opening {}", path.display());
        self.service = DatasetService::new(path);
        self.state.load_from(&self.service);
    }
}

impl eframe::App for BikeDashApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // ---- Top panel: menu bar ----
        let action = egui::TopBottomPanel::top("top_bar")
            .show(ctx, |ui| panels::top_bar(ui, &self.state))
            .inner;
        if let PanelAction::OpenFile(path) = action {
            self.open(path);
        }

        // ---- Left side panel: filters ----
        egui::SidePanel::left("filter_panel")
            .default_width(240.0)
            .resizable(true)
            .show(ctx, |ui| {
                panels::side_panel(ui, &mut self.state);
            });

        // ---- Central panel: metrics, charts, preview ----
        egui::CentralPanel::default().show(ctx, |ui| {
            ScrollArea::vertical()
                .auto_shrink([false, false])
                .show(ui, |ui| dashboard(ui, &mut self.state));
        });
    }
}

fn dashboard(ui: &mut Ui, state: &mut AppState) {
    ui.heading(RichText::new("🛵 Sri Lanka Used Bike Market Analysis").size(26.0));
    ui.label(
        "Explore the Sri Lankan used bike market with interactive filters and visualizations. \
         Data sourced from ikman.lk (up to 2023).",
    );

    if state.dataset.is_none() {
        ui.add_space(20.0);
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No dataset loaded  (File → Open…)");
        });
        return;
    }

    ui.add_space(8.0);
    panels::kpi_row(ui, state);
    ui.separator();

    ui.heading("📈 Market Insights");
    ui.horizontal(|ui: &mut Ui| {
        ui.selectable_value(&mut state.tab, ChartTab::Overview, "Overview");
        ui.selectable_value(&mut state.tab, ChartTab::DetailedAnalysis, "Detailed Analysis");
    });
    ui.add_space(6.0);

    let state = &*state;
    match state.tab {
        ChartTab::Overview => {
            ui.columns(2, |cols| {
                plot::brand_counts(&mut cols[0], state);
                plot::year_histogram(&mut cols[1], state);
            });
        }
        ChartTab::DetailedAnalysis => {
            ui.columns(2, |cols| {
                plot::price_by_brand(&mut cols[0], state);
                plot::year_vs_price(&mut cols[1], state);
            });
            ui.add_space(10.0);
            plot::bike_type_pie(ui, state);
        }
    }

    ui.separator();
    table::preview_table(ui, state);
    ui.separator();
    panels::footer(ui);
}
