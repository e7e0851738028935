use std::collections::BTreeSet;
use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::color::ColorMap;
use crate::data::model::RangeBounds;
use crate::state::AppState;
use crate::ui::format;

/// What the caller must do after a panel was drawn.
pub enum PanelAction {
    None,
    OpenFile(PathBuf),
}

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("🔍 Filter Options");
    ui.separator();

    if state.dataset.is_none() {
        ui.label("No dataset loaded.");
        return;
    }

    // Clone what we need so we can mutate state inside the loops.
    let brands = state.domains.brands.clone();
    let bike_types = state.domains.bike_types.clone();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            let brand_colors = state.brand_colors.clone();
            let picked = category_filter(
                ui,
                "Select Brand",
                &brands,
                &state.selection.brands,
                Some(&brand_colors),
            );
            match picked {
                CategoryAction::All => state.select_all_brands(),
                CategoryAction::None => state.select_no_brands(),
                CategoryAction::Toggle(brand) => state.toggle_brand(&brand),
                CategoryAction::Unchanged => {}
            }

            let picked = category_filter(
                ui,
                "Select Bike Type",
                &bike_types,
                &state.selection.bike_types,
                None,
            );
            match picked {
                CategoryAction::All => state.select_all_bike_types(),
                CategoryAction::None => state.select_no_bike_types(),
                CategoryAction::Toggle(t) => state.toggle_bike_type(&t),
                CategoryAction::Unchanged => {}
            }

            ui.separator();
            year_sliders(ui, state);
            ui.separator();
            price_sliders(ui, state);
        });
}

enum CategoryAction {
    Unchanged,
    All,
    None,
    Toggle(String),
}

/// Collapsible checkbox list with All / None buttons.
fn category_filter(
    ui: &mut Ui,
    title: &str,
    all_values: &BTreeSet<String>,
    selected: &BTreeSet<String>,
    colors: Option<&ColorMap>,
) -> CategoryAction {
    let mut action = CategoryAction::Unchanged;

    // Show count of selected / total in the header
    let header_text = format!("{title}  ({}/{})", selected.len(), all_values.len());

    egui::CollapsingHeader::new(RichText::new(header_text).strong())
        .id_salt(title)
        .default_open(true)
        .show(ui, |ui: &mut Ui| {
            ui.horizontal(|ui: &mut Ui| {
                if ui.small_button("All").clicked() {
                    action = CategoryAction::All;
                }
                if ui.small_button("None").clicked() {
                    action = CategoryAction::None;
                }
            });

            for value in all_values {
                let mut text = RichText::new(value);
                if let Some(cm) = colors {
                    text = text.color(cm.color_for(value));
                }

                let mut checked = selected.contains(value);
                if ui.checkbox(&mut checked, text).changed() {
                    action = CategoryAction::Toggle(value.clone());
                }
            }
        });

    action
}

fn year_sliders(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Select Year Range");
    let Some(bounds) = state.domains.year_bounds else {
        ui.label("No year values.");
        return;
    };

    let mut low = state.selection.years.low;
    let mut high = state.selection.years.high;
    let from = ui.add(Slider::new(&mut low, bounds.low..=bounds.high).text("From"));
    let to = ui.add(Slider::new(&mut high, bounds.low..=bounds.high).text("To"));

    if from.changed() || to.changed() {
        state.set_year_range(low, high);
    }
}

fn price_sliders(ui: &mut Ui, state: &mut AppState) {
    ui.strong("Price Range (LKR)");
    let Some(bounds) = state.domains.price_bounds else {
        ui.label("No price values.");
        return;
    };

    let step = state.config.price_step;
    let mut low = state.selection.prices.low;
    let mut high = state.selection.prices.high;
    let from = ui.add(price_slider(&mut low, bounds, step, "From"));
    let to = ui.add(price_slider(&mut high, bounds, step, "To"));

    if from.changed() || to.changed() {
        state.set_price_range(low, high);
    }
}

fn price_slider<'a>(
    value: &'a mut f64,
    bounds: RangeBounds<f64>,
    step: f64,
    label: &str,
) -> Slider<'a> {
    Slider::new(value, bounds.low..=bounds.high)
        .step_by(step)
        .custom_formatter(|v, _| format::thousands(v))
        .text(label.to_string())
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &AppState) -> PanelAction {
    let mut action = PanelAction::None;

    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                if let Some(path) = open_file_dialog() {
                    action = PanelAction::OpenFile(path);
                }
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} listings loaded from {}, {} visible",
                ds.len(),
                ds.source.display(),
                state.visible_indices.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.separator();
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    action
}

// ---------------------------------------------------------------------------
// KPI cards and footer
// ---------------------------------------------------------------------------

/// The three headline metrics side by side.
pub fn kpi_row(ui: &mut Ui, state: &AppState) {
    ui.heading("📌 Key Market Stats");
    let kpis = &state.view.kpis;
    let cards = [
        ("Total Listings", format::count(kpis.count)),
        ("Average Price (LKR)", format::mean_price(kpis.mean_price)),
        ("Average Year", format::mean_year(kpis.mean_year)),
    ];

    ui.columns(cards.len(), |cols| {
        for (ui, (title, value)) in cols.iter_mut().zip(cards.iter()) {
            egui::Frame::group(ui.style()).show(ui, |ui: &mut Ui| {
                ui.set_width(ui.available_width());
                ui.label(RichText::new(*title).small());
                ui.label(RichText::new(value).size(24.0).strong());
            });
        }
    });
}

pub fn footer(ui: &mut Ui) {
    ui.horizontal_wrapped(|ui: &mut Ui| {
        ui.label("🔧 Data from");
        ui.hyperlink_to("ikman.lk", "https://ikman.lk");
        ui.label("via");
        ui.hyperlink_to("Kaggle", "https://www.kaggle.com");
        ui.label("| Powered by egui");
    });
}

// ---------------------------------------------------------------------------
// File dialog
// ---------------------------------------------------------------------------

pub fn open_file_dialog() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title("Open bike listings")
        .add_filter("Supported files", &["csv", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}
