use eframe::egui::{RichText, Ui};
use egui_extras::{Column, TableBuilder};

use crate::data::model::TYPED_COLUMNS;
use crate::state::AppState;
use crate::ui::format;

const ROW_HEIGHT: f32 = 20.0;

// ---------------------------------------------------------------------------
// Preview of the first filtered listings
// ---------------------------------------------------------------------------

/// Table of the first `config.preview_rows` visible listings.
pub fn preview_table(ui: &mut Ui, state: &AppState) {
    ui.heading("📄 Top Listings");

    let Some(dataset) = &state.dataset else {
        return;
    };
    let rows: Vec<usize> = state
        .visible_indices
        .iter()
        .copied()
        .take(state.config.preview_rows)
        .collect();

    if rows.is_empty() {
        ui.label("No listings match the current filters.");
        return;
    }

    let headers: Vec<&str> = TYPED_COLUMNS
        .iter()
        .copied()
        .chain(dataset.extra_columns.iter().map(String::as_str))
        .collect();

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .vscroll(false)
        .columns(Column::auto().at_least(80.0), headers.len())
        .header(ROW_HEIGHT + 4.0, |mut header| {
            for name in &headers {
                header.col(|ui: &mut Ui| {
                    ui.strong(*name);
                });
            }
        })
        .body(|body| {
            body.rows(ROW_HEIGHT, rows.len(), |mut row| {
                let listing = &dataset.listings[rows[row.index()]];

                row.col(|ui: &mut Ui| {
                    ui.label(listing.brand.as_deref().unwrap_or(""));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.bike_type.as_deref().unwrap_or(""));
                });
                row.col(|ui: &mut Ui| {
                    ui.label(listing.year.map(|y| y.to_string()).unwrap_or_default());
                });
                row.col(|ui: &mut Ui| {
                    let price = listing.price.map(format::currency).unwrap_or_default();
                    ui.label(RichText::new(price).monospace());
                });
                for cell in &listing.extra {
                    row.col(|ui: &mut Ui| {
                        ui.label(cell);
                    });
                }
            });
        });
}
