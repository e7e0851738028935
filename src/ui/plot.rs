use std::collections::BTreeMap;
use std::f32::consts::TAU;
use std::ops::RangeInclusive;

use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, RichText, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoints, Points,
};

use crate::data::summary::ScatterPoint;
use crate::state::AppState;
use crate::ui::format;

const CHART_HEIGHT: f32 = 320.0;

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Axis formatter that shows category names at integer positions.
fn category_axis(names: Vec<String>) -> impl Fn(GridMark, &RangeInclusive<f64>) -> String {
    move |mark: GridMark, _range: &RangeInclusive<f64>| {
        let pos = mark.value.round();
        if (mark.value - pos).abs() > f64::EPSILON || pos < 0.0 {
            return String::new();
        }
        names.get(pos as usize).cloned().unwrap_or_default()
    }
}

fn chart_title(ui: &mut Ui, title: &str) {
    ui.label(RichText::new(title).size(15.0).strong());
}

// ---------------------------------------------------------------------------
// Overview tab
// ---------------------------------------------------------------------------

/// Bar chart of listing counts per brand.
pub fn brand_counts(ui: &mut Ui, state: &AppState) {
    chart_title(ui, "📦 Listings by Brand");

    let names: Vec<String> = state.view.brand_counts.keys().cloned().collect();
    let bars: Vec<Bar> = state
        .view
        .brand_counts
        .iter()
        .enumerate()
        .map(|(i, (brand, &n))| {
            Bar::new(i as f64, n as f64)
                .width(0.8)
                .name(brand)
                .fill(state.brand_colors.color_for(brand))
        })
        .collect();

    Plot::new("brand_counts")
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(names))
        .y_axis_label("count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Listings"));
        });
}

/// Year histogram with one bar per bin.
pub fn year_histogram(ui: &mut Ui, state: &AppState) {
    chart_title(ui, "📅 Distribution by Year");

    let total = state.view.year_histogram.total();
    let bars: Vec<Bar> = state
        .view
        .year_histogram
        .bins
        .iter()
        .map(|bin| {
            Bar::new((bin.start + bin.end) / 2.0, bin.count as f64)
                .width(bin.end - bin.start)
                .name(format!("{:.1} – {:.1}", bin.start, bin.end))
        })
        .collect();

    Plot::new("year_histogram")
        .height(CHART_HEIGHT)
        .x_axis_label("Year")
        .y_axis_label("count")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(
                BarChart::new(bars)
                    .name(format!("Listings ({total})"))
                    .color(Color32::from_rgb(74, 105, 189)),
            );
        });
}

// ---------------------------------------------------------------------------
// Detailed analysis tab
// ---------------------------------------------------------------------------

/// Box plot of prices per brand.
pub fn price_by_brand(ui: &mut Ui, state: &AppState) {
    chart_title(ui, "💰 Price Distribution by Brand");

    let names: Vec<String> = state.view.price_by_brand.keys().cloned().collect();

    Plot::new("price_by_brand")
        .height(CHART_HEIGHT)
        .x_axis_formatter(category_axis(names))
        .y_axis_label("Price (LKR)")
        .y_axis_formatter(|mark, _| format::thousands(mark.value))
        .show(ui, |plot_ui| {
            for (i, (brand, summary)) in state.view.price_by_brand.iter().enumerate() {
                let color = state.brand_colors.color_for(brand);
                let elem = BoxElem::new(
                    i as f64,
                    BoxSpread::new(
                        summary.min,
                        summary.q1,
                        summary.median,
                        summary.q3,
                        summary.max,
                    ),
                )
                .name(brand)
                .box_width(0.6)
                .fill(color.gamma_multiply(0.4))
                .stroke(Stroke::new(1.5, color));

                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(brand));
            }
        });
}

/// Number of marker sizes in the scatter; points are grouped per size.
const SIZE_BUCKETS: usize = 6;

/// One scatter series: every point of one brand sharing a marker radius.
#[derive(Debug, Clone, PartialEq)]
struct ScatterSeries {
    brand: String,
    radius: f32,
    points: Vec<[f64; 2]>,
}

/// Group scatter points by brand and price-scaled radius bucket.
///
/// Radius grows with the square root of price relative to the maximum, from
/// 2 to 10 px, snapped to `SIZE_BUCKETS` steps.
fn scatter_series(points: &[ScatterPoint]) -> Vec<ScatterSeries> {
    let max_price = points.iter().map(|p| p.price).fold(0.0_f64, f64::max);
    let mut groups: BTreeMap<(&str, usize), Vec<[f64; 2]>> = BTreeMap::new();

    for p in points {
        let scale = if max_price > 0.0 {
            (p.price / max_price).clamp(0.0, 1.0).sqrt()
        } else {
            0.0
        };
        let bucket = (scale * (SIZE_BUCKETS - 1) as f64).round() as usize;
        groups
            .entry((p.brand.as_str(), bucket))
            .or_default()
            .push([p.year as f64, p.price]);
    }

    groups
        .into_iter()
        .map(|((brand, bucket), points)| ScatterSeries {
            brand: brand.to_string(),
            radius: 2.0 + 8.0 * bucket as f32 / (SIZE_BUCKETS - 1) as f32,
            points,
        })
        .collect()
}

/// Year-vs-price scatter, coloured by brand, marker size growing with price.
pub fn year_vs_price(ui: &mut Ui, state: &AppState) {
    chart_title(ui, "🕓 Price vs Year");

    let series = scatter_series(&state.view.year_price_pairs);

    Plot::new("year_vs_price")
        .height(CHART_HEIGHT)
        .legend(Legend::default())
        .x_axis_label("Year")
        .y_axis_label("Price (LKR)")
        .y_axis_formatter(|mark, _| format::thousands(mark.value))
        .show(ui, |plot_ui| {
            for s in series {
                let color = state.brand_colors.color_for(&s.brand).gamma_multiply(0.7);
                plot_ui.points(
                    Points::new(PlotPoints::new(s.points))
                        .radius(s.radius)
                        .color(color)
                        .name(&s.brand),
                );
            }
        });
}

/// Pie chart of bike-type shares, labelled with name and percentage.
pub fn bike_type_pie(ui: &mut Ui, state: &AppState) {
    chart_title(ui, "🚲 Bike Type Distribution");

    let shares = state.view.type_proportions();
    let size = CHART_HEIGHT.min(ui.available_width());
    let (rect, _) = ui.allocate_exact_size(Vec2::splat(size), Sense::hover());
    let painter = ui.painter_at(rect);

    if shares.is_empty() {
        painter.text(
            rect.center(),
            Align2::CENTER_CENTER,
            "No listings",
            FontId::proportional(14.0),
            ui.visuals().weak_text_color(),
        );
        return;
    }

    let center = rect.center();
    let radius = size * 0.45;
    let mut start = -TAU / 4.0;

    for (bike_type, pct) in &shares {
        let sweep = TAU * (*pct as f32) / 100.0;
        let color = state.type_colors.color_for(bike_type);

        // Fan of thin triangles keeps every shape convex.
        let steps = ((sweep / TAU) * 90.0).ceil().max(1.0) as usize;
        for s in 0..steps {
            let a0 = start + sweep * s as f32 / steps as f32;
            let a1 = start + sweep * (s + 1) as f32 / steps as f32;
            painter.add(Shape::convex_polygon(
                vec![center, arc_point(center, radius, a0), arc_point(center, radius, a1)],
                color,
                Stroke::NONE,
            ));
        }
        painter.line_segment(
            [center, arc_point(center, radius, start)],
            Stroke::new(1.5, Color32::WHITE),
        );

        if *pct >= 3.0 {
            painter.text(
                arc_point(center, radius * 0.65, start + sweep / 2.0),
                Align2::CENTER_CENTER,
                format!("{bike_type}\n{pct:.1}%"),
                FontId::proportional(12.0),
                Color32::BLACK,
            );
        }
        start += sweep;
    }
}

fn arc_point(center: Pos2, radius: f32, angle: f32) -> Pos2 {
    center + radius * egui::vec2(angle.cos(), angle.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(brand: &str, year: i32, price: f64) -> ScatterPoint {
        ScatterPoint {
            year,
            price,
            brand: brand.to_string(),
        }
    }

    #[test]
    fn scatter_groups_points_per_brand_and_size() {
        let points: Vec<ScatterPoint> = (0..1000)
            .map(|i| {
                let brand = if i % 2 == 0 { "Honda" } else { "Yamaha" };
                point(brand, 2010 + i % 10, 10_000.0 * (1 + i % 100) as f64)
            })
            .collect();

        let series = scatter_series(&points);
        assert!(series.len() <= 2 * SIZE_BUCKETS);
        assert_eq!(series.iter().map(|s| s.points.len()).sum::<usize>(), 1000);
    }

    #[test]
    fn scatter_radius_grows_with_price() {
        let series = scatter_series(&[point("Honda", 2012, 0.0), point("Honda", 2018, 400.0)]);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].radius, 2.0);
        assert_eq!(series[0].points, vec![[2012.0, 0.0]]);
        assert_eq!(series[1].radius, 10.0);
    }

    #[test]
    fn scatter_of_nothing_is_empty() {
        assert!(scatter_series(&[]).is_empty());
    }
}
