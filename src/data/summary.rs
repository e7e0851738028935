use std::collections::BTreeMap;

use serde::Serialize;

use super::filter::FilteredResult;

// ---------------------------------------------------------------------------
// KPIs
// ---------------------------------------------------------------------------

/// Headline metrics of a filtered view. Means are `None` for an empty view.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Kpis {
    pub count: usize,
    pub mean_price: Option<f64>,
    pub mean_year: Option<f64>,
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, n) = values.fold((0.0, 0usize), |(s, n), v| (s + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

// ---------------------------------------------------------------------------
// Year histogram
// ---------------------------------------------------------------------------

/// One bucket: `[start, end)`, the last bucket also includes `end`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HistogramBin {
    pub start: f64,
    pub end: f64,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct YearHistogram {
    pub bins: Vec<HistogramBin>,
}

impl YearHistogram {
    /// Bucket `years` into `bin_count` equal-width bins spanning their range.
    ///
    /// Every value lands in exactly one bin. A single distinct year spans
    /// `[year, year + 1]`.
    pub fn build(years: &[i32], bin_count: usize) -> Self {
        let (Some(&min), Some(&max)) = (years.iter().min(), years.iter().max()) else {
            return Self::default();
        };
        if bin_count == 0 {
            return Self::default();
        }

        let min = min as f64;
        let span = if max as f64 > min { max as f64 - min } else { 1.0 };
        let width = span / bin_count as f64;

        let mut bins: Vec<HistogramBin> = (0..bin_count)
            .map(|i| HistogramBin {
                start: min + i as f64 * width,
                end: if i + 1 == bin_count {
                    min + span
                } else {
                    min + (i + 1) as f64 * width
                },
                count: 0,
            })
            .collect();

        for &year in years {
            let idx = (((year as f64 - min) / width).floor() as usize).min(bin_count - 1);
            bins[idx].count += 1;
        }

        Self { bins }
    }

    pub fn total(&self) -> usize {
        self.bins.iter().map(|b| b.count).sum()
    }
}

// ---------------------------------------------------------------------------
// Box-plot summary
// ---------------------------------------------------------------------------

/// Five-number summary of a price distribution.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoxSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxSummary {
    /// `None` for an empty sample.
    pub fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            count: sorted.len(),
            min: sorted[0],
            q1: percentile(&sorted, 25.0),
            median: percentile(&sorted, 50.0),
            q3: percentile(&sorted, 75.0),
            max: sorted[sorted.len() - 1],
        })
    }
}

/// Percentile by linear interpolation between closest ranks (NumPy default).
fn percentile(sorted: &[f64], p: f64) -> f64 {
    let n = sorted.len();
    if n == 1 {
        return sorted[0];
    }

    let rank = (p / 100.0) * (n - 1) as f64;
    let lower = rank.floor() as usize;
    let upper = (rank.ceil() as usize).min(n - 1);
    let frac = rank - lower as f64;

    sorted[lower] * (1.0 - frac) + sorted[upper] * frac
}

// ---------------------------------------------------------------------------
// Scatter points
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub year: i32,
    pub price: f64,
    pub brand: String,
}

// ---------------------------------------------------------------------------
// DashboardView – everything the page renders for one selection
// ---------------------------------------------------------------------------

/// All aggregates derived from one [`FilteredResult`].
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct DashboardView {
    pub kpis: Kpis,
    pub brand_counts: BTreeMap<String, usize>,
    pub year_histogram: YearHistogram,
    pub price_by_brand: BTreeMap<String, BoxSummary>,
    pub year_price_pairs: Vec<ScatterPoint>,
    pub type_counts: BTreeMap<String, usize>,
}

impl DashboardView {
    pub fn compute(filtered: &FilteredResult<'_>, histogram_bins: usize) -> Self {
        let mut brand_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut type_counts: BTreeMap<String, usize> = BTreeMap::new();
        let mut prices_by_brand: BTreeMap<String, Vec<f64>> = BTreeMap::new();
        let mut years: Vec<i32> = Vec::with_capacity(filtered.len());
        let mut year_price_pairs = Vec::with_capacity(filtered.len());

        for listing in filtered.iter() {
            if let Some(brand) = &listing.brand {
                *brand_counts.entry(brand.clone()).or_default() += 1;
                if let Some(price) = listing.price {
                    prices_by_brand.entry(brand.clone()).or_default().push(price);
                }
                if let (Some(year), Some(price)) = (listing.year, listing.price) {
                    year_price_pairs.push(ScatterPoint {
                        year,
                        price,
                        brand: brand.clone(),
                    });
                }
            }
            if let Some(bike_type) = &listing.bike_type {
                *type_counts.entry(bike_type.clone()).or_default() += 1;
            }
            if let Some(year) = listing.year {
                years.push(year);
            }
        }

        let kpis = Kpis {
            count: filtered.len(),
            mean_price: mean(filtered.iter().filter_map(|l| l.price)),
            mean_year: mean(filtered.iter().filter_map(|l| l.year.map(f64::from))),
        };

        let price_by_brand = prices_by_brand
            .into_iter()
            .filter_map(|(brand, prices)| BoxSummary::from_values(&prices).map(|b| (brand, b)))
            .collect();

        Self {
            kpis,
            brand_counts,
            year_histogram: YearHistogram::build(&years, histogram_bins),
            price_by_brand,
            year_price_pairs,
            type_counts,
        }
    }

    /// Bike-type shares in percent, summing to 100. Empty for an empty view.
    pub fn type_proportions(&self) -> Vec<(String, f64)> {
        let total: usize = self.type_counts.values().sum();
        if total == 0 {
            return Vec::new();
        }
        self.type_counts
            .iter()
            .map(|(t, &n)| (t.clone(), n as f64 * 100.0 / total as f64))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeSet;

    use super::*;
    use crate::data::filter::{FilterSelection, apply};
    use crate::data::model::tests::{dataset, listing};
    use crate::data::model::{Dataset, RangeBounds};

    fn scenario() -> Dataset {
        dataset(vec![
            listing("Honda", "Motorbike", 2012, 150_000.0),
            listing("Honda", "Scooter", 2015, 300_000.0),
            listing("Yamaha", "Motorbike", 2018, 500_000.0),
        ])
    }

    fn selection(ds: &Dataset, brands: &[&str]) -> FilterSelection {
        FilterSelection {
            brands: brands.iter().map(|s| s.to_string()).collect(),
            bike_types: ds.domains().bike_types,
            years: RangeBounds::new(2010, 2023),
            prices: RangeBounds::new(0.0, 1_000_000.0),
        }
    }

    #[test]
    fn honda_kpis() {
        let ds = scenario();
        let view = DashboardView::compute(&apply(&ds, &selection(&ds, &["Honda"])), 15);

        assert_eq!(view.kpis.count, 2);
        assert_eq!(view.kpis.mean_price, Some(225_000.0));
        assert_eq!(view.kpis.mean_year, Some(2013.5));
        assert_eq!(view.brand_counts.get("Honda"), Some(&2));
        assert!(!view.brand_counts.contains_key("Yamaha"));
    }

    #[test]
    fn empty_selection_reports_no_means() {
        let ds = scenario();
        let view = DashboardView::compute(&apply(&ds, &selection(&ds, &[])), 15);

        assert_eq!(view.kpis.count, 0);
        assert_eq!(view.kpis.mean_price, None);
        assert_eq!(view.kpis.mean_year, None);
        assert!(view.year_histogram.bins.is_empty());
        assert!(view.price_by_brand.is_empty());
        assert!(view.type_proportions().is_empty());
    }

    #[test]
    fn histogram_places_each_year_once() {
        let hist = YearHistogram::build(&[2012, 2015, 2018], 15);

        assert_eq!(hist.bins.len(), 15);
        assert_eq!(hist.total(), 3);
        assert_eq!(hist.bins[0].start, 2012.0);
        assert_eq!(hist.bins[14].end, 2018.0);
        assert_eq!(hist.bins[0].count, 1);
        assert_eq!(hist.bins[14].count, 1);
        for year in [2012.0, 2015.0, 2018.0] {
            let containing = hist
                .bins
                .iter()
                .enumerate()
                .filter(|(i, b)| {
                    b.start <= year && (year < b.end || (*i == 14 && year <= b.end))
                })
                .count();
            assert_eq!(containing, 1, "year {year}");
        }
    }

    #[test]
    fn histogram_of_a_single_year() {
        let hist = YearHistogram::build(&[2020, 2020], 15);
        assert_eq!(hist.bins.len(), 15);
        assert_eq!(hist.bins[0].count, 2);
        assert_eq!(hist.bins[14].end, 2021.0);
        assert_eq!(hist.total(), 2);
    }

    #[test]
    fn box_summary_interpolates_quartiles() {
        let summary = BoxSummary::from_values(&[4.0, 1.0, 3.0, 2.0]).unwrap();
        assert_eq!(summary.count, 4);
        assert_eq!(summary.min, 1.0);
        assert_eq!(summary.q1, 1.75);
        assert_eq!(summary.median, 2.5);
        assert_eq!(summary.q3, 3.25);
        assert_eq!(summary.max, 4.0);

        let single = BoxSummary::from_values(&[7.0]).unwrap();
        assert_eq!((single.q1, single.median, single.q3), (7.0, 7.0, 7.0));
        assert!(BoxSummary::from_values(&[]).is_none());
    }

    #[test]
    fn grouped_summaries_cover_every_row() {
        let ds = scenario();
        let all: Vec<&str> = vec!["Honda", "Yamaha"];
        let view = DashboardView::compute(&apply(&ds, &selection(&ds, &all)), 15);

        assert_eq!(view.price_by_brand["Honda"].count, 2);
        assert_eq!(view.price_by_brand["Yamaha"].median, 500_000.0);
        assert_eq!(view.year_price_pairs.len(), 3);
        assert_eq!(view.year_price_pairs[2].brand, "Yamaha");
        assert_eq!(view.type_counts["Motorbike"], 2);

        let shares = view.type_proportions();
        let total: f64 = shares.iter().map(|(_, p)| p).sum();
        assert!((total - 100.0).abs() < 1e-9);
        let types: BTreeSet<_> = shares.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(types, BTreeSet::from(["Motorbike", "Scooter"]));
    }
}
