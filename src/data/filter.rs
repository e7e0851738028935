use std::collections::BTreeSet;

use serde::Serialize;

use crate::config::DashboardConfig;

use super::model::{Dataset, Domains, Listing, RangeBounds};

// ---------------------------------------------------------------------------
// FilterSelection – the user's current query
// ---------------------------------------------------------------------------

/// Selected values per filterable column.
///
/// Empty brand or bike-type sets select nothing: there is no implicit
/// "everything" fallback once a set has been cleared.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterSelection {
    pub brands: BTreeSet<String>,
    pub bike_types: BTreeSet<String>,
    pub years: RangeBounds<i32>,
    pub prices: RangeBounds<f64>,
}

impl FilterSelection {
    /// Initial selection: every brand and type, configured default ranges
    /// clamped into the observed bounds.
    pub fn defaults(domains: &Domains, config: &DashboardConfig) -> Self {
        let years = match domains.year_bounds {
            Some(bounds) => {
                RangeBounds::new(bounds.clamp(config.default_year_low), bounds.high)
            }
            None => RangeBounds::new(1, 0),
        };
        let prices = match domains.price_bounds {
            Some(bounds) => {
                let low = bounds.clamp(config.default_price_low);
                let high = bounds.clamp(config.default_price_high).max(low);
                RangeBounds::new(low, high)
            }
            None => RangeBounds::new(1.0, 0.0),
        };

        Self {
            brands: domains.brands.clone(),
            bike_types: domains.bike_types.clone(),
            years,
            prices,
        }
    }

    /// Whether a single listing passes all four predicates.
    ///
    /// Missing cells fail their predicate.
    pub fn matches(&self, listing: &Listing) -> bool {
        let brand_ok = listing
            .brand
            .as_ref()
            .is_some_and(|b| self.brands.contains(b));
        let type_ok = listing
            .bike_type
            .as_ref()
            .is_some_and(|t| self.bike_types.contains(t));
        let year_ok = listing.year.is_some_and(|y| self.years.contains(y));
        let price_ok = listing.price.is_some_and(|p| self.prices.contains(p));

        brand_ok && type_ok && year_ok && price_ok
    }
}

// ---------------------------------------------------------------------------
// FilteredResult – a view over the rows passing the selection
// ---------------------------------------------------------------------------

/// Rows of a dataset that passed a selection, in base-table order.
#[derive(Debug, Clone)]
pub struct FilteredResult<'a> {
    dataset: &'a Dataset,
    indices: Vec<usize>,
}

impl<'a> FilteredResult<'a> {
    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    /// Row indices into the base dataset.
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn iter(&self) -> impl Iterator<Item = &'a Listing> + '_ {
        let dataset = self.dataset;
        self.indices.iter().map(move |&i| &dataset.listings[i])
    }
}

/// Return the listings that pass every predicate of `selection`.
///
/// Pure: the same inputs always give the same rows, and the dataset is never
/// touched.
pub fn apply<'a>(dataset: &'a Dataset, selection: &FilterSelection) -> FilteredResult<'a> {
    // Short-circuit the degenerate selections.
    if selection.brands.is_empty()
        || selection.bike_types.is_empty()
        || selection.years.low > selection.years.high
        || !(selection.prices.low <= selection.prices.high)
    {
        return FilteredResult {
            dataset,
            indices: Vec::new(),
        };
    }

    let indices = dataset
        .listings
        .iter()
        .enumerate()
        .filter(|(_, listing)| selection.matches(listing))
        .map(|(i, _)| i)
        .collect();

    FilteredResult { dataset, indices }
}
