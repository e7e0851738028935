use std::collections::BTreeSet;
use std::path::PathBuf;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Column names expected in every input file
// ---------------------------------------------------------------------------

pub const BRAND_COLUMN: &str = "Brand";
pub const BIKE_TYPE_COLUMN: &str = "Bike Type";
pub const YEAR_COLUMN: &str = "Year";
pub const PRICE_COLUMN: &str = "Price";

/// The four typed columns, in display order.
pub const TYPED_COLUMNS: [&str; 4] = [BRAND_COLUMN, BIKE_TYPE_COLUMN, YEAR_COLUMN, PRICE_COLUMN];

// ---------------------------------------------------------------------------
// RangeBounds – an inclusive [low, high] pair
// ---------------------------------------------------------------------------

/// Inclusive range used for filter selections and observed column bounds.
///
/// A range with `low > high` is legal and simply contains nothing.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RangeBounds<T> {
    pub low: T,
    pub high: T,
}

impl<T: PartialOrd + Copy> RangeBounds<T> {
    pub fn new(low: T, high: T) -> Self {
        Self { low, high }
    }

    pub fn contains(&self, value: T) -> bool {
        self.low <= value && value <= self.high
    }

    /// Clamp `value` into this range. Assumes `low <= high`.
    pub fn clamp(&self, value: T) -> T {
        if value < self.low {
            self.low
        } else if value > self.high {
            self.high
        } else {
            value
        }
    }
}

// ---------------------------------------------------------------------------
// Listing – one row of the source table
// ---------------------------------------------------------------------------

/// A single used-bike listing.
///
/// Cells that were empty or failed to parse are `None`; such rows never match
/// a filter on that column and are left out of domains and aggregates.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Listing {
    pub brand: Option<String>,
    pub bike_type: Option<String>,
    pub year: Option<i32>,
    pub price: Option<f64>,
    /// Pass-through cells, aligned with [`Dataset::extra_columns`].
    pub extra: Vec<String>,
}

// ---------------------------------------------------------------------------
// Domains – the values available to the filter controls
// ---------------------------------------------------------------------------

/// Distinct categorical values and numeric bounds of the filterable columns.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Domains {
    pub brands: BTreeSet<String>,
    pub bike_types: BTreeSet<String>,
    pub year_bounds: Option<RangeBounds<i32>>,
    pub price_bounds: Option<RangeBounds<f64>>,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full parsed dataset. Read-only once loaded.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All listings (rows), in file order.
    pub listings: Vec<Listing>,
    /// Names of the pass-through columns, in file order.
    pub extra_columns: Vec<String>,
    /// File the dataset was read from.
    pub source: PathBuf,
}

impl Dataset {
    pub fn new(listings: Vec<Listing>, extra_columns: Vec<String>, source: PathBuf) -> Self {
        Self {
            listings,
            extra_columns,
            source,
        }
    }

    /// Number of listings.
    pub fn len(&self) -> usize {
        self.listings.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }

    /// Collect the filter domains from non-missing values only.
    pub fn domains(&self) -> Domains {
        let mut domains = Domains::default();

        for listing in &self.listings {
            if let Some(brand) = &listing.brand {
                domains.brands.insert(brand.clone());
            }
            if let Some(bike_type) = &listing.bike_type {
                domains.bike_types.insert(bike_type.clone());
            }
            if let Some(year) = listing.year {
                domains.year_bounds = Some(match domains.year_bounds {
                    Some(b) => RangeBounds::new(b.low.min(year), b.high.max(year)),
                    None => RangeBounds::new(year, year),
                });
            }
            if let Some(price) = listing.price {
                domains.price_bounds = Some(match domains.price_bounds {
                    Some(b) => RangeBounds::new(b.low.min(price), b.high.max(price)),
                    None => RangeBounds::new(price, price),
                });
            }
        }

        domains
    }

    /// Number of rows with at least one missing typed cell.
    pub fn incomplete_rows(&self) -> usize {
        self.listings
            .iter()
            .filter(|l| {
                l.brand.is_none() || l.bike_type.is_none() || l.year.is_none() || l.price.is_none()
            })
            .count()
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn listing(brand: &str, bike_type: &str, year: i32, price: f64) -> Listing {
        Listing {
            brand: Some(brand.to_string()),
            bike_type: Some(bike_type.to_string()),
            year: Some(year),
            price: Some(price),
            extra: Vec::new(),
        }
    }

    pub(crate) fn dataset(listings: Vec<Listing>) -> Dataset {
        Dataset::new(listings, Vec::new(), PathBuf::from("memory.csv"))
    }

    #[test]
    fn domains_are_sorted_and_deduplicated() {
        let ds = dataset(vec![
            listing("Yamaha", "Scooter", 2018, 500_000.0),
            listing("Honda", "Motorbike", 2012, 150_000.0),
            listing("Honda", "Scooter", 2015, 300_000.0),
        ]);

        let domains = ds.domains();
        assert_eq!(
            domains.brands.iter().collect::<Vec<_>>(),
            vec!["Honda", "Yamaha"]
        );
        assert_eq!(
            domains.bike_types.iter().collect::<Vec<_>>(),
            vec!["Motorbike", "Scooter"]
        );
        assert_eq!(domains.year_bounds, Some(RangeBounds::new(2012, 2018)));
        assert_eq!(
            domains.price_bounds,
            Some(RangeBounds::new(150_000.0, 500_000.0))
        );
    }

    #[test]
    fn domains_skip_missing_values() {
        let mut sparse = listing("Bajaj", "Motorbike", 2001, 90_000.0);
        sparse.brand = None;
        sparse.year = None;
        let mut cheap = listing("TVS", "Scooter", 2020, 0.0);
        cheap.price = None;

        let ds = dataset(vec![
            sparse,
            cheap,
            listing("Honda", "Scooter", 2015, 300_000.0),
        ]);
        let domains = ds.domains();

        assert!(!domains.brands.contains("Bajaj"));
        assert_eq!(domains.brands.len(), 2);
        assert_eq!(domains.year_bounds, Some(RangeBounds::new(2015, 2020)));
        assert_eq!(
            domains.price_bounds,
            Some(RangeBounds::new(90_000.0, 300_000.0))
        );
        assert_eq!(ds.incomplete_rows(), 2);
    }

    #[test]
    fn empty_dataset_has_no_bounds() {
        let domains = dataset(Vec::new()).domains();
        assert!(domains.brands.is_empty());
        assert_eq!(domains.year_bounds, None);
        assert_eq!(domains.price_bounds, None);
    }

    #[test]
    fn inverted_range_contains_nothing() {
        let range = RangeBounds::new(2020, 2010);
        assert!(!range.contains(2015));
        assert!(!range.contains(2010));
        assert!(RangeBounds::new(5.0, 5.0).contains(5.0));
    }
}
