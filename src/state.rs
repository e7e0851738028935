use std::sync::Arc;

use crate::color::ColorMap;
use crate::config::DashboardConfig;
use crate::data::filter::{self, FilterSelection};
use crate::data::model::{Dataset, Domains, RangeBounds};
use crate::data::service::DatasetService;
use crate::data::summary::DashboardView;

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which chart tab is visible.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartTab {
    #[default]
    Overview,
    DetailedAnalysis,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    pub config: DashboardConfig,

    /// Loaded dataset (None when the load failed).
    pub dataset: Option<Arc<Dataset>>,

    /// Filter options and slider bounds, taken once per dataset.
    pub domains: Domains,

    /// Current filter selection.
    pub selection: FilterSelection,

    /// Indices of listings passing the current filters (cached).
    pub visible_indices: Vec<usize>,

    /// Aggregates over the visible listings (cached).
    pub view: DashboardView,

    pub brand_colors: ColorMap,
    pub type_colors: ColorMap,

    pub tab: ChartTab,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the state from a service, loading its dataset now.
    ///
    /// A load failure leaves the state without a dataset and with the error
    /// as status message.
    pub fn new(config: DashboardConfig, service: &DatasetService) -> Self {
        let mut state = Self {
            selection: FilterSelection::defaults(&Domains::default(), &config),
            config,
            dataset: None,
            domains: Domains::default(),
            visible_indices: Vec::new(),
            view: DashboardView::default(),
            brand_colors: ColorMap::default(),
            type_colors: ColorMap::default(),
            tab: ChartTab::default(),
            status_message: None,
        };
        state.load_from(service);
        state
    }

    /// Load (or fetch the cached) dataset from `service` and make it current.
    pub fn load_from(&mut self, service: &DatasetService) {
        if service.is_loaded() {
            log::debug!("Reusing dataset already read from {}", service.path().display());
        }
        match service.load() {
            Ok(dataset) => self.set_dataset(dataset),
            Err(e) => {
                self.clear_dataset();
                self.status_message =
                    Some(format!("Error loading {}: {e}", service.path().display()));
            }
        }
    }

    /// Drop the current dataset and everything derived from it.
    fn clear_dataset(&mut self) {
        self.dataset = None;
        self.domains = Domains::default();
        self.selection = FilterSelection::defaults(&self.domains, &self.config);
        self.visible_indices.clear();
        self.view = DashboardView::default();
        self.brand_colors = ColorMap::default();
        self.type_colors = ColorMap::default();
    }

    /// Ingest a newly loaded dataset, initialise filters and colours.
    pub fn set_dataset(&mut self, dataset: Arc<Dataset>) {
        if dataset.is_empty() {
            log::warn!("{} contains no listings", dataset.source.display());
        }
        self.domains = dataset.domains();
        self.selection = FilterSelection::defaults(&self.domains, &self.config);
        self.brand_colors = ColorMap::bold(&self.domains.brands);
        self.type_colors = ColorMap::pastel(&self.domains.bike_types);
        self.dataset = Some(dataset);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute visible rows and aggregates after a selection change.
    pub fn refilter(&mut self) {
        let Some(ds) = &self.dataset else {
            return;
        };
        let filtered = filter::apply(ds, &self.selection);
        self.view = DashboardView::compute(&filtered, self.config.histogram_bins);
        self.visible_indices = filtered.indices().to_vec();
        log::debug!("Refiltered: {} of {} listings", self.visible_indices.len(), ds.len());
    }

    // -- Categorical selections --

    pub fn toggle_brand(&mut self, brand: &str) {
        toggle(&mut self.selection.brands, brand);
        self.refilter();
    }

    pub fn toggle_bike_type(&mut self, bike_type: &str) {
        toggle(&mut self.selection.bike_types, bike_type);
        self.refilter();
    }

    pub fn select_all_brands(&mut self) {
        self.selection.brands = self.domains.brands.clone();
        self.refilter();
    }

    pub fn select_no_brands(&mut self) {
        self.selection.brands.clear();
        self.refilter();
    }

    pub fn select_all_bike_types(&mut self) {
        self.selection.bike_types = self.domains.bike_types.clone();
        self.refilter();
    }

    pub fn select_no_bike_types(&mut self) {
        self.selection.bike_types.clear();
        self.refilter();
    }

    // -- Ranges (kept low <= high) --

    pub fn set_year_range(&mut self, low: i32, high: i32) {
        self.selection.years = RangeBounds::new(low.min(high), low.max(high));
        self.refilter();
    }

    pub fn set_price_range(&mut self, low: f64, high: f64) {
        self.selection.prices = RangeBounds::new(low.min(high), low.max(high));
        self.refilter();
    }
}

fn toggle(set: &mut std::collections::BTreeSet<String>, value: &str) {
    if !set.remove(value) {
        set.insert(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::fixture;

    fn state() -> AppState {
        let path = fixture(
            "state.csv",
            "Brand,Bike Type,Year,Price\n\
             Honda,Motorbike,2012,150000\n\
             Honda,Scooter,2015,300000\n\
             Yamaha,Motorbike,2018,500000\n",
        );
        AppState::new(DashboardConfig::default(), &DatasetService::new(path))
    }

    #[test]
    fn starts_with_everything_selected() {
        let state = state();
        assert!(state.status_message.is_none());
        assert_eq!(state.visible_indices, vec![0, 1, 2]);
        assert_eq!(state.view.kpis.count, 3);
    }

    #[test]
    fn toggling_a_brand_refilters() {
        let mut state = state();
        state.toggle_brand("Yamaha");
        assert_eq!(state.visible_indices, vec![0, 1]);
        assert_eq!(state.view.kpis.mean_price, Some(225_000.0));

        state.toggle_brand("Yamaha");
        assert_eq!(state.view.kpis.count, 3);
    }

    #[test]
    fn clearing_types_empties_the_view() {
        let mut state = state();
        state.select_no_bike_types();
        assert_eq!(state.view.kpis.count, 0);
        assert_eq!(state.view.kpis.mean_year, None);

        state.select_all_bike_types();
        assert_eq!(state.view.kpis.count, 3);
    }

    #[test]
    fn ranges_are_reordered() {
        let mut state = state();
        state.set_year_range(2016, 2012);
        assert_eq!(state.selection.years, RangeBounds::new(2012, 2016));
        assert_eq!(state.visible_indices, vec![0, 1]);
    }

    #[test]
    fn failed_reopen_drops_the_previous_dataset() {
        let mut state = state();
        assert!(state.dataset.is_some());

        let missing_path = std::env::temp_dir().join("bike-dash-missing-reopen.csv");
        let missing = DatasetService::new(missing_path);
        state.load_from(&missing);

        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
        assert!(state.visible_indices.is_empty());
        assert_eq!(state.view.kpis.count, 0);
        assert!(state.domains.brands.is_empty());
        assert!(state.selection.brands.is_empty());
    }

    #[test]
    fn failed_load_sets_status() {
        let service = DatasetService::new(std::env::temp_dir().join("bike-dash-missing-state.csv"));
        let state = AppState::new(DashboardConfig::default(), &service);
        assert!(state.dataset.is_none());
        assert!(state.status_message.is_some());
    }
}
