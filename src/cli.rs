use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use crate::config::DashboardConfig;
use crate::data::filter::{self, FilterSelection};
use crate::data::service::DatasetService;
use crate::data::summary::DashboardView;

/// Environment variable naming the dataset when no path is given.
pub const DATA_ENV: &str = "BIKE_DASH_DATA";

// ---------------------------------------------------------------------------
// Command-line options
// ---------------------------------------------------------------------------

#[derive(Parser, Debug, Default, PartialEq)]
#[command(name = "bike-dash")]
#[command(about = "Interactive dashboard for the Sri Lanka used-bike market")]
#[command(version)]
pub struct Options {
    /// JSON file with dashboard defaults
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Print the default view as JSON instead of opening a window
    #[arg(long)]
    pub summary: bool,

    /// Listings file (.csv, .json or .parquet)
    pub data: Option<PathBuf>,
}

impl Options {
    /// Load the config file, if any, and apply the data-path precedence:
    /// argument, then environment, then config.
    pub fn resolve_config(&self, env_data: Option<String>) -> Result<DashboardConfig> {
        let mut config = match &self.config {
            Some(path) => {
                let config = DashboardConfig::from_file(path)
                    .with_context(|| format!("loading config {}", path.display()))?;
                log::info!("Loaded config from {}", path.display());
                config
            }
            None => DashboardConfig::default(),
        };

        if let Some(data) = &self.data {
            config.data_path = data.clone();
        } else if let Some(data) = env_data.filter(|d| !d.is_empty()) {
            config.data_path = PathBuf::from(data);
        }

        Ok(config)
    }
}

// ---------------------------------------------------------------------------
// Headless summary
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
pub struct SummaryReport {
    pub source: PathBuf,
    pub total_listings: usize,
    pub selection: FilterSelection,
    pub view: DashboardView,
}

/// Compute the view for the default selection without opening a window.
pub fn summary(config: &DashboardConfig, service: &DatasetService) -> Result<SummaryReport> {
    let dataset = service
        .load()
        .with_context(|| format!("loading {}", service.path().display()))?;

    let selection = FilterSelection::defaults(&dataset.domains(), config);
    let filtered = filter::apply(&dataset, &selection);
    let view = DashboardView::compute(&filtered, config.histogram_bins);

    Ok(SummaryReport {
        source: dataset.source.clone(),
        total_listings: dataset.len(),
        selection,
        view,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::tests::fixture;

    fn parse(args: &[&str]) -> Result<Options, clap::Error> {
        Options::try_parse_from(std::iter::once("bike-dash").chain(args.iter().copied()))
    }

    #[test]
    fn parses_flags_and_data_path() {
        let options = parse(&["--summary", "bikes.csv", "--config", "c.json"]).unwrap();
        assert!(options.summary);
        assert_eq!(options.data, Some(PathBuf::from("bikes.csv")));
        assert_eq!(options.config, Some(PathBuf::from("c.json")));

        assert_eq!(parse(&[]).unwrap(), Options::default());
    }

    #[test]
    fn rejects_unknown_flags_and_extra_paths() {
        assert!(parse(&["--verbose"]).is_err());
        assert!(parse(&["a.csv", "b.csv"]).is_err());
        assert!(parse(&["--config"]).is_err());
    }

    #[test]
    fn data_path_precedence() {
        let none = Options::default();
        assert_eq!(
            none.resolve_config(None).unwrap().data_path,
            PathBuf::from("cleaned_bike_data.csv")
        );
        assert_eq!(
            none.resolve_config(Some("env.csv".into())).unwrap().data_path,
            PathBuf::from("env.csv")
        );

        let explicit = Options {
            data: Some(PathBuf::from("arg.csv")),
            ..Options::default()
        };
        assert_eq!(
            explicit.resolve_config(Some("env.csv".into())).unwrap().data_path,
            PathBuf::from("arg.csv")
        );
    }

    #[test]
    fn summary_uses_default_selection() {
        let path = fixture(
            "summary.csv",
            "Brand,Bike Type,Year,Price\n\
             Honda,Scooter,2008,150000\n\
             Honda,Scooter,2015,300000\n\
             Yamaha,Motorbike,2018,500000\n",
        );
        let config = DashboardConfig::default();
        let report = summary(&config, &DatasetService::new(path)).unwrap();

        assert_eq!(report.total_listings, 3);
        assert_eq!(report.view.kpis.count, 2);
        assert_eq!(report.view.kpis.mean_price, Some(400_000.0));
        assert!(serde_json::to_string(&report).is_ok());
    }

    #[test]
    fn summary_reports_load_failure() {
        let service = DatasetService::new(std::env::temp_dir().join("bike-dash-missing-cli.csv"));
        assert!(summary(&DashboardConfig::default(), &service).is_err());
    }
}
