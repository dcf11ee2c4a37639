//! Library exports for the dashboard binary, benchmarks and tests.
/// Summary KPIs, grouped tables and chart series.
pub mod analytics;
/// Application directory resolution.
pub mod app_dirs;
/// TOML configuration.
pub mod config;
/// Filter state, model slot and text report.
pub mod dashboard;
/// Order records, CSV loading and filtered views.
pub mod dataset;
/// Tracing setup.
pub mod logging;
/// Late-delivery risk model.
pub mod ml;
