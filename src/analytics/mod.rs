//! Aggregation engine: KPIs and grouped tables over a filtered dataset.
//!
//! Everything here is a pure function of an immutable [`Dataset`], so callers
//! may evaluate independent aggregations on separate threads.
//!
//! [`Dataset`]: crate::dataset::Dataset

mod buckets;
mod charts;
mod error;
mod grouping;
mod kpi;

pub use buckets::DiscountBuckets;
pub use charts::{ChartKind, ChartSeries, build_chart};
pub use error::AnalyticsError;
pub use grouping::{
    Aggregator, GroupKey, RankedRow, RankedTable, SortOrder, ValueColumn, grouped_rate,
    region_late_risk,
};
pub use kpi::{KpiSummary, compute_kpis};
