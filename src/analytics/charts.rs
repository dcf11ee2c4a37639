//! Chart-ready series for the four dashboard plots.
//!
//! Rendering belongs to the front end; a series only fixes which table is
//! plotted and how its axes are labelled.

use serde::Serialize;

use crate::config::ChartSettings;
use crate::dataset::Dataset;

use super::{Aggregator, GroupKey, RankedTable, SortOrder, ValueColumn, grouped_rate};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    SalesByCategory,
    LateRiskByShippingMode,
    DelayByShippingMode,
    LateRiskByDiscount,
}

impl ChartKind {
    pub const ALL: [ChartKind; 4] = [
        ChartKind::SalesByCategory,
        ChartKind::LateRiskByShippingMode,
        ChartKind::DelayByShippingMode,
        ChartKind::LateRiskByDiscount,
    ];
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSeries {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: &'static str,
    pub y_label: &'static str,
    pub table: RankedTable,
}

/// Build the series for `kind` from the current view.
pub fn build_chart(kind: ChartKind, dataset: &Dataset, settings: &ChartSettings) -> ChartSeries {
    match kind {
        ChartKind::SalesByCategory => ChartSeries {
            kind,
            title: format!("Top {} Categories by Sales", settings.top_categories),
            x_label: "Category",
            y_label: "Sales Amount",
            table: grouped_rate(
                dataset,
                GroupKey::Category,
                ValueColumn::Sales,
                Aggregator::Sum,
                SortOrder::ValueDescending,
            )
            .truncated(settings.top_categories),
        },
        ChartKind::LateRiskByShippingMode => ChartSeries {
            kind,
            title: "Late Delivery Risk by Shipping Mode".to_string(),
            x_label: "Shipping Mode",
            y_label: "Late Delivery Probability",
            table: grouped_rate(
                dataset,
                GroupKey::ShippingMode,
                ValueColumn::LateRisk,
                Aggregator::Mean,
                SortOrder::ValueDescending,
            ),
        },
        ChartKind::DelayByShippingMode => ChartSeries {
            kind,
            title: "Average Delivery Delay by Shipping Mode".to_string(),
            x_label: "Shipping Mode",
            y_label: "Delay (Days)",
            table: grouped_rate(
                dataset,
                GroupKey::ShippingMode,
                ValueColumn::DelayDays,
                Aggregator::Mean,
                SortOrder::KeyAscending,
            ),
        },
        ChartKind::LateRiskByDiscount => ChartSeries {
            kind,
            title: "Late Delivery Risk by Discount Level".to_string(),
            x_label: "Discount Range",
            y_label: "Late Delivery Probability",
            table: grouped_rate(
                dataset,
                GroupKey::DiscountBucket {
                    bins: settings.discount_buckets,
                },
                ValueColumn::LateRisk,
                Aggregator::Mean,
                SortOrder::KeyAscending,
            ),
        },
    }
}
