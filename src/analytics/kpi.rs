use std::collections::HashSet;

use serde::Serialize;

use crate::dataset::Dataset;

use super::AnalyticsError;

/// Headline numbers for the current view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct KpiSummary {
    /// Distinct order ids, not order lines.
    pub total_orders: usize,
    /// Summed per line, so multi-line orders contribute every line.
    pub total_sales: f64,
    pub total_profit: f64,
    /// Percentage of late lines, in `[0, 100]`.
    pub late_rate: f64,
    /// Mean of actual minus scheduled days, in hours. Negative means early.
    pub avg_delay_hours: f64,
    pub average_order_value: f64,
}

/// Compute the KPI summary; an empty dataset has no defined rates.
pub fn compute_kpis(dataset: &Dataset) -> Result<KpiSummary, AnalyticsError> {
    if dataset.is_empty() {
        return Err(AnalyticsError::EmptyDataset {
            metric: "KPI summary",
        });
    }

    let mut order_ids = HashSet::new();
    let mut total_sales = 0.0;
    let mut total_profit = 0.0;
    let mut late_lines = 0usize;
    let mut delay_days = 0i64;
    for record in dataset {
        order_ids.insert(record.order_id.as_str());
        total_sales += record.sales;
        total_profit += record.profit;
        late_lines += usize::from(record.late);
        delay_days = delay_days.saturating_add(record.delay_days());
    }

    let rows = dataset.len() as f64;
    let total_orders = order_ids.len();
    Ok(KpiSummary {
        total_orders,
        total_sales,
        total_profit,
        late_rate: late_lines as f64 / rows * 100.0,
        avg_delay_hours: delay_days as f64 / rows * 24.0,
        average_order_value: total_sales / total_orders as f64,
    })
}
