//! Plain-text rendering of dashboard values for the terminal front end.

use std::fmt::Write as _;

use crate::analytics::{ChartSeries, KpiSummary, RankedTable};
use crate::dataset::OrderRecord;
use crate::ml::{FeatureImportance, Prediction, TrainedModel};

/// `$1,234` style, rounded to whole currency units.
pub fn format_currency(value: f64) -> String {
    let rounded = value.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    format!("{sign}${}", group_thousands(rounded.abs() as u64))
}

/// Two-decimal percentage of a value already scaled to `[0, 100]`.
pub fn format_percent(value: f64) -> String {
    format!("{value:.2}%")
}

fn group_thousands(value: u64) -> String {
    let digits = value.to_string();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (idx, digit) in digits.chars().enumerate() {
        if idx > 0 && (digits.len() - idx) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }
    grouped
}

pub fn render_kpis(kpis: &KpiSummary) -> String {
    let lines = [
        ("Total Orders", group_thousands(kpis.total_orders as u64)),
        ("Total Sales", format_currency(kpis.total_sales)),
        ("Total Profit", format_currency(kpis.total_profit)),
        ("Late Delivery Rate", format_percent(kpis.late_rate)),
        ("Avg Delay", format!("{:.1} hrs", kpis.avg_delay_hours)),
        ("Avg Order Value", format_currency(kpis.average_order_value)),
    ];
    let mut out = String::new();
    for (label, value) in lines {
        let _ = writeln!(out, "  {label:<20} {value}");
    }
    out
}

/// Key/value table with the value column right-aligned.
pub fn render_table(title: &str, key_label: &str, value_label: &str, table: &RankedTable) -> String {
    let mut out = format!("{title}\n");
    if table.is_empty() {
        out.push_str("  (no data)\n");
        return out;
    }
    let width = table
        .keys()
        .map(str::len)
        .chain([key_label.len()])
        .max()
        .unwrap_or(0);
    let _ = writeln!(out, "  {key_label:<width$}  {value_label:>14}");
    for row in table.rows() {
        let _ = writeln!(out, "  {:<width$}  {:>14.4}", row.key, row.value);
    }
    out
}

pub fn render_chart(series: &ChartSeries) -> String {
    render_table(&series.title, series.x_label, series.y_label, &series.table)
}

pub fn render_orders(records: &[OrderRecord]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "  {:<10} {:<16} {:>12} {:>5}",
        "Order Id", "Shipping Mode", "Sales", "Late"
    );
    for record in records {
        let _ = writeln!(
            out,
            "  {:<10} {:<16} {:>12.2} {:>5}",
            record.order_id,
            record.shipping_mode,
            record.sales,
            u8::from(record.late)
        );
    }
    out
}

pub fn render_training(model: &TrainedModel) -> String {
    let mut out = format!(
        "Model trained with accuracy: {:.2}%\n",
        model.accuracy * 100.0
    );
    let _ = writeln!(
        out,
        "  {} training rows, {} held out, {} iterations{}",
        model.training_rows,
        model.holdout_rows,
        model.iterations,
        if model.converged { "" } else { " (iteration cap reached)" }
    );
    out
}

pub fn render_prediction(prediction: &Prediction) -> String {
    let verdict = if prediction.is_high_risk() {
        "High risk of late delivery"
    } else {
        "Likely on-time delivery"
    };
    format!(
        "{verdict}\n  Late: {}\n  On time: {}\n",
        format_percent(prediction.late_probability * 100.0),
        format_percent(prediction.on_time_probability * 100.0)
    )
}

pub fn render_importance(rows: &[FeatureImportance]) -> String {
    let mut out = String::from("Feature importance\n");
    let width = rows
        .iter()
        .map(|row| row.name.len())
        .chain(["Feature".len()])
        .max()
        .unwrap_or(0);
    let _ = writeln!(
        out,
        "  {:<width$}  {:<11}  {:>12}  {:>12}",
        "Feature", "Kind", "Coefficient", "Impact"
    );
    for row in rows {
        let kind = if row.feature.is_categorical() {
            "categorical"
        } else {
            "numeric"
        };
        let _ = writeln!(
            out,
            "  {:<width$}  {:<11}  {:>12.4}  {:>12.4}",
            row.name, kind, row.coefficient, row.absolute_impact
        );
    }
    out
}
