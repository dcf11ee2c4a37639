//! CSV loader for the order export.
//!
//! Coercion rules are deliberately simple: an unparseable order date becomes
//! [`DATE_SENTINEL`], and any other missing or unparseable cell becomes zero
//! (`"0"` for text columns). Nothing short of an IO failure or a missing
//! contract column aborts the load.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use thiserror::Error;
use time::format_description::FormatItem;
use time::macros::format_description;
use time::{Date, PrimitiveDateTime, Time};
use tracing::{info, warn};

use super::columns::{
    ACTUAL_DAYS, CATEGORY, DISCOUNT_RATE, LATE_RISK, ORDER_DATE, ORDER_ID, PROFIT, REGION,
    REQUIRED_COLUMNS, SALES, SCHEDULED_DAYS, SHIPPING_MODE, normalize_header,
};
use super::{DATE_SENTINEL, Dataset, OrderRecord};

const MISSING_TEXT: &str = "0";

const DATETIME_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[month padding:none]/[day padding:none]/[year] [hour padding:none]:[minute]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second]"),
    format_description!("[year]-[month]-[day] [hour]:[minute]"),
];

const DATE_FORMATS: &[&[FormatItem<'static>]] = &[
    format_description!("[year]-[month]-[day]"),
    format_description!("[month padding:none]/[day padding:none]/[year]"),
];

#[derive(Debug, Error)]
pub enum DatasetLoadError {
    #[error("Failed to open dataset {path}: {source}")]
    Open {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("missing required column `{0}`")]
    MissingColumn(&'static str),
}

/// Counts of coercions applied while loading.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub rows: usize,
    /// Order dates replaced by [`DATE_SENTINEL`].
    pub coerced_dates: usize,
    /// Non-date cells that were empty or unparseable and became zero.
    pub defaulted_cells: usize,
}

/// Parsed dataset plus the coercion summary.
#[derive(Debug, Clone)]
pub struct LoadedOrders {
    pub dataset: Dataset,
    pub report: LoadReport,
}

/// Load the order export at `path`.
pub fn load_csv(path: &Path) -> Result<LoadedOrders, DatasetLoadError> {
    let file = File::open(path).map_err(|source| DatasetLoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let loaded = load_csv_from_reader(file)?;
    info!(
        "Loaded {} order lines from {} ({} dates coerced, {} cells defaulted)",
        loaded.report.rows,
        path.display(),
        loaded.report.coerced_dates,
        loaded.report.defaulted_cells
    );
    Ok(loaded)
}

/// Load orders from any CSV byte stream with a header row.
pub fn load_csv_from_reader<R: Read>(reader: R) -> Result<LoadedOrders, DatasetLoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);
    let index = ColumnIndex::from_headers(csv_reader.byte_headers()?)?;

    let mut report = LoadReport::default();
    let mut records = Vec::new();
    for row in csv_reader.byte_records() {
        let row = row?;
        let mut cells = RowCells {
            row: &row,
            index: &index,
            report: &mut report,
        };
        records.push(cells.parse_record());
    }
    report.rows = records.len();
    if report.coerced_dates > 0 {
        warn!(
            "{} order dates could not be parsed and were set to {}",
            report.coerced_dates, DATE_SENTINEL
        );
    }
    if report.defaulted_cells > 0 {
        warn!(
            "{} empty or unparseable cells were replaced with zero",
            report.defaulted_cells
        );
    }
    Ok(LoadedOrders {
        dataset: Dataset::new(records),
        report,
    })
}

struct ColumnIndex {
    positions: HashMap<&'static str, usize>,
}

impl ColumnIndex {
    fn from_headers(headers: &csv::ByteRecord) -> Result<Self, DatasetLoadError> {
        let normalized: Vec<String> = headers
            .iter()
            .map(|raw| normalize_header(&String::from_utf8_lossy(raw)))
            .collect();
        let mut positions = HashMap::with_capacity(REQUIRED_COLUMNS.len());
        for column in REQUIRED_COLUMNS {
            let position = normalized
                .iter()
                .position(|name| name == column)
                .ok_or(DatasetLoadError::MissingColumn(column))?;
            positions.insert(column, position);
        }
        Ok(Self { positions })
    }

    fn position(&self, column: &'static str) -> usize {
        self.positions.get(column).copied().unwrap_or(usize::MAX)
    }
}

struct RowCells<'a> {
    row: &'a csv::ByteRecord,
    index: &'a ColumnIndex,
    report: &'a mut LoadReport,
}

impl RowCells<'_> {
    fn parse_record(&mut self) -> OrderRecord {
        OrderRecord {
            order_id: self.text(ORDER_ID),
            sales: self.float(SALES),
            profit: self.float(PROFIT),
            scheduled_days: self.integer(SCHEDULED_DAYS),
            actual_days: self.integer(ACTUAL_DAYS),
            shipping_mode: self.text(SHIPPING_MODE),
            region: self.text(REGION),
            category: self.text(CATEGORY),
            discount_rate: self.float(DISCOUNT_RATE),
            late: self.float(LATE_RISK) != 0.0,
            order_date: self.date(ORDER_DATE),
        }
    }

    fn raw(&self, column: &'static str) -> Option<String> {
        let cell = self.row.get(self.index.position(column))?;
        let text = String::from_utf8_lossy(cell).trim().to_string();
        (!text.is_empty()).then_some(text)
    }

    fn text(&mut self, column: &'static str) -> String {
        match self.raw(column) {
            Some(text) => text,
            None => {
                self.report.defaulted_cells += 1;
                MISSING_TEXT.to_string()
            }
        }
    }

    fn float(&mut self, column: &'static str) -> f64 {
        match self.raw(column).and_then(|text| text.parse::<f64>().ok()) {
            Some(value) if value.is_finite() => value,
            _ => {
                self.report.defaulted_cells += 1;
                0.0
            }
        }
    }

    /// Day counts outside the `i32` range are treated as unparseable.
    fn integer(&mut self, column: &'static str) -> i64 {
        let parsed = self.raw(column).and_then(|text| {
            text.parse::<i64>()
                .ok()
                .or_else(|| {
                    text.parse::<f64>()
                        .ok()
                        .filter(|value| value.is_finite())
                        .map(|value| value.trunc() as i64)
                })
                .and_then(|value| i32::try_from(value).ok())
                .map(i64::from)
        });
        match parsed {
            Some(value) => value,
            None => {
                self.report.defaulted_cells += 1;
                0
            }
        }
    }

    fn date(&mut self, column: &'static str) -> PrimitiveDateTime {
        match self.raw(column).and_then(|text| parse_order_date(&text)) {
            Some(date) => date,
            None => {
                self.report.coerced_dates += 1;
                DATE_SENTINEL
            }
        }
    }
}

/// Parse an order timestamp in any of the accepted layouts.
pub(crate) fn parse_order_date(text: &str) -> Option<PrimitiveDateTime> {
    DATETIME_FORMATS
        .iter()
        .find_map(|format| PrimitiveDateTime::parse(text, *format).ok())
        .or_else(|| {
            DATE_FORMATS
                .iter()
                .find_map(|format| Date::parse(text, *format).ok())
                .map(|date| date.with_time(Time::MIDNIGHT))
        })
}
