use std::collections::HashSet;
use std::sync::Arc;

use serde::Serialize;
use time::PrimitiveDateTime;
use time::macros::datetime;

use super::CategoricalColumn;

/// Timestamp assigned to rows whose order date could not be parsed.
pub const DATE_SENTINEL: PrimitiveDateTime = datetime!(1970-01-01 0:00);

/// One order line. Several lines may share an `order_id`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderRecord {
    pub order_id: String,
    pub sales: f64,
    pub profit: f64,
    pub scheduled_days: i64,
    pub actual_days: i64,
    pub shipping_mode: String,
    pub region: String,
    pub category: String,
    /// Fraction in `[0, 1]`.
    pub discount_rate: f64,
    pub late: bool,
    pub order_date: PrimitiveDateTime,
}

impl OrderRecord {
    /// Actual minus scheduled shipping days; negative when shipped early.
    pub fn delay_days(&self) -> i64 {
        self.actual_days.saturating_sub(self.scheduled_days)
    }

    pub fn late_flag(&self) -> f64 {
        if self.late { 1.0 } else { 0.0 }
    }
}

/// Immutable, cheaply cloneable collection of order lines.
///
/// Filtering builds a new dataset; the records behind an existing one never
/// change, so clones can be handed to other threads freely.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Arc<[OrderRecord]>,
}

impl Dataset {
    pub fn new(records: Vec<OrderRecord>) -> Self {
        Self {
            records: records.into(),
        }
    }

    pub fn records(&self) -> &[OrderRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, OrderRecord> {
        self.records.iter()
    }

    /// First `limit` rows, for the order-level table.
    pub fn head(&self, limit: usize) -> &[OrderRecord] {
        &self.records[..limit.min(self.records.len())]
    }

    /// New dataset holding the rows that satisfy `keep`, in original order.
    pub fn retain<F>(&self, mut keep: F) -> Self
    where
        F: FnMut(&OrderRecord) -> bool,
    {
        self.records
            .iter()
            .filter(|record| keep(record))
            .cloned()
            .collect()
    }

    /// Distinct values of a categorical column in first-seen order.
    pub fn distinct(&self, column: CategoricalColumn) -> Vec<String> {
        let mut seen = HashSet::new();
        self.records
            .iter()
            .map(|record| column.value(record))
            .filter(|value| seen.insert(*value))
            .map(str::to_string)
            .collect()
    }

    /// Earliest and latest order date, or `None` when empty.
    pub fn date_bounds(&self) -> Option<(PrimitiveDateTime, PrimitiveDateTime)> {
        let mut dates = self.records.iter().map(|record| record.order_date);
        let first = dates.next()?;
        Some(dates.fold((first, first), |(lo, hi), date| (lo.min(date), hi.max(date))))
    }
}

impl FromIterator<OrderRecord> for Dataset {
    fn from_iter<I: IntoIterator<Item = OrderRecord>>(iter: I) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a OrderRecord;
    type IntoIter = std::slice::Iter<'a, OrderRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
