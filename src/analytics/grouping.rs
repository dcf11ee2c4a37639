use std::collections::BTreeMap;

use serde::Serialize;

use crate::dataset::{CategoricalColumn, Dataset, OrderRecord};

use super::DiscountBuckets;

/// Dimension a grouped table is keyed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupKey {
    Region,
    ShippingMode,
    Category,
    /// Equal-width buckets over the observed discount range.
    DiscountBucket { bins: usize },
}

/// Per-row quantity being aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueColumn {
    /// Late flag as 0/1, so its mean is a rate in `[0, 1]`.
    LateRisk,
    Sales,
    Profit,
    /// Actual minus scheduled shipping days.
    DelayDays,
}

impl ValueColumn {
    fn extract(self, record: &OrderRecord) -> f64 {
        match self {
            Self::LateRisk => record.late_flag(),
            Self::Sales => record.sales,
            Self::Profit => record.profit,
            Self::DelayDays => record.delay_days() as f64,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Aggregator {
    Mean,
    Sum,
    Count,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    /// Highest statistic first; ties keep key order.
    ValueDescending,
    /// Lexicographic for categories, bucket order for discount buckets.
    KeyAscending,
}

/// One row of a grouped table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    pub key: String,
    pub value: f64,
    /// Order lines that fell into the group.
    pub rows: usize,
}

/// Ordered mapping from group key to statistic.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct RankedTable {
    rows: Vec<RankedRow>,
}

impl RankedTable {
    pub fn rows(&self) -> &[RankedRow] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.rows.iter().find(|row| row.key == key).map(|row| row.value)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.rows.iter().map(|row| row.key.as_str())
    }

    /// Keep only the first `limit` rows.
    pub fn truncated(mut self, limit: usize) -> Self {
        self.rows.truncate(limit);
        self
    }
}

#[derive(Debug, Clone, Copy, Default)]
struct Accumulator {
    sum: f64,
    rows: usize,
}

impl Accumulator {
    fn push(&mut self, value: f64) {
        self.sum += value;
        self.rows += 1;
    }

    fn finish(self, key: String, aggregator: Aggregator) -> RankedRow {
        let value = match aggregator {
            Aggregator::Mean => self.sum / self.rows as f64,
            Aggregator::Sum => self.sum,
            Aggregator::Count => self.rows as f64,
        };
        RankedRow {
            key,
            value,
            rows: self.rows,
        }
    }
}

/// Group `dataset` by `key` and reduce `value` with `aggregator`.
///
/// Only non-empty groups appear, so a mean is always defined; an empty
/// dataset yields an empty table.
pub fn grouped_rate(
    dataset: &Dataset,
    key: GroupKey,
    value: ValueColumn,
    aggregator: Aggregator,
    order: SortOrder,
) -> RankedTable {
    let rows = match key {
        GroupKey::Region => group_categorical(dataset, CategoricalColumn::Region, value, aggregator),
        GroupKey::ShippingMode => {
            group_categorical(dataset, CategoricalColumn::ShippingMode, value, aggregator)
        }
        GroupKey::Category => {
            group_categorical(dataset, CategoricalColumn::Category, value, aggregator)
        }
        GroupKey::DiscountBucket { bins } => group_discount(dataset, bins, value, aggregator),
    };
    let mut table = RankedTable { rows };
    if order == SortOrder::ValueDescending {
        table.rows.sort_by(|a, b| b.value.total_cmp(&a.value));
    }
    table
}

/// Mean late flag per region, highest risk first.
pub fn region_late_risk(dataset: &Dataset) -> RankedTable {
    grouped_rate(
        dataset,
        GroupKey::Region,
        ValueColumn::LateRisk,
        Aggregator::Mean,
        SortOrder::ValueDescending,
    )
}

fn group_categorical(
    dataset: &Dataset,
    column: CategoricalColumn,
    value: ValueColumn,
    aggregator: Aggregator,
) -> Vec<RankedRow> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for record in dataset {
        groups
            .entry(column.value(record))
            .or_default()
            .push(value.extract(record));
    }
    groups
        .into_iter()
        .map(|(key, acc)| acc.finish(key.to_string(), aggregator))
        .collect()
}

fn group_discount(
    dataset: &Dataset,
    bins: usize,
    value: ValueColumn,
    aggregator: Aggregator,
) -> Vec<RankedRow> {
    let Some(buckets) = DiscountBuckets::fit(dataset.iter().map(|r| r.discount_rate), bins) else {
        return Vec::new();
    };
    let mut groups = vec![Accumulator::default(); buckets.len()];
    for record in dataset {
        if let Some(index) = buckets.index_of(record.discount_rate) {
            groups[index].push(value.extract(record));
        }
    }
    groups
        .into_iter()
        .enumerate()
        .filter(|(_, acc)| acc.rows > 0)
        .map(|(index, acc)| acc.finish(buckets.label(index), aggregator))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::fixtures::{order, three_line_dataset};

    fn sample() -> Dataset {
        let mut records = three_line_dataset().records().to_vec();
        let mut c1 = order("3", 40.0, 4.0, true, "C");
        c1.shipping_mode = "First Class".to_string();
        c1.discount_rate = 0.25;
        let mut c2 = order("4", 60.0, 6.0, false, "C");
        c2.shipping_mode = "First Class".to_string();
        c2.discount_rate = 0.0;
        c2.actual_days = 6;
        records.push(c1);
        records.push(c2);
        Dataset::new(records)
    }

    #[test]
    fn region_risk_is_sorted_descending_within_unit_interval() {
        let table = region_late_risk(&sample());
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["A", "C", "B"]);
        assert_eq!(table.get("A"), Some(1.0));
        assert_eq!(table.get("C"), Some(0.5));
        assert_eq!(table.get("B"), Some(0.0));
        for pair in table.rows().windows(2) {
            assert!(pair[0].value >= pair[1].value);
        }
        assert!(table.rows().iter().all(|row| (0.0..=1.0).contains(&row.value)));
    }

    #[test]
    fn equal_rates_keep_key_order() {
        let dataset = Dataset::new(vec![
            order("1", 1.0, 0.0, true, "Zeta"),
            order("2", 1.0, 0.0, true, "Alpha"),
            order("3", 1.0, 0.0, false, "Mid"),
        ]);
        let keys: Vec<String> = region_late_risk(&dataset).keys().map(String::from).collect();
        assert_eq!(keys, vec!["Alpha", "Zeta", "Mid"]);
    }

    #[test]
    fn sum_and_count_by_category() {
        let mut records = sample().records().to_vec();
        records[4].category = "Golf".to_string();
        let dataset = Dataset::new(records);

        let sales = grouped_rate(
            &dataset,
            GroupKey::Category,
            ValueColumn::Sales,
            Aggregator::Sum,
            SortOrder::ValueDescending,
        );
        assert_eq!(sales.rows()[0].key, "Cleats");
        assert_eq!(sales.get("Cleats"), Some(390.0));
        assert_eq!(sales.get("Golf"), Some(60.0));

        let counts = grouped_rate(
            &dataset,
            GroupKey::Category,
            ValueColumn::Sales,
            Aggregator::Count,
            SortOrder::KeyAscending,
        );
        assert_eq!(counts.get("Cleats"), Some(4.0));
        assert_eq!(counts.rows()[1].rows, 1);
    }

    #[test]
    fn delay_by_mode_in_key_order() {
        let table = grouped_rate(
            &sample(),
            GroupKey::ShippingMode,
            ValueColumn::DelayDays,
            Aggregator::Mean,
            SortOrder::KeyAscending,
        );
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["First Class", "Standard Class"]);
        assert_eq!(table.get("First Class"), Some(2.5));
        assert_eq!(table.get("Standard Class"), Some(1.0));
    }

    #[test]
    fn discount_buckets_skip_empty_bins() {
        let table = grouped_rate(
            &sample(),
            GroupKey::DiscountBucket { bins: 5 },
            ValueColumn::LateRisk,
            Aggregator::Mean,
            SortOrder::KeyAscending,
        );
        let keys: Vec<&str> = table.keys().collect();
        assert_eq!(keys, vec!["(0, 0.05]", "(0.05, 0.1]", "(0.2, 0.25]"]);
        assert_eq!(table.get("(0, 0.05]"), Some(0.0));
        assert_eq!(table.get("(0.05, 0.1]"), Some(2.0 / 3.0));
        assert_eq!(table.get("(0.2, 0.25]"), Some(1.0));
    }

    #[test]
    fn empty_dataset_gives_empty_tables() {
        let empty = Dataset::default();
        assert!(region_late_risk(&empty).is_empty());
        let buckets = grouped_rate(
            &empty,
            GroupKey::DiscountBucket { bins: 5 },
            ValueColumn::LateRisk,
            Aggregator::Mean,
            SortOrder::KeyAscending,
        );
        assert!(buckets.is_empty());
    }
}
