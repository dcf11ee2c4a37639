use std::collections::BTreeSet;

use time::Date;

use super::{CategoricalColumn, Dataset, OrderRecord};

/// Inclusive calendar-day range over order dates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: Date,
    end: Date,
}

impl DateRange {
    /// Build a range; bounds are swapped if given in reverse.
    pub fn new(start: Date, end: Date) -> Self {
        Self {
            start: start.min(end),
            end: start.max(end),
        }
    }

    pub fn start(&self) -> Date {
        self.start
    }

    pub fn end(&self) -> Date {
        self.end
    }

    pub fn contains(&self, date: Date) -> bool {
        self.start <= date && date <= self.end
    }
}

/// Sidebar selections combined with logical AND.
///
/// `None` leaves a dimension unconstrained. `Some` of an empty set matches
/// nothing, the same as a multi-select with every option cleared.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OrderFilter {
    pub regions: Option<BTreeSet<String>>,
    pub shipping_modes: Option<BTreeSet<String>>,
    pub categories: Option<BTreeSet<String>>,
    pub date_range: Option<DateRange>,
}

impl OrderFilter {
    pub fn with_regions<I, S>(mut self, regions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.regions = Some(regions.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_shipping_modes<I, S>(mut self, modes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.shipping_modes = Some(modes.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.categories = Some(categories.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_date_range(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    pub fn is_unconstrained(&self) -> bool {
        self.regions.is_none()
            && self.shipping_modes.is_none()
            && self.categories.is_none()
            && self.date_range.is_none()
    }

    pub fn matches(&self, record: &OrderRecord) -> bool {
        let in_set = |set: &Option<BTreeSet<String>>, column: CategoricalColumn| {
            set.as_ref()
                .is_none_or(|allowed| allowed.contains(column.value(record)))
        };
        self.date_range
            .is_none_or(|range| range.contains(record.order_date.date()))
            && in_set(&self.shipping_modes, CategoricalColumn::ShippingMode)
            && in_set(&self.categories, CategoricalColumn::Category)
            && in_set(&self.regions, CategoricalColumn::Region)
    }
}

impl Dataset {
    /// Rows matching every constraint of `filter`, as a new dataset.
    pub fn filter(&self, filter: &OrderFilter) -> Dataset {
        if filter.is_unconstrained() {
            return self.clone();
        }
        self.retain(|record| filter.matches(record))
    }
}
