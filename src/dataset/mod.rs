//! Order dataset: the record schema, CSV loading and filtered views.

mod columns;
mod filter;
mod loader;
mod record;

pub use columns::{CategoricalColumn, REQUIRED_COLUMNS, normalize_header};
pub use filter::{DateRange, OrderFilter};
pub use loader::{DatasetLoadError, LoadReport, LoadedOrders, load_csv, load_csv_from_reader};
pub use record::{DATE_SENTINEL, Dataset, OrderRecord};

#[cfg(test)]
pub(crate) use record::fixtures;
