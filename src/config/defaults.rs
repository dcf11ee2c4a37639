use std::path::PathBuf;

pub(super) const MAX_DISCOUNT_BUCKETS: usize = 50;

pub(super) fn default_dataset_path() -> Option<PathBuf> {
    Some(PathBuf::from("DataCoSupplyChainDataset1.csv"))
}

pub(super) fn default_seed() -> u64 {
    42
}

pub(super) fn default_max_iterations() -> usize {
    1_000
}

pub(super) fn default_learning_rate() -> f64 {
    0.5
}

pub(super) fn default_l2() -> f64 {
    1e-4
}

pub(super) fn default_tolerance() -> f64 {
    1e-7
}

pub(super) fn default_holdout_fraction() -> f64 {
    0.2
}

pub(super) fn default_min_rows() -> usize {
    10
}

pub(super) fn default_discount_buckets() -> usize {
    5
}

pub(super) fn default_top_categories() -> usize {
    10
}

pub(super) fn default_log_level() -> String {
    "info".to_string()
}

pub(super) fn default_true() -> bool {
    true
}

pub(super) fn default_max_log_files() -> usize {
    10
}

pub(super) fn clamp_holdout_fraction(value: f64) -> f64 {
    if value.is_finite() {
        value.clamp(0.05, 0.5)
    } else {
        default_holdout_fraction()
    }
}

pub(super) fn clamp_positive(value: f64, fallback: f64) -> f64 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}
