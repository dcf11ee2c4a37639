use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::ml::TrainOptions;

use super::defaults::{
    MAX_DISCOUNT_BUCKETS, clamp_holdout_fraction, clamp_positive, default_dataset_path,
    default_discount_buckets, default_holdout_fraction, default_l2, default_learning_rate,
    default_log_level, default_max_iterations, default_max_log_files, default_min_rows,
    default_seed, default_tolerance, default_top_categories, default_true,
};

/// Complete dashboard configuration.
///
/// Config sections (TOML): `dataset`, `training`, `charts`, `logging`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub dataset: DatasetSettings,
    #[serde(default)]
    pub training: TrainingSettings,
    #[serde(default)]
    pub charts: ChartSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

impl DashboardConfig {
    /// Clamp out-of-range values back into their supported ranges.
    pub fn normalized(self) -> Self {
        Self {
            dataset: self.dataset,
            training: self.training.normalized(),
            charts: self.charts.normalized(),
            logging: self.logging,
        }
    }
}

/// Where the order dataset is read from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DatasetSettings {
    /// CSV file loaded when no `--data` argument is given.
    #[serde(default = "default_dataset_path")]
    pub path: Option<PathBuf>,
}

impl Default for DatasetSettings {
    fn default() -> Self {
        Self {
            path: default_dataset_path(),
        }
    }
}

/// Hyperparameters for the late-delivery classifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrainingSettings {
    /// Seed for the train/held-out shuffle.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Hard cap on gradient-descent iterations.
    #[serde(default = "default_max_iterations")]
    pub max_iterations: usize,
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    #[serde(default = "default_l2")]
    pub l2: f64,
    /// Stop once the loss improves by less than this between iterations.
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,
    /// Fraction of rows held out for accuracy (clamped to `0.05..=0.5`).
    #[serde(default = "default_holdout_fraction")]
    pub holdout_fraction: f64,
    /// Minimum filtered rows required before training is attempted.
    #[serde(default = "default_min_rows")]
    pub min_rows: usize,
}

impl Default for TrainingSettings {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            max_iterations: default_max_iterations(),
            learning_rate: default_learning_rate(),
            l2: default_l2(),
            tolerance: default_tolerance(),
            holdout_fraction: default_holdout_fraction(),
            min_rows: default_min_rows(),
        }
    }
}

impl TrainingSettings {
    fn normalized(self) -> Self {
        Self {
            max_iterations: self.max_iterations.max(1),
            learning_rate: clamp_positive(self.learning_rate, default_learning_rate()),
            l2: if self.l2.is_finite() { self.l2.max(0.0) } else { default_l2() },
            tolerance: if self.tolerance.is_finite() {
                self.tolerance.max(0.0)
            } else {
                default_tolerance()
            },
            holdout_fraction: clamp_holdout_fraction(self.holdout_fraction),
            min_rows: self.min_rows.max(2),
            ..self
        }
    }
}

impl From<&TrainingSettings> for TrainOptions {
    fn from(settings: &TrainingSettings) -> Self {
        Self {
            max_iterations: settings.max_iterations,
            learning_rate: settings.learning_rate,
            l2: settings.l2,
            tolerance: settings.tolerance,
            seed: settings.seed,
            holdout_fraction: settings.holdout_fraction,
            min_rows: settings.min_rows,
        }
    }
}

/// Shape of the chart tables.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSettings {
    /// Equal-width bins used for the discount-level chart.
    #[serde(default = "default_discount_buckets")]
    pub discount_buckets: usize,
    /// Categories kept in the sales-by-category chart.
    #[serde(default = "default_top_categories")]
    pub top_categories: usize,
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self {
            discount_buckets: default_discount_buckets(),
            top_categories: default_top_categories(),
        }
    }
}

impl ChartSettings {
    fn normalized(self) -> Self {
        Self {
            discount_buckets: self.discount_buckets.clamp(1, MAX_DISCOUNT_BUCKETS),
            top_categories: self.top_categories.max(1),
        }
    }
}

/// Tracing output options.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingSettings {
    /// `EnvFilter` directive used when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Also write a per-run log file under the app logs directory.
    #[serde(default = "default_true")]
    pub file_logging: bool,
    #[serde(default = "default_max_log_files")]
    pub max_log_files: usize,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            file_logging: default_true(),
            max_log_files: default_max_log_files(),
        }
    }
}
