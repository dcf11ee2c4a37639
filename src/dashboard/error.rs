use thiserror::Error;

use crate::analytics::AnalyticsError;
use crate::config::ConfigError;
use crate::dataset::DatasetLoadError;
use crate::ml::{PredictError, TrainingError};

/// Everything the front end may have to show the user.
///
/// Every variant is recoverable: the process keeps running and waits for
/// new input or a new training action.
#[derive(Debug, Error)]
pub enum DashboardError {
    #[error(transparent)]
    EmptyDataset(#[from] AnalyticsError),
    #[error(transparent)]
    Training(#[from] TrainingError),
    #[error(transparent)]
    Prediction(#[from] PredictError),
    #[error("No trained model yet; train the prediction model first")]
    UntrainedModel,
    #[error(transparent)]
    Load(#[from] DatasetLoadError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
