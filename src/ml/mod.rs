//! Late-delivery prediction: categorical encoders, a binary logistic
//! regression head, held-out evaluation and coefficient-based explanations.

pub mod encoder;
mod error;
pub mod features;
mod importance;
pub mod logreg;
pub mod metrics;

pub use encoder::{CategoryEncoder, Encoded};
pub use error::{PredictError, TrainingError};
pub use features::{Feature, FittedEncoders, PredictionInput};
pub use importance::{FeatureImportance, feature_importance};
pub use logreg::{Prediction, TrainOptions, TrainedModel, predict, train};
