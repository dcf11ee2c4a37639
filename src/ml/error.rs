use thiserror::Error;

/// Why a training run could not produce a model.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum TrainingError {
    #[error("Need at least {required} order lines to train, found {rows}")]
    InsufficientRows { rows: usize, required: usize },
    #[error("Every order line is {}; there is nothing to learn", outcome(.late))]
    SingleClass { late: bool },
    #[error("The {partition} split is empty; add more order lines")]
    EmptyPartition { partition: &'static str },
    #[error("The training split only contains {} order lines; add more data", outcome(.late))]
    SingleClassPartition { late: bool },
    #[error("Failed to encode training rows: {0}")]
    Encoding(#[from] PredictError),
    #[error("Training diverged; try a smaller learning rate")]
    Diverged,
}

fn outcome(late: &bool) -> &'static str {
    if *late { "late" } else { "on time" }
}

/// Why a prediction request was rejected.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictError {
    /// The value was never seen when the model's encoders were fitted.
    #[error("{feature} value `{value}` was not present in the training data")]
    UnknownCategory { feature: &'static str, value: String },
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },
}
