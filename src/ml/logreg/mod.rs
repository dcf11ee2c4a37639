//! Binary logistic regression for late-delivery risk.

use serde::Serialize;

use super::metrics::Evaluation;
use super::{Feature, FittedEncoders, PredictError, PredictionInput, TrainingError};

mod train;
pub use train::{TrainOptions, train};

/// Everything produced by one training run.
///
/// Encoders and the feature list travel with the weights, so scoring and
/// explanations can never pair coefficients with the wrong inputs.
#[derive(Debug, Clone, Serialize)]
pub struct TrainedModel {
    /// Column order of `weights`.
    pub features: Vec<Feature>,
    pub encoders: FittedEncoders,
    /// Coefficients on the raw (unscaled) feature values.
    pub weights: Vec<f64>,
    pub bias: f64,
    /// Fraction of held-out rows classified correctly.
    pub accuracy: f64,
    pub evaluation: Evaluation,
    pub training_rows: usize,
    pub holdout_rows: usize,
    pub iterations: usize,
    pub converged: bool,
}

/// Late / on-time probability pair for one order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Prediction {
    pub late_probability: f64,
    pub on_time_probability: f64,
}

impl Prediction {
    fn from_late_probability(late_probability: f64) -> Self {
        let late_probability = late_probability.clamp(0.0, 1.0);
        Self {
            late_probability,
            on_time_probability: 1.0 - late_probability,
        }
    }

    /// More likely late than on time.
    pub fn is_high_risk(&self) -> bool {
        self.late_probability > 0.5
    }
}

impl TrainedModel {
    /// Check dimensions and that training produced finite parameters.
    pub fn validate(&self) -> Result<(), TrainingError> {
        if self.weights.len() != self.features.len() {
            return Err(TrainingError::Diverged);
        }
        if !self.bias.is_finite() || self.weights.iter().any(|w| !w.is_finite()) {
            return Err(TrainingError::Diverged);
        }
        Ok(())
    }

    /// Probability that an already-encoded row is late.
    pub fn late_probability(&self, row: &[f64]) -> f64 {
        let logit = self
            .weights
            .iter()
            .zip(row)
            .fold(self.bias, |sum, (w, x)| sum + w * x);
        sigmoid(logit)
    }

    /// Score one raw order through this model's own encoders.
    pub fn predict(&self, input: &PredictionInput) -> Result<Prediction, PredictError> {
        input.validate()?;
        let row = self.encoders.vectorize_input(input)?;
        Ok(Prediction::from_late_probability(self.late_probability(&row)))
    }
}

/// Score `input` with `model`.
pub fn predict(model: &TrainedModel, input: &PredictionInput) -> Result<Prediction, PredictError> {
    model.predict(input)
}

pub(crate) fn sigmoid(z: f64) -> f64 {
    if z >= 0.0 {
        1.0 / (1.0 + (-z).exp())
    } else {
        let e = z.exp();
        e / (1.0 + e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::CategoryEncoder;

    fn hand_built() -> TrainedModel {
        TrainedModel {
            features: Feature::ALL.to_vec(),
            encoders: FittedEncoders {
                shipping_mode: CategoryEncoder::fit(["First Class", "Standard Class"]),
                region: CategoryEncoder::fit(["East", "West"]),
            },
            weights: vec![-2.0, 0.5, 1.0, 0.0],
            bias: 0.0,
            accuracy: 1.0,
            evaluation: Evaluation::from_predictions(std::iter::empty()),
            training_rows: 0,
            holdout_rows: 0,
            iterations: 0,
            converged: true,
        }
    }

    #[test]
    fn sigmoid_is_stable_at_extremes() {
        assert_eq!(sigmoid(0.0), 0.5);
        assert!(sigmoid(800.0) <= 1.0);
        assert!(sigmoid(-800.0) >= 0.0);
        assert!((sigmoid(2.0) + sigmoid(-2.0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn prediction_pair_sums_to_one() {
        let model = hand_built();
        let input = PredictionInput {
            shipping_mode: "First Class".to_string(),
            scheduled_days: 4,
            discount_rate: 0.3,
            region: "West".to_string(),
        };
        let prediction = model.predict(&input).unwrap();
        assert!((prediction.late_probability - sigmoid(2.3)).abs() < 1e-12);
        assert!((prediction.late_probability + prediction.on_time_probability - 1.0).abs() < 1e-6);
        assert!(prediction.is_high_risk());
    }

    #[test]
    fn unseen_shipping_mode_is_rejected() {
        let model = hand_built();
        let input = PredictionInput {
            shipping_mode: "Drone".to_string(),
            scheduled_days: 2,
            discount_rate: 0.0,
            region: "East".to_string(),
        };
        assert_eq!(
            model.predict(&input),
            Err(PredictError::UnknownCategory {
                feature: "Shipping_Mode",
                value: "Drone".to_string(),
            })
        );
    }

    #[test]
    fn non_finite_weights_fail_validation() {
        let mut model = hand_built();
        assert!(model.validate().is_ok());
        model.weights[1] = f64::NAN;
        assert_eq!(model.validate(), Err(TrainingError::Diverged));
    }
}
