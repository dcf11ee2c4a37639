use ndarray::{Array1, Array2, Axis};
use rand::rngs::StdRng;
use rand::{SeedableRng, seq::SliceRandom};
use tracing::{debug, info};

use super::{TrainedModel, sigmoid};
use crate::dataset::{Dataset, OrderRecord};
use crate::ml::metrics::Evaluation;
use crate::ml::{Feature, FittedEncoders, TrainingError};

/// Smallest dataset that can still yield two non-trivial partitions.
const MIN_TRAINING_ROWS: usize = 5;
const PROBABILITY_EPSILON: f64 = 1e-15;

/// Training options for the late-delivery classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainOptions {
    /// Hard cap on full-batch gradient steps.
    pub max_iterations: usize,
    pub learning_rate: f64,
    pub l2: f64,
    /// Stop early once the loss changes by less than this.
    pub tolerance: f64,
    pub seed: u64,
    /// Share of rows held out for accuracy.
    pub holdout_fraction: f64,
    pub min_rows: usize,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            max_iterations: 1_000,
            learning_rate: 0.5,
            l2: 1e-4,
            tolerance: 1e-7,
            seed: 42,
            holdout_fraction: 0.2,
            min_rows: 10,
        }
    }
}

/// Fit encoders and a logistic regression on `dataset`, scoring it on a
/// seeded held-out split.
pub fn train(dataset: &Dataset, options: &TrainOptions) -> Result<TrainedModel, TrainingError> {
    let rows = dataset.len();
    let required = options.min_rows.max(MIN_TRAINING_ROWS);
    if rows < required {
        return Err(TrainingError::InsufficientRows { rows, required });
    }
    let late_rows = dataset.iter().filter(|record| record.late).count();
    if late_rows == 0 || late_rows == rows {
        return Err(TrainingError::SingleClass {
            late: late_rows == rows,
        });
    }

    let encoders = FittedEncoders::fit(dataset);
    let features = Feature::ALL.to_vec();
    let mut x = Array2::<f64>::zeros((rows, features.len()));
    for (mut row, record) in x.rows_mut().into_iter().zip(dataset) {
        for (slot, value) in row.iter_mut().zip(encoders.vectorize_record(record)?) {
            *slot = value;
        }
    }
    let y: Array1<f64> = dataset.iter().map(OrderRecord::late_flag).collect();

    let split = HoldoutSplit::shuffled(rows, options.holdout_fraction, options.seed)?;
    let x_train = x.select(Axis(0), &split.train);
    let y_train = y.select(Axis(0), &split.train);
    let late_in_train = y_train.sum();
    if late_in_train == 0.0 || late_in_train == y_train.len() as f64 {
        return Err(TrainingError::SingleClassPartition {
            late: late_in_train > 0.0,
        });
    }

    let scaler = Scaler::fit(&x_train)?;
    let fit = gradient_descent(&scaler.transform(&x_train), &y_train, options);
    let weights = &fit.weights / &scaler.scale;
    let bias = fit.bias - (&weights * &scaler.mean).sum();

    let mut model = TrainedModel {
        features,
        encoders,
        weights: weights.to_vec(),
        bias,
        accuracy: 0.0,
        evaluation: Evaluation::from_predictions(std::iter::empty()),
        training_rows: split.train.len(),
        holdout_rows: split.holdout.len(),
        iterations: fit.iterations,
        converged: fit.converged,
    };
    model.validate()?;

    let evaluation = Evaluation::from_predictions(split.holdout.iter().map(|&idx| {
        let predicted = model.late_probability(&x.row(idx).to_vec()) > 0.5;
        (y[idx] > 0.5, predicted)
    }));
    model.accuracy = evaluation.accuracy;
    model.evaluation = evaluation;

    info!(
        "Trained late-delivery model on {} rows ({} held out): accuracy {:.4} after {} iterations{}",
        model.training_rows,
        model.holdout_rows,
        model.accuracy,
        model.iterations,
        if model.converged { "" } else { " (iteration cap reached)" }
    );
    Ok(model)
}

struct HoldoutSplit {
    train: Vec<usize>,
    holdout: Vec<usize>,
}

impl HoldoutSplit {
    fn shuffled(rows: usize, fraction: f64, seed: u64) -> Result<Self, TrainingError> {
        let mut indices: Vec<usize> = (0..rows).collect();
        let mut rng = StdRng::seed_from_u64(seed);
        indices.shuffle(&mut rng);

        let holdout_len = (rows as f64 * fraction).ceil() as usize;
        if holdout_len == 0 {
            return Err(TrainingError::EmptyPartition {
                partition: "held-out",
            });
        }
        if holdout_len >= rows {
            return Err(TrainingError::EmptyPartition {
                partition: "training",
            });
        }
        let train = indices.split_off(holdout_len);
        Ok(Self {
            train,
            holdout: indices,
        })
    }
}

/// Per-column standardization fitted on the training split.
struct Scaler {
    mean: Array1<f64>,
    scale: Array1<f64>,
}

impl Scaler {
    fn fit(x: &Array2<f64>) -> Result<Self, TrainingError> {
        let mean = x.mean_axis(Axis(0)).ok_or(TrainingError::EmptyPartition {
            partition: "training",
        })?;
        let scale = x
            .std_axis(Axis(0), 0.0)
            .mapv(|std| if std > 1e-12 { std } else { 1.0 });
        Ok(Self { mean, scale })
    }

    fn transform(&self, x: &Array2<f64>) -> Array2<f64> {
        (x - &self.mean) / &self.scale
    }
}

struct Fit {
    weights: Array1<f64>,
    bias: f64,
    iterations: usize,
    converged: bool,
}

fn gradient_descent(x: &Array2<f64>, y: &Array1<f64>, options: &TrainOptions) -> Fit {
    let n = x.nrows() as f64;
    let lr = options.learning_rate;
    let l2 = options.l2.max(0.0);
    let mut weights = Array1::<f64>::zeros(x.ncols());
    let mut bias = 0.0;
    let mut previous_loss = f64::INFINITY;
    let mut iterations = 0;
    let mut converged = false;

    for iteration in 1..=options.max_iterations.max(1) {
        iterations = iteration;
        let probs = (x.dot(&weights) + bias).mapv(sigmoid);
        let loss = log_loss(&probs, y) + 0.5 * l2 * weights.dot(&weights);
        if (previous_loss - loss).abs() < options.tolerance {
            converged = true;
            break;
        }
        previous_loss = loss;
        if iteration % 100 == 0 {
            debug!("logreg iteration {iteration}: loss {loss:.6}");
        }

        let residual = &probs - y;
        let grad_w = x.t().dot(&residual) / n + &weights * l2;
        let grad_b = residual.sum() / n;
        weights.scaled_add(-lr, &grad_w);
        bias -= lr * grad_b;
    }

    Fit {
        weights,
        bias,
        iterations,
        converged,
    }
}

fn log_loss(probs: &Array1<f64>, y: &Array1<f64>) -> f64 {
    let n = probs.len().max(1) as f64;
    probs
        .iter()
        .zip(y)
        .map(|(&p, &t)| {
            let p = p.clamp(PROBABILITY_EPSILON, 1.0 - PROBABILITY_EPSILON);
            -(t * p.ln() + (1.0 - t) * (1.0 - p).ln())
        })
        .sum::<f64>()
        / n
}
