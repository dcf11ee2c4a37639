//! Held-out evaluation for the late-delivery classifier.

use serde::Serialize;

/// Class index of on-time orders.
pub const ON_TIME: usize = 0;
/// Class index of late orders.
pub const LATE: usize = 1;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
/// Confusion matrix for a `K`-class classifier.
pub struct ConfusionMatrix {
    /// Number of classes.
    pub n_classes: usize,
    /// Row-major `KxK` counts (`truth * K + predicted`).
    pub counts: Vec<u32>,
}

impl ConfusionMatrix {
    /// Create an empty `KxK` confusion matrix.
    pub fn new(n_classes: usize) -> Self {
        Self {
            n_classes,
            counts: vec![0; n_classes * n_classes],
        }
    }

    pub fn add(&mut self, truth: usize, predicted: usize) {
        if truth >= self.n_classes || predicted >= self.n_classes {
            return;
        }
        let idx = truth * self.n_classes + predicted;
        self.counts[idx] = self.counts[idx].saturating_add(1);
    }

    pub fn get(&self, truth: usize, predicted: usize) -> u32 {
        self.counts[truth * self.n_classes + predicted]
    }

    pub fn total(&self) -> u64 {
        self.counts.iter().map(|&v| u64::from(v)).sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Precision/recall statistics for a single class.
pub struct PerClassStats {
    /// `TP / (TP + FP)`.
    pub precision: f64,
    /// `TP / (TP + FN)`.
    pub recall: f64,
    /// Total number of true examples for the class.
    pub support: u32,
}

/// Summary of a model's performance on the held-out split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Evaluation {
    /// Fraction of held-out rows classified correctly.
    pub accuracy: f64,
    pub confusion: ConfusionMatrix,
    pub late: PerClassStats,
    pub on_time: PerClassStats,
}

impl Evaluation {
    /// Score binary predictions (`true` = late) against held-out truth.
    pub fn from_predictions<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (bool, bool)>,
    {
        let mut confusion = ConfusionMatrix::new(2);
        for (truth, predicted) in pairs {
            confusion.add(usize::from(truth), usize::from(predicted));
        }
        let mut per_class = precision_recall_by_class(&confusion).into_iter();
        let on_time = per_class.next().unwrap_or_else(PerClassStats::empty);
        let late = per_class.next().unwrap_or_else(PerClassStats::empty);
        Self {
            accuracy: accuracy(&confusion),
            confusion,
            late,
            on_time,
        }
    }
}

impl PerClassStats {
    fn empty() -> Self {
        Self {
            precision: 0.0,
            recall: 0.0,
            support: 0,
        }
    }
}

/// Compute per-class precision and recall from a confusion matrix.
pub fn precision_recall_by_class(cm: &ConfusionMatrix) -> Vec<PerClassStats> {
    let k = cm.n_classes;
    (0..k)
        .map(|class_idx| {
            let tp = f64::from(cm.get(class_idx, class_idx));
            let mut fp = 0.0;
            let mut fn_ = 0.0;
            let mut support = 0u32;
            for j in 0..k {
                let v = cm.get(class_idx, j);
                support = support.saturating_add(v);
                if j != class_idx {
                    fn_ += f64::from(v);
                    fp += f64::from(cm.get(j, class_idx));
                }
            }
            PerClassStats {
                precision: if tp + fp == 0.0 { 0.0 } else { tp / (tp + fp) },
                recall: if tp + fn_ == 0.0 { 0.0 } else { tp / (tp + fn_) },
                support,
            }
        })
        .collect()
}

/// Compute overall accuracy from a confusion matrix.
pub fn accuracy(cm: &ConfusionMatrix) -> f64 {
    let total = cm.total();
    if total == 0 {
        return 0.0;
    }
    let correct: u64 = (0..cm.n_classes).map(|c| u64::from(cm.get(c, c))).sum();
    correct as f64 / total as f64
}
