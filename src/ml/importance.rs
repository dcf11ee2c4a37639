use serde::Serialize;

use super::{Feature, TrainedModel};

/// One row of the "why" table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureImportance {
    pub feature: Feature,
    pub name: &'static str,
    pub coefficient: f64,
    pub absolute_impact: f64,
}

/// Coefficients paired with the model's own feature list, strongest first.
pub fn feature_importance(model: &TrainedModel) -> Vec<FeatureImportance> {
    let mut rows: Vec<FeatureImportance> = model
        .features
        .iter()
        .zip(&model.weights)
        .map(|(&feature, &coefficient)| FeatureImportance {
            feature,
            name: feature.name(),
            coefficient,
            absolute_impact: coefficient.abs(),
        })
        .collect();
    rows.sort_by(|a, b| b.absolute_impact.total_cmp(&a.absolute_impact));
    rows
}
