use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalyticsError {
    /// A ratio or mean was requested over zero rows.
    #[error("Cannot compute {metric}: no orders match the current filters")]
    EmptyDataset { metric: &'static str },
}
