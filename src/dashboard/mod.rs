//! Interactive-shell state: filters, the current view, and the model slot.
//!
//! The front end owns one [`Dashboard`]; every widget action maps to one
//! method here and every failure comes back as a [`DashboardError`] the
//! front end can show as a message.

mod error;
pub mod report;
mod session;

use std::sync::Arc;

use serde::Serialize;
use time::PrimitiveDateTime;
use tracing::{info, warn};

use crate::analytics::{
    ChartKind, ChartSeries, KpiSummary, RankedTable, build_chart, compute_kpis, region_late_risk,
};
use crate::config::{ChartSettings, DashboardConfig};
use crate::dataset::{CategoricalColumn, Dataset, OrderFilter, OrderRecord};
use crate::ml::{
    FeatureImportance, Prediction, PredictionInput, TrainOptions, TrainedModel,
    feature_importance, train,
};

pub use error::DashboardError;
pub use session::{ModelSlot, ModelState};

/// Values available to the filter widgets.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilterOptions {
    pub regions: Vec<String>,
    pub shipping_modes: Vec<String>,
    pub categories: Vec<String>,
    pub date_bounds: Option<(PrimitiveDateTime, PrimitiveDateTime)>,
}

impl FilterOptions {
    /// Distinct values in first-seen order, plus the date span.
    pub fn from_dataset(dataset: &Dataset) -> Self {
        Self {
            regions: dataset.distinct(CategoricalColumn::Region),
            shipping_modes: dataset.distinct(CategoricalColumn::ShippingMode),
            categories: dataset.distinct(CategoricalColumn::Category),
            date_bounds: dataset.date_bounds(),
        }
    }
}

/// Everything the descriptive half of the dashboard shows for one view.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub rows: usize,
    /// `None` when the view is empty.
    pub kpis: Option<KpiSummary>,
    pub region_late_risk: RankedTable,
    pub charts: Vec<ChartSeries>,
}

pub struct Dashboard {
    base: Dataset,
    filter: OrderFilter,
    view: Dataset,
    charts: ChartSettings,
    training: TrainOptions,
    model: ModelSlot,
}

impl Dashboard {
    pub fn new(base: Dataset, config: &DashboardConfig) -> Self {
        Self {
            view: base.clone(),
            base,
            filter: OrderFilter::default(),
            charts: config.charts.clone(),
            training: TrainOptions::from(&config.training),
            model: ModelSlot::new(),
        }
    }

    /// Unfiltered dataset as loaded.
    pub fn base(&self) -> &Dataset {
        &self.base
    }

    /// Current filtered view.
    pub fn view(&self) -> &Dataset {
        &self.view
    }

    pub fn filter(&self) -> &OrderFilter {
        &self.filter
    }

    pub fn training_options(&self) -> &TrainOptions {
        &self.training
    }

    /// Options for the filter widgets, taken from the unfiltered data.
    pub fn filter_options(&self) -> FilterOptions {
        FilterOptions::from_dataset(&self.base)
    }

    /// Options for the prediction widgets, taken from the current view.
    pub fn prediction_options(&self) -> FilterOptions {
        FilterOptions::from_dataset(&self.view)
    }

    /// Replace the filter and rebuild the view from the base dataset.
    ///
    /// The trained model, if any, is left in place.
    pub fn apply_filter(&mut self, filter: OrderFilter) -> &Dataset {
        self.view = self.base.filter(&filter);
        self.filter = filter;
        info!(
            "Filter applied: {} of {} order lines in view",
            self.view.len(),
            self.base.len()
        );
        if self.view.is_empty() {
            warn!("Current filter matches no order lines");
        }
        &self.view
    }

    pub fn kpis(&self) -> Result<KpiSummary, DashboardError> {
        Ok(compute_kpis(&self.view)?)
    }

    pub fn region_late_risk(&self) -> RankedTable {
        region_late_risk(&self.view)
    }

    pub fn chart(&self, kind: ChartKind) -> ChartSeries {
        build_chart(kind, &self.view, &self.charts)
    }

    /// All chart series, one scoped thread per chart.
    pub fn charts(&self) -> Vec<ChartSeries> {
        let view = &self.view;
        let settings = &self.charts;
        std::thread::scope(|scope| {
            let handles: Vec<_> = ChartKind::ALL
                .into_iter()
                .map(|kind| scope.spawn(move || build_chart(kind, view, settings)))
                .collect();
            handles
                .into_iter()
                .map(|handle| {
                    handle
                        .join()
                        .unwrap_or_else(|payload| std::panic::resume_unwind(payload))
                })
                .collect()
        })
    }

    /// KPIs, the regional ranking and every chart for the current view.
    pub fn snapshot(&self) -> DashboardSnapshot {
        let view = &self.view;
        let (kpis, region_late_risk, charts) = std::thread::scope(|scope| {
            let kpis = scope.spawn(|| compute_kpis(view).ok());
            let regions = scope.spawn(|| region_late_risk(view));
            let charts = self.charts();
            (
                kpis.join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload)),
                regions
                    .join()
                    .unwrap_or_else(|payload| std::panic::resume_unwind(payload)),
                charts,
            )
        });
        DashboardSnapshot {
            rows: view.len(),
            kpis,
            region_late_risk,
            charts,
        }
    }

    /// Order-level table of the current view; `None` shows every row.
    pub fn order_table(&self, limit: Option<usize>) -> &[OrderRecord] {
        match limit {
            Some(limit) => self.view.head(limit),
            None => self.view.records(),
        }
    }

    /// Train on the current view and install the result.
    ///
    /// On failure the previous model, if any, stays installed.
    pub fn train(&self) -> Result<Arc<TrainedModel>, DashboardError> {
        let model = train(&self.view, &self.training)?;
        info!(
            "Installed model trained on {} rows (accuracy {:.4})",
            model.training_rows, model.accuracy
        );
        Ok(self.model.install(model))
    }

    pub fn model(&self) -> Result<Arc<TrainedModel>, DashboardError> {
        self.model.current().ok_or(DashboardError::UntrainedModel)
    }

    pub fn model_state(&self) -> ModelState {
        self.model.state()
    }

    pub fn predict(&self, input: &PredictionInput) -> Result<Prediction, DashboardError> {
        let model = self.model()?;
        Ok(model.predict(input)?)
    }

    pub fn explain(&self) -> Result<Vec<FeatureImportance>, DashboardError> {
        let model = self.model()?;
        Ok(feature_importance(&model))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::AnalyticsError;
    use crate::dataset::fixtures::{order, three_line_dataset};
    use crate::ml::PredictError;

    fn training_rows() -> Dataset {
        let modes = ["Standard Class", "First Class", "Second Class", "Same Day"];
        let regions = ["Western Europe", "Central America", "South Asia"];
        (0..60)
            .map(|idx| {
                let mut record = order(
                    &format!("{idx}"),
                    100.0 + idx as f64,
                    5.0,
                    idx % 4 == 1 || idx % 4 == 2,
                    regions[idx % 3],
                );
                record.shipping_mode = modes[idx % 4].to_string();
                record.scheduled_days = (idx % 4) as i64 + 1;
                record.discount_rate = (idx % 5) as f64 * 0.05;
                record
            })
            .collect()
    }

    fn dashboard(dataset: Dataset) -> Dashboard {
        Dashboard::new(dataset, &DashboardConfig::default())
    }

    #[test]
    fn kpis_follow_the_filter() {
        let mut dash = dashboard(three_line_dataset());
        assert_eq!(dash.kpis().unwrap().total_orders, 2);

        dash.apply_filter(OrderFilter::default().with_regions(["Nowhere"]));
        assert!(dash.view().is_empty());
        assert!(matches!(
            dash.kpis(),
            Err(DashboardError::EmptyDataset(AnalyticsError::EmptyDataset { .. }))
        ));
        assert!(dash.region_late_risk().is_empty());

        dash.apply_filter(OrderFilter::default());
        assert_eq!(dash.view().len(), 3);
    }

    #[test]
    fn snapshot_matches_individual_calls() {
        let dash = dashboard(three_line_dataset());
        let snapshot = dash.snapshot();
        assert_eq!(snapshot.rows, 3);
        assert_eq!(snapshot.kpis, dash.kpis().ok());
        assert_eq!(snapshot.region_late_risk, dash.region_late_risk());
        let kinds: Vec<ChartKind> = snapshot.charts.iter().map(|chart| chart.kind).collect();
        assert_eq!(kinds, ChartKind::ALL.to_vec());
        assert_eq!(snapshot.charts[0], dash.chart(ChartKind::SalesByCategory));
    }

    #[test]
    fn empty_view_snapshot_has_no_kpis() {
        let mut dash = dashboard(three_line_dataset());
        dash.apply_filter(OrderFilter::default().with_categories(Vec::<String>::new()));
        let snapshot = dash.snapshot();
        assert_eq!(snapshot.rows, 0);
        assert!(snapshot.kpis.is_none());
        assert!(snapshot.charts.iter().all(|chart| chart.table.is_empty()));
    }

    #[test]
    fn order_table_truncates_on_request() {
        let dash = dashboard(three_line_dataset());
        assert_eq!(dash.order_table(Some(2)).len(), 2);
        assert_eq!(dash.order_table(None).len(), 3);
        assert_eq!(dash.order_table(Some(10)).len(), 3);
    }

    #[test]
    fn prediction_requires_training() {
        let dash = dashboard(training_rows());
        let input = PredictionInput {
            shipping_mode: "Standard Class".to_string(),
            scheduled_days: 4,
            discount_rate: 0.1,
            region: "South Asia".to_string(),
        };
        assert_eq!(dash.model_state(), ModelState::Untrained);
        assert!(matches!(dash.predict(&input), Err(DashboardError::UntrainedModel)));
        assert!(matches!(dash.explain(), Err(DashboardError::UntrainedModel)));

        dash.train().unwrap();
        assert_eq!(dash.model_state(), ModelState::Trained { generation: 1 });
        let prediction = dash.predict(&input).unwrap();
        assert!(
            (prediction.late_probability + prediction.on_time_probability - 1.0).abs() < 1e-6
        );
        assert_eq!(dash.explain().unwrap().len(), 4);
    }

    #[test]
    fn unknown_category_surfaces_as_prediction_error() {
        let dash = dashboard(training_rows());
        dash.train().unwrap();
        let input = PredictionInput {
            shipping_mode: "Drone".to_string(),
            scheduled_days: 2,
            discount_rate: 0.0,
            region: "South Asia".to_string(),
        };
        match dash.predict(&input) {
            Err(DashboardError::Prediction(PredictError::UnknownCategory { value, .. })) => {
                assert_eq!(value, "Drone");
            }
            other => panic!("expected unknown category, got {other:?}"),
        }
    }

    #[test]
    fn failed_retrain_keeps_previous_model() {
        let mut dash = dashboard(training_rows());
        let first = dash.train().unwrap();
        dash.apply_filter(OrderFilter::default().with_regions(["Nowhere"]));
        assert!(matches!(dash.train(), Err(DashboardError::Training(_))));
        let current = dash.model().unwrap();
        assert!(Arc::ptr_eq(&first, &current));
        assert_eq!(dash.model_state(), ModelState::Trained { generation: 1 });
    }

    #[test]
    fn prediction_options_come_from_the_view() {
        let mut dash = dashboard(three_line_dataset());
        let all = dash.filter_options();
        let first_region = all.regions[0].clone();
        dash.apply_filter(OrderFilter::default().with_regions([first_region.clone()]));
        assert_eq!(dash.prediction_options().regions, vec![first_region]);
        assert_eq!(dash.filter_options(), all);
    }
}
