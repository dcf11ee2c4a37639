use std::sync::{Arc, RwLock};

use crate::ml::TrainedModel;

/// Where the model lifecycle currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModelState {
    Untrained,
    /// `generation` counts successful training runs, starting at 1.
    Trained { generation: u64 },
}

#[derive(Debug, Default)]
struct Slot {
    generation: u64,
    model: Option<Arc<TrainedModel>>,
}

/// Single-owner holder of the session's trained model.
///
/// A retrain swaps in a fully built artifact under the write lock; readers
/// clone the `Arc` and keep whichever artifact they saw.
#[derive(Debug, Default)]
pub struct ModelSlot {
    slot: RwLock<Slot>,
}

impl ModelSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the current model, returning the shared handle to the new one.
    pub fn install(&self, model: TrainedModel) -> Arc<TrainedModel> {
        let model = Arc::new(model);
        let mut slot = self.slot.write().unwrap_or_else(|err| err.into_inner());
        slot.generation += 1;
        slot.model = Some(Arc::clone(&model));
        model
    }

    pub fn current(&self) -> Option<Arc<TrainedModel>> {
        self.slot
            .read()
            .unwrap_or_else(|err| err.into_inner())
            .model
            .clone()
    }

    pub fn state(&self) -> ModelState {
        let slot = self.slot.read().unwrap_or_else(|err| err.into_inner());
        match slot.model {
            Some(_) => ModelState::Trained {
                generation: slot.generation,
            },
            None => ModelState::Untrained,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ml::metrics::Evaluation;
    use crate::ml::{CategoryEncoder, Feature, FittedEncoders};

    fn model(bias: f64) -> TrainedModel {
        TrainedModel {
            features: Feature::ALL.to_vec(),
            encoders: FittedEncoders {
                shipping_mode: CategoryEncoder::fit(["a"]),
                region: CategoryEncoder::fit(["b"]),
            },
            weights: vec![0.0; 4],
            bias,
            accuracy: 0.5,
            evaluation: Evaluation::from_predictions(std::iter::empty()),
            training_rows: 4,
            holdout_rows: 1,
            iterations: 1,
            converged: true,
        }
    }

    #[test]
    fn untrained_until_first_install() {
        let slot = ModelSlot::new();
        assert_eq!(slot.state(), ModelState::Untrained);
        assert!(slot.current().is_none());
        slot.install(model(0.0));
        assert_eq!(slot.state(), ModelState::Trained { generation: 1 });
    }

    #[test]
    fn retrain_replaces_but_readers_keep_their_copy() {
        let slot = ModelSlot::new();
        slot.install(model(1.0));
        let held = slot.current().unwrap();
        slot.install(model(2.0));
        assert_eq!(held.bias, 1.0);
        assert_eq!(slot.current().unwrap().bias, 2.0);
        assert_eq!(slot.state(), ModelState::Trained { generation: 2 });
    }

    #[test]
    fn concurrent_readers_see_whole_models() {
        let slot = ModelSlot::new();
        slot.install(model(0.0));
        std::thread::scope(|scope| {
            for round in 1..=4 {
                let slot = &slot;
                scope.spawn(move || slot.install(model(round as f64)));
                scope.spawn(move || {
                    let seen = slot.current().unwrap();
                    assert_eq!(seen.weights.len(), seen.features.len());
                });
            }
        });
        assert_eq!(slot.state(), ModelState::Trained { generation: 5 });
    }
}
