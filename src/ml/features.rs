//! Fixed feature set of the late-delivery model.

use serde::Serialize;

use crate::dataset::OrderRecord;

use super::{CategoryEncoder, Encoded, PredictError};

pub const MIN_SCHEDULED_DAYS: i64 = 1;
pub const MAX_SCHEDULED_DAYS: i64 = 10;

/// Model inputs, in the column order the weights are stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Feature {
    ShippingMode,
    ScheduledShippingDays,
    DiscountRate,
    OrderRegion,
}

impl Feature {
    pub const ALL: [Feature; 4] = [
        Feature::ShippingMode,
        Feature::ScheduledShippingDays,
        Feature::DiscountRate,
        Feature::OrderRegion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Self::ShippingMode => "Shipping_Mode",
            Self::ScheduledShippingDays => "Scheduled_Shipping_Days",
            Self::DiscountRate => "Discount_Rate",
            Self::OrderRegion => "Order_Region",
        }
    }

    pub fn is_categorical(self) -> bool {
        matches!(self, Self::ShippingMode | Self::OrderRegion)
    }
}

/// One order to score, with raw category strings.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionInput {
    pub shipping_mode: String,
    /// Whole days, `1..=10`.
    pub scheduled_days: i64,
    /// Fraction, `0.0..=1.0`.
    pub discount_rate: f64,
    pub region: String,
}

impl PredictionInput {
    pub fn validate(&self) -> Result<(), PredictError> {
        if !(MIN_SCHEDULED_DAYS..=MAX_SCHEDULED_DAYS).contains(&self.scheduled_days) {
            return Err(PredictError::OutOfRange {
                field: Feature::ScheduledShippingDays.name(),
                value: self.scheduled_days as f64,
                min: MIN_SCHEDULED_DAYS as f64,
                max: MAX_SCHEDULED_DAYS as f64,
            });
        }
        if !(0.0..=1.0).contains(&self.discount_rate) {
            return Err(PredictError::OutOfRange {
                field: Feature::DiscountRate.name(),
                value: self.discount_rate,
                min: 0.0,
                max: 1.0,
            });
        }
        Ok(())
    }
}

/// Encoders fitted on the training-time view, one per categorical feature.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FittedEncoders {
    pub shipping_mode: CategoryEncoder,
    pub region: CategoryEncoder,
}

impl FittedEncoders {
    pub fn fit<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a OrderRecord> + Clone,
    {
        Self {
            shipping_mode: CategoryEncoder::fit(
                records.clone().into_iter().map(|r| r.shipping_mode.as_str()),
            ),
            region: CategoryEncoder::fit(records.into_iter().map(|r| r.region.as_str())),
        }
    }

    /// Encode a training row.
    pub fn vectorize_record(&self, record: &OrderRecord) -> Result<[f64; 4], PredictError> {
        self.vectorize(
            &record.shipping_mode,
            record.scheduled_days as f64,
            record.discount_rate,
            &record.region,
        )
    }

    /// Encode a prediction request.
    pub fn vectorize_input(&self, input: &PredictionInput) -> Result<[f64; 4], PredictError> {
        self.vectorize(
            &input.shipping_mode,
            input.scheduled_days as f64,
            input.discount_rate,
            &input.region,
        )
    }

    fn vectorize(
        &self,
        shipping_mode: &str,
        scheduled_days: f64,
        discount_rate: f64,
        region: &str,
    ) -> Result<[f64; 4], PredictError> {
        let mut row = [0.0; 4];
        for (slot, feature) in row.iter_mut().zip(Feature::ALL) {
            *slot = match feature {
                Feature::ShippingMode => index_of(&self.shipping_mode, feature, shipping_mode)?,
                Feature::ScheduledShippingDays => scheduled_days,
                Feature::DiscountRate => discount_rate,
                Feature::OrderRegion => index_of(&self.region, feature, region)?,
            };
        }
        Ok(row)
    }
}

fn index_of(encoder: &CategoryEncoder, feature: Feature, value: &str) -> Result<f64, PredictError> {
    match encoder.encode(value) {
        Encoded::Known(index) => Ok(index as f64),
        Encoded::Unknown(value) => Err(PredictError::UnknownCategory {
            feature: feature.name(),
            value: value.to_string(),
        }),
    }
}
