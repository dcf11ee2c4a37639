use std::collections::BTreeSet;

use serde::Serialize;

/// Bijection from observed category strings to indices in sorted order.
///
/// Fitted once at training time and carried inside the model, so inference
/// can only ever use the mapping the weights were learned against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryEncoder {
    classes: Vec<String>,
}

/// Outcome of encoding one category value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoded<'a> {
    Known(usize),
    /// Value absent from the fitted vocabulary.
    Unknown(&'a str),
}

impl CategoryEncoder {
    pub fn fit<'a, I>(values: I) -> Self
    where
        I: IntoIterator<Item = &'a str>,
    {
        let classes: BTreeSet<&str> = values.into_iter().collect();
        Self {
            classes: classes.into_iter().map(str::to_string).collect(),
        }
    }

    pub fn encode<'a>(&self, value: &'a str) -> Encoded<'a> {
        match self
            .classes
            .binary_search_by(|class| class.as_str().cmp(value))
        {
            Ok(index) => Encoded::Known(index),
            Err(_) => Encoded::Unknown(value),
        }
    }

    /// Fitted vocabulary; position is the encoded index.
    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn len(&self) -> usize {
        self.classes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_sorts_and_dedups() {
        let encoder = CategoryEncoder::fit(["Standard Class", "First Class", "Same Day", "First Class"]);
        assert_eq!(encoder.classes(), &["First Class", "Same Day", "Standard Class"]);
        assert_eq!(encoder.encode("Same Day"), Encoded::Known(1));
        assert_eq!(encoder.encode("Standard Class"), Encoded::Known(2));
    }

    #[test]
    fn unseen_value_is_unknown() {
        let encoder = CategoryEncoder::fit(["East", "West"]);
        assert_eq!(encoder.encode("North"), Encoded::Unknown("North"));
        assert_eq!(encoder.encode("east"), Encoded::Unknown("east"));
    }

    #[test]
    fn fit_is_stable_regardless_of_input_order() {
        let a = CategoryEncoder::fit(["b", "c", "a"]);
        let b = CategoryEncoder::fit(["a", "a", "c", "b"]);
        assert_eq!(a, b);
    }
}
