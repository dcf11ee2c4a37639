/// Equal-width, right-closed bins fitted to the observed discount range.
///
/// Edges are recomputed from whatever rows are passed in, so the same discount
/// can land in a different bucket once filters change the observed range.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountBuckets {
    edges: Vec<f64>,
}

impl DiscountBuckets {
    /// Fit `bins` buckets over `values`; `None` when there are no values.
    ///
    /// The lowest edge sits 0.1% of the range below the minimum so the minimum
    /// itself falls inside the first right-closed bucket. A zero-width range is
    /// widened by 0.1% of its magnitude (0.001 at zero) on both sides.
    pub fn fit<I>(values: I, bins: usize) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        let (min, max) = values
            .into_iter()
            .filter(|value| value.is_finite())
            .fold(None, |bounds: Option<(f64, f64)>, value| match bounds {
                None => Some((value, value)),
                Some((lo, hi)) => Some((lo.min(value), hi.max(value))),
            })?;
        let bins = bins.max(1);

        let edges = if min == max {
            let pad = if min == 0.0 { 0.001 } else { 0.001 * min.abs() };
            linspace(min - pad, max + pad, bins)
        } else {
            let mut edges = linspace(min, max, bins);
            edges[0] -= (max - min) * 0.001;
            edges
        };
        Some(Self { edges })
    }

    pub fn len(&self) -> usize {
        self.edges.len() - 1
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Bucket holding `value`, or `None` outside the fitted range.
    pub fn index_of(&self, value: f64) -> Option<usize> {
        let first = *self.edges.first()?;
        let last = *self.edges.last()?;
        if !(value > first && value <= last) {
            return None;
        }
        let upper = &self.edges[1..];
        Some(upper.partition_point(|&edge| edge < value).min(self.len() - 1))
    }

    /// Interval label such as `(0.05, 0.1]`.
    pub fn label(&self, index: usize) -> String {
        format!(
            "({}, {}]",
            format_edge(self.edges[index]),
            format_edge(self.edges[index + 1])
        )
    }
}

fn linspace(lo: f64, hi: f64, bins: usize) -> Vec<f64> {
    let step = (hi - lo) / bins as f64;
    let mut edges: Vec<f64> = (0..=bins).map(|idx| lo + step * idx as f64).collect();
    edges[bins] = hi;
    edges
}

fn format_edge(value: f64) -> String {
    let text = format!("{value:.3}");
    let trimmed = text.trim_end_matches('0').trim_end_matches('.');
    match trimmed {
        "-0" | "" => "0".to_string(),
        other => other.to_string(),
    }
}
