use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct NumericSummary {
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub avg: f64,
    pub std: f64,
}

impl NumericSummary {
    /// Location statistics compared by the match scorer, in a fixed order.
    pub fn location_stats(&self) -> [f64; 6] {
        [self.min, self.q1, self.median, self.q3, self.max, self.avg]
    }
}

/// Distributional summary of `values`; `None` when there is nothing to summarize.
pub(crate) fn summarize_numeric(values: &[f64]) -> Option<NumericSummary> {
    if values.is_empty() {
        return None;
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(|left, right| left.total_cmp(right));

    let count = sorted.len();
    let avg = finite_mean(&sorted);
    let std = population_std(&sorted, avg);

    Some(NumericSummary {
        count,
        min: sorted[0],
        q1: percentile_linear(&sorted, 0.25),
        median: percentile_linear(&sorted, 0.50),
        q3: percentile_linear(&sorted, 0.75),
        max: sorted[count - 1],
        avg,
        std,
    })
}

fn finite_mean(values: &[f64]) -> f64 {
    let count = values.len() as f64;
    let sum = values.iter().sum::<f64>();
    if sum.is_finite() {
        return sum / count;
    }
    // The plain sum overflowed; every value is finite, so the scaled sum is too.
    values.iter().map(|value| value / count).sum()
}

// Deviations are halved and normalised by the largest one so that neither the
// difference nor its square can overflow for finite input.
fn population_std(values: &[f64], avg: f64) -> f64 {
    let half_deviations = values
        .iter()
        .map(|value| value / 2.0 - avg / 2.0)
        .collect::<Vec<f64>>();
    let scale = half_deviations
        .iter()
        .fold(0.0_f64, |largest, deviation| largest.max(deviation.abs()));
    if scale == 0.0 {
        return 0.0;
    }

    let mean_square = half_deviations
        .iter()
        .map(|deviation| (deviation / scale).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    scale * mean_square.sqrt() * 2.0
}

// `sorted` must be non-empty and ascending.
fn percentile_linear(sorted: &[f64], fraction: f64) -> f64 {
    let position = fraction * (sorted.len() - 1) as f64;
    let lower = position.floor() as usize;
    let upper = position.ceil() as usize;
    if lower == upper {
        return sorted[lower];
    }
    let weight = position - lower as f64;
    sorted[lower] * (1.0 - weight) + sorted[upper] * weight
}
