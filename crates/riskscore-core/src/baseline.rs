//! Self-referential baseline.
//!
//! The baseline is this attempt's own grand-mean intensity across all of its
//! answered questions, on the 0..=3 scale. Reports show it where a
//! "population average" would go, but it is not drawn from any external
//! normative dataset.

use crate::model::{BaselineComparison, CategoryAggregate};

/// Baseline used when no questions were aggregated: the scale midpoint.
pub const FALLBACK_BASELINE: f64 = 1.5;

/// Grand mean intensity: total score over total questions across categories.
pub fn self_referential_baseline(aggregates: &[CategoryAggregate]) -> f64 {
    let (score, questions) = aggregates.iter().fold((0u64, 0u64), |(s, q), a| {
        (s + u64::from(a.total_score), q + u64::from(a.total_questions))
    });
    if questions == 0 {
        return FALLBACK_BASELINE;
    }
    score as f64 / questions as f64
}

/// Compare each category's mean intensity against the baseline.
pub fn compare_to_baseline(
    aggregates: &[CategoryAggregate],
    baseline: f64,
) -> Vec<BaselineComparison> {
    aggregates
        .iter()
        .map(|a| {
            let delta = a.average_intensity - baseline;
            BaselineComparison {
                category_id: a.category_id.clone(),
                category_name: a.category_name.clone(),
                average_intensity: a.average_intensity,
                delta,
                above_baseline: delta > 0.0,
            }
        })
        .collect()
}
