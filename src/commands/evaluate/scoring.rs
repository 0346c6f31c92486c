use super::numeric::NumericSummary;
use super::structural::{ColumnComparison, StructuralComparison};

const MAX_SCORE: f64 = 100.0;

/// Reduces a comparison to a 0-100 match score. No comparable columns scores 0.
pub(crate) fn match_score(comparison: &StructuralComparison) -> f64 {
    let column_scores = comparison
        .columns
        .values()
        .flatten()
        .map(column_score)
        .collect::<Vec<f64>>();

    if column_scores.is_empty() {
        return 0.0;
    }
    column_scores.iter().sum::<f64>() / column_scores.len() as f64
}

fn column_score(column: &ColumnComparison) -> f64 {
    match column {
        ColumnComparison::Numeric { ai, ctrl } => numeric_column_score(ai, ctrl),
        ColumnComparison::Text(overlap) => overlap.overlap_ratio * MAX_SCORE,
    }
}

fn numeric_column_score(ai: &NumericSummary, ctrl: &NumericSummary) -> f64 {
    let relative_diffs = ai
        .location_stats()
        .into_iter()
        .zip(ctrl.location_stats())
        .filter(|(_, ctrl_value)| *ctrl_value != 0.0)
        .map(|(ai_value, ctrl_value)| (ai_value - ctrl_value).abs() / ctrl_value.abs())
        .collect::<Vec<f64>>();

    // Every control statistic was zero: nothing to measure against.
    if relative_diffs.is_empty() {
        return MAX_SCORE;
    }

    let mean_diff = relative_diffs.iter().sum::<f64>() / relative_diffs.len() as f64;
    (MAX_SCORE - mean_diff * MAX_SCORE).max(0.0)
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::match_score;
    use crate::commands::evaluate::structural::compare_results;
    use crate::model::{CellValue, Row};

    fn rows(value: serde_json::Value) -> Vec<Row> {
        serde_json::from_value(value).expect("fixture rows should parse")
    }

    fn column(name: &str, values: serde_json::Value) -> Vec<Row> {
        let cells: Vec<CellValue> =
            serde_json::from_value(values).expect("fixture cells should parse");
        cells
            .into_iter()
            .map(|cell| Row::from([(name.to_string(), cell)]))
            .collect()
    }

    #[test]
    fn identical_numeric_columns_score_100() {
        let ai = column("x", json!([1, 2, 3, 4, 5]));
        let ctrl = column("x", json!([1, 2, 3, 4, 5]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);
    }

    #[test]
    fn tenfold_numeric_mismatch_scores_about_10() {
        let ai = column("x", json!([10, 10, 10]));
        let ctrl = column("x", json!([100, 100, 100]));
        let score = match_score(&compare_results(&ai, &ctrl));
        assert!((score - 10.0).abs() < 1e-9, "unexpected score: {score}");
    }

    #[test]
    fn large_relative_error_is_floored_at_zero() {
        let ai = column("x", json!([500]));
        let ctrl = column("x", json!([1]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 0.0);
    }

    #[test]
    fn negative_control_values_keep_score_in_bounds() {
        let ai = column("x", json!([-5, -4]));
        let ctrl = column("x", json!([-10, -8]));
        let score = match_score(&compare_results(&ai, &ctrl));
        assert!((score - 50.0).abs() < 1e-9, "unexpected score: {score}");
    }

    #[test]
    fn categorical_superset_scores_100() {
        let ai = column("c", json!(["a", "b", "c"]));
        let ctrl = column("c", json!(["a", "b"]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);
    }

    #[test]
    fn all_zero_control_scores_100_by_convention() {
        let ai = column("x", json!([3, 9, 27]));
        let ctrl = column("x", json!([0, 0, 0]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);
    }

    #[test]
    fn zero_control_statistics_are_excluded_not_penalized() {
        // Control min and q1 are zero, so only median, q3, max and avg count.
        let ai = column("x", json!([5, 0, 4, 4]));
        let ctrl = column("x", json!([0, 0, 4, 8]));
        let score = match_score(&compare_results(&ai, &ctrl));
        let expected = 100.0 - (1.0 + 0.15 + 0.375 + 0.25 / 3.0) / 4.0 * 100.0;
        assert!((score - expected).abs() < 1e-9, "unexpected score: {score}");
    }

    #[test]
    fn no_data_columns_are_skipped_in_the_average() {
        let ai = rows(json!([{ "x": 1, "y": null }]));
        let ctrl = rows(json!([{ "x": 1, "y": 4 }]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);
    }

    #[test]
    fn degenerate_and_incomparable_results_score_zero() {
        let ctrl = rows(json!([{ "a": 1 }]));
        assert_eq!(match_score(&compare_results(&[], &ctrl)), 0.0);

        let ai = rows(json!([{ "b": 1 }]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 0.0);
    }

    #[test]
    fn mixed_columns_average_their_scores() {
        let ai = rows(json!([{ "n": 10, "t": "a" }, { "n": 10, "t": "z" }]));
        let ctrl = rows(json!([{ "n": 100, "t": "a" }, { "n": 100, "t": "b" }]));
        let score = match_score(&compare_results(&ai, &ctrl));
        assert!((score - 30.0).abs() < 1e-9, "unexpected score: {score}");
    }

    #[test]
    fn identical_columns_near_f64_max_score_100() {
        let ai = column("x", json!([1.5e308, 1.5e308]));
        let ctrl = column("x", json!([1.5e308, 1.5e308]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);

        let ai = column("x", json!([-1e308, 1e308]));
        let ctrl = column("x", json!([-1e308, 1e308]));
        assert_eq!(match_score(&compare_results(&ai, &ctrl)), 100.0);
    }
}
