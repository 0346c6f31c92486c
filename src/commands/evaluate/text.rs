use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::model::CellValue;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct TextOverlapSummary {
    pub ai_unique_count: usize,
    pub ctrl_unique_count: usize,
    pub overlap_ratio: f64,
}

/// Set overlap between the AI and control values, measured against the control set.
pub(crate) fn summarize_text(
    ai_values: &[&CellValue],
    ctrl_values: &[&CellValue],
) -> Option<TextOverlapSummary> {
    let ai_set = canonical_set(ai_values);
    let ctrl_set = canonical_set(ctrl_values);
    if ai_set.is_empty() || ctrl_set.is_empty() {
        return None;
    }

    let shared = ai_set.intersection(&ctrl_set).count();
    Some(TextOverlapSummary {
        ai_unique_count: ai_set.len(),
        ctrl_unique_count: ctrl_set.len(),
        overlap_ratio: shared as f64 / ctrl_set.len().max(1) as f64,
    })
}

fn canonical_set(values: &[&CellValue]) -> BTreeSet<String> {
    values
        .iter()
        .filter_map(|value| value.canonical_text())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::summarize_text;
    use crate::model::CellValue;

    fn texts(values: &[&str]) -> Vec<CellValue> {
        values
            .iter()
            .map(|value| CellValue::Text((*value).to_string()))
            .collect()
    }

    #[test]
    fn overlap_is_directional_toward_control() {
        let ai = texts(&["a", "b", "c"]);
        let ctrl = texts(&["a", "b"]);
        let summary = summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>())
            .expect("overlap should exist");
        assert_eq!(summary.ai_unique_count, 3);
        assert_eq!(summary.ctrl_unique_count, 2);
        assert_eq!(summary.overlap_ratio, 1.0);
    }

    #[test]
    fn duplicates_count_once() {
        let ai = texts(&["x", "x", "y"]);
        let ctrl = texts(&["x", "z", "z", "w"]);
        let summary = summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>())
            .expect("overlap should exist");
        assert_eq!(summary.ai_unique_count, 2);
        assert_eq!(summary.ctrl_unique_count, 3);
        assert!((summary.overlap_ratio - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn numbers_and_text_share_canonical_form() {
        let ai = vec![
            CellValue::Number(serde_json::Number::from(5)),
            CellValue::Text("north".to_string()),
        ];
        let ctrl = texts(&["5", "south"]);
        let summary = summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>())
            .expect("overlap should exist");
        assert_eq!(summary.overlap_ratio, 0.5);
    }

    #[test]
    fn zero_overlap_is_reported_not_treated_as_no_data() {
        let ai = texts(&["a"]);
        let ctrl = texts(&["b"]);
        let summary = summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>())
            .expect("disjoint sets still compare");
        assert_eq!(summary.overlap_ratio, 0.0);
    }

    #[test]
    fn empty_strings_and_nulls_leave_nothing_to_compare() {
        let ai = vec![CellValue::Text(String::new()), CellValue::Null];
        let ctrl = texts(&["a"]);
        assert!(summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>()).is_none());
    }

    #[test]
    fn large_integer_ids_do_not_collapse() {
        let ai: Vec<CellValue> =
            serde_json::from_str(r#"[9007199254740992, "x"]"#).expect("fixture cells should parse");
        let ctrl: Vec<CellValue> =
            serde_json::from_str(r#"[9007199254740993, "x"]"#).expect("fixture cells should parse");
        let summary = summarize_text(&ai.iter().collect::<Vec<_>>(), &ctrl.iter().collect::<Vec<_>>())
            .expect("overlap should exist");
        assert_eq!(summary.ai_unique_count, 2);
        assert_eq!(summary.ctrl_unique_count, 2);
        assert_eq!(summary.overlap_ratio, 0.5);
    }
}
