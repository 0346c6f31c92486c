use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::classify::{ColumnClass, classify_column};
use super::numeric::{NumericSummary, summarize_numeric};
use super::text::{TextOverlapSummary, summarize_text};
use crate::model::{CellValue, Row};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub(crate) enum ColumnComparison {
    Numeric {
        ai: NumericSummary,
        ctrl: NumericSummary,
    },
    Text(TextOverlapSummary),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct StructuralComparison {
    pub same_columns: bool,
    pub same_rowcount: bool,
    pub row_count_ai: usize,
    pub row_count_ctrl: usize,
    /// Shared columns only; `None` marks a column with nothing comparable.
    pub columns: BTreeMap<String, Option<ColumnComparison>>,
}

impl StructuralComparison {
    pub fn is_structurally_equal(&self) -> bool {
        self.same_columns && self.same_rowcount
    }
}

pub(crate) fn compare_results(ai_rows: &[Row], ctrl_rows: &[Row]) -> StructuralComparison {
    let (Some(ai_first), Some(ctrl_first)) = (ai_rows.first(), ctrl_rows.first()) else {
        return StructuralComparison {
            same_columns: false,
            same_rowcount: false,
            row_count_ai: ai_rows.len(),
            row_count_ctrl: ctrl_rows.len(),
            columns: BTreeMap::new(),
        };
    };

    // Column sets are sampled from the first row of each side.
    let ai_cols = ai_first.keys().map(String::as_str).collect::<BTreeSet<_>>();
    let ctrl_cols = ctrl_first.keys().map(String::as_str).collect::<BTreeSet<_>>();

    let mut columns = BTreeMap::new();
    for column in ai_cols.intersection(&ctrl_cols) {
        let ai_values = column_values(ai_rows, column);
        let ctrl_values = column_values(ctrl_rows, column);
        let comparison = compare_column(&ai_values, &ctrl_values);
        if comparison.is_none() {
            debug!(column = %column, "column has no comparable values");
        }
        columns.insert((*column).to_string(), comparison);
    }

    StructuralComparison {
        same_columns: ai_cols == ctrl_cols,
        same_rowcount: ai_rows.len() == ctrl_rows.len(),
        row_count_ai: ai_rows.len(),
        row_count_ctrl: ctrl_rows.len(),
        columns,
    }
}

fn column_values<'a>(rows: &'a [Row], column: &str) -> Vec<&'a CellValue> {
    rows.iter().filter_map(|row| row.get(column)).collect()
}

fn compare_column(ai_values: &[&CellValue], ctrl_values: &[&CellValue]) -> Option<ColumnComparison> {
    match classify_column(ai_values, ctrl_values) {
        ColumnClass::Numeric { ai, ctrl } => Some(ColumnComparison::Numeric {
            ai: summarize_numeric(&ai)?,
            ctrl: summarize_numeric(&ctrl)?,
        }),
        ColumnClass::Categorical => summarize_text(ai_values, ctrl_values).map(ColumnComparison::Text),
        ColumnClass::Unavailable => None,
    }
}
