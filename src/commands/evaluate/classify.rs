use crate::model::CellValue;

/// How one shared column is going to be compared.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum ColumnClass {
    /// Every non-null value on both sides is a finite real number.
    Numeric { ai: Vec<f64>, ctrl: Vec<f64> },
    Categorical,
    /// One side has no non-null values at all.
    Unavailable,
}

pub(crate) fn classify_column(ai_values: &[&CellValue], ctrl_values: &[&CellValue]) -> ColumnClass {
    let ai_present = ai_values
        .iter()
        .copied()
        .filter(|value| !value.is_null())
        .collect::<Vec<_>>();
    let ctrl_present = ctrl_values
        .iter()
        .copied()
        .filter(|value| !value.is_null())
        .collect::<Vec<_>>();

    if ai_present.is_empty() || ctrl_present.is_empty() {
        return ColumnClass::Unavailable;
    }

    match (parse_all_real(&ai_present), parse_all_real(&ctrl_present)) {
        (Some(ai), Some(ctrl)) => ColumnClass::Numeric { ai, ctrl },
        _ => ColumnClass::Categorical,
    }
}

fn parse_all_real(values: &[&CellValue]) -> Option<Vec<f64>> {
    values.iter().map(|value| value.as_real()).collect()
}
