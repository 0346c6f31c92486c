use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Number;

pub const CONTROL_VARIANT: &str = "control";
pub const REPORT_FILENAME: &str = "summary_output.json";

/// A single cell of a query result row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    Null,
    Bool(bool),
    Number(Number),
    Text(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Conversion to a finite real number, if the cell holds one.
    pub fn as_real(&self) -> Option<f64> {
        let value = match self {
            Self::Number(value) => value.as_f64()?,
            Self::Text(text) => text.trim().parse::<f64>().ok()?,
            Self::Null | Self::Bool(_) => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Canonical string form used for set overlap; `None` for null and empty text.
    /// Numbers keep their JSON spelling, so `1` and `1.0` stay distinct.
    pub fn canonical_text(&self) -> Option<String> {
        match self {
            Self::Null => None,
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text.clone()),
            Self::Number(value) => Some(value.to_string()),
            Self::Bool(value) => Some(value.to_string()),
        }
    }
}

pub type Row = BTreeMap<String, CellValue>;

/// One executed query's output, either the control or an AI variant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QueryResult {
    pub query_id: String,
    pub variant: String,
    pub duration: f64,
    pub operations: Vec<String>,
    pub rows: Vec<Row>,
}

impl QueryResult {
    pub fn is_control(&self) -> bool {
        self.variant == CONTROL_VARIANT
    }
}

/// On-disk layout of a stored result file.
#[derive(Debug, Clone, Deserialize)]
pub struct ResultFile {
    pub meta: ResultMeta,
    pub results: ResultData,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultMeta {
    pub duration: f64,
    #[serde(default)]
    pub operations: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ResultData {
    pub data: Vec<Row>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultFileEntry {
    pub filename: String,
    pub query_id: String,
    pub variant: String,
    pub sha256: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResultInventoryManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub file_count: usize,
    pub files: Vec<ResultFileEntry>,
}
