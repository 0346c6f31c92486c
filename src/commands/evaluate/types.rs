use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::structural::StructuralComparison;
use crate::model::ResultFileEntry;

/// A result that could not be evaluated. Never folded into "no data".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct InstanceFailure {
    pub query_id: String,
    pub variant: String,
    pub reason: String,
}

/// One AI variant of one query, compared against its control.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct InstanceReport {
    pub query_id: String,
    pub variant: String,
    pub correct: bool,
    pub match_score: f64,
    pub ai_duration: f64,
    pub ctrl_duration: f64,
    pub faster: bool,
    pub operations: Vec<String>,
    pub comparison: StructuralComparison,
}

impl InstanceReport {
    pub fn key(&self) -> String {
        instance_key(&self.query_id, &self.variant)
    }
}

pub(crate) fn instance_key(query_id: &str, variant: &str) -> String {
    format!("{query_id}-{variant}")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct RankedInstance {
    pub id: String,
    pub query_id: String,
    pub variant: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct DataMatchSummary {
    pub average_score: f64,
    pub top5_best: Vec<RankedInstance>,
    pub top5_worst: Vec<RankedInstance>,
    pub mismatch_ids: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub(crate) struct CorpusReport {
    pub total_prompts: usize,
    pub correct_total: usize,
    pub accuracy: f64,
    pub correct_percentage: f64,
    pub faster_total: usize,
    pub avg_ai_duration: f64,
    pub avg_ctrl_duration: f64,
    pub categories: BTreeMap<String, f64>,
    pub data_match: DataMatchSummary,
    pub instances: BTreeMap<String, InstanceReport>,
    pub failures: Vec<InstanceFailure>,
}

/// Outcome of aggregating a corpus; an empty selection is not an error.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Aggregation {
    Report(CorpusReport),
    NothingToReport { failures: Vec<InstanceFailure> },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct EvaluationManifest {
    pub manifest_version: u32,
    pub generated_at: String,
    pub source_directory: String,
    pub operations_filter: String,
    pub source_hashes: Vec<ResultFileEntry>,
    pub report: CorpusReport,
}
