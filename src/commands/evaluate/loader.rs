use std::collections::BTreeMap;
use std::collections::btree_map::Entry;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use regex::Regex;
use tracing::{debug, warn};

use super::types::InstanceFailure;
use crate::model::{QueryResult, REPORT_FILENAME, ResultFile, ResultFileEntry};
use crate::util::sha256_bytes;

/// `<prefix>-<query_id>-<variant>.json`, e.g. `prompt_sql_results-id7-few_shot.json`.
const RESULT_FILENAME_PATTERN: &str = r"^[^-]+-([^-]+)-(.+)\.json$";

/// All loaded results grouped by query id, then variant.
#[derive(Debug, Clone, Default)]
pub(crate) struct ResultCorpus {
    pub groups: BTreeMap<String, BTreeMap<String, QueryResult>>,
    pub malformed: Vec<InstanceFailure>,
    pub sources: Vec<ResultFileEntry>,
}

impl ResultCorpus {
    pub fn insert(&mut self, result: QueryResult) {
        let variants = self.groups.entry(result.query_id.clone()).or_default();
        match variants.entry(result.variant.clone()) {
            Entry::Vacant(slot) => {
                slot.insert(result);
            }
            Entry::Occupied(_) => self.malformed.push(InstanceFailure {
                reason: format!(
                    "duplicate result for query {} variant {}",
                    result.query_id, result.variant
                ),
                query_id: result.query_id,
                variant: result.variant,
            }),
        }
    }

    pub fn record_malformed(&mut self, query_id: &str, variant: &str, reason: String) {
        self.malformed.push(InstanceFailure {
            query_id: query_id.to_string(),
            variant: variant.to_string(),
            reason,
        });
    }

    pub fn record_count(&self) -> usize {
        self.groups.values().map(BTreeMap::len).sum()
    }
}

pub(crate) fn result_filename_regex() -> Result<Regex> {
    Regex::new(RESULT_FILENAME_PATTERN).context("failed to compile result filename regex")
}

pub(crate) fn parse_result_filename(filename: &str, pattern: &Regex) -> Option<(String, String)> {
    let captures = pattern.captures(filename)?;
    let query_id = captures.get(1)?.as_str().to_string();
    let variant = captures.get(2)?.as_str().to_string();
    Some((query_id, variant))
}

pub(crate) fn discover_result_files(results_dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    let entries = fs::read_dir(results_dir)
        .with_context(|| format!("failed to read {}", results_dir.display()))?;

    for entry in entries {
        let entry =
            entry.with_context(|| format!("failed to read entry in {}", results_dir.display()))?;
        let path = entry.path();

        if !entry
            .file_type()
            .with_context(|| format!("failed to inspect file type: {}", path.display()))?
            .is_file()
        {
            continue;
        }

        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.eq_ignore_ascii_case("json"))
            .unwrap_or(false);

        let is_report = path.file_name().and_then(|name| name.to_str()) == Some(REPORT_FILENAME);

        if is_json && !is_report {
            files.push(path);
        }
    }

    files.sort();
    Ok(files)
}

/// Parses one stored result, rejecting records that would skew the statistics.
pub(crate) fn parse_query_result(query_id: &str, variant: &str, raw: &[u8]) -> Result<QueryResult> {
    let file: ResultFile = serde_json::from_slice(raw).context("failed to parse result json")?;

    let duration = file.meta.duration;
    if !duration.is_finite() || duration < 0.0 {
        bail!("invalid duration {duration}: expected a non-negative number of seconds");
    }

    Ok(QueryResult {
        query_id: query_id.to_string(),
        variant: variant.to_string(),
        duration,
        operations: file.meta.operations,
        rows: file.results.data,
    })
}

pub(crate) fn load_corpus(results_dir: &Path) -> Result<ResultCorpus> {
    let pattern = result_filename_regex()?;
    let paths = discover_result_files(results_dir)?;

    let mut corpus = ResultCorpus::default();
    for path in paths {
        let Some(filename) = path.file_name().and_then(|name| name.to_str()) else {
            warn!(path = %path.display(), "skipping result file with non UTF-8 name");
            continue;
        };
        let Some((query_id, variant)) = parse_result_filename(filename, &pattern) else {
            warn!(file = %filename, pattern = RESULT_FILENAME_PATTERN, "skipping file outside naming scheme");
            continue;
        };

        let raw = match fs::read(&path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!(file = %filename, error = %err, "failed to read result file");
                corpus.record_malformed(&query_id, &variant, format!("failed to read {filename}: {err}"));
                continue;
            }
        };

        corpus.sources.push(ResultFileEntry {
            filename: filename.to_string(),
            query_id: query_id.clone(),
            variant: variant.clone(),
            sha256: sha256_bytes(&raw),
        });

        match parse_query_result(&query_id, &variant, &raw) {
            Ok(result) => {
                debug!(file = %filename, rows = result.rows.len(), "loaded result");
                corpus.insert(result);
            }
            Err(err) => {
                warn!(file = %filename, error = %format!("{err:#}"), "malformed result file");
                corpus.record_malformed(&query_id, &variant, format!("{filename}: {err:#}"));
            }
        }
    }

    Ok(corpus)
}
