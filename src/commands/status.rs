use std::fs;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::evaluate::{EvaluationManifest, log_report};
use crate::cli::StatusArgs;

pub fn run(args: StatusArgs) -> Result<()> {
    let report_path = args.report_path();
    info!(report_path = %report_path.display(), "status requested");

    if !report_path.exists() {
        warn!(path = %report_path.display(), "evaluation report missing");
        return Ok(());
    }

    let raw = fs::read(&report_path)
        .with_context(|| format!("failed to read {}", report_path.display()))?;
    let manifest: EvaluationManifest = serde_json::from_slice(&raw)
        .with_context(|| format!("failed to parse {}", report_path.display()))?;

    info!(
        generated_at = %manifest.generated_at,
        source = %manifest.source_directory,
        operations_filter = %manifest.operations_filter,
        source_files = manifest.source_hashes.len(),
        "loaded evaluation report"
    );

    log_report(&manifest.report);

    for id in &manifest.report.data_match.mismatch_ids {
        info!(id = %id, "structural mismatch");
    }
    if !manifest.report.failures.is_empty() {
        warn!(
            failures = manifest.report.failures.len(),
            "report contains instances that could not be evaluated"
        );
    }

    Ok(())
}
