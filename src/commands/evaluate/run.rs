use anyhow::Result;
use tracing::{info, warn};

use super::aggregate::aggregate_corpus;
use super::filter::OperationsFilter;
use super::loader::load_corpus;
use super::types::{Aggregation, CorpusReport, EvaluationManifest, InstanceFailure};
use crate::cli::EvaluateArgs;
use crate::util::{now_utc_string, write_json_pretty};

const EVALUATION_MANIFEST_VERSION: u32 = 1;

pub fn run(args: EvaluateArgs) -> Result<()> {
    let filter = OperationsFilter::from_args(&args.require_operations, &args.exact_operations)?;
    let report_path = args.report_path();

    info!(
        results_dir = %args.results_dir.display(),
        report_path = %report_path.display(),
        operations_filter = %filter,
        "evaluation requested"
    );

    let corpus = load_corpus(&args.results_dir)?;
    info!(
        records = corpus.record_count(),
        queries = corpus.groups.len(),
        malformed = corpus.malformed.len(),
        "loaded result corpus"
    );

    let report = match aggregate_corpus(&corpus, &filter) {
        Aggregation::Report(report) => report,
        Aggregation::NothingToReport { failures } => {
            warn!(
                operations_filter = %filter,
                failures = failures.len(),
                "no results left to evaluate after applying the operations filter"
            );
            log_failures(&failures);
            return Ok(());
        }
    };

    log_report(&report);
    log_failures(&report.failures);

    if args.dry_run {
        info!("evaluation dry-run complete");
        return Ok(());
    }

    let manifest = EvaluationManifest {
        manifest_version: EVALUATION_MANIFEST_VERSION,
        generated_at: now_utc_string(),
        source_directory: args.results_dir.display().to_string(),
        operations_filter: filter.to_string(),
        source_hashes: corpus.sources.clone(),
        report,
    };

    write_json_pretty(&report_path, &manifest)?;
    info!(path = %report_path.display(), "wrote evaluation report");

    Ok(())
}

pub(crate) fn log_report(report: &CorpusReport) {
    info!(
        correct = report.correct_total,
        total = report.total_prompts,
        correct_percentage = %format!("{:.2}", report.correct_percentage),
        "overall accuracy"
    );

    for (variant, accuracy) in &report.categories {
        info!(variant = %variant, accuracy = %format!("{:.2}", accuracy), "category accuracy");
    }

    info!(
        average_score = %format!("{:.2}", report.data_match.average_score),
        mismatches = report.data_match.mismatch_ids.len(),
        "data match"
    );
    info!(
        avg_ai_duration_s = %format!("{:.3}", report.avg_ai_duration),
        avg_ctrl_duration_s = %format!("{:.3}", report.avg_ctrl_duration),
        faster = report.faster_total,
        "durations"
    );

    for ranked in &report.data_match.top5_best {
        info!(id = %ranked.id, score = %format!("{:.2}", ranked.score), "best match");
    }
    for ranked in &report.data_match.top5_worst {
        info!(id = %ranked.id, score = %format!("{:.2}", ranked.score), "worst match");
    }
}

fn log_failures(failures: &[InstanceFailure]) {
    for failure in failures {
        warn!(
            query_id = %failure.query_id,
            variant = %failure.variant,
            reason = %failure.reason,
            "instance could not be evaluated"
        );
    }
}
