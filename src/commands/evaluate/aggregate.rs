use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use super::filter::OperationsFilter;
use super::loader::ResultCorpus;
use super::scoring::match_score;
use super::structural::compare_results;
use super::types::{
    Aggregation, CorpusReport, DataMatchSummary, InstanceFailure, InstanceReport, RankedInstance,
    instance_key,
};
use crate::model::{CONTROL_VARIANT, QueryResult};

const RANKING_WINDOW: usize = 5;

/// Compares every AI variant against its control and reduces the corpus to a report.
pub(crate) fn aggregate_corpus(corpus: &ResultCorpus, filter: &OperationsFilter) -> Aggregation {
    let broken_controls = corpus
        .malformed
        .iter()
        .filter(|failure| failure.variant == CONTROL_VARIANT)
        .map(|failure| failure.query_id.as_str())
        .collect::<BTreeSet<_>>();

    // A broken AI record only counts when its query could have been evaluated.
    let mut failures = corpus
        .malformed
        .iter()
        .filter(|failure| {
            failure.variant == CONTROL_VARIANT
                || broken_controls.contains(failure.query_id.as_str())
                || has_control(corpus, &failure.query_id)
        })
        .cloned()
        .collect::<Vec<_>>();
    let orphaned = corpus.malformed.len() - failures.len();
    if orphaned > 0 {
        debug!(orphaned, "malformed records without a control skipped");
    }

    let mut seen_keys = BTreeSet::<String>::new();
    let mut instances = Vec::<InstanceReport>::new();
    for (query_id, variants) in &corpus.groups {
        let Some(control) = variants.get(CONTROL_VARIANT) else {
            if broken_controls.contains(query_id.as_str()) {
                failures.extend(
                    variants
                        .values()
                        .filter(|result| filter.matches(&result.operations))
                        .map(|result| broken_control_failure(query_id, &result.variant)),
                );
            } else {
                debug!(query_id = %query_id, "no control result; query skipped");
            }
            continue;
        };

        for ai in variants.values().filter(|result| !result.is_control()) {
            if !filter.matches(&ai.operations) {
                continue;
            }
            let key = instance_key(&ai.query_id, &ai.variant);
            if !seen_keys.insert(key.clone()) {
                failures.push(InstanceFailure {
                    query_id: ai.query_id.clone(),
                    variant: ai.variant.clone(),
                    reason: format!("instance id {key} is already used by another query and variant"),
                });
                continue;
            }
            instances.push(evaluate_instance(ai, control));
        }
    }

    if instances.is_empty() {
        return Aggregation::NothingToReport { failures };
    }

    Aggregation::Report(build_report(instances, failures))
}

pub(crate) fn evaluate_instance(ai: &QueryResult, control: &QueryResult) -> InstanceReport {
    let comparison = compare_results(&ai.rows, &control.rows);
    let correct = comparison.is_structurally_equal();
    let match_score = match_score(&comparison);

    InstanceReport {
        query_id: ai.query_id.clone(),
        variant: ai.variant.clone(),
        correct,
        match_score,
        ai_duration: ai.duration,
        ctrl_duration: control.duration,
        faster: correct && ai.duration < control.duration,
        operations: ai.operations.clone(),
        comparison,
    }
}

fn has_control(corpus: &ResultCorpus, query_id: &str) -> bool {
    corpus
        .groups
        .get(query_id)
        .is_some_and(|variants| variants.contains_key(CONTROL_VARIANT))
}

fn broken_control_failure(query_id: &str, variant: &str) -> InstanceFailure {
    InstanceFailure {
        query_id: query_id.to_string(),
        variant: variant.to_string(),
        reason: format!("control result for query {query_id} is malformed"),
    }
}

// `instances` must be non-empty.
fn build_report(instances: Vec<InstanceReport>, failures: Vec<InstanceFailure>) -> CorpusReport {
    let total = instances.len();
    let correct_total = instances.iter().filter(|instance| instance.correct).count();
    let faster_total = instances.iter().filter(|instance| instance.faster).count();
    let accuracy = correct_total as f64 / total as f64;

    let mut per_variant = BTreeMap::<String, (usize, usize)>::new();
    for instance in &instances {
        let (correct, seen) = per_variant.entry(instance.variant.clone()).or_default();
        *seen += 1;
        if instance.correct {
            *correct += 1;
        }
    }
    let categories = per_variant
        .into_iter()
        .map(|(variant, (correct, seen))| (variant, correct as f64 / seen as f64))
        .collect();

    let mut ranked = instances
        .iter()
        .map(|instance| RankedInstance {
            id: instance.key(),
            query_id: instance.query_id.clone(),
            variant: instance.variant.clone(),
            score: instance.match_score,
        })
        .collect::<Vec<_>>();
    // Stable: ties keep corpus order.
    ranked.sort_by(|left, right| right.score.total_cmp(&left.score));

    let top5_best = ranked.iter().take(RANKING_WINDOW).cloned().collect();
    let top5_worst = ranked[ranked.len().saturating_sub(RANKING_WINDOW)..].to_vec();

    let mismatch_ids = instances
        .iter()
        .filter(|instance| !instance.correct)
        .map(InstanceReport::key)
        .collect();

    let data_match = DataMatchSummary {
        average_score: mean(instances.iter().map(|instance| instance.match_score)),
        top5_best,
        top5_worst,
        mismatch_ids,
    };

    CorpusReport {
        total_prompts: total,
        correct_total,
        accuracy,
        correct_percentage: accuracy * 100.0,
        faster_total,
        avg_ai_duration: mean(instances.iter().map(|instance| instance.ai_duration)),
        avg_ctrl_duration: mean(instances.iter().map(|instance| instance.ctrl_duration)),
        categories,
        data_match,
        instances: instances
            .into_iter()
            .map(|instance| (instance_key(&instance.query_id, &instance.variant), instance))
            .collect(),
        failures,
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0_f64, 0_usize), |(sum, count), value| (sum + value, count + 1));
    if count == 0 {
        return 0.0;
    }
    sum / count as f64
}
