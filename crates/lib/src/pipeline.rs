//! # Enrichment Pipeline
//!
//! Runs one enrichment from start to finish: network phase, record
//! reconciliation, skip explanations, configuration patching, metrics. The
//! phases run one after the other.

use crate::component::MetadataComponent;
use crate::enricher::Enricher;
use crate::metrics::EnrichmentMetrics;
use crate::patcher::ConfigPatcher;
use crate::records::{EnrichmentRecords, EnrichmentStatus};
use tracing::info;

/// Everything produced by one run.
#[derive(Debug, Clone)]
pub struct EnrichmentRun {
    pub records: EnrichmentRecords,
    pub metrics: EnrichmentMetrics,
    pub files_written: usize,
}

/// Enriches `components` and patches their configuration files.
///
/// `unresolved` holds components that were asked for but could not be found in
/// the project; they are reported as skipped. Records are ordered like the
/// output of [`Enricher::enrich`], followed by anything only known as skipped.
pub async fn run_enrichment<C: MetadataComponent>(
    enricher: &Enricher,
    components: &[C],
    unresolved: &[C],
) -> EnrichmentRun {
    let outcomes = enricher.enrich(components).await;

    let find = |name: &str| components.iter().find(|c| c.full_name() == Some(name));
    let ordered: Vec<&C> = outcomes
        .iter()
        .filter_map(|outcome| find(outcome.component_name()))
        .collect();
    let skipped: Vec<&C> = outcomes
        .iter()
        .filter(|outcome| outcome.status == EnrichmentStatus::Skipped)
        .filter_map(|outcome| find(outcome.component_name()))
        .collect();

    let mut records = EnrichmentRecords::new();
    records.initialize(&ordered);
    records.apply_status(&skipped, EnrichmentStatus::Skipped);
    records.merge_results(outcomes);
    records.mark_skipped(components);
    records.mark_skipped(unresolved);

    let skipped_names: Vec<String> = records
        .iter()
        .filter(|r| r.status == EnrichmentStatus::Skipped)
        .map(|r| r.component_name().to_string())
        .collect();
    let skipped_names: Vec<&str> = skipped_names.iter().map(String::as_str).collect();
    records.explain_skips(&skipped_names, components);

    let patcher = ConfigPatcher::new(enricher.reader());
    let files_written = patcher.apply(&mut records, components).await;

    let metrics = EnrichmentMetrics::from_records(records.iter());
    info!(
        "[run_enrichment] {} succeeded, {} failed, {} skipped, {} file(s) written.",
        metrics.success.count, metrics.fail.count, metrics.skipped.count, files_written
    );

    EnrichmentRun {
        records,
        metrics,
        files_written,
    }
}
