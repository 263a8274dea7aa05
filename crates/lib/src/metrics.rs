//! # Enrichment Metrics
//!
//! A read-only summary of a finished record set, for reporting.

use crate::constants::MSG_NOT_PROCESSED;
use crate::records::{EnrichmentRequestRecord, EnrichmentStatus};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ComponentStatusSummary {
    pub component_type: Option<String>,
    pub component_name: String,
    pub message: Option<String>,
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct StatusBucket {
    pub count: usize,
    pub components: Vec<ComponentStatusSummary>,
}

impl StatusBucket {
    fn push(&mut self, summary: ComponentStatusSummary) {
        self.count += 1;
        self.components.push(summary);
    }
}

#[derive(Serialize, Debug, Clone, Default, PartialEq)]
pub struct EnrichmentMetrics {
    pub success: StatusBucket,
    pub fail: StatusBucket,
    pub skipped: StatusBucket,
    pub total: usize,
}

impl EnrichmentMetrics {
    /// Buckets records by status. Records that never left `NotProcessed` are
    /// counted as failures.
    pub fn from_records<'a, I>(records: I) -> Self
    where
        I: IntoIterator<Item = &'a EnrichmentRequestRecord>,
    {
        let mut metrics = Self::default();

        for record in records {
            let mut summary = ComponentStatusSummary {
                component_type: record.component_type.clone(),
                component_name: record.component_name().to_string(),
                message: record.message.clone(),
            };
            match record.status {
                EnrichmentStatus::Success => metrics.success.push(summary),
                EnrichmentStatus::Fail => metrics.fail.push(summary),
                EnrichmentStatus::Skipped => metrics.skipped.push(summary),
                EnrichmentStatus::NotProcessed => {
                    summary
                        .message
                        .get_or_insert_with(|| MSG_NOT_PROCESSED.to_string());
                    metrics.fail.push(summary);
                }
            }
            metrics.total += 1;
        }

        metrics
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EnrichMetadataResult, EnrichmentRequestBody};

    fn record(name: &str, status: EnrichmentStatus) -> EnrichmentRequestRecord {
        let mut record = EnrichmentRequestRecord::pending(
            name,
            Some("LightningComponentBundle".to_string()),
            EnrichmentRequestBody::default(),
        );
        match status {
            EnrichmentStatus::Success => record.succeed(EnrichMetadataResult::default()),
            EnrichmentStatus::Fail => record.fail("boom"),
            EnrichmentStatus::Skipped => record.status = EnrichmentStatus::Skipped,
            EnrichmentStatus::NotProcessed => {}
        }
        record
    }

    #[test]
    fn test_metrics_totals_add_up() {
        let records = vec![
            record("a", EnrichmentStatus::Success),
            record("b", EnrichmentStatus::Fail),
            record("c", EnrichmentStatus::Skipped),
            record("d", EnrichmentStatus::NotProcessed),
            record("e", EnrichmentStatus::Success),
        ];

        let metrics = EnrichmentMetrics::from_records(&records);

        assert_eq!(metrics.total, 5);
        assert_eq!(metrics.success.count, 2);
        assert_eq!(metrics.fail.count, 2);
        assert_eq!(metrics.skipped.count, 1);
        assert_eq!(
            metrics.success.count + metrics.fail.count + metrics.skipped.count,
            metrics.total
        );
        assert_eq!(metrics.fail.components[0].message.as_deref(), Some("boom"));
        assert_eq!(
            metrics.fail.components[1].message.as_deref(),
            Some(MSG_NOT_PROCESSED)
        );
    }

    #[test]
    fn test_metrics_empty() {
        let metrics = EnrichmentMetrics::from_records(&Vec::<EnrichmentRequestRecord>::new());
        assert_eq!(metrics, EnrichmentMetrics::default());
    }
}
