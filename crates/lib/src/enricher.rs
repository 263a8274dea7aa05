//! # Enrichment Orchestrator
//!
//! Classifies components, builds one request per eligible component, sends the
//! requests concurrently and turns every outcome into a record. A failure for
//! one component never affects another.

use crate::component::MetadataComponent;
use crate::constants::{
    DEFAULT_ENRICHMENT_ENDPOINT, DEFAULT_MAX_TOKENS, ENTITY_ENCODING_HEADER, LWC_TYPE_NAME,
    MSG_INELIGIBLE_TYPE, MSG_NO_CONTENT, MSG_NO_REQUEST_BODY,
};
use crate::errors::EnrichError;
use crate::providers::connection::Connection;
use crate::reader::{ContentReader, FileContentReader};
use crate::records::{EnrichmentRequestRecord, EnrichmentStatus};
use crate::types::{
    ContentBundle, ContentBundleFile, EnrichMetadataResult, EnrichmentRequestBody,
};
use futures::future::join_all;
use serde::Deserialize;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happens to a pending record that carries no request body.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MissingBodyPolicy {
    /// The call was intended and could not be made.
    #[default]
    Fail,
    Skip,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EnrichmentOptions {
    /// Endpoint path, relative to the connection's REST root.
    pub endpoint: String,
    pub max_tokens: u32,
    pub missing_body_policy: MissingBodyPolicy,
}

impl Default for EnrichmentOptions {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENRICHMENT_ENDPOINT.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            missing_body_policy: MissingBodyPolicy::default(),
        }
    }
}

/// Sends components to the enrichment endpoint.
pub struct Enricher {
    connection: Arc<dyn Connection>,
    reader: Arc<dyn ContentReader>,
    options: EnrichmentOptions,
}

impl Enricher {
    /// Creates an `Enricher` reading files from disk with default options.
    pub fn new(connection: Arc<dyn Connection>) -> Self {
        Self {
            connection,
            reader: Arc::new(FileContentReader::new()),
            options: EnrichmentOptions::default(),
        }
    }

    /// Replaces the reader used to load component files.
    pub fn with_reader(mut self, reader: Arc<dyn ContentReader>) -> Self {
        self.reader = reader;
        self
    }

    pub fn with_options(mut self, options: EnrichmentOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &EnrichmentOptions {
        &self.options
    }

    pub fn reader(&self) -> Arc<dyn ContentReader> {
        Arc::clone(&self.reader)
    }

    /// Enriches `components` and returns one record per named component.
    ///
    /// Records of eligible components come first, followed by the `Skipped`
    /// records of ineligible ones; both keep the input order. Components
    /// without a name produce no record.
    pub async fn enrich<C: MetadataComponent>(
        &self,
        components: &[C],
    ) -> Vec<EnrichmentRequestRecord> {
        let (named, nameless): (Vec<&C>, Vec<&C>) =
            components.iter().partition(|c| c.full_name().is_some());
        if !nameless.is_empty() {
            warn!(
                "[enrich] Dropping {} component(s) without a resolvable name.",
                nameless.len()
            );
        }

        let (eligible, ineligible): (Vec<&C>, Vec<&C>) = named
            .into_iter()
            .partition(|c| c.type_name() == Some(LWC_TYPE_NAME));
        info!(
            "[enrich] {} eligible, {} ineligible component(s).",
            eligible.len(),
            ineligible.len()
        );

        let built = join_all(eligible.into_iter().map(|c| self.build_record(c))).await;
        let dispatched = self.dispatch(built.into_iter().flatten().collect()).await;

        let skipped = ineligible.into_iter().filter_map(|c| {
            let name = c.full_name()?;
            Some(EnrichmentRequestRecord::skipped(
                name,
                c.type_name().map(String::from),
                Some(MSG_INELIGIBLE_TYPE.to_string()),
            ))
        });

        dispatched.into_iter().chain(skipped).collect()
    }

    /// Reads an eligible component's files and builds its record.
    ///
    /// A component without readable files is `Skipped` right away and will not
    /// be sent.
    pub async fn build_record(
        &self,
        component: &dyn MetadataComponent,
    ) -> Option<EnrichmentRequestRecord> {
        let name = component.full_name()?;
        let type_name = component.type_name().unwrap_or_default();
        let files = self.reader.read_many(component).await;

        if files.is_empty() {
            debug!("[build_record] '{name}' has no readable files, skipping.");
            return Some(EnrichmentRequestRecord::skipped(
                name,
                component.type_name().map(String::from),
                Some(MSG_NO_CONTENT.to_string()),
            ));
        }

        let mut bundle = ContentBundle::new(name);
        for file in files {
            bundle.insert(ContentBundleFile::new(
                file.filename,
                file.mime_type,
                file.content,
            ));
        }
        let body = EnrichmentRequestBody::for_bundle(bundle, type_name, self.options.max_tokens);

        Some(EnrichmentRequestRecord::pending(
            name,
            component.type_name().map(String::from),
            body,
        ))
    }

    /// Sends every pending record concurrently. Records in any other state are
    /// returned untouched, in the same order.
    pub async fn dispatch(
        &self,
        records: Vec<EnrichmentRequestRecord>,
    ) -> Vec<EnrichmentRequestRecord> {
        join_all(records.into_iter().map(|record| self.send(record))).await
    }

    async fn send(&self, mut record: EnrichmentRequestRecord) -> EnrichmentRequestRecord {
        if record.status != EnrichmentStatus::NotProcessed {
            return record;
        }

        let payload = match record.request_body.as_ref().map(serde_json::to_value) {
            Some(Ok(payload)) => payload,
            Some(Err(e)) => {
                record.fail(EnrichError::from(e).to_string());
                return record;
            }
            None => {
                match self.options.missing_body_policy {
                    MissingBodyPolicy::Fail => record.fail(MSG_NO_REQUEST_BODY),
                    MissingBodyPolicy::Skip => {
                        record.status = EnrichmentStatus::Skipped;
                        record.message = Some(MSG_NO_REQUEST_BODY.to_string());
                    }
                }
                return record;
            }
        };

        let outcome = self
            .connection
            .post(
                &self.options.endpoint,
                &payload,
                &[(ENTITY_ENCODING_HEADER, "false")],
            )
            .await
            .and_then(|value| Ok(serde_json::from_value::<EnrichMetadataResult>(value)?));

        match outcome {
            Ok(response) => {
                info!("[dispatch] '{}' enriched.", record.component_name());
                record.succeed(response);
            }
            Err(e) => {
                warn!("[dispatch] '{}' failed: {e}", record.component_name());
                record.fail(e.to_string());
            }
        }
        record
    }
}
