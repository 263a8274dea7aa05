//! # Enrichment Record Store
//!
//! One `EnrichmentRequestRecord` per component tracks a single enrichment run
//! from classification, through the network call, to the configuration patch.
//!
//! Status transitions:
//!
//! - `NotProcessed` becomes `Success` or `Fail` when a network outcome is merged.
//! - `Skipped` is assigned at creation for components that are not enriched,
//!   and is never overwritten by a merged network outcome.
//! - `Success` becomes `Skipped` in the patch phase when the component's
//!   configuration opts out of enrichment.

use crate::component::MetadataComponent;
use crate::constants::{
    LWC_TYPE_NAME, MSG_CONFIG_MISSING, MSG_INELIGIBLE_TYPE, MSG_NOT_FOUND, MSG_OPT_OUT,
    MSG_UNKNOWN_SKIP,
};
use crate::types::{EnrichMetadataResult, EnrichmentRequestBody};
use serde::Serialize;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EnrichmentStatus {
    NotProcessed,
    Success,
    Fail,
    Skipped,
}

/// Request, response and outcome for one component.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequestRecord {
    component_name: String,
    pub component_type: Option<String>,
    /// `None` when no request could be built for the component.
    pub request_body: Option<EnrichmentRequestBody>,
    pub response: Option<EnrichMetadataResult>,
    pub message: Option<String>,
    pub status: EnrichmentStatus,
}

impl EnrichmentRequestRecord {
    /// A record waiting for its network call.
    pub fn pending(
        component_name: impl Into<String>,
        component_type: Option<String>,
        request_body: EnrichmentRequestBody,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            component_type,
            request_body: Some(request_body),
            response: None,
            message: None,
            status: EnrichmentStatus::NotProcessed,
        }
    }

    /// A record that will never be sent.
    pub fn skipped(
        component_name: impl Into<String>,
        component_type: Option<String>,
        message: Option<String>,
    ) -> Self {
        Self {
            component_name: component_name.into(),
            component_type,
            request_body: None,
            response: None,
            message,
            status: EnrichmentStatus::Skipped,
        }
    }

    pub fn component_name(&self) -> &str {
        &self.component_name
    }

    /// Records a successful network outcome.
    pub fn succeed(&mut self, response: EnrichMetadataResult) {
        self.response = Some(response);
        self.status = EnrichmentStatus::Success;
    }

    /// Records a failed network outcome, keeping the error text verbatim.
    pub fn fail(&mut self, message: impl Into<String>) {
        self.message = Some(message.into());
        self.status = EnrichmentStatus::Fail;
    }

    /// Moves a record with a response to `Skipped` because its configuration
    /// opts out. Records without a response are left alone.
    pub fn opt_out(&mut self) -> bool {
        if self.response.is_none() {
            return false;
        }
        self.status = EnrichmentStatus::Skipped;
        self.message = Some(MSG_OPT_OUT.to_string());
        true
    }
}

/// The record set of one enrichment run, in insertion order.
#[derive(Serialize, Debug, Clone, Default, PartialEq)]
#[serde(transparent)]
pub struct EnrichmentRecords {
    records: Vec<EnrichmentRequestRecord>,
}

impl From<Vec<EnrichmentRequestRecord>> for EnrichmentRecords {
    fn from(records: Vec<EnrichmentRequestRecord>) -> Self {
        Self { records }
    }
}

impl EnrichmentRecords {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnrichmentRequestRecord> {
        self.records.iter()
    }

    pub fn as_slice(&self) -> &[EnrichmentRequestRecord] {
        &self.records
    }

    pub fn into_vec(self) -> Vec<EnrichmentRequestRecord> {
        self.records
    }

    pub fn get(&self, component_name: &str) -> Option<&EnrichmentRequestRecord> {
        self.records
            .iter()
            .find(|record| record.component_name == component_name)
    }

    pub fn get_mut(&mut self, component_name: &str) -> Option<&mut EnrichmentRequestRecord> {
        self.records
            .iter_mut()
            .find(|record| record.component_name == component_name)
    }

    fn contains(&self, component_name: &str) -> bool {
        self.get(component_name).is_some()
    }

    /// Creates a `NotProcessed` record with a default request body for every
    /// component that has both a name and a type.
    pub fn initialize<C: MetadataComponent>(&mut self, components: &[C]) {
        for component in components {
            if let (Some(name), Some(type_name)) = (component.full_name(), component.type_name())
            {
                self.records.push(EnrichmentRequestRecord::pending(
                    name,
                    Some(type_name.to_string()),
                    EnrichmentRequestBody::default(),
                ));
            }
        }
    }

    /// Adds a `Skipped` record for each named component not present yet.
    /// Existing records are never touched.
    pub fn mark_skipped<C: MetadataComponent>(&mut self, components: &[C]) {
        for component in components {
            let Some(name) = component.full_name() else {
                continue;
            };
            if self.contains(name) {
                continue;
            }
            self.records.push(EnrichmentRequestRecord::skipped(
                name,
                component.type_name().map(String::from),
                None,
            ));
        }
    }

    /// Overwrites the status of every record matching one of `components`,
    /// whatever its current state.
    pub fn apply_status<C: MetadataComponent>(
        &mut self,
        components: &[C],
        status: EnrichmentStatus,
    ) {
        for component in components {
            if let Some(record) = component.full_name().and_then(|name| self.get_mut(name)) {
                record.status = status;
            }
        }
    }

    /// Merges records coming back from the network phase.
    ///
    /// Request body, response and message are overwritten on the matching
    /// record. Its status follows the response, unless it is already `Skipped`.
    /// Incoming records without a match are ignored.
    pub fn merge_results<I>(&mut self, incoming: I)
    where
        I: IntoIterator<Item = EnrichmentRequestRecord>,
    {
        for update in incoming {
            let Some(record) = self.get_mut(&update.component_name) else {
                continue;
            };
            record.request_body = update.request_body;
            record.message = update.message;
            record.response = update.response;
            if record.status != EnrichmentStatus::Skipped {
                record.status = if record.response.is_some() {
                    EnrichmentStatus::Success
                } else {
                    EnrichmentStatus::Fail
                };
            }
        }
    }

    /// Gives every message-less `Skipped` record named in `names` the reason it
    /// was skipped. The most specific reason wins.
    pub fn explain_skips<C: MetadataComponent>(&mut self, names: &[&str], source_components: &[C]) {
        for record in self.records.iter_mut() {
            if record.status != EnrichmentStatus::Skipped || record.message.is_some() {
                continue;
            }
            if !names.contains(&record.component_name.as_str()) {
                continue;
            }
            let source = source_components
                .iter()
                .find(|c| c.full_name() == Some(record.component_name.as_str()));
            let reason = match source {
                None => MSG_NOT_FOUND,
                Some(c) if c.type_name() != Some(LWC_TYPE_NAME) => MSG_INELIGIBLE_TYPE,
                Some(c) if c.xml_path().is_none() => MSG_CONFIG_MISSING,
                Some(_) => MSG_UNKNOWN_SKIP,
            };
            record.message = Some(reason.to_string());
        }
    }
}
