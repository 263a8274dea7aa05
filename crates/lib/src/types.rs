//! # Wire Types
//!
//! Request and response payloads exchanged with the enrichment endpoint. Field
//! names follow the endpoint's camelCase JSON.

use crate::constants::{
    DEFAULT_MAX_TOKENS, GENERIC_METADATA_TYPE, LWC_TYPE_NAME, PLAIN_TEXT_ENCODING,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single file inside a content bundle.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundleFile {
    pub filename: String,
    pub mime_type: String,
    pub content: String,
    pub encoding: String,
}

impl ContentBundleFile {
    pub fn new(filename: String, mime_type: String, content: String) -> Self {
        Self {
            filename,
            mime_type,
            content,
            encoding: PLAIN_TEXT_ENCODING.to_string(),
        }
    }
}

/// All files of one component, keyed by base filename.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct ContentBundle {
    pub resource_name: String,
    pub files: BTreeMap<String, ContentBundleFile>,
}

impl ContentBundle {
    pub fn new(resource_name: impl Into<String>) -> Self {
        Self {
            resource_name: resource_name.into(),
            files: BTreeMap::new(),
        }
    }

    /// Adds a file under its filename. A later file with the same name replaces
    /// the earlier one.
    pub fn insert(&mut self, file: ContentBundleFile) {
        self.files.insert(file.filename.clone(), file);
    }
}

/// The JSON body POSTed to the enrichment endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentRequestBody {
    pub content_bundles: Vec<ContentBundle>,
    pub metadata_type: String,
    pub max_tokens: u32,
}

impl Default for EnrichmentRequestBody {
    fn default() -> Self {
        Self {
            content_bundles: Vec::new(),
            metadata_type: GENERIC_METADATA_TYPE.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
        }
    }
}

impl EnrichmentRequestBody {
    /// Builds a body carrying a single bundle for a component of `type_name`.
    pub fn for_bundle(bundle: ContentBundle, type_name: &str, max_tokens: u32) -> Self {
        Self {
            content_bundles: vec![bundle],
            metadata_type: metadata_type_for(type_name).to_string(),
            max_tokens,
        }
    }
}

/// Maps a native component type to the tag understood by the endpoint.
pub fn metadata_type_for(type_name: &str) -> &'static str {
    match type_name {
        LWC_TYPE_NAME => "Lwc",
        _ => GENERIC_METADATA_TYPE,
    }
}

/// Per-component result returned by the endpoint.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResult {
    #[serde(default)]
    pub resource_id: String,
    #[serde(default)]
    pub resource_name: String,
    #[serde(default)]
    pub metadata_type: String,
    #[serde(default)]
    pub model_used: String,
    pub description: String,
    pub description_score: f64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnrichmentResponseMetadata {
    #[serde(default)]
    pub duration_ms: u64,
    #[serde(default)]
    pub failure_count: u32,
    #[serde(default)]
    pub success_count: u32,
    #[serde(default)]
    pub timestamp: String,
}

/// The full response of one enrichment call.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct EnrichMetadataResult {
    #[serde(default)]
    pub metadata: EnrichmentResponseMetadata,
    #[serde(default)]
    pub results: Vec<EnrichmentResult>,
}

impl EnrichMetadataResult {
    /// The result applied to the component. Later entries are ignored.
    pub fn first_result(&self) -> Option<&EnrichmentResult> {
        self.results.first()
    }
}
