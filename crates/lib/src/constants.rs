//! # Shared Constants
//!
//! Type names, file suffixes, wire defaults and the fixed record messages used
//! across the `mdenrich` workspace.

/// The only native component type eligible for enrichment.
pub const LWC_TYPE_NAME: &str = "LightningComponentBundle";

/// Native type name of Aura bundles, discovered but never enriched.
pub const AURA_TYPE_NAME: &str = "AuraDefinitionBundle";

/// Suffix of the configuration file patched for an enriched bundle.
pub const LWC_CONFIG_SUFFIX: &str = ".js-meta.xml";

/// Path, relative to the versioned REST root, of the enrichment endpoint.
pub const DEFAULT_ENRICHMENT_ENDPOINT: &str = "/metadata-intelligence/enrich";

/// Default REST API version used to build the endpoint URL.
pub const DEFAULT_API_VERSION: &str = "65.0";

/// Default upper bound on generated output size sent with each request.
pub const DEFAULT_MAX_TOKENS: u32 = 50;

/// Header disabling HTML entity encoding of the response payload.
pub const ENTITY_ENCODING_HEADER: &str = "X-Chatter-Entity-Encoding";

/// Encoding marker carried by every content bundle file.
pub const PLAIN_TEXT_ENCODING: &str = "PlainText";

/// Metadata type tag for types without a dedicated mapping.
pub const GENERIC_METADATA_TYPE: &str = "Generic";

// --- Record messages ---

pub const MSG_NOT_FOUND: &str = "Component was not found in the project.";
pub const MSG_INELIGIBLE_TYPE: &str =
    "Only LightningComponentBundle components are eligible for enrichment.";
pub const MSG_CONFIG_MISSING: &str =
    "Required configuration file (*.js-meta.xml) is missing for this component.";
pub const MSG_UNKNOWN_SKIP: &str = "Component was skipped for an unknown reason.";
pub const MSG_NO_CONTENT: &str = "No content files could be read for this component.";
pub const MSG_NO_REQUEST_BODY: &str = "No request body could be built for this component.";
pub const MSG_OPT_OUT: &str =
    "Enrichment opt-out (skipUplift) is enabled in the component configuration.";
pub const MSG_NOT_PROCESSED: &str = "Component was not processed.";
