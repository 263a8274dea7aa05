//! # Metadata Enrichment
//!
//! This crate sends the files of project metadata components (Lightning web
//! component bundles) to a remote enrichment endpoint and writes the returned
//! description and score back into each bundle's `*.js-meta.xml`.
//!
//! The work is split into phases that run one after the other:
//!
//! 1.  **Enrich** ([`Enricher`]): classify components, read their files, send one
//!     request per eligible component concurrently.
//! 2.  **Reconcile** ([`EnrichmentRecords`]): merge the outcomes into the record
//!     set and explain every skip.
//! 3.  **Patch** ([`ConfigPatcher`]): rewrite configuration files, honoring the
//!     `skipUplift` opt-out.
//! 4.  **Report** ([`EnrichmentMetrics`]).
//!
//! [`run_enrichment`] runs all of them.

pub mod component;
pub mod constants;
pub mod enricher;
pub mod errors;
pub mod metrics;
pub mod patcher;
pub mod pipeline;
pub mod providers;
pub mod reader;
pub mod records;
pub mod types;

pub use component::MetadataComponent;
pub use enricher::{EnrichmentOptions, Enricher, MissingBodyPolicy};
pub use errors::EnrichError;
pub use metrics::{ComponentStatusSummary, EnrichmentMetrics, StatusBucket};
pub use patcher::{apply_patch, ConfigPatcher, PatchOutcome};
pub use pipeline::{run_enrichment, EnrichmentRun};
pub use providers::connection::{Connection, HttpConnection};
pub use reader::{mime_type_for, ContentReader, FileContentReader, FileContentResult};
pub use records::{EnrichmentRecords, EnrichmentRequestRecord, EnrichmentStatus};
pub use types::{
    ContentBundle, ContentBundleFile, EnrichMetadataResult, EnrichmentRequestBody,
    EnrichmentResponseMetadata, EnrichmentResult,
};
