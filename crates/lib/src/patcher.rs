//! # Configuration Patcher
//!
//! Writes an enrichment result into a bundle's `*.js-meta.xml`:
//!
//! ```xml
//! <LightningComponentBundle xmlns="http://soap.sforce.com/2006/04/metadata">
//!     <ai>
//!         <skipUplift>false</skipUplift>
//!         <description>Displays a greeting card.</description>
//!         <score>0.95</score>
//!     </ai>
//! </LightningComponentBundle>
//! ```
//!
//! A configuration whose `ai/skipUplift` is `true` is never rewritten.

use crate::component::MetadataComponent;
use crate::constants::{LWC_CONFIG_SUFFIX, LWC_TYPE_NAME, MSG_CONFIG_MISSING};
use crate::errors::EnrichError;
use crate::reader::ContentReader;
use crate::records::{EnrichmentRecords, EnrichmentStatus};
use crate::types::EnrichmentResult;
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, info, warn};
use xmltree::{Element, EmitterConfig, XMLNode};

const AI_ELEMENT: &str = "ai";
const SKIP_UPLIFT_ELEMENT: &str = "skipUplift";
const DESCRIPTION_ELEMENT: &str = "description";
const SCORE_ELEMENT: &str = "score";
const XML_DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// The result of patching one configuration document.
#[derive(Debug, Clone, PartialEq)]
pub enum PatchOutcome {
    /// The document opts out of enrichment and must not be written.
    OptedOut,
    /// The full replacement text for the document.
    Updated(String),
}

/// Embeds `result` into the configuration `markup`.
///
/// The opt-out check runs before anything else touches the document.
pub fn apply_patch(markup: &str, result: &EnrichmentResult) -> Result<PatchOutcome, EnrichError> {
    let mut root = Element::parse(markup.as_bytes())?;

    if is_opted_out(&root) {
        return Ok(PatchOutcome::OptedOut);
    }

    let index = root
        .children
        .iter()
        .position(|node| matches!(node, XMLNode::Element(e) if e.name == AI_ELEMENT));
    let mut ai = root
        .take_child(AI_ELEMENT)
        .unwrap_or_else(|| child_of(&root, AI_ELEMENT));

    set_child_text(&mut ai, SKIP_UPLIFT_ELEMENT, "false");
    set_child_text(&mut ai, DESCRIPTION_ELEMENT, &result.description);
    set_child_text(&mut ai, SCORE_ELEMENT, &result.description_score.to_string());

    match index {
        Some(i) => root.children.insert(i, XMLNode::Element(ai)),
        None => root.children.push(XMLNode::Element(ai)),
    }

    Ok(PatchOutcome::Updated(build(&root)?))
}

/// True when any `ai/skipUplift` under the root holds `true`.
pub fn is_opted_out(root: &Element) -> bool {
    root.children
        .iter()
        .filter_map(XMLNode::as_element)
        .filter(|e| e.name == AI_ELEMENT)
        .flat_map(|ai| ai.children.iter().filter_map(XMLNode::as_element))
        .filter(|e| e.name == SKIP_UPLIFT_ELEMENT)
        .any(|flag| {
            flag.get_text()
                .map(|text| text.trim().eq_ignore_ascii_case("true"))
                .unwrap_or(false)
        })
}

/// Serializes a document with an UTF-8 declaration and four-space indentation.
fn build(root: &Element) -> Result<String, EnrichError> {
    let mut buffer = Vec::new();
    let config = EmitterConfig::new()
        .perform_indent(true)
        .indent_string("    ")
        .write_document_declaration(false);
    root.write_with_config(&mut buffer, config)?;

    let body = String::from_utf8_lossy(&buffer);
    let text = format!("{XML_DECLARATION}\n{}\n", body.trim());
    normalize_blank_lines(&text)
}

/// Trims the text and collapses runs of blank lines into a single one.
pub fn normalize_blank_lines(text: &str) -> Result<String, EnrichError> {
    let re = Regex::new(r"\n[ \t\r]*\n(?:[ \t\r]*\n)+")?;
    Ok(re.replace_all(text.trim(), "\n\n").into_owned())
}

/// A new element sharing the namespace of `parent`, so it serializes without
/// a namespace declaration of its own.
fn child_of(parent: &Element, name: &str) -> Element {
    let mut child = Element::new(name);
    child.namespace = parent.namespace.clone();
    child.namespaces = parent.namespaces.clone();
    child.prefix = parent.prefix.clone();
    child
}

fn set_child_text(parent: &mut Element, name: &str, text: &str) {
    if let Some(child) = parent.get_mut_child(name) {
        child.children = vec![XMLNode::Text(text.to_string())];
        return;
    }
    let mut child = child_of(parent, name);
    child.children.push(XMLNode::Text(text.to_string()));
    parent.children.push(XMLNode::Element(child));
}

/// Applies enrichment results to the configuration files on disk.
pub struct ConfigPatcher {
    reader: Arc<dyn ContentReader>,
}

impl ConfigPatcher {
    pub fn new(reader: Arc<dyn ContentReader>) -> Self {
        Self { reader }
    }

    /// Patches the configuration of every successfully enriched bundle, one
    /// component at a time, and returns the number of files written.
    ///
    /// Problems are recorded on the component's record; they never stop the
    /// remaining components from being patched.
    pub async fn apply<C: MetadataComponent>(
        &self,
        records: &mut EnrichmentRecords,
        components: &[C],
    ) -> usize {
        let mut written = 0;

        for component in components {
            if component.type_name() != Some(LWC_TYPE_NAME) {
                continue;
            }
            let Some(name) = component.full_name() else {
                continue;
            };
            let Some(record) = records.get_mut(name) else {
                continue;
            };
            if record.status != EnrichmentStatus::Success {
                continue;
            }
            let Some(result) = record.response.as_ref().and_then(|r| r.first_result()) else {
                debug!("[patch] '{name}' has no enrichment result, nothing to write.");
                continue;
            };
            let result = result.clone();

            let files = self.reader.read_many(component).await;
            let Some(config) = files
                .iter()
                .find(|f| f.filename.ends_with(LWC_CONFIG_SUFFIX))
            else {
                warn!("[patch] '{name}' has no {LWC_CONFIG_SUFFIX} file.");
                record.message = Some(MSG_CONFIG_MISSING.to_string());
                continue;
            };

            match apply_patch(&config.content, &result) {
                Ok(PatchOutcome::OptedOut) => {
                    info!("[patch] '{name}' opts out of enrichment, leaving it unchanged.");
                    record.opt_out();
                }
                Ok(PatchOutcome::Updated(text)) => {
                    match tokio::fs::write(&config.path, text).await {
                        Ok(()) => {
                            info!("[patch] Updated '{}'.", config.path.display());
                            written += 1;
                        }
                        Err(e) => {
                            warn!("[patch] Failed to write '{}': {e}", config.path.display());
                            record.message = Some(EnrichError::from(e).to_string());
                        }
                    }
                }
                Err(e) => {
                    warn!("[patch] '{name}': {e}");
                    record.message = Some(e.to_string());
                }
            }
        }

        written
    }
}
