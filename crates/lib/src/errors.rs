use thiserror::Error;

/// Custom error types for the enrichment library.
///
/// None of these abort an enrichment run: the orchestrator and the patcher
/// turn them into a message on the affected component's record.
#[derive(Error, Debug)]
pub enum EnrichError {
    #[error("Failed to build Reqwest client: {0}")]
    ReqwestClientBuild(reqwest::Error),
    #[error("Failed to send request to the enrichment API: {0}")]
    Request(reqwest::Error),
    #[error("Enrichment API returned status {status}: {body}")]
    Api { status: u16, body: String },
    #[error("Failed to deserialize enrichment response: {0}")]
    Deserialization(#[from] serde_json::Error),
    #[error("Failed to parse component configuration: {0}")]
    MarkupParse(#[from] xmltree::ParseError),
    #[error("Failed to serialize component configuration: {0}")]
    MarkupWrite(#[from] xmltree::Error),
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),
}
