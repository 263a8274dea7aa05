//! # File Content Reader
//!
//! Reads the files of a component as text. A file that cannot be read simply
//! contributes nothing: the reader never reports an error to its caller.

use crate::component::MetadataComponent;
use async_trait::async_trait;
use futures::future::join_all;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Mime type for extensions missing from the table.
pub const OCTET_STREAM: &str = "application/octet-stream";

/// One successfully read component file.
#[derive(Debug, Clone, PartialEq)]
pub struct FileContentResult {
    pub component_name: String,
    pub path: PathBuf,
    pub filename: String,
    pub mime_type: String,
    pub content: String,
}

/// Classifies a path by its extension, case-insensitively.
pub fn mime_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("js") => "application/javascript",
        Some("html") => "text/html",
        Some("css") => "text/css",
        Some("xml") => "application/xml",
        Some("svg") => "image/svg+xml",
        Some("json") => "application/json",
        Some("txt") => "text/plain",
        _ => OCTET_STREAM,
    }
}

/// A source of component file contents.
#[async_trait]
pub trait ContentReader: Send + Sync {
    /// Reads a single file. `None` means "not found or unreadable".
    async fn read_one(&self, component_name: &str, path: &Path) -> Option<FileContentResult>;

    /// Reads every content file of `component` concurrently, keeping the
    /// component's enumeration order and dropping the files that could not be
    /// read. Components without a name have no files.
    async fn read_many(&self, component: &dyn MetadataComponent) -> Vec<FileContentResult> {
        let Some(name) = component.full_name() else {
            return Vec::new();
        };
        let paths = component.walk_content();
        let reads = paths.iter().map(|path| self.read_one(name, path));
        join_all(reads).await.into_iter().flatten().collect()
    }
}

/// Reads files straight from the local filesystem.
#[derive(Debug, Clone, Copy, Default)]
pub struct FileContentReader;

impl FileContentReader {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ContentReader for FileContentReader {
    async fn read_one(&self, component_name: &str, path: &Path) -> Option<FileContentResult> {
        match tokio::fs::read_to_string(path).await {
            Ok(content) => Some(FileContentResult {
                component_name: component_name.to_string(),
                path: path.to_path_buf(),
                filename: path
                    .file_name()
                    .map(|name| name.to_string_lossy().into_owned())
                    .unwrap_or_default(),
                mime_type: mime_type_for(path).to_string(),
                content,
            }),
            Err(e) => {
                debug!(
                    "[read_one] '{}' for '{component_name}' contributes nothing: {e}",
                    path.display()
                );
                None
            }
        }
    }
}
