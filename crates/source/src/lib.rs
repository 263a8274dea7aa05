//! # Project Source Discovery
//!
//! Resolves metadata components out of a project directory on disk.
//!
//! Bundles are recognized by their parent directory: every child directory of
//! an `lwc` directory is a `LightningComponentBundle`, every child directory of
//! an `aura` directory is an `AuraDefinitionBundle`. Hidden directories and
//! `node_modules` are never entered.

use mdenrich::constants::{AURA_TYPE_NAME, LWC_CONFIG_SUFFIX, LWC_TYPE_NAME};
use mdenrich::MetadataComponent;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info};

/// Suffix of an Aura bundle's metadata XML file.
pub const AURA_CONFIG_SUFFIX: &str = ".cmp-meta.xml";

const LWC_DIR: &str = "lwc";
const AURA_DIR: &str = "aura";
const NODE_MODULES_DIR: &str = "node_modules";

#[derive(Error, Debug)]
pub enum SourceError {
    #[error("Project directory not found: {0}")]
    ProjectNotFound(PathBuf),
    #[error("Failed to read project directory: {0}")]
    Io(#[from] std::io::Error),
}

/// A bundle found on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceComponent {
    name: String,
    type_name: Option<String>,
    dir: Option<PathBuf>,
    xml_path: Option<PathBuf>,
}

impl SourceComponent {
    /// A bundle rooted at `dir`. Its XML reference is set only when the
    /// conventional `<name><suffix>` file exists.
    pub fn bundle(dir: PathBuf, type_name: &str) -> Option<Self> {
        let name = dir.file_name()?.to_string_lossy().to_string();
        let suffix = if type_name == LWC_TYPE_NAME {
            LWC_CONFIG_SUFFIX
        } else {
            AURA_CONFIG_SUFFIX
        };
        let candidate = dir.join(format!("{name}{suffix}"));
        let xml_path = candidate.is_file().then_some(candidate);
        Some(Self {
            name,
            type_name: Some(type_name.to_string()),
            dir: Some(dir),
            xml_path,
        })
    }

    /// A component that was asked for by name but does not exist in the
    /// project. It has no type, no directory and no files.
    pub fn unresolved(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            type_name: None,
            dir: None,
            xml_path: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dir(&self) -> Option<&Path> {
        self.dir.as_deref()
    }
}

impl MetadataComponent for SourceComponent {
    fn full_name(&self) -> Option<&str> {
        Some(&self.name)
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn xml_path(&self) -> Option<&Path> {
        self.xml_path.as_deref()
    }

    fn walk_content(&self) -> Vec<PathBuf> {
        let Some(dir) = &self.dir else {
            return Vec::new();
        };
        let mut files = Vec::new();
        collect_files(dir, &mut files);
        files.sort();
        files
    }
}

/// Every regular file below `dir`. Unreadable directories are logged and
/// left out.
fn collect_files(dir: &Path, files: &mut Vec<PathBuf>) {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            debug!("[walk_content] Could not read '{}': {e}", dir.display());
            return;
        }
    };
    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            collect_files(&path, files);
        } else if path.is_file() {
            files.push(path);
        }
    }
}

fn is_skipped_dir(file_name: &str) -> bool {
    file_name.starts_with('.') || file_name == NODE_MODULES_DIR
}

/// Finds every LWC and Aura bundle under `project_dir`, ordered by path.
pub fn discover_components(project_dir: &Path) -> Result<Vec<SourceComponent>, SourceError> {
    if !project_dir.is_dir() {
        return Err(SourceError::ProjectNotFound(project_dir.to_path_buf()));
    }

    let mut components = Vec::new();
    discover_recursive(project_dir, &mut components)?;
    components.sort_by(|a, b| a.dir.cmp(&b.dir));

    info!(
        "[discover_components] Found {} bundle(s) under '{}'.",
        components.len(),
        project_dir.display()
    );
    Ok(components)
}

fn discover_recursive(
    dir: &Path,
    components: &mut Vec<SourceComponent>,
) -> Result<(), SourceError> {
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let path = entry.path();
        let file_name = entry.file_name().to_string_lossy().to_string();

        if !path.is_dir() || is_skipped_dir(&file_name) {
            continue;
        }

        let bundle_type = match file_name.as_str() {
            LWC_DIR => Some(LWC_TYPE_NAME),
            AURA_DIR => Some(AURA_TYPE_NAME),
            _ => None,
        };

        match bundle_type {
            Some(type_name) => {
                for child in fs::read_dir(&path)? {
                    let child = child?;
                    let child_path = child.path();
                    let child_name = child.file_name().to_string_lossy().to_string();
                    if !child_path.is_dir() || is_skipped_dir(&child_name) {
                        continue;
                    }
                    if let Some(component) = SourceComponent::bundle(child_path, type_name) {
                        debug!(
                            "[discover_components] {type_name} '{}'",
                            component.name()
                        );
                        components.push(component);
                    }
                }
            }
            None => discover_recursive(&path, components)?,
        }
    }
    Ok(())
}

/// Splits `components` by the requested names.
///
/// Returns the components whose names were requested, in discovery order, and
/// an unresolved component for each requested name that matched nothing.
/// An empty request selects everything.
pub fn select_components(
    components: Vec<SourceComponent>,
    requested: &[String],
) -> (Vec<SourceComponent>, Vec<SourceComponent>) {
    if requested.is_empty() {
        return (components, Vec::new());
    }

    let unresolved = requested
        .iter()
        .filter(|name| !components.iter().any(|c| &c.name == *name))
        .map(SourceComponent::unresolved)
        .collect();
    let selected = components
        .into_iter()
        .filter(|c| requested.contains(&c.name))
        .collect();
    (selected, unresolved)
}
