use anyhow::Result;
use async_trait::async_trait;
use mdenrich::constants::LWC_TYPE_NAME;
use mdenrich::{Connection, EnrichError, MetadataComponent};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tempfile::TempDir;

// --- Mock Connection ---

/// A recorded call to [`MockConnection::post`].
#[derive(Clone, Debug)]
pub struct RecordedCall {
    pub path: String,
    pub body: Value,
    pub headers: Vec<(String, String)>,
}

impl RecordedCall {
    /// The resource name of the first content bundle in the body.
    pub fn resource_name(&self) -> Option<&str> {
        resource_name_of(&self.body)
    }
}

fn resource_name_of(body: &Value) -> Option<&str> {
    body["contentBundles"][0]["resourceName"].as_str()
}

/// A programmable `Connection`.
///
/// Responses and failures are keyed by the resource name of the request's
/// content bundle. A resource with nothing programmed gets a generated
/// successful response.
#[derive(Clone, Debug, Default)]
pub struct MockConnection {
    responses: Arc<Mutex<HashMap<String, Value>>>,
    failures: Arc<Mutex<HashMap<String, String>>>,
    calls: Arc<Mutex<Vec<RecordedCall>>>,
}

impl MockConnection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-programs the JSON response for a resource.
    pub fn add_response(&self, resource_name: &str, response: Value) {
        let mut responses = self.responses.lock().unwrap();
        responses.insert(resource_name.to_string(), response);
    }

    /// Makes the call for a resource fail with an API error carrying `body`.
    pub fn add_failure(&self, resource_name: &str, body: &str) {
        let mut failures = self.failures.lock().unwrap();
        failures.insert(resource_name.to_string(), body.to_string());
    }

    /// Retrieves the recorded calls for assertion.
    pub fn get_calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    /// The error a failing call returns, for comparing record messages.
    pub fn failure_error(body: &str) -> EnrichError {
        EnrichError::Api {
            status: 500,
            body: body.to_string(),
        }
    }
}

#[async_trait]
impl Connection for MockConnection {
    async fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, EnrichError> {
        self.calls.lock().unwrap().push(RecordedCall {
            path: path.to_string(),
            body: body.clone(),
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let name = resource_name_of(body).unwrap_or_default().to_string();
        if let Some(error_body) = self.failures.lock().unwrap().get(&name) {
            return Err(Self::failure_error(error_body));
        }
        if let Some(response) = self.responses.lock().unwrap().get(&name) {
            return Ok(response.clone());
        }
        Ok(success_response(
            &name,
            &format!("Generated description for {name}."),
            0.9,
        ))
    }
}

/// A well-formed endpoint response carrying a single result.
pub fn success_response(resource_name: &str, description: &str, score: f64) -> Value {
    json!({
        "metadata": {
            "durationMs": 120,
            "failureCount": 0,
            "successCount": 1,
            "timestamp": "2025-01-01T00:00:00Z"
        },
        "results": [{
            "resourceId": format!("id-{resource_name}"),
            "resourceName": resource_name,
            "metadataType": "Lwc",
            "modelUsed": "mock-model",
            "description": description,
            "descriptionScore": score
        }]
    })
}

// --- Mock Component ---

#[derive(Clone, Debug, Default)]
pub struct MockComponent {
    pub name: Option<String>,
    pub type_name: Option<String>,
    pub xml_path: Option<PathBuf>,
    pub files: Vec<PathBuf>,
}

impl MockComponent {
    /// An LWC bundle with the given files. The `*.js-meta.xml` among them, if
    /// any, becomes its XML reference.
    pub fn lwc(name: &str, files: Vec<PathBuf>) -> Self {
        let xml_path = files
            .iter()
            .find(|p| p.to_string_lossy().ends_with(".js-meta.xml"))
            .cloned();
        Self {
            name: Some(name.to_string()),
            type_name: Some(LWC_TYPE_NAME.to_string()),
            xml_path,
            files,
        }
    }

    pub fn of_type(name: &str, type_name: &str) -> Self {
        Self {
            name: Some(name.to_string()),
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }

    /// A component whose identity could not be resolved.
    pub fn nameless(type_name: &str) -> Self {
        Self {
            type_name: Some(type_name.to_string()),
            ..Default::default()
        }
    }
}

impl MetadataComponent for MockComponent {
    fn full_name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    fn type_name(&self) -> Option<&str> {
        self.type_name.as_deref()
    }

    fn xml_path(&self) -> Option<&Path> {
        self.xml_path.as_deref()
    }

    fn walk_content(&self) -> Vec<PathBuf> {
        self.files.clone()
    }
}

// --- On-disk Fixtures ---

/// A temporary project directory holding bundle files.
pub struct TestProject {
    pub dir: TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        Ok(Self {
            dir: tempfile::tempdir()?,
        })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Writes an LWC bundle under `lwc/<name>/` and returns it as a component.
    pub fn add_lwc(&self, name: &str, files: &[(&str, &str)]) -> Result<MockComponent> {
        let bundle_dir = self.root().join("lwc").join(name);
        std::fs::create_dir_all(&bundle_dir)?;
        let mut paths = Vec::new();
        for (filename, content) in files {
            let path = bundle_dir.join(filename);
            std::fs::write(&path, content)?;
            paths.push(path);
        }
        Ok(MockComponent::lwc(name, paths))
    }

    /// Writes a standard bundle: markup, script and a configuration file with
    /// `config_body` inside the root element.
    pub fn add_standard_lwc(&self, name: &str, config_body: &str) -> Result<MockComponent> {
        let html = format!("{name}.html");
        let js = format!("{name}.js");
        let meta = format!("{name}.js-meta.xml");
        let config = lwc_meta_xml(config_body);
        self.add_lwc(
            name,
            &[
                (html.as_str(), "<template><p>Hello</p></template>"),
                (js.as_str(), "import { LightningElement } from 'lwc';\nexport default class extends LightningElement {}"),
                (meta.as_str(), config.as_str()),
            ],
        )
    }
}

/// A `*.js-meta.xml` document with `body` inside the root element.
pub fn lwc_meta_xml(body: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<LightningComponentBundle xmlns="http://soap.sforce.com/2006/04/metadata">
    <apiVersion>62.0</apiVersion>
    <isExposed>true</isExposed>
{body}
</LightningComponentBundle>
"#
    )
}
