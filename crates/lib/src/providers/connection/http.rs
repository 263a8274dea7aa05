use crate::{errors::EnrichError, providers::connection::Connection};
use async_trait::async_trait;
use reqwest::Client as ReqwestClient;
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// A `Connection` backed by `reqwest`, authenticated with a bearer token.
#[derive(Clone)]
pub struct HttpConnection {
    client: ReqwestClient,
    instance_url: String,
    api_version: String,
    access_token: String,
}

impl fmt::Debug for HttpConnection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HttpConnection")
            .field("instance_url", &self.instance_url)
            .field("api_version", &self.api_version)
            .finish_non_exhaustive()
    }
}

impl HttpConnection {
    /// Creates a new `HttpConnection`.
    ///
    /// A `timeout` bounds each request; an expired request surfaces as an
    /// ordinary request error.
    pub fn new(
        instance_url: String,
        api_version: String,
        access_token: String,
        timeout: Option<Duration>,
    ) -> Result<Self, EnrichError> {
        let mut builder = ReqwestClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(EnrichError::ReqwestClientBuild)?;
        Ok(Self {
            client,
            instance_url: instance_url.trim_end_matches('/').to_string(),
            api_version,
            access_token,
        })
    }

    /// The absolute URL for a path relative to the versioned REST root.
    pub fn url_for(&self, path: &str) -> String {
        format!(
            "{}/services/data/v{}{}",
            self.instance_url, self.api_version, path
        )
    }
}

#[async_trait]
impl Connection for HttpConnection {
    async fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, EnrichError> {
        let url = self.url_for(path);
        debug!("--> POST {url}");

        let mut request_builder = self
            .client
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(body);
        for (name, value) in headers {
            request_builder = request_builder.header(*name, *value);
        }

        let response = request_builder.send().await.map_err(EnrichError::Request)?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(EnrichError::Api {
                status: status.as_u16(),
                body: error_text,
            });
        }

        let text = response.text().await.map_err(EnrichError::Request)?;
        debug!("<-- {} bytes from {url}", text.len());
        Ok(serde_json::from_str(&text)?)
    }
}
