pub mod http;

use crate::errors::EnrichError;
use async_trait::async_trait;
use dyn_clone::DynClone;
pub use http::HttpConnection;
use serde_json::Value;
use std::fmt::Debug;

/// A trait for sending requests to the org hosting the enrichment endpoint.
///
/// The orchestrator only ever POSTs, so that is the whole contract. A rejected
/// call is reported as an `Err` and recorded against the one component it was
/// made for.
#[async_trait]
pub trait Connection: Send + Sync + Debug + DynClone {
    /// POSTs a JSON body to `path` and returns the decoded JSON response.
    ///
    /// `path` is relative to the versioned REST root of the connection.
    async fn post(
        &self,
        path: &str,
        body: &Value,
        headers: &[(&str, &str)],
    ) -> Result<Value, EnrichError>;
}

dyn_clone::clone_trait_object!(Connection);
