//! # HTTP Connection Tests
//!
//! Exercises the reqwest-backed `HttpConnection` against a mock server, both
//! directly and through the `Enricher`.

use anyhow::Result;
use mdenrich::constants::{DEFAULT_ENRICHMENT_ENDPOINT, ENTITY_ENCODING_HEADER};
use mdenrich::{Connection, EnrichError, EnrichmentStatus, Enricher, HttpConnection};
use mdenrich_test_utils::{success_response, TestProject};
use serde_json::json;
use std::sync::{Arc, Once};
use std::time::Duration;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

static INIT: Once = Once::new();

/// Initializes tracing for tests.
fn setup_tracing() {
    INIT.call_once(|| {
        tracing_subscriber::fmt::init();
    });
}

const ENRICH_PATH: &str = "/services/data/v65.0/metadata-intelligence/enrich";

fn connection(server: &MockServer) -> Result<HttpConnection> {
    Ok(HttpConnection::new(
        server.uri(),
        "65.0".to_string(),
        "test-token".to_string(),
        Some(Duration::from_secs(5)),
    )?)
}

#[tokio::test]
async fn test_post_sends_headers_and_decodes_json() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .and(header("authorization", "Bearer test-token"))
        .and(header(ENTITY_ENCODING_HEADER, "false"))
        .and(body_partial_json(json!({ "maxTokens": 50 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_response(
            "card",
            "Shows a card.",
            0.95,
        )))
        .expect(1)
        .mount(&server)
        .await;

    // --- Act ---
    let response = connection(&server)?
        .post(
            DEFAULT_ENRICHMENT_ENDPOINT,
            &json!({ "contentBundles": [], "metadataType": "Lwc", "maxTokens": 50 }),
            &[(ENTITY_ENCODING_HEADER, "false")],
        )
        .await?;

    // --- Assert ---
    assert_eq!(response["results"][0]["description"], "Shows a card.");
    Ok(())
}

#[tokio::test]
async fn test_post_error_status_is_an_api_error() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .respond_with(ResponseTemplate::new(503).set_body_string("service unavailable"))
        .mount(&server)
        .await;

    // --- Act ---
    let result = connection(&server)?
        .post(DEFAULT_ENRICHMENT_ENDPOINT, &json!({}), &[])
        .await;

    // --- Assert ---
    match result {
        Err(EnrichError::Api { status, body }) => {
            assert_eq!(status, 503);
            assert_eq!(body, "service unavailable");
        }
        other => panic!("expected an API error, got {other:?}"),
    }
    Ok(())
}

#[test]
fn test_url_for_trims_trailing_slash() -> Result<()> {
    let connection = HttpConnection::new(
        "https://example.my.salesforce.com/".to_string(),
        "65.0".to_string(),
        "token".to_string(),
        None,
    )?;
    assert_eq!(
        connection.url_for("/metadata-intelligence/enrich"),
        "https://example.my.salesforce.com/services/data/v65.0/metadata-intelligence/enrich"
    );
    Ok(())
}

#[tokio::test]
async fn test_enricher_over_http_isolates_failures() -> Result<()> {
    // --- Arrange ---
    setup_tracing();
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .and(body_partial_json(
            json!({ "contentBundles": [{ "resourceName": "good" }] }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(success_response(
            "good",
            "A good component.",
            0.7,
        )))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path(ENRICH_PATH))
        .and(body_partial_json(
            json!({ "contentBundles": [{ "resourceName": "bad" }] }),
        ))
        .respond_with(ResponseTemplate::new(400).set_body_string("bad bundle"))
        .mount(&server)
        .await;

    let project = TestProject::new()?;
    let components = vec![
        project.add_standard_lwc("good", "")?,
        project.add_standard_lwc("bad", "")?,
    ];
    let enricher = Enricher::new(Arc::new(connection(&server)?));

    // --- Act ---
    let records = enricher.enrich(&components).await;

    // --- Assert ---
    assert_eq!(records[0].status, EnrichmentStatus::Success);
    assert_eq!(
        records[0].response.as_ref().unwrap().results[0].description,
        "A good component."
    );
    assert_eq!(records[1].status, EnrichmentStatus::Fail);
    assert_eq!(
        records[1].message.as_deref(),
        Some("Enrichment API returned status 400: bad bundle")
    );
    Ok(())
}
