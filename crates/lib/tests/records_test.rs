//! # Record Store Tests
//!
//! Status transitions of the enrichment record set.

use mdenrich::constants::{
    AURA_TYPE_NAME, LWC_TYPE_NAME, MSG_CONFIG_MISSING, MSG_INELIGIBLE_TYPE, MSG_NOT_FOUND,
    MSG_OPT_OUT, MSG_UNKNOWN_SKIP,
};
use mdenrich::{
    EnrichMetadataResult, EnrichmentRecords, EnrichmentRequestBody, EnrichmentRequestRecord,
    EnrichmentStatus,
};
use mdenrich_test_utils::MockComponent;
use std::path::PathBuf;

fn lwc(name: &str) -> MockComponent {
    MockComponent::lwc(name, vec![PathBuf::from(format!("{name}/{name}.js-meta.xml"))])
}

fn outcome(name: &str, response: Option<EnrichMetadataResult>) -> EnrichmentRequestRecord {
    let mut record =
        EnrichmentRequestRecord::pending(name, None, EnrichmentRequestBody::default());
    record.response = response;
    record.message = Some(format!("outcome for {name}"));
    record
}

#[test]
fn test_initialize_requires_name_and_type() {
    let components = vec![
        lwc("a"),
        MockComponent::nameless(LWC_TYPE_NAME),
        MockComponent {
            name: Some("typeless".to_string()),
            ..Default::default()
        },
        MockComponent::of_type("b", AURA_TYPE_NAME),
    ];

    let mut records = EnrichmentRecords::new();
    records.initialize(&components);

    assert_eq!(records.len(), 2);
    let a = records.get("a").unwrap();
    assert_eq!(a.status, EnrichmentStatus::NotProcessed);
    assert_eq!(a.request_body, Some(EnrichmentRequestBody::default()));
    assert!(a.response.is_none());
    assert!(a.message.is_none());
    assert_eq!(
        records.get("b").unwrap().component_type.as_deref(),
        Some(AURA_TYPE_NAME)
    );
}

#[test]
fn test_mark_skipped_is_first_write_wins() {
    let mut records = EnrichmentRecords::new();
    records.initialize(&[lwc("a")]);

    records.mark_skipped(&[lwc("a"), lwc("b")]);
    records.mark_skipped(&[lwc("b")]);

    assert_eq!(records.len(), 2);
    assert_eq!(
        records.get("a").unwrap().status,
        EnrichmentStatus::NotProcessed
    );
    assert_eq!(records.get("b").unwrap().status, EnrichmentStatus::Skipped);
}

#[test]
fn test_apply_status_overwrites_any_state() {
    let mut records = EnrichmentRecords::new();
    records.initialize(&[lwc("a"), lwc("b")]);
    records.mark_skipped(&[lwc("c")]);

    records.apply_status(&[lwc("a"), lwc("c")], EnrichmentStatus::Fail);

    assert_eq!(records.get("a").unwrap().status, EnrichmentStatus::Fail);
    assert_eq!(
        records.get("b").unwrap().status,
        EnrichmentStatus::NotProcessed
    );
    assert_eq!(records.get("c").unwrap().status, EnrichmentStatus::Fail);
}

#[test]
fn test_merge_results_follows_response_but_keeps_skipped() {
    let mut records = EnrichmentRecords::new();
    records.initialize(&[lwc("ok"), lwc("bad"), lwc("skip")]);
    records.apply_status(&[lwc("skip")], EnrichmentStatus::Skipped);

    records.merge_results(vec![
        outcome("ok", Some(EnrichMetadataResult::default())),
        outcome("bad", None),
        outcome("skip", Some(EnrichMetadataResult::default())),
        outcome("stranger", Some(EnrichMetadataResult::default())),
    ]);

    let ok = records.get("ok").unwrap();
    assert_eq!(ok.status, EnrichmentStatus::Success);
    assert_eq!(ok.message.as_deref(), Some("outcome for ok"));
    assert_eq!(records.get("bad").unwrap().status, EnrichmentStatus::Fail);
    let skip = records.get("skip").unwrap();
    assert_eq!(skip.status, EnrichmentStatus::Skipped);
    assert!(skip.response.is_some());
    assert!(records.get("stranger").is_none());
    assert_eq!(records.len(), 3);
}

#[test]
fn test_explain_skips_most_specific_reason_wins() {
    let sources = vec![
        MockComponent::of_type("aura", AURA_TYPE_NAME),
        MockComponent::of_type("noConfig", LWC_TYPE_NAME),
        lwc("mystery"),
    ];
    let mut records = EnrichmentRecords::new();
    records.mark_skipped(&[
        MockComponent::of_type("missing", LWC_TYPE_NAME),
        MockComponent::of_type("aura", AURA_TYPE_NAME),
        MockComponent::of_type("noConfig", LWC_TYPE_NAME),
        lwc("mystery"),
        lwc("notAsked"),
    ]);

    records.explain_skips(&["missing", "aura", "noConfig", "mystery"], &sources);

    let message = |name: &str| records.get(name).unwrap().message.clone();
    assert_eq!(message("missing").as_deref(), Some(MSG_NOT_FOUND));
    assert_eq!(message("aura").as_deref(), Some(MSG_INELIGIBLE_TYPE));
    assert_eq!(message("noConfig").as_deref(), Some(MSG_CONFIG_MISSING));
    assert_eq!(message("mystery").as_deref(), Some(MSG_UNKNOWN_SKIP));
    assert_eq!(message("notAsked"), None);
}

#[test]
fn test_explain_skips_keeps_existing_messages_and_other_states() {
    let mut records = EnrichmentRecords::from(vec![
        EnrichmentRequestRecord::skipped("explained", None, Some("already".to_string())),
        EnrichmentRequestRecord::pending("pending", None, EnrichmentRequestBody::default()),
    ]);

    records.explain_skips::<MockComponent>(&["explained", "pending"], &[]);

    assert_eq!(
        records.get("explained").unwrap().message.as_deref(),
        Some("already")
    );
    assert!(records.get("pending").unwrap().message.is_none());
}

#[test]
fn test_opt_out_requires_a_response() {
    let mut without = EnrichmentRequestRecord::pending("a", None, EnrichmentRequestBody::default());
    let mut with = without.clone();
    with.succeed(EnrichMetadataResult::default());

    assert!(!without.opt_out());
    assert!(with.opt_out());

    assert_eq!(without.status, EnrichmentStatus::NotProcessed);
    assert_eq!(with.status, EnrichmentStatus::Skipped);
    assert_eq!(with.message.as_deref(), Some(MSG_OPT_OUT));
    assert!(with.response.is_some());
}
