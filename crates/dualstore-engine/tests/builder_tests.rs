//! Router construction and routing events

mod common;

use std::sync::Arc;

use common::{Fixture, RecordingRepository, RecordingSyncer};
use dualstore_core::config::OfflineConfig;
use dualstore_core::connectivity::OfflineGlobals;
use dualstore_core::contract::{Adapter, Repository};
use dualstore_core::core_types::schema::{EVENT_END_ERROR, EVENT_ROUTED};
use dualstore_core::errors::ExErrorKind;
use dualstore_core::logging_facility::test_capture::init_test_capture;
use dualstore_core::model::Options;
use dualstore_core::routing::LookupPolicy;
use dualstore_engine::RouterBuilder;
use dualstore_store::MemoryAdapter;

fn complete() -> RouterBuilder {
    RouterBuilder::new()
        .local(RecordingRepository::new("local"))
        .syncer(RecordingSyncer::new())
        .connectivity(Arc::new(OfflineGlobals::default()))
}

#[test]
fn test_missing_local_repository_fails() {
    let err = RouterBuilder::new()
        .syncer(RecordingSyncer::new())
        .connectivity(Arc::new(OfflineGlobals::default()))
        .build()
        .err()
        .unwrap();

    assert_eq!(err.kind(), ExErrorKind::MissingCollaborator);
    assert_eq!(err.op(), Some("router_build"));
    assert!(err.message().contains("local repository"));
}

#[test]
fn test_missing_syncer_fails() {
    let err = RouterBuilder::new()
        .local(RecordingRepository::new("local"))
        .connectivity(Arc::new(OfflineGlobals::default()))
        .build()
        .err()
        .unwrap();

    assert_eq!(err.kind(), ExErrorKind::MissingCollaborator);
    assert!(err.message().contains("syncer"));
}

#[test]
fn test_missing_connectivity_fails() {
    let err = RouterBuilder::new()
        .local(RecordingRepository::new("local"))
        .syncer(RecordingSyncer::new())
        .build()
        .err()
        .unwrap();

    assert_eq!(err.kind(), ExErrorKind::MissingCollaborator);
    assert!(err.message().contains("connectivity provider"));
}

#[test]
fn test_build_failure_is_logged() {
    let capture = init_test_capture();

    let _ = RouterBuilder::new().build();

    let failures = capture.count_events(|e| {
        e.op.as_deref() == Some("router_build")
            && e.event.as_deref() == Some(EVENT_END_ERROR)
            && e.field("err_kind") == Some("MissingCollaborator")
    });
    assert!(failures >= 1);
}

#[test]
fn test_default_remote_without_adapter_has_no_models() {
    let router = complete().build().unwrap();

    let err = router.remote().adapter_for("post", None).err().unwrap();

    assert_eq!(err.kind(), ExErrorKind::UnknownModel);
}

#[test]
fn test_default_remote_uses_supplied_adapter() {
    let adapter = Arc::new(MemoryAdapter::new());
    let router = complete().remote_adapter(adapter.clone()).build().unwrap();

    let resolved = router.remote().adapter_for("comment", None).unwrap();

    let expected: Arc<dyn Adapter> = adapter;
    assert!(Arc::ptr_eq(&resolved, &expected));
}

#[test]
fn test_explicit_remote_wins_over_remote_adapter() {
    let remote = RecordingRepository::new("remote");
    let router = complete()
        .remote(remote.clone())
        .remote_adapter(Arc::new(MemoryAdapter::new()))
        .build()
        .unwrap();

    let resolved = router.remote().adapter_for("post", None).unwrap();

    let expected: Arc<dyn Adapter> = remote.adapter.clone();
    assert!(Arc::ptr_eq(&resolved, &expected));
}

#[test]
fn test_config_seeds_connectivity_and_lookup_policy() {
    let config = OfflineConfig::from_toml_str(
        "offline_enabled = false\nstart_online = false\nsymmetric_lookup_override = true\n",
    )
    .unwrap();

    let router = complete().config(&config).build().unwrap();

    assert!(!router.connectivity().is_offline_enabled());
    assert!(!router.connectivity().is_online());
    assert_eq!(router.lookup_policy(), LookupPolicy::Symmetric);
}

#[test]
fn test_default_lookup_policy_is_remote_override_only() {
    let router = complete().build().unwrap();
    assert_eq!(router.lookup_policy(), LookupPolicy::RemoteOverrideOnly);
}

#[tokio::test]
async fn test_dispatch_emits_routed_event() {
    let capture = init_test_capture();
    let fixture = Fixture::new(false, true);

    fixture.router.get_reference("post", "1", Some(true)).await.unwrap();
    fixture.router.get_reference("post", "1", None).await.unwrap();

    let routed: Vec<_> = capture
        .events_for_op("get_reference")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_ROUTED))
        .collect();
    assert_eq!(routed.len(), 2);
    assert_eq!(routed[0].route.as_deref(), Some("remote"));
    assert_eq!(routed[1].route.as_deref(), Some("local"));
    assert_eq!(routed[0].field("decorated"), Some("false"));
    assert_ne!(routed[0].field("request_id"), routed[1].field("request_id"));
}

#[tokio::test]
async fn test_decorated_dispatch_is_marked() {
    let capture = init_test_capture();
    let fixture = Fixture::new(true, true);

    fixture.router.query_record("post", Options::new()).await.unwrap();

    let routed: Vec<_> = capture
        .events_for_op("query_record")
        .into_iter()
        .filter(|e| e.event.as_deref() == Some(EVENT_ROUTED))
        .collect();
    assert_eq!(routed.len(), 1);
    assert_eq!(routed[0].field("decorated"), Some("true"));
    assert_eq!(routed[0].field("shape"), Some("single"));
}
