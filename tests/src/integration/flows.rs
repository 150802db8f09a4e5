//! Key administration sessions over the script transport.

use std::time::Duration;

use kg_01_bridge::test_utils::LoaderBehavior;
use kg_01_bridge::ApiError;
use kg_02_key_admin::{KeyAdminError, KeySource, NewKey, UpdateKey};
use serde_json::json;
use shared_types::KeyStatus;
use tokio::time::Instant;

use super::fixtures::{ok, sheet, Stack, SECRET};

#[tokio::test]
async fn test_online_session() {
    let mut stack = Stack::new(vec![
        ok(),
        LoaderBehavior::respond(sheet()),
        ok(),
        LoaderBehavior::respond(json!({"success": true, "expire_date": "2031-01-01"})),
        LoaderBehavior::respond(json!({"success": true, "expire_date": "2032-01-01"})),
        ok(),
    ]);

    assert_eq!(stack.service.initialize().await, KeySource::Remote);
    assert_eq!(stack.service.keys().len(), 2);

    stack.service.ban_key("ALPHA-001").await.unwrap();
    let record = stack
        .service
        .add_key(NewKey::new("GAMMA-003", 365, "new customer"))
        .await
        .unwrap();
    assert_eq!(record.expire_date, "2031-01-01");

    let record = stack
        .service
        .update_key(UpdateKey::new("GAMMA-003", 730, "renewed"))
        .await
        .unwrap();
    assert_eq!(record.expire_date, "2032-01-01");

    stack.service.delete_key("BETA-002").await.unwrap();

    let keys = stack.service.keys();
    assert_eq!(keys.len(), 2);
    assert_eq!(keys[0].status, KeyStatus::Banned);
    assert_eq!(keys[1].notes, "renewed");

    // One load per call, every handler released
    assert_eq!(stack.loader.calls(), 6);
    assert_eq!(stack.bridge.registry().pending_count(), 0);

    let src = stack.loader.last_src().unwrap();
    assert!(src.path().ends_with("/exec/deletekey"));
    let pairs: Vec<(String, String)> = src.query_pairs().into_owned().collect();
    assert!(pairs.contains(&("secret".into(), SECRET.into())));
    assert!(pairs.contains(&("key".into(), "BETA-002".into())));
    assert!(pairs.iter().any(|(k, v)| k == "callback" && v.starts_with("kgcb_")));

    // Never went offline
    assert!(stack.transitions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_offline_startup_uses_demo_data() {
    let mut stack = Stack::new(vec![LoaderBehavior::fail("net::ERR_NAME_NOT_RESOLVED")]);

    assert_eq!(stack.service.initialize().await, KeySource::Demo);
    // The probe is not retried and no key fetch follows
    assert_eq!(stack.loader.calls(), 1);
    assert_eq!(stack.service.keys().len(), 3);
    assert!(!stack.service.connectivity().online);
    assert_eq!(stack.transitions(), vec!["OFFLINE"]);
}

#[tokio::test(start_paused = true)]
async fn test_timeout_then_recovery() {
    let mut stack = Stack::new(vec![LoaderBehavior::Hang, LoaderBehavior::respond(sheet())]);

    let started = Instant::now();
    assert_eq!(stack.service.load_keys().await, KeySource::Remote);
    let elapsed = started.elapsed();

    // 15s timeout, then 1s backoff
    assert!(elapsed >= Duration::from_secs(16), "elapsed {:?}", elapsed);
    assert!(elapsed < Duration::from_secs(17), "elapsed {:?}", elapsed);
    assert_eq!(stack.loader.calls(), 2);
    assert_eq!(stack.bridge.registry().pending_count(), 0);
    assert!(stack.transitions().is_empty());
}

#[tokio::test(start_paused = true)]
async fn test_malformed_responses_exhaust_retries() {
    let stack = Stack::new(vec![LoaderBehavior::RawBody("<html>Sign in</html>".into())]);

    assert_eq!(stack.service.load_keys().await, KeySource::Demo);
    assert_eq!(stack.loader.calls(), 3);
    assert!(stack.service.keys().iter().any(|k| k.key == "BANNED-KEY-002"));
}

#[tokio::test]
async fn test_rejection_is_final() {
    let stack = Stack::new(vec![
        LoaderBehavior::respond(sheet()),
        LoaderBehavior::respond(json!({"success": false, "message": "Invalid secret"})),
    ]);
    stack.service.load_keys().await;

    let err = stack.service.ban_key("ALPHA-001").await.unwrap_err();
    assert_eq!(
        err,
        KeyAdminError::Api(ApiError::application("Invalid secret"))
    );
    assert_eq!(stack.loader.calls(), 2);
    assert_eq!(stack.service.keys()[0].status, KeyStatus::Active);
    assert!(stack.service.connectivity().online);
}

#[tokio::test(start_paused = true)]
async fn test_lost_and_restored_network() {
    let mut stack = Stack::new(vec![
        LoaderBehavior::respond(sheet()),
        LoaderBehavior::fail("net::ERR_INTERNET_DISCONNECTED"),
    ]);
    stack.service.load_keys().await;

    let err = stack.service.delete_key("ALPHA-001").await.unwrap_err();
    assert!(err.is_connectivity());
    assert_eq!(stack.service.keys().len(), 2);

    stack.service.set_network_available(true);
    assert!(stack.service.connectivity().online);
    assert_eq!(stack.transitions(), vec!["OFFLINE", "ONLINE"]);
}

#[tokio::test]
async fn test_error_after_payload_keeps_payload() {
    let stack = Stack::new(vec![LoaderBehavior::RespondThenFail {
        payload: sheet(),
        error: "script error".into(),
    }]);

    assert_eq!(stack.service.load_keys().await, KeySource::Remote);
    assert_eq!(stack.loader.calls(), 1);
}
