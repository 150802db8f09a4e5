//! Concurrency and cleanup through the real bridge.

use std::collections::HashSet;
use std::sync::atomic::Ordering;
use std::time::Duration;

use futures::future::join_all;
use kg_01_bridge::test_utils::LoaderBehavior;
use kg_01_bridge::{CallParams, Operation};
use serde_json::json;

use super::fixtures::Stack;

#[tokio::test]
async fn test_concurrent_calls_get_their_own_payloads() {
    let stack = Stack::new(vec![LoaderBehavior::EchoCallback]);

    let calls = (0..16).map(|_| stack.api.invoke(Operation::Test, CallParams::new()));
    let replies = join_all(calls).await;

    let callbacks: HashSet<String> = replies
        .into_iter()
        .map(|reply| reply.unwrap().str_field("callback").unwrap().to_string())
        .collect();

    assert_eq!(callbacks.len(), 16);
    assert_eq!(stack.bridge.registry().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_slow_and_fast_calls_interleave() {
    let stack = Stack::new(vec![
        LoaderBehavior::RespondAfter {
            delay: Duration::from_secs(5),
            payload: json!({"success": true, "which": "slow"}),
        },
        LoaderBehavior::respond(json!({"success": true, "which": "fast"})),
    ]);

    let slow = stack.api.invoke(Operation::GetKeys, CallParams::new());
    let fast = async {
        tokio::time::sleep(Duration::from_millis(10)).await;
        stack.api.invoke(Operation::Test, CallParams::new()).await
    };
    let (slow, fast) = tokio::join!(slow, fast);

    assert_eq!(slow.unwrap().str_field("which"), Some("slow"));
    assert_eq!(fast.unwrap().str_field("which"), Some("fast"));
    assert_eq!(stack.bridge.registry().pending_count(), 0);
}

#[tokio::test(start_paused = true)]
async fn test_abandoned_call_releases_handler() {
    let stack = Stack::new(vec![LoaderBehavior::Hang]);

    let call = stack.api.invoke(Operation::GetKeys, CallParams::new());
    let outcome = tokio::time::timeout(Duration::from_secs(1), call).await;

    assert!(outcome.is_err());
    assert_eq!(stack.bridge.registry().pending_count(), 0);
    assert_eq!(
        stack
            .bridge
            .registry()
            .stats()
            .total_registered
            .load(Ordering::Relaxed),
        1
    );
}
