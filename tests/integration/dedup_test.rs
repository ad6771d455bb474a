//! Request deduplication behavior across concurrent chat turns.

use std::sync::Arc;
use std::time::Duration;

use timeclerk_llm::LlmError;

use crate::support::{build_service, employee, request, RecordingQueries, ScriptedProvider};

#[tokio::test]
async fn test_concurrent_identical_turns_share_one_pipeline_run() {
    let provider = Arc::new(ScriptedProvider::with_delay(
        vec![Ok("Coalesced answer.".to_string())],
        Duration::from_millis(50),
    ));
    let queries = Arc::new(RecordingQueries::new());
    let service = Arc::new(build_service(provider.clone(), queries));

    let mut handles = Vec::new();
    for _ in 0..6 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .handle_chat(&employee("u1"), request("what is my weekly summary"))
                .await
        }));
    }

    for handle in handles {
        let resp = handle.await.unwrap().unwrap();
        assert_eq!(resp.response, "Coalesced answer.");
    }
    // The script holds one reply; a second pipeline run would have failed
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_concurrent_turns_for_different_users_do_not_coalesce() {
    let provider = Arc::new(ScriptedProvider::with_delay(
        vec![
            Ok("Answer one.".to_string()),
            Ok("Answer two.".to_string()),
        ],
        Duration::from_millis(30),
    ));
    let queries = Arc::new(RecordingQueries::new());
    let service = Arc::new(build_service(provider.clone(), queries));

    let a = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .handle_chat(&employee("u1"), request("any notifications?"))
                .await
        })
    };
    let b = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .handle_chat(&employee("u2"), request("any notifications?"))
                .await
        })
    };

    a.await.unwrap().unwrap();
    b.await.unwrap().unwrap();
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_backend_failure_reaches_every_coalesced_caller() {
    let provider = Arc::new(ScriptedProvider::with_delay(
        vec![Err(LlmError::ServerError {
            status: 503,
            message: "overloaded".to_string(),
        })],
        Duration::from_millis(50),
    ));
    let queries = Arc::new(RecordingQueries::new());
    let service = Arc::new(build_service(provider.clone(), queries));

    let mut handles = Vec::new();
    for _ in 0..4 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service
                .handle_chat(&employee("u1"), request("hello"))
                .await
        }));
    }

    for handle in handles {
        let result = handle.await.unwrap();
        let err = result.expect_err("coalesced turn should fail");
        // Every waiter gets the same user-facing apology, never the raw body
        let shown = err.to_string();
        assert!(shown.contains("try again"), "got: {shown}");
        assert!(!shown.contains("overloaded"), "raw body leaked: {shown}");
    }
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn test_failed_flight_is_not_cached() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        Err(LlmError::Network {
            message: "connection reset".to_string(),
        }),
        Ok("Recovered.".to_string()),
    ]));
    let queries = Arc::new(RecordingQueries::new());
    let service = build_service(provider.clone(), queries);
    let user = employee("u1");

    assert!(service.handle_chat(&user, request("hello")).await.is_err());

    let retry = service.handle_chat(&user, request("hello")).await.unwrap();
    assert_eq!(retry.response, "Recovered.");
    assert!(!retry.cached);
    assert_eq!(provider.calls(), 2);
}

#[tokio::test]
async fn test_caller_cancellation_does_not_kill_shared_flight() {
    let provider = Arc::new(ScriptedProvider::with_delay(
        vec![Ok("Survived.".to_string())],
        Duration::from_millis(80),
    ));
    let queries = Arc::new(RecordingQueries::new());
    let service = Arc::new(build_service(provider.clone(), queries));

    let leader = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .handle_chat(&employee("u1"), request("slow question"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;

    let follower = {
        let service = service.clone();
        tokio::spawn(async move {
            service
                .handle_chat(&employee("u1"), request("slow question"))
                .await
        })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    // First caller disconnects mid-flight
    leader.abort();

    let resp = follower.await.unwrap().unwrap();
    assert_eq!(resp.response, "Survived.");
    assert_eq!(provider.calls(), 1);
}
