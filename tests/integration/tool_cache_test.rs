//! Tool result caching across turns with different phrasings.

use std::sync::Arc;

use crate::support::{
    build_service, employee, request, tool_call_reply, RecordingQueries, ScriptedProvider,
};

#[tokio::test]
async fn test_rephrased_question_reuses_tool_result() {
    // Two phrasings miss the response cache but resolve to the same
    // (tool, user, params) key, so the data layer is hit once
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_call_reply("getLoggedHours", r#"{"period": "week"}"#),
        Ok("You logged 38.5 hours.".to_string()),
        tool_call_reply("getLoggedHours", r#"{"period": "week"}"#),
        Ok("38.5 hours so far this week.".to_string()),
    ]));
    let queries = Arc::new(RecordingQueries::new());
    let service = build_service(provider.clone(), queries.clone());
    let user = employee("u1");

    let first = service
        .handle_chat(&user, request("how many hours did I log this week?"))
        .await
        .unwrap();
    let second = service
        .handle_chat(&user, request("total hours for this week please"))
        .await
        .unwrap();

    assert!(!first.cached);
    assert!(!second.cached);
    assert_eq!(provider.calls(), 4);
    assert_eq!(queries.calls(), 1);

    let stats = service.tool_cache_stats();
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
}

#[tokio::test]
async fn test_parameter_order_does_not_split_the_cache() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_call_reply("getProjectHours", r#"{"name": "Apollo", "period": "month"}"#),
        Ok("Apollo has 120 hours this month.".to_string()),
        tool_call_reply("getProjectHours", r#"{"period": "month", "name": "Apollo"}"#),
        Ok("120 hours were booked to Apollo.".to_string()),
    ]));
    let queries = Arc::new(RecordingQueries::new());
    let service = build_service(provider, queries.clone());
    let user = crate::support::manager("m1");

    service
        .handle_chat(&user, request("hours on Apollo this month?"))
        .await
        .unwrap();
    service
        .handle_chat(&user, request("how much time went into Apollo in the last month"))
        .await
        .unwrap();

    assert_eq!(queries.calls(), 1);
}

#[tokio::test]
async fn test_tool_cache_isolates_users() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_call_reply("getLeaveBalance", "{}"),
        Ok("12 days.".to_string()),
        tool_call_reply("getLeaveBalance", "{}"),
        Ok("12 days.".to_string()),
    ]));
    let queries = Arc::new(RecordingQueries::new());
    let service = build_service(provider, queries.clone());

    service
        .handle_chat(&employee("u1"), request("leave balance?"))
        .await
        .unwrap();
    service
        .handle_chat(&employee("u2"), request("leave balance?"))
        .await
        .unwrap();

    // Same tool and params, different users: two data-layer hits
    assert_eq!(queries.calls(), 2);
}

#[tokio::test]
async fn test_failed_query_is_retried_next_turn() {
    let provider = Arc::new(ScriptedProvider::new(vec![
        tool_call_reply("getTaskList", "{}"),
        Ok("I couldn't fetch your tasks just now.".to_string()),
        tool_call_reply("getTaskList", "{}"),
        Ok("Still unavailable, sorry.".to_string()),
    ]));
    let queries = Arc::new(RecordingQueries::failing());
    let service = build_service(provider, queries.clone());
    let user = employee("u1");

    let first = service
        .handle_chat(&user, request("show my tasks"))
        .await
        .unwrap();
    assert!(first.response.contains("couldn't fetch"));

    // Error outcomes are never cached: a rephrased turn queries again
    service
        .handle_chat(&user, request("list my open tasks"))
        .await
        .unwrap();
    assert_eq!(queries.calls(), 2);
    assert_eq!(service.tool_cache_stats().live_entries, 0);
}
