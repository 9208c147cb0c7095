//! Wire-level tests against a mock FCM endpoint
//!
//! The client under test is blocking, so every call runs on a
//! `spawn_blocking` thread under the tokio test runtime.

use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use fcm_notify::{FcmClient, FcmError, FcmMessage, SendOutcome, Target};

async fn on_blocking<T, F>(work: F) -> T
where
    F: FnOnce() -> T + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(work)
        .await
        .expect("blocking task panicked")
}

#[tokio::test]
async fn send_to_pairs_the_single_result_with_the_token() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fcm/send"))
        .and(header("authorization", "key=test-key"))
        .and(header("content-type", "application/json"))
        .and(body_partial_json(json!({
            "to": "token123",
            "notification": {"title": "hi"},
            "data": {"k": "v"}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "multicast_id": 1,
            "success": 1,
            "failure": 0,
            "canonical_ids": 0,
            "results": [{"message_id": "abc"}]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = format!("{}/fcm/send", server.uri());
    let outcome = on_blocking(move || {
        let client = FcmClient::with_endpoint("test-key", &endpoint).unwrap();
        client.send_to(
            "token123",
            Some(&json!({"title": "hi"})),
            Some(&json!({"k": "v"})),
        )
    })
    .await
    .unwrap();

    assert_eq!(outcome.status(), 200);
    let response = outcome.response().expect("expected a delivered outcome");
    assert_eq!(response.success, Some(1));
    assert_eq!(response.failure, Some(0));
    assert_eq!(response.results.len(), 1);
    assert_eq!(response.results[0].0, "token123");
    assert_eq!(response.results[0].1.message_id.as_deref(), Some("abc"));
}

#[tokio::test]
async fn send_chunks_at_the_api_maximum() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1000,
            "failure": 0
        })))
        .expect(3)
        .mount(&server)
        .await;

    let tokens: Vec<String> = (0..2500).map(|i| format!("tok-{i}")).collect();
    let expected = tokens.clone();
    let endpoint = server.uri();
    let outcomes = on_blocking(move || {
        let client = FcmClient::with_endpoint("k", &endpoint).unwrap();
        client.send(&tokens, None, None)
    })
    .await
    .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert!(outcomes.iter().all(SendOutcome::is_delivered));

    // Each request carries a contiguous, order-preserving slice of at most
    // 1000 ids, and the slices concatenate back to the original list.
    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 3);

    let mut rejoined = Vec::new();
    for request in &requests {
        let body: serde_json::Value = serde_json::from_slice(&request.body).unwrap();
        let ids: Vec<String> = body["registration_ids"]
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_str().unwrap().to_string())
            .collect();
        assert!(ids.len() <= 1000);
        rejoined.extend(ids);
    }
    assert_eq!(rejoined, expected);
}

#[tokio::test]
async fn batch_results_pair_positionally_over_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": 1,
            "failure": 1,
            "results": [
                {"message_id": "m1"},
                {"error": "NotRegistered"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = vec!["t1".to_string(), "t2".to_string()];
    let endpoint = server.uri();
    let outcomes = on_blocking(move || {
        let client = FcmClient::with_endpoint("k", &endpoint).unwrap();
        client.send(&tokens, None, None)
    })
    .await
    .unwrap();

    let response = outcomes[0].response().unwrap();
    assert_eq!(response.results[0].0, "t1");
    assert_eq!(response.results[0].1.message_id.as_deref(), Some("m1"));
    assert_eq!(response.results[1].0, "t2");
    assert_eq!(response.results[1].1.error.as_deref(), Some("NotRegistered"));
}

#[tokio::test]
async fn rejected_status_surfaces_the_raw_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = server.uri();
    let outcome = on_blocking(move || {
        let client = FcmClient::with_endpoint("bad-key", &endpoint).unwrap();
        client.send_to("token", None, None)
    })
    .await
    .unwrap();

    assert_eq!(outcome.status(), 401);
    assert!(!outcome.is_delivered());
    match outcome {
        SendOutcome::Rejected { status, body } => {
            assert_eq!(status, 401);
            assert_eq!(body, "Unauthorized");
        }
        other => panic!("expected Rejected, got {other:?}"),
    }
}

#[tokio::test]
async fn malformed_json_on_a_200_is_a_parse_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json at all"))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = server.uri();
    let result = on_blocking(move || {
        let client = FcmClient::with_endpoint("k", &endpoint).unwrap();
        client.send_to("token", None, None)
    })
    .await;

    assert!(matches!(result, Err(FcmError::ResponseParse { .. })));
}

#[tokio::test]
async fn condition_passes_through_on_the_wire() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "to": "token",
            "condition": "'dogs' in topics"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": 1})))
        .expect(1)
        .mount(&server)
        .await;

    let endpoint = server.uri();
    let outcome = on_blocking(move || {
        let client = FcmClient::with_endpoint("k", &endpoint).unwrap();
        let message = FcmMessage::new(Target::Single("token".to_string()), None, None)?
            .with_condition("'dogs' in topics");
        client.send_message(&message)
    })
    .await
    .unwrap();

    // No condition-result pairing scheme exists; the reply carried no
    // results, so pairs stay empty.
    assert!(outcome.response().unwrap().results.is_empty());
}

#[test]
fn transport_failure_propagates_as_an_http_error() {
    // Nothing listens on this port; the connect fails before any reply.
    let client = FcmClient::with_endpoint("k", "http://127.0.0.1:9/").unwrap();
    let result = client.send_to("token", None, None);
    assert!(matches!(result, Err(FcmError::Http { .. })));
}
