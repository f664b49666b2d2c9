//! Integration tests for rate-limit throttling and 429 recovery

use std::time::{Duration, Instant};

use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

use yunite_api::{ApiError, RequestOptions};
use yunite_core::domain::GuildId;

use crate::common::{client_for, guild, rate_limited, setup_yunite_mock};

#[tokio::test]
async fn test_retries_429_after_reset_window() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(rate_limited(429, "0.5", 0))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    let start = Instant::now();
    let token = client.get_ws_token().await.unwrap();
    let elapsed = start.elapsed();

    assert_eq!(token["token"], "ws");
    assert!(elapsed >= Duration::from_millis(500), "retried after {elapsed:?}");
    assert!(elapsed < Duration::from_millis(1500), "waited too long: {elapsed:?}");
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_repeated_429_keeps_retrying() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(rate_limited(429, "0.2", 0))
        .up_to_n_times(3)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    let start = Instant::now();
    client.get_ws_token().await.unwrap();

    assert!(start.elapsed() >= Duration::from_millis(600));
    assert_eq!(server.received_requests().await.unwrap().len(), 4);
}

#[tokio::test]
async fn test_429_without_reset_header_uses_retry_after() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "1"))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    let start = Instant::now();
    client.get_ws_token().await.unwrap();
    assert!(start.elapsed() >= Duration::from_secs(1));
}

#[tokio::test]
async fn test_oversized_retry_after_uses_default_delay() {
    let server = wiremock::MockServer::start().await;
    let client = client_for(&server, |b| b.default_retry_after_secs(0));

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(
            ResponseTemplate::new(429).insert_header("retry-after", "18446744073709551615"),
        )
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    let start = Instant::now();
    let token = client.get_ws_token().await.unwrap();

    assert_eq!(token["token"], "ws");
    assert!(start.elapsed() < Duration::from_secs(2));
    assert_eq!(server.received_requests().await.unwrap().len(), 2);
}

#[tokio::test]
async fn test_429_replays_identical_post_body() {
    let (server, client) = setup_yunite_mock().await;
    let body = json!({"type": "DISCORD", "userIds": ["111", "222"]});

    Mock::given(method("POST"))
        .and(path("/guild/123456789/registration/links"))
        .and(body_json(&body))
        .respond_with(rate_limited(429, "0.1", 0))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/guild/123456789/registration/links"))
        .and(body_json(&body))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"users": []})))
        .mount(&server)
        .await;

    let response = client
        .make_request(
            Method::POST,
            "/guild/123456789/registration/links",
            RequestOptions::new(),
            Some(&body),
        )
        .await
        .unwrap();
    assert_eq!(response.status().as_u16(), 200);

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
    assert_eq!(requests[0].body, requests[1].body);
}

#[tokio::test]
async fn test_retry_cap_surfaces_429() {
    let server = wiremock::MockServer::start().await;
    let client = client_for(&server, |b| b.max_rate_limit_retries(1));

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(rate_limited(429, "0.05", 0))
        .expect(2)
        .mount(&server)
        .await;

    let err = client.get_ws_token().await.unwrap_err();
    assert!(matches!(err, ApiError::Remote(_)));
    assert_eq!(err.status().map(|s| s.as_u16()), Some(429));
}

#[tokio::test]
async fn test_exhausted_window_delays_next_call() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/tournaments"))
        .respond_with(rate_limited(200, "1", 0).set_body_json(json!([])))
        .expect(2)
        .mount(&server)
        .await;

    client.get_tournaments(&guild()).await.unwrap();

    let start = Instant::now();
    client.get_tournaments(&guild()).await.unwrap();
    let elapsed = start.elapsed();

    assert!(elapsed >= Duration::from_millis(900), "not throttled: {elapsed:?}");
}

#[tokio::test]
async fn test_remaining_permits_allow_calls_without_waiting() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/tournaments"))
        .respond_with(rate_limited(200, "5", 5).set_body_json(json!([])))
        .mount(&server)
        .await;

    client.get_tournaments(&guild()).await.unwrap();

    let snapshot = client
        .dispatcher()
        .gate_snapshot("/guild/123456789/tournaments")
        .unwrap();
    assert_eq!(snapshot.concurrency_limit, 5);

    let start = Instant::now();
    client.get_tournaments(&guild()).await.unwrap();
    assert!(start.elapsed() < Duration::from_secs(1));
}

#[tokio::test]
async fn test_distinct_endpoints_do_not_block_each_other() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/1/tournaments"))
        .respond_with(rate_limited(429, "1.5", 0))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/guild/1/tournaments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/guild/2/tournaments"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    let slow_guild = GuildId::new("1").unwrap();
    let fast_guild = GuildId::new("2").unwrap();
    let start = Instant::now();

    let slow = async {
        client.get_tournaments(&slow_guild).await.unwrap();
        start.elapsed()
    };
    let fast = async {
        // Let the slow call hit its 429 first.
        tokio::time::sleep(Duration::from_millis(200)).await;
        client.get_tournaments(&fast_guild).await.unwrap();
        start.elapsed()
    };
    let (slow_done, fast_done) = tokio::join!(slow, fast);

    assert!(slow_done >= Duration::from_millis(1500));
    assert!(fast_done < Duration::from_millis(1000), "fast call blocked: {fast_done:?}");
}

#[tokio::test]
async fn test_same_endpoint_calls_are_serialized() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/tournaments"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!([]))
                .set_delay(Duration::from_millis(200)),
        )
        .expect(3)
        .mount(&server)
        .await;

    let start = Instant::now();
    let g = guild();
    let (a, b, c) = tokio::join!(
        client.get_tournaments(&g),
        client.get_tournaments(&g),
        client.get_tournaments(&g),
    );
    a.unwrap();
    b.unwrap();
    c.unwrap();

    // One at a time: three delayed responses back to back.
    assert!(start.elapsed() >= Duration::from_millis(600));
}

#[tokio::test]
async fn test_suppressed_logs_still_retry() {
    let server = wiremock::MockServer::start().await;
    let client = client_for(&server, |b| b.suppress_logs(true));

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(rate_limited(429, "0.1", 0))
        .up_to_n_times(1)
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    assert!(client.get_ws_token().await.is_ok());
}
