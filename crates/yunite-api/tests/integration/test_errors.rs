//! Integration tests for error propagation

use std::time::{Duration, Instant};

use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use yunite_api::{ApiError, RequestOptions, YuniteClient};
use yunite_core::{
    config::{ClientConfig, ClientConfigBuilder, ConfigError},
    domain::{AddTeamRequest, TeamPlayer},
};

use crate::common::{guild, setup_yunite_mock, tournament};

#[tokio::test]
async fn test_not_found_is_returned_unmodified() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/tournaments/t-1"))
        .respond_with(
            ResponseTemplate::new(404)
                .insert_header("x-request-id", "req-7")
                .set_body_json(json!({"error": "TOURNAMENT_NOT_FOUND"})),
        )
        .expect(1)
        .mount(&server)
        .await;

    let start = Instant::now();
    let err = client
        .get_single_tournament(&guild(), &tournament())
        .await
        .unwrap_err();

    assert!(start.elapsed() < Duration::from_millis(500));
    assert!(err.is_not_found());
    let response = err.response().unwrap();
    assert_eq!(response.headers()["x-request-id"], "req-7");
    let body: serde_json::Value = response.json().unwrap();
    assert_eq!(body["error"], "TOURNAMENT_NOT_FOUND");
}

#[tokio::test]
async fn test_server_error_is_not_retried() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(503))
        .expect(1)
        .mount(&server)
        .await;

    let err = client.get_ws_token().await.unwrap_err();
    assert_eq!(err.status().map(|s| s.as_u16()), Some(503));
}

#[test]
fn test_missing_token_fails_before_network() {
    let config = ClientConfigBuilder::new()
        .base_url("http://127.0.0.1:9")
        .build();
    let err = YuniteClient::new(&config).unwrap_err();
    assert!(matches!(
        err,
        ApiError::Configuration(ConfigError::MissingToken)
    ));
}

#[test]
fn test_blank_token_is_rejected() {
    let config = ClientConfig {
        api_token: Some("   ".to_string()),
        ..ClientConfig::default()
    };
    assert!(matches!(
        YuniteClient::new(&config).unwrap_err(),
        ApiError::Configuration(_)
    ));
}

#[tokio::test]
async fn test_invalid_team_is_rejected_before_network() {
    let (server, client) = setup_yunite_mock().await;
    let team = AddTeamRequest {
        players: Some(vec![TeamPlayer::default()]),
        ..AddTeamRequest::default()
    };

    let err = client
        .add_team(&guild(), &tournament(), &team)
        .await
        .unwrap_err();

    assert!(matches!(err, ApiError::Validation(_)));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_undecodable_body_is_invalid_response() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/tournaments"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    let err = client.get_tournaments(&guild()).await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse(_)));
}

#[tokio::test]
async fn test_connection_failure_is_transport_error() {
    let config = ClientConfigBuilder::new()
        .api_token("t")
        .base_url("http://127.0.0.1:9")
        .build();
    let client = YuniteClient::new(&config).unwrap();

    let err = client.get_ws_token().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn test_timeout_is_transport_error() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
        .mount(&server)
        .await;

    let err = client
        .make_request(
            reqwest::Method::GET,
            "/slow",
            RequestOptions::new().timeout(Duration::from_millis(100)),
            None,
        )
        .await
        .unwrap_err();

    match err {
        ApiError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected transport error, got {other:?}"),
    }

    // The timed-out call released its slot.
    let snapshot = client.dispatcher().gate_snapshot("/slow").unwrap();
    assert_eq!(snapshot.in_flight, 0);
}
