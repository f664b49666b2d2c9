//! Integration tests for route mapping and request shape

use reqwest::header::{HeaderName, HeaderValue, ACCEPT_ENCODING};
use reqwest::Method;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, ResponseTemplate};

use yunite_api::RequestOptions;
use yunite_core::domain::{
    AddTeamRequest, BlockOp, BlockStatus, BlockUserRequest, MatchSessionId, TeamPlayer,
    UserLinksRequest, UserType,
};

use crate::common::{guild, setup_yunite_mock, tournament, TEST_TOKEN};

#[tokio::test]
async fn test_every_request_carries_token_and_encoding() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/websocket-token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"token": "ws"})))
        .mount(&server)
        .await;

    client.get_ws_token().await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    let headers = &requests[0].headers;
    assert_eq!(headers.get("y-api-token").unwrap(), TEST_TOKEN);
    assert_eq!(
        headers.get("accept-encoding").unwrap(),
        "gzip,deflate,compress"
    );
}

#[tokio::test]
async fn test_get_app_with_guild_names() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .and(query_param("withGuildNames", "true"))
        .and(header("y-api-token", TEST_TOKEN))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "app": {
                "id": "app-1",
                "name": "Scrim Bot",
                "ownerId": "42",
                "imageUrl": null,
                "verified": true,
                "publicApp": false
            },
            "authorizedGuilds": [
                {"guildId": "123456789", "guildName": "Scrims", "permissions": ["READ_TOURNAMENTS"]}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let app = client.get_app(true).await.unwrap();
    assert_eq!(app.app.name, "Scrim Bot");
    assert_eq!(app.authorized_guilds[0].guild_name.as_deref(), Some("Scrims"));
}

#[tokio::test]
async fn test_deauthorize_passes_guild_as_query() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("POST"))
        .and(path("/app/deauthorize"))
        .and(query_param("guildId", "123456789"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let body = client.deauthorize(&guild()).await.unwrap();
    assert!(body.is_null());
}

#[tokio::test]
async fn test_user_links_posts_typed_body() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("POST"))
        .and(path("/guild/123456789/registration/links"))
        .and(body_json(json!({"type": "DISCORD", "userIds": ["1", "2"]})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "users": [{
                "discord": {"id": "1", "name": "alice", "avatar": null},
                "epic": {"epicID": "e1", "epicName": "alice_epic"},
                "dateVerified": "2024-01-01T00:00:00Z",
                "chosenPlatform": "PC",
                "chosenPeripheral": null
            }],
            "notLinked": ["2"],
            "notFound": []
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = UserLinksRequest::new(UserType::Discord, vec!["1".into(), "2".into()]);
    let links = client.get_user_links(&guild(), &request).await.unwrap();

    assert_eq!(links.users.len(), 1);
    assert_eq!(links.users[0].epic.epic_name.as_deref(), Some("alice_epic"));
    assert_eq!(links.not_linked, vec!["2".to_string()]);
}

#[tokio::test]
async fn test_block_user() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("POST"))
        .and(path("/guild/123456789/registration/blocks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "status": "ALREADY_BLOCKED",
            "message": "User is already blocked"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let request = BlockUserRequest {
        op: BlockOp::Block,
        user_type: UserType::Epic,
        user_id: "epic-1".to_string(),
        reason: None,
        block_linked_user: true,
    };
    let response = client.block_user(&guild(), &request).await.unwrap();
    assert_eq!(response.status, BlockStatus::AlreadyBlocked);
}

#[tokio::test]
async fn test_tournament_routes() {
    let (server, client) = setup_yunite_mock().await;
    let base = "/guild/123456789/tournaments";

    Mock::given(method("GET"))
        .and(path(base))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "t-1", "name": "Weekly Cup"},
            {"id": "t-2", "name": "Solo Cash"}
        ])))
        .expect(1)
        .mount(&server)
        .await;

    for (suffix, body) in [
        ("/t-1", json!({"id": "t-1", "name": "Weekly Cup"})),
        ("/t-1/leaderboard", json!([{"place": 1}])),
        ("/t-1/matches", json!([{"sessionId": "s-1"}])),
        ("/t-1/teams", json!([{"id": "team-1"}])),
    ] {
        Mock::given(method("GET"))
            .and(path(format!("{base}{suffix}")))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .expect(1)
            .mount(&server)
            .await;
    }

    Mock::given(method("GET"))
        .and(path(format!("{base}/t-1/matches/s-1")))
        .and(query_param("includeLive", "true"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"live": true})))
        .expect(1)
        .mount(&server)
        .await;

    let tournaments = client.get_tournaments(&guild()).await.unwrap();
    assert_eq!(tournaments.len(), 2);

    let single = client
        .get_single_tournament(&guild(), &tournament())
        .await
        .unwrap();
    assert_eq!(single.name.as_deref(), Some("Weekly Cup"));

    let leaderboard = client.get_leaderboard(&guild(), &tournament()).await.unwrap();
    assert_eq!(leaderboard[0]["place"], 1);

    let matches = client.get_matches(&guild(), &tournament()).await.unwrap();
    assert_eq!(matches[0]["sessionId"], "s-1");

    let session = MatchSessionId::new("s-1").unwrap();
    let live = client
        .get_single_leaderboard(&guild(), &tournament(), &session)
        .await
        .unwrap();
    assert_eq!(live["live"], true);

    let teams = client.get_teams(&guild(), &tournament()).await.unwrap();
    assert_eq!(teams[0]["id"], "team-1");
}

#[tokio::test]
async fn test_add_team_and_add_teams_use_different_routes() {
    let (server, client) = setup_yunite_mock().await;
    let team = AddTeamRequest {
        id: None,
        players: Some(vec![TeamPlayer::discord("1"), TeamPlayer::epic("e2")]),
        disqualified: None,
    };
    let team_json = json!({"players": [{"discordId": "1"}, {"epicId": "e2"}]});

    Mock::given(method("POST"))
        .and(path("/guild/123456789/tournaments/t-1/teams"))
        .and(body_json(team_json.clone()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "team-1"})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/guild/123456789/tournaments/t-1/teams/bulk"))
        .and(body_json(json!([team_json])))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "team-1"}])))
        .expect(1)
        .mount(&server)
        .await;

    let single = client.add_team(&guild(), &tournament(), &team).await.unwrap();
    assert!(single.is_object());

    let bulk = client
        .add_teams(&guild(), &tournament(), std::slice::from_ref(&team))
        .await
        .unwrap();
    assert!(bulk.is_array());
}

#[tokio::test]
async fn test_ticket_stats_query() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/acss/stats"))
        .and(query_param("from", "1700000000"))
        .and(query_param("to", "1700086400"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"opened": 4})))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client
        .get_ticket_stats(&guild(), Some(1_700_000_000), Some(1_700_086_400))
        .await
        .unwrap();
    assert_eq!(stats["opened"], 4);
}

#[tokio::test]
async fn test_ticket_stats_without_range() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/guild/123456789/acss/stats"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"opened": 0})))
        .expect(1)
        .mount(&server)
        .await;

    client.get_ticket_stats(&guild(), None, None).await.unwrap();

    let requests = server.received_requests().await.unwrap();
    assert!(requests[0].url.query().is_none());
}

#[tokio::test]
async fn test_passthrough_request() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("PATCH"))
        .and(path("/guild/123456789/custom"))
        .and(query_param("dryRun", "1"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(202).set_body_string("queued"))
        .expect(1)
        .mount(&server)
        .await;

    let response = client
        .make_request(
            Method::PATCH,
            "/guild/123456789/custom",
            RequestOptions::new().query("dryRun", 1),
            Some(&json!({"enabled": true})),
        )
        .await
        .unwrap();

    assert_eq!(response.status().as_u16(), 202);
    assert_eq!(response.text(), "queued");
    assert!(client
        .dispatcher()
        .gate_snapshot("/guild/123456789/custom")
        .is_some());
}

#[tokio::test]
async fn test_passthrough_absolute_url_under_base() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let url = format!("{}/app", server.uri());
    client
        .make_request(Method::GET, &url, RequestOptions::new(), None)
        .await
        .unwrap();

    let key = client.dispatcher().endpoint_key(&url);
    assert_eq!(key.as_str(), "/app");
}

#[tokio::test]
async fn test_caller_headers_do_not_duplicate_token_or_encoding() {
    let (server, client) = setup_yunite_mock().await;

    Mock::given(method("GET"))
        .and(path("/app"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&server)
        .await;

    let options = RequestOptions::new()
        .header(ACCEPT_ENCODING, HeaderValue::from_static("identity"))
        .header(
            HeaderName::from_static("y-api-token"),
            HeaderValue::from_static("other"),
        );
    client
        .make_request(Method::GET, "/app", options, None)
        .await
        .unwrap();

    let requests = server.received_requests().await.unwrap();
    let headers = &requests[0].headers;
    let tokens: Vec<_> = headers.get_all("y-api-token").iter().collect();
    assert_eq!(tokens, vec![TEST_TOKEN]);
    let encodings: Vec<_> = headers.get_all("accept-encoding").iter().collect();
    assert_eq!(encodings, vec!["gzip,deflate,compress"]);
}
