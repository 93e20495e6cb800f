//! Integration tests for the backend client against a mock server.

use mockito::Matcher;
use tournament_bracket_web::backend::{ApiError, BackendClient};
use tournament_bracket_web::{MatchStatus, RoundFormat, Team};

const ROUND_JSON: &str = r#"{
    "id": 11,
    "roundValue": 3,
    "roundName": "Semi Final",
    "type": "KNOCKOUT",
    "matches": [
        {
            "id": 101,
            "team1": { "id": 1, "name": "Lions" },
            "team2": { "id": 2, "name": "Tigers" },
            "status": "COMPLETED",
            "winnerTeamId": 2,
            "venue": "Court 1",
            "scheduledTime": "2026-05-01T10:00:00Z"
        },
        {
            "id": 102,
            "team1": { "id": 3, "name": "Bears" },
            "team2": { "id": 4, "name": "Wolves" },
            "status": "SCHEDULED"
        }
    ]
}"#;

#[tokio::test]
async fn fetch_round_decodes_backend_json() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ROUND_JSON)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let round = client.fetch_round(7, 3).await.unwrap();

    mock.assert_async().await;
    assert_eq!(round.id, Some(11));
    assert_eq!(round.format, RoundFormat::Knockout);
    assert_eq!(round.matches.len(), 2);
    assert_eq!(round.matches[0].status, MatchStatus::Completed);
    assert_eq!(round.matches[0].winner_team_id, Some(2));
    assert_eq!(round.matches[0].venue.as_deref(), Some("Court 1"));
    assert!(round.matches[0].scheduled_time.is_some());
    assert_eq!(round.matches[1].winner_team_id, None);
}

#[tokio::test]
async fn requests_carry_the_bearer_token() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .match_header("authorization", "Bearer secret")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ROUND_JSON)
        .create_async()
        .await;

    let client = BackendClient::new(format!("{}/", server.url())).with_token("secret");
    client.fetch_round(7, 3).await.unwrap();

    mock.assert_async().await;
}

#[tokio::test]
async fn rejected_token_is_refreshed_and_retried_once() {
    let mut server = mockito::Server::new_async().await;
    let rejected = server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .match_header("authorization", "Bearer stale")
        .with_status(401)
        .expect(1)
        .create_async()
        .await;
    let accepted = server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .match_header("authorization", "Bearer fresh")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ROUND_JSON)
        .expect(1)
        .create_async()
        .await;

    let client = BackendClient::new(server.url())
        .with_token("stale")
        .with_token_refresh(|| Some("fresh".to_string()));
    let round = client.fetch_round(7, 3).await.unwrap();

    rejected.assert_async().await;
    accepted.assert_async().await;
    assert_eq!(round.round_value, 3);
}

#[tokio::test]
async fn unauthorized_without_refresh_is_an_error() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .with_status(401)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let err = client.fetch_round(7, 3).await.unwrap_err();
    assert!(matches!(err, ApiError::Unauthorized(_)));
}

#[tokio::test]
async fn missing_placeholders_are_an_empty_list() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/teams/dummy/tournament/7/round/2")
        .with_status(404)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let teams = client.fetch_placeholder_teams(7, 2).await.unwrap();
    assert!(teams.is_empty());
}

#[tokio::test]
async fn select_round_type_posts_the_format() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/api/tournaments/rounds/11/select-type")
        .match_body(Matcher::Json(serde_json::json!({ "type": "ROUND_ROBIN" })))
        .with_status(200)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    client
        .select_round_type(11, RoundFormat::RoundRobin)
        .await
        .unwrap();

    mock.assert_async().await;
    assert!(matches!(
        client.select_round_type(11, RoundFormat::Unset).await,
        Err(ApiError::Other(_))
    ));
}

#[tokio::test]
async fn advancers_prefer_persisted_placeholders() {
    let mut server = mockito::Server::new_async().await;
    server
        .mock("GET", "/api/tournaments/7/rounds/value/3")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(ROUND_JSON)
        .create_async()
        .await;
    server
        .mock("GET", "/api/teams/dummy/tournament/7/round/3")
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"[{ "id": 501, "name": "Winner M101" }, { "id": 502, "name": "Winner M102" }]"#)
        .create_async()
        .await;

    let client = BackendClient::new(server.url());
    let teams = client.fetch_advancers(7, 3, 2).await.unwrap();

    assert_eq!(teams[0], Team::new(2, "Tigers"));
    assert_eq!(teams[1], Team::placeholder(502, "Winner M102"));
}
