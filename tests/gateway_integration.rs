mod common;

use serde_json::json;
use std::time::Duration;

use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gamescout::config::{CompletionConfig, GatewaySettings};
use gamescout::error::GameScoutError;
use gamescout::gateway::{CompletionGateway, Gateway, ProxyGateway, SearchPayload};

fn proxy(server: &MockServer) -> ProxyGateway {
    let settings = GatewaySettings::new(
        format!("{}/functions/v1/get-game-recommendations", server.uri()),
        "anon-key",
    );
    ProxyGateway::new(settings, Duration::from_secs(5)).unwrap()
}

fn completion(server: &MockServer) -> CompletionGateway {
    let settings = GatewaySettings::new(format!("{}/v1/chat/completions", server.uri()), "sk-test");
    CompletionGateway::new(settings, CompletionConfig::default(), Duration::from_secs(5)).unwrap()
}

fn search_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<GameScoutError>() {
        Some(GameScoutError::Search(msg)) => msg.clone(),
        other => panic!("expected search error, got {:?}", other),
    }
}

fn chat_reply(content: &str) -> serde_json::Value {
    json!({
        "id": "chatcmpl-1",
        "choices": [{"index": 0, "message": {"role": "assistant", "content": content}}]
    })
}

#[tokio::test]
async fn test_proxy_search_posts_payload() {
    let server = MockServer::start().await;
    let payload = SearchPayload {
        genres: "rpg".to_string(),
        platforms: "1".to_string(),
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(path("/functions/v1/get-game-recommendations"))
        .and(header("authorization", "Bearer anon-key"))
        .and(body_json(json!({
            "tags": "",
            "genres": "rpg",
            "exclude_tags": "",
            "exclude_genres": "",
            "platforms": "1",
            "dates": ""
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::games_body()))
        .expect(1)
        .mount(&server)
        .await;

    let games = proxy(&server).search(&payload).await.unwrap();

    assert_eq!(games.len(), 2);
    assert_eq!(games[0].name, "The Witcher 3: Wild Hunt");
    assert_eq!(games[0].genres, vec!["Action".to_string(), "RPG".to_string()]);
    assert_eq!(games[0].platforms, vec!["PC".to_string()]);
    assert_eq!(games[1].release_date.as_deref(), Some("2017-09-14"));
}

#[tokio::test]
async fn test_proxy_ask_posts_query() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(body_json(json!({"query": "cozy farming"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "games": [{"name": "Stardew Valley"}],
            "searchType": "primary",
            "totalFound": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let games = proxy(&server).ask("cozy farming").await.unwrap();
    assert_eq!(games[0].name, "Stardew Valley");
}

#[tokio::test]
async fn test_proxy_error_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Query is required"})))
        .mount(&server)
        .await;

    let err = proxy(&server).ask("x").await.unwrap_err();
    assert_eq!(search_message(&err), "Query is required");
}

#[tokio::test]
async fn test_proxy_server_error_without_body() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = proxy(&server).search(&SearchPayload::default()).await.unwrap_err();
    assert_eq!(search_message(&err), "API error: 503");
}

#[tokio::test]
async fn test_completion_ask_parses_fenced_array() {
    let server = MockServer::start().await;
    let content = "```json\n[{\"name\": \"Hollow Knight\", \"release_date\": \"2017-02-24\", \
                   \"platforms\": [\"PC\"], \"store_links\": [{\"name\": \"Steam\", \"url\": \"https://store.steampowered.com/app/367520\"}]}]\n```";

    Mock::given(method("POST"))
        .and(path("/v1/chat/completions"))
        .and(header("authorization", "Bearer sk-test"))
        .and(body_partial_json(json!({
            "model": "gpt-4",
            "messages": [{"role": "system"}, {"role": "user", "content": "metroidvania"}]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply(content)))
        .expect(1)
        .mount(&server)
        .await;

    let games = completion(&server).ask("metroidvania").await.unwrap();

    assert_eq!(games.len(), 1);
    assert_eq!(games[0].name, "Hollow Knight");
    assert_eq!(games[0].store_links[0].name, "Steam");
}

#[tokio::test]
async fn test_completion_search_describes_payload() {
    let server = MockServer::start().await;
    let payload = SearchPayload {
        genres: "rpg".to_string(),
        platforms: "7".to_string(),
        ..Default::default()
    };

    Mock::given(method("POST"))
        .and(body_partial_json(json!({
            "messages": [
                {"role": "system"},
                {"role": "user", "content": "Recommend games matching these filters. Genres: rpg. Platforms: Nintendo."}
            ]
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(chat_reply("[]")))
        .expect(1)
        .mount(&server)
        .await;

    let games = completion(&server).search(&payload).await.unwrap();
    assert!(games.is_empty());
}

#[tokio::test]
async fn test_completion_prose_reply_is_invalid_format() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(chat_reply("I'd suggest trying Celeste!")),
        )
        .mount(&server)
        .await;

    let err = completion(&server).ask("platformer").await.unwrap_err();
    assert_eq!(search_message(&err), "Invalid response format from AI");
}

#[tokio::test]
async fn test_completion_missing_content() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"choices": []})))
        .mount(&server)
        .await;

    let err = completion(&server).ask("platformer").await.unwrap_err();
    assert_eq!(
        search_message(&err),
        "No content received from completion endpoint"
    );
}

#[tokio::test]
async fn test_completion_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(429).set_body_string("rate limited"))
        .mount(&server)
        .await;

    let err = completion(&server).ask("platformer").await.unwrap_err();
    assert_eq!(search_message(&err), "Completion API error: 429");
}
