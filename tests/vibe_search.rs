use serde_json::json;
use std::time::Duration;

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gamescout::commands::vibe::recommend_with_fallback;
use gamescout::config::CatalogConfig;
use gamescout::error::GameScoutError;
use gamescout::gateway::{SearchType, VibeQuery, VibeSearch};

fn search(server: &MockServer) -> VibeSearch {
    let config = CatalogConfig {
        api_base: format!("{}/api", server.uri()),
        api_key: "rawg-key".to_string(),
        page_size: 20,
        ..Default::default()
    };
    VibeSearch::new(config, Duration::from_secs(5)).unwrap()
}

fn catalog_game(name: &str, genres: &[&str], tags: &[&str]) -> serde_json::Value {
    json!({
        "name": name,
        "slug": name.to_lowercase().replace(' ', "-"),
        "rating": 4.4,
        "ratings_count": 900,
        "released": "2019-06-01",
        "genres": genres.iter().map(|g| json!({"name": g})).collect::<Vec<_>>(),
        "tags": tags.iter().map(|t| json!({"name": t})).collect::<Vec<_>>()
    })
}

#[tokio::test]
async fn test_primary_search_params_and_dislike_filter() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("key", "rawg-key"))
        .and(query_param("search", "hollow knight"))
        .and(query_param("genres", "platformer"))
        .and(query_param("ordering", "-rating"))
        .and(query_param("page_size", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [
                catalog_game("Hollow Knight", &["Platformer", "Indie"], &["Atmospheric"]),
                catalog_game("Blasphemous", &["Platformer"], &["Gore"]),
                catalog_game("Ori and the Will of the Wisps", &["Platformer"], &["Beautiful"]),
                catalog_game("Celeste", &["Platformer"], &["Difficult"]),
                catalog_game("Dead Cells", &["Platformer"], &["Roguelike"])
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = VibeQuery::new("tough platformer", "hollow knight", "gore");
    let outcome = search(&server).recommend(&query).await.unwrap();

    let names: Vec<&str> = outcome.games.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(
        names,
        vec!["Hollow Knight", "Ori and the Will of the Wisps", "Celeste"]
    );
    assert_eq!(outcome.total_found, 3);
    assert_eq!(outcome.search_type, SearchType::Primary);
    assert_eq!(
        outcome.games[0].details.as_deref(),
        Some("Released 2019-06-01, rated 4.4/5 with 900 reviews")
    );
    assert_eq!(
        outcome.games[0].description.as_deref(),
        Some("Hollow Knight is a Platformer, Indie game that offers an engaging experience.")
    );
}

#[tokio::test]
async fn test_fallback_runs_when_primary_is_empty() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("genres", "casual"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"results": []})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/games"))
        .and(query_param("search", "stardew valley"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [catalog_game("Stardew Valley", &["Simulation"], &["Farming"])]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = VibeQuery::new("chill", "I really love Stardew Valley", "");
    let outcome = recommend_with_fallback(&search(&server), &query)
        .await
        .unwrap();

    assert_eq!(outcome.search_type, SearchType::Fallback);
    assert_eq!(outcome.games[0].name, "Stardew Valley");
}

#[tokio::test]
async fn test_no_fallback_when_primary_finds_games() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/api/games"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "results": [catalog_game("Tetris Effect", &["Puzzle"], &[])]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let query = VibeQuery::new("puzzle", "tetris", "");
    let outcome = recommend_with_fallback(&search(&server), &query)
        .await
        .unwrap();

    assert_eq!(outcome.search_type, SearchType::Primary);
}

#[tokio::test]
async fn test_catalog_status_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "bad key"})))
        .mount(&server)
        .await;

    let err = search(&server)
        .recommend(&VibeQuery::new("any", "thing", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err.downcast_ref::<GameScoutError>(),
        Some(GameScoutError::Search(msg)) if msg == "API error: 401"
    ));
}
