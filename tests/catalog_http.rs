mod common;

use serde_json::json;
use std::time::Duration;

use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use gamescout::catalog::{CatalogLoader, HttpCatalogLoader, OptionKind};
use gamescout::config::GatewaySettings;
use gamescout::error::GameScoutError;

fn loader(server: &MockServer) -> HttpCatalogLoader {
    let settings = GatewaySettings::new(format!("{}/functions/v1/get-tags", server.uri()), "anon-key");
    HttpCatalogLoader::new(settings, Duration::from_secs(5)).unwrap()
}

fn catalog_message(err: &anyhow::Error) -> String {
    match err.downcast_ref::<GameScoutError>() {
        Some(GameScoutError::CatalogLoad(msg)) => msg.clone(),
        other => panic!("expected catalog load error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_load_sends_bearer_and_parses_options() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/functions/v1/get-tags"))
        .and(header("authorization", "Bearer anon-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::catalog_body()))
        .expect(1)
        .mount(&server)
        .await;

    let options = loader(&server).load().await.unwrap();

    assert_eq!(options.len(), 4);
    assert_eq!(options[0].name, "RPG");
    assert_eq!(options[0].id, "5");
    assert_eq!(options[0].kind, OptionKind::Genre);
    assert_eq!(options[2].slug, "open-world");
    assert_eq!(options[2].kind, OptionKind::Tag);
}

#[tokio::test]
async fn test_load_server_error_is_catalog_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let err = loader(&server).load().await.unwrap_err();
    assert_eq!(catalog_message(&err), "API error: 500");
}

#[tokio::test]
async fn test_load_error_body_is_catalog_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"error": "Invalid API key"})))
        .mount(&server)
        .await;

    let err = loader(&server).load().await.unwrap_err();
    assert_eq!(catalog_message(&err), "Invalid API key");
}

#[tokio::test]
async fn test_load_empty_catalog() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(&server)
        .await;

    assert!(loader(&server).load().await.unwrap().is_empty());
}
