//! Remote recommendation gateway
//!
//! This module contains the gateway abstraction the conversation calls at
//! its terminal step, the wire types shared by every backend, and the
//! implementations for a filter proxy function and an LLM completion
//! endpoint. Vibe search against the public games catalog lives in
//! [`vibe`], with its keyword helpers in [`keywords`].

pub mod completion;
pub mod keywords;
pub mod proxy;
pub mod vibe;

pub use completion::CompletionGateway;
pub use proxy::ProxyGateway;
pub use vibe::{SearchType, VibeOutcome, VibeQuery, VibeSearch};

use crate::config::GatewayConfig;
use crate::error::{GameScoutError, Result};

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Store where a game can be bought
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreLink {
    /// Store display name
    #[serde(alias = "store_name")]
    pub name: String,
    /// Store page URL
    pub url: String,
}

/// A recommended game
///
/// Read-only once produced by a gateway. Deserialization accepts the
/// slightly different shapes returned by the proxy, the completion endpoint
/// and the games catalog (`released` vs `release_date`, genre objects vs
/// plain names).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameResult {
    /// Game title
    #[serde(default = "unknown_game")]
    pub name: String,
    /// Catalog slug, used to build a catalog link
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
    /// Short description or preview
    #[serde(
        default,
        alias = "description_preview",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    /// Release date as reported by the backend
    #[serde(default, alias = "released", skip_serializing_if = "Option::is_none")]
    pub release_date: Option<String>,
    /// Average rating out of 5
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rating: Option<f64>,
    /// Genre names
    #[serde(default, deserialize_with = "deserialize_names")]
    pub genres: Vec<String>,
    /// Platform names
    #[serde(default, deserialize_with = "deserialize_names")]
    pub platforms: Vec<String>,
    /// Store links
    #[serde(default, deserialize_with = "deserialize_store_links")]
    pub store_links: Vec<StoreLink>,
    /// Free-form details line
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

fn unknown_game() -> String {
    "Unknown Game".to_string()
}

fn name_of(value: &serde_json::Value) -> Option<String> {
    match value {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Object(map) => map
            .get("name")
            .and_then(|n| n.as_str())
            .map(str::to_string)
            .or_else(|| map.get("platform").and_then(name_of)),
        _ => None,
    }
}

fn deserialize_names<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let values = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(values
        .unwrap_or_default()
        .iter()
        .filter_map(name_of)
        .collect())
}

fn deserialize_store_links<'de, D>(
    deserializer: D,
) -> std::result::Result<Vec<StoreLink>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<StoreLink>>::deserialize(deserializer)?.unwrap_or_default())
}

impl GameResult {
    /// Creates a result carrying only a name
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::gateway::GameResult;
    ///
    /// let game = GameResult::named("Hades");
    /// assert_eq!(game.name, "Hades");
    /// assert!(game.genres.is_empty());
    /// ```
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            slug: None,
            description: None,
            release_date: None,
            rating: None,
            genres: Vec::new(),
            platforms: Vec::new(),
            store_links: Vec::new(),
            details: None,
        }
    }

    /// Link to the game's page in the public games catalog, if a slug is known
    pub fn catalog_url(&self) -> Option<String> {
        self.slug
            .as_ref()
            .filter(|s| !s.is_empty())
            .map(|slug| format!("https://rawg.io/games/{}", slug))
    }
}

/// Serialized form of the filter accumulator
///
/// Every field is a comma-joined string; an empty string means "no
/// constraint on this dimension".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchPayload {
    /// Included tag slugs
    pub tags: String,
    /// Included genre slugs
    pub genres: String,
    /// Excluded tag slugs
    pub exclude_tags: String,
    /// Excluded genre slugs
    pub exclude_genres: String,
    /// Platform codes
    pub platforms: String,
    /// Release window as `"YYYY-01-01,YYYY-12-31"`
    pub dates: String,
}

impl SearchPayload {
    /// Whether the payload places no constraint at all
    pub fn is_unconstrained(&self) -> bool {
        *self == Self::default()
    }
}

/// A remote service that turns search criteria into a game list
///
/// At most one call is in flight per conversation; implementations neither
/// cache nor retry.
#[async_trait]
pub trait Gateway: Send + Sync {
    /// Search with a structured filter payload
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::Search` when the call fails or the backend
    /// answers with an error body
    async fn search(&self, payload: &SearchPayload) -> Result<Vec<GameResult>>;

    /// Search with a single free-text description
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::Search` when the call fails or the backend
    /// answers with an error body
    async fn ask(&self, query: &str) -> Result<Vec<GameResult>>;
}

/// Create a gateway based on configuration
///
/// # Errors
///
/// Returns error if the gateway kind is unknown or HTTP client
/// initialization fails
pub fn create_gateway(config: &GatewayConfig) -> Result<Arc<dyn Gateway>> {
    let timeout = Duration::from_secs(config.timeout_seconds);
    match config.kind.as_str() {
        "proxy" => Ok(Arc::new(ProxyGateway::new(config.settings(), timeout)?)),
        "completion" => Ok(Arc::new(CompletionGateway::new(
            config.settings(),
            config.completion.clone(),
            timeout,
        )?)),
        other => Err(GameScoutError::Config(format!("Unknown gateway kind: {}", other)).into()),
    }
}

/// Interpret a gateway response body
///
/// Accepts a bare JSON array of games or a `{games: [...]}` wrapper. An
/// `{error: "..."}` body becomes a `Search` error carrying that message,
/// whatever the status code.
pub(crate) fn parse_games_body(status: reqwest::StatusCode, body: &str) -> Result<Vec<GameResult>> {
    let value: serde_json::Value = match serde_json::from_str(body) {
        Ok(value) => value,
        Err(e) if status.is_success() => {
            return Err(GameScoutError::Search(format!("Failed to parse response: {}", e)).into())
        }
        Err(_) => {
            return Err(GameScoutError::Search(format!("API error: {}", status.as_u16())).into())
        }
    };

    if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
        return Err(GameScoutError::Search(message.to_string()).into());
    }

    if !status.is_success() {
        return Err(GameScoutError::Search(format!("API error: {}", status.as_u16())).into());
    }

    let games = match value {
        serde_json::Value::Array(_) => value,
        serde_json::Value::Object(mut map) => map.remove("games").ok_or_else(|| {
            GameScoutError::Search("Unexpected response shape".to_string())
        })?,
        _ => return Err(GameScoutError::Search("Unexpected response shape".to_string()).into()),
    };

    serde_json::from_value(games)
        .map_err(|e| GameScoutError::Search(format!("Invalid game record: {}", e)).into())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GatewayConfig;
    use reqwest::StatusCode;

    fn search_message(err: anyhow::Error) -> String {
        match err.downcast_ref::<GameScoutError>() {
            Some(GameScoutError::Search(msg)) => msg.clone(),
            other => panic!("expected search error, got {:?}", other),
        }
    }

    #[test]
    fn test_game_result_from_catalog_shape() {
        let json = r#"{
            "id": 3498,
            "name": "Grand Theft Auto V",
            "slug": "grand-theft-auto-v",
            "released": "2013-09-17",
            "rating": 4.47,
            "genres": [{"id": 4, "name": "Action", "slug": "action"}],
            "platforms": [{"platform": {"id": 4, "name": "PC", "slug": "pc"}}]
        }"#;
        let game: GameResult = serde_json::from_str(json).unwrap();
        assert_eq!(game.release_date.as_deref(), Some("2013-09-17"));
        assert_eq!(game.genres, vec!["Action".to_string()]);
        assert_eq!(game.platforms, vec!["PC".to_string()]);
        assert_eq!(
            game.catalog_url().as_deref(),
            Some("https://rawg.io/games/grand-theft-auto-v")
        );
    }

    #[test]
    fn test_game_result_from_completion_shape() {
        let json = r#"{
            "name": "Stardew Valley",
            "description": "A farming sim.",
            "release_date": "2016-02-26",
            "platforms": ["PC", "Nintendo Switch"],
            "store_links": [{"store_name": "Steam", "url": "https://store.steampowered.com/app/413150"}]
        }"#;
        let game: GameResult = serde_json::from_str(json).unwrap();
        assert_eq!(game.platforms.len(), 2);
        assert_eq!(game.store_links[0].name, "Steam");
        assert!(game.catalog_url().is_none());
    }

    #[test]
    fn test_game_result_tolerates_nulls_and_missing_name() {
        let game: GameResult =
            serde_json::from_str(r#"{"genres": null, "rating": null, "store_links": null}"#)
                .unwrap();
        assert_eq!(game.name, "Unknown Game");
        assert!(game.genres.is_empty());
        assert!(game.rating.is_none());
    }

    #[test]
    fn test_payload_serializes_field_names() {
        let payload = SearchPayload {
            genres: "rpg".to_string(),
            platforms: "1".to_string(),
            ..Default::default()
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "tags": "",
                "genres": "rpg",
                "exclude_tags": "",
                "exclude_genres": "",
                "platforms": "1",
                "dates": ""
            })
        );
        assert!(!payload.is_unconstrained());
        assert!(SearchPayload::default().is_unconstrained());
    }

    #[test]
    fn test_parse_games_array() {
        let games = parse_games_body(StatusCode::OK, r#"[{"name": "Celeste"}]"#).unwrap();
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].name, "Celeste");
    }

    #[test]
    fn test_parse_games_wrapper() {
        let body = r#"{"games": [{"name": "Hades"}], "searchType": "primary", "totalFound": 1}"#;
        let games = parse_games_body(StatusCode::OK, body).unwrap();
        assert_eq!(games[0].name, "Hades");
    }

    #[test]
    fn test_parse_error_body_on_success_status() {
        let err = parse_games_body(StatusCode::OK, r#"{"error": "Query is required"}"#)
            .unwrap_err();
        assert_eq!(search_message(err), "Query is required");
    }

    #[test]
    fn test_parse_error_body_on_failure_status() {
        let body = r#"{"error": "Failed to get game recommendations", "games": []}"#;
        let err = parse_games_body(StatusCode::INTERNAL_SERVER_ERROR, body).unwrap_err();
        assert_eq!(search_message(err), "Failed to get game recommendations");
    }

    #[test]
    fn test_parse_failure_status_without_body() {
        let err = parse_games_body(StatusCode::BAD_GATEWAY, "upstream down").unwrap_err();
        assert_eq!(search_message(err), "API error: 502");
    }

    #[test]
    fn test_parse_unexpected_shape() {
        let err = parse_games_body(StatusCode::OK, r#"{"count": 3}"#).unwrap_err();
        assert_eq!(search_message(err), "Unexpected response shape");
    }

    #[test]
    fn test_create_gateway_kinds() {
        let mut config = GatewayConfig::default();
        assert!(create_gateway(&config).is_ok());

        config.kind = "completion".to_string();
        assert!(create_gateway(&config).is_ok());

        config.kind = "invalid".to_string();
        assert!(create_gateway(&config).is_err());
    }
}
