//! Filter proxy gateway
//!
//! Talks to a thin serverless function that accepts the serialized filter
//! payload (or `{query}` for free text), queries the games catalog on the
//! caller's behalf and returns a JSON array of games.

use crate::config::GatewaySettings;
use crate::error::{GameScoutError, Result};
use crate::gateway::{parse_games_body, GameResult, Gateway, SearchPayload};

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use std::time::Duration;

/// Gateway backed by a filter proxy function
///
/// # Examples
///
/// ```
/// use gamescout::config::GatewaySettings;
/// use gamescout::gateway::ProxyGateway;
/// use std::time::Duration;
///
/// let settings = GatewaySettings::new("http://localhost:54321/functions/v1/search", "anon");
/// let gateway = ProxyGateway::new(settings, Duration::from_secs(30));
/// assert!(gateway.is_ok());
/// ```
pub struct ProxyGateway {
    client: Client,
    settings: GatewaySettings,
}

#[derive(Debug, Serialize)]
struct QueryBody<'a> {
    query: &'a str,
}

impl ProxyGateway {
    /// Create a new proxy gateway
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(settings: GatewaySettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GameScoutError::Search(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!("Initialized proxy gateway: endpoint={}", settings.endpoint);

        Ok(Self { client, settings })
    }

    /// Configured endpoint
    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    async fn post<B: Serialize + ?Sized>(&self, body: &B) -> Result<Vec<GameResult>> {
        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.credential)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Recommendation request failed: {}", e);
                GameScoutError::Search(format!("Failed to reach recommendation service: {}", e))
            })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            GameScoutError::Search(format!("Failed to read recommendation response: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!("Recommendation service returned {}: {}", status, text);
        }

        let games = parse_games_body(status, &text)?;
        tracing::debug!("Proxy returned {} games", games.len());
        Ok(games)
    }
}

#[async_trait]
impl Gateway for ProxyGateway {
    async fn search(&self, payload: &SearchPayload) -> Result<Vec<GameResult>> {
        tracing::debug!(?payload, "Posting filter payload to {}", self.settings.endpoint);
        self.post(payload).await
    }

    async fn ask(&self, query: &str) -> Result<Vec<GameResult>> {
        tracing::debug!(query = %query, "Posting free-text query to {}", self.settings.endpoint);
        self.post(&QueryBody { query }).await
    }
}
