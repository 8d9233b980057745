//! HTTP option catalog loader
//!
//! Fetches the genre/tag vocabulary from a remote endpoint that answers a
//! bearer-authenticated GET with a JSON array of `{id, slug, name, type}`
//! records.

use crate::catalog::{CatalogLoader, OptionKind, SelectionOption};
use crate::config::GatewaySettings;
use crate::error::{GameScoutError, Result};

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Catalog loader backed by an HTTP endpoint
///
/// # Examples
///
/// ```no_run
/// use gamescout::catalog::{CatalogLoader, HttpCatalogLoader};
/// use gamescout::config::GatewaySettings;
/// use std::time::Duration;
///
/// # async fn example() -> gamescout::error::Result<()> {
/// let settings = GatewaySettings::new("http://localhost:54321/functions/v1/get-tags", "anon");
/// let loader = HttpCatalogLoader::new(settings, Duration::from_secs(30))?;
/// let options = loader.load().await?;
/// # Ok(())
/// # }
/// ```
pub struct HttpCatalogLoader {
    client: Client,
    settings: GatewaySettings,
}

/// Option record as returned by the catalog endpoint
#[derive(Debug, Deserialize)]
struct CatalogRecord {
    #[serde(default)]
    id: Option<serde_json::Value>,
    #[serde(default)]
    slug: Option<String>,
    name: String,
    #[serde(rename = "type", alias = "kind")]
    kind: OptionKind,
}

impl CatalogRecord {
    fn into_option(self) -> SelectionOption {
        let id = match self.id {
            Some(serde_json::Value::String(s)) => Some(s),
            Some(serde_json::Value::Number(n)) => Some(n.to_string()),
            _ => None,
        };
        let slug = self
            .slug
            .or_else(|| id.clone())
            .unwrap_or_else(|| slugify(&self.name));
        let code = id.as_deref().and_then(|s| s.parse::<u32>().ok());
        let id = id.unwrap_or_else(|| slug.clone());
        let mut option = SelectionOption::new(id, self.name, slug, self.kind);
        if self.kind == OptionKind::Platform {
            option.code = code;
        }
        option
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

impl HttpCatalogLoader {
    /// Create a new HTTP catalog loader
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(settings: GatewaySettings, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| {
                GameScoutError::CatalogLoad(format!("Failed to create HTTP client: {}", e))
            })?;

        tracing::info!("Initialized catalog loader: endpoint={}", settings.endpoint);

        Ok(Self { client, settings })
    }

    /// Configured catalog endpoint
    pub fn endpoint(&self) -> &str {
        &self.settings.endpoint
    }

    fn parse_body(body: &str) -> Result<Vec<SelectionOption>> {
        let value: serde_json::Value = serde_json::from_str(body).map_err(|e| {
            GameScoutError::CatalogLoad(format!("Failed to parse catalog response: {}", e))
        })?;

        if let Some(message) = value.get("error").and_then(|e| e.as_str()) {
            return Err(GameScoutError::CatalogLoad(message.to_string()).into());
        }

        let records = match value {
            serde_json::Value::Array(_) => value,
            serde_json::Value::Object(mut map) => map.remove("results").ok_or_else(|| {
                GameScoutError::CatalogLoad("Unexpected catalog response shape".to_string())
            })?,
            _ => {
                return Err(GameScoutError::CatalogLoad(
                    "Unexpected catalog response shape".to_string(),
                )
                .into())
            }
        };

        let records: Vec<CatalogRecord> = serde_json::from_value(records).map_err(|e| {
            GameScoutError::CatalogLoad(format!("Invalid catalog record: {}", e))
        })?;

        Ok(records.into_iter().map(CatalogRecord::into_option).collect())
    }
}

#[async_trait]
impl CatalogLoader for HttpCatalogLoader {
    async fn load(&self) -> Result<Vec<SelectionOption>> {
        tracing::debug!("Fetching option catalog from {}", self.settings.endpoint);

        let response = self
            .client
            .get(&self.settings.endpoint)
            .bearer_auth(&self.settings.credential)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Failed to fetch option catalog: {}", e);
                GameScoutError::CatalogLoad(format!("Failed to reach catalog: {}", e))
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            GameScoutError::CatalogLoad(format!("Failed to read catalog response: {}", e))
        })?;

        if !status.is_success() {
            tracing::error!("Catalog returned error {}: {}", status, body);
            return Err(
                GameScoutError::CatalogLoad(format!("API error: {}", status.as_u16())).into(),
            );
        }

        let options = Self::parse_body(&body)?;
        tracing::debug!("Loaded {} catalog options", options.len());
        Ok(options)
    }
}
