//! LLM completion gateway
//!
//! Sends the user's description to an OpenAI-style chat completions
//! endpoint and parses the assistant's reply as a JSON array of games.

use crate::catalog::platform_options;
use crate::config::{CompletionConfig, GatewaySettings};
use crate::error::{GameScoutError, Result};
use crate::gateway::{GameResult, Gateway, SearchPayload};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const SYSTEM_PROMPT: &str = r#"You are a game recommendation expert. Recommend 3-5 real games that match the user's request.

Reply with a JSON array only, each element shaped like:
{
  "name": "Game Title",
  "description": "Two or three sentences on why this game fits the request",
  "release_date": "YYYY-MM-DD",
  "platforms": ["PC", "PlayStation 5", "Xbox Series X/S", "Nintendo Switch"],
  "store_links": [{"name": "Steam", "url": "https://store.steampowered.com/app/..."}]
}

Guidelines:
- Only include games that actually exist, with accurate release dates
- Prefer well-known, highly rated games
- If the request is vague, recommend popular games from different genres"#;

/// Gateway backed by a chat completions endpoint
pub struct CompletionGateway {
    client: Client,
    settings: GatewaySettings,
    completion: CompletionConfig,
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Debug, Deserialize)]
struct ChatReply {
    #[serde(default)]
    content: Option<String>,
}

impl CompletionGateway {
    /// Create a new completion gateway
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(
        settings: GatewaySettings,
        completion: CompletionConfig,
        timeout: Duration,
    ) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GameScoutError::Search(format!("Failed to create HTTP client: {}", e)))?;

        tracing::info!(
            "Initialized completion gateway: endpoint={}, model={}",
            settings.endpoint,
            completion.model
        );

        Ok(Self {
            client,
            settings,
            completion,
        })
    }

    /// Configured model name
    pub fn model(&self) -> &str {
        &self.completion.model
    }
}

/// Render a filter payload as a request the model can follow
///
/// Platform codes are mapped back to their family names.
pub fn describe_payload(payload: &SearchPayload) -> String {
    let mut parts = Vec::new();

    let mut push = |label: &str, value: &str| {
        if !value.is_empty() {
            parts.push(format!("{}: {}", label, value.replace(',', ", ")));
        }
    };
    push("Genres", &payload.genres);
    push("Tags", &payload.tags);
    push("Avoid genres", &payload.exclude_genres);
    push("Avoid tags", &payload.exclude_tags);

    if !payload.platforms.is_empty() {
        let platforms = platform_options();
        let names: Vec<String> = payload
            .platforms
            .split(',')
            .map(|code| {
                platforms
                    .iter()
                    .find(|p| p.code.map(|c| c.to_string()).as_deref() == Some(code))
                    .map(|p| p.name.clone())
                    .unwrap_or_else(|| code.to_string())
            })
            .collect();
        parts.push(format!("Platforms: {}", names.join(", ")));
    }

    if let Some((from, to)) = payload.dates.split_once(',') {
        parts.push(format!("Released between {} and {}", from, to));
    }

    if parts.is_empty() {
        "Recommend some popular games.".to_string()
    } else {
        format!("Recommend games matching these filters. {}.", parts.join(". "))
    }
}

/// Parse the assistant's reply into games
///
/// Markdown code fences around the JSON are tolerated.
pub(crate) fn parse_reply(content: &str) -> Result<Vec<GameResult>> {
    let trimmed = content.trim();
    let json = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.trim_end().strip_suffix("```"))
        .unwrap_or(trimmed)
        .trim();

    let value: serde_json::Value = serde_json::from_str(json).map_err(|e| {
        tracing::error!("Failed to parse completion reply: {}", e);
        GameScoutError::Search("Invalid response format from AI".to_string())
    })?;

    if !value.is_array() {
        return Err(GameScoutError::Search("Invalid response format from AI".to_string()).into());
    }

    serde_json::from_value(value)
        .map_err(|_| GameScoutError::Search("Invalid response format from AI".to_string()).into())
}

#[async_trait]
impl Gateway for CompletionGateway {
    async fn search(&self, payload: &SearchPayload) -> Result<Vec<GameResult>> {
        let query = describe_payload(payload);
        self.ask(&query).await
    }

    async fn ask(&self, query: &str) -> Result<Vec<GameResult>> {
        let request = ChatRequest {
            model: &self.completion.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: SYSTEM_PROMPT,
                },
                ChatMessage {
                    role: "user",
                    content: query,
                },
            ],
            temperature: self.completion.temperature,
            max_tokens: self.completion.max_tokens,
        };

        tracing::debug!(query = %query, model = %self.completion.model, "Requesting completion");

        let response = self
            .client
            .post(&self.settings.endpoint)
            .bearer_auth(&self.settings.credential)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Completion request failed: {}", e);
                GameScoutError::Search(format!("Failed to reach completion endpoint: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Completion endpoint returned {}: {}", status, error_text);
            return Err(GameScoutError::Search(format!(
                "Completion API error: {}",
                status.as_u16()
            ))
            .into());
        }

        let chat: ChatResponse = response.json().await.map_err(|e| {
            GameScoutError::Search(format!("Failed to parse completion response: {}", e))
        })?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .filter(|c| !c.trim().is_empty())
            .ok_or_else(|| {
                GameScoutError::Search("No content received from completion endpoint".to_string())
            })?;

        let games = parse_reply(&content)?;
        tracing::debug!("Completion returned {} games", games.len());
        Ok(games)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_describe_empty_payload() {
        assert_eq!(
            describe_payload(&SearchPayload::default()),
            "Recommend some popular games."
        );
    }

    #[test]
    fn test_describe_full_payload() {
        let payload = SearchPayload {
            tags: "open-world,great-soundtrack".to_string(),
            genres: "rpg".to_string(),
            exclude_tags: "".to_string(),
            exclude_genres: "horror".to_string(),
            platforms: "1,7".to_string(),
            dates: "2015-01-01,2024-12-31".to_string(),
        };
        let text = describe_payload(&payload);
        assert!(text.contains("Genres: rpg"));
        assert!(text.contains("Tags: open-world, great-soundtrack"));
        assert!(text.contains("Avoid genres: horror"));
        assert!(!text.contains("Avoid tags"));
        assert!(text.contains("Platforms: PC, Nintendo"));
        assert!(text.contains("Released between 2015-01-01 and 2024-12-31"));
    }

    #[test]
    fn test_parse_reply_plain_array() {
        let games = parse_reply(r#"[{"name": "Outer Wilds"}]"#).unwrap();
        assert_eq!(games[0].name, "Outer Wilds");
    }

    #[test]
    fn test_parse_reply_fenced() {
        let games = parse_reply("```json\n[{\"name\": \"Celeste\"}]\n```").unwrap();
        assert_eq!(games[0].name, "Celeste");
    }

    #[test]
    fn test_parse_reply_not_array() {
        let err = parse_reply(r#"{"name": "Celeste"}"#).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Search error: Invalid response format from AI"
        );
    }

    #[test]
    fn test_parse_reply_prose() {
        assert!(parse_reply("Sure! Here are some games...").is_err());
    }

    #[test]
    fn test_request_shape() {
        let request = ChatRequest {
            model: "gpt-4",
            messages: vec![ChatMessage {
                role: "user",
                content: "rpg",
            }],
            temperature: 0.7,
            max_tokens: 2000,
        };
        let value = serde_json::to_value(&request).unwrap();
        assert_eq!(value["model"], "gpt-4");
        assert_eq!(value["messages"][0]["role"], "user");
        assert_eq!(value["max_tokens"], 2000);
    }
}
