//! Vibe search against the public games catalog
//!
//! Turns a mood description, a list of liked games and a list of dislikes
//! into a catalog query, filters the results against the dislikes, and
//! keeps the best three. A primary search is strict; the fallback search
//! broadens the query and relaxes the dislike filter.

use crate::config::CatalogConfig;
use crate::error::{GameScoutError, Result};
use crate::gateway::keywords::{
    extract_genres_from_vibe, extract_main_keywords, is_disliked_loose, is_disliked_strict,
    DislikeSubject,
};
use crate::gateway::GameResult;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Number of games kept from a vibe search
pub const VIBE_RESULT_LIMIT: usize = 3;

const PREVIEW_CHARS: usize = 200;

/// How strictly to search
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// Search by the full likes text plus vibe genres, strict dislike filter
    #[default]
    Primary,
    /// Search by the main keywords only, loose dislike filter
    Fallback,
}

/// A vibe search request
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VibeQuery {
    /// Mood or style description
    pub vibe: String,
    /// Games or themes the user likes
    pub likes: String,
    /// Terms to steer away from
    #[serde(default)]
    pub dislikes: String,
    /// Primary or fallback search
    #[serde(default, rename = "searchType")]
    pub search_type: SearchType,
}

impl VibeQuery {
    /// Creates a primary query
    pub fn new(
        vibe: impl Into<String>,
        likes: impl Into<String>,
        dislikes: impl Into<String>,
    ) -> Self {
        Self {
            vibe: vibe.into(),
            likes: likes.into(),
            dislikes: dislikes.into(),
            search_type: SearchType::Primary,
        }
    }

    /// The same query as a fallback search
    pub fn as_fallback(&self) -> Self {
        Self {
            search_type: SearchType::Fallback,
            ..self.clone()
        }
    }

    /// Catalog query parameters, excluding the API key
    pub fn query_params(&self, page_size: u32) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("page_size", page_size.to_string()),
            ("ordering", "-rating".to_string()),
        ];
        match self.search_type {
            SearchType::Primary => {
                params.push(("search", self.likes.clone()));
                let genres = extract_genres_from_vibe(&self.vibe);
                if !genres.is_empty() {
                    params.push(("genres", genres.join(",")));
                }
            }
            SearchType::Fallback => {
                params.push(("search", extract_main_keywords(&self.likes)));
            }
        }
        params
    }
}

/// Result of a vibe search
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VibeOutcome {
    /// At most three games, best first
    pub games: Vec<GameResult>,
    /// Which search produced them
    #[serde(rename = "searchType")]
    pub search_type: SearchType,
    /// Number of games kept
    #[serde(rename = "totalFound")]
    pub total_found: usize,
}

#[derive(Debug, Deserialize)]
struct CatalogPage {
    #[serde(default)]
    results: Vec<CatalogGame>,
}

#[derive(Debug, Deserialize)]
struct Named {
    name: String,
}

#[derive(Debug, Deserialize)]
struct CatalogGame {
    name: String,
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    description_raw: Option<String>,
    #[serde(default)]
    genres: Option<Vec<Named>>,
    #[serde(default)]
    tags: Option<Vec<Named>>,
    #[serde(default)]
    rating: Option<f64>,
    #[serde(default)]
    ratings_count: Option<u64>,
    #[serde(default)]
    released: Option<String>,
}

fn names(items: &Option<Vec<Named>>) -> Vec<String> {
    items
        .as_ref()
        .map(|v| v.iter().map(|n| n.name.clone()).collect())
        .unwrap_or_default()
}

impl CatalogGame {
    fn is_disliked(&self, query: &VibeQuery) -> bool {
        let genres = names(&self.genres);
        let tags = names(&self.tags);
        let subject = DislikeSubject {
            name: &self.name,
            genres: &genres,
            tags: &tags,
        };
        match query.search_type {
            SearchType::Primary => is_disliked_strict(subject, &query.dislikes),
            SearchType::Fallback => is_disliked_loose(subject, &query.dislikes),
        }
    }

    fn into_result(self) -> GameResult {
        let genres = names(&self.genres);

        let description = match self.description_raw.as_deref().filter(|d| !d.is_empty()) {
            Some(raw) => format!("{}...", raw.chars().take(PREVIEW_CHARS).collect::<String>()),
            None => {
                let kind = if genres.is_empty() {
                    "great".to_string()
                } else {
                    genres.join(", ")
                };
                format!(
                    "{} is a {} game that offers an engaging experience.",
                    self.name, kind
                )
            }
        };

        let released = self
            .released
            .clone()
            .filter(|r| !r.is_empty())
            .unwrap_or_else(|| "recently".to_string());
        let rating = self
            .rating
            .filter(|r| *r > 0.0)
            .map(|r| r.to_string())
            .unwrap_or_else(|| "highly".to_string());
        let reviews = self
            .ratings_count
            .filter(|c| *c > 0)
            .map(|c| c.to_string())
            .unwrap_or_else(|| "many".to_string());

        GameResult {
            name: self.name,
            slug: self.slug,
            description: Some(description),
            release_date: self.released,
            rating: self.rating,
            genres,
            platforms: Vec::new(),
            store_links: Vec::new(),
            details: Some(format!(
                "Released {}, rated {}/5 with {} reviews",
                released, rating, reviews
            )),
        }
    }
}

/// Client for vibe searches
///
/// # Examples
///
/// ```no_run
/// use gamescout::config::CatalogConfig;
/// use gamescout::gateway::{VibeQuery, VibeSearch};
/// use std::time::Duration;
///
/// # async fn example() -> gamescout::error::Result<()> {
/// let search = VibeSearch::new(CatalogConfig::default(), Duration::from_secs(30))?;
/// let outcome = search
///     .recommend(&VibeQuery::new("chill retro", "stardew valley", "horror"))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct VibeSearch {
    client: Client,
    config: CatalogConfig,
}

impl VibeSearch {
    /// Create a new vibe search client
    ///
    /// # Errors
    ///
    /// Returns error if HTTP client initialization fails
    pub fn new(config: CatalogConfig, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("gamescout/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| GameScoutError::Search(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Run one vibe search
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::Search` if the catalog cannot be reached or
    /// answers with a non-success status
    pub async fn recommend(&self, query: &VibeQuery) -> Result<VibeOutcome> {
        let url = format!("{}/games", self.config.api_base.trim_end_matches('/'));
        let mut params = query.query_params(self.config.page_size);
        params.push(("key", self.config.api_key.clone()));

        tracing::debug!(search_type = ?query.search_type, "Vibe search against {}", url);

        let response = self
            .client
            .get(&url)
            .query(&params)
            .send()
            .await
            .map_err(|e| {
                tracing::warn!("Games catalog request failed: {}", e);
                GameScoutError::Search(format!("Failed to reach games catalog: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::error!("Games catalog returned {}: {}", status, error_text);
            return Err(GameScoutError::Search(format!("API error: {}", status.as_u16())).into());
        }

        let page: CatalogPage = response.json().await.map_err(|e| {
            GameScoutError::Search(format!("Failed to parse games catalog response: {}", e))
        })?;

        let games = filter_and_rank(page.results, query);
        tracing::info!(
            search_type = ?query.search_type,
            results = games.len(),
            "Vibe search finished"
        );

        Ok(VibeOutcome {
            total_found: games.len(),
            games,
            search_type: query.search_type,
        })
    }
}

fn filter_and_rank(results: Vec<CatalogGame>, query: &VibeQuery) -> Vec<GameResult> {
    results
        .into_iter()
        .filter(|game| !game.is_disliked(query))
        .take(VIBE_RESULT_LIMIT)
        .map(CatalogGame::into_result)
        .collect()
}
