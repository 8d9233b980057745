//! In-memory collaborators for conversation tests
//!
//! [`FakeCatalog`] and [`FakeGateway`] replace the HTTP catalog loader and
//! recommendation gateway. Responses are scripted up front and every call
//! is recorded so tests can assert on what the controller sent.
//!
//! # Example
//!
//! ```
//! use gamescout::catalog::{OptionKind, SelectionOption};
//! use gamescout::flow::fake::{FakeCatalog, FakeGateway};
//! use gamescout::flow::ConversationController;
//! use gamescout::gateway::GameResult;
//! use std::sync::Arc;
//!
//! # #[tokio::main]
//! # async fn main() {
//! let catalog = Arc::new(FakeCatalog::with_options(vec![SelectionOption::new(
//!     "5", "RPG", "rpg", OptionKind::Genre,
//! )]));
//! let gateway = Arc::new(FakeGateway::with_games(vec![GameResult::named("Hades")]));
//!
//! let mut controller = ConversationController::new(catalog.clone(), gateway.clone());
//! controller.start().await.unwrap();
//! assert_eq!(catalog.calls(), 1);
//! # }
//! ```

use crate::catalog::{CatalogLoader, SelectionOption};
use crate::error::{GameScoutError, Result};
use crate::gateway::{GameResult, Gateway, SearchPayload};

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Mutex, MutexGuard, PoisonError};

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// A scripted response: either a value or a `GameScoutError` message
type Scripted<T> = std::result::Result<T, String>;

/// Catalog loader with scripted responses
///
/// Responses are consumed in order; the last one repeats once the script
/// runs out.
#[derive(Debug, Default)]
pub struct FakeCatalog {
    script: Mutex<VecDeque<Scripted<Vec<SelectionOption>>>>,
    last: Mutex<Option<Scripted<Vec<SelectionOption>>>>,
    calls: Mutex<usize>,
}

impl FakeCatalog {
    /// Loader that always returns `options`
    pub fn with_options(options: Vec<SelectionOption>) -> Self {
        let fake = Self::default();
        fake.push_ok(options);
        fake
    }

    /// Loader that always fails with `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let fake = Self::default();
        fake.push_err(message);
        fake
    }

    /// Queue a successful load
    pub fn push_ok(&self, options: Vec<SelectionOption>) {
        lock(&self.script).push_back(Ok(options));
    }

    /// Queue a failed load
    pub fn push_err(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Number of `load` calls so far
    pub fn calls(&self) -> usize {
        *lock(&self.calls)
    }
}

#[async_trait]
impl CatalogLoader for FakeCatalog {
    async fn load(&self) -> Result<Vec<SelectionOption>> {
        *lock(&self.calls) += 1;
        let next = lock(&self.script).pop_front();
        let response = match next {
            Some(response) => {
                *lock(&self.last) = Some(response.clone());
                response
            }
            None => lock(&self.last)
                .clone()
                .unwrap_or_else(|| Ok(Vec::new())),
        };
        response.map_err(|message| GameScoutError::CatalogLoad(message).into())
    }
}

/// A call received by [`FakeGateway`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GatewayCall {
    /// A structured search
    Search(SearchPayload),
    /// A free-text query
    Ask(String),
}

/// Gateway with scripted responses
///
/// Responses are consumed in order; the last one repeats once the script
/// runs out.
#[derive(Debug, Default)]
pub struct FakeGateway {
    script: Mutex<VecDeque<Scripted<Vec<GameResult>>>>,
    last: Mutex<Option<Scripted<Vec<GameResult>>>>,
    calls: Mutex<Vec<GatewayCall>>,
}

impl FakeGateway {
    /// Gateway that always returns `games`
    pub fn with_games(games: Vec<GameResult>) -> Self {
        let fake = Self::default();
        fake.push_ok(games);
        fake
    }

    /// Gateway that always fails with a search error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        let fake = Self::default();
        fake.push_err(message);
        fake
    }

    /// Queue a successful response
    pub fn push_ok(&self, games: Vec<GameResult>) {
        lock(&self.script).push_back(Ok(games));
    }

    /// Queue a failed response
    pub fn push_err(&self, message: impl Into<String>) {
        lock(&self.script).push_back(Err(message.into()));
    }

    /// Every call received so far, in order
    pub fn calls(&self) -> Vec<GatewayCall> {
        lock(&self.calls).clone()
    }

    /// Payloads of the structured searches received so far
    pub fn payloads(&self) -> Vec<SearchPayload> {
        lock(&self.calls)
            .iter()
            .filter_map(|call| match call {
                GatewayCall::Search(payload) => Some(payload.clone()),
                GatewayCall::Ask(_) => None,
            })
            .collect()
    }

    fn respond(&self, call: GatewayCall) -> Result<Vec<GameResult>> {
        lock(&self.calls).push(call);
        let next = lock(&self.script).pop_front();
        let response = match next {
            Some(response) => {
                *lock(&self.last) = Some(response.clone());
                response
            }
            None => lock(&self.last)
                .clone()
                .unwrap_or_else(|| Ok(Vec::new())),
        };
        response.map_err(|message| GameScoutError::Search(message).into())
    }
}

#[async_trait]
impl Gateway for FakeGateway {
    async fn search(&self, payload: &SearchPayload) -> Result<Vec<GameResult>> {
        self.respond(GatewayCall::Search(payload.clone()))
    }

    async fn ask(&self, query: &str) -> Result<Vec<GameResult>> {
        self.respond(GatewayCall::Ask(query.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::OptionKind;

    #[tokio::test]
    async fn test_fake_catalog_script_then_repeat() {
        let catalog = FakeCatalog::failing("down");
        catalog.push_ok(vec![SelectionOption::new("1", "Action", "action", OptionKind::Genre)]);

        assert!(catalog.load().await.is_err());
        assert_eq!(catalog.load().await.unwrap().len(), 1);
        assert_eq!(catalog.load().await.unwrap().len(), 1);
        assert_eq!(catalog.calls(), 3);
    }

    #[tokio::test]
    async fn test_fake_gateway_records_calls() {
        let gateway = FakeGateway::with_games(vec![GameResult::named("Celeste")]);
        gateway.ask("platformer").await.unwrap();
        gateway.search(&SearchPayload::default()).await.unwrap();

        assert_eq!(
            gateway.calls(),
            vec![
                GatewayCall::Ask("platformer".to_string()),
                GatewayCall::Search(SearchPayload::default()),
            ]
        );
        assert_eq!(gateway.payloads().len(), 1);
    }

    #[tokio::test]
    async fn test_fake_gateway_error_is_search_error() {
        let gateway = FakeGateway::failing("nope");
        let err = gateway.ask("x").await.unwrap_err();
        assert!(matches!(
            err.downcast_ref::<GameScoutError>(),
            Some(GameScoutError::Search(msg)) if msg == "nope"
        ));
    }
}
