//! Game Scout - conversational game recommendation library
//!
//! This library walks a user through a short conversation (genres and tags
//! to include and exclude, platforms, release window, or a single free-text
//! description) and forwards the collected criteria to a remote
//! recommendation service.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `flow`: Conversation state machine, transcript and filter accumulator
//! - `catalog`: Selectable options and the catalog loader
//! - `gateway`: Recommendation backends (filter proxy, LLM completion, vibe search)
//! - `commands`: CLI command handlers and terminal rendering
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use gamescout::catalog::HttpCatalogLoader;
//! use gamescout::gateway::create_gateway;
//! use gamescout::{Config, ConversationController};
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     config.validate()?;
//!
//!     let catalog = Arc::new(HttpCatalogLoader::new(
//!         config.catalog_settings(),
//!         Duration::from_secs(config.gateway.timeout_seconds),
//!     )?);
//!     let gateway = create_gateway(&config.gateway)?;
//!
//!     let mut controller = ConversationController::new(catalog, gateway);
//!     controller.start().await?;
//!     Ok(())
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod flow;
pub mod gateway;

// Re-export commonly used types
pub use catalog::{CatalogLoader, OptionKind, SelectionOption};
pub use config::Config;
pub use error::{GameScoutError, Result};
pub use flow::{ConversationController, DateRange, Step};
pub use gateway::{GameResult, Gateway, SearchPayload};
