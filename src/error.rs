//! Error types for Game Scout
//!
//! This module defines all error types used throughout the application,
//! using `thiserror` for ergonomic error handling.

use crate::flow::Step;
use thiserror::Error;

/// Main error type for Game Scout operations
///
/// Covers configuration problems, the two conversation failure kinds
/// (catalog load and search), misuse of the conversation controller, and
/// JSON serialization failures. Transport and file errors are folded
/// into the kind of the operation that hit them.
#[derive(Error, Debug)]
pub enum GameScoutError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// The option catalog could not be fetched
    #[error("Catalog load error: {0}")]
    CatalogLoad(String),

    /// The recommendation gateway failed or returned an error body
    #[error("Search error: {0}")]
    Search(String),

    /// A confirmation arrived for a step that is not the active one
    #[error("Stale step: expected {expected}, conversation is at {current}")]
    StaleStep {
        /// The step the confirmation was addressed to
        expected: Step,
        /// The step the conversation is actually at
        current: Step,
    },

    /// A selection referenced an option that was not offered
    #[error("Invalid selection: {0}")]
    InvalidSelection(String),

    /// JSON serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type alias for Game Scout operations
///
/// Uses `anyhow::Error` so context can be attached freely; typed
/// failures are recovered with `downcast_ref::<GameScoutError>()`.
pub type Result<T> = anyhow::Result<T>;
