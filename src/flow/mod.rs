//! Conversation flow
//!
//! This module contains the state machine that walks a user through the
//! guided filter steps (included tags, excluded tags, platforms, release
//! window) or a single free-text description, then runs one search.
//!
//! The controller owns the transcript and the filter accumulator; the
//! catalog loader and gateway are injected at construction so every
//! transition can be exercised with the in-memory fakes in [`fake`].

pub mod accumulator;
pub mod controller;
pub mod fake;
pub mod step;
pub mod transcript;

pub use accumulator::{DatePreset, DateRange, FilterAccumulator};
pub use controller::{ActivePrompt, ConversationController, CATALOG_ERROR, NO_RESULTS, SEARCH_ERROR};
pub use step::{FlowMode, Step};
pub use transcript::{Attachment, Author, Transcript, TranscriptMessage};
