//! Conversation flow controller
//!
//! Drives one conversation through its steps, keeps the transcript and the
//! filter accumulator, and calls the gateway once at the terminal step.

use crate::catalog::{platform_options, CatalogLoader, OptionKind, SelectionOption};
use crate::error::{GameScoutError, Result};
use crate::flow::accumulator::{DatePreset, DateRange, FilterAccumulator};
use crate::flow::step::{FlowMode, Step};
use crate::flow::transcript::{Attachment, Transcript, TranscriptMessage};
use crate::gateway::{GameResult, Gateway};

use chrono::Datelike;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;

/// Banner shown when the option catalog cannot be loaded
pub const CATALOG_ERROR: &str = "Failed to load tags. Please try again.";

/// Message shown when a search fails without a backend message
pub const SEARCH_ERROR: &str = "Failed to get game recommendations. Please try again.";

/// Message shown when a search returns no games
pub const NO_RESULTS: &str = "I couldn't find any games matching that search. Please try another!";

const INCLUDED_PROMPT: &str =
    "What kind of games are you in the mood for? Pick any genres or tags you'd like to see.";
const EXCLUDED_PROMPT: &str = "Anything you'd rather avoid?";
const PLATFORMS_PROMPT: &str = "Which platforms do you play on?";
const DATES_PROMPT: &str = "How recent should the games be?";
const QUERY_PROMPT: &str = "What kind of game are you looking for? (e.g., rpg, cyberpunk, puzzle)";
const SEARCHING: &str = "Searching...";

/// What the presentation layer needs to render the step awaiting input
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivePrompt {
    /// Step awaiting confirmation
    pub step: Step,
    /// Prompt text
    pub prompt: String,
    /// Options that may be selected (empty for date and query steps)
    pub candidates: Vec<SelectionOption>,
    /// Release window presets (date step only)
    pub presets: Vec<DatePreset>,
    /// Id of the prompt message
    pub message_id: u64,
}

/// State machine for one recommendation conversation
///
/// The controller only accepts a confirmation for the step it is at;
/// anything else fails with `GameScoutError::StaleStep` and leaves the
/// conversation untouched. While a search is outstanding the step is
/// `Search`, so no second search can be started.
///
/// # Examples
///
/// ```
/// use gamescout::catalog::{OptionKind, SelectionOption};
/// use gamescout::flow::fake::{FakeCatalog, FakeGateway};
/// use gamescout::flow::{ConversationController, Step};
/// use gamescout::gateway::GameResult;
/// use std::sync::Arc;
///
/// # #[tokio::main]
/// # async fn main() -> anyhow::Result<()> {
/// let rpg = SelectionOption::new("5", "RPG", "rpg", OptionKind::Genre);
/// let catalog = Arc::new(FakeCatalog::with_options(vec![rpg.clone()]));
/// let gateway = Arc::new(FakeGateway::with_games(vec![GameResult::named("Baldur's Gate 3")]));
///
/// let mut controller = ConversationController::new(catalog, gateway);
/// controller.start().await?;
/// controller.confirm_included(&[rpg])?;
/// controller.confirm_excluded(&[])?;
/// controller.confirm_platforms(&[])?;
/// let games = controller.confirm_date_range(None).await?;
///
/// assert_eq!(games.len(), 1);
/// assert_eq!(controller.step(), Step::Done);
/// # Ok(())
/// # }
/// ```
pub struct ConversationController {
    id: Uuid,
    catalog: Arc<dyn CatalogLoader>,
    gateway: Arc<dyn Gateway>,
    options: Vec<SelectionOption>,
    accumulator: FilterAccumulator,
    transcript: Transcript,
    step: Step,
    mode: FlowMode,
    banner: Option<String>,
    current_year: i32,
}

impl ConversationController {
    /// Creates a controller that has not started yet
    ///
    /// # Arguments
    ///
    /// * `catalog` - Source of the selectable genres and tags
    /// * `gateway` - Service that turns criteria into games
    pub fn new(catalog: Arc<dyn CatalogLoader>, gateway: Arc<dyn Gateway>) -> Self {
        Self {
            id: Uuid::new_v4(),
            catalog,
            gateway,
            options: Vec::new(),
            accumulator: FilterAccumulator::new(),
            transcript: Transcript::new(),
            step: Step::NotStarted,
            mode: FlowMode::Guided,
            banner: None,
            current_year: chrono::Local::now().year(),
        }
    }

    /// Anchor the date presets to a fixed year instead of today
    pub fn with_current_year(mut self, year: i32) -> Self {
        self.current_year = year;
        self
    }

    /// Conversation id, regenerated on every start
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current step
    pub fn step(&self) -> Step {
        self.step
    }

    /// How criteria are being collected
    pub fn mode(&self) -> FlowMode {
        self.mode
    }

    /// Selections confirmed so far
    pub fn accumulator(&self) -> &FilterAccumulator {
        &self.accumulator
    }

    /// Messages in order
    pub fn transcript(&self) -> &[TranscriptMessage] {
        self.transcript.messages()
    }

    /// Blocking error banner, set when the catalog failed to load
    pub fn banner(&self) -> Option<&str> {
        self.banner.as_deref()
    }

    /// Catalog fetched by the last start
    pub fn options(&self) -> &[SelectionOption] {
        &self.options
    }

    fn reset(&mut self) {
        self.id = Uuid::new_v4();
        self.options.clear();
        self.accumulator = FilterAccumulator::new();
        self.transcript.clear();
        self.banner = None;
        self.step = Step::NotStarted;
    }

    /// Begin a guided conversation
    ///
    /// Discards any previous state, loads the option catalog once and asks
    /// for the genres and tags to include.
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::CatalogLoad` if the catalog cannot be
    /// fetched. The transcript stays empty, the banner is set and the
    /// conversation is `Failed` until restarted.
    pub async fn start(&mut self) -> Result<()> {
        self.reset();
        self.mode = FlowMode::Guided;
        tracing::info!(conversation = %self.id, "Starting guided conversation");

        let options = match self.catalog.load().await {
            Ok(options) => options,
            Err(err) => {
                tracing::error!(conversation = %self.id, "Failed to load option catalog: {:#}", err);
                self.banner = Some(CATALOG_ERROR.to_string());
                self.step = Step::Failed;
                let detail = match err.downcast_ref::<GameScoutError>() {
                    Some(GameScoutError::CatalogLoad(message)) => message.clone(),
                    _ => err.to_string(),
                };
                return Err(GameScoutError::CatalogLoad(detail).into());
            }
        };

        // Platforms come from the fixed enumeration, never the catalog
        self.options = options
            .into_iter()
            .filter(|o| o.kind != OptionKind::Platform)
            .collect();
        tracing::debug!(conversation = %self.id, "Loaded {} catalog options", self.options.len());

        self.advance();
        Ok(())
    }

    /// Begin a free-text conversation
    ///
    /// Discards any previous state and asks for a description. No catalog
    /// is loaded.
    pub fn start_free_text(&mut self) {
        self.reset();
        self.mode = FlowMode::FreeText;
        tracing::info!(conversation = %self.id, "Starting free-text conversation");
        self.enter(Step::CollectQuery);
    }

    /// Discard everything and start over in the same mode
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::CatalogLoad` if a guided restart cannot
    /// fetch the catalog
    pub async fn restart(&mut self) -> Result<()> {
        tracing::info!(conversation = %self.id, step = %self.step, "Restarting conversation");
        match self.mode {
            FlowMode::Guided => self.start().await,
            FlowMode::FreeText => {
                self.start_free_text();
                Ok(())
            }
        }
    }

    /// Confirm the genres and tags to include
    ///
    /// An empty selection means no constraint.
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::StaleStep` if the conversation is not
    /// collecting included tags, or `GameScoutError::InvalidSelection` if
    /// an option was not offered
    pub fn confirm_included(&mut self, selected: &[SelectionOption]) -> Result<()> {
        self.ensure_step(Step::CollectIncluded)?;
        let chosen = self.resolve(selected)?;
        let summary = summarize(&chosen, "Anything");
        self.accumulator.set_included(chosen)?;
        self.transcript.push_user(summary);
        self.advance();
        Ok(())
    }

    /// Confirm the genres and tags to exclude
    ///
    /// # Errors
    ///
    /// Same as [`confirm_included`](Self::confirm_included)
    pub fn confirm_excluded(&mut self, selected: &[SelectionOption]) -> Result<()> {
        self.ensure_step(Step::CollectExcluded)?;
        let chosen = self.resolve(selected)?;
        let summary = summarize(&chosen, "Nothing");
        self.accumulator.set_excluded(chosen)?;
        self.transcript.push_user(summary);
        self.advance();
        Ok(())
    }

    /// Confirm the platform families
    ///
    /// # Errors
    ///
    /// Same as [`confirm_included`](Self::confirm_included)
    pub fn confirm_platforms(&mut self, selected: &[SelectionOption]) -> Result<()> {
        self.ensure_step(Step::CollectPlatforms)?;
        let chosen = self.resolve(selected)?;
        let summary = summarize(&chosen, "Anything");
        self.accumulator.set_platforms(chosen)?;
        self.transcript.push_user(summary);
        self.advance();
        Ok(())
    }

    /// Confirm the release window and run the search
    ///
    /// `None` means any time. The gateway is called exactly once; its
    /// outcome replaces the pending message.
    ///
    /// # Returns
    ///
    /// The games in gateway order (possibly empty)
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::StaleStep` if the conversation is not at
    /// the date step, `GameScoutError::InvalidSelection` for a reversed
    /// range (nothing changes), or `GameScoutError::Search` if the gateway
    /// failed.
    /// On a search failure the error is already in the transcript and the
    /// accumulator is left intact.
    pub async fn confirm_date_range(&mut self, range: Option<DateRange>) -> Result<Vec<GameResult>> {
        self.ensure_step(Step::CollectDateRange)?;
        if let Some(range) = &range {
            range.validate()?;
        }
        self.accumulator.set_date_range(range)?;
        self.transcript.push_user(
            range
                .map(|r| r.to_string())
                .unwrap_or_else(|| "Any time".to_string()),
        );

        let payload = self.accumulator.to_payload();
        self.begin_search();
        tracing::info!(conversation = %self.id, "Searching with filters");
        tracing::debug!(conversation = %self.id, ?payload, "Search payload");

        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.search(&payload).await;
        self.settle(outcome, "Based on your filters")
    }

    /// Submit a free-text description and run the search
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::StaleStep` outside the query step,
    /// `GameScoutError::InvalidSelection` for blank text, or
    /// `GameScoutError::Search` if the gateway failed
    pub async fn submit_query(&mut self, text: &str) -> Result<Vec<GameResult>> {
        self.ensure_step(Step::CollectQuery)?;
        let query = text.trim();
        if query.is_empty() {
            return Err(GameScoutError::InvalidSelection("query must not be blank".to_string()).into());
        }

        self.transcript.push_user(query);
        self.begin_search();
        tracing::info!(conversation = %self.id, query = %query, "Searching with free text");

        let gateway = Arc::clone(&self.gateway);
        let outcome = gateway.ask(query).await;
        self.settle(outcome, &format!("Based on your search for \"{}\"", query))
    }

    /// The step awaiting input, if any
    pub fn active_prompt(&self) -> Option<ActivePrompt> {
        if !self.step.is_collecting() {
            return None;
        }
        let message = self.transcript.last()?;

        let (candidates, presets) = match &message.attachment {
            Some(Attachment::Options { candidates, .. }) => (candidates.clone(), Vec::new()),
            Some(Attachment::DateRanges { presets }) => (Vec::new(), presets.clone()),
            _ => (Vec::new(), Vec::new()),
        };

        Some(ActivePrompt {
            step: self.step,
            prompt: message.text.clone(),
            candidates,
            presets,
            message_id: message.id,
        })
    }

    /// Whether a message still accepts input
    ///
    /// Only the last message is interactive, and only while the
    /// conversation waits for input.
    pub fn is_interactive(&self, message_id: u64) -> bool {
        self.step.is_collecting()
            && self
                .transcript
                .last()
                .map(|m| m.id == message_id)
                .unwrap_or(false)
    }

    fn ensure_step(&self, expected: Step) -> Result<()> {
        if self.step != expected {
            tracing::warn!(
                conversation = %self.id,
                "Rejected confirmation for {} while at {}",
                expected,
                self.step
            );
            return Err(GameScoutError::StaleStep {
                expected,
                current: self.step,
            }
            .into());
        }
        Ok(())
    }

    fn candidates(&self, step: Step) -> Vec<SelectionOption> {
        match step {
            Step::CollectIncluded => self.options.clone(),
            Step::CollectExcluded => {
                let included = self.accumulator.included();
                self.options
                    .iter()
                    .filter(|o| !included.iter().any(|i| same_option(i, o)))
                    .cloned()
                    .collect()
            }
            Step::CollectPlatforms => platform_options(),
            _ => Vec::new(),
        }
    }

    /// Check a selection against the candidates of the current step and
    /// collapse duplicates, keeping first-seen order
    fn resolve(&self, selected: &[SelectionOption]) -> Result<Vec<SelectionOption>> {
        let candidates = self.candidates(self.step);
        let mut chosen: Vec<SelectionOption> = Vec::with_capacity(selected.len());

        for option in selected {
            let offered = candidates
                .iter()
                .find(|c| same_option(c, option))
                .ok_or_else(|| {
                    GameScoutError::InvalidSelection(format!(
                        "{} ({}) is not offered at {}",
                        option.name, option.kind, self.step
                    ))
                })?;
            if !chosen.iter().any(|c| same_option(c, offered)) {
                chosen.push(offered.clone());
            }
        }
        Ok(chosen)
    }

    /// Move to `step` and append its prompt
    fn enter(&mut self, step: Step) {
        let (text, attachment) = match step {
            Step::CollectIncluded | Step::CollectExcluded | Step::CollectPlatforms => {
                let text = match step {
                    Step::CollectIncluded => INCLUDED_PROMPT,
                    Step::CollectExcluded => EXCLUDED_PROMPT,
                    _ => PLATFORMS_PROMPT,
                };
                let attachment = Attachment::Options {
                    step,
                    candidates: self.candidates(step),
                };
                (text, Some(attachment))
            }
            Step::CollectDateRange => (
                DATES_PROMPT,
                Some(Attachment::DateRanges {
                    presets: DateRange::presets(self.current_year),
                }),
            ),
            Step::CollectQuery => (QUERY_PROMPT, None),
            _ => {
                self.step = step;
                return;
            }
        };

        self.step = step;
        self.transcript.push_system(text, attachment);
        tracing::debug!(conversation = %self.id, "Entered step {}", step);
    }

    /// Move to the successor of the current step
    ///
    /// Collecting steps lead to `Search` and `Search` leads to `Done`.
    fn advance(&mut self) {
        if let Some(next) = self.step.next() {
            self.enter(next);
        }
    }

    fn begin_search(&mut self) {
        self.advance();
        self.transcript.push_pending(SEARCHING);
    }

    fn settle(
        &mut self,
        outcome: Result<Vec<GameResult>>,
        lead: &str,
    ) -> Result<Vec<GameResult>> {
        match outcome {
            Ok(games) => {
                let text = if games.is_empty() {
                    NO_RESULTS.to_string()
                } else {
                    format!("{}, here are {} games you might enjoy:", lead, games.len())
                };
                tracing::info!(conversation = %self.id, "Search returned {} games", games.len());
                self.transcript.replace_pending(
                    text,
                    Some(Attachment::Results {
                        games: games.clone(),
                        restartable: true,
                    }),
                );
                self.advance();
                Ok(games)
            }
            Err(err) => {
                tracing::error!(conversation = %self.id, "Search failed: {:#}", err);
                let text = match err.downcast_ref::<GameScoutError>() {
                    Some(GameScoutError::Search(message)) if !message.trim().is_empty() => {
                        message.clone()
                    }
                    _ => SEARCH_ERROR.to_string(),
                };
                self.transcript
                    .replace_pending(text.clone(), Some(Attachment::Error { restartable: true }));
                self.step = Step::Failed;
                Err(GameScoutError::Search(text).into())
            }
        }
    }
}

fn same_option(a: &SelectionOption, b: &SelectionOption) -> bool {
    a.kind == b.kind && a.id == b.id
}

fn summarize(options: &[SelectionOption], empty: &str) -> String {
    if options.is_empty() {
        empty.to_string()
    } else {
        options
            .iter()
            .map(|o| o.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}
