//! Conversation steps and modes

use serde::{Deserialize, Serialize};
use std::fmt;

/// Position of a conversation in its state machine
///
/// Guided conversations walk `CollectIncluded` → `CollectExcluded` →
/// `CollectPlatforms` → `CollectDateRange` → `Search` → `Done`. Free-text
/// conversations go `CollectQuery` → `Search` → `Done`. `Failed` is the
/// error terminal; only a restart leaves it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Step {
    /// Created but `start()` has not completed yet
    NotStarted,
    /// Waiting for the tags/genres to include
    CollectIncluded,
    /// Waiting for the tags/genres to exclude
    CollectExcluded,
    /// Waiting for platform families
    CollectPlatforms,
    /// Waiting for a release window
    CollectDateRange,
    /// Waiting for a free-text description
    CollectQuery,
    /// A gateway call is outstanding
    Search,
    /// Results are shown
    Done,
    /// An error is shown
    Failed,
}

impl Step {
    /// The step a guided conversation moves to after confirming this one
    ///
    /// Terminal and free-text steps have no guided successor.
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::flow::Step;
    ///
    /// assert_eq!(Step::CollectIncluded.next(), Some(Step::CollectExcluded));
    /// assert_eq!(Step::CollectDateRange.next(), Some(Step::Search));
    /// assert_eq!(Step::Done.next(), None);
    /// ```
    pub fn next(self) -> Option<Step> {
        match self {
            Self::NotStarted => Some(Self::CollectIncluded),
            Self::CollectIncluded => Some(Self::CollectExcluded),
            Self::CollectExcluded => Some(Self::CollectPlatforms),
            Self::CollectPlatforms => Some(Self::CollectDateRange),
            Self::CollectDateRange | Self::CollectQuery => Some(Self::Search),
            Self::Search => Some(Self::Done),
            Self::Done | Self::Failed => None,
        }
    }

    /// Whether the step waits for user input
    pub fn is_collecting(self) -> bool {
        matches!(
            self,
            Self::CollectIncluded
                | Self::CollectExcluded
                | Self::CollectPlatforms
                | Self::CollectDateRange
                | Self::CollectQuery
        )
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NotStarted => "not_started",
            Self::CollectIncluded => "collect_included",
            Self::CollectExcluded => "collect_excluded",
            Self::CollectPlatforms => "collect_platforms",
            Self::CollectDateRange => "collect_date_range",
            Self::CollectQuery => "collect_query",
            Self::Search => "search",
            Self::Done => "done",
            Self::Failed => "failed",
        };
        write!(f, "{}", name)
    }
}

/// How a conversation collects its criteria
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowMode {
    /// Step-by-step filter selection
    #[default]
    Guided,
    /// A single free-text description
    FreeText,
}

impl FlowMode {
    /// Parse a flow mode from a string
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::flow::FlowMode;
    ///
    /// assert_eq!(FlowMode::parse_str("free_text").unwrap(), FlowMode::FreeText);
    /// assert!(FlowMode::parse_str("wizard").is_err());
    /// ```
    pub fn parse_str(s: &str) -> Result<Self, String> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "guided" => Ok(Self::Guided),
            "free_text" | "freetext" | "text" => Ok(Self::FreeText),
            other => Err(format!("Unknown flow mode: {}", other)),
        }
    }
}

impl fmt::Display for FlowMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Guided => write!(f, "guided"),
            Self::FreeText => write!(f, "free_text"),
        }
    }
}
