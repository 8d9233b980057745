//! Selectable option catalog
//!
//! This module defines the vocabulary a user picks from during a guided
//! conversation (genres, tags and platforms) and the loader abstraction
//! that supplies it. Genres and tags come from a remote catalog; platforms
//! are a fixed enumeration.

pub mod http;

pub use http::HttpCatalogLoader;

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Kind of a selectable option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    /// A catalog genre (e.g. "Action")
    Genre,
    /// A catalog tag (e.g. "Open World")
    Tag,
    /// A hardware platform family
    Platform,
}

impl fmt::Display for OptionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Genre => write!(f, "genre"),
            Self::Tag => write!(f, "tag"),
            Self::Platform => write!(f, "platform"),
        }
    }
}

/// One selectable option
///
/// Options are immutable once loaded. `code` carries the numeric catalog
/// code where the search backend expects one (platform parent ids).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectionOption {
    /// Stable identifier
    pub id: String,
    /// Human readable name
    pub name: String,
    /// Value sent to the search backend
    pub slug: String,
    /// Genre, tag or platform
    pub kind: OptionKind,
    /// Numeric catalog code, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code: Option<u32>,
}

impl SelectionOption {
    /// Creates a new option without a numeric code
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::catalog::{OptionKind, SelectionOption};
    ///
    /// let rpg = SelectionOption::new("5", "RPG", "role-playing-games-rpg", OptionKind::Genre);
    /// assert_eq!(rpg.kind, OptionKind::Genre);
    /// assert!(rpg.code.is_none());
    /// ```
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        slug: impl Into<String>,
        kind: OptionKind,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            slug: slug.into(),
            kind,
            code: None,
        }
    }

    /// Attaches a numeric catalog code
    pub fn with_code(mut self, code: u32) -> Self {
        self.code = Some(code);
        self
    }

    /// Whether the option names the given label, by name or slug, ignoring case
    pub fn matches_label(&self, label: &str) -> bool {
        let label = label.trim();
        self.name.eq_ignore_ascii_case(label)
            || self.slug.eq_ignore_ascii_case(label)
            || self.id == label
    }
}

/// The fixed platform families offered by the platform step
///
/// Codes are the games catalog's parent platform ids.
///
/// # Examples
///
/// ```
/// use gamescout::catalog::platform_options;
///
/// let platforms = platform_options();
/// assert_eq!(platforms.len(), 4);
/// assert_eq!(platforms[0].name, "PC");
/// assert_eq!(platforms[0].code, Some(1));
/// ```
pub fn platform_options() -> Vec<SelectionOption> {
    [
        ("pc", "PC", 1),
        ("playstation", "PlayStation", 2),
        ("xbox", "Xbox", 3),
        ("nintendo", "Nintendo", 7),
    ]
    .into_iter()
    .map(|(slug, name, code)| {
        SelectionOption::new(slug, name, slug, OptionKind::Platform).with_code(code)
    })
    .collect()
}

/// Supplies the selectable option catalog
///
/// Called once per conversation. Implementations must not retry; the
/// conversation surfaces a failure and the user restarts.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    /// Load the full option catalog
    ///
    /// # Errors
    ///
    /// Returns `GameScoutError::CatalogLoad` if the catalog cannot be fetched
    async fn load(&self) -> Result<Vec<SelectionOption>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_option_kind_serialization() {
        assert_eq!(serde_json::to_string(&OptionKind::Genre).unwrap(), "\"genre\"");
        let kind: OptionKind = serde_json::from_str("\"platform\"").unwrap();
        assert_eq!(kind, OptionKind::Platform);
    }

    #[test]
    fn test_platform_codes() {
        let codes: Vec<(String, Option<u32>)> = platform_options()
            .into_iter()
            .map(|p| (p.name, p.code))
            .collect();
        assert_eq!(
            codes,
            vec![
                ("PC".to_string(), Some(1)),
                ("PlayStation".to_string(), Some(2)),
                ("Xbox".to_string(), Some(3)),
                ("Nintendo".to_string(), Some(7)),
            ]
        );
    }

    #[test]
    fn test_platforms_are_platform_kind() {
        assert!(platform_options()
            .iter()
            .all(|p| p.kind == OptionKind::Platform));
    }

    #[test]
    fn test_matches_label() {
        let option = SelectionOption::new("40", "Open World", "open-world", OptionKind::Tag);
        assert!(option.matches_label("open world"));
        assert!(option.matches_label(" OPEN-WORLD "));
        assert!(option.matches_label("40"));
        assert!(!option.matches_label("open"));
    }
}
