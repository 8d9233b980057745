//! Keyword helpers for vibe search
//!
//! Plain substring matching over free text: mapping mood words to catalog
//! genre slugs, picking the meaningful words out of a "likes" sentence, and
//! deciding whether a game trips one of the user's dislikes.

use regex::Regex;
use std::sync::OnceLock;

/// Mood word to catalog genre slug, in match priority order
const GENRE_MAP: &[(&str, &str)] = &[
    ("action", "action"),
    ("adventure", "adventure"),
    ("rpg", "role-playing-games-rpg"),
    ("strategy", "strategy"),
    ("simulation", "simulation"),
    ("racing", "racing"),
    ("sports", "sports"),
    ("puzzle", "puzzle"),
    ("horror", "horror"),
    ("shooter", "shooter"),
    ("fighting", "fighting"),
    ("platformer", "platformer"),
    ("casual", "casual"),
    ("indie", "indie"),
    ("relaxing", "casual"),
    ("chill", "casual"),
    ("story", "adventure"),
    ("narrative", "adventure"),
    ("competitive", "multiplayer"),
    ("multiplayer", "multiplayer"),
    ("retro", "indie"),
];

const STOP_WORDS: &[&str] = &[
    "the", "a", "an", "and", "or", "but", "in", "on", "at", "to", "for", "of", "with", "by",
    "game", "games", "like", "love", "enjoy", "played", "really",
];

fn separator() -> Option<&'static Regex> {
    static SEPARATOR: OnceLock<Option<Regex>> = OnceLock::new();
    SEPARATOR
        .get_or_init(|| match Regex::new(r"[\s,]+") {
            Ok(re) => Some(re),
            Err(e) => {
                tracing::error!("Invalid keyword separator pattern: {}", e);
                None
            }
        })
        .as_ref()
}

/// Split free text into lowercase words on whitespace and commas
///
/// Yields no words if the separator cannot be compiled, which leaves a
/// vibe search unfiltered.
pub fn words(text: &str) -> Vec<String> {
    let Some(separator) = separator() else {
        return Vec::new();
    };
    separator
        .split(&text.to_lowercase())
        .filter(|w| !w.is_empty())
        .map(str::to_string)
        .collect()
}

/// Map the words of a vibe description to catalog genre slugs
///
/// A word matches every key it contains, so "rpgs" still maps to the RPG
/// genre. Duplicates are dropped, first occurrence wins.
///
/// # Examples
///
/// ```
/// use gamescout::gateway::keywords::extract_genres_from_vibe;
///
/// let genres = extract_genres_from_vibe("chill, story-driven RPG");
/// assert_eq!(genres, vec!["casual", "adventure", "role-playing-games-rpg"]);
/// ```
pub fn extract_genres_from_vibe(vibe: &str) -> Vec<String> {
    let mut genres: Vec<String> = Vec::new();
    for word in words(vibe) {
        for (key, slug) in GENRE_MAP {
            if word.contains(key) && !genres.iter().any(|g| g == slug) {
                genres.push((*slug).to_string());
            }
        }
    }
    genres
}

/// Pick up to three meaningful keywords from a "likes" description
///
/// Keeps words longer than three characters that are not stop words.
///
/// # Examples
///
/// ```
/// use gamescout::gateway::keywords::extract_main_keywords;
///
/// assert_eq!(
///     extract_main_keywords("I really love games like Hollow Knight and Celeste"),
///     "hollow knight celeste"
/// );
/// ```
pub fn extract_main_keywords(likes: &str) -> String {
    words(likes)
        .into_iter()
        .filter(|w| w.chars().count() > 3 && !STOP_WORDS.contains(&w.as_str()))
        .take(3)
        .collect::<Vec<_>>()
        .join(" ")
}

/// The parts of a game that dislikes are matched against
#[derive(Debug, Clone, Copy)]
pub struct DislikeSubject<'a> {
    /// Game title
    pub name: &'a str,
    /// Genre names
    pub genres: &'a [String],
    /// Tag names
    pub tags: &'a [String],
}

/// Whether a game trips one of the dislikes under strict matching
///
/// Terms of three or more characters are matched against the name, genre
/// names and tag names.
pub fn is_disliked_strict(subject: DislikeSubject<'_>, dislikes: &str) -> bool {
    let name = subject.name.to_lowercase();
    words(dislikes)
        .iter()
        .filter(|term| term.chars().count() > 2)
        .any(|term| {
            name.contains(term.as_str())
                || contains_term(subject.genres, term)
                || contains_term(subject.tags, term)
        })
}

/// Whether a game trips one of the dislikes under loose matching
///
/// Only terms of five or more characters count, and tags are ignored.
pub fn is_disliked_loose(subject: DislikeSubject<'_>, dislikes: &str) -> bool {
    let name = subject.name.to_lowercase();
    words(dislikes)
        .iter()
        .filter(|term| term.chars().count() > 4)
        .any(|term| name.contains(term.as_str()) || contains_term(subject.genres, term))
}

fn contains_term(names: &[String], term: &str) -> bool {
    names.iter().any(|n| n.to_lowercase().contains(term))
}
