//! Filter accumulator
//!
//! Collects the selections confirmed at each guided step and serializes
//! them into the gateway's search payload. Each field is written exactly
//! once per conversation; only a restart clears them, all together.

use crate::catalog::{OptionKind, SelectionOption};
use crate::error::{GameScoutError, Result};
use crate::gateway::SearchPayload;

use chrono::Datelike;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive range of release years
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRange {
    /// First year
    pub from: i32,
    /// Last year
    pub to: i32,
}

impl DateRange {
    /// Creates a range, rejecting reversed bounds
    ///
    /// # Examples
    ///
    /// ```
    /// use gamescout::flow::DateRange;
    ///
    /// let range = DateRange::new(2015, 2024).unwrap();
    /// assert_eq!(range.as_query(), "2015-01-01,2024-12-31");
    /// assert!(DateRange::new(2024, 2015).is_err());
    /// ```
    pub fn new(from: i32, to: i32) -> Result<Self> {
        let range = Self { from, to };
        range.validate()?;
        Ok(range)
    }

    /// Reject reversed bounds
    ///
    /// The fields are public, so ranges built literally or deserialized
    /// are checked again before they reach a payload.
    pub fn validate(&self) -> Result<()> {
        if self.from > self.to {
            return Err(GameScoutError::InvalidSelection(format!(
                "date range starts after it ends: {} > {}",
                self.from, self.to
            ))
            .into());
        }
        Ok(())
    }

    /// Range as the gateway's `dates` parameter
    ///
    /// Years are zero-padded to four digits.
    pub fn as_query(&self) -> String {
        format!("{:04}-01-01,{:04}-12-31", self.from, self.to)
    }

    /// Common release windows relative to `current_year`
    pub fn presets(current_year: i32) -> Vec<DatePreset> {
        vec![
            DatePreset::new("Last year", current_year - 1, current_year),
            DatePreset::new("Last 5 years", current_year - 4, current_year),
            DatePreset::new("Last 10 years", current_year - 9, current_year),
            DatePreset::new("Classics (before 2000)", 1970, 1999),
        ]
    }

    /// Presets relative to today's date
    pub fn presets_for_today() -> Vec<DatePreset> {
        Self::presets(chrono::Local::now().year())
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.from == self.to {
            write!(f, "{}", self.from)
        } else {
            write!(f, "{} to {}", self.from, self.to)
        }
    }
}

/// A named release window offered by the date step
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatePreset {
    /// Display label
    pub label: String,
    /// Years covered
    pub range: DateRange,
}

impl DatePreset {
    fn new(label: &str, from: i32, to: i32) -> Self {
        Self {
            label: label.to_string(),
            range: DateRange { from, to },
        }
    }
}

/// Selections confirmed so far in a guided conversation
///
/// `None` means the step has not been confirmed; `Some(vec![])` means it
/// was confirmed with no constraint.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterAccumulator {
    included: Option<Vec<SelectionOption>>,
    excluded: Option<Vec<SelectionOption>>,
    platforms: Option<Vec<SelectionOption>>,
    date_range: Option<Option<DateRange>>,
}

fn freeze<T>(slot: &mut Option<T>, value: T, field: &str) -> Result<()> {
    if slot.is_some() {
        return Err(
            GameScoutError::InvalidSelection(format!("{} already confirmed", field)).into(),
        );
    }
    *slot = Some(value);
    Ok(())
}

impl FilterAccumulator {
    /// Creates an empty accumulator
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn set_included(&mut self, options: Vec<SelectionOption>) -> Result<()> {
        freeze(&mut self.included, options, "included tags")
    }

    pub(crate) fn set_excluded(&mut self, options: Vec<SelectionOption>) -> Result<()> {
        freeze(&mut self.excluded, options, "excluded tags")
    }

    pub(crate) fn set_platforms(&mut self, options: Vec<SelectionOption>) -> Result<()> {
        freeze(&mut self.platforms, options, "platforms")
    }

    pub(crate) fn set_date_range(&mut self, range: Option<DateRange>) -> Result<()> {
        freeze(&mut self.date_range, range, "date range")
    }

    /// Included tags and genres (empty until confirmed)
    pub fn included(&self) -> &[SelectionOption] {
        self.included.as_deref().unwrap_or_default()
    }

    /// Excluded tags and genres (empty until confirmed)
    pub fn excluded(&self) -> &[SelectionOption] {
        self.excluded.as_deref().unwrap_or_default()
    }

    /// Platform families (empty until confirmed)
    pub fn platforms(&self) -> &[SelectionOption] {
        self.platforms.as_deref().unwrap_or_default()
    }

    /// Release window, `None` for any time or not yet confirmed
    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range.flatten()
    }

    /// Number of guided steps confirmed so far
    pub fn confirmed_steps(&self) -> usize {
        [
            self.included.is_some(),
            self.excluded.is_some(),
            self.platforms.is_some(),
            self.date_range.is_some(),
        ]
        .iter()
        .filter(|confirmed| **confirmed)
        .count()
    }

    /// Whether nothing has been confirmed
    pub fn is_empty(&self) -> bool {
        self.confirmed_steps() == 0
    }

    /// Serialize into the gateway's search payload
    ///
    /// Tags and genres are partitioned by kind, platforms become their
    /// numeric codes, and the release window collapses to a date string.
    /// Unconfirmed or empty fields serialize as empty strings.
    pub fn to_payload(&self) -> SearchPayload {
        SearchPayload {
            tags: join_slugs(self.included(), OptionKind::Tag),
            genres: join_slugs(self.included(), OptionKind::Genre),
            exclude_tags: join_slugs(self.excluded(), OptionKind::Tag),
            exclude_genres: join_slugs(self.excluded(), OptionKind::Genre),
            platforms: self
                .platforms()
                .iter()
                .map(|p| p.code.map(|c| c.to_string()).unwrap_or_else(|| p.slug.clone()))
                .collect::<Vec<_>>()
                .join(","),
            dates: self
                .date_range()
                .map(|r| r.as_query())
                .unwrap_or_default(),
        }
    }
}

fn join_slugs(options: &[SelectionOption], kind: OptionKind) -> String {
    options
        .iter()
        .filter(|o| o.kind == kind)
        .map(|o| o.slug.as_str())
        .collect::<Vec<_>>()
        .join(",")
}
