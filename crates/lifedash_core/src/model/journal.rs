//! Journal entry model.

use crate::model::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Dated reflection tagged with a pillar and a 1-5 mood score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    pub id: EntityId,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default)]
    pub content: String,
    #[serde(default)]
    pub category: String,
    pub pillar: String,
    pub mood: u8,
}

impl JournalEntry {
    /// Case-insensitive match against title and content.
    pub fn matches_text(&self, needle_lowercase: &str) -> bool {
        self.title.to_lowercase().contains(needle_lowercase)
            || self.content.to_lowercase().contains(needle_lowercase)
    }
}

/// Creation request for a journal entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewJournalEntry {
    pub date: NaiveDate,
    pub title: String,
    pub content: String,
    pub category: String,
    pub pillar: String,
    pub mood: u8,
}

/// Partial update for a journal entry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalPatch {
    pub date: Option<NaiveDate>,
    pub title: Option<String>,
    pub content: Option<String>,
    pub category: Option<String>,
    pub pillar: Option<String>,
    pub mood: Option<u8>,
}

/// Journal list filter; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct JournalFilter {
    /// Case-insensitive substring searched in title and content.
    pub search: Option<String>,
    pub pillar: Option<String>,
}
