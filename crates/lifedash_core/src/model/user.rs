//! User aggregate: profile, streak state and completion ledger.
//!
//! # Invariants
//! - `daily_completion_history` holds at most one record per date.
//! - `last_streak_update` is the only guard against a second streak award on
//!   the same calendar day.
//! - Every field defaults when missing, so older snapshots still load.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Streak value recorded on the day it was awarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakRecord {
    pub date: NaiveDate,
    pub streak: u32,
}

/// Completed/total counters for one slice of the `today` bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompletionTally {
    pub completed: u32,
    pub total: u32,
}

impl CompletionTally {
    /// `completed / total` in `0.0..=1.0`; `0.0` when empty.
    pub fn ratio(&self) -> f64 {
        if self.total == 0 {
            0.0
        } else {
            f64::from(self.completed) / f64::from(self.total)
        }
    }

    pub fn is_all_done(&self) -> bool {
        self.total > 0 && self.completed == self.total
    }
}

/// Snapshot of today's goals as of the latest toggle on `date`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyCompletion {
    pub date: NaiveDate,
    pub completed: u32,
    pub total: u32,
    #[serde(default)]
    pub pillars: BTreeMap<String, CompletionTally>,
}

impl DailyCompletion {
    pub fn tally(&self) -> CompletionTally {
        CompletionTally {
            completed: self.completed,
            total: self.total,
        }
    }
}

/// Singleton user aggregate.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct User {
    pub name: String,
    pub avatar: String,
    pub current_streak: u32,
    pub completed_goals: u32,
    pub last_streak_update: Option<NaiveDate>,
    pub streak_history: Vec<StreakRecord>,
    pub daily_completion_history: Vec<DailyCompletion>,
}

impl Default for User {
    fn default() -> Self {
        Self {
            name: "Friend".to_string(),
            avatar: String::new(),
            current_streak: 0,
            completed_goals: 0,
            last_streak_update: None,
            streak_history: Vec::new(),
            daily_completion_history: Vec::new(),
        }
    }
}

impl User {
    pub fn completion_on(&self, date: NaiveDate) -> Option<&DailyCompletion> {
        self.daily_completion_history
            .iter()
            .find(|record| record.date == date)
    }

    /// Replaces the record for `record.date` or appends a new one.
    pub fn upsert_completion(&mut self, record: DailyCompletion) {
        match self
            .daily_completion_history
            .iter_mut()
            .find(|existing| existing.date == record.date)
        {
            Some(existing) => *existing = record,
            None => self.daily_completion_history.push(record),
        }
    }
}

/// Partial update for the user profile fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserPatch {
    pub name: Option<String>,
    pub avatar: Option<String>,
}
