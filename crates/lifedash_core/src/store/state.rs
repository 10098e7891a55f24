//! Serializable store state (the persisted snapshot document).
//!
//! # Responsibility
//! - Hold every collection in one value that can be cloned, compared and
//!   serialized wholesale.
//! - Tolerate older snapshots that predate newer fields.
//!
//! # Invariants
//! - All fields default when missing from a snapshot.
//! - Goal buckets are independent ordered lists.

use crate::config::DEFAULT_PILLARS;
use crate::model::achievement::Achievement;
use crate::model::goal::{Goal, Period};
use crate::model::journal::JournalEntry;
use crate::model::time_log::TimeLog;
use crate::model::user::User;
use crate::model::vision::Vision;
use crate::model::EntityId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Goals grouped by period bucket.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GoalBuckets {
    pub today: Vec<Goal>,
    pub weekly: Vec<Goal>,
    pub monthly: Vec<Goal>,
}

impl GoalBuckets {
    pub fn bucket(&self, period: Period) -> &[Goal] {
        match period {
            Period::Today => &self.today,
            Period::Weekly => &self.weekly,
            Period::Monthly => &self.monthly,
        }
    }

    pub fn bucket_mut(&mut self, period: Period) -> &mut Vec<Goal> {
        match period {
            Period::Today => &mut self.today,
            Period::Weekly => &mut self.weekly,
            Period::Monthly => &mut self.monthly,
        }
    }

    /// Every goal with its bucket, in `Period::ALL` order.
    pub fn iter_all(&self) -> impl Iterator<Item = (Period, &Goal)> {
        Period::ALL
            .into_iter()
            .flat_map(move |period| self.bucket(period).iter().map(move |goal| (period, goal)))
    }

    pub fn iter_all_mut(&mut self) -> impl Iterator<Item = &mut Goal> {
        self.today
            .iter_mut()
            .chain(self.weekly.iter_mut())
            .chain(self.monthly.iter_mut())
    }

    pub fn retain_all(&mut self, mut keep: impl FnMut(&Goal) -> bool) {
        self.today.retain(|goal| keep(goal));
        self.weekly.retain(|goal| keep(goal));
        self.monthly.retain(|goal| keep(goal));
    }
}

/// Entire store content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoreState {
    pub user: User,
    /// Ordered, unique, never empty once loaded into a store.
    pub pillars: Vec<String>,
    pub goals: GoalBuckets,
    pub journal_entries: Vec<JournalEntry>,
    pub time_logs: Vec<TimeLog>,
    pub visions: Vec<Vision>,
    pub achievements: Vec<Achievement>,
    /// Pillar name → free-text focus description.
    pub current_focus: BTreeMap<String, String>,
    /// Highest id handed out so far.
    pub last_issued_id: EntityId,
}

impl Default for StoreState {
    fn default() -> Self {
        Self::with_pillars(DEFAULT_PILLARS.iter().map(|name| name.to_string()))
    }
}

impl StoreState {
    /// Empty state seeded with the given pillars.
    pub fn with_pillars(pillars: impl IntoIterator<Item = String>) -> Self {
        Self {
            user: User::default(),
            pillars: pillars.into_iter().collect(),
            goals: GoalBuckets::default(),
            journal_entries: Vec::new(),
            time_logs: Vec::new(),
            visions: Vec::new(),
            achievements: Vec::new(),
            current_focus: BTreeMap::new(),
            last_issued_id: 0,
        }
    }

    /// Largest id present in any collection (subgoals included).
    pub fn max_entity_id(&self) -> EntityId {
        let goal_ids = self.goals.iter_all().flat_map(|(_, goal)| {
            std::iter::once(goal.id).chain(goal.subgoals.iter().map(|subgoal| subgoal.id))
        });
        goal_ids
            .chain(self.journal_entries.iter().map(|entry| entry.id))
            .chain(self.time_logs.iter().map(|log| log.id))
            .chain(self.visions.iter().map(|vision| vision.id))
            .chain(self.achievements.iter().map(|achievement| achievement.id))
            .max()
            .unwrap_or(0)
    }

    /// Pillar labels referenced by any entity, in first-seen order.
    pub fn referenced_pillars(&self) -> Vec<String> {
        let mut seen: Vec<String> = Vec::new();
        let labels = self
            .goals
            .iter_all()
            .map(|(_, goal)| goal.pillar.as_str())
            .chain(self.journal_entries.iter().map(|entry| entry.pillar.as_str()))
            .chain(self.time_logs.iter().map(|log| log.pillar.as_str()))
            .chain(self.visions.iter().map(|vision| vision.pillar.as_str()))
            .chain(self.achievements.iter().map(|item| item.pillar.as_str()))
            .chain(self.current_focus.keys().map(String::as_str));
        for label in labels {
            if !seen.iter().any(|existing| existing == label) {
                seen.push(label.to_string());
            }
        }
        seen
    }

    /// Number of entities (focus entry included) tagged with `pillar`.
    pub fn pillar_reference_count(&self, pillar: &str) -> usize {
        self.goals
            .iter_all()
            .filter(|(_, goal)| goal.pillar == pillar)
            .count()
            + self
                .journal_entries
                .iter()
                .filter(|entry| entry.pillar == pillar)
                .count()
            + self.time_logs.iter().filter(|log| log.pillar == pillar).count()
            + self
                .visions
                .iter()
                .filter(|vision| vision.pillar == pillar)
                .count()
            + self
                .achievements
                .iter()
                .filter(|item| item.pillar == pillar)
                .count()
            + usize::from(self.current_focus.contains_key(pillar))
    }
}
