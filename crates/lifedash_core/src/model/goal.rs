//! Goal and subgoal model.
//!
//! # Responsibility
//! - Define period buckets and the goal/subgoal records they hold.
//! - Derive parent progress from subgoal completion.
//!
//! # Invariants
//! - Goals are keyed by `(Period, EntityId)`; ids are only unique per bucket.
//! - `progress == round(100 * completed / total)` after any subgoal change,
//!   and `0` when there are no subgoals.
//! - Subgoal completion never changes the parent's own `completed` flag.

use crate::model::validation::ValidationError;
use crate::model::EntityId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use std::str::FromStr;

/// Category assigned when the caller does not provide one.
pub const DEFAULT_GOAL_CATEGORY: &str = "General";

/// Fixed goal-tracking horizon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Period {
    Today,
    Weekly,
    Monthly,
}

impl Period {
    /// All buckets in display order.
    pub const ALL: [Period; 3] = [Period::Today, Period::Weekly, Period::Monthly];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Display for Period {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Period {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "today" => Ok(Self::Today),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ValidationError::UnknownPeriod(other.to_string())),
        }
    }
}

/// Checklist item owned by exactly one goal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Subgoal {
    pub id: EntityId,
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Goal record inside one period bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Goal {
    pub id: EntityId,
    pub text: String,
    pub pillar: String,
    #[serde(default = "default_category")]
    pub category: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(default)]
    pub subgoals: Vec<Subgoal>,
    /// Derived from subgoals when present; may be set manually otherwise.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub progress: Option<u8>,
}

impl Goal {
    /// Recomputes `progress` from the current subgoal list.
    pub fn recompute_progress(&mut self) {
        self.progress = Some(subgoal_progress(&self.subgoals));
    }
}

/// Creation request for a goal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoal {
    pub text: String,
    pub pillar: String,
    pub category: String,
}

impl NewGoal {
    /// Creates a request with the default `General` category.
    pub fn new(text: impl Into<String>, pillar: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            pillar: pillar.into(),
            category: DEFAULT_GOAL_CATEGORY.to_string(),
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }
}

/// Partial update for a goal; `None` fields keep their current value.
///
/// `completed` is intentionally absent: completion flows through
/// `toggle_goal` so the aggregate counters stay consistent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GoalPatch {
    pub text: Option<String>,
    pub pillar: Option<String>,
    pub category: Option<String>,
    /// Replaces the whole subgoal list and recomputes `progress`.
    pub subgoals: Option<Vec<Subgoal>>,
    /// Manual progress; ignored when `subgoals` is supplied in the same patch.
    pub progress: Option<u8>,
}

/// Rounded completion percentage of a subgoal list (`0` when empty).
pub fn subgoal_progress(subgoals: &[Subgoal]) -> u8 {
    let total = subgoals.len() as u64;
    if total == 0 {
        return 0;
    }
    let completed = subgoals.iter().filter(|subgoal| subgoal.completed).count() as u64;
    // Integer half-up rounding of 100 * completed / total.
    ((200 * completed + total) / (2 * total)) as u8
}

fn default_category() -> String {
    DEFAULT_GOAL_CATEGORY.to_string()
}
