//! Vision (long-term aspiration) model.
//!
//! # Invariants
//! - `progress` is caller-maintained and stays within `0..=100`.
//! - Milestones have no identity beyond their position in `milestones`.

use crate::model::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Positional checklist item of one vision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Milestone {
    pub text: String,
    #[serde(default)]
    pub completed: bool,
}

/// Long-term aspiration with a target date and milestones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vision {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    pub pillar: String,
    #[serde(default)]
    pub target_date: Option<NaiveDate>,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub milestones: Vec<Milestone>,
}

/// Creation request for a vision. Milestones start empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewVision {
    pub title: String,
    pub description: String,
    pub category: String,
    pub pillar: String,
    pub target_date: Option<NaiveDate>,
    pub progress: u8,
}

/// Partial update for a vision.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VisionPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub pillar: Option<String>,
    /// `Some(None)` clears the target date.
    pub target_date: Option<Option<NaiveDate>>,
    pub progress: Option<u8>,
    /// Replaces the whole milestone list.
    pub milestones: Option<Vec<Milestone>>,
}
