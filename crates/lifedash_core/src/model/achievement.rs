//! Achievement model.

use crate::model::EntityId;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Recorded accomplishment shown on the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Achievement {
    pub id: EntityId,
    pub title: String,
    pub pillar: String,
    #[serde(default)]
    pub icon: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAchievement {
    pub title: String,
    pub pillar: String,
    pub icon: String,
    pub date: NaiveDate,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AchievementPatch {
    pub title: Option<String>,
    pub pillar: Option<String>,
    pub icon: Option<String>,
    pub date: Option<NaiveDate>,
}
