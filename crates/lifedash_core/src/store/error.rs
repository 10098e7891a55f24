//! Store operation errors.
//!
//! # Invariants
//! - Every failed store operation leaves state untouched.

use crate::model::goal::Period;
use crate::model::validation::ValidationError;
use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StoreResult<T> = Result<T, StoreError>;

/// Target of an operation does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotFound {
    Pillar(String),
    Goal {
        period: Period,
        id: EntityId,
    },
    Subgoal {
        period: Period,
        goal_id: EntityId,
        subgoal_id: EntityId,
    },
    JournalEntry(EntityId),
    TimeLog(EntityId),
    Vision(EntityId),
    Milestone {
        vision_id: EntityId,
        index: usize,
    },
    Achievement(EntityId),
    Focus(String),
}

impl Display for NotFound {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Pillar(name) => write!(f, "pillar not found: `{name}`"),
            Self::Goal { period, id } => write!(f, "goal not found: {period}/{id}"),
            Self::Subgoal {
                period,
                goal_id,
                subgoal_id,
            } => write!(f, "subgoal not found: {period}/{goal_id}/{subgoal_id}"),
            Self::JournalEntry(id) => write!(f, "journal entry not found: {id}"),
            Self::TimeLog(id) => write!(f, "time log not found: {id}"),
            Self::Vision(id) => write!(f, "vision not found: {id}"),
            Self::Milestone { vision_id, index } => {
                write!(f, "milestone not found: vision {vision_id} index {index}")
            }
            Self::Achievement(id) => write!(f, "achievement not found: {id}"),
            Self::Focus(pillar) => write!(f, "focus area not found for pillar `{pillar}`"),
        }
    }
}

/// Error returned by store mutations and lookups.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Validation(ValidationError),
    NotFound(NotFound),
    /// The id counter reached `EntityId::MAX`; no further entity can be added.
    IdsExhausted,
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::NotFound(err) => write!(f, "{err}"),
            Self::IdsExhausted => write!(f, "entity id space exhausted"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::NotFound(_) | Self::IdsExhausted => None,
        }
    }
}

impl From<ValidationError> for StoreError {
    fn from(value: ValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<NotFound> for StoreError {
    fn from(value: NotFound) -> Self {
        Self::NotFound(value)
    }
}
