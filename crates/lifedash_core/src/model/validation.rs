//! Validation rejections raised before any store mutation.
//!
//! # Invariants
//! - A `ValidationError` always means the store was left untouched.

use crate::model::EntityId;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Inclusive upper bound for journal mood scores.
pub const MAX_MOOD: u8 = 5;
/// Inclusive lower bound for journal mood scores.
pub const MIN_MOOD: u8 = 1;
/// Inclusive upper bound for progress percentages.
pub const MAX_PROGRESS: u8 = 100;

/// Input rejected by domain validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// A required text field is empty after trim.
    BlankField(&'static str),
    /// Pillar name already present in the pillar list.
    DuplicatePillar(String),
    /// Entity references a pillar that does not exist.
    UnknownPillar(String),
    /// Removing this pillar would leave the pillar list empty.
    LastPillar(String),
    /// Focus entry already exists for this pillar.
    DuplicateFocus(String),
    /// Journal mood outside `1..=5`.
    MoodOutOfRange(u8),
    /// Progress outside `0..=100`.
    ProgressOutOfRange(u8),
    /// Period label is not `today|weekly|monthly`.
    UnknownPeriod(String),
    /// Replacement subgoal list repeats an id.
    DuplicateSubgoal(EntityId),
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "{field} must not be blank"),
            Self::DuplicatePillar(name) => write!(f, "pillar already exists: `{name}`"),
            Self::UnknownPillar(name) => write!(f, "unknown pillar: `{name}`"),
            Self::LastPillar(name) => {
                write!(f, "cannot delete `{name}`: at least one pillar must remain")
            }
            Self::DuplicateFocus(name) => {
                write!(f, "focus area already exists for pillar `{name}`")
            }
            Self::MoodOutOfRange(value) => write!(
                f,
                "mood ({value}) must be between {MIN_MOOD} and {MAX_MOOD}"
            ),
            Self::ProgressOutOfRange(value) => {
                write!(f, "progress ({value}) must be between 0 and {MAX_PROGRESS}")
            }
            Self::UnknownPeriod(value) => write!(
                f,
                "unknown period `{value}`; expected today|weekly|monthly"
            ),
            Self::DuplicateSubgoal(id) => write!(f, "duplicate subgoal id: {id}"),
        }
    }
}

impl Error for ValidationError {}

/// Trims `value` and rejects it when nothing is left.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::BlankField(field));
    }
    Ok(trimmed.to_string())
}

/// Rejects mood scores outside `1..=5`.
pub fn check_mood(mood: u8) -> Result<u8, ValidationError> {
    if (MIN_MOOD..=MAX_MOOD).contains(&mood) {
        Ok(mood)
    } else {
        Err(ValidationError::MoodOutOfRange(mood))
    }
}

/// Rejects progress values above 100.
pub fn check_progress(progress: u8) -> Result<u8, ValidationError> {
    if progress <= MAX_PROGRESS {
        Ok(progress)
    } else {
        Err(ValidationError::ProgressOutOfRange(progress))
    }
}

#[cfg(test)]
mod tests {
    use super::{check_mood, check_progress, require_text, ValidationError};

    #[test]
    fn require_text_trims_and_rejects_blank() {
        assert_eq!(require_text("title", "  Run  ").unwrap(), "Run");
        assert_eq!(
            require_text("title", " \t ").unwrap_err(),
            ValidationError::BlankField("title")
        );
    }

    #[test]
    fn mood_and_progress_bounds() {
        assert!(check_mood(1).is_ok());
        assert!(check_mood(5).is_ok());
        assert_eq!(check_mood(0), Err(ValidationError::MoodOutOfRange(0)));
        assert_eq!(check_mood(6), Err(ValidationError::MoodOutOfRange(6)));
        assert!(check_progress(100).is_ok());
        assert_eq!(
            check_progress(101),
            Err(ValidationError::ProgressOutOfRange(101))
        );
    }
}
