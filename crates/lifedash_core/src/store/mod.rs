//! Life dashboard store: one owned state value plus its mutation rules.
//!
//! # Responsibility
//! - Own every entity collection and the user aggregate.
//! - Enforce cross-entity consistency (pillar cascades, streak ledger).
//! - Hand out fresh entity ids.
//!
//! # Invariants
//! - Mutations take `&mut self`; readers never observe a half-applied
//!   operation.
//! - Validation runs before the first write of every operation.
//! - The pillar list is never empty.
//!
//! # See also
//! - `crate::service::store_service` for snapshot persistence.

mod entries;
mod error;
mod goals;
mod pillars;
mod state;
mod streak;

pub use error::{NotFound, StoreError, StoreResult};
pub use state::{GoalBuckets, StoreState};
pub use streak::StreakOutcome;

use crate::analytics::insights::{Insights, VisionSummary};
use crate::analytics::Analytics;
use crate::clock::Clock;
use crate::config::{ConfigError, StoreConfig};
use crate::model::achievement::Achievement;
use crate::model::goal::{Goal, Period};
use crate::model::journal::JournalEntry;
use crate::model::time_log::TimeLog;
use crate::model::user::User;
use crate::model::validation::ValidationError;
use crate::model::vision::Vision;
use crate::model::EntityId;
use chrono::{NaiveDate, NaiveDateTime};
use log::{info, warn};
use std::collections::BTreeMap;

/// Single-writer in-memory store.
pub struct LifeStore {
    state: StoreState,
    config: StoreConfig,
    clock: Box<dyn Clock + Send + Sync>,
}

impl LifeStore {
    /// Creates an empty store seeded with `config.default_pillars`.
    pub fn new(
        config: StoreConfig,
        clock: impl Clock + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;
        let state = StoreState::with_pillars(seed_pillars(&config));
        Ok(Self {
            state,
            config,
            clock: Box::new(clock),
        })
    }

    /// Rehydrates a store from a previously captured state.
    ///
    /// Repairs states that would violate store invariants: an empty pillar
    /// list is reseeded, labels referenced by entities but missing from the
    /// list are appended, and the id counter is raised above every stored id.
    pub fn from_state(
        mut state: StoreState,
        config: StoreConfig,
        clock: impl Clock + Send + Sync + 'static,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let mut unique: Vec<String> = Vec::with_capacity(state.pillars.len());
        for pillar in state.pillars.drain(..) {
            let trimmed = pillar.trim();
            if !trimmed.is_empty() && !unique.iter().any(|existing| existing == trimmed) {
                unique.push(trimmed.to_string());
            }
        }
        state.pillars = unique;

        for referenced in state.referenced_pillars() {
            if referenced.trim().is_empty() {
                continue;
            }
            if !state.pillars.contains(&referenced) {
                warn!("event=store_restore module=store status=repair reason=dangling_pillar_reference");
                state.pillars.push(referenced);
            }
        }
        if state.pillars.is_empty() {
            warn!("event=store_restore module=store status=repair reason=empty_pillars");
            state.pillars = seed_pillars(&config);
        }
        state.last_issued_id = state.last_issued_id.max(state.max_entity_id());

        info!(
            "event=store_restore module=store status=ok pillars={} goals={} time_logs={}",
            state.pillars.len(),
            state.goals.iter_all().count(),
            state.time_logs.len()
        );

        Ok(Self {
            state,
            config,
            clock: Box::new(clock),
        })
    }

    /// Read-only view of the whole state.
    pub fn state(&self) -> &StoreState {
        &self.state
    }

    /// Owned copy of the whole state, suitable for persistence.
    pub fn snapshot(&self) -> StoreState {
        self.state.clone()
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Current calendar day according to the injected clock.
    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn now(&self) -> NaiveDateTime {
        self.clock.now()
    }

    /// Drops every entity and the user aggregate, keeping config and clock.
    pub fn clear(&mut self) {
        self.state = StoreState::with_pillars(seed_pillars(&self.config));
        info!("event=store_clear module=store status=ok");
    }

    pub fn pillars(&self) -> &[String] {
        &self.state.pillars
    }

    pub fn user(&self) -> &User {
        &self.state.user
    }

    pub fn goals(&self, period: Period) -> &[Goal] {
        self.state.goals.bucket(period)
    }

    pub fn goal(&self, period: Period, id: EntityId) -> StoreResult<&Goal> {
        self.goals(period)
            .iter()
            .find(|goal| goal.id == id)
            .ok_or_else(|| NotFound::Goal { period, id }.into())
    }

    pub fn journal_entries(&self) -> &[JournalEntry] {
        &self.state.journal_entries
    }

    pub fn time_logs(&self) -> &[TimeLog] {
        &self.state.time_logs
    }

    pub fn visions(&self) -> &[Vision] {
        &self.state.visions
    }

    pub fn achievements(&self) -> &[Achievement] {
        &self.state.achievements
    }

    pub fn current_focus(&self) -> &BTreeMap<String, String> {
        &self.state.current_focus
    }

    /// Derived analytics over the current state, recomputed on every call.
    pub fn analytics(&self) -> Analytics {
        Analytics::compute(&self.state, &self.config.analytics, self.today())
    }

    /// Summary counters for the insights view.
    pub fn insights(&self) -> Insights {
        Insights::compute(&self.state, self.today())
    }

    pub fn vision_summary(&self) -> VisionSummary {
        VisionSummary::compute(&self.state.visions)
    }

    /// Returns a fresh id: the current epoch millis, or last id + 1 when the
    /// clock has not moved past it.
    ///
    /// # Errors
    /// - `IdsExhausted` once `EntityId::MAX` has been issued.
    fn next_id(&mut self) -> StoreResult<EntityId> {
        let floor = self
            .state
            .last_issued_id
            .checked_add(1)
            .ok_or(StoreError::IdsExhausted)?;
        let millis = self.clock.now().and_utc().timestamp_millis().max(0) as EntityId;
        let id = millis.max(floor);
        self.state.last_issued_id = id;
        Ok(id)
    }

    fn ensure_pillar(&self, pillar: &str) -> Result<(), ValidationError> {
        if self.state.pillars.iter().any(|existing| existing == pillar) {
            Ok(())
        } else {
            Err(ValidationError::UnknownPillar(pillar.to_string()))
        }
    }
}

fn seed_pillars(config: &StoreConfig) -> Vec<String> {
    let mut pillars: Vec<String> = Vec::new();
    for pillar in &config.default_pillars {
        let trimmed = pillar.trim();
        if !trimmed.is_empty() && !pillars.iter().any(|existing| existing == trimmed) {
            pillars.push(trimmed.to_string());
        }
    }
    pillars
}

#[cfg(test)]
mod tests {
    use super::{LifeStore, StoreState};
    use crate::clock::FixedClock;
    use crate::config::StoreConfig;
    use crate::model::goal::{Goal, Period};
    use chrono::NaiveDate;

    fn clock() -> FixedClock {
        FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 1, 15).unwrap())
    }

    #[test]
    fn ids_are_monotonic_even_with_frozen_clock() {
        let mut store = LifeStore::new(StoreConfig::default(), clock()).unwrap();
        let first = store.next_id().unwrap();
        let second = store.next_id().unwrap();
        assert!(second > first);
        assert_eq!(store.state().last_issued_id, second);
    }

    #[test]
    fn restore_repairs_empty_and_dangling_pillars() {
        let mut state = StoreState::with_pillars(Vec::new());
        state.goals.weekly.push(Goal {
            id: 9_999_999_999_999,
            text: "Ship".to_string(),
            pillar: "Career".to_string(),
            category: "General".to_string(),
            completed: false,
            subgoals: Vec::new(),
            progress: None,
        });

        let store = LifeStore::from_state(state, StoreConfig::default(), clock()).unwrap();
        assert_eq!(store.pillars(), ["Career"]);
        assert_eq!(store.state().last_issued_id, 9_999_999_999_999);
        assert_eq!(store.goals(Period::Weekly).len(), 1);

        let mut blank_reference = StoreState::with_pillars(vec!["Body".to_string()]);
        blank_reference.goals.today.push(Goal {
            id: 1,
            text: "Stretch".to_string(),
            pillar: String::new(),
            category: "General".to_string(),
            completed: false,
            subgoals: Vec::new(),
            progress: None,
        });
        let store =
            LifeStore::from_state(blank_reference, StoreConfig::default(), clock()).unwrap();
        assert_eq!(store.pillars(), ["Body"]);

        let empty = StoreState::with_pillars(vec!["  ".to_string()]);
        let store = LifeStore::from_state(empty, StoreConfig::default(), clock()).unwrap();
        assert_eq!(store.pillars(), ["Brain", "Voice", "Body", "Soul"]);
    }
}
