//! Streak and daily completion tracker.
//!
//! # Responsibility
//! - Keep one completion record per calendar day for the `today` bucket.
//! - Award at most one streak increment per day, only when every goal in
//!   the `today` bucket is complete.
//!
//! # Invariants
//! - `last_streak_update == today` blocks any further award that day.
//! - Un-completing a goal never takes an awarded streak back.
//! - Missed days are not detected automatically; callers reset explicitly.

use super::LifeStore;
use crate::model::goal::{Goal, Period};
use crate::model::user::{CompletionTally, DailyCompletion, StreakRecord};
use chrono::{Days, NaiveDate};
use log::info;
use std::collections::BTreeMap;

/// Result of a streak check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreakOutcome {
    /// Streak incremented; carries the new value.
    Awarded(u32),
    /// Today was already counted.
    AlreadyAwarded,
    /// Not every goal is done yet.
    Incomplete { completed: u32, total: u32 },
    /// There are no goals in the `today` bucket.
    NoGoals,
}

impl LifeStore {
    /// Recomputes today's completion record from the `today` bucket and
    /// upserts it into the history.
    pub fn check_daily_completion(&mut self) -> DailyCompletion {
        let record = today_completion(self.goals(Period::Today), self.today());
        self.state.user.upsert_completion(record.clone());
        record
    }

    /// Awards today's streak increment when every `today` goal is complete.
    ///
    /// Callers invoke this after toggling a `today` goal. It is safe to call
    /// repeatedly: a day is counted at most once.
    pub fn check_streak_update(&mut self) -> StreakOutcome {
        let today = self.today();
        let record = self.check_daily_completion();
        let tally = record.tally();

        if tally.total == 0 {
            return StreakOutcome::NoGoals;
        }
        if !tally.is_all_done() {
            return StreakOutcome::Incomplete {
                completed: tally.completed,
                total: tally.total,
            };
        }
        let user = &mut self.state.user;
        if user.last_streak_update == Some(today) {
            return StreakOutcome::AlreadyAwarded;
        }

        user.current_streak = user.current_streak.saturating_add(1);
        user.last_streak_update = Some(today);
        user.streak_history.push(StreakRecord {
            date: today,
            streak: user.current_streak,
        });
        info!(
            "event=streak_award module=store status=ok streak={}",
            user.current_streak
        );
        StreakOutcome::Awarded(user.current_streak)
    }

    /// Sets the current streak back to zero.
    ///
    /// History and `last_streak_update` are kept, so a streak already counted
    /// today is not awarded again.
    pub fn reset_streak(&mut self) {
        let previous = self.state.user.current_streak;
        self.state.user.current_streak = 0;
        info!("event=streak_reset module=store status=ok previous={previous}");
    }

    /// Resets the streak when the last award is older than yesterday.
    ///
    /// Returns whether a reset happened.
    pub fn reset_streak_if_lapsed(&mut self) -> bool {
        let user = &self.state.user;
        if user.current_streak == 0 {
            return false;
        }
        let yesterday = self.today().checked_sub_days(Days::new(1));
        let lapsed = match (user.last_streak_update, yesterday) {
            (Some(last), Some(yesterday)) => last < yesterday,
            (None, _) => true,
            (Some(_), None) => false,
        };
        if lapsed {
            self.reset_streak();
        }
        lapsed
    }
}

fn today_completion(goals: &[Goal], date: NaiveDate) -> DailyCompletion {
    let mut pillars: BTreeMap<String, CompletionTally> = BTreeMap::new();
    let mut completed = 0u32;
    for goal in goals {
        let tally = pillars.entry(goal.pillar.clone()).or_default();
        tally.total += 1;
        if goal.completed {
            tally.completed += 1;
            completed += 1;
        }
    }
    DailyCompletion {
        date,
        completed,
        total: goals.len() as u32,
        pillars,
    }
}

#[cfg(test)]
mod tests {
    use super::StreakOutcome;
    use crate::clock::FixedClock;
    use crate::config::StoreConfig;
    use crate::model::goal::{NewGoal, Period};
    use crate::store::LifeStore;
    use chrono::NaiveDate;

    fn store_on(day: NaiveDate) -> (LifeStore, FixedClock) {
        let clock = FixedClock::at_date(day);
        let store = LifeStore::new(StoreConfig::default(), clock.clone()).unwrap();
        (store, clock)
    }

    #[test]
    fn empty_today_bucket_never_awards() {
        let (mut store, _) = store_on(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        assert_eq!(store.check_streak_update(), StreakOutcome::NoGoals);
        assert_eq!(store.user().current_streak, 0);
    }

    #[test]
    fn lapse_resets_only_after_a_missed_day() {
        let (mut store, clock) = store_on(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let id = store
            .add_goal(Period::Today, NewGoal::new("Stretch", "Body"))
            .unwrap();
        store.toggle_goal(Period::Today, id).unwrap();
        assert_eq!(store.check_streak_update(), StreakOutcome::Awarded(1));

        clock.advance_days(1);
        assert!(!store.reset_streak_if_lapsed());
        assert_eq!(store.user().current_streak, 1);

        clock.advance_days(1);
        assert!(store.reset_streak_if_lapsed());
        assert_eq!(store.user().current_streak, 0);
        assert_eq!(store.user().streak_history.len(), 1);
    }

    #[test]
    fn reset_does_not_allow_second_award_same_day() {
        let (mut store, _) = store_on(NaiveDate::from_ymd_opt(2025, 1, 8).unwrap());
        let id = store
            .add_goal(Period::Today, NewGoal::new("Read", "Soul"))
            .unwrap();
        store.toggle_goal(Period::Today, id).unwrap();
        assert_eq!(store.check_streak_update(), StreakOutcome::Awarded(1));

        store.reset_streak();
        assert_eq!(store.check_streak_update(), StreakOutcome::AlreadyAwarded);
        assert_eq!(store.user().current_streak, 0);
    }
}
