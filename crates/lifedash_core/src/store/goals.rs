//! Goal and subgoal engine.
//!
//! # Invariants
//! - Goals are addressed by `(Period, id)`; a missing pair is `NotFound`.
//! - Every subgoal mutation recomputes parent `progress`.
//! - Toggling a goal adjusts `User::completed_goals` (floored at zero).
//! - Toggling a `today` goal upserts today's completion record.

use super::{LifeStore, NotFound, StoreResult};
use crate::model::goal::{Goal, GoalPatch, NewGoal, Period, Subgoal};
use crate::model::validation::{check_progress, require_text, ValidationError};
use crate::model::EntityId;
use log::debug;

impl LifeStore {
    /// Appends a new, incomplete goal without subgoals to `period`.
    ///
    /// # Errors
    /// - `BlankField` for empty text.
    /// - `UnknownPillar` when `goal.pillar` does not exist.
    pub fn add_goal(&mut self, period: Period, goal: NewGoal) -> StoreResult<EntityId> {
        let text = require_text("goal text", &goal.text)?;
        self.ensure_pillar(&goal.pillar)?;

        let id = self.next_id()?;
        self.state.goals.bucket_mut(period).push(Goal {
            id,
            text,
            pillar: goal.pillar,
            category: goal.category.trim().to_string(),
            completed: false,
            subgoals: Vec::new(),
            progress: None,
        });
        debug!("event=goal_add module=store status=ok period={period} id={id}");
        Ok(id)
    }

    /// Flips `completed` and returns the new value.
    ///
    /// `today` goals also refresh today's completion record. The streak is
    /// not awarded here; callers follow up with `check_streak_update`.
    pub fn toggle_goal(&mut self, period: Period, id: EntityId) -> StoreResult<bool> {
        let goal = self.goal_mut(period, id)?;
        goal.completed = !goal.completed;
        let completed = goal.completed;

        let user = &mut self.state.user;
        if completed {
            user.completed_goals = user.completed_goals.saturating_add(1);
        } else {
            user.completed_goals = user.completed_goals.saturating_sub(1);
        }

        if period == Period::Today {
            self.check_daily_completion();
        }
        debug!("event=goal_toggle module=store status=ok period={period} id={id} completed={completed}");
        Ok(completed)
    }

    /// Applies a partial update.
    ///
    /// Supplying `subgoals` replaces the list and recomputes `progress`;
    /// otherwise a supplied `progress` is stored as-is. Replacement subgoals
    /// keep their id when the goal already has a subgoal with it; any other
    /// id is swapped for a freshly issued one.
    ///
    /// # Errors
    /// - `DuplicateSubgoal` when the replacement list repeats an id.
    pub fn update_goal(
        &mut self,
        period: Period,
        id: EntityId,
        patch: GoalPatch,
    ) -> StoreResult<()> {
        let text = patch
            .text
            .as_deref()
            .map(|text| require_text("goal text", text))
            .transpose()?;
        if let Some(pillar) = patch.pillar.as_deref() {
            self.ensure_pillar(pillar)?;
        }
        let progress = patch.progress.map(check_progress).transpose()?;
        let mut subgoals = patch
            .subgoals
            .map(|subgoals| {
                let mut seen: Vec<EntityId> = Vec::with_capacity(subgoals.len());
                subgoals
                    .into_iter()
                    .map(|subgoal| -> StoreResult<Subgoal> {
                        if seen.contains(&subgoal.id) {
                            return Err(ValidationError::DuplicateSubgoal(subgoal.id).into());
                        }
                        seen.push(subgoal.id);
                        Ok(Subgoal {
                            text: require_text("subgoal text", &subgoal.text)?,
                            ..subgoal
                        })
                    })
                    .collect::<StoreResult<Vec<Subgoal>>>()
            })
            .transpose()?;

        let known: Vec<EntityId> = self
            .goal(period, id)?
            .subgoals
            .iter()
            .map(|subgoal| subgoal.id)
            .collect();
        if let Some(subgoals) = subgoals.as_mut() {
            for subgoal in subgoals.iter_mut() {
                if !known.contains(&subgoal.id) {
                    subgoal.id = self.next_id()?;
                }
            }
        }

        let goal = self.goal_mut(period, id)?;
        if let Some(text) = text {
            goal.text = text;
        }
        if let Some(pillar) = patch.pillar {
            goal.pillar = pillar;
        }
        if let Some(category) = patch.category {
            goal.category = category.trim().to_string();
        }
        match subgoals {
            Some(subgoals) => {
                goal.subgoals = subgoals;
                goal.recompute_progress();
            }
            None => {
                if progress.is_some() {
                    goal.progress = progress;
                }
            }
        }
        Ok(())
    }

    /// Removes a goal together with its subgoals.
    pub fn delete_goal(&mut self, period: Period, id: EntityId) -> StoreResult<Goal> {
        let bucket = self.state.goals.bucket_mut(period);
        let index = bucket
            .iter()
            .position(|goal| goal.id == id)
            .ok_or(NotFound::Goal { period, id })?;
        let removed = bucket.remove(index);
        debug!("event=goal_delete module=store status=ok period={period} id={id}");
        Ok(removed)
    }

    /// Appends an incomplete subgoal and returns its id.
    pub fn add_subgoal(
        &mut self,
        period: Period,
        goal_id: EntityId,
        text: &str,
    ) -> StoreResult<EntityId> {
        let text = require_text("subgoal text", text)?;
        self.goal(period, goal_id)?;

        let id = self.next_id()?;
        let goal = self.goal_mut(period, goal_id)?;
        goal.subgoals.push(Subgoal {
            id,
            text,
            completed: false,
        });
        goal.recompute_progress();
        Ok(id)
    }

    /// Flips a subgoal and returns the parent's recomputed progress.
    ///
    /// The parent's own `completed` flag is left alone.
    pub fn toggle_subgoal(
        &mut self,
        period: Period,
        goal_id: EntityId,
        subgoal_id: EntityId,
    ) -> StoreResult<u8> {
        let goal = self.goal_mut(period, goal_id)?;
        let subgoal = goal
            .subgoals
            .iter_mut()
            .find(|subgoal| subgoal.id == subgoal_id)
            .ok_or(NotFound::Subgoal {
                period,
                goal_id,
                subgoal_id,
            })?;
        subgoal.completed = !subgoal.completed;
        goal.recompute_progress();
        Ok(goal.progress.unwrap_or(0))
    }

    /// Removes a subgoal and returns the parent's recomputed progress.
    pub fn delete_subgoal(
        &mut self,
        period: Period,
        goal_id: EntityId,
        subgoal_id: EntityId,
    ) -> StoreResult<u8> {
        let goal = self.goal_mut(period, goal_id)?;
        let index = goal
            .subgoals
            .iter()
            .position(|subgoal| subgoal.id == subgoal_id)
            .ok_or(NotFound::Subgoal {
                period,
                goal_id,
                subgoal_id,
            })?;
        goal.subgoals.remove(index);
        goal.recompute_progress();
        Ok(goal.progress.unwrap_or(0))
    }

    fn goal_mut(&mut self, period: Period, id: EntityId) -> StoreResult<&mut Goal> {
        self.state
            .goals
            .bucket_mut(period)
            .iter_mut()
            .find(|goal| goal.id == id)
            .ok_or_else(|| NotFound::Goal { period, id }.into())
    }
}
