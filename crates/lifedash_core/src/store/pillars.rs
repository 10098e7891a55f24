//! Pillar consistency engine.
//!
//! # Invariants
//! - Pillar names are compared case-sensitively after trimming input.
//! - Rename rewrites every referencing entity and re-keys the focus entry
//!   and per-pillar completion tallies.
//! - Delete removes every referencing entity, the focus entry and the
//!   pillar's completion tallies. Daily totals keep their historical values.
//! - Both cascades validate first, then write; nothing is partially applied.

use super::{LifeStore, NotFound, StoreResult};
use crate::model::validation::{require_text, ValidationError};
use log::info;

impl LifeStore {
    /// Appends a new pillar.
    ///
    /// # Errors
    /// - `BlankField` when `name` is empty after trim.
    /// - `DuplicatePillar` when the name already exists.
    pub fn add_pillar(&mut self, name: &str) -> StoreResult<()> {
        let name = require_text("pillar name", name)?;
        if self.state.pillars.contains(&name) {
            return Err(ValidationError::DuplicatePillar(name).into());
        }
        self.state.pillars.push(name);
        info!(
            "event=pillar_add module=store status=ok pillars={}",
            self.state.pillars.len()
        );
        Ok(())
    }

    /// Renames a pillar and rewrites every reference to it.
    ///
    /// # Errors
    /// - `NotFound::Pillar` when `old_name` does not exist.
    /// - `BlankField` when `new_name` is empty after trim.
    /// - `DuplicatePillar` when `new_name` already exists (including
    ///   `new_name == old_name`).
    pub fn rename_pillar(&mut self, old_name: &str, new_name: &str) -> StoreResult<()> {
        let position = self
            .state
            .pillars
            .iter()
            .position(|pillar| pillar == old_name)
            .ok_or_else(|| NotFound::Pillar(old_name.to_string()))?;
        let new_name = require_text("pillar name", new_name)?;
        if self.state.pillars.contains(&new_name) {
            return Err(ValidationError::DuplicatePillar(new_name).into());
        }

        let state = &mut self.state;
        let mut rewritten = 0usize;
        let mut relabel = |pillar: &mut String| {
            if *pillar == old_name {
                pillar.clone_from(&new_name);
                rewritten += 1;
            }
        };

        for goal in state.goals.iter_all_mut() {
            relabel(&mut goal.pillar);
        }
        for entry in &mut state.journal_entries {
            relabel(&mut entry.pillar);
        }
        for log in &mut state.time_logs {
            relabel(&mut log.pillar);
        }
        for vision in &mut state.visions {
            relabel(&mut vision.pillar);
        }
        for achievement in &mut state.achievements {
            relabel(&mut achievement.pillar);
        }
        if let Some(focus) = state.current_focus.remove(old_name) {
            state.current_focus.insert(new_name.clone(), focus);
        }
        for record in &mut state.user.daily_completion_history {
            if let Some(tally) = record.pillars.remove(old_name) {
                record.pillars.insert(new_name.clone(), tally);
            }
        }
        state.pillars[position] = new_name;

        info!(
            "event=pillar_rename module=store status=ok rewritten={}",
            rewritten
        );
        Ok(())
    }

    /// Deletes a pillar and every entity tagged with it.
    ///
    /// # Errors
    /// - `NotFound::Pillar` when `name` does not exist.
    /// - `LastPillar` when `name` is the only remaining pillar.
    pub fn delete_pillar(&mut self, name: &str) -> StoreResult<()> {
        let position = self
            .state
            .pillars
            .iter()
            .position(|pillar| pillar == name)
            .ok_or_else(|| NotFound::Pillar(name.to_string()))?;
        if self.state.pillars.len() == 1 {
            return Err(ValidationError::LastPillar(name.to_string()).into());
        }

        let removed = self.state.pillar_reference_count(name);
        let state = &mut self.state;
        state.goals.retain_all(|goal| goal.pillar != name);
        state.journal_entries.retain(|entry| entry.pillar != name);
        state.time_logs.retain(|log| log.pillar != name);
        state.visions.retain(|vision| vision.pillar != name);
        state.achievements.retain(|achievement| achievement.pillar != name);
        state.current_focus.remove(name);
        for record in &mut state.user.daily_completion_history {
            record.pillars.remove(name);
        }
        state.pillars.remove(position);

        info!(
            "event=pillar_delete module=store status=ok removed={} pillars={}",
            removed,
            state.pillars.len()
        );
        Ok(())
    }
}
