//! CRUD for journal entries, time logs, visions, achievements, focus areas
//! and the user profile.
//!
//! # Invariants
//! - Every write validates pillar references and value ranges first.
//! - Patches overwrite only the fields they carry.

use super::{LifeStore, NotFound, StoreResult};
use crate::model::achievement::{Achievement, AchievementPatch, NewAchievement};
use crate::model::journal::{JournalEntry, JournalFilter, JournalPatch, NewJournalEntry};
use crate::model::time_log::{elapsed_minutes, NewTimeLog, TimeLog, TimeLogFilter, TimeLogPatch};
use crate::model::user::UserPatch;
use crate::model::validation::{check_mood, check_progress, require_text, ValidationError};
use crate::model::vision::{Milestone, NewVision, Vision, VisionPatch};
use crate::model::EntityId;
use log::debug;

impl LifeStore {
    pub fn add_journal_entry(&mut self, entry: NewJournalEntry) -> StoreResult<EntityId> {
        let title = require_text("journal title", &entry.title)?;
        let mood = check_mood(entry.mood)?;
        self.ensure_pillar(&entry.pillar)?;

        let id = self.next_id()?;
        self.state.journal_entries.push(JournalEntry {
            id,
            date: entry.date,
            title,
            content: entry.content,
            category: entry.category,
            pillar: entry.pillar,
            mood,
        });
        debug!("event=journal_add module=store status=ok id={id}");
        Ok(id)
    }

    pub fn update_journal_entry(&mut self, id: EntityId, patch: JournalPatch) -> StoreResult<()> {
        let title = patch
            .title
            .as_deref()
            .map(|title| require_text("journal title", title))
            .transpose()?;
        let mood = patch.mood.map(check_mood).transpose()?;
        if let Some(pillar) = patch.pillar.as_deref() {
            self.ensure_pillar(pillar)?;
        }

        let entry = self
            .state
            .journal_entries
            .iter_mut()
            .find(|entry| entry.id == id)
            .ok_or(NotFound::JournalEntry(id))?;
        if let Some(date) = patch.date {
            entry.date = date;
        }
        if let Some(title) = title {
            entry.title = title;
        }
        if let Some(content) = patch.content {
            entry.content = content;
        }
        if let Some(category) = patch.category {
            entry.category = category;
        }
        if let Some(pillar) = patch.pillar {
            entry.pillar = pillar;
        }
        if let Some(mood) = mood {
            entry.mood = mood;
        }
        Ok(())
    }

    pub fn delete_journal_entry(&mut self, id: EntityId) -> StoreResult<JournalEntry> {
        let index = self
            .state
            .journal_entries
            .iter()
            .position(|entry| entry.id == id)
            .ok_or(NotFound::JournalEntry(id))?;
        Ok(self.state.journal_entries.remove(index))
    }

    /// Journal entries matching `filter`, in stored order.
    pub fn journal_filtered(&self, filter: &JournalFilter) -> Vec<&JournalEntry> {
        let needle = filter
            .search
            .as_deref()
            .map(str::trim)
            .filter(|text| !text.is_empty())
            .map(str::to_lowercase);
        self.state
            .journal_entries
            .iter()
            .filter(|entry| {
                filter
                    .pillar
                    .as_deref()
                    .map_or(true, |pillar| entry.pillar == pillar)
            })
            .filter(|entry| {
                needle
                    .as_deref()
                    .map_or(true, |needle| entry.matches_text(needle))
            })
            .collect()
    }

    /// Adds a time log; a missing duration is derived from start/end.
    pub fn add_time_log(&mut self, log: NewTimeLog) -> StoreResult<EntityId> {
        let activity = require_text("activity", &log.activity)?;
        self.ensure_pillar(&log.pillar)?;
        let duration = log.resolved_duration();

        let id = self.next_id()?;
        self.state.time_logs.push(TimeLog {
            id,
            date: log.date,
            start_time: log.start_time,
            end_time: log.end_time,
            duration,
            activity,
            category: log.category,
            pillar: log.pillar,
            notes: log.notes,
        });
        debug!("event=time_log_add module=store status=ok id={id} minutes={duration}");
        Ok(id)
    }

    pub fn update_time_log(&mut self, id: EntityId, patch: TimeLogPatch) -> StoreResult<()> {
        let activity = patch
            .activity
            .as_deref()
            .map(|activity| require_text("activity", activity))
            .transpose()?;
        if let Some(pillar) = patch.pillar.as_deref() {
            self.ensure_pillar(pillar)?;
        }

        let log = self
            .state
            .time_logs
            .iter_mut()
            .find(|log| log.id == id)
            .ok_or(NotFound::TimeLog(id))?;
        let times_changed = patch.start_time.is_some() || patch.end_time.is_some();
        if let Some(date) = patch.date {
            log.date = date;
        }
        if let Some(start) = patch.start_time {
            log.start_time = Some(start);
        }
        if let Some(end) = patch.end_time {
            log.end_time = Some(end);
        }
        match (patch.duration, times_changed, log.start_time, log.end_time) {
            (Some(minutes), _, _, _) => log.duration = minutes,
            (None, true, Some(start), Some(end)) => log.duration = elapsed_minutes(start, end),
            _ => {}
        }
        if let Some(activity) = activity {
            log.activity = activity;
        }
        if let Some(category) = patch.category {
            log.category = category;
        }
        if let Some(pillar) = patch.pillar {
            log.pillar = pillar;
        }
        if let Some(notes) = patch.notes {
            log.notes = notes;
        }
        Ok(())
    }

    pub fn delete_time_log(&mut self, id: EntityId) -> StoreResult<TimeLog> {
        let index = self
            .state
            .time_logs
            .iter()
            .position(|log| log.id == id)
            .ok_or(NotFound::TimeLog(id))?;
        Ok(self.state.time_logs.remove(index))
    }

    /// Time logs matching `filter`, in stored order.
    pub fn time_logs_filtered(&self, filter: &TimeLogFilter) -> Vec<&TimeLog> {
        self.state
            .time_logs
            .iter()
            .filter(|log| filter.matches(log))
            .collect()
    }

    pub fn add_vision(&mut self, vision: NewVision) -> StoreResult<EntityId> {
        let title = require_text("vision title", &vision.title)?;
        let progress = check_progress(vision.progress)?;
        self.ensure_pillar(&vision.pillar)?;

        let id = self.next_id()?;
        self.state.visions.push(Vision {
            id,
            title,
            description: vision.description,
            category: vision.category,
            pillar: vision.pillar,
            target_date: vision.target_date,
            progress,
            milestones: Vec::new(),
        });
        debug!("event=vision_add module=store status=ok id={id}");
        Ok(id)
    }

    pub fn update_vision(&mut self, id: EntityId, patch: VisionPatch) -> StoreResult<()> {
        let title = patch
            .title
            .as_deref()
            .map(|title| require_text("vision title", title))
            .transpose()?;
        let progress = patch.progress.map(check_progress).transpose()?;
        if let Some(pillar) = patch.pillar.as_deref() {
            self.ensure_pillar(pillar)?;
        }
        if let Some(milestones) = patch.milestones.as_deref() {
            for milestone in milestones {
                require_text("milestone text", &milestone.text)?;
            }
        }

        let vision = self.vision_mut(id)?;
        if let Some(title) = title {
            vision.title = title;
        }
        if let Some(description) = patch.description {
            vision.description = description;
        }
        if let Some(category) = patch.category {
            vision.category = category;
        }
        if let Some(pillar) = patch.pillar {
            vision.pillar = pillar;
        }
        if let Some(target_date) = patch.target_date {
            vision.target_date = target_date;
        }
        if let Some(progress) = progress {
            vision.progress = progress;
        }
        if let Some(milestones) = patch.milestones {
            vision.milestones = milestones;
        }
        Ok(())
    }

    pub fn delete_vision(&mut self, id: EntityId) -> StoreResult<Vision> {
        let index = self
            .state
            .visions
            .iter()
            .position(|vision| vision.id == id)
            .ok_or(NotFound::Vision(id))?;
        Ok(self.state.visions.remove(index))
    }

    /// Appends an incomplete milestone and returns its index.
    pub fn add_milestone(&mut self, vision_id: EntityId, text: &str) -> StoreResult<usize> {
        let text = require_text("milestone text", text)?;
        let vision = self.vision_mut(vision_id)?;
        vision.milestones.push(Milestone {
            text,
            completed: false,
        });
        Ok(vision.milestones.len() - 1)
    }

    /// Flips a milestone and returns its new state.
    pub fn toggle_milestone(&mut self, vision_id: EntityId, index: usize) -> StoreResult<bool> {
        let vision = self.vision_mut(vision_id)?;
        let milestone = vision
            .milestones
            .get_mut(index)
            .ok_or(NotFound::Milestone { vision_id, index })?;
        milestone.completed = !milestone.completed;
        Ok(milestone.completed)
    }

    /// Removes a milestone; later milestones shift down by one index.
    pub fn delete_milestone(&mut self, vision_id: EntityId, index: usize) -> StoreResult<Milestone> {
        let vision = self.vision_mut(vision_id)?;
        if index >= vision.milestones.len() {
            return Err(NotFound::Milestone { vision_id, index }.into());
        }
        Ok(vision.milestones.remove(index))
    }

    pub fn add_achievement(&mut self, achievement: NewAchievement) -> StoreResult<EntityId> {
        let title = require_text("achievement title", &achievement.title)?;
        self.ensure_pillar(&achievement.pillar)?;

        let id = self.next_id()?;
        self.state.achievements.push(Achievement {
            id,
            title,
            pillar: achievement.pillar,
            icon: achievement.icon,
            date: achievement.date,
        });
        Ok(id)
    }

    pub fn update_achievement(
        &mut self,
        id: EntityId,
        patch: AchievementPatch,
    ) -> StoreResult<()> {
        let title = patch
            .title
            .as_deref()
            .map(|title| require_text("achievement title", title))
            .transpose()?;
        if let Some(pillar) = patch.pillar.as_deref() {
            self.ensure_pillar(pillar)?;
        }

        let achievement = self
            .state
            .achievements
            .iter_mut()
            .find(|achievement| achievement.id == id)
            .ok_or(NotFound::Achievement(id))?;
        if let Some(title) = title {
            achievement.title = title;
        }
        if let Some(pillar) = patch.pillar {
            achievement.pillar = pillar;
        }
        if let Some(icon) = patch.icon {
            achievement.icon = icon;
        }
        if let Some(date) = patch.date {
            achievement.date = date;
        }
        Ok(())
    }

    pub fn delete_achievement(&mut self, id: EntityId) -> StoreResult<Achievement> {
        let index = self
            .state
            .achievements
            .iter()
            .position(|achievement| achievement.id == id)
            .ok_or(NotFound::Achievement(id))?;
        Ok(self.state.achievements.remove(index))
    }

    /// Sets the focus text for a pillar that has none yet.
    pub fn add_focus(&mut self, pillar: &str, text: &str) -> StoreResult<()> {
        self.ensure_pillar(pillar)?;
        let text = require_text("focus text", text)?;
        if self.state.current_focus.contains_key(pillar) {
            return Err(ValidationError::DuplicateFocus(pillar.to_string()).into());
        }
        self.state.current_focus.insert(pillar.to_string(), text);
        Ok(())
    }

    /// Replaces the focus text of a pillar that already has one.
    pub fn update_focus(&mut self, pillar: &str, text: &str) -> StoreResult<()> {
        let text = require_text("focus text", text)?;
        let focus = self
            .state
            .current_focus
            .get_mut(pillar)
            .ok_or_else(|| NotFound::Focus(pillar.to_string()))?;
        *focus = text;
        Ok(())
    }

    pub fn delete_focus(&mut self, pillar: &str) -> StoreResult<String> {
        self.state
            .current_focus
            .remove(pillar)
            .ok_or_else(|| NotFound::Focus(pillar.to_string()).into())
    }

    /// Updates profile fields; streak and counters are not patchable.
    pub fn update_user(&mut self, patch: UserPatch) -> StoreResult<()> {
        let name = patch
            .name
            .as_deref()
            .map(|name| require_text("user name", name))
            .transpose()?;
        let user = &mut self.state.user;
        if let Some(name) = name {
            user.name = name;
        }
        if let Some(avatar) = patch.avatar {
            user.avatar = avatar.trim().to_string();
        }
        Ok(())
    }

    fn vision_mut(&mut self, id: EntityId) -> StoreResult<&mut Vision> {
        self.state
            .visions
            .iter_mut()
            .find(|vision| vision.id == id)
            .ok_or_else(|| NotFound::Vision(id).into())
    }
}
