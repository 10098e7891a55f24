//! FFI use-case API for the dashboard UI shell.
//!
//! # Responsibility
//! - Expose use-case level store operations to Dart via FRB.
//! - Persist after every successful mutation.
//!
//! # Invariants
//! - Exported functions never panic across the FFI boundary.
//! - Calls are serialized; each one reads the latest snapshot and writes
//!   its own result before the next call starts.
//! - Entity ids cross the boundary as decimal strings.

use chrono::{NaiveDate, NaiveTime};
use lifedash_core::db::open_db;
use lifedash_core::model::achievement::{AchievementPatch, NewAchievement};
use lifedash_core::model::goal::{GoalPatch, NewGoal};
use lifedash_core::model::journal::{JournalPatch, NewJournalEntry};
use lifedash_core::model::time_log::{NewTimeLog, TimeLogPatch};
use lifedash_core::model::user::UserPatch;
use lifedash_core::model::vision::{NewVision, VisionPatch};
use lifedash_core::{
    core_version as core_version_inner, init_logging as init_logging_inner, ping as ping_inner,
    EntityId, Period, ServiceResult, SqliteSnapshotRepository, StoreConfig, StoreService,
    StreakOutcome, SystemClock,
};
use log::warn;
use serde::Serialize;
use std::error::Error;
use std::path::PathBuf;
use std::sync::{Mutex, OnceLock, PoisonError};

const STORE_DB_FILE_NAME: &str = "lifedash_store.sqlite3";
static STORE_DB_PATH: OnceLock<PathBuf> = OnceLock::new();
static STORE_CONFIG: OnceLock<StoreConfig> = OnceLock::new();
static STORE_LOCK: Mutex<()> = Mutex::new(());

/// Minimal health-check API for FRB smoke integration.
#[flutter_rust_bridge::frb(sync)]
pub fn ping() -> String {
    ping_inner().to_owned()
}

#[flutter_rust_bridge::frb(sync)]
pub fn core_version() -> String {
    core_version_inner().to_owned()
}

/// Initializes core logging once per process.
///
/// Returns an empty string on success and an error message otherwise.
#[flutter_rust_bridge::frb(sync)]
pub fn init_logging(level: String, log_dir: String) -> String {
    match init_logging_inner(&level, &log_dir) {
        Ok(()) => String::new(),
        Err(err) => err.to_string(),
    }
}

/// Installs a JSON config override before the first store call.
///
/// Returns an empty string on success. A second call is rejected.
#[flutter_rust_bridge::frb(sync)]
pub fn configure_store(config_json: String) -> String {
    let config = match StoreConfig::from_json_str(&config_json) {
        Ok(config) => config,
        Err(err) => return err.to_string(),
    };
    match STORE_CONFIG.set(config) {
        Ok(()) => String::new(),
        Err(_) => "store config already set".to_string(),
    }
}

/// Result envelope for mutations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionResponse {
    pub ok: bool,
    /// Id of the created or affected entity, when there is one.
    pub entity_id: Option<String>,
    pub message: String,
}

impl ActionResponse {
    fn success(message: impl Into<String>, entity_id: Option<EntityId>) -> Self {
        Self {
            ok: true,
            entity_id: entity_id.map(|id| id.to_string()),
            message: message.into(),
        }
    }

    fn failure(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            entity_id: None,
            message: message.into(),
        }
    }
}

/// Result envelope for reads; `json` is empty on failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    pub ok: bool,
    pub json: String,
    pub message: String,
}

/// Full store state as camelCase JSON.
#[flutter_rust_bridge::frb(sync)]
pub fn store_snapshot_json() -> QueryResponse {
    query("store_snapshot_json", |service| Ok(service.store().snapshot()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn analytics_json() -> QueryResponse {
    query("analytics_json", |service| Ok(service.store().analytics()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn insights_json() -> QueryResponse {
    query("insights_json", |service| Ok(service.store().insights()))
}

#[flutter_rust_bridge::frb(sync)]
pub fn vision_summary_json() -> QueryResponse {
    query("vision_summary_json", |service| {
        Ok(service.store().vision_summary())
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn pillar_add(name: String) -> ActionResponse {
    action("pillar_add", |service| {
        service.apply(|store| store.add_pillar(&name))?;
        Ok(("Pillar added.".to_string(), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn pillar_rename(old_name: String, new_name: String) -> ActionResponse {
    action("pillar_rename", |service| {
        service.apply(|store| store.rename_pillar(&old_name, &new_name))?;
        Ok(("Pillar renamed.".to_string(), None))
    })
}

/// Deletes a pillar together with every entity tagged with it.
#[flutter_rust_bridge::frb(sync)]
pub fn pillar_delete(name: String) -> ActionResponse {
    action("pillar_delete", |service| {
        service.apply(|store| store.delete_pillar(&name))?;
        Ok(("Pillar deleted.".to_string(), None))
    })
}

/// Adds a goal to `period` (`today|weekly|monthly`).
#[flutter_rust_bridge::frb(sync)]
pub fn goal_add(
    period: String,
    text: String,
    pillar: String,
    category: Option<String>,
) -> ActionResponse {
    action("goal_add", |service| {
        let period: Period = parse(&period)?;
        let mut goal = NewGoal::new(text, pillar);
        if let Some(category) = category {
            goal = goal.with_category(category);
        }
        let id = service.apply(|store| store.add_goal(period, goal))?;
        Ok(("Goal added.".to_string(), Some(id)))
    })
}

/// Toggles a goal; `today` goals also run the streak check.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_toggle(period: String, goal_id: String) -> ActionResponse {
    action("goal_toggle", |service| {
        let period: Period = parse(&period)?;
        let id = parse_id(&goal_id)?;
        let (completed, outcome) = service.apply(|store| {
            let completed = store.toggle_goal(period, id)?;
            let outcome = (period == Period::Today).then(|| store.check_streak_update());
            Ok((completed, outcome))
        })?;
        let mut message = if completed {
            "Goal completed.".to_string()
        } else {
            "Goal reopened.".to_string()
        };
        if let Some(StreakOutcome::Awarded(streak)) = outcome {
            message.push_str(&format!(" Streak is now {streak}."));
        }
        Ok((message, Some(id)))
    })
}

/// Patches a goal; `None` leaves a field unchanged.
#[flutter_rust_bridge::frb(sync)]
pub fn goal_update(
    period: String,
    goal_id: String,
    text: Option<String>,
    pillar: Option<String>,
    category: Option<String>,
    progress: Option<u8>,
) -> ActionResponse {
    action("goal_update", |service| {
        let period: Period = parse(&period)?;
        let id = parse_id(&goal_id)?;
        let patch = GoalPatch {
            text,
            pillar,
            category,
            progress,
            ..GoalPatch::default()
        };
        service.apply(|store| store.update_goal(period, id, patch))?;
        Ok(("Goal updated.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn goal_delete(period: String, goal_id: String) -> ActionResponse {
    action("goal_delete", |service| {
        let period: Period = parse(&period)?;
        let id = parse_id(&goal_id)?;
        service.apply(|store| store.delete_goal(period, id))?;
        Ok(("Goal deleted.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn subgoal_add(period: String, goal_id: String, text: String) -> ActionResponse {
    action("subgoal_add", |service| {
        let period: Period = parse(&period)?;
        let goal_id = parse_id(&goal_id)?;
        let id = service.apply(|store| store.add_subgoal(period, goal_id, &text))?;
        Ok(("Subgoal added.".to_string(), Some(id)))
    })
}

/// Toggles a subgoal; the message carries the parent's new progress.
#[flutter_rust_bridge::frb(sync)]
pub fn subgoal_toggle(period: String, goal_id: String, subgoal_id: String) -> ActionResponse {
    action("subgoal_toggle", |service| {
        let period: Period = parse(&period)?;
        let goal_id = parse_id(&goal_id)?;
        let subgoal_id = parse_id(&subgoal_id)?;
        let progress =
            service.apply(|store| store.toggle_subgoal(period, goal_id, subgoal_id))?;
        Ok((format!("Goal progress is {progress}%."), Some(subgoal_id)))
    })
}

/// Deletes a subgoal; the message carries the parent's new progress.
#[flutter_rust_bridge::frb(sync)]
pub fn subgoal_delete(period: String, goal_id: String, subgoal_id: String) -> ActionResponse {
    action("subgoal_delete", |service| {
        let period: Period = parse(&period)?;
        let goal_id = parse_id(&goal_id)?;
        let subgoal_id = parse_id(&subgoal_id)?;
        let progress =
            service.apply(|store| store.delete_subgoal(period, goal_id, subgoal_id))?;
        Ok((format!("Goal progress is {progress}%."), Some(subgoal_id)))
    })
}

/// Runs the daily streak check explicitly.
#[flutter_rust_bridge::frb(sync)]
pub fn streak_check() -> ActionResponse {
    action("streak_check", |service| {
        let outcome = service.apply(|store| Ok(store.check_streak_update()))?;
        let message = match outcome {
            StreakOutcome::Awarded(streak) => format!("Streak is now {streak}."),
            StreakOutcome::AlreadyAwarded => "Today already counted.".to_string(),
            StreakOutcome::Incomplete { completed, total } => {
                format!("{completed} of {total} goals done.")
            }
            StreakOutcome::NoGoals => "No goals for today.".to_string(),
        };
        Ok((message, None))
    })
}

/// Sets the streak back to zero.
#[flutter_rust_bridge::frb(sync)]
pub fn streak_reset() -> ActionResponse {
    action("streak_reset", |service| {
        service.apply(|store| {
            store.reset_streak();
            Ok(())
        })?;
        Ok(("Streak reset.".to_string(), None))
    })
}

/// Resets the streak only when yesterday went uncounted.
#[flutter_rust_bridge::frb(sync)]
pub fn streak_reset_if_lapsed() -> ActionResponse {
    action("streak_reset_if_lapsed", |service| {
        let reset = service.apply(|store| Ok(store.reset_streak_if_lapsed()))?;
        let message = if reset {
            "Streak lapsed and was reset."
        } else {
            "Streak is still running."
        };
        Ok((message.to_string(), None))
    })
}

/// Adds a journal entry; `date` is `YYYY-MM-DD`, `mood` is 1..=5.
#[flutter_rust_bridge::frb(sync)]
pub fn journal_add(
    date: String,
    title: String,
    content: String,
    category: String,
    pillar: String,
    mood: u8,
) -> ActionResponse {
    action("journal_add", |service| {
        let entry = NewJournalEntry {
            date: parse_date(&date)?,
            title,
            content,
            category,
            pillar,
            mood,
        };
        let id = service.apply(|store| store.add_journal_entry(entry))?;
        Ok(("Journal entry saved.".to_string(), Some(id)))
    })
}

/// Patches a journal entry; `None` leaves a field unchanged.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn journal_update(
    entry_id: String,
    date: Option<String>,
    title: Option<String>,
    content: Option<String>,
    category: Option<String>,
    pillar: Option<String>,
    mood: Option<u8>,
) -> ActionResponse {
    action("journal_update", |service| {
        let id = parse_id(&entry_id)?;
        let patch = JournalPatch {
            date: date.as_deref().map(parse_date).transpose()?,
            title,
            content,
            category,
            pillar,
            mood,
        };
        service.apply(|store| store.update_journal_entry(id, patch))?;
        Ok(("Journal entry updated.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn journal_delete(entry_id: String) -> ActionResponse {
    action("journal_delete", |service| {
        let id = parse_id(&entry_id)?;
        service.apply(|store| store.delete_journal_entry(id))?;
        Ok(("Journal entry deleted.".to_string(), Some(id)))
    })
}

/// Adds a time log. Times are `HH:MM`; a missing duration is derived from
/// them.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn time_log_add(
    date: String,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<u32>,
    activity: String,
    category: String,
    pillar: String,
    notes: String,
) -> ActionResponse {
    action("time_log_add", |service| {
        let log = NewTimeLog {
            date: parse_date(&date)?,
            start_time: start_time.as_deref().map(parse_time).transpose()?,
            end_time: end_time.as_deref().map(parse_time).transpose()?,
            duration,
            activity,
            category,
            pillar,
            notes,
        };
        let id = service.apply(|store| store.add_time_log(log))?;
        Ok(("Time logged.".to_string(), Some(id)))
    })
}

/// Patches a time log. Changing a clock time without a duration re-derives
/// the duration.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn time_log_update(
    log_id: String,
    date: Option<String>,
    start_time: Option<String>,
    end_time: Option<String>,
    duration: Option<u32>,
    activity: Option<String>,
    category: Option<String>,
    pillar: Option<String>,
    notes: Option<String>,
) -> ActionResponse {
    action("time_log_update", |service| {
        let id = parse_id(&log_id)?;
        let patch = TimeLogPatch {
            date: date.as_deref().map(parse_date).transpose()?,
            start_time: start_time.as_deref().map(parse_time).transpose()?,
            end_time: end_time.as_deref().map(parse_time).transpose()?,
            duration,
            activity,
            category,
            pillar,
            notes,
        };
        service.apply(|store| store.update_time_log(id, patch))?;
        Ok(("Time log updated.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn time_log_delete(log_id: String) -> ActionResponse {
    action("time_log_delete", |service| {
        let id = parse_id(&log_id)?;
        service.apply(|store| store.delete_time_log(id))?;
        Ok(("Time log deleted.".to_string(), Some(id)))
    })
}

/// Adds a vision; `target_date` is `YYYY-MM-DD`.
#[flutter_rust_bridge::frb(sync)]
pub fn vision_add(
    title: String,
    description: String,
    category: String,
    pillar: String,
    target_date: Option<String>,
    progress: u8,
) -> ActionResponse {
    action("vision_add", |service| {
        let vision = NewVision {
            title,
            description,
            category,
            pillar,
            target_date: target_date.as_deref().map(parse_date).transpose()?,
            progress,
        };
        let id = service.apply(|store| store.add_vision(vision))?;
        Ok(("Vision added.".to_string(), Some(id)))
    })
}

/// Patches a vision. An empty `target_date` clears the date.
#[allow(clippy::too_many_arguments)]
#[flutter_rust_bridge::frb(sync)]
pub fn vision_update(
    vision_id: String,
    title: Option<String>,
    description: Option<String>,
    category: Option<String>,
    pillar: Option<String>,
    target_date: Option<String>,
    progress: Option<u8>,
) -> ActionResponse {
    action("vision_update", |service| {
        let id = parse_id(&vision_id)?;
        let patch = VisionPatch {
            title,
            description,
            category,
            pillar,
            target_date: target_date.as_deref().map(parse_clearable_date).transpose()?,
            progress,
            milestones: None,
        };
        service.apply(|store| store.update_vision(id, patch))?;
        Ok(("Vision updated.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn vision_delete(vision_id: String) -> ActionResponse {
    action("vision_delete", |service| {
        let id = parse_id(&vision_id)?;
        service.apply(|store| store.delete_vision(id))?;
        Ok(("Vision deleted.".to_string(), Some(id)))
    })
}

/// Appends a milestone; the message carries its index.
#[flutter_rust_bridge::frb(sync)]
pub fn milestone_add(vision_id: String, text: String) -> ActionResponse {
    action("milestone_add", |service| {
        let id = parse_id(&vision_id)?;
        let index = service.apply(|store| store.add_milestone(id, &text))?;
        Ok((format!("Milestone {index} added."), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn milestone_toggle(vision_id: String, index: u32) -> ActionResponse {
    action("milestone_toggle", |service| {
        let id = parse_id(&vision_id)?;
        let completed = service.apply(|store| store.toggle_milestone(id, index as usize))?;
        let message = if completed {
            "Milestone reached."
        } else {
            "Milestone reopened."
        };
        Ok((message.to_string(), Some(id)))
    })
}

/// Removes a milestone; later milestones shift down by one index.
#[flutter_rust_bridge::frb(sync)]
pub fn milestone_delete(vision_id: String, index: u32) -> ActionResponse {
    action("milestone_delete", |service| {
        let id = parse_id(&vision_id)?;
        service.apply(|store| store.delete_milestone(id, index as usize))?;
        Ok(("Milestone deleted.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn achievement_add(
    title: String,
    pillar: String,
    icon: String,
    date: String,
) -> ActionResponse {
    action("achievement_add", |service| {
        let achievement = NewAchievement {
            title,
            pillar,
            icon,
            date: parse_date(&date)?,
        };
        let id = service.apply(|store| store.add_achievement(achievement))?;
        Ok(("Achievement recorded.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn achievement_update(
    achievement_id: String,
    title: Option<String>,
    pillar: Option<String>,
    icon: Option<String>,
    date: Option<String>,
) -> ActionResponse {
    action("achievement_update", |service| {
        let id = parse_id(&achievement_id)?;
        let patch = AchievementPatch {
            title,
            pillar,
            icon,
            date: date.as_deref().map(parse_date).transpose()?,
        };
        service.apply(|store| store.update_achievement(id, patch))?;
        Ok(("Achievement updated.".to_string(), Some(id)))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn achievement_delete(achievement_id: String) -> ActionResponse {
    action("achievement_delete", |service| {
        let id = parse_id(&achievement_id)?;
        service.apply(|store| store.delete_achievement(id))?;
        Ok(("Achievement deleted.".to_string(), Some(id)))
    })
}

/// Sets a pillar's focus text, replacing any existing one.
#[flutter_rust_bridge::frb(sync)]
pub fn focus_set(pillar: String, text: String) -> ActionResponse {
    action("focus_set", |service| {
        service.apply(|store| {
            if store.current_focus().contains_key(&pillar) {
                store.update_focus(&pillar, &text)
            } else {
                store.add_focus(&pillar, &text)
            }
        })?;
        Ok(("Focus updated.".to_string(), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn focus_clear(pillar: String) -> ActionResponse {
    action("focus_clear", |service| {
        service.apply(|store| store.delete_focus(&pillar))?;
        Ok(("Focus cleared.".to_string(), None))
    })
}

#[flutter_rust_bridge::frb(sync)]
pub fn user_update(name: Option<String>, avatar: Option<String>) -> ActionResponse {
    action("user_update", |service| {
        service.apply(|store| store.update_user(UserPatch { name, avatar }))?;
        Ok(("Profile updated.".to_string(), None))
    })
}

/// Deletes the stored snapshot and starts over with default pillars.
#[flutter_rust_bridge::frb(sync)]
pub fn store_reset() -> ActionResponse {
    action("store_reset", |service| {
        service.reset()?;
        Ok(("Store reset.".to_string(), None))
    })
}

type Service<'conn> = StoreService<SqliteSnapshotRepository<'conn>>;
type CallResult<T> = Result<T, Box<dyn Error>>;

fn action(
    name: &str,
    f: impl FnOnce(&mut Service<'_>) -> CallResult<(String, Option<EntityId>)>,
) -> ActionResponse {
    match with_service(f) {
        Ok((message, id)) => ActionResponse::success(message, id),
        Err(err) => {
            warn!("event=ffi_call module=ffi status=error call={name}");
            ActionResponse::failure(format!("{name} failed: {err}"))
        }
    }
}

fn query<T: Serialize>(
    name: &str,
    f: impl FnOnce(&mut Service<'_>) -> ServiceResult<T>,
) -> QueryResponse {
    let result = with_service(|service| Ok(serde_json::to_string(&f(service)?)?));
    match result {
        Ok(json) => QueryResponse {
            ok: true,
            json,
            message: String::new(),
        },
        Err(err) => QueryResponse {
            ok: false,
            json: String::new(),
            message: format!("{name} failed: {err}"),
        },
    }
}

fn with_service<T>(f: impl FnOnce(&mut Service<'_>) -> CallResult<T>) -> CallResult<T> {
    let _guard = STORE_LOCK.lock().unwrap_or_else(PoisonError::into_inner);
    let conn = open_db(resolve_store_db_path())?;
    let config = STORE_CONFIG.get().cloned().unwrap_or_default();
    let mut service =
        StoreService::open(SqliteSnapshotRepository::new(&conn), config, SystemClock)?;
    f(&mut service)
}

fn resolve_store_db_path() -> PathBuf {
    STORE_DB_PATH
        .get_or_init(|| {
            if let Ok(raw) = std::env::var("LIFEDASH_DB_PATH") {
                let trimmed = raw.trim();
                if !trimmed.is_empty() {
                    return PathBuf::from(trimmed);
                }
            }
            std::env::temp_dir().join(STORE_DB_FILE_NAME)
        })
        .clone()
}

fn parse<T>(raw: &str) -> Result<T, String>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.parse::<T>().map_err(|err| err.to_string())
}

fn parse_id(raw: &str) -> Result<EntityId, String> {
    raw.trim()
        .parse::<EntityId>()
        .map_err(|_| format!("invalid id `{}`", raw.trim()))
}

fn parse_date(raw: &str) -> Result<NaiveDate, String> {
    NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d")
        .map_err(|_| format!("invalid date `{}`; expected YYYY-MM-DD", raw.trim()))
}

/// Empty input clears the date.
fn parse_clearable_date(raw: &str) -> Result<Option<NaiveDate>, String> {
    if raw.trim().is_empty() {
        return Ok(None);
    }
    parse_date(raw).map(Some)
}

fn parse_time(raw: &str) -> Result<NaiveTime, String> {
    NaiveTime::parse_from_str(raw.trim(), "%H:%M")
        .map_err(|_| format!("invalid time `{}`; expected HH:MM", raw.trim()))
}
