//! Headline counters for the insights and vision views.

use crate::model::goal::Period;
use crate::model::user::CompletionTally;
use crate::model::vision::Vision;
use crate::model::EntityId;
use crate::store::StoreState;
use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};

/// Progress at or above which a vision counts as nearly complete.
pub const NEAR_COMPLETION_PROGRESS: u8 = 75;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarTime {
    pub pillar: String,
    pub minutes: u64,
    pub activities: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodCompletion {
    pub period: Period,
    pub completed: u32,
    pub total: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insights {
    pub total_minutes_logged: u64,
    pub activity_count: usize,
    /// Pillars in order of their first time log.
    pub pillar_time: Vec<PillarTime>,
    /// Pillar with the most logged minutes; the earliest wins ties.
    pub most_productive_pillar: Option<String>,
    pub completion_by_period: Vec<PeriodCompletion>,
    pub goals_completed: u32,
    /// Entries dated within the last seven days, today included.
    pub journal_entries_this_week: usize,
    pub journal_entries_total: usize,
    pub current_streak: u32,
    /// Share of the `today` bucket that is complete, `0..=100`.
    pub today_progress: u8,
}

impl Insights {
    pub fn compute(state: &StoreState, today: NaiveDate) -> Self {
        let mut pillar_time: Vec<PillarTime> = Vec::new();
        for log in &state.time_logs {
            match pillar_time.iter_mut().find(|row| row.pillar == log.pillar) {
                Some(row) => {
                    row.minutes += u64::from(log.duration);
                    row.activities += 1;
                }
                None => pillar_time.push(PillarTime {
                    pillar: log.pillar.clone(),
                    minutes: u64::from(log.duration),
                    activities: 1,
                }),
            }
        }
        let total_minutes_logged: u64 = pillar_time.iter().map(|row| row.minutes).sum();

        let mut most_productive: Option<&PillarTime> = None;
        for row in &pillar_time {
            if most_productive.map_or(true, |best| row.minutes > best.minutes) {
                most_productive = Some(row);
            }
        }
        let most_productive_pillar = most_productive.map(|row| row.pillar.clone());

        let completion_by_period: Vec<PeriodCompletion> = Period::ALL
            .iter()
            .map(|&period| {
                let goals = state.goals.bucket(period);
                PeriodCompletion {
                    period,
                    completed: goals.iter().filter(|goal| goal.completed).count() as u32,
                    total: goals.len() as u32,
                }
            })
            .collect();
        let goals_completed: u32 = completion_by_period.iter().map(|row| row.completed).sum();
        let today_progress = completion_by_period
            .iter()
            .find(|row| row.period == Period::Today)
            .map_or(0, |row| {
                let ratio = CompletionTally {
                    completed: row.completed,
                    total: row.total,
                }
                .ratio();
                (ratio * 100.0).round() as u8
            });

        let week_start = today.checked_sub_days(Days::new(6)).unwrap_or(today);
        let journal_entries_this_week = state
            .journal_entries
            .iter()
            .filter(|entry| entry.date >= week_start && entry.date <= today)
            .count();

        Self {
            total_minutes_logged,
            activity_count: state.time_logs.len(),
            pillar_time,
            most_productive_pillar,
            completion_by_period,
            goals_completed,
            journal_entries_this_week,
            journal_entries_total: state.journal_entries.len(),
            current_streak: state.user.current_streak,
            today_progress,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionSummary {
    /// Highest progress; the latest vision wins ties.
    pub most_advanced: Option<EntityId>,
    /// Vision with the earliest target date; the latest vision wins ties.
    pub next_deadline: Option<EntityId>,
    /// Most frequent category; the first seen wins ties.
    pub most_active_category: Option<String>,
    /// Rounded mean progress, 0 when there are no visions.
    pub average_progress: u8,
    pub near_completion: usize,
}

impl VisionSummary {
    pub fn compute(visions: &[Vision]) -> Self {
        let most_advanced = visions
            .iter()
            .fold(None::<&Vision>, |best, vision| match best {
                Some(best) if best.progress > vision.progress => Some(best),
                _ => Some(vision),
            })
            .map(|vision| vision.id);

        let next_deadline = visions
            .iter()
            .filter_map(|vision| vision.target_date.map(|date| (date, vision.id)))
            .fold(None::<(NaiveDate, EntityId)>, |best, candidate| match best {
                Some(best) if best.0 < candidate.0 => Some(best),
                _ => Some(candidate),
            })
            .map(|(_, id)| id);

        let mut categories: Vec<(&str, usize)> = Vec::new();
        for vision in visions {
            let category = vision.category.trim();
            if category.is_empty() {
                continue;
            }
            match categories.iter_mut().find(|(name, _)| *name == category) {
                Some((_, count)) => *count += 1,
                None => categories.push((category, 1)),
            }
        }
        let mut most_active: Option<(&str, usize)> = None;
        for &(name, count) in &categories {
            if most_active.map_or(true, |(_, best)| count > best) {
                most_active = Some((name, count));
            }
        }

        let average_progress = if visions.is_empty() {
            0
        } else {
            let sum: u32 = visions.iter().map(|vision| u32::from(vision.progress)).sum();
            (f64::from(sum) / visions.len() as f64).round() as u8
        };

        Self {
            most_advanced,
            next_deadline,
            most_active_category: most_active.map(|(name, _)| name.to_string()),
            average_progress,
            near_completion: visions
                .iter()
                .filter(|vision| vision.progress >= NEAR_COMPLETION_PROGRESS)
                .count(),
        }
    }
}
