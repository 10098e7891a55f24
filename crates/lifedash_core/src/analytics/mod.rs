//! Derived analytics over a store state.
//!
//! # Responsibility
//! - Turn raw goals, time logs, journal entries and the streak ledger into
//!   chart-ready series.
//!
//! # Invariants
//! - Every function here is pure over `(state, config, today)`.
//! - Ratios with an empty denominator contribute 0.
//! - Scores are whole numbers in `0..=100`.
//!
//! # See also
//! - `insights` for the headline counters.

pub mod distribution;
pub mod insights;

pub use distribution::{apportion, DistributionSlice};

use crate::config::AnalyticsConfig;
use crate::model::user::CompletionTally;
use crate::store::StoreState;
use chrono::{Datelike, Days, Months, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Label used for time logs with a blank category.
pub const UNCATEGORIZED: &str = "Uncategorized";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PillarScore {
    pub pillar: String,
    pub score: u8,
}

/// Per-pillar scores for one calendar day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyProgressDay {
    pub date: NaiveDate,
    /// Short weekday name, e.g. `Mon`.
    pub label: String,
    pub scores: Vec<PillarScore>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryPerformance {
    pub pillar: String,
    pub score: u8,
    pub full_mark: u8,
}

/// Highest streak value recorded during one month.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthlyStreak {
    pub year: i32,
    pub month: u32,
    /// Short month name, e.g. `Jan`.
    pub label: String,
    pub streak: u32,
}

/// Everything the dashboard charts need, recomputed per call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub weekly_progress: Vec<WeeklyProgressDay>,
    pub category_performance: Vec<CategoryPerformance>,
    pub monthly_streaks: Vec<MonthlyStreak>,
    pub time_distribution_by_pillar: Vec<DistributionSlice>,
    pub time_distribution_by_category: Vec<DistributionSlice>,
}

impl Analytics {
    pub fn compute(state: &StoreState, config: &AnalyticsConfig, today: NaiveDate) -> Self {
        Self {
            weekly_progress: weekly_progress(state, config, today),
            category_performance: category_performance(state, config),
            monthly_streaks: monthly_streaks(state, config, today),
            time_distribution_by_pillar: time_by_pillar(state),
            time_distribution_by_category: time_by_category(state),
        }
    }
}

/// Trailing `weekly_window_days` days ending today, oldest first.
///
/// Today's goal rate comes from the live `today` bucket; earlier days use
/// the completion record stored for that date, or 0 when none exists.
pub fn weekly_progress(
    state: &StoreState,
    config: &AnalyticsConfig,
    today: NaiveDate,
) -> Vec<WeeklyProgressDay> {
    let mut live: BTreeMap<&str, CompletionTally> = BTreeMap::new();
    for goal in &state.goals.today {
        let tally = live.entry(goal.pillar.as_str()).or_default();
        tally.total += 1;
        if goal.completed {
            tally.completed += 1;
        }
    }

    let window = u64::from(config.weekly_window_days);
    (0..window)
        .rev()
        .filter_map(|offset| today.checked_sub_days(Days::new(offset)))
        .map(|date| {
            let scores = state
                .pillars
                .iter()
                .map(|pillar| {
                    let goal_rate = if date == today {
                        live.get(pillar.as_str()).map_or(0.0, CompletionTally::ratio)
                    } else {
                        state
                            .user
                            .completion_on(date)
                            .and_then(|record| record.pillars.get(pillar))
                            .map_or(0.0, CompletionTally::ratio)
                    };
                    let minutes: u64 = state
                        .time_logs
                        .iter()
                        .filter(|log| log.date == date && log.pillar == *pillar)
                        .map(|log| u64::from(log.duration))
                        .sum();
                    let time_rate = capped_ratio(minutes, u64::from(config.weekly_minutes_ceiling));
                    PillarScore {
                        pillar: pillar.clone(),
                        score: to_score(
                            config.weekly_goal_weight * goal_rate
                                + config.weekly_time_weight * time_rate,
                        ),
                    }
                })
                .collect();
            WeeklyProgressDay {
                date,
                label: date.format("%a").to_string(),
                scores,
            }
        })
        .collect()
}

/// One radar point per pillar, blending goal completion across every
/// period with logged minutes and journal volume.
pub fn category_performance(
    state: &StoreState,
    config: &AnalyticsConfig,
) -> Vec<CategoryPerformance> {
    state
        .pillars
        .iter()
        .map(|pillar| {
            let mut goals = CompletionTally::default();
            for (_, goal) in state.goals.iter_all() {
                if goal.pillar == *pillar {
                    goals.total += 1;
                    if goal.completed {
                        goals.completed += 1;
                    }
                }
            }
            let minutes: u64 = state
                .time_logs
                .iter()
                .filter(|log| log.pillar == *pillar)
                .map(|log| u64::from(log.duration))
                .sum();
            let journal = state
                .journal_entries
                .iter()
                .filter(|entry| entry.pillar == *pillar)
                .count() as u64;

            let blended = config.category_goal_weight * goals.ratio()
                + config.category_time_weight
                    * capped_ratio(minutes, u64::from(config.category_minutes_ceiling))
                + config.category_journal_weight
                    * capped_ratio(journal, u64::from(config.category_journal_ceiling));
            CategoryPerformance {
                pillar: pillar.clone(),
                score: to_score(blended),
                full_mark: 100,
            }
        })
        .collect()
}

/// Trailing `monthly_window` months ending with the current one, oldest
/// first.
pub fn monthly_streaks(
    state: &StoreState,
    config: &AnalyticsConfig,
    today: NaiveDate,
) -> Vec<MonthlyStreak> {
    let Some(current) = today.with_day(1) else {
        return Vec::new();
    };
    (0..config.monthly_window)
        .rev()
        .filter_map(|offset| current.checked_sub_months(Months::new(offset)))
        .map(|month_start| {
            let streak = state
                .user
                .streak_history
                .iter()
                .filter(|record| {
                    record.date.year() == month_start.year()
                        && record.date.month() == month_start.month()
                })
                .map(|record| record.streak)
                .max()
                .unwrap_or(0);
            MonthlyStreak {
                year: month_start.year(),
                month: month_start.month(),
                label: month_start.format("%b").to_string(),
                streak,
            }
        })
        .collect()
}

/// Logged minutes per pillar, in pillar order, zero rows included.
pub fn time_by_pillar(state: &StoreState) -> Vec<DistributionSlice> {
    let values: Vec<(String, u64)> = state
        .pillars
        .iter()
        .map(|pillar| {
            let minutes: u64 = state
                .time_logs
                .iter()
                .filter(|log| log.pillar == *pillar)
                .map(|log| u64::from(log.duration))
                .sum();
            (pillar.clone(), minutes)
        })
        .collect();
    apportion(values)
}

/// Logged minutes per category, sorted by category name.
pub fn time_by_category(state: &StoreState) -> Vec<DistributionSlice> {
    let mut minutes: BTreeMap<String, u64> = BTreeMap::new();
    for log in &state.time_logs {
        let category = log.category.trim();
        let key = if category.is_empty() {
            UNCATEGORIZED
        } else {
            category
        };
        *minutes.entry(key.to_string()).or_default() += u64::from(log.duration);
    }
    apportion(minutes.into_iter().collect())
}

fn capped_ratio(value: u64, ceiling: u64) -> f64 {
    if ceiling == 0 {
        return 0.0;
    }
    (value as f64 / ceiling as f64).min(1.0)
}

fn to_score(ratio: f64) -> u8 {
    (ratio * 100.0).round().clamp(0.0, 100.0) as u8
}

#[cfg(test)]
mod tests {
    use super::{category_performance, monthly_streaks, weekly_progress};
    use crate::config::AnalyticsConfig;
    use crate::model::goal::Goal;
    use crate::model::time_log::TimeLog;
    use crate::model::user::{CompletionTally, DailyCompletion, StreakRecord};
    use crate::store::StoreState;
    use chrono::NaiveDate;
    use std::collections::BTreeMap;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, d).unwrap()
    }

    fn goal(id: u64, pillar: &str, completed: bool) -> Goal {
        Goal {
            id,
            text: format!("goal {id}"),
            pillar: pillar.to_string(),
            category: "General".to_string(),
            completed,
            subgoals: Vec::new(),
            progress: None,
        }
    }

    fn log(id: u64, date: NaiveDate, pillar: &str, duration: u32) -> TimeLog {
        TimeLog {
            id,
            date,
            start_time: None,
            end_time: None,
            duration,
            activity: "work".to_string(),
            category: "Focus".to_string(),
            pillar: pillar.to_string(),
            notes: String::new(),
        }
    }

    #[test]
    fn weekly_scores_blend_goal_rate_and_minutes() {
        let mut state = StoreState::with_pillars(vec!["Brain".to_string(), "Body".to_string()]);
        state.goals.today.push(goal(1, "Brain", true));
        state.goals.today.push(goal(2, "Brain", false));
        state.time_logs.push(log(3, day(10), "Brain", 60));
        state.time_logs.push(log(4, day(10), "Body", 500));

        let mut pillars = BTreeMap::new();
        pillars.insert(
            "Body".to_string(),
            CompletionTally {
                completed: 1,
                total: 1,
            },
        );
        state.user.daily_completion_history.push(DailyCompletion {
            date: day(9),
            completed: 1,
            total: 1,
            pillars,
        });

        let series = weekly_progress(&state, &AnalyticsConfig::default(), day(10));
        assert_eq!(series.len(), 7);
        assert_eq!(series[0].date, day(4));

        let today = &series[6];
        assert_eq!(today.label, "Mon");
        // 0.7 * 0.5 + 0.3 * 0.5
        assert_eq!(today.scores[0].score, 50);
        // no goals, minutes capped at the ceiling
        assert_eq!(today.scores[1].score, 30);

        let yesterday = &series[5];
        assert_eq!(yesterday.scores[0].score, 0);
        assert_eq!(yesterday.scores[1].score, 70);
    }

    #[test]
    fn category_performance_uses_every_period() {
        let mut state = StoreState::with_pillars(vec!["Soul".to_string()]);
        state.goals.weekly.push(goal(1, "Soul", true));
        state.goals.monthly.push(goal(2, "Soul", false));
        state.time_logs.push(log(3, day(1), "Soul", 300));

        let radar = category_performance(&state, &AnalyticsConfig::default());
        // 0.5 * 0.5 + 0.3 * 0.5 + 0.2 * 0
        assert_eq!(radar[0].score, 40);
        assert_eq!(radar[0].full_mark, 100);
    }

    #[test]
    fn monthly_streaks_take_the_max_per_month() {
        let mut state = StoreState::default();
        for (date, streak) in [(day(1), 1), (day(2), 2), (day(3), 3)] {
            state.user.streak_history.push(StreakRecord { date, streak });
        }
        state.user.streak_history.push(StreakRecord {
            date: NaiveDate::from_ymd_opt(2025, 1, 20).unwrap(),
            streak: 9,
        });

        let months = monthly_streaks(&state, &AnalyticsConfig::default(), day(15));
        let labels: Vec<&str> = months.iter().map(|m| m.label.as_str()).collect();
        assert_eq!(labels, ["Nov", "Dec", "Jan", "Feb", "Mar"]);
        let streaks: Vec<u32> = months.iter().map(|m| m.streak).collect();
        assert_eq!(streaks, [0, 0, 9, 0, 3]);
        assert_eq!(months[0].year, 2024);
    }
}
