//! Time log model.
//!
//! # Responsibility
//! - Define logged activity sessions and their minute durations.
//! - Derive durations for timer-based sessions.
//!
//! # Invariants
//! - Timer-derived logs always carry `duration == elapsed minutes` (rounded).
//! - Manual logs trust the caller's duration; when it is omitted and both
//!   clock times are present, the duration is derived from them.
//! - Clock times are persisted as `HH:MM`; an empty string reads as absent.

use crate::model::EntityId;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::{Deserialize, Serialize};

const MINUTES_PER_DAY: u32 = 24 * 60;

/// One logged activity session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TimeLog {
    pub id: EntityId,
    pub date: NaiveDate,
    #[serde(default, with = "clock_time")]
    pub start_time: Option<NaiveTime>,
    #[serde(default, with = "clock_time")]
    pub end_time: Option<NaiveTime>,
    /// Minutes spent.
    pub duration: u32,
    pub activity: String,
    #[serde(default)]
    pub category: String,
    pub pillar: String,
    #[serde(default)]
    pub notes: String,
}

/// Creation request for a time log.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewTimeLog {
    pub date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    /// `None` derives minutes from `start_time`/`end_time` when both exist.
    pub duration: Option<u32>,
    pub activity: String,
    pub category: String,
    pub pillar: String,
    pub notes: String,
}

impl NewTimeLog {
    /// Builds a request from a stopped timer.
    ///
    /// Date and clock times come from `started_at`/`stopped_at`; duration is
    /// the elapsed time rounded to the nearest minute.
    pub fn from_timer(
        started_at: NaiveDateTime,
        stopped_at: NaiveDateTime,
        activity: impl Into<String>,
        category: impl Into<String>,
        pillar: impl Into<String>,
    ) -> Self {
        let elapsed_ms = (stopped_at - started_at).num_milliseconds().max(0);
        let minutes = ((elapsed_ms + 30_000) / 60_000) as u32;
        Self {
            date: started_at.date(),
            start_time: Some(truncate_to_minute(started_at.time())),
            end_time: Some(truncate_to_minute(stopped_at.time())),
            duration: Some(minutes),
            activity: activity.into(),
            category: category.into(),
            pillar: pillar.into(),
            notes: String::new(),
        }
    }

    /// Effective duration for this request.
    pub fn resolved_duration(&self) -> u32 {
        match (self.duration, self.start_time, self.end_time) {
            (Some(minutes), _, _) => minutes,
            (None, Some(start), Some(end)) => elapsed_minutes(start, end),
            _ => 0,
        }
    }
}

/// Partial update for a time log.
///
/// Setting either clock time without `duration` re-derives the duration from
/// the merged start/end pair.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeLogPatch {
    pub date: Option<NaiveDate>,
    pub start_time: Option<NaiveTime>,
    pub end_time: Option<NaiveTime>,
    pub duration: Option<u32>,
    pub activity: Option<String>,
    pub category: Option<String>,
    pub pillar: Option<String>,
    pub notes: Option<String>,
}

/// Time log list filter; `None` fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeLogFilter {
    pub date: Option<NaiveDate>,
    pub pillar: Option<String>,
    pub category: Option<String>,
}

impl TimeLogFilter {
    pub fn matches(&self, log: &TimeLog) -> bool {
        self.date.map_or(true, |date| log.date == date)
            && self.pillar.as_deref().map_or(true, |pillar| log.pillar == pillar)
            && self
                .category
                .as_deref()
                .map_or(true, |category| log.category == category)
    }
}

/// Minutes from `start` to `end` on a wall clock.
///
/// An `end` earlier than `start` is read as crossing midnight.
pub fn elapsed_minutes(start: NaiveTime, end: NaiveTime) -> u32 {
    let start_minute = start.num_seconds_from_midnight() / 60;
    let end_minute = end.num_seconds_from_midnight() / 60;
    if end_minute >= start_minute {
        end_minute - start_minute
    } else {
        MINUTES_PER_DAY - start_minute + end_minute
    }
}

fn truncate_to_minute(time: NaiveTime) -> NaiveTime {
    NaiveTime::from_hms_opt(time.hour(), time.minute(), 0).unwrap_or(time)
}

/// `HH:MM` wire format for optional clock times.
mod clock_time {
    use chrono::NaiveTime;
    use serde::{Deserialize, Deserializer, Serializer};

    const FORMAT: &str = "%H:%M";

    pub fn serialize<S>(value: &Option<NaiveTime>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(time) => serializer.serialize_str(&time.format(FORMAT).to_string()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<NaiveTime>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        match raw.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(text) => NaiveTime::parse_from_str(text, FORMAT)
                .or_else(|_| NaiveTime::parse_from_str(text, "%H:%M:%S"))
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{elapsed_minutes, NewTimeLog, TimeLog};
    use chrono::{NaiveDate, NaiveTime};

    fn hm(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    #[test]
    fn elapsed_minutes_handles_same_day_and_midnight() {
        assert_eq!(elapsed_minutes(hm(9, 30), hm(10, 45)), 75);
        assert_eq!(elapsed_minutes(hm(23, 30), hm(0, 15)), 45);
        assert_eq!(elapsed_minutes(hm(8, 0), hm(8, 0)), 0);
    }

    #[test]
    fn timer_rounds_to_nearest_minute() {
        let day = NaiveDate::from_ymd_opt(2025, 1, 15).unwrap();
        let start = day.and_hms_opt(14, 0, 10).unwrap();
        let stop = day.and_hms_opt(15, 29, 50).unwrap();

        let request = NewTimeLog::from_timer(start, stop, "Sprint", "Training", "Body");
        assert_eq!(request.duration, Some(90));
        assert_eq!(request.start_time, Some(hm(14, 0)));
        assert_eq!(request.end_time, Some(hm(15, 29)));
        assert_eq!(request.date, day);
    }

    #[test]
    fn manual_duration_is_trusted_over_clock_times() {
        let mut request = NewTimeLog::from_timer(
            NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            NaiveDate::from_ymd_opt(2025, 1, 15)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            "Reading",
            "Reading",
            "Soul",
        );
        request.duration = Some(45);
        assert_eq!(request.resolved_duration(), 45);

        request.duration = None;
        assert_eq!(request.resolved_duration(), 60);
    }

    #[test]
    fn clock_times_use_hh_mm_and_tolerate_empty_strings() {
        let json = serde_json::json!({
            "id": 7,
            "date": "2025-01-15",
            "startTime": "09:30",
            "endTime": "",
            "duration": 75,
            "activity": "Research",
            "category": "Research",
            "pillar": "Brain",
            "notes": ""
        });
        let log: TimeLog = serde_json::from_value(json).unwrap();
        assert_eq!(log.start_time, Some(hm(9, 30)));
        assert_eq!(log.end_time, None);

        let encoded = serde_json::to_value(&log).unwrap();
        assert_eq!(encoded["startTime"], "09:30");
        assert!(encoded["endTime"].is_null());
    }
}
