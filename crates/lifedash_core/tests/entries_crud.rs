use chrono::{NaiveDate, NaiveTime};
use lifedash_core::model::achievement::{AchievementPatch, NewAchievement};
use lifedash_core::model::journal::{JournalFilter, JournalPatch, NewJournalEntry};
use lifedash_core::model::time_log::{NewTimeLog, TimeLogFilter, TimeLogPatch};
use lifedash_core::model::user::UserPatch;
use lifedash_core::model::vision::{NewVision, VisionPatch};
use lifedash_core::{FixedClock, LifeStore, NotFound, StoreConfig, StoreError, ValidationError};

fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 7, d).unwrap()
}

fn hm(hour: u32, minute: u32) -> NaiveTime {
    NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
}

fn store() -> LifeStore {
    LifeStore::new(StoreConfig::default(), FixedClock::at_date(day(14))).unwrap()
}

fn journal(title: &str, content: &str, pillar: &str, mood: u8) -> NewJournalEntry {
    NewJournalEntry {
        date: day(14),
        title: title.to_string(),
        content: content.to_string(),
        category: "Reflection".to_string(),
        pillar: pillar.to_string(),
        mood,
    }
}

fn time_log(pillar: &str, category: &str, date: NaiveDate) -> NewTimeLog {
    NewTimeLog {
        date,
        start_time: Some(hm(9, 0)),
        end_time: Some(hm(9, 45)),
        duration: None,
        activity: "Deep work".to_string(),
        category: category.to_string(),
        pillar: pillar.to_string(),
        notes: String::new(),
    }
}

#[test]
fn journal_validates_mood_and_filters_by_text_and_pillar() {
    let mut store = store();
    assert!(matches!(
        store.add_journal_entry(journal("Bad", "", "Soul", 6)),
        Err(StoreError::Validation(ValidationError::MoodOutOfRange(6)))
    ));
    assert!(store.journal_entries().is_empty());

    let calm = store
        .add_journal_entry(journal("Calm morning", "Meditated", "Soul", 4))
        .unwrap();
    store
        .add_journal_entry(journal("Gym", "Leg day", "Body", 3))
        .unwrap();

    let filter = JournalFilter {
        search: Some("MEDIT".to_string()),
        pillar: None,
    };
    let hits = store.journal_filtered(&filter);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].id, calm);

    let filter = JournalFilter {
        search: Some("   ".to_string()),
        pillar: Some("Body".to_string()),
    };
    assert_eq!(store.journal_filtered(&filter).len(), 1);

    store
        .update_journal_entry(
            calm,
            JournalPatch {
                mood: Some(5),
                ..JournalPatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.journal_entries()[0].mood, 5);
    store.delete_journal_entry(calm).unwrap();
    assert!(matches!(
        store.delete_journal_entry(calm),
        Err(StoreError::NotFound(NotFound::JournalEntry(_)))
    ));
}

#[test]
fn time_log_duration_is_derived_and_rederived() {
    let mut store = store();
    let id = store.add_time_log(time_log("Brain", "Study", day(14))).unwrap();
    assert_eq!(store.time_logs()[0].duration, 45);

    store
        .update_time_log(
            id,
            TimeLogPatch {
                end_time: Some(hm(10, 30)),
                ..TimeLogPatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.time_logs()[0].duration, 90);

    store
        .update_time_log(
            id,
            TimeLogPatch {
                duration: Some(20),
                ..TimeLogPatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.time_logs()[0].duration, 20);

    assert!(matches!(
        store.update_time_log(999, TimeLogPatch::default()),
        Err(StoreError::NotFound(NotFound::TimeLog(999)))
    ));
}

#[test]
fn time_logs_filter_by_date_pillar_and_category() {
    let mut store = store();
    store.add_time_log(time_log("Brain", "Study", day(14))).unwrap();
    store.add_time_log(time_log("Brain", "Reading", day(13))).unwrap();
    store.add_time_log(time_log("Body", "Study", day(14))).unwrap();

    let filter = TimeLogFilter {
        date: Some(day(14)),
        pillar: Some("Brain".to_string()),
        category: None,
    };
    assert_eq!(store.time_logs_filtered(&filter).len(), 1);

    let filter = TimeLogFilter {
        category: Some("Study".to_string()),
        ..TimeLogFilter::default()
    };
    assert_eq!(store.time_logs_filtered(&filter).len(), 2);
    assert_eq!(store.time_logs_filtered(&TimeLogFilter::default()).len(), 3);
}

#[test]
fn milestones_are_addressed_by_index() {
    let mut store = store();
    let vision = store
        .add_vision(NewVision {
            title: "Run a marathon".to_string(),
            description: String::new(),
            category: "Health".to_string(),
            pillar: "Body".to_string(),
            target_date: Some(day(31)),
            progress: 20,
        })
        .unwrap();

    assert_eq!(store.add_milestone(vision, "10k").unwrap(), 0);
    assert_eq!(store.add_milestone(vision, "Half").unwrap(), 1);
    assert!(store.toggle_milestone(vision, 1).unwrap());
    let removed = store.delete_milestone(vision, 0).unwrap();
    assert_eq!(removed.text, "10k");
    assert!(store.visions()[0].milestones[0].completed);

    assert!(matches!(
        store.toggle_milestone(vision, 5),
        Err(StoreError::NotFound(NotFound::Milestone { index: 5, .. }))
    ));
    assert!(matches!(
        store.update_vision(
            vision,
            VisionPatch {
                progress: Some(101),
                ..VisionPatch::default()
            }
        ),
        Err(StoreError::Validation(ValidationError::ProgressOutOfRange(101)))
    ));

    store
        .update_vision(
            vision,
            VisionPatch {
                target_date: Some(None),
                ..VisionPatch::default()
            },
        )
        .unwrap();
    assert_eq!(store.visions()[0].target_date, None);
}

#[test]
fn focus_entries_are_unique_per_pillar() {
    let mut store = store();
    store.add_focus("Voice", "Public speaking").unwrap();
    assert!(matches!(
        store.add_focus("Voice", "Again"),
        Err(StoreError::Validation(ValidationError::DuplicateFocus(_)))
    ));
    assert!(matches!(
        store.add_focus("Nowhere", "x"),
        Err(StoreError::Validation(ValidationError::UnknownPillar(_)))
    ));

    store.update_focus("Voice", "Podcasting").unwrap();
    assert_eq!(store.current_focus()["Voice"], "Podcasting");
    assert!(matches!(
        store.update_focus("Soul", "x"),
        Err(StoreError::NotFound(NotFound::Focus(_)))
    ));
    assert_eq!(store.delete_focus("Voice").unwrap(), "Podcasting");
    assert!(store.delete_focus("Voice").is_err());
}

#[test]
fn user_profile_patch_keeps_streak_fields() {
    let mut store = store();
    store
        .update_user(UserPatch {
            name: Some(" Sam ".to_string()),
            avatar: None,
        })
        .unwrap();
    assert_eq!(store.user().name, "Sam");
    assert!(store
        .update_user(UserPatch {
            name: Some(String::new()),
            avatar: None,
        })
        .is_err());
    assert_eq!(store.user().current_streak, 0);
}

#[test]
fn achievements_round_trip_and_report_missing_ids() {
    let mut store = store();
    let id = store
        .add_achievement(NewAchievement {
            title: "  First 5k  ".to_string(),
            pillar: "Body".to_string(),
            icon: "medal".to_string(),
            date: day(3),
        })
        .unwrap();
    assert_eq!(store.achievements()[0].title, "First 5k");

    assert!(matches!(
        store.add_achievement(NewAchievement {
            title: "Talk".to_string(),
            pillar: "Nowhere".to_string(),
            icon: String::new(),
            date: day(3),
        }),
        Err(StoreError::Validation(ValidationError::UnknownPillar(_)))
    ));

    store
        .update_achievement(
            id,
            AchievementPatch {
                title: Some("First 10k".to_string()),
                date: Some(day(10)),
                ..AchievementPatch::default()
            },
        )
        .unwrap();
    let stored = &store.achievements()[0];
    assert_eq!(stored.title, "First 10k");
    assert_eq!(stored.date, day(10));
    assert_eq!(stored.icon, "medal");

    let before = store.snapshot();
    assert!(matches!(
        store.update_achievement(
            id,
            AchievementPatch {
                title: Some("   ".to_string()),
                ..AchievementPatch::default()
            }
        ),
        Err(StoreError::Validation(ValidationError::BlankField(_)))
    ));
    assert_eq!(store.snapshot(), before);

    assert_eq!(store.delete_achievement(id).unwrap().title, "First 10k");
    assert!(store.achievements().is_empty());
    assert!(matches!(
        store.update_achievement(id, AchievementPatch::default()),
        Err(StoreError::NotFound(NotFound::Achievement(_)))
    ));
    assert!(matches!(
        store.delete_achievement(id),
        Err(StoreError::NotFound(NotFound::Achievement(_)))
    ));
}

#[test]
fn deleted_visions_and_missing_entries_are_not_found() {
    let mut store = store();
    let vision = store
        .add_vision(NewVision {
            title: "Write a book".to_string(),
            description: String::new(),
            category: "Creative".to_string(),
            pillar: "Voice".to_string(),
            target_date: None,
            progress: 0,
        })
        .unwrap();
    store.add_milestone(vision, "Outline").unwrap();

    let removed = store.delete_vision(vision).unwrap();
    assert_eq!(removed.milestones.len(), 1);
    assert!(store.visions().is_empty());
    assert!(matches!(
        store.delete_vision(vision),
        Err(StoreError::NotFound(NotFound::Vision(_)))
    ));
    assert!(matches!(
        store.update_vision(vision, VisionPatch::default()),
        Err(StoreError::NotFound(NotFound::Vision(_)))
    ));
    assert!(matches!(
        store.add_milestone(vision, "Draft"),
        Err(StoreError::NotFound(NotFound::Vision(_)))
    ));

    assert!(matches!(
        store.update_journal_entry(42, JournalPatch::default()),
        Err(StoreError::NotFound(NotFound::JournalEntry(42)))
    ));
    assert!(matches!(
        store.update_time_log(42, TimeLogPatch::default()),
        Err(StoreError::NotFound(NotFound::TimeLog(42)))
    ));
}
