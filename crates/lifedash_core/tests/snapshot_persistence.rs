use chrono::NaiveDate;
use lifedash_core::db::open_db;
use lifedash_core::model::goal::NewGoal;
use lifedash_core::{
    FixedClock, Period, ServiceError, SnapshotRepository, SqliteSnapshotRepository, StoreConfig,
    StoreService, StreakOutcome,
};

fn clock() -> FixedClock {
    FixedClock::at_date(NaiveDate::from_ymd_opt(2025, 9, 1).unwrap())
}

#[test]
fn state_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("lifedash.sqlite3");

    let goal_id = {
        let conn = open_db(&path).unwrap();
        let mut service = StoreService::open(
            SqliteSnapshotRepository::new(&conn),
            StoreConfig::default(),
            clock(),
        )
        .unwrap();
        service.apply(|store| store.rename_pillar("Voice", "Craft")).unwrap();
        let id = service
            .apply(|store| store.add_goal(Period::Today, NewGoal::new("Sketch", "Craft")))
            .unwrap();
        service
            .apply(|store| {
                store.toggle_goal(Period::Today, id)?;
                Ok(store.check_streak_update())
            })
            .unwrap();
        id
    };

    let conn = open_db(&path).unwrap();
    let service = StoreService::open(
        SqliteSnapshotRepository::new(&conn),
        StoreConfig::default(),
        clock(),
    )
    .unwrap();
    let store = service.store();
    assert_eq!(store.pillars(), ["Brain", "Craft", "Body", "Soul"]);
    assert!(store.goal(Period::Today, goal_id).unwrap().completed);
    assert_eq!(store.user().current_streak, 1);
    assert!(store.state().last_issued_id >= goal_id);
}

#[test]
fn reopened_store_does_not_award_twice_on_same_day() {
    let conn = lifedash_core::db::open_db_in_memory().unwrap();
    let mut service = StoreService::open(
        SqliteSnapshotRepository::new(&conn),
        StoreConfig::default(),
        clock(),
    )
    .unwrap();
    let id = service
        .apply(|store| store.add_goal(Period::Today, NewGoal::new("Walk", "Body")))
        .unwrap();
    let outcome = service
        .apply(|store| {
            store.toggle_goal(Period::Today, id)?;
            Ok(store.check_streak_update())
        })
        .unwrap();
    assert_eq!(outcome, StreakOutcome::Awarded(1));
    drop(service);

    let mut service = StoreService::open(
        SqliteSnapshotRepository::new(&conn),
        StoreConfig::default(),
        clock(),
    )
    .unwrap();
    let outcome = service
        .apply(|store| Ok(store.check_streak_update()))
        .unwrap();
    assert_eq!(outcome, StreakOutcome::AlreadyAwarded);
}

#[test]
fn older_snapshot_missing_fields_loads_with_defaults() {
    let conn = lifedash_core::db::open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::new(&conn);
    let legacy = r#"{
        "user": { "name": "Alex", "currentStreak": 3 },
        "pillars": ["Health", "Career"],
        "goals": {
            "weekly": [
                { "id": 1700000000000, "text": "Apply", "pillar": "Career", "completed": false }
            ]
        },
        "timeLogs": [
            { "id": 1700000000001, "date": "2025-08-30", "startTime": "", "endTime": "",
              "duration": 30, "activity": "Run", "pillar": "Health" }
        ]
    }"#;
    repo.save_snapshot("lifedash-store", legacy, 0).unwrap();

    let service = StoreService::open(repo, StoreConfig::default(), clock()).unwrap();
    let store = service.store();
    assert_eq!(store.user().name, "Alex");
    assert_eq!(store.user().current_streak, 3);
    assert!(store.user().streak_history.is_empty());
    assert_eq!(store.pillars(), ["Health", "Career"]);
    assert_eq!(store.goals(Period::Weekly)[0].category, "General");
    assert_eq!(store.time_logs()[0].start_time, None);
    assert!(store.visions().is_empty());
    assert_eq!(store.state().last_issued_id, 1_700_000_000_001);
}

#[test]
fn corrupt_snapshot_is_reported() {
    let conn = lifedash_core::db::open_db_in_memory().unwrap();
    let repo = SqliteSnapshotRepository::new(&conn);
    repo.save_snapshot("lifedash-store", "not json", 0).unwrap();

    let result = StoreService::open(repo, StoreConfig::default(), clock());
    assert!(matches!(result, Err(ServiceError::Snapshot(_))));
}

#[test]
fn custom_storage_key_is_isolated() {
    let conn = lifedash_core::db::open_db_in_memory().unwrap();
    let config = StoreConfig::from_json_str(r#"{ "storage_key": "profile-b" }"#).unwrap();
    let mut service =
        StoreService::open(SqliteSnapshotRepository::new(&conn), config, clock()).unwrap();
    service.apply(|store| store.add_pillar("Family")).unwrap();

    let repo = SqliteSnapshotRepository::new(&conn);
    assert!(repo.load_snapshot("lifedash-store").unwrap().is_none());
    let record = repo.load_snapshot("profile-b").unwrap().unwrap();
    assert!(record.payload.contains("Family"));
}
