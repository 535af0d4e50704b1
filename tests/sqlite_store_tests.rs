//! Tests for the SQLite schedule store and the import path
//!
//! Every test builds its own database in a temporary directory through the
//! same code `labcheck import` uses, then reads it back through `SqliteStore`.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::{Duration, Instant};

use labcheck::import::{import_schedule, write_records};
use labcheck::{
    Action, Choice, ClockTime, OccupationRecord, OccupationStore, SelectionOptions, SqliteStore,
    StepInput, StoreError, Verdict, WizardController, WizardError, WizardState,
};
use rusqlite::Connection;
use tempfile::TempDir;

fn t(s: &str) -> ClockTime {
    s.parse().expect("valid time")
}

fn record(day: &str, room: &str, start: &str, end: &str, course: &str) -> OccupationRecord {
    OccupationRecord {
        day: day.into(),
        room: room.into(),
        start_time: t(start),
        end_time: t(end),
        course_name: course.into(),
    }
}

fn store_with(dir: &TempDir, records: &[OccupationRecord]) -> SqliteStore {
    let path = dir.path().join("jadwal.db");
    write_records(&path, records).expect("write schedule");
    SqliteStore::new(path, Duration::from_millis(500))
}

fn write_json(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("write input");
    path
}

// =============================================================================
// Lookups
// =============================================================================

#[test]
fn test_find_occupation_half_open() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        &[record("Kamis", "Software I", "07:30", "09:10", "Pemrograman Web")],
    );

    let hit = store.find_occupation("Kamis", "Software I", t("07:30")).unwrap();
    assert_eq!(hit.map(|r| r.course_name), Some("Pemrograman Web".to_string()));

    let inside = store.find_occupation("Kamis", "Software I", t("09:09")).unwrap();
    assert!(inside.is_some());

    let at_end = store.find_occupation("Kamis", "Software I", t("09:10")).unwrap();
    assert!(at_end.is_none());

    let before = store.find_occupation("Kamis", "Software I", t("07:29")).unwrap();
    assert!(before.is_none());
}

#[test]
fn test_labels_match_exactly() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        &[record("Senin", "Software I", "08:00", "10:00", "Struktur Data")],
    );

    assert!(store.find_occupation("senin", "Software I", t("09:00")).unwrap().is_none());
    assert!(store.find_occupation("Senin", "Software  I", t("09:00")).unwrap().is_none());
}

#[test]
fn test_overlapping_rows_return_first_inserted() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        &[
            record("Rabu", "Software II", "10:00", "12:00", "Kecerdasan Buatan"),
            record("Rabu", "Software II", "09:00", "11:00", "Sistem Operasi"),
        ],
    );

    let hit = store.find_occupation("Rabu", "Software II", t("10:30")).unwrap();
    assert_eq!(hit.map(|r| r.course_name), Some("Kecerdasan Buatan".to_string()));
}

#[test]
fn test_round_trips_full_record() {
    let dir = TempDir::new().unwrap();
    let original = record("Jumat", "Jaringan", "13:00", "14:40", "Keamanan Informasi");
    let store = store_with(&dir, std::slice::from_ref(&original));

    let found = store.find_occupation("Jumat", "Jaringan", t("14:00")).unwrap();
    assert_eq!(found, Some(original));
}

// =============================================================================
// Option lists
// =============================================================================

#[test]
fn test_days_follow_week_order() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        &[
            record("Sabtu", "A", "08:00", "09:00", "x"),
            record("Minggu", "A", "08:00", "09:00", "x"),
            record("Rabu", "A", "08:00", "09:00", "x"),
            record("Senin", "A", "08:00", "09:00", "x"),
            record("Rabu", "B", "08:00", "09:00", "x"),
        ],
    );

    assert_eq!(
        store.distinct_days().unwrap(),
        vec!["Senin", "Rabu", "Sabtu", "Minggu"]
    );
}

#[test]
fn test_rooms_are_sorted_and_distinct() {
    let dir = TempDir::new().unwrap();
    let store = store_with(
        &dir,
        &[
            record("Senin", "Software II", "08:00", "09:00", "x"),
            record("Senin", "Hardware", "08:00", "09:00", "x"),
            record("Selasa", "Software II", "08:00", "09:00", "x"),
        ],
    );

    assert_eq!(store.distinct_rooms().unwrap(), vec!["Hardware", "Software II"]);
}

// =============================================================================
// Failures
// =============================================================================

#[test]
fn test_missing_database_is_unavailable() {
    let dir = TempDir::new().unwrap();
    let store = SqliteStore::new(dir.path().join("absent.db"), Duration::from_millis(100));

    let err = store.find_occupation("Senin", "A", t("08:00")).unwrap_err();
    assert!(matches!(err, StoreError::Unavailable(_)));

    let err = SelectionOptions::load(&store).unwrap_err();
    assert!(err.is_fatal());
}

#[test]
fn test_locked_database_times_out_as_resolution_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("jadwal.db");
    write_records(
        &path,
        &[record("Senin", "Software I", "08:00", "10:00", "Struktur Data")],
    )
    .unwrap();

    let timeout = Duration::from_millis(200);
    let store = Arc::new(SqliteStore::new(&path, timeout));
    let options = SelectionOptions::load(store.as_ref()).expect("options");
    let ctl = WizardController::new(store.clone(), options);

    // Walk to the time step before the lock is taken
    let mut session = ctl.start_session();
    for input in [
        StepInput::Day(Choice::chosen("Senin")),
        StepInput::Room(Choice::chosen("Software I")),
    ] {
        let d = ctl.dispatch(session, Action::Advance(input));
        d.result.expect("advance");
        session = d.session;
    }

    let writer = Connection::open(&path).unwrap();
    writer.execute_batch("BEGIN EXCLUSIVE;").unwrap();

    let started = Instant::now();
    let err = store
        .find_occupation("Senin", "Software I", t("09:00"))
        .unwrap_err();
    assert!(matches!(err, StoreError::Timeout(200)), "got {:?}", err);
    assert!(started.elapsed() < Duration::from_secs(5));

    let result = ctl.check(
        Choice::chosen("Senin"),
        Choice::chosen("Software I"),
        Some(t("09:00")),
    );
    assert!(matches!(result, Err(WizardError::Resolution(_))));

    let d = ctl.dispatch(session, Action::Advance(StepInput::Time(t("09:00"))));
    assert!(matches!(d.result, Err(WizardError::Resolution(_))));
    assert_eq!(d.session.current_state(), WizardState::SelectTime);
    assert!(d.session.last_outcome().is_none());

    // Once the lock is released the same session can retry
    writer.execute_batch("ROLLBACK;").unwrap();
    let d = ctl.dispatch(d.session, Action::Advance(StepInput::Keep));
    assert_eq!(d.result.unwrap(), WizardState::Occupied);
}

#[test]
fn test_store_is_read_only() {
    let dir = TempDir::new().unwrap();
    let store = store_with(&dir, &[record("Senin", "A", "08:00", "09:00", "x")]);
    let before = fs::read(store.path()).unwrap();

    for _ in 0..3 {
        store.find_occupation("Senin", "A", t("08:30")).unwrap();
        store.distinct_days().unwrap();
    }

    assert_eq!(fs::read(store.path()).unwrap(), before);
}

// =============================================================================
// Import
// =============================================================================

#[test]
fn test_import_then_check() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "jadwal.json",
        r#"[
            {"hari": "Senin", "ruang": "Software I", "jam_mulai": 0.3333333333,
             "jam_selesai": "10:00", "nama_matakuliah": "Struktur Data"},
            {"hari": "Senin", "ruang": "Software I", "jam_mulai": "12:00",
             "jam_selesai": "11:00", "nama_matakuliah": "Terbalik"},
            {"hari": null, "ruang": "Software I", "jam_mulai": "13:00",
             "jam_selesai": "14:00", "nama_matakuliah": "Tanpa Hari"}
        ]"#,
    );
    let database = dir.path().join("jadwal.db");

    let report = import_schedule(&input, &database).expect("import");
    assert_eq!(report.rows_read, 3);
    assert_eq!(report.rows_imported, 1);
    assert_eq!(report.rows_skipped, 2);

    let store = SqliteStore::new(&database, Duration::from_millis(500));
    let options = SelectionOptions::load(&store).expect("options");
    assert_eq!(options.days(), ["Senin".to_string()]);

    let ctl = WizardController::new(Arc::new(store), options);
    let session = ctl
        .check(Choice::chosen("Senin"), Choice::chosen("Software I"), Some(t("08:00")))
        .expect("check");
    assert_eq!(session.current_state(), WizardState::Occupied);
    match session.last_outcome() {
        Some(Verdict::Occupied(r)) => assert_eq!(r.start_time, t("08:00")),
        other => panic!("expected occupied, got {:?}", other),
    }
}

#[test]
fn test_reimport_replaces_table() {
    let dir = TempDir::new().unwrap();
    let database = dir.path().join("jadwal.db");

    let first = write_json(
        dir.path(),
        "a.json",
        r#"[{"hari": "Senin", "ruang": "A", "jam_mulai": "08:00",
             "jam_selesai": "09:00", "nama_matakuliah": "Lama"}]"#,
    );
    let second = write_json(
        dir.path(),
        "b.json",
        r#"[{"hari": "Selasa", "ruang": "B", "jam_mulai": "08:00",
             "jam_selesai": "09:00", "nama_matakuliah": "Baru"}]"#,
    );

    import_schedule(&first, &database).unwrap();
    import_schedule(&second, &database).unwrap();

    let store = SqliteStore::new(&database, Duration::from_millis(500));
    assert_eq!(store.distinct_days().unwrap(), vec!["Selasa"]);
    assert!(store.find_occupation("Senin", "A", t("08:30")).unwrap().is_none());
}

#[test]
fn test_import_without_usable_rows_fails() {
    let dir = TempDir::new().unwrap();
    let input = write_json(
        dir.path(),
        "empty.json",
        r#"[{"hari": "Senin", "ruang": "A", "jam_mulai": "bukan jam",
             "jam_selesai": "09:00", "nama_matakuliah": "x"}]"#,
    );
    let database = dir.path().join("jadwal.db");

    assert!(import_schedule(&input, &database).is_err());
    assert!(!database.exists());
}

#[test]
fn test_import_unreadable_workbook_leaves_no_database() {
    let dir = TempDir::new().unwrap();
    let input = write_json(dir.path(), "HasilQuery.xls", "not really a workbook");
    let database = dir.path().join("jadwal.db");

    assert!(import_schedule(&input, &database).is_err());
    assert!(!database.exists());
}
