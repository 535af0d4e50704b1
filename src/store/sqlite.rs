//! SQLite-backed occupation store

use super::{OccupationStore, StoreError};
use crate::types::{ClockTime, OccupationRecord};
use log::{debug, error};
use rusqlite::{params, Connection, ErrorCode, OpenFlags, OptionalExtension};
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Name of the schedule table
pub const TABLE_NAME: &str = "jadwal";

const FIND_OCCUPATION_SQL: &str = "
    SELECT hari, ruang, jam_mulai_hhmm, jam_selesai_hhmm, nama_matakuliah
    FROM jadwal
    WHERE hari = ?1 AND ruang = ?2 AND jam_mulai_hhmm <= ?3 AND ?3 < jam_selesai_hhmm
    ORDER BY rowid
    LIMIT 1";

const DISTINCT_DAYS_SQL: &str = "
    SELECT DISTINCT hari FROM jadwal
    ORDER BY CASE hari
        WHEN 'Senin' THEN 1 WHEN 'Selasa' THEN 2 WHEN 'Rabu' THEN 3
        WHEN 'Kamis' THEN 4 WHEN 'Jumat' THEN 5 WHEN 'Sabtu' THEN 6
        ELSE 7 END, hari";

const DISTINCT_ROOMS_SQL: &str = "SELECT DISTINCT ruang FROM jadwal ORDER BY ruang";

/// Read-only store over a SQLite file produced by `labcheck import`.
///
/// Holds no open connection between queries. Each call opens its own
/// read-only connection and drops it before returning.
#[derive(Debug, Clone)]
pub struct SqliteStore {
    path: PathBuf,
    timeout: Duration,
}

impl SqliteStore {
    /// Create a store for `path`. Nothing is opened until the first query.
    pub fn new(path: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            path: path.into(),
            timeout,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Run one query on a fresh read-only connection.
    fn with_connection<T>(
        &self,
        query: impl FnOnce(&Connection) -> Result<T, StoreError>,
    ) -> Result<T, StoreError> {
        let conn = Connection::open_with_flags(
            &self.path,
            OpenFlags::SQLITE_OPEN_READ_ONLY | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )
        .map_err(|e| {
            error!("Failed to open schedule database {:?}: {}", self.path, e);
            StoreError::Unavailable(format!("{}: {}", self.path.display(), e))
        })?;
        conn.busy_timeout(self.timeout)?;

        let result = query(&conn).map_err(|e| self.classify(e));
        // Connection is released here on every path
        drop(conn);
        result
    }

    /// Busy/locked failures mean the busy timeout elapsed.
    fn classify(&self, err: StoreError) -> StoreError {
        match err {
            StoreError::Query(ref e)
                if matches!(
                    e.sqlite_error_code(),
                    Some(ErrorCode::DatabaseBusy | ErrorCode::DatabaseLocked)
                ) =>
            {
                error!("Schedule query timed out: {}", e);
                StoreError::Timeout(self.timeout.as_millis() as u64)
            }
            other => other,
        }
    }

    fn read_labels(conn: &Connection, sql: &str) -> Result<Vec<String>, StoreError> {
        let mut stmt = conn.prepare(sql)?;
        let labels = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(labels)
    }
}

fn parse_stored_time(value: &str, field: &str) -> Result<ClockTime, StoreError> {
    value
        .parse()
        .map_err(|_| StoreError::CorruptRow(format!("{field} contains '{value}'")))
}

impl OccupationStore for SqliteStore {
    fn find_occupation(
        &self,
        day: &str,
        room: &str,
        time: ClockTime,
    ) -> Result<Option<OccupationRecord>, StoreError> {
        let time_str = time.to_string();
        debug!("Querying {} for {} / {} / {}", TABLE_NAME, day, room, time_str);

        self.with_connection(|conn| {
            let row = conn
                .query_row(FIND_OCCUPATION_SQL, params![day, room, time_str], |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                })
                .optional()?;

            row.map(|(day, room, start, end, course_name)| {
                Ok::<_, StoreError>(OccupationRecord {
                    day,
                    room,
                    start_time: parse_stored_time(&start, "jam_mulai_hhmm")?,
                    end_time: parse_stored_time(&end, "jam_selesai_hhmm")?,
                    course_name,
                })
            })
            .transpose()
        })
    }

    fn distinct_days(&self) -> Result<Vec<String>, StoreError> {
        self.with_connection(|conn| Self::read_labels(conn, DISTINCT_DAYS_SQL))
    }

    fn distinct_rooms(&self) -> Result<Vec<String>, StoreError> {
        self.with_connection(|conn| Self::read_labels(conn, DISTINCT_ROOMS_SQL))
    }
}
