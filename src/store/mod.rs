//! Occupation store
//!
//! Read-only access to the `jadwal` table of scheduled room occupations.
//!
//! # Module Structure
//! - `sqlite` - SQLite-backed store used by the application
//! - `memory` - In-memory store for embedding and tests
//!
//! Every lookup is a single self-contained query: implementations acquire
//! whatever handle they need, run the query and release the handle before
//! returning, whether the query matched, missed or failed.

mod memory;
mod sqlite;

pub use memory::InMemoryStore;
pub use sqlite::{SqliteStore, TABLE_NAME};

use crate::types::{ClockTime, OccupationRecord};
use thiserror::Error;

/// Errors raised by an occupation store
#[derive(Error, Debug)]
pub enum StoreError {
    /// The store could not be opened or reached at all
    #[error("occupation store unavailable: {0}")]
    Unavailable(String),

    /// The store's own query timeout fired
    #[error("occupation store timed out after {0} ms")]
    Timeout(u64),

    /// The query itself failed
    #[error("occupation query failed: {0}")]
    Query(#[from] rusqlite::Error),

    /// A stored row could not be read back into a record
    #[error("corrupt schedule row: {0}")]
    CorruptRow(String),
}

/// Read-only view of the occupation table.
///
/// Shared between independent sessions, hence `Send + Sync`.
pub trait OccupationStore: Send + Sync {
    /// First record (in table order) where `day` and `room` match exactly and
    /// `start <= time < end`, or `None`.
    fn find_occupation(
        &self,
        day: &str,
        room: &str,
        time: ClockTime,
    ) -> Result<Option<OccupationRecord>, StoreError>;

    /// Distinct day labels, Senin→Sabtu first, then any other label.
    fn distinct_days(&self) -> Result<Vec<String>, StoreError>;

    /// Distinct room labels in lexicographic order.
    fn distinct_rooms(&self) -> Result<Vec<String>, StoreError>;
}
