//! In-memory occupation store

use super::{OccupationStore, StoreError};
use crate::types::{ClockTime, OccupationRecord, Weekday};
use std::collections::BTreeSet;

/// Store over a fixed list of records, kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    records: Vec<OccupationRecord>,
}

impl InMemoryStore {
    pub fn new(records: Vec<OccupationRecord>) -> Self {
        Self { records }
    }
}

impl OccupationStore for InMemoryStore {
    fn find_occupation(
        &self,
        day: &str,
        room: &str,
        time: ClockTime,
    ) -> Result<Option<OccupationRecord>, StoreError> {
        Ok(self
            .records
            .iter()
            .find(|r| r.day == day && r.room == room && r.contains(time))
            .cloned())
    }

    fn distinct_days(&self) -> Result<Vec<String>, StoreError> {
        let mut days: Vec<String> = self
            .records
            .iter()
            .map(|r| r.day.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        // Stable sort keeps unknown labels in lexicographic order
        days.sort_by_key(|d| Weekday::sort_key(d));
        Ok(days)
    }

    fn distinct_rooms(&self) -> Result<Vec<String>, StoreError> {
        Ok(self
            .records
            .iter()
            .map(|r| r.room.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect())
    }
}
