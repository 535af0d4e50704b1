//! Availability resolver
//!
//! Answers "is room R free at time T on day D?" with a single store lookup.
//! The answer is a tagged verdict; store failures are a separate error and are
//! never reported as "available".

use crate::store::{OccupationStore, StoreError};
use crate::types::{ClockTime, OccupationRecord};
use log::{error, info};
use serde::Serialize;
use thiserror::Error;

/// Outcome of a successful lookup
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", content = "occupied_by", rename_all = "snake_case")]
pub enum Verdict {
    /// No occupation covers the requested time (TERSEDIA)
    Available,
    /// The first matching occupation (DIGUNAKAN)
    Occupied(OccupationRecord),
}

impl Verdict {
    pub fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// Status word used in the source schedule system
    pub fn status_label(&self) -> &'static str {
        match self {
            Self::Available => "TERSEDIA",
            Self::Occupied(_) => "DIGUNAKAN",
        }
    }
}

/// The lookup could not be completed
#[derive(Error, Debug)]
#[error("availability lookup failed: {0}")]
pub struct ResolutionError(#[from] pub StoreError);

/// A fully specified availability question
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AvailabilityQuery<'a> {
    pub day: &'a str,
    pub room: &'a str,
    pub time: ClockTime,
}

/// Resolve one query against the store.
///
/// Day and room are matched byte-for-byte; the time test is `start <= t < end`.
pub fn resolve(
    store: &dyn OccupationStore,
    query: &AvailabilityQuery<'_>,
) -> Result<Verdict, ResolutionError> {
    match store.find_occupation(query.day, query.room, query.time) {
        Ok(Some(record)) => {
            info!(
                "{} on {} at {}: occupied by '{}' ({}-{})",
                query.room,
                query.day,
                query.time,
                record.course_name,
                record.start_time,
                record.end_time
            );
            Ok(Verdict::Occupied(record))
        }
        Ok(None) => {
            info!("{} on {} at {}: available", query.room, query.day, query.time);
            Ok(Verdict::Available)
        }
        Err(e) => {
            error!(
                "Lookup for {} on {} at {} failed: {}",
                query.room, query.day, query.time, e
            );
            Err(ResolutionError(e))
        }
    }
}

impl From<ResolutionError> for crate::error::LabCheckError {
    fn from(err: ResolutionError) -> Self {
        crate::error::LabCheckError::Resolution(err.to_string())
    }
}
