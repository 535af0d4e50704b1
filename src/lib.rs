//! labcheck Library
//!
//! Answers "is lab room R free at time T on day D?" against a read-only
//! schedule table, through a three-step wizard (day → room → time) that ends
//! in one of two verdicts.

pub mod app;
pub mod cli;
pub mod config;
pub mod error;
pub mod import;
pub mod resolver;
pub mod store;
pub mod theme;
pub mod types;
pub mod ui;
pub mod wizard;

// Re-export main types for convenience
pub use config::{AppConfig, SelectionOptions};
pub use error::LabCheckError;
pub use resolver::{resolve, AvailabilityQuery, ResolutionError, Verdict};
pub use store::{InMemoryStore, OccupationStore, SqliteStore, StoreError};
pub use types::{Choice, ClockTime, OccupationRecord, Weekday};
pub use wizard::{
    Action, ActionKind, Dispatch, StepInput, ValidationError, WizardController, WizardError,
    WizardSession, WizardSnapshot, WizardState,
};
