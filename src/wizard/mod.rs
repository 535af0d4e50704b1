//! Wizard controller
//!
//! Drives the day → room → time → verdict flow. The controller is stateless
//! across users: each call to `dispatch` takes a `WizardSession` by value and
//! hands it back updated, together with the outcome of the action.
//!
//! # Module Structure
//! - `state` - States, actions and the session value
//! - Main module - `WizardController` and its transition rules
//!
//! # Design Principles
//!
//! - **Validated Transitions**: placeholder or unknown selections keep the
//!   session where it is and report a `ValidationError`
//! - **One Lookup, One Branch**: leaving `SelectTime` calls the resolver once
//!   and matches its verdict once; a failed lookup takes no transition
//! - **No Global State**: sessions live with the caller

mod state;

pub use state::{
    Action, ActionKind, Selections, StepInput, WizardSession, WizardSnapshot, WizardState,
};

use crate::config::SelectionOptions;
use crate::resolver::{self, AvailabilityQuery, ResolutionError, Verdict};
use crate::store::OccupationStore;
use crate::types::{Choice, ClockTime};
use log::{debug, info, warn};
use std::sync::Arc;
use thiserror::Error;

/// A selection was rejected by a step guard
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Please choose a day first")]
    DayNotSelected,
    #[error("Please choose a lab room first")]
    RoomNotSelected,
    #[error("'{0}' is not a day in the schedule")]
    UnknownDay(String),
    #[error("'{0}' is not a room in the schedule")]
    UnknownRoom(String),
}

/// Reasons an action did not produce the expected transition
#[derive(Error, Debug)]
pub enum WizardError {
    /// Placeholder or unknown selection; the session did not move
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The lookup failed; the session stays at `SelectTime` and can retry
    #[error(transparent)]
    Resolution(#[from] ResolutionError),

    /// The action is not defined in the current state
    #[error("{action} is not available in state {}", state.code())]
    ActionNotAvailable {
        action: ActionKind,
        state: WizardState,
    },

    /// The input does not belong to the current step
    #[error("state {} expects a {expected} selection", state.code())]
    UnexpectedInput {
        state: WizardState,
        expected: &'static str,
    },
}

impl WizardError {
    /// Validation and resolution problems are shown to the user as warnings
    /// and never end the interaction.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::Validation(_) | Self::Resolution(_))
    }
}

impl From<WizardError> for crate::error::LabCheckError {
    fn from(err: WizardError) -> Self {
        match err {
            WizardError::Validation(e) => crate::error::LabCheckError::validation(e.to_string()),
            WizardError::Resolution(e) => e.into(),
            other => crate::error::LabCheckError::Wizard(other.to_string()),
        }
    }
}

/// Result of one `dispatch` call: the updated session and what happened.
#[derive(Debug)]
pub struct Dispatch {
    pub session: WizardSession,
    /// The state after the action, or why the action was not applied
    pub result: Result<WizardState, WizardError>,
}

impl Dispatch {
    pub fn snapshot(&self) -> WizardSnapshot {
        self.session.snapshot()
    }
}

/// Sequences input collection and resolves the final verdict.
#[derive(Clone)]
pub struct WizardController {
    store: Arc<dyn OccupationStore>,
    options: SelectionOptions,
    default_time: ClockTime,
}

impl WizardController {
    /// Create a controller over `store`, offering the injected `options`.
    pub fn new(store: Arc<dyn OccupationStore>, options: SelectionOptions) -> Self {
        Self {
            store,
            options,
            default_time: ClockTime::default(),
        }
    }

    /// Use `time` as the initial and post-reset time selection.
    pub fn with_default_time(mut self, time: ClockTime) -> Self {
        self.default_time = time;
        self
    }

    pub fn options(&self) -> &SelectionOptions {
        &self.options
    }

    /// Create a fresh session at `SelectDay`.
    pub fn start_session(&self) -> WizardSession {
        WizardSession::new(self.default_time)
    }

    /// Apply one action to a session.
    ///
    /// On error the returned session is unchanged except for selections the
    /// transition table stores regardless of the guard.
    pub fn dispatch(&self, mut session: WizardSession, action: Action) -> Dispatch {
        let from = session.state;
        let result = self.apply(&mut session, action);

        match &result {
            Ok(to) if *to != from => info!("Wizard {} -> {}", from.code(), to.code()),
            Ok(_) => debug!("Wizard stays in {}", from.code()),
            Err(e) if e.is_recoverable() => warn!("Wizard stays in {}: {}", from.code(), e),
            Err(e) => debug!("Rejected action in {}: {}", from.code(), e),
        }

        Dispatch { session, result }
    }

    /// Drive a fresh session through all three steps without a front end.
    ///
    /// Stops at the first action that fails and returns its error.
    pub fn check(
        &self,
        day: Choice,
        room: Choice,
        time: Option<ClockTime>,
    ) -> Result<WizardSession, WizardError> {
        let time_input = time.map_or(StepInput::Keep, StepInput::Time);
        let steps = [
            Action::Advance(StepInput::Day(day)),
            Action::Advance(StepInput::Room(room)),
            Action::Advance(time_input),
        ];

        let mut session = self.start_session();
        for action in steps {
            let dispatched = self.dispatch(session, action);
            dispatched.result?;
            session = dispatched.session;
        }
        Ok(session)
    }

    fn apply(
        &self,
        session: &mut WizardSession,
        action: Action,
    ) -> Result<WizardState, WizardError> {
        let state = session.state;
        let kind = action.kind();

        match (state, action) {
            (WizardState::SelectDay, Action::Advance(input)) => {
                let day = match input {
                    StepInput::Day(choice) => choice,
                    StepInput::Keep => session.selections.day.clone(),
                    _ => return Err(unexpected(state)),
                };
                self.check_day(&day)?;
                session.selections.day = day;
                session.state = WizardState::SelectRoom;
            }

            (WizardState::SelectRoom, Action::Advance(input)) => {
                let room = match input {
                    StepInput::Room(choice) => choice,
                    StepInput::Keep => session.selections.room.clone(),
                    _ => return Err(unexpected(state)),
                };
                self.check_room(&room)?;
                session.selections.room = room;
                session.state = WizardState::SelectTime;
            }

            // BACK keeps the value highlighted on the step being left
            (_, Action::Back(input)) => {
                let Some(previous) = state.previous() else {
                    return Err(WizardError::ActionNotAvailable {
                        action: kind,
                        state,
                    });
                };
                match input {
                    StepInput::Room(choice) if state == WizardState::SelectRoom => {
                        session.selections.room = choice;
                    }
                    StepInput::Time(time) if state == WizardState::SelectTime => {
                        session.selections.time = time;
                    }
                    StepInput::Keep => {}
                    _ => return Err(unexpected(state)),
                }
                session.state = previous;
            }

            (WizardState::SelectTime, Action::Advance(input)) => {
                match input {
                    StepInput::Time(time) => session.selections.time = time,
                    StepInput::Keep => {}
                    _ => return Err(unexpected(state)),
                }
                let verdict = self.resolve(session)?;
                session.state = match verdict {
                    Verdict::Available => WizardState::Available,
                    Verdict::Occupied(_) => WizardState::Occupied,
                };
                session.last_outcome = Some(verdict);
            }

            // The forward button on a result screen is labelled "check again"
            (
                WizardState::Available | WizardState::Occupied,
                Action::Advance(_) | Action::Reset,
            ) => {
                session.reset();
            }

            (_, _) => {
                return Err(WizardError::ActionNotAvailable {
                    action: kind,
                    state,
                });
            }
        }

        Ok(session.state)
    }

    fn check_day(&self, day: &Choice) -> Result<(), ValidationError> {
        match day.as_deref() {
            None => Err(ValidationError::DayNotSelected),
            Some(d) if !self.options.has_day(d) => Err(ValidationError::UnknownDay(d.to_string())),
            Some(_) => Ok(()),
        }
    }

    fn check_room(&self, room: &Choice) -> Result<(), ValidationError> {
        match room.as_deref() {
            None => Err(ValidationError::RoomNotSelected),
            Some(r) if !self.options.has_room(r) => {
                Err(ValidationError::UnknownRoom(r.to_string()))
            }
            Some(_) => Ok(()),
        }
    }

    fn resolve(&self, session: &WizardSession) -> Result<Verdict, WizardError> {
        // Both selections were validated on the way in; re-check rather than assume.
        let day = session
            .selections
            .day
            .as_deref()
            .ok_or(ValidationError::DayNotSelected)?;
        let room = session
            .selections
            .room
            .as_deref()
            .ok_or(ValidationError::RoomNotSelected)?;

        let query = AvailabilityQuery {
            day,
            room,
            time: session.selections.time,
        };
        Ok(resolver::resolve(self.store.as_ref(), &query)?)
    }
}

fn unexpected(state: WizardState) -> WizardError {
    let expected = match state {
        WizardState::SelectDay => "day",
        WizardState::SelectRoom => "room",
        WizardState::SelectTime => "time",
        WizardState::Available | WizardState::Occupied => "reset",
    };
    WizardError::UnexpectedInput { state, expected }
}
