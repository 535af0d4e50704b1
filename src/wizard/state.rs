//! Wizard state definitions
//!
//! Contains the automaton states, the actions a front end can dispatch, and
//! the per-interaction `WizardSession` value.

use crate::resolver::Verdict;
use crate::types::{Choice, ClockTime};
use serde::Serialize;
use strum::Display;

/// Automaton state of the availability wizard.
///
/// # State Transitions
///
/// ```text
/// SelectDay (q0) <-> SelectRoom (q1) <-> SelectTime (q2) -> Available (q3)
///                                                        -> Occupied  (q4)
/// Available / Occupied --reset--> SelectDay
/// ```
///
/// # Invariants
///
/// - Terminal states are only entered from `SelectTime`
/// - There is no way back from a terminal state except reset
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum WizardState {
    /// q0: collecting the day
    #[default]
    SelectDay,
    /// q1: collecting the room; day already chosen
    SelectRoom,
    /// q2: collecting the time; day and room already chosen
    SelectTime,
    /// q3: the room is free at the chosen day and time
    Available,
    /// q4: the room is occupied at the chosen day and time
    Occupied,
}

impl WizardState {
    /// Automaton label (`q0`..`q4`)
    pub const fn code(self) -> &'static str {
        match self {
            Self::SelectDay => "q0",
            Self::SelectRoom => "q1",
            Self::SelectTime => "q2",
            Self::Available => "q3",
            Self::Occupied => "q4",
        }
    }

    /// Returns true for the accepting states
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Available | Self::Occupied)
    }

    /// State reached by BACK, if BACK is defined here.
    pub const fn previous(self) -> Option<Self> {
        match self {
            Self::SelectRoom => Some(Self::SelectDay),
            Self::SelectTime => Some(Self::SelectRoom),
            // Results must be reset, not edited
            Self::SelectDay | Self::Available | Self::Occupied => None,
        }
    }

    /// Actions accepted in this state; BACK wherever `previous` is defined
    pub fn available_actions(self) -> &'static [ActionKind] {
        if self.is_terminal() {
            &[ActionKind::Reset]
        } else if self.previous().is_some() {
            &[ActionKind::Back, ActionKind::Advance]
        } else {
            &[ActionKind::Advance]
        }
    }

    /// Get the display title for this state.
    pub const fn title(self) -> &'static str {
        match self {
            Self::SelectDay => "1. Choose a day",
            Self::SelectRoom => "2. Choose a lab room",
            Self::SelectTime => "3. Choose a time",
            Self::Available => "Result: available",
            Self::Occupied => "Result: occupied",
        }
    }

    /// Get the step number (1-indexed for display).
    pub const fn step_number(self) -> usize {
        match self {
            Self::SelectDay => 1,
            Self::SelectRoom => 2,
            Self::SelectTime => 3,
            Self::Available | Self::Occupied => 4,
        }
    }

    /// Total number of steps.
    pub const TOTAL_STEPS: usize = 4;
}

/// Kinds of action, as listed in `available_actions`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Advance,
    Back,
    Reset,
}

/// Value picked on the current step, carried by ADVANCE and BACK
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepInput {
    Day(Choice),
    Room(Choice),
    Time(ClockTime),
    /// Nothing new picked; the value already in the session is used
    Keep,
}

/// Input to `WizardController::dispatch`
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Advance(StepInput),
    Back(StepInput),
    Reset,
}

impl Action {
    pub fn kind(&self) -> ActionKind {
        match self {
            Self::Advance(_) => ActionKind::Advance,
            Self::Back(_) => ActionKind::Back,
            Self::Reset => ActionKind::Reset,
        }
    }
}

/// Selections accumulated so far
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selections {
    pub day: Choice,
    pub room: Choice,
    pub time: ClockTime,
}

/// One user's pass through the wizard.
///
/// Owned by the caller and handed to `dispatch`, which returns it updated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WizardSession {
    pub(super) state: WizardState,
    pub(super) selections: Selections,
    pub(super) default_time: ClockTime,
    pub(super) last_outcome: Option<Verdict>,
}

impl Default for WizardSession {
    fn default() -> Self {
        Self::new(ClockTime::default())
    }
}

impl WizardSession {
    /// Create a fresh session at `SelectDay` with nothing chosen.
    pub fn new(default_time: ClockTime) -> Self {
        Self {
            state: WizardState::SelectDay,
            selections: Selections {
                day: Choice::Unselected,
                room: Choice::Unselected,
                time: default_time,
            },
            default_time,
            last_outcome: None,
        }
    }

    #[inline]
    pub fn current_state(&self) -> WizardState {
        self.state
    }

    #[inline]
    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn available_actions(&self) -> &'static [ActionKind] {
        self.state.available_actions()
    }

    /// Verdict cached when the session entered its terminal state
    pub fn last_outcome(&self) -> Option<&Verdict> {
        self.last_outcome.as_ref()
    }

    /// Return every field to its initial value.
    pub fn reset(&mut self) {
        *self = Self::new(self.default_time);
    }

    /// Serializable view of the session for front ends
    pub fn snapshot(&self) -> WizardSnapshot {
        WizardSnapshot {
            state: self.state,
            state_code: self.state.code(),
            selections: self.selections.clone(),
            available_actions: self.available_actions().to_vec(),
            last_outcome: self.last_outcome.clone(),
        }
    }
}

/// State snapshot returned to the user-facing surface
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WizardSnapshot {
    pub state: WizardState,
    pub state_code: &'static str,
    pub selections: Selections,
    pub available_actions: Vec<ActionKind>,
    pub last_outcome: Option<Verdict>,
}
