//! Application state definitions
//!
//! Types the front end keeps next to the wizard session: the status line
//! and the option pickers.

use crate::types::Choice;

/// Feedback shown under the current step
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum StatusLine {
    #[default]
    Idle,
    /// Neutral message (e.g. an action that does nothing here)
    Info(String),
    /// A selection was rejected
    Warning(String),
    /// The lookup failed
    Error(String),
}

/// Cursor over an option list whose first entry is the placeholder.
///
/// Index 0 is the placeholder, index `i > 0` is `options[i - 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Picker {
    index: usize,
    option_count: usize,
}

impl Picker {
    pub fn new(option_count: usize) -> Self {
        Self {
            index: 0,
            option_count,
        }
    }

    #[inline]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Move the cursor, clamped to the list
    pub fn move_by(&mut self, delta: isize) {
        let max = self.option_count as isize;
        self.index = (self.index as isize + delta).clamp(0, max) as usize;
    }

    /// The choice under the cursor
    pub fn choice(&self, options: &[String]) -> Choice {
        match self.index {
            0 => Choice::Unselected,
            i => options
                .get(i - 1)
                .map_or(Choice::Unselected, |v| Choice::chosen(v.clone())),
        }
    }

    /// Put the cursor on `choice`, or on the placeholder if it is not listed.
    pub fn select(&mut self, choice: &Choice, options: &[String]) {
        self.index = choice
            .as_deref()
            .and_then(|v| options.iter().position(|o| o == v))
            .map_or(0, |pos| pos + 1);
    }
}
