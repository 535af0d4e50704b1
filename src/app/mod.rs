//! Application module
//!
//! Contains the interactive terminal front end: it owns one `WizardSession`,
//! turns key presses into wizard actions and keeps the on-screen pickers in
//! sync with the session.
//!
//! # Module Structure
//! - `state` - Status line and picker cursor types
//! - Main module - App struct and event loop

mod state;

pub use state::{Picker, StatusLine};

use crate::error::Result;
use crate::types::ClockTime;
use crate::ui;
use crate::wizard::{Action, StepInput, WizardController, WizardError, WizardSession, WizardState};
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use log::{debug, info};
use ratatui::{backend::Backend, Terminal};
use std::time::Duration;

/// Main application struct
pub struct App {
    controller: WizardController,
    session: WizardSession,
    day_picker: Picker,
    room_picker: Picker,
    /// Time shown on the time step, not yet submitted
    pending_time: ClockTime,
    time_step_minutes: i64,
    status: StatusLine,
}

impl App {
    /// Create a new application instance with a fresh session
    pub fn new(controller: WizardController, time_step_minutes: u32) -> Self {
        info!("Creating new App instance");
        let session = controller.start_session();
        let day_picker = Picker::new(controller.options().days().len());
        let room_picker = Picker::new(controller.options().rooms().len());
        let pending_time = session.selections().time;

        Self {
            controller,
            session,
            day_picker,
            room_picker,
            pending_time,
            time_step_minutes: i64::from(time_step_minutes),
            status: StatusLine::default(),
        }
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn session(&self) -> &WizardSession {
        &self.session
    }

    pub fn day_picker(&self) -> &Picker {
        &self.day_picker
    }

    pub fn room_picker(&self) -> &Picker {
        &self.room_picker
    }

    pub fn pending_time(&self) -> ClockTime {
        self.pending_time
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    /// Run the main application loop
    ///
    /// Terminal I/O failures end the loop as `LabCheckError::Io`.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Starting main application loop");

        loop {
            terminal.draw(|f| ui::render(f, self))?;

            if crossterm::event::poll(Duration::from_millis(250))? {
                if let Event::Key(key_event) = crossterm::event::read()? {
                    if self.handle_key_event(key_event) {
                        break; // Exit requested
                    }
                }
            }
        }

        info!("Main application loop finished");
        Ok(())
    }

    /// Handle one key press. Returns true when the user asked to quit.
    pub fn handle_key_event(&mut self, key_event: KeyEvent) -> bool {
        if key_event.kind != KeyEventKind::Press {
            return false;
        }
        if key_event.modifiers.contains(KeyModifiers::CONTROL)
            && key_event.code == KeyCode::Char('c')
        {
            return true;
        }

        match key_event.code {
            KeyCode::Char('q') | KeyCode::Char('Q') => return true,
            KeyCode::Up => self.navigate(-1),
            KeyCode::Down => self.navigate(1),
            KeyCode::PageUp => self.shift_time(60),
            KeyCode::PageDown => self.shift_time(-60),
            KeyCode::Enter => {
                let input = self.current_input();
                self.dispatch(Action::Advance(input));
            }
            KeyCode::Esc | KeyCode::Backspace | KeyCode::Char('b') | KeyCode::Char('B') => {
                let input = self.current_input();
                self.dispatch(Action::Back(input));
            }
            KeyCode::Char('r') | KeyCode::Char('R') => self.dispatch(Action::Reset),
            other => debug!("Ignoring key {:?}", other),
        }
        false
    }

    fn navigate(&mut self, delta: isize) {
        match self.session.current_state() {
            WizardState::SelectDay => self.day_picker.move_by(delta),
            WizardState::SelectRoom => self.room_picker.move_by(delta),
            // Up means later
            WizardState::SelectTime => self.shift_time(-(delta as i64) * self.time_step_minutes),
            WizardState::Available | WizardState::Occupied => {}
        }
    }

    fn shift_time(&mut self, minutes: i64) {
        if self.session.current_state() == WizardState::SelectTime {
            self.pending_time = self.pending_time.add_minutes(minutes);
        }
    }

    /// The value currently highlighted on this step
    fn current_input(&self) -> StepInput {
        let options = self.controller.options();
        match self.session.current_state() {
            WizardState::SelectDay => StepInput::Day(self.day_picker.choice(options.days())),
            WizardState::SelectRoom => StepInput::Room(self.room_picker.choice(options.rooms())),
            WizardState::SelectTime => StepInput::Time(self.pending_time),
            WizardState::Available | WizardState::Occupied => StepInput::Keep,
        }
    }

    fn dispatch(&mut self, action: Action) {
        let session = std::mem::take(&mut self.session);
        let dispatched = self.controller.dispatch(session, action);
        self.session = dispatched.session;

        self.status = match dispatched.result {
            Ok(_) => StatusLine::Idle,
            Err(e @ WizardError::Validation(_)) => StatusLine::Warning(e.to_string()),
            Err(e @ WizardError::Resolution(_)) => StatusLine::Error(format!(
                "{}. Press Enter to try again.",
                e
            )),
            Err(e) => StatusLine::Info(e.to_string()),
        };
        self.sync_pickers();
    }

    /// Point the pickers at whatever the session holds.
    fn sync_pickers(&mut self) {
        let options = self.controller.options();
        let selections = self.session.selections();
        self.day_picker.select(&selections.day, options.days());
        self.room_picker.select(&selections.room, options.rooms());
        self.pending_time = selections.time;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SelectionOptions;
    use crate::resolver::Verdict;
    use crate::store::InMemoryStore;
    use crate::types::{Choice, OccupationRecord};
    use std::sync::Arc;

    fn app() -> App {
        let store = InMemoryStore::new(vec![OccupationRecord {
            day: "Senin".into(),
            room: "Software I".into(),
            start_time: "08:00".parse().unwrap(),
            end_time: "10:00".parse().unwrap(),
            course_name: "Struktur Data".into(),
        }]);
        let options = SelectionOptions::load(&store).expect("options");
        App::new(WizardController::new(Arc::new(store), options), 15)
    }

    fn press(app: &mut App, code: KeyCode) -> bool {
        app.handle_key_event(KeyEvent::new(code, KeyModifiers::NONE))
    }

    #[test]
    fn test_enter_on_placeholder_warns() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Enter));
        assert_eq!(app.session().current_state(), WizardState::SelectDay);
        assert!(matches!(app.status(), StatusLine::Warning(_)));
    }

    #[test]
    fn test_keyboard_pass_to_occupied() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        let days = app.controller().options().days();
        assert_eq!(app.day_picker().choice(days), Choice::chosen("Senin"));
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session().current_state(), WizardState::SelectTime);

        // 08:00 -> 08:30
        press(&mut app, KeyCode::Up);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.pending_time().to_string(), "08:30");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.session().current_state(), WizardState::Occupied);
        assert!(matches!(
            app.session().last_outcome(),
            Some(Verdict::Occupied(r)) if r.course_name == "Struktur Data"
        ));
        assert_eq!(app.status(), &StatusLine::Idle);
    }

    #[test]
    fn test_back_restores_day_picker() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Esc);
        assert_eq!(app.session().current_state(), WizardState::SelectDay);
        assert_eq!(app.day_picker().index(), 1);
    }

    #[test]
    fn test_reset_from_result_clears_pickers() {
        let mut app = app();
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::PageUp);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.session().current_state(), WizardState::Available);

        press(&mut app, KeyCode::Char('r'));
        assert_eq!(app.session().current_state(), WizardState::SelectDay);
        assert_eq!(app.day_picker().index(), 0);
        assert_eq!(app.room_picker().index(), 0);
        assert_eq!(app.pending_time().to_string(), "08:00");
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key_event(KeyEvent::new(
            KeyCode::Char('c'),
            KeyModifiers::CONTROL
        )));
    }
}
