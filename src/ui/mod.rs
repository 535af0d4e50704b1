//! User interface rendering module
//!
//! - `screens` - One screen per wizard state
//! - Main module - Layout, header, status line and navigation bar

mod screens;

use crate::app::{App, StatusLine};
use crate::theme::Styles;
use crate::wizard::{ActionKind, WizardState};
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

/// Render the whole screen for the current application state
pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(6),    // Step content
            Constraint::Length(1), // Status line
            Constraint::Length(1), // Navigation bar
        ])
        .split(f.area());

    render_header(f, app.session().current_state(), chunks[0]);

    match app.session().current_state() {
        WizardState::SelectDay => screens::render_day_select(f, app, chunks[1]),
        WizardState::SelectRoom => screens::render_room_select(f, app, chunks[1]),
        WizardState::SelectTime => screens::render_time_select(f, app, chunks[1]),
        WizardState::Available | WizardState::Occupied => {
            screens::render_result(f, app, chunks[1])
        }
    }

    render_status(f, app.status(), chunks[2]);
    render_nav_bar(
        f,
        app.session().available_actions(),
        app.session().current_state(),
        chunks[3],
    );
}

fn render_header(f: &mut Frame, state: WizardState, area: Rect) {
    let title = format!(
        "Lab availability check  ·  step {}/{}  ·  {}",
        state.step_number(),
        WizardState::TOTAL_STEPS,
        state.code()
    );
    let header = Paragraph::new(title)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active()),
        )
        .alignment(Alignment::Center)
        .style(Styles::title());
    f.render_widget(header, area);
}

fn render_status(f: &mut Frame, status: &StatusLine, area: Rect) {
    let line = match status {
        StatusLine::Idle => Line::default(),
        StatusLine::Info(msg) => Line::styled(msg.as_str(), Styles::text_muted()),
        StatusLine::Warning(msg) => Line::styled(format!("⚠ {}", msg), Styles::warning()),
        StatusLine::Error(msg) => Line::styled(format!("✗ {}", msg), Styles::error()),
    };
    f.render_widget(Paragraph::new(line), area);
}

/// Key hints for the actions the wizard accepts right now
fn render_nav_bar(f: &mut Frame, actions: &[ActionKind], state: WizardState, area: Rect) {
    let mut spans = Vec::new();
    let mut push = |key: &'static str, label: &'static str| {
        if !spans.is_empty() {
            spans.push(Span::styled("  ", Styles::nav_hint()));
        }
        spans.push(Span::styled(key, Styles::nav_key()));
        spans.push(Span::styled(format!(" {}", label), Styles::nav_hint()));
    };

    match state {
        WizardState::SelectDay | WizardState::SelectRoom => push("↑↓", "choose"),
        WizardState::SelectTime => push("↑↓/PgUp PgDn", "adjust"),
        WizardState::Available | WizardState::Occupied => {}
    }
    for action in actions {
        match action {
            ActionKind::Advance if state == WizardState::SelectTime => push("Enter", "check now"),
            ActionKind::Advance => push("Enter", "next"),
            ActionKind::Back => push("Esc", "back"),
            ActionKind::Reset => push("r/Enter", "check again"),
        }
    }
    push("q", "quit");

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
