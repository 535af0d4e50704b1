//! Wizard screens: day, room and time pickers and the result view.

use crate::app::{App, Picker};
use crate::resolver::Verdict;
use crate::theme::Styles;
use crate::types::Choice;
use ratatui::{
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

/// Render the day picker (q0)
pub fn render_day_select(f: &mut Frame, app: &App, area: Rect) {
    let options = app.controller().options().days();
    render_picker(f, area, "1. Choose a day", options, app.day_picker());
}

/// Render the room picker (q1)
pub fn render_room_select(f: &mut Frame, app: &App, area: Rect) {
    let options = app.controller().options().rooms();
    let day = app.session().selections().day.to_string();
    let title = format!("2. Choose a lab room  ({})", day);
    render_picker(f, area, &title, options, app.room_picker());
}

fn render_picker(f: &mut Frame, area: Rect, title: &str, options: &[String], picker: &Picker) {
    let placeholder = ListItem::new(Choice::PLACEHOLDER_LABEL).style(Styles::placeholder());
    let items: Vec<ListItem> = std::iter::once(placeholder)
        .chain(
            options
                .iter()
                .map(|o| ListItem::new(o.as_str()).style(Styles::text())),
        )
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active())
                .title(title.to_string()),
        )
        .highlight_style(Styles::selected())
        .highlight_symbol("▶ ");

    let mut state = ListState::default();
    state.select(Some(picker.index()));
    f.render_stateful_widget(list, area, &mut state);
}

/// Render the time picker (q2)
pub fn render_time_select(f: &mut Frame, app: &App, area: Rect) {
    let selections = app.session().selections();
    let lines = vec![
        Line::from(vec![
            Span::styled("Day:  ", Styles::text_muted()),
            Span::styled(selections.day.to_string(), Styles::text()),
        ]),
        Line::from(vec![
            Span::styled("Room: ", Styles::text_muted()),
            Span::styled(selections.room.to_string(), Styles::text()),
        ]),
        Line::default(),
        Line::styled(app.pending_time().to_string(), Styles::title())
            .alignment(Alignment::Center),
    ];

    let body = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border_active())
            .title("3. Choose a time"),
    );
    f.render_widget(body, area);
}

/// Render the verdict (q3 / q4) from the cached outcome
pub fn render_result(f: &mut Frame, app: &App, area: Rect) {
    let selections = app.session().selections();
    let mut lines = vec![
        Line::from(format!(
            "Checked {} on {} at {}",
            selections.room, selections.day, selections.time
        )),
        Line::default(),
    ];

    match app.session().last_outcome() {
        Some(Verdict::Available) => {
            lines.push(Line::styled("TERSEDIA: the room is free", Styles::success()));
        }
        Some(Verdict::Occupied(record)) => {
            lines.push(Line::styled("DIGUNAKAN: the room is in use", Styles::error()));
            lines.push(Line::default());
            lines.push(Line::from(vec![
                Span::styled("Course: ", Styles::text_muted()),
                Span::styled(record.course_name.clone(), Styles::text_bold()),
            ]));
            lines.push(Line::from(vec![
                Span::styled("Time:   ", Styles::text_muted()),
                Span::styled(
                    format!("{} - {}", record.start_time, record.end_time),
                    Styles::text(),
                ),
            ]));
        }
        None => lines.push(Line::styled("No result", Styles::text_muted())),
    }

    let body = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border_active())
                .title(app.session().current_state().title()),
        )
        .wrap(Wrap { trim: true });
    f.render_widget(body, area);
}
