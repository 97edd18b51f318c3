//! Admin editor UI renderer.

mod form;
mod list;
mod prompts;

use ratatui::prelude::*;
use ratatui::widgets::{Block, Paragraph};

use crate::models::Question;

use super::editor::{AdminApp, AdminView, StatusKind};

/// Render the admin UI based on the current view.
pub fn render(
    frame: &mut Frame,
    app: &AdminApp,
    questions: &[Question],
    loading: bool,
    fallback: bool,
) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    if loading {
        render_loading(frame, area);
        return;
    }

    match &app.view {
        AdminView::List => list::render(frame, area, app, questions, fallback),
        AdminView::Form => form::render(frame, area, app),
        AdminView::ConfirmDelete { id } => {
            list::render(frame, area, app, questions, fallback);
            prompts::render_confirm_delete(frame, area, id);
        }
        AdminView::ConfirmReset => {
            list::render(frame, area, app, questions, fallback);
            prompts::render_confirm_reset(frame, area);
        }
        AdminView::ImportPrompt => {
            list::render(frame, area, app, questions, fallback);
            prompts::render_import_prompt(frame, area, &app.import_input);
        }
    }
}

fn render_loading(frame: &mut Frame, area: Rect) {
    let chunks = Layout::vertical([
        Constraint::Percentage(40),
        Constraint::Length(5),
        Constraint::Percentage(40),
    ])
    .split(area);

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "Working...",
            Style::default().fg(Color::Yellow).bold(),
        )),
        Line::from("please wait".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(widget, chunks[1]);
}

/// Bottom status line shared by the admin views.
pub(super) fn status_line(app: &AdminApp) -> Option<Line<'_>> {
    app.status.as_ref().map(|(kind, message)| {
        let color = match kind {
            StatusKind::Info => Color::Green,
            StatusKind::Error => Color::Red,
        };
        Line::from(Span::styled(message.as_str(), Style::default().fg(color)))
    })
}
