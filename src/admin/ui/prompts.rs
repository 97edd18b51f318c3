//! Confirmation and input overlays.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Clear, Padding, Paragraph};

pub fn render_confirm_delete(frame: &mut Frame, area: Rect, id: &str) {
    render_dialog(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                format!("Delete question {id}?"),
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(""),
            Line::from("[y] delete  ·  [n] cancel".fg(Color::DarkGray)),
        ],
    );
}

pub fn render_confirm_reset(frame: &mut Frame, area: Rect) {
    render_dialog(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                "Reset ALL questions to the default set?",
                Style::default().fg(Color::Red).bold(),
            )),
            Line::from("This cannot be undone.".fg(Color::Gray)),
            Line::from(""),
            Line::from("[y] reset  ·  [n] cancel".fg(Color::DarkGray)),
        ],
    );
}

pub fn render_import_prompt(frame: &mut Frame, area: Rect, input: &str) {
    render_dialog(
        frame,
        area,
        vec![
            Line::from(Span::styled(
                "Import questions from JSON file",
                Style::default().fg(Color::White).bold(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("path: ", Style::default().fg(Color::Gray)),
                Span::styled(input, Style::default().fg(Color::Yellow)),
                Span::styled("_", Style::default().fg(Color::Yellow)),
            ]),
            Line::from(""),
            Line::from("[enter] import  ·  [esc] cancel".fg(Color::DarkGray)),
        ],
    );
}

fn render_dialog(frame: &mut Frame, area: Rect, content: Vec<Line>) {
    let height = content.len() as u16 + 4;
    let vertical = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(60),
        Constraint::Fill(1),
    ])
    .split(vertical[1]);
    let dialog_area = horizontal[1];

    frame.render_widget(Clear, dialog_area);
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::vertical(1)),
    );
    frame.render_widget(widget, dialog_area);
}
