//! Question table with search.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Padding, Paragraph};

use crate::models::Question;

use super::super::editor::AdminApp;

const QUESTION_PREVIEW_LENGTH: usize = 40;

pub fn render(frame: &mut Frame, area: Rect, app: &AdminApp, questions: &[Question], fallback: bool) {
    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], questions, fallback);
    render_search(frame, chunks[1], app);
    render_table(frame, chunks[2], app, questions);
    if let Some(line) = super::status_line(app) {
        frame.render_widget(Paragraph::new(line), chunks[3]);
    }
    render_controls(frame, chunks[4]);
}

fn render_header(frame: &mut Frame, area: Rect, questions: &[Question], fallback: bool) {
    let storage_kb = serde_json::to_string(questions)
        .map(|json| json.len() / 1024)
        .unwrap_or(0);
    let mut spans = vec![
        Span::styled("QUESTION ADMIN", Style::default().fg(Color::Cyan).bold()),
        Span::styled(
            format!("  {} questions · {} KB", questions.len(), storage_kb),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if fallback {
        spans.push(Span::styled(
            "  [offline: showing cached data]",
            Style::default().fg(Color::Yellow),
        ));
    }
    let widget = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_search(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let style = if app.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let cursor = if app.searching { "_" } else { "" };
    let widget = Paragraph::new(Line::from(vec![
        Span::styled("search: ", style),
        Span::styled(app.search.as_str(), style),
        Span::styled(cursor, style),
    ]));
    frame.render_widget(widget, area);
}

fn render_table(frame: &mut Frame, area: Rect, app: &AdminApp, questions: &[Question]) {
    let filtered = app.filtered(questions);

    if filtered.is_empty() {
        let message = if questions.is_empty() {
            "No questions yet · press [n] to create one"
        } else {
            "No questions match the search"
        };
        let widget = Paragraph::new(message.fg(Color::DarkGray))
            .alignment(Alignment::Center)
            .block(Block::default().padding(Padding::vertical(2)));
        frame.render_widget(widget, area);
        return;
    }

    let lines: Vec<Line> = filtered
        .iter()
        .enumerate()
        .map(|(index, question)| {
            let is_selected = index == app.selected;
            let style = if is_selected {
                Style::default().fg(Color::Cyan).bold()
            } else {
                Style::default().fg(Color::Gray)
            };
            let marker = if is_selected { ">" } else { " " };

            Line::from(vec![
                Span::styled(format!(" {marker} "), style),
                Span::styled(format!("{} ", question.icon), style),
                Span::styled(preview(&question.question), style),
                Span::styled(
                    format!("  → {}", question.correct_answer),
                    Style::default().fg(if is_selected {
                        Color::Green
                    } else {
                        Color::DarkGray
                    }),
                ),
            ])
        })
        .collect();

    // Keep the selection visible on small terminals.
    let visible = area.height as usize;
    let scroll = app.selected.saturating_sub(visible.saturating_sub(1));

    let widget = Paragraph::new(lines).scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn preview(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new(
        "j/k move  ·  n new  ·  e edit  ·  d delete  ·  / search  ·  x export  ·  i import  ·  r reset  ·  q quit",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray)
    .block(Block::default().borders(Borders::TOP).border_style(Color::DarkGray));
    frame.render_widget(widget, area);
}
