//! Question edit form.

use ratatui::prelude::*;
use ratatui::widgets::{Block, Borders, Paragraph};

use super::super::editor::{AdminApp, FormField, QuestionForm};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, app: &AdminApp) {
    let Some(form) = app.form.as_ref() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    let title = if form.is_new {
        "NEW QUESTION"
    } else {
        "EDIT QUESTION"
    };
    let header = Paragraph::new(Span::styled(
        title,
        Style::default().fg(Color::Cyan).bold(),
    ))
    .block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(header, chunks[0]);

    let mut lines = vec![
        field_line("Question", FormField::Question, form),
        Line::from(""),
        field_line("Icon", FormField::Icon, form),
        Line::from(""),
    ];
    for (index, label) in OPTION_LABELS.iter().enumerate() {
        lines.push(option_line(*label, index, form));
    }
    lines.push(Line::from(""));
    lines.push(field_line("Explanation", FormField::Explanation, form));

    frame.render_widget(Paragraph::new(lines), chunks[1]);

    if let Some(line) = super::status_line(app) {
        frame.render_widget(Paragraph::new(line), chunks[2]);
    }

    let controls = Paragraph::new(
        "tab next field  ·  enter mark correct  ·  ctrl-s save  ·  esc cancel",
    )
    .alignment(Alignment::Center)
    .fg(Color::DarkGray)
    .block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(controls, chunks[3]);
}

fn field_line<'a>(label: &'a str, field: FormField, form: &'a QuestionForm) -> Line<'a> {
    let focused = form.field == field;
    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let value_style = if focused {
        Style::default().fg(Color::White)
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!(" {label:<12}"), label_style),
        Span::styled(form.field_value(field), value_style),
        Span::styled(cursor, value_style),
    ])
}

fn option_line(label: char, index: usize, form: &QuestionForm) -> Line<'_> {
    let field = FormField::Option(index);
    let focused = form.field == field;
    let is_correct = form.is_correct_option(index);

    let mark = if is_correct { "●" } else { "○" };
    let mark_style = if is_correct {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::DarkGray)
    };
    let label_style = if focused {
        Style::default().fg(Color::Yellow).bold()
    } else {
        Style::default().fg(Color::Gray)
    };
    let cursor = if focused { "_" } else { "" };

    Line::from(vec![
        Span::styled(format!(" {mark} "), mark_style),
        Span::styled(format!("{label}. "), label_style),
        Span::styled(form.field_value(field), label_style),
        Span::styled(cursor, label_style),
    ])
}
