use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph},
};

use crate::session::{QuizSession, QUESTION_TIME_SECS};

pub fn render(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(13),
        Constraint::Fill(1),
    ])
    .split(area);

    let total = session.total_questions();
    let summary = if total == 0 {
        Line::from("No questions yet · add some in admin mode".fg(Color::Yellow))
    } else {
        Line::from(
            format!(
                "{total} questions · {QUESTION_TIME_SECS}s each · explanations included"
            )
            .fg(Color::DarkGray),
        )
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "歴史クイズ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from("〜時を超える知識の旅〜".fg(Color::DarkGray)),
        Line::from(""),
        summary,
        Line::from(""),
        Line::from(""),
        Line::from(Span::styled(
            "ENTER",
            Style::default().fg(Color::Green).bold(),
        )),
        Line::from("to start".fg(Color::DarkGray)),
        Line::from(""),
        Line::from("q quit".fg(Color::DarkGray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );

    frame.render_widget(widget, chunks[1]);
}
