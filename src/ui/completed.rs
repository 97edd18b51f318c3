use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Paragraph},
};

use crate::session::QuizSession;

pub fn render(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(14),
        Constraint::Fill(1),
    ])
    .split(area);

    let panel = Layout::horizontal([
        Constraint::Fill(1),
        Constraint::Percentage(70),
        Constraint::Fill(1),
    ])
    .split(chunks[1])[1];

    if session.total_questions() == 0 {
        render_empty(frame, panel);
        return;
    }

    let rows = Layout::vertical([
        Constraint::Length(11),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(panel);

    let percentage = session.percentage();
    let trophy = match percentage {
        80..=100 => "🏆",
        60..=79 => "🥈",
        _ => "📚",
    };
    let encouragement = if percentage == 100 {
        "素晴らしい！あなたは歴史の達人です！"
    } else if percentage >= 60 {
        "良い成績です！もう少しで完璧です！"
    } else {
        "もう一度挑戦して歴史知識を深めましょう！"
    };

    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "クイズ結果",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from(trophy),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {} 正解  (正答率: {}%)",
                session.score(),
                session.total_questions(),
                percentage
            ),
            Style::default().fg(grade_color(percentage)).bold(),
        )),
        Line::from(""),
        Line::from(encouragement.fg(Color::Gray)),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, rows[0]);

    let bar = Layout::horizontal([
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(4),
    ])
    .split(rows[1])[1];
    let gauge = Gauge::default()
        .ratio(f64::from(percentage) / 100.0)
        .gauge_style(
            Style::default()
                .fg(grade_color(percentage))
                .bg(Color::DarkGray),
        )
        .use_unicode(true)
        .label("");
    frame.render_widget(gauge, bar);

    let controls = Paragraph::new("r もう一度挑戦する  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, rows[3]);
}

fn grade_color(percentage: u32) -> Color {
    match percentage {
        80..=100 => Color::Green,
        60..=79 => Color::Cyan,
        40..=59 => Color::Yellow,
        _ => Color::Red,
    }
}

fn render_empty(frame: &mut Frame, area: Rect) {
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "歴史クイズ",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("出題できる問題がありません".fg(Color::Yellow)),
        Line::from(""),
        Line::from("Add questions in admin mode, then try again".fg(Color::DarkGray)),
        Line::from(""),
        Line::from("q quit".fg(Color::DarkGray)),
    ];
    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}
