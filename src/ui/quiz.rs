use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Gauge, Padding, Paragraph, Wrap},
};

use crate::session::{Phase, QuizSession, LOW_TIME_SECS, QUESTION_TIME_SECS};

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

pub fn render(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let Some(question) = session.current_question() else {
        return;
    };
    let showing_result = session.phase() == Phase::Result;

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(3),
        Constraint::Length(9),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    render_header(frame, chunks[0], session);
    render_timer(frame, chunks[1], session);
    render_question_text(frame, chunks[2], &question.icon, &question.question);
    render_options(frame, chunks[3], session, showing_result);
    if showing_result {
        render_explanation(frame, chunks[4], session, &question.explanation);
    }
    render_controls(frame, chunks[5], session, showing_result);
}

fn render_header(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let progress = format!(
        "問題 {}/{}",
        session.current_question_number(),
        session.total_questions()
    );
    frame.render_widget(Paragraph::new(progress).fg(Color::DarkGray), halves[0]);

    let remaining = session.remaining_secs();
    let timer_color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Yellow
    };
    let widget = Paragraph::new(format!("⏱ {remaining}"))
        .alignment(Alignment::Right)
        .fg(timer_color);
    frame.render_widget(widget, halves[1]);
}

fn render_timer(frame: &mut Frame, area: Rect, session: &QuizSession) {
    let remaining = session.remaining_secs();
    let color = if remaining <= LOW_TIME_SECS {
        Color::Red
    } else {
        Color::Yellow
    };
    let gauge = Gauge::default()
        .ratio(f64::from(remaining) / f64::from(QUESTION_TIME_SECS))
        .gauge_style(Style::default().fg(color).bg(Color::DarkGray))
        .use_unicode(true)
        .label("");
    frame.render_widget(gauge, area);
}

fn render_question_text(frame: &mut Frame, area: Rect, icon: &str, text: &str) {
    let line = Line::from(vec![
        Span::styled(format!("{icon}  "), Style::default()),
        Span::styled(text, Style::default().fg(Color::White).bold()),
    ]);
    let widget = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(Block::default().padding(Padding::vertical(1)));
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, session: &QuizSession, showing_result: bool) {
    let Some(question) = session.current_question() else {
        return;
    };
    let correct_index = question.correct_index();
    let mut lines: Vec<Line> = Vec::with_capacity(question.options.len() * 2);

    for (index, option) in question.options.iter().enumerate() {
        let (marker, style) = if showing_result {
            if Some(index) == correct_index {
                ("+", Style::default().fg(Color::Green).bold())
            } else if session.answer() == Some(index) {
                ("-", Style::default().fg(Color::Red).bold())
            } else {
                (" ", Style::default().fg(Color::DarkGray))
            }
        } else if index == session.highlighted() {
            (">", Style::default().fg(Color::Cyan).bold())
        } else {
            (" ", Style::default().fg(Color::Gray))
        };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", OPTION_LABELS[index]), style),
            Span::styled(option.as_str(), style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_explanation(frame: &mut Frame, area: Rect, session: &QuizSession, explanation: &str) {
    let correct_index = session.current_question().and_then(|q| q.correct_index());
    let verdict = match session.answer() {
        Some(answer) if Some(answer) == correct_index => {
            Line::from(Span::styled("正解！", Style::default().fg(Color::Green).bold()))
        }
        Some(_) => Line::from(Span::styled(
            "不正解...",
            Style::default().fg(Color::Red).bold(),
        )),
        None => Line::from(Span::styled(
            "時間切れ",
            Style::default().fg(Color::Red).bold(),
        )),
    };

    let content = vec![
        verdict,
        Line::from(""),
        Line::from(Span::styled("解説:", Style::default().fg(Color::Yellow).bold())),
        Line::from(explanation.to_string()),
    ];

    let widget = Paragraph::new(content).wrap(Wrap { trim: true }).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(1)),
    );
    frame.render_widget(widget, area);
}

fn render_controls(frame: &mut Frame, area: Rect, session: &QuizSession, showing_result: bool) {
    let text = if showing_result {
        if session.is_last_question() {
            "enter 結果を見る  ·  q quit"
        } else {
            "enter 次の問題へ  ·  q quit"
        }
    } else {
        "j/k navigate  ·  enter select  ·  q quit"
    };
    let widget = Paragraph::new(text)
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
