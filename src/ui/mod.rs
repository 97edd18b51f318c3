mod completed;
mod intro;
mod quiz;

use ratatui::{prelude::*, widgets::Block};

use crate::session::{Phase, QuizSession};

pub fn render(frame: &mut Frame, session: &QuizSession) {
    let area = frame.area();
    frame.render_widget(Block::default().bg(Color::Reset), area);

    match session.phase() {
        Phase::Intro => intro::render(frame, area, session),
        Phase::Question | Phase::Result => quiz::render(frame, area, session),
        Phase::Completed => completed::render(frame, area, session),
    }
}
