//! # history-quiz
//!
//! A terminal multiple-choice history quiz with an admin editor.
//!
//! Questions live in a local JSON store by default, or in a question sync
//! server (`history-quiz serve`) that pushes live collection snapshots to
//! every connected client. Both the quiz and the admin editor read and
//! write through one shared [`QuestionProvider`], so an edit in one
//! session shows up in the other.
//!
//! ## Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use history_quiz::store::{FallbackCache, LocalStore, QuestionStore};
//! use history_quiz::QuestionProvider;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), history_quiz::QuizError> {
//!     let data_dir = std::path::Path::new("./data");
//!     let store: Arc<dyn QuestionStore> = Arc::new(LocalStore::open(data_dir)?);
//!     let cache = FallbackCache::new(data_dir);
//!     let provider = QuestionProvider::start(Some(store), cache).await;
//!
//!     // Run the quiz in the terminal.
//!     history_quiz::run_quiz(provider).await?;
//!     Ok(())
//! }
//! ```

pub mod admin;
mod models;
pub mod protocol;
mod provider;
pub mod server;
mod session;
pub mod store;
pub mod terminal;
mod ui;

use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};

use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use thiserror::Error;

pub use models::{seed_questions, Question, ValidationError, DEFAULT_ICON};
pub use provider::QuestionProvider;
pub use session::{Phase, QuizSession, QUESTION_TIME_SECS};

use store::StoreError;

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// IO error from the terminal or the network listener.
    #[error("io error: {0}")]
    Io(#[from] io::Error),
    /// Error from the question backend.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// How often the input loop wakes up to let the countdown advance.
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Run the quiz TUI against the shared provider until the player quits.
pub async fn run_quiz(provider: Arc<QuestionProvider>) -> Result<(), QuizError> {
    let mut term = terminal::init()?;
    let result = run_event_loop(&mut term, &provider).await;
    terminal::restore()?;
    result
}

async fn run_event_loop(
    term: &mut terminal::Tui,
    provider: &Arc<QuestionProvider>,
) -> Result<(), QuizError> {
    let mut session = QuizSession::new(provider.questions());
    let mut last_tick = Instant::now();

    loop {
        term.draw(|frame| ui::render(frame, &session))?;

        if event::poll(POLL_INTERVAL)? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                let phase_before = session.phase();
                if handle_input(&mut session, provider, key.code) {
                    break;
                }
                // Every phase transition restarts the countdown clock, so
                // a leftover part-second never bleeds into a new question.
                if session.phase() != phase_before {
                    last_tick = Instant::now();
                }
            }
        }

        if last_tick.elapsed() >= Duration::from_secs(1) {
            session.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}

/// Returns true if the app should exit.
fn handle_input(
    session: &mut QuizSession,
    provider: &Arc<QuestionProvider>,
    key: KeyCode,
) -> bool {
    match session.phase() {
        Phase::Intro => match key {
            KeyCode::Enter => {
                // Pick up whatever the provider holds right now, so edits
                // made while the intro was showing are included.
                *session = QuizSession::new(provider.questions());
                session.start();
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        },
        Phase::Question => match key {
            KeyCode::Up | KeyCode::Char('k') => {
                session.highlight_previous();
                false
            }
            KeyCode::Down | KeyCode::Char('j') => {
                session.highlight_next();
                false
            }
            KeyCode::Enter | KeyCode::Char(' ') => {
                session.choose();
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        },
        Phase::Result => match key {
            KeyCode::Enter | KeyCode::Char(' ') => {
                session.advance();
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') => true,
            _ => false,
        },
        Phase::Completed => match key {
            KeyCode::Char('r') | KeyCode::Char('R') => {
                *session = QuizSession::new(provider.questions());
                session.start();
                false
            }
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => true,
            _ => false,
        },
    }
}
