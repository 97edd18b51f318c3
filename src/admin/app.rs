//! Admin editor event loop.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::provider::QuestionProvider;
use crate::terminal;
use crate::QuizError;

use super::editor::{AdminApp, AdminView, FormField};
use super::files::{self, EXPORT_FILE};
use super::ui;

/// Run the admin editor against the shared provider.
pub async fn run(provider: Arc<QuestionProvider>) -> Result<(), QuizError> {
    let mut term = terminal::init()?;
    let mut app = AdminApp::new();
    let result = run_loop(&mut term, &mut app, &provider).await;
    terminal::restore()?;
    result
}

async fn run_loop(
    term: &mut terminal::Tui,
    app: &mut AdminApp,
    provider: &Arc<QuestionProvider>,
) -> Result<(), QuizError> {
    loop {
        let questions = provider.questions();
        app.clamp_selection(app.filtered(&questions).len());

        term.draw(|frame| {
            ui::render(frame, app, &questions, provider.is_loading(), provider.is_fallback())
        })?;

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_input(app, provider, key).await;
            }
        }
    }
    Ok(())
}

async fn handle_input(app: &mut AdminApp, provider: &Arc<QuestionProvider>, key: KeyEvent) {
    match app.view.clone() {
        AdminView::List => handle_list_input(app, provider, key).await,
        AdminView::Form => handle_form_input(app, provider, key).await,
        AdminView::ConfirmDelete { id } => handle_confirm_delete(app, provider, key, &id).await,
        AdminView::ConfirmReset => handle_confirm_reset(app, provider, key).await,
        AdminView::ImportPrompt => handle_import_input(app, provider, key).await,
    }
}

async fn handle_list_input(app: &mut AdminApp, provider: &Arc<QuestionProvider>, key: KeyEvent) {
    if app.searching {
        match key.code {
            KeyCode::Char(c) => {
                app.search.push(c);
                app.selected = 0;
            }
            KeyCode::Backspace => {
                app.search.pop();
                app.selected = 0;
            }
            KeyCode::Enter => app.searching = false,
            KeyCode::Esc => {
                app.searching = false;
                app.search.clear();
            }
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Char('q') | KeyCode::Char('Q') => app.should_quit = true,
        KeyCode::Char('/') => {
            app.searching = true;
            app.status = None;
        }
        KeyCode::Down | KeyCode::Char('j') => {
            let len = app.filtered(&provider.questions()).len();
            app.select_next(len);
        }
        KeyCode::Up | KeyCode::Char('k') => app.select_previous(),
        KeyCode::Char('n') => app.open_new_form(),
        KeyCode::Char('e') | KeyCode::Enter => {
            let questions = provider.questions();
            if let Some(question) = app.filtered(&questions).get(app.selected) {
                app.open_edit_form((*question).clone());
            }
        }
        KeyCode::Char('d') => {
            let questions = provider.questions();
            if let Some(id) = app
                .filtered(&questions)
                .get(app.selected)
                .and_then(|q| q.id.clone())
            {
                app.view = AdminView::ConfirmDelete { id };
            }
        }
        KeyCode::Char('r') => app.view = AdminView::ConfirmReset,
        KeyCode::Char('x') => export(app, provider),
        KeyCode::Char('i') => {
            app.import_input.clear();
            app.view = AdminView::ImportPrompt;
        }
        KeyCode::Esc => {
            app.search.clear();
            app.status = None;
        }
        _ => {}
    }
}

async fn handle_form_input(app: &mut AdminApp, provider: &Arc<QuestionProvider>, key: KeyEvent) {
    if key.modifiers.contains(KeyModifiers::CONTROL) && matches!(key.code, KeyCode::Char('s')) {
        save_form(app, provider).await;
        return;
    }

    let Some(form) = app.form.as_mut() else {
        app.view = AdminView::List;
        return;
    };

    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Tab | KeyCode::Down => form.field = form.field.next(),
        KeyCode::BackTab | KeyCode::Up => form.field = form.field.previous(),
        KeyCode::Enter => {
            // On an option row Enter marks the correct answer; elsewhere
            // it just moves on.
            if matches!(form.field, FormField::Option(_)) {
                form.mark_correct();
            } else {
                form.field = form.field.next();
            }
        }
        KeyCode::Char(c) => form.input_push(c),
        KeyCode::Backspace => form.input_pop(),
        _ => {}
    }
}

async fn save_form(app: &mut AdminApp, provider: &Arc<QuestionProvider>) {
    let Some(question) = app.form.as_ref().map(|form| form.question.clone()) else {
        return;
    };
    // Rejected records never reach the backend; the form keeps the
    // in-progress edits.
    if let Err(err) = question.validate() {
        app.error(err.to_string());
        return;
    }
    match provider.save_question(question).await {
        Ok(stored) => {
            app.close_form();
            app.info(format!(
                "Saved question {}",
                stored.id.as_deref().unwrap_or("?")
            ));
        }
        Err(err) => app.error(format!("Save failed: {err}")),
    }
}

async fn handle_confirm_delete(
    app: &mut AdminApp,
    provider: &Arc<QuestionProvider>,
    key: KeyEvent,
    id: &str,
) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            match provider.delete_question(id).await {
                Ok(()) => app.info(format!("Deleted question {id}")),
                Err(err) => app.error(format!("Delete failed: {err}")),
            }
            app.view = AdminView::List;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.view = AdminView::List,
        _ => {}
    }
}

async fn handle_confirm_reset(app: &mut AdminApp, provider: &Arc<QuestionProvider>, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
            match provider.reset_questions().await {
                Ok(()) => app.info("All questions reset to the default set"),
                Err(err) => app.error(format!("Reset failed: {err}")),
            }
            app.view = AdminView::List;
            app.selected = 0;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.view = AdminView::List,
        _ => {}
    }
}

async fn handle_import_input(app: &mut AdminApp, provider: &Arc<QuestionProvider>, key: KeyEvent) {
    match key.code {
        KeyCode::Char(c) => app.import_input.push(c),
        KeyCode::Backspace => {
            app.import_input.pop();
        }
        KeyCode::Esc => app.view = AdminView::List,
        KeyCode::Enter => {
            let path = app.import_input.trim().to_string();
            if path.is_empty() {
                return;
            }
            app.view = AdminView::List;
            import(app, provider, Path::new(&path)).await;
        }
        _ => {}
    }
}

/// All-or-nothing import: the file is fully read and validated before the
/// first record is written.
async fn import(app: &mut AdminApp, provider: &Arc<QuestionProvider>, path: &Path) {
    let questions = match files::import_questions(path) {
        Ok(questions) => questions,
        Err(err) => {
            app.error(format!("Import aborted: {err}"));
            return;
        }
    };
    let total = questions.len();
    for question in questions {
        if let Err(err) = provider.save_question(question).await {
            app.error(format!("Import stopped: {err}"));
            return;
        }
    }
    app.info(format!("Imported {total} questions"));
}

fn export(app: &mut AdminApp, provider: &Arc<QuestionProvider>) {
    let questions = provider.questions();
    match files::export_questions(&questions, Path::new(EXPORT_FILE)) {
        Ok(()) => app.info(format!(
            "Exported {} questions to {EXPORT_FILE}",
            questions.len()
        )),
        Err(err) => app.error(format!("Export failed: {err}")),
    }
}
