//! Admin editor state.

use crate::models::{Question, ValidationError};

/// Which screen of the editor is active.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AdminView {
    /// Question table with search.
    List,
    /// The edit/create form.
    Form,
    /// Delete confirmation for the given id.
    ConfirmDelete { id: String },
    /// Reset-to-defaults confirmation.
    ConfirmReset,
    /// Path prompt for importing a question file.
    ImportPrompt,
}

/// Form fields in navigation order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Question,
    Icon,
    Option(usize),
    Explanation,
}

impl FormField {
    const ORDER: [FormField; 7] = [
        FormField::Question,
        FormField::Icon,
        FormField::Option(0),
        FormField::Option(1),
        FormField::Option(2),
        FormField::Option(3),
        FormField::Explanation,
    ];

    pub fn next(self) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(pos + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        let pos = Self::ORDER.iter().position(|f| *f == self).unwrap_or(0);
        Self::ORDER[(pos + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// A record being edited. Works on a copy: incoming snapshots refresh the
/// list underneath but never touch in-progress edits.
#[derive(Debug, Clone)]
pub struct QuestionForm {
    pub question: Question,
    pub field: FormField,
    pub is_new: bool,
}

impl QuestionForm {
    pub fn new_question() -> Self {
        Self {
            question: Question::blank(),
            field: FormField::Question,
            is_new: true,
        }
    }

    pub fn edit(question: Question) -> Self {
        Self {
            question,
            field: FormField::Question,
            is_new: false,
        }
    }

    fn field_mut(&mut self) -> &mut String {
        match self.field {
            FormField::Question => &mut self.question.question,
            FormField::Icon => &mut self.question.icon,
            FormField::Option(i) => &mut self.question.options[i],
            FormField::Explanation => &mut self.question.explanation,
        }
    }

    pub fn field_value(&self, field: FormField) -> &str {
        match field {
            FormField::Question => &self.question.question,
            FormField::Icon => &self.question.icon,
            FormField::Option(i) => &self.question.options[i],
            FormField::Explanation => &self.question.explanation,
        }
    }

    pub fn input_push(&mut self, c: char) {
        self.field_mut().push(c);
        self.sync_correct_answer();
    }

    pub fn input_pop(&mut self) {
        self.field_mut().pop();
        self.sync_correct_answer();
    }

    /// Marks the focused option as the correct answer.
    pub fn mark_correct(&mut self) {
        if let FormField::Option(i) = self.field {
            self.question.correct_answer = self.question.options[i].clone();
        }
    }

    pub fn is_correct_option(&self, index: usize) -> bool {
        !self.question.correct_answer.is_empty()
            && self.question.options[index] == self.question.correct_answer
    }

    // A correct-answer mark only survives while it still matches one of
    // the option texts.
    fn sync_correct_answer(&mut self) {
        if !self.question.options.contains(&self.question.correct_answer) {
            self.question.correct_answer.clear();
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        self.question.validate()
    }
}

impl Default for QuestionForm {
    fn default() -> Self {
        Self::new_question()
    }
}

/// Tone of the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Error,
}

/// Admin editor application state.
pub struct AdminApp {
    pub view: AdminView,
    /// Selection index into the *filtered* list.
    pub selected: usize,
    pub search: String,
    /// True while keystrokes go to the search box.
    pub searching: bool,
    pub form: Option<QuestionForm>,
    pub import_input: String,
    pub status: Option<(StatusKind, String)>,
    pub should_quit: bool,
}

impl AdminApp {
    pub fn new() -> Self {
        Self {
            view: AdminView::List,
            selected: 0,
            search: String::new(),
            searching: false,
            form: None,
            import_input: String::new(),
            status: None,
            should_quit: false,
        }
    }

    /// Case-insensitive substring filter over question and explanation.
    /// Display-only: the persisted collection is never affected.
    pub fn filtered<'a>(&self, questions: &'a [Question]) -> Vec<&'a Question> {
        if self.search.is_empty() {
            return questions.iter().collect();
        }
        let needle = self.search.to_lowercase();
        questions
            .iter()
            .filter(|q| {
                q.question.to_lowercase().contains(&needle)
                    || q.explanation.to_lowercase().contains(&needle)
            })
            .collect()
    }

    pub fn select_next(&mut self, filtered_len: usize) {
        if filtered_len > 0 {
            self.selected = (self.selected + 1).min(filtered_len - 1);
        }
    }

    pub fn select_previous(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self, filtered_len: usize) {
        if filtered_len == 0 {
            self.selected = 0;
        } else {
            self.selected = self.selected.min(filtered_len - 1);
        }
    }

    pub fn open_new_form(&mut self) {
        self.form = Some(QuestionForm::new_question());
        self.view = AdminView::Form;
        self.status = None;
    }

    pub fn open_edit_form(&mut self, question: Question) {
        self.form = Some(QuestionForm::edit(question));
        self.view = AdminView::Form;
        self.status = None;
    }

    pub fn close_form(&mut self) {
        self.form = None;
        self.view = AdminView::List;
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.status = Some((StatusKind::Info, message.into()));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.status = Some((StatusKind::Error, message.into()));
    }
}

impl Default for AdminApp {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_questions;

    #[test]
    fn filter_matches_question_and_explanation() {
        let app = AdminApp {
            search: "幕府".to_string(),
            ..AdminApp::new()
        };
        let questions = seed_questions();
        let filtered = app.filtered(&questions);
        // "鎌倉幕府" in q1, "江戸幕府" in q3's text and explanation.
        assert!(filtered.len() >= 2);
        assert!(filtered
            .iter()
            .all(|q| q.question.contains("幕府") || q.explanation.contains("幕府")));
    }

    #[test]
    fn filter_is_case_insensitive() {
        let mut questions = seed_questions();
        questions[0].question = "When was the Kamakura Shogunate founded?".to_string();
        let app = AdminApp {
            search: "KAMAKURA".to_string(),
            ..AdminApp::new()
        };
        assert_eq!(app.filtered(&questions).len(), 1);
    }

    #[test]
    fn empty_search_shows_everything() {
        let app = AdminApp::new();
        assert_eq!(app.filtered(&seed_questions()).len(), 5);
    }

    #[test]
    fn field_navigation_wraps() {
        let mut field = FormField::Question;
        for _ in 0..FormField::ORDER.len() {
            field = field.next();
        }
        assert_eq!(field, FormField::Question);
        assert_eq!(FormField::Question.previous(), FormField::Explanation);
    }

    #[test]
    fn mark_correct_tracks_option_text() {
        let mut form = QuestionForm::new_question();
        form.field = FormField::Option(1);
        for c in "1192年".chars() {
            form.input_push(c);
        }
        form.mark_correct();
        assert_eq!(form.question.correct_answer, "1192年");
        assert!(form.is_correct_option(1));
    }

    #[test]
    fn editing_marked_option_clears_stale_correct_answer() {
        let mut form = QuestionForm::edit(seed_questions()[0].clone());
        let correct_index = form.question.correct_index().unwrap();
        form.field = FormField::Option(correct_index);
        form.input_pop();
        assert!(form.question.correct_answer.is_empty());
    }

    #[test]
    fn new_form_starts_blank_with_default_icon() {
        let form = QuestionForm::new_question();
        assert!(form.is_new);
        assert_eq!(form.question.icon, crate::models::DEFAULT_ICON);
        assert!(form.question.id.is_none());
        assert!(form.validate().is_err());
    }

    #[test]
    fn selection_clamps_to_filtered_length() {
        let mut app = AdminApp::new();
        app.selected = 10;
        app.clamp_selection(3);
        assert_eq!(app.selected, 2);
        app.clamp_selection(0);
        assert_eq!(app.selected, 0);
    }
}
