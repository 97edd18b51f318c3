use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Icon used when a record doesn't carry one.
pub const DEFAULT_ICON: &str = "📚";

const OPTION_LABELS: [char; 4] = ['A', 'B', 'C', 'D'];

/// A single quiz question as stored and exchanged with the backend.
///
/// The wire format is camelCase JSON: `id`, `question`, `options` (exactly
/// four strings), `correctAnswer` (the text of one of the options),
/// `explanation`, `icon`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// Unique id within the collection. `None` until the store assigns one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub question: String,
    pub options: [String; 4],
    pub correct_answer: String,
    pub explanation: String,
    #[serde(default = "default_icon")]
    pub icon: String,
}

fn default_icon() -> String {
    DEFAULT_ICON.to_string()
}

/// Why a question record was rejected before being saved.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("question text must not be empty")]
    EmptyQuestion,
    #[error("option {0} must not be empty")]
    EmptyOption(char),
    #[error("a correct answer must be chosen")]
    MissingCorrectAnswer,
    #[error("the correct answer must be one of the four options")]
    CorrectAnswerNotAnOption,
    #[error("explanation must not be empty")]
    EmptyExplanation,
}

impl Question {
    /// An empty record for the admin editor's "new question" form.
    pub fn blank() -> Self {
        Self {
            id: None,
            question: String::new(),
            options: std::array::from_fn(|_| String::new()),
            correct_answer: String::new(),
            explanation: String::new(),
            icon: default_icon(),
        }
    }

    /// Checks the record invariants. Called before every save so that
    /// malformed records never reach a backend.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.question.trim().is_empty() {
            return Err(ValidationError::EmptyQuestion);
        }
        for (index, option) in self.options.iter().enumerate() {
            if option.trim().is_empty() {
                return Err(ValidationError::EmptyOption(OPTION_LABELS[index]));
            }
        }
        if self.correct_answer.is_empty() {
            return Err(ValidationError::MissingCorrectAnswer);
        }
        if !self.options.contains(&self.correct_answer) {
            return Err(ValidationError::CorrectAnswerNotAnOption);
        }
        if self.explanation.trim().is_empty() {
            return Err(ValidationError::EmptyExplanation);
        }
        Ok(())
    }

    /// Index of the correct option, when the record is well-formed.
    pub fn correct_index(&self) -> Option<usize> {
        self.options.iter().position(|o| *o == self.correct_answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_question() -> Question {
        Question {
            id: Some("7".to_string()),
            question: "首都はどこ？".to_string(),
            options: [
                "京都".to_string(),
                "東京".to_string(),
                "大阪".to_string(),
                "奈良".to_string(),
            ],
            correct_answer: "東京".to_string(),
            explanation: "現在の日本の首都は東京です。".to_string(),
            icon: "🗼".to_string(),
        }
    }

    #[test]
    fn valid_record_passes() {
        assert!(valid_question().validate().is_ok());
    }

    #[test]
    fn empty_question_text_rejected() {
        let mut q = valid_question();
        q.question = "   ".to_string();
        assert_eq!(q.validate(), Err(ValidationError::EmptyQuestion));
    }

    #[test]
    fn empty_option_rejected_with_label() {
        let mut q = valid_question();
        q.options[2] = String::new();
        assert_eq!(q.validate(), Err(ValidationError::EmptyOption('C')));
    }

    #[test]
    fn correct_answer_outside_options_rejected() {
        let mut q = valid_question();
        q.correct_answer = "名古屋".to_string();
        assert_eq!(q.validate(), Err(ValidationError::CorrectAnswerNotAnOption));
    }

    #[test]
    fn missing_correct_answer_rejected() {
        let mut q = valid_question();
        q.correct_answer = String::new();
        assert_eq!(q.validate(), Err(ValidationError::MissingCorrectAnswer));
    }

    #[test]
    fn empty_explanation_rejected() {
        let mut q = valid_question();
        q.explanation = String::new();
        assert_eq!(q.validate(), Err(ValidationError::EmptyExplanation));
    }

    #[test]
    fn wire_format_is_camel_case() {
        let json = serde_json::to_string(&valid_question()).unwrap();
        assert!(json.contains("\"correctAnswer\":\"東京\""));
        assert!(json.contains("\"id\":\"7\""));
    }

    #[test]
    fn icon_defaults_when_absent() {
        let json = r#"{
            "id": "9",
            "question": "q",
            "options": ["a", "b", "c", "d"],
            "correctAnswer": "a",
            "explanation": "e"
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.icon, DEFAULT_ICON);
    }
}
