//! Question file import and export.

use std::fs;
use std::io;
use std::path::Path;

use thiserror::Error;

use crate::models::{Question, ValidationError};

/// Default export file name.
pub const EXPORT_FILE: &str = "quiz_questions.json";

/// Why an import was rejected. Any of these aborts the whole import
/// before a single record is written.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("could not read the file: {0}")]
    Read(#[from] io::Error),
    #[error("not a valid JSON question array: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("the file contains no questions")]
    Empty,
    #[error("question {number} is invalid: {source}")]
    InvalidRecord {
        number: usize,
        source: ValidationError,
    },
}

/// Writes the collection as a pretty-printed JSON array.
pub fn export_questions(questions: &[Question], path: &Path) -> io::Result<()> {
    let json = serde_json::to_string_pretty(questions).map_err(io::Error::other)?;
    fs::write(path, json)
}

/// Reads and fully validates a question array. All-or-nothing: the
/// caller only persists records when every one of them passed.
pub fn import_questions(path: &Path) -> Result<Vec<Question>, ImportError> {
    let content = fs::read_to_string(path)?;
    let questions: Vec<Question> = serde_json::from_str(&content)?;
    if questions.is_empty() {
        return Err(ImportError::Empty);
    }
    for (index, question) in questions.iter().enumerate() {
        question
            .validate()
            .map_err(|source| ImportError::InvalidRecord {
                number: index + 1,
                source,
            })?;
    }
    Ok(questions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::seed_questions;

    #[test]
    fn export_then_import_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(EXPORT_FILE);
        let questions = seed_questions();
        export_questions(&questions, &path).unwrap();
        assert_eq!(import_questions(&path).unwrap(), questions);
    }

    #[test]
    fn non_array_json_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.json");
        fs::write(&path, r#"{"question": "not an array"}"#).unwrap();
        assert!(matches!(
            import_questions(&path),
            Err(ImportError::Parse(_))
        ));
    }

    #[test]
    fn empty_array_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.json");
        fs::write(&path, "[]").unwrap();
        assert!(matches!(import_questions(&path), Err(ImportError::Empty)));
    }

    #[test]
    fn invalid_record_aborts_whole_import() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("invalid.json");
        let mut questions = seed_questions();
        questions[3].correct_answer = "選択肢にない答え".to_string();
        fs::write(&path, serde_json::to_string(&questions).unwrap()).unwrap();
        assert!(matches!(
            import_questions(&path),
            Err(ImportError::InvalidRecord { number: 4, .. })
        ));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            import_questions(&dir.path().join("nope.json")),
            Err(ImportError::Read(_))
        ));
    }
}
