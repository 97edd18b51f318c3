use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::models::Question;

/// File name of the single cache entry, fixed so every run finds it.
const CACHE_FILE: &str = "questions-cache.json";

/// Durable fallback copy of the question collection.
///
/// Written after every successful mutation and accepted snapshot so that a
/// later startup with an unreachable backend can still serve stale data.
pub struct FallbackCache {
    path: PathBuf,
}

impl FallbackCache {
    pub fn new(data_dir: &Path) -> Self {
        Self {
            path: data_dir.join(CACHE_FILE),
        }
    }

    /// The cached collection, or `None` when no usable cache exists.
    pub fn load(&self) -> Option<Vec<Question>> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(questions) => Some(questions),
            Err(err) => {
                warn!(path = %self.path.display(), %err, "ignoring corrupt cache");
                None
            }
        }
    }

    /// Mirrors the given collection. Best effort: a failed write only
    /// costs the fallback, never the operation that triggered it.
    pub fn store(&self, questions: &[Question]) {
        let result = serde_json::to_string_pretty(questions)
            .map_err(std::io::Error::other)
            .and_then(|json| {
                if let Some(parent) = self.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&self.path, json)
            });
        match result {
            Ok(()) => debug!(count = questions.len(), "cache mirrored"),
            Err(err) => warn!(path = %self.path.display(), %err, "cache write failed"),
        }
    }
}
