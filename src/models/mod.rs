mod question;
mod seed;

pub use question::{Question, ValidationError, DEFAULT_ICON};
pub use seed::seed_questions;
