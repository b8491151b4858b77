//! Shared types and validation rules for the Mars Board question service.
//!
//! Every crate in the workspace agrees on the shape of a [`Question`]
//! through this crate. Input validation lives here as well, so a
//! [`NewQuestion`] that exists is always one the store will accept.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum length of a question subject, in characters.
///
/// Mirrors the `VARCHAR(200)` column declared by the `001_question`
/// migration.
pub const MAX_SUBJECT_CHARS: usize = 200;

/// A persisted question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    /// Store-assigned identifier.
    pub id: i64,
    /// Short title of the question.
    pub subject: String,
    /// Body text.
    pub content: String,
    /// Insertion time (UTC).
    pub create_date: DateTime<Utc>,
}

/// Reasons a question submission is rejected before it reaches the store.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("content must not be empty")]
    EmptyContent,
    #[error("subject must be at most {max} characters, got {actual}")]
    SubjectTooLong { max: usize, actual: usize },
}

/// A validated question that has not been stored yet.
///
/// Fields are private so the only way to obtain one is [`NewQuestion::new`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewQuestion {
    subject: String,
    content: String,
}

impl NewQuestion {
    /// Trims both fields and checks them against the storage rules.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] if either field is blank after trimming,
    /// or if the subject exceeds [`MAX_SUBJECT_CHARS`].
    pub fn new(subject: &str, content: &str) -> Result<Self, ValidationError> {
        let subject = subject.trim();
        let content = content.trim();

        if subject.is_empty() {
            return Err(ValidationError::EmptySubject);
        }
        if content.is_empty() {
            return Err(ValidationError::EmptyContent);
        }

        let subject_chars = subject.chars().count();
        if subject_chars > MAX_SUBJECT_CHARS {
            return Err(ValidationError::SubjectTooLong {
                max: MAX_SUBJECT_CHARS,
                actual: subject_chars,
            });
        }

        Ok(Self {
            subject: subject.to_string(),
            content: content.to_string(),
        })
    }

    /// The trimmed subject.
    pub fn subject(&self) -> &str {
        &self.subject
    }

    /// The trimmed content.
    pub fn content(&self) -> &str {
        &self.content
    }
}
