//! Record keeping error types.
//!
//! Every failure a core operation can report. None of them is fatal: the
//! caller reports the error and carries on with the store unchanged.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::model::Role;

/// Errors returned by store, grading, rating and persistence operations.
#[derive(Debug, Error)]
pub enum RecordsError {
    /// The login name is already used by a teacher or a student.
    #[error("login name already taken: {0}")]
    NameTaken(String),

    /// A subject with this name already exists.
    #[error("subject already exists: {0}")]
    DuplicateSubject(String),

    /// No record of the given kind matches the key.
    #[error("{kind} not found: {key}")]
    NotFound { kind: &'static str, key: String },

    /// The password does not match the account.
    #[error("invalid credentials for {0}")]
    InvalidCredential(String),

    /// The subject does not exist or is taught by someone else.
    #[error("you do not teach subject: {0}")]
    NotOwner(String),

    /// The student is not on the subject's roster.
    #[error("student {student} is not enrolled in {subject}")]
    NotEnrolled { student: u64, subject: String },

    /// The student is already on the subject's roster.
    #[error("student {student} is already enrolled in {subject}")]
    AlreadyEnrolled { student: u64, subject: String },

    /// Malformed or out-of-range input.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Every identifier up to the ceiling has been handed out.
    #[error("identifier sequence exhausted")]
    IdsExhausted,

    /// Reading or writing a backing file failed.
    #[error("persistence failure on {}: {source}", .path.display())]
    Persistence { path: PathBuf, source: io::Error },

    /// An account file failed to load, so saving could clobber it.
    #[error("not saving: {0} accounts failed to load")]
    SaveRefused(Role),
}

impl RecordsError {
    pub(crate) fn not_found(kind: &'static str, key: impl ToString) -> Self {
        RecordsError::NotFound {
            kind,
            key: key.to_string(),
        }
    }

    pub(crate) fn persistence(path: impl Into<PathBuf>, source: io::Error) -> Self {
        RecordsError::Persistence {
            path: path.into(),
            source,
        }
    }

    /// Returns `true` for backing file failures, as opposed to rule violations.
    pub fn is_persistence(&self) -> bool {
        matches!(
            self,
            RecordsError::Persistence { .. } | RecordsError::SaveRefused(_)
        )
    }
}

/// Result alias used throughout the core.
pub type Result<T> = std::result::Result<T, RecordsError>;
