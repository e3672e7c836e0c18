//! Error types for the quizdeck core.
//!
//! `SessionError` covers contract violations by the caller of the session
//! engine. `LoadError` covers everything that can go wrong while turning a
//! manifest and a profile name into a corpus; no partial corpus is ever
//! produced when one is returned.

use thiserror::Error;

use crate::model::QuestionType;

/// An invalid question record.
#[derive(Debug, Error)]
pub enum QuestionError {
    #[error("question id must not be empty")]
    EmptyId,

    #[error("question {id}: needs at least 2 options, found {count}")]
    TooFewOptions { id: String, count: usize },

    #[error("question {id}: correctIndex {index} is out of range for {len} options")]
    CorrectIndexOutOfRange { id: String, index: usize, len: usize },
}

/// Errors returned by the session engine.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The id is not part of the current working set.
    #[error("question not found in working set: {0}")]
    NotFound(String),

    /// The question exists but is of a different type than the operation needs.
    #[error("question {id} is {actual}, expected {expected}")]
    WrongKind {
        id: String,
        expected: QuestionType,
        actual: QuestionType,
    },
}

/// Errors that abort a manifest or profile load.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("unknown profile: {0}")]
    UnknownProfile(String),

    #[error("failed to fetch {file}")]
    Fetch {
        file: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },

    #[error("failed to parse {file}")]
    Parse {
        file: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid manifest {file}")]
    Manifest {
        file: String,
        #[source]
        source: serde_json::Error,
    },
}

impl LoadError {
    /// The resource file this error refers to, if any.
    pub fn file(&self) -> Option<&str> {
        match self {
            LoadError::UnknownProfile(_) => None,
            LoadError::Fetch { file, .. }
            | LoadError::Parse { file, .. }
            | LoadError::Manifest { file, .. } => Some(file),
        }
    }
}
