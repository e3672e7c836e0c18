//! quizdeck-core: question model, loader, and session engine.
//!
//! This crate defines the question data model, parses question files and
//! manifests, loads profiles from a [`traits::QuestionSource`], and drives a
//! quiz through the [`engine::SessionEngine`].

pub mod engine;
pub mod error;
pub mod loader;
pub mod manifest;
pub mod model;
pub mod parser;
pub mod shuffle;
pub mod traits;

pub use engine::{Evaluation, Progress, Selection, SessionEngine};
pub use error::{LoadError, QuestionError, SessionError};
pub use model::{MultipleChoice, Question, QuestionKind, QuestionType};
