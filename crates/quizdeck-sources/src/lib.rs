//! quizdeck-sources: question sources.
//!
//! Implements the `QuestionSource` trait for local directories and static
//! files served over HTTP, and loads the configuration that picks one.

pub mod config;
pub mod directory;
pub mod error;
pub mod http;
pub mod mock;

pub use config::{create_source, load_config, QuizdeckConfig, SourceConfig};
pub use directory::DirectorySource;
pub use error::SourceError;
pub use http::HttpSource;
