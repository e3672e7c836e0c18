//! Core data model types for quizdeck.
//!
//! A [`Question`] can only be built through its validating constructors or
//! through deserialization, which runs the same checks. Once built, a
//! multiple-choice question always has at least two options and a
//! `correct_index` that points into them.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::QuestionError;

/// Minimum number of options a multiple-choice question must carry.
pub const MIN_OPTIONS: usize = 2;

/// A single exam-style question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawQuestion", into = "RawQuestion")]
pub struct Question {
    id: String,
    prompt: String,
    tags: Vec<String>,
    kind: QuestionKind,
}

/// The payload that differs between question types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QuestionKind {
    MultipleChoice(MultipleChoice),
    OpenEnded { answer: String },
}

/// Options and answer key of a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MultipleChoice {
    pub(crate) options: Vec<String>,
    pub(crate) correct_index: usize,
    pub(crate) explanation: Option<String>,
}

impl MultipleChoice {
    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    /// The text of the correct option.
    pub fn correct_option(&self) -> &str {
        &self.options[self.correct_index]
    }

    pub fn explanation(&self) -> Option<&str> {
        self.explanation.as_deref()
    }
}

impl Question {
    /// Build a validated multiple-choice question.
    pub fn multiple_choice(
        id: impl Into<String>,
        prompt: impl Into<String>,
        options: Vec<String>,
        correct_index: usize,
        explanation: Option<String>,
        tags: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }
        if options.len() < MIN_OPTIONS {
            return Err(QuestionError::TooFewOptions {
                id,
                count: options.len(),
            });
        }
        if correct_index >= options.len() {
            return Err(QuestionError::CorrectIndexOutOfRange {
                id,
                index: correct_index,
                len: options.len(),
            });
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            tags: dedup_tags(tags),
            kind: QuestionKind::MultipleChoice(MultipleChoice {
                options,
                correct_index,
                explanation,
            }),
        })
    }

    /// Build a validated open-ended question.
    pub fn open_ended(
        id: impl Into<String>,
        prompt: impl Into<String>,
        answer: impl Into<String>,
        tags: Vec<String>,
    ) -> Result<Self, QuestionError> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(QuestionError::EmptyId);
        }

        Ok(Self {
            id,
            prompt: prompt.into(),
            tags: dedup_tags(tags),
            kind: QuestionKind::OpenEnded {
                answer: answer.into(),
            },
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn prompt(&self) -> &str {
        &self.prompt
    }

    /// Tags in file order, without duplicates.
    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn kind(&self) -> &QuestionKind {
        &self.kind
    }

    pub fn question_type(&self) -> QuestionType {
        match self.kind {
            QuestionKind::MultipleChoice(_) => QuestionType::MultipleChoice,
            QuestionKind::OpenEnded { .. } => QuestionType::OpenEnded,
        }
    }

    pub fn as_multiple_choice(&self) -> Option<&MultipleChoice> {
        match &self.kind {
            QuestionKind::MultipleChoice(mc) => Some(mc),
            QuestionKind::OpenEnded { .. } => None,
        }
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

fn dedup_tags(tags: Vec<String>) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(tags.len());
    for tag in tags {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

/// The two supported question types, named as they appear on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QuestionType {
    MultipleChoice,
    OpenEnded,
}

impl fmt::Display for QuestionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuestionType::MultipleChoice => write!(f, "multiple-choice"),
            QuestionType::OpenEnded => write!(f, "open-ended"),
        }
    }
}

impl FromStr for QuestionType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "multiple-choice" => Ok(QuestionType::MultipleChoice),
            "open-ended" => Ok(QuestionType::OpenEnded),
            other => Err(format!("unknown question type: {other}")),
        }
    }
}

/// Wire representation of a question record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
enum RawQuestion {
    MultipleChoice {
        id: String,
        question: String,
        options: Vec<String>,
        #[serde(rename = "correctIndex")]
        correct_index: usize,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        explanation: Option<String>,
        #[serde(default)]
        tags: Vec<String>,
    },
    OpenEnded {
        id: String,
        question: String,
        answer: String,
        #[serde(default)]
        tags: Vec<String>,
    },
}

impl TryFrom<RawQuestion> for Question {
    type Error = QuestionError;

    fn try_from(raw: RawQuestion) -> Result<Self, Self::Error> {
        match raw {
            RawQuestion::MultipleChoice {
                id,
                question,
                options,
                correct_index,
                explanation,
                tags,
            } => Question::multiple_choice(id, question, options, correct_index, explanation, tags),
            RawQuestion::OpenEnded {
                id,
                question,
                answer,
                tags,
            } => Question::open_ended(id, question, answer, tags),
        }
    }
}

impl From<Question> for RawQuestion {
    fn from(q: Question) -> Self {
        match q.kind {
            QuestionKind::MultipleChoice(mc) => RawQuestion::MultipleChoice {
                id: q.id,
                question: q.prompt,
                options: mc.options,
                correct_index: mc.correct_index,
                explanation: mc.explanation,
                tags: q.tags,
            },
            QuestionKind::OpenEnded { answer } => RawQuestion::OpenEnded {
                id: q.id,
                question: q.prompt,
                answer,
                tags: q.tags,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("option {i}")).collect()
    }

    #[test]
    fn question_type_display_and_parse() {
        assert_eq!(QuestionType::MultipleChoice.to_string(), "multiple-choice");
        assert_eq!(QuestionType::OpenEnded.to_string(), "open-ended");
        assert_eq!(
            "open-ended".parse::<QuestionType>().unwrap(),
            QuestionType::OpenEnded
        );
        assert!("essay".parse::<QuestionType>().is_err());
    }

    #[test]
    fn multiple_choice_rejects_bad_answer_key() {
        let err = Question::multiple_choice("q1", "?", options(4), 4, None, vec![]).unwrap_err();
        assert!(matches!(
            err,
            QuestionError::CorrectIndexOutOfRange { index: 4, len: 4, .. }
        ));

        let err = Question::multiple_choice("q1", "?", options(1), 0, None, vec![]).unwrap_err();
        assert!(matches!(err, QuestionError::TooFewOptions { count: 1, .. }));
    }

    #[test]
    fn empty_id_is_rejected() {
        assert!(matches!(
            Question::open_ended("  ", "?", "a", vec![]),
            Err(QuestionError::EmptyId)
        ));
    }

    #[test]
    fn tags_are_deduplicated_in_order() {
        let q = Question::open_ended(
            "q",
            "?",
            "a",
            vec!["S3".into(), "EC2".into(), "S3".into()],
        )
        .unwrap();
        assert_eq!(q.tags(), ["S3", "EC2"]);
        assert!(q.has_tag("EC2"));
        assert!(!q.has_tag("ec2"));
    }

    #[test]
    fn deserialize_wire_format() {
        let json = r#"{
            "id": "q1",
            "type": "multiple-choice",
            "question": "Which service offers object storage?",
            "options": ["EC2", "S3", "RDS"],
            "correctIndex": 1,
            "explanation": "S3 is object storage.",
            "tags": ["S3"]
        }"#;
        let q: Question = serde_json::from_str(json).unwrap();
        assert_eq!(q.question_type(), QuestionType::MultipleChoice);
        let mc = q.as_multiple_choice().unwrap();
        assert_eq!(mc.correct_option(), "S3");
        assert_eq!(mc.explanation(), Some("S3 is object storage."));
    }

    #[test]
    fn deserialize_runs_validation() {
        let json = r#"{
            "id": "q1", "type": "multiple-choice", "question": "?",
            "options": ["a", "b"], "correctIndex": 2, "tags": []
        }"#;
        let err = serde_json::from_str::<Question>(json).unwrap_err();
        assert!(err.to_string().contains("correctIndex 2"));
    }

    #[test]
    fn serialize_uses_wire_names() {
        let q = Question::open_ended("q2", "What is S3?", "Object storage", vec!["S3".into()])
            .unwrap();
        let value = serde_json::to_value(&q).unwrap();
        assert_eq!(value["type"], "open-ended");
        assert_eq!(value["question"], "What is S3?");
        assert_eq!(value["answer"], "Object storage");
    }
}
