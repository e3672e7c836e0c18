//! Multiple-choice option shuffling.
//!
//! Question files tend to accumulate a bias toward one answer position.
//! Shuffling permutes the options and moves `correctIndex` along with the
//! correct option text. Records are rewritten as raw JSON objects so that
//! fields outside the question schema and the original key order survive.

use anyhow::Result;
use rand::seq::SliceRandom;
use rand::Rng;
use serde_json::Value;

use crate::model::QuestionType;
use crate::parser::{parse_questions_str, to_json_pretty};

/// Counts reported by [`shuffle_records`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ShuffleStats {
    pub total: usize,
    pub multiple_choice: usize,
    pub shuffled: usize,
}

fn is_multiple_choice(record: &Value) -> bool {
    record
        .get("type")
        .and_then(Value::as_str)
        .and_then(|t| t.parse::<QuestionType>().ok())
        == Some(QuestionType::MultipleChoice)
}

/// Shuffle the options of one multiple-choice record in place.
///
/// Only `options` and `correctIndex` change. Returns `false` and leaves the
/// record untouched if it is not a well-formed multiple-choice record.
pub fn shuffle_record<R: Rng + ?Sized>(record: &mut Value, rng: &mut R) -> bool {
    if !is_multiple_choice(record) {
        return false;
    }
    let Some(obj) = record.as_object_mut() else {
        return false;
    };
    let Some(correct) = obj.get("correctIndex").and_then(Value::as_u64) else {
        return false;
    };
    let Some(Value::Array(options)) = obj.get_mut("options") else {
        return false;
    };

    let mut order: Vec<usize> = (0..options.len()).collect();
    order.shuffle(rng);

    let mut old = std::mem::take(options);
    let mut correct_index = 0;
    for (new_index, &old_index) in order.iter().enumerate() {
        if old_index as u64 == correct {
            correct_index = new_index;
        }
        options.push(std::mem::take(&mut old[old_index]));
    }

    obj.insert("correctIndex".to_string(), Value::from(correct_index));
    true
}

/// Shuffle every multiple-choice record in `records`.
pub fn shuffle_records<R: Rng + ?Sized>(records: &mut [Value], rng: &mut R) -> ShuffleStats {
    let mut stats = ShuffleStats {
        total: records.len(),
        ..Default::default()
    };

    for record in records.iter_mut() {
        if is_multiple_choice(record) {
            stats.multiple_choice += 1;
            if shuffle_record(record, rng) {
                stats.shuffled += 1;
            }
        }
    }

    stats
}

/// Shuffle the contents of a question file and return the rewritten text.
///
/// The content must parse as a valid question file first; nothing is
/// shuffled otherwise. `source` names the file in errors.
pub fn shuffle_questions_json<R: Rng + ?Sized>(
    content: &str,
    source: &str,
    rng: &mut R,
) -> Result<(String, ShuffleStats)> {
    parse_questions_str(content, source)?;

    let mut records: Vec<Value> = serde_json::from_str(content)?;
    let stats = shuffle_records(&mut records, rng);
    Ok((to_json_pretty(&records)?, stats))
}
