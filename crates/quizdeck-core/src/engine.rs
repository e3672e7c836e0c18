//! The question session engine.
//!
//! Owns the corpus, the active tag filter, the answered set, and the
//! next-question policy. A front end drives it one user action at a time
//! and renders what it returns; the engine itself does no I/O.

use std::collections::{BTreeSet, HashMap, HashSet};

use rand::rngs::StdRng;
use rand::seq::IndexedRandom;
use rand::SeedableRng;

use crate::error::SessionError;
use crate::model::{Question, QuestionKind, QuestionType};

/// Outcome of [`SessionEngine::next_question`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection<'a> {
    /// An unanswered question from the working set, now under the cursor.
    Question(&'a Question),
    /// The current filter matches no questions.
    EmptyWorkingSet,
    /// Every question in the working set has been answered.
    AllAnswered,
}

impl<'a> Selection<'a> {
    pub fn question(self) -> Option<&'a Question> {
        match self {
            Selection::Question(q) => Some(q),
            _ => None,
        }
    }
}

/// Result of answering a multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Evaluation {
    pub correct: bool,
    /// Index of the correct option, for highlighting.
    pub correct_index: usize,
    /// Explanation text; empty when the question has none.
    pub explanation: String,
}

/// Progress through the current filter view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Progress {
    pub working_set_size: usize,
    pub answered: usize,
    /// Number of questions shown since the view was created ("Question N").
    pub display_counter: usize,
}

impl Progress {
    pub fn remaining(&self) -> usize {
        self.working_set_size - self.answered
    }

    pub fn is_complete(&self) -> bool {
        self.working_set_size > 0 && self.answered == self.working_set_size
    }
}

/// In-memory quiz session state.
pub struct SessionEngine {
    corpus: Vec<Question>,
    by_id: HashMap<String, usize>,
    tag_universe: BTreeSet<String>,
    selected: BTreeSet<String>,
    /// Corpus indices of the working set, in corpus order.
    working: Vec<usize>,
    in_working: Vec<bool>,
    answered: HashSet<String>,
    cursor: Option<usize>,
    display_counter: usize,
    rng: StdRng,
}

impl Default for SessionEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionEngine {
    /// An empty engine whose selection is seeded from the OS.
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_os_rng())
    }

    /// An empty engine with reproducible selection order.
    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self {
            corpus: Vec::new(),
            by_id: HashMap::new(),
            tag_universe: BTreeSet::new(),
            selected: BTreeSet::new(),
            working: Vec::new(),
            in_working: Vec::new(),
            answered: HashSet::new(),
            cursor: None,
            display_counter: 0,
            rng,
        }
    }

    /// Replace the corpus wholesale and reset every piece of session state.
    ///
    /// Later duplicates of an id are dropped so that answered-set
    /// bookkeeping by id stays unambiguous.
    pub fn load_corpus(&mut self, questions: Vec<Question>) {
        let mut by_id = HashMap::with_capacity(questions.len());
        let mut corpus = Vec::with_capacity(questions.len());

        for question in questions {
            if by_id.contains_key(question.id()) {
                tracing::warn!(id = question.id(), "dropping question with duplicate id");
                continue;
            }
            by_id.insert(question.id().to_string(), corpus.len());
            corpus.push(question);
        }

        self.tag_universe = corpus
            .iter()
            .flat_map(|q| q.tags().iter().cloned())
            .collect();
        self.corpus = corpus;
        self.by_id = by_id;
        self.selected.clear();
        self.rebuild_working_set();

        tracing::debug!(
            questions = self.corpus.len(),
            tags = self.tag_universe.len(),
            "corpus loaded"
        );
    }

    /// Replace the selected-tag set. A question qualifies when it carries
    /// any of the selected tags; an empty set selects the whole corpus.
    ///
    /// Progress on the previous view is discarded.
    pub fn set_filter<I, S>(&mut self, tags: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selected = tags.into_iter().map(Into::into).collect();
        self.rebuild_working_set();

        tracing::debug!(
            selected = ?self.selected,
            working_set = self.working.len(),
            "filter changed"
        );
    }

    /// Flip membership of `tag` in the filter.
    pub fn toggle_tag(&mut self, tag: &str) {
        let mut tags = self.selected.clone();
        if !tags.remove(tag) {
            tags.insert(tag.to_string());
        }
        self.set_filter(tags);
    }

    fn rebuild_working_set(&mut self) {
        self.working = self
            .corpus
            .iter()
            .enumerate()
            .filter(|(_, q)| matches_filter(q, &self.selected))
            .map(|(i, _)| i)
            .collect();

        self.in_working = vec![false; self.corpus.len()];
        for &i in &self.working {
            self.in_working[i] = true;
        }

        self.answered.clear();
        self.cursor = None;
        self.display_counter = 0;
    }

    /// Pick an unanswered question uniformly at random and put it under
    /// the cursor.
    pub fn next_question(&mut self) -> Selection<'_> {
        if self.working.is_empty() {
            return Selection::EmptyWorkingSet;
        }

        let unanswered: Vec<usize> = self
            .working
            .iter()
            .copied()
            .filter(|&i| !self.answered.contains(self.corpus[i].id()))
            .collect();

        let Some(&pick) = unanswered.choose(&mut self.rng) else {
            self.cursor = None;
            return Selection::AllAnswered;
        };

        self.cursor = Some(pick);
        self.display_counter += 1;
        tracing::trace!(id = self.corpus[pick].id(), "question selected");
        Selection::Question(&self.corpus[pick])
    }

    /// Mark a working-set question as answered. Answering twice is a no-op.
    pub fn record_answer(&mut self, question_id: &str) -> Result<(), SessionError> {
        self.working_index(question_id)?;
        self.answered.insert(question_id.to_string());
        Ok(())
    }

    /// Grade a multiple-choice answer and mark the question answered.
    ///
    /// An index past the last option is graded as incorrect.
    pub fn evaluate_multiple_choice(
        &mut self,
        question_id: &str,
        selected_index: usize,
    ) -> Result<Evaluation, SessionError> {
        let idx = self.working_index(question_id)?;
        let question = &self.corpus[idx];
        let QuestionKind::MultipleChoice(mc) = question.kind() else {
            return Err(SessionError::WrongKind {
                id: question_id.to_string(),
                expected: QuestionType::MultipleChoice,
                actual: question.question_type(),
            });
        };

        let evaluation = Evaluation {
            correct: selected_index == mc.correct_index(),
            correct_index: mc.correct_index(),
            explanation: mc.explanation().unwrap_or_default().to_string(),
        };
        self.answered.insert(question_id.to_string());
        Ok(evaluation)
    }

    /// Reveal the answer of an open-ended question and mark it answered.
    pub fn reveal_answer(&mut self, question_id: &str) -> Result<&str, SessionError> {
        let idx = self.working_index(question_id)?;
        let question = &self.corpus[idx];
        let QuestionKind::OpenEnded { answer } = question.kind() else {
            return Err(SessionError::WrongKind {
                id: question_id.to_string(),
                expected: QuestionType::OpenEnded,
                actual: question.question_type(),
            });
        };

        self.answered.insert(question_id.to_string());
        Ok(answer)
    }

    pub fn progress(&self) -> Progress {
        Progress {
            working_set_size: self.working.len(),
            answered: self.answered.len(),
            display_counter: self.display_counter,
        }
    }

    /// Every distinct tag in the corpus, sorted.
    pub fn tag_universe(&self) -> &BTreeSet<String> {
        &self.tag_universe
    }

    pub fn selected_tags(&self) -> &BTreeSet<String> {
        &self.selected
    }

    /// The question under the cursor, if one has been selected in this view.
    pub fn current(&self) -> Option<&Question> {
        self.cursor.map(|i| &self.corpus[i])
    }

    pub fn working_set(&self) -> impl Iterator<Item = &Question> + '_ {
        self.working.iter().map(|&i| &self.corpus[i])
    }

    pub fn corpus_len(&self) -> usize {
        self.corpus.len()
    }

    pub fn is_answered(&self, question_id: &str) -> bool {
        self.answered.contains(question_id)
    }

    fn working_index(&self, question_id: &str) -> Result<usize, SessionError> {
        self.by_id
            .get(question_id)
            .copied()
            .filter(|&i| self.in_working[i])
            .ok_or_else(|| SessionError::NotFound(question_id.to_string()))
    }
}

/// Whether `question` belongs to the view selected by `selected`.
///
/// Tags match exactly and case-sensitively; any shared tag is enough.
pub fn matches_filter(question: &Question, selected: &BTreeSet<String>) -> bool {
    selected.is_empty() || question.tags().iter().any(|t| selected.contains(t))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn mc(id: &str, tags: &[&str], correct_index: usize) -> Question {
        Question::multiple_choice(
            id,
            format!("prompt {id}"),
            vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_index,
            Some(format!("because {id}")),
            tags.iter().map(|t| t.to_string()).collect(),
        )
        .unwrap()
    }

    fn open(id: &str, tags: &[&str]) -> Question {
        Question::open_ended(
            id,
            format!("prompt {id}"),
            format!("answer {id}"),
            tags.iter().map(|t| t.to_string()).collect(),
        )
        .unwrap()
    }

    fn mixed_corpus() -> Vec<Question> {
        vec![
            mc("ec2-only", &["EC2"], 0),
            open("s3-only", &["S3"]),
            mc("both", &["EC2", "S3"], 2),
            open("neither", &["IAM"]),
            open("untagged", &[]),
        ]
    }

    fn working_ids(engine: &SessionEngine) -> Vec<String> {
        engine.working_set().map(|q| q.id().to_string()).collect()
    }

    fn drain(engine: &mut SessionEngine) -> Vec<String> {
        let mut seen = Vec::new();
        loop {
            let id = match engine.next_question() {
                Selection::Question(q) => q.id().to_string(),
                Selection::AllAnswered => break,
                Selection::EmptyWorkingSet => panic!("working set unexpectedly empty"),
            };
            engine.record_answer(&id).unwrap();
            seen.push(id);
        }
        seen
    }

    #[test]
    fn load_resets_progress() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        let p = engine.progress();
        assert_eq!(p.working_set_size, 5);
        assert_eq!(p.answered, 0);
        assert_eq!(p.display_counter, 0);
        assert!(engine.selected_tags().is_empty());
        assert!(engine.current().is_none());
    }

    #[test]
    fn reload_clears_filter_and_answers() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["EC2"]);
        engine.record_answer("ec2-only").unwrap();

        engine.load_corpus(vec![open("fresh", &["S3"])]);
        assert!(engine.selected_tags().is_empty());
        assert_eq!(engine.progress().answered, 0);
        assert_eq!(engine.tag_universe().iter().collect::<Vec<_>>(), ["S3"]);
        assert!(!engine.is_answered("ec2-only"));
    }

    #[test]
    fn tag_universe_is_sorted_and_distinct() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        let tags: Vec<&str> = engine.tag_universe().iter().map(String::as_str).collect();
        assert_eq!(tags, ["EC2", "IAM", "S3"]);
    }

    #[test]
    fn single_tag_filter() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["EC2"]);
        assert_eq!(working_ids(&engine), ["ec2-only", "both"]);
    }

    #[test]
    fn multi_tag_filter_is_a_union() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["EC2", "S3"]);
        assert_eq!(working_ids(&engine), ["ec2-only", "s3-only", "both"]);
    }

    #[test]
    fn empty_filter_restores_full_corpus() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["IAM"]);
        assert_eq!(engine.progress().working_set_size, 1);
        engine.set_filter(Vec::<String>::new());
        assert_eq!(engine.progress().working_set_size, engine.corpus_len());
    }

    #[test]
    fn tag_matching_is_case_sensitive() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["ec2"]);
        assert_eq!(engine.progress().working_set_size, 0);
        assert_eq!(engine.next_question(), Selection::EmptyWorkingSet);
    }

    #[test]
    fn filter_change_forfeits_progress() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.next_question();
        engine.record_answer("both").unwrap();
        assert_eq!(engine.progress().answered, 1);

        engine.set_filter(["EC2"]);
        let p = engine.progress();
        assert_eq!(p.answered, 0);
        assert_eq!(p.display_counter, 0);
        assert!(engine.current().is_none());
    }

    #[test]
    fn toggle_tag_adds_and_removes() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.toggle_tag("S3");
        engine.toggle_tag("IAM");
        assert_eq!(working_ids(&engine), ["s3-only", "both", "neither"]);
        engine.toggle_tag("S3");
        assert_eq!(working_ids(&engine), ["neither"]);
        engine.toggle_tag("IAM");
        assert_eq!(engine.progress().working_set_size, 5);
    }

    #[test]
    fn draining_visits_every_question_once() {
        let mut engine = SessionEngine::with_seed(7);
        engine.load_corpus(mixed_corpus());
        let mut seen = drain(&mut engine);
        assert_eq!(seen.len(), 5);
        seen.sort();
        seen.dedup();
        assert_eq!(seen.len(), 5);

        let p = engine.progress();
        assert_eq!(p.display_counter, 5);
        assert!(p.is_complete());
        assert_eq!(p.remaining(), 0);
    }

    #[test]
    fn draining_respects_filter() {
        let mut engine = SessionEngine::with_seed(3);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["S3"]);
        let mut seen = drain(&mut engine);
        seen.sort();
        assert_eq!(seen, ["both", "s3-only"]);
    }

    #[test]
    fn unanswered_question_can_be_drawn_again() {
        let mut engine = SessionEngine::with_seed(11);
        engine.load_corpus(vec![open("solo", &["S3"])]);
        for n in 1..=3 {
            let q = engine.next_question().question().unwrap();
            assert_eq!(q.id(), "solo");
            assert_eq!(engine.progress().display_counter, n);
        }
    }

    #[test]
    fn empty_corpus_reports_empty_working_set() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(vec![]);
        assert_eq!(engine.next_question(), Selection::EmptyWorkingSet);
        assert_eq!(engine.progress(), Progress::default());
    }

    #[test]
    fn next_question_sets_cursor() {
        let mut engine = SessionEngine::with_seed(5);
        engine.load_corpus(mixed_corpus());
        let id = engine.next_question().question().unwrap().id().to_string();
        assert_eq!(engine.current().map(Question::id), Some(id.as_str()));
    }

    #[test]
    fn evaluate_correct_answer() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        let eval = engine.evaluate_multiple_choice("both", 2).unwrap();
        assert!(eval.correct);
        assert_eq!(eval.correct_index, 2);
        assert_eq!(eval.explanation, "because both");
        assert!(engine.is_answered("both"));
    }

    #[test]
    fn evaluate_wrong_answer_still_marks_answered() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        let eval = engine.evaluate_multiple_choice("both", 0).unwrap();
        assert!(!eval.correct);
        assert_eq!(eval.correct_index, 2);
        assert_eq!(engine.progress().answered, 1);
    }

    #[test]
    fn evaluate_out_of_range_index_is_incorrect() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        let eval = engine.evaluate_multiple_choice("ec2-only", 99).unwrap();
        assert!(!eval.correct);
        assert_eq!(eval.correct_index, 0);
    }

    #[test]
    fn evaluate_missing_explanation_is_empty() {
        let q = Question::multiple_choice("bare", "?", vec!["x".into(), "y".into()], 1, None, vec![])
            .unwrap();
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(vec![q]);
        let eval = engine.evaluate_multiple_choice("bare", 1).unwrap();
        assert!(eval.explanation.is_empty());
    }

    #[test]
    fn evaluate_contract_violations() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["EC2"]);

        let err = engine.evaluate_multiple_choice("s3-only", 0).unwrap_err();
        assert!(matches!(err, SessionError::NotFound(id) if id == "s3-only"));

        engine.set_filter(["S3"]);
        let err = engine.evaluate_multiple_choice("s3-only", 0).unwrap_err();
        assert!(matches!(
            err,
            SessionError::WrongKind {
                expected: QuestionType::MultipleChoice,
                actual: QuestionType::OpenEnded,
                ..
            }
        ));
        assert_eq!(engine.progress().answered, 0);
    }

    #[test]
    fn record_answer_is_idempotent() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.record_answer("neither").unwrap();
        engine.record_answer("neither").unwrap();
        assert_eq!(engine.progress().answered, 1);
    }

    #[test]
    fn record_answer_outside_working_set_fails() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        engine.set_filter(["IAM"]);
        assert!(matches!(
            engine.record_answer("both"),
            Err(SessionError::NotFound(_))
        ));
        assert!(engine.record_answer("nope").is_err());
        assert_eq!(engine.progress().answered, 0);
    }

    #[test]
    fn reveal_answer_for_open_ended() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(mixed_corpus());
        assert_eq!(engine.reveal_answer("s3-only").unwrap(), "answer s3-only");
        assert!(engine.is_answered("s3-only"));
        assert!(matches!(
            engine.reveal_answer("both"),
            Err(SessionError::WrongKind { .. })
        ));
    }

    #[test]
    fn duplicate_ids_keep_first() {
        let mut engine = SessionEngine::with_seed(1);
        engine.load_corpus(vec![mc("dup", &["EC2"], 1), open("dup", &["S3"])]);
        assert_eq!(engine.corpus_len(), 1);
        assert!(!engine.tag_universe().contains("S3"));
        assert!(engine.evaluate_multiple_choice("dup", 1).unwrap().correct);
    }

    #[test]
    fn example_scenario() {
        let q1 = mc("q1", &["EC2"], 1);
        let q2 = open("q2", &["S3"]);
        let mut engine = SessionEngine::with_seed(42);
        engine.load_corpus(vec![q1, q2]);

        engine.set_filter(["EC2"]);
        assert_eq!(working_ids(&engine), ["q1"]);

        let picked = engine.next_question().question().map(|q| q.id().to_string());
        assert_eq!(picked.as_deref(), Some("q1"));

        let eval = engine.evaluate_multiple_choice("q1", 0).unwrap();
        assert!(!eval.correct);
        assert_eq!(eval.correct_index, 1);

        assert_eq!(engine.next_question(), Selection::AllAnswered);
        assert!(engine.current().is_none());
    }

    fn draw_counts(engine: &mut SessionEngine, draws: usize) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for _ in 0..draws {
            let id = engine.next_question().question().unwrap().id().to_string();
            *counts.entry(id).or_insert(0) += 1;
        }
        counts
    }

    fn assert_balanced(counts: &HashMap<String, usize>, ids: &[&str], draws: usize) {
        let expected = draws as f64 / ids.len() as f64;
        for id in ids {
            let n = counts.get(*id).copied().unwrap_or(0) as f64;
            assert!(
                (n - expected).abs() < expected * 0.1,
                "{id} drawn {n} times, expected about {expected}"
            );
        }
    }

    #[test]
    fn selection_is_uniform_over_unanswered() {
        for seed in [1, 7, 99] {
            let mut engine = SessionEngine::with_seed(seed);
            engine.load_corpus(vec![
                open("a", &["EC2"]),
                open("b", &["EC2"]),
                open("c", &["S3"]),
                open("d", &["S3"]),
            ]);

            let counts = draw_counts(&mut engine, 8000);
            assert_eq!(counts.len(), 4);
            assert_balanced(&counts, &["a", "b", "c", "d"], 8000);
        }
    }

    #[test]
    fn selection_skips_answered_and_stays_uniform() {
        for seed in [2, 13, 77] {
            let mut engine = SessionEngine::with_seed(seed);
            engine.load_corpus(vec![
                open("a", &[]),
                open("b", &[]),
                open("c", &[]),
                open("d", &[]),
            ]);
            engine.record_answer("b").unwrap();

            let counts = draw_counts(&mut engine, 6000);
            assert!(!counts.contains_key("b"));
            assert_eq!(counts.len(), 3);
            assert_balanced(&counts, &["a", "c", "d"], 6000);
        }
    }
}
