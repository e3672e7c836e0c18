//! The `quizdeck play` command.
//!
//! A line-oriented front end for the session engine. Each input line is
//! one user action; the session prints the next question after every
//! answer and accepts `:`-prefixed commands to change the view.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};

use quizdeck_core::loader::{LoadOutcome, ProfileLoader};
use quizdeck_core::manifest::Manifest;
use quizdeck_core::{Question, QuestionKind, Selection, SessionEngine};

use super::{open_loader, parse_tag_list};

const HELP: &str = "\
Commands:
  <number>        answer a multiple-choice question
  <enter> or r    reveal the answer of an open-ended question
  :next           skip the current question
  :tags           list tags (selected ones are marked with *)
  :tag NAME       select or deselect a tag
  :clear          clear the tag filter
  :profile NAME   load another profile
  :progress       show progress for the current view
  :help           show this help
  :quit           leave the quiz";

/// One parsed line of user input.
#[derive(Debug, PartialEq, Eq)]
enum Input {
    Answer(String),
    Next,
    Tags,
    Toggle(String),
    Clear,
    Profile(String),
    Progress,
    Help,
    Quit,
    Unknown(String),
}

impl Input {
    /// Answers are trimmed. A command argument is everything after the
    /// first space, kept verbatim so that tags match exactly.
    fn parse(line: &str) -> Self {
        let line = line.trim_end_matches(['\n', '\r']);
        let Some(command) = line.trim_start().strip_prefix(':') else {
            return Input::Answer(line.trim().to_string());
        };

        let (name, arg) = command.split_once(' ').unwrap_or((command.trim_end(), ""));

        match (name, arg) {
            ("next" | "n", _) => Input::Next,
            ("tags", _) => Input::Tags,
            ("tag" | "t", tag) if !tag.is_empty() => Input::Toggle(tag.to_string()),
            ("clear", _) => Input::Clear,
            ("profile" | "p", profile) if !profile.is_empty() => {
                Input::Profile(profile.to_string())
            }
            ("progress", _) => Input::Progress,
            ("help" | "h" | "?", _) => Input::Help,
            ("quit" | "q" | "exit", _) => Input::Quit,
            _ => Input::Unknown(line.trim().to_string()),
        }
    }
}

/// Running totals for the closing summary.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct Tally {
    answered: usize,
    correct: usize,
}

/// Drives a [`SessionEngine`] from a line reader and renders to a writer.
pub struct PlaySession<R, W> {
    engine: SessionEngine,
    loader: ProfileLoader,
    manifest: Manifest,
    profile: String,
    input: R,
    output: W,
    /// Id of the question waiting for an answer.
    pending: Option<String>,
    tally: Tally,
}

impl<R: BufRead, W: Write> PlaySession<R, W> {
    pub fn new(
        engine: SessionEngine,
        loader: ProfileLoader,
        manifest: Manifest,
        profile: String,
        input: R,
        output: W,
    ) -> Self {
        Self {
            engine,
            loader,
            manifest,
            profile,
            input,
            output,
            pending: None,
            tally: Tally::default(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        writeln!(
            self.output,
            "Profile {}: {} questions, {} tags. Type :help for commands.",
            self.profile,
            self.engine.corpus_len(),
            self.engine.tag_universe().len()
        )?;

        self.show_next()?;

        let mut line = String::new();
        loop {
            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                break;
            }

            match Input::parse(&line) {
                Input::Quit => break,
                Input::Answer(text) => self.answer(&text)?,
                Input::Next => {
                    self.pending = None;
                    self.show_next()?;
                }
                Input::Tags => self.print_tags()?,
                Input::Toggle(tag) => {
                    if !self.engine.tag_universe().contains(&tag) {
                        writeln!(self.output, "Note: no question is tagged {tag}.")?;
                    }
                    self.engine.toggle_tag(&tag);
                    self.after_view_change()?;
                }
                Input::Clear => {
                    self.engine.set_filter(Vec::<String>::new());
                    self.after_view_change()?;
                }
                Input::Profile(profile) => self.switch_profile(&profile).await?,
                Input::Progress => self.print_progress()?,
                Input::Help => writeln!(self.output, "{HELP}")?,
                Input::Unknown(text) => {
                    writeln!(self.output, "Unknown command: {text}. Type :help.")?
                }
            }
        }

        let progress = self.engine.progress();
        writeln!(
            self.output,
            "Session over: {} answered, {} correct. Current view: {} of {} answered.",
            self.tally.answered, self.tally.correct, progress.answered, progress.working_set_size
        )?;
        Ok(())
    }

    /// Ask the engine for the next question and render it or the terminal state.
    fn show_next(&mut self) -> Result<()> {
        let size = self.engine.progress().working_set_size;
        let rendered = match self.engine.next_question() {
            Selection::Question(q) => {
                let id = q.id().to_string();
                let text = render_question(q);
                Some((id, text))
            }
            Selection::EmptyWorkingSet => {
                writeln!(self.output, "No questions match the selected tags.")?;
                None
            }
            Selection::AllAnswered => {
                writeln!(self.output, "All questions answered!")?;
                None
            }
        };

        if let Some((id, text)) = rendered {
            let counter = self.engine.progress().display_counter;
            writeln!(self.output, "\nQuestion {counter} of {size}")?;
            write!(self.output, "{text}")?;
            self.pending = Some(id);
        }
        Ok(())
    }

    fn answer(&mut self, text: &str) -> Result<()> {
        let Some(id) = self.pending.clone() else {
            writeln!(
                self.output,
                "No question to answer. Change the view with :tag, :clear or :profile, or :quit."
            )?;
            return Ok(());
        };
        let Some(question) = self.engine.current().cloned() else {
            self.pending = None;
            return self.show_next();
        };

        match question.kind() {
            QuestionKind::MultipleChoice(mc) => {
                let count = mc.options().len();
                let choice = match text.parse::<usize>() {
                    Ok(n) if (1..=count).contains(&n) => n - 1,
                    _ => {
                        writeln!(self.output, "Enter a number between 1 and {count}.")?;
                        return Ok(());
                    }
                };

                let evaluation = self
                    .engine
                    .evaluate_multiple_choice(&id, choice)
                    .inspect_err(|e| tracing::error!("engine rejected answer: {e}"))?;
                self.tally.answered += 1;
                if evaluation.correct {
                    self.tally.correct += 1;
                    writeln!(self.output, "Correct!")?;
                } else {
                    writeln!(
                        self.output,
                        "Incorrect. The answer is {}) {}",
                        evaluation.correct_index + 1,
                        mc.options()[evaluation.correct_index]
                    )?;
                }
                if !evaluation.explanation.is_empty() {
                    writeln!(self.output, "{}", evaluation.explanation)?;
                }
            }
            QuestionKind::OpenEnded { .. } => {
                let answer = self
                    .engine
                    .reveal_answer(&id)
                    .inspect_err(|e| tracing::error!("engine rejected reveal: {e}"))?
                    .to_string();
                self.tally.answered += 1;
                writeln!(self.output, "Answer: {answer}")?;
            }
        }

        self.pending = None;
        self.show_next()
    }

    async fn switch_profile(&mut self, profile: &str) -> Result<()> {
        match self.loader.load_profile(&self.manifest, profile).await {
            Ok(LoadOutcome::Ready(corpus)) => {
                self.engine.load_corpus(corpus);
                self.profile = profile.to_string();
                writeln!(
                    self.output,
                    "Loaded profile {profile} ({} questions).",
                    self.engine.corpus_len()
                )?;
                self.pending = None;
                self.show_next()
            }
            Ok(LoadOutcome::Superseded) => Ok(()),
            Err(e) => {
                tracing::warn!(profile, "profile load failed: {e}");
                writeln!(
                    self.output,
                    "Could not load profile {profile}: {:#}",
                    anyhow::Error::from(e)
                )?;
                Ok(())
            }
        }
    }

    fn after_view_change(&mut self) -> Result<()> {
        let selected = self.engine.selected_tags();
        let filter = if selected.is_empty() {
            "none".to_string()
        } else {
            selected.iter().cloned().collect::<Vec<_>>().join(", ")
        };
        writeln!(
            self.output,
            "Filter: {filter} ({} questions)",
            self.engine.progress().working_set_size
        )?;
        self.pending = None;
        self.show_next()
    }

    fn print_tags(&mut self) -> Result<()> {
        if self.engine.tag_universe().is_empty() {
            writeln!(self.output, "No tags in this profile.")?;
            return Ok(());
        }
        let line = self
            .engine
            .tag_universe()
            .iter()
            .map(|t| {
                if self.engine.selected_tags().contains(t) {
                    format!("*{t}")
                } else {
                    t.clone()
                }
            })
            .collect::<Vec<_>>()
            .join("  ");
        writeln!(self.output, "Tags: {line}")?;
        Ok(())
    }

    fn print_progress(&mut self) -> Result<()> {
        let p = self.engine.progress();
        writeln!(
            self.output,
            "Progress: {} of {} answered, {} remaining, {} shown.",
            p.answered,
            p.working_set_size,
            p.remaining(),
            p.display_counter
        )?;
        Ok(())
    }
}

fn render_question(question: &Question) -> String {
    let mut out = String::new();
    if !question.tags().is_empty() {
        out.push_str(&format!("[{}]\n", question.tags().join(", ")));
    }
    out.push_str(question.prompt());
    out.push('\n');

    match question.kind() {
        QuestionKind::MultipleChoice(mc) => {
            for (i, option) in mc.options().iter().enumerate() {
                out.push_str(&format!("  {}) {option}\n", i + 1));
            }
            out.push_str("> ");
        }
        QuestionKind::OpenEnded { .. } => {
            out.push_str("(press Enter to reveal the answer)\n");
        }
    }
    out
}

pub async fn execute(
    profile: Option<String>,
    tags: Option<String>,
    seed: Option<u64>,
    data_dir: Option<PathBuf>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let (config, loader) = open_loader(config_path.as_deref(), data_dir)?;

    let manifest = loader
        .load_manifest()
        .await
        .with_context(|| format!("failed to load manifest from {} source", loader.source_name()))?;

    let profile = profile.unwrap_or_else(|| config.default_profile.clone());
    let corpus = loader
        .load_profile(&manifest, &profile)
        .await
        .with_context(|| format!("failed to load profile {profile}"))?
        .into_corpus()
        .unwrap_or_default();

    let mut engine = match seed.or(config.seed) {
        Some(seed) => SessionEngine::with_seed(seed),
        None => SessionEngine::new(),
    };
    engine.load_corpus(corpus);
    if let Some(tags) = &tags {
        engine.set_filter(parse_tag_list(tags));
    }

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    let mut session = PlaySession::new(
        engine,
        loader,
        manifest,
        profile,
        stdin.lock(),
        stdout.lock(),
    );
    session.run().await
}
