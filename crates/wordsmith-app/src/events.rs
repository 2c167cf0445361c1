use std::io::Write;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use wordsmith_core::{LoadStatus, QuizSession, WordRecord};

use crate::state::AppState;

pub mod add_word;
pub mod quiz;
pub mod vocabulary;

use add_word::handle_add_word;
use quiz::{handle_quiz_input, start_quiz};
use vocabulary::{handle_clear, handle_list, handle_remove, handle_show};

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Look up a word and add it to the vocabulary
    Add {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
        /// Replace the stored record if the word is already known
        #[arg(long)]
        overwrite: bool,
    },
    /// Show a stored word
    Show {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },
    /// List stored words with their first definition
    List,
    /// Remove a word
    #[command(alias = "delete")]
    Remove {
        #[arg(required = true, num_args = 1..)]
        word: Vec<String>,
    },
    /// Remove every word
    Clear,
    /// Multiple-choice quiz over the stored words
    Quiz,
    /// Interactive shell (default)
    Shell,
    /// Leave the shell
    #[command(alias = "exit")]
    Quit,
}

/// One line typed into the shell
#[derive(Debug, Parser)]
#[command(no_binary_name = true, disable_version_flag = true)]
struct ShellLine {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

/// Line-oriented front end over the app state.
///
/// Outside a quiz every line is a [`Command`]; during a quiz lines are answers.
pub struct Shell {
    state: Arc<AppState>,
    quiz: Option<QuizSession>,
    /// Leave once the running quiz ends
    quit_after_quiz: bool,
}

impl Shell {
    pub fn new(state: Arc<AppState>) -> Self {
        Self {
            state,
            quiz: None,
            quit_after_quiz: false,
        }
    }

    pub fn in_quiz(&self) -> bool {
        self.quiz.is_some()
    }

    pub fn prompt(&self) -> &'static str {
        if self.in_quiz() { "answer> " } else { "> " }
    }

    /// Message about a corrupt or missing store, shown once at start
    pub fn load_notice(&self) -> Option<String> {
        match self.state.store.last_load_status() {
            LoadStatus::Corrupt(reason) => Some(format!(
                "Warning: vocabulary at {} could not be read ({reason}); starting with an empty list",
                self.state.store.location()
            )),
            LoadStatus::Loaded | LoadStatus::Missing => None,
        }
    }

    pub async fn handle_line<W: Write + Send>(&mut self, line: &str, out: &mut W) -> anyhow::Result<Flow> {
        if let Some(session) = self.quiz.as_mut() {
            let finished = handle_quiz_input(session, line, out)?;
            if finished {
                self.quiz = None;
                if self.quit_after_quiz {
                    return Ok(Flow::Quit);
                }
            }
            return Ok(Flow::Continue);
        }

        let line = line.trim();
        if line.is_empty() {
            return Ok(Flow::Continue);
        }

        match ShellLine::try_parse_from(line.split_whitespace()) {
            Ok(parsed) => self.run_command(parsed.command, out).await,
            Err(e) => {
                write!(out, "{}", e.render())?;
                Ok(Flow::Continue)
            }
        }
    }

    pub async fn run_command<W: Write + Send>(&mut self, command: Command, out: &mut W) -> anyhow::Result<Flow> {
        tracing::debug!("Command: {:?}", command);

        match command {
            Command::Add { word, overwrite } => {
                handle_add_word(&self.state, &word.join(" "), overwrite, out).await?;
            }
            Command::Show { word } => handle_show(&self.state, &word.join(" "), out)?,
            Command::List => handle_list(&self.state, out)?,
            Command::Remove { word } => handle_remove(&self.state, &word.join(" "), out)?,
            Command::Clear => handle_clear(&self.state, out)?,
            Command::Quiz => {
                self.quiz = start_quiz(&self.state, out)?;
                if self.quiz.is_none() && self.quit_after_quiz {
                    return Ok(Flow::Quit);
                }
            }
            Command::Shell => writeln!(out, "Already in the shell")?,
            Command::Quit => return Ok(Flow::Quit),
        }

        Ok(Flow::Continue)
    }

    /// Start a quiz and leave the shell when it is over
    pub async fn run_quiz_only<W: Write + Send>(&mut self, out: &mut W) -> anyhow::Result<Flow> {
        self.quit_after_quiz = true;
        self.run_command(Command::Quiz, out).await
    }
}

/// Text block for one stored word
pub fn render_record(record: &WordRecord, image: Option<&std::path::Path>) -> String {
    let mut text = format!("Word: {}\n", record.word());
    text.push_str(&format!("Phonetic: {}\n\n", record.phonetic()));

    text.push_str("Definitions:\n");
    for definition in record.definitions() {
        text.push_str(&format!("- {definition}\n"));
    }

    if !record.examples().is_empty() {
        text.push_str("\nExamples:\n");
        for example in record.examples() {
            text.push_str(&format!("- {example}\n"));
        }
    }

    if !record.synonyms().is_empty() {
        text.push_str(&format!("\nSynonyms: {}\n", record.synonyms().join(", ")));
    }

    if !record.antonyms().is_empty() {
        text.push_str(&format!("Antonyms: {}\n", record.antonyms().join(", ")));
    }

    if let Some(image) = image {
        text.push_str(&format!("Image: {}\n", image.display()));
    }

    text
}
