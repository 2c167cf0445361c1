use std::io::Write;

use wordsmith_core::{QuizError, QuizSession};

use crate::state::AppState;

const STOP_WORDS: [&str; 4] = ["q", "quit", "stop", "exit"];

/// Start a session and print its first question. `None` if it cannot start.
pub fn start_quiz<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<Option<QuizSession>> {
    let mut session = match QuizSession::start(&state.store) {
        Ok(session) => session,
        Err(QuizError::InsufficientVocabulary { available, required }) => {
            writeln!(
                out,
                "Please learn at least {required} words before taking the quiz! ({available} so far)"
            )?;
            return Ok(None);
        }
        Err(e) => return Err(e.into()),
    };

    writeln!(out, "Quiz started. Answer with the option number, 'q' to stop.")?;
    if ask_next(&mut session, out)? {
        return Ok(None);
    }

    Ok(Some(session))
}

/// Feed one typed line to the running quiz. Returns true when the quiz is over.
pub fn handle_quiz_input<W: Write>(session: &mut QuizSession, line: &str, out: &mut W) -> anyhow::Result<bool> {
    let line = line.trim();

    if STOP_WORDS.contains(&line.to_lowercase().as_str()) {
        print_summary(session, out)?;
        return Ok(true);
    }

    let selected = if line.is_empty() {
        None
    } else {
        match line.parse::<usize>() {
            // Options are numbered from 1 on screen
            Ok(n) if n >= 1 => Some(n - 1),
            _ => {
                writeln!(out, "Type an option number, or 'q' to stop")?;
                return Ok(false);
            }
        }
    };

    let feedback = match session.submit_answer(selected) {
        Ok(feedback) => feedback,
        Err(QuizError::NoSelection) => {
            writeln!(out, "Please select an answer!")?;
            return Ok(false);
        }
        Err(QuizError::OptionOutOfRange(_)) => {
            writeln!(out, "Pick one of the listed options")?;
            return Ok(false);
        }
        Err(e) => return Err(e.into()),
    };

    if feedback.is_correct {
        writeln!(out, "✓ Correct!")?;
    } else {
        writeln!(out, "✗ Incorrect! The answer was {}", feedback.correct_index + 1)?;
    }

    writeln!(out, "Definition:")?;
    for definition in &feedback.definitions {
        writeln!(out, " - {definition}")?;
    }
    if !feedback.synonyms.is_empty() {
        writeln!(out, "Synonyms: {}", feedback.synonyms.join(", "))?;
    }
    if !feedback.antonyms.is_empty() {
        writeln!(out, "Antonyms: {}", feedback.antonyms.join(", "))?;
    }

    let score = session.score();
    writeln!(out, "Score: {}/{}\n", score.correct, score.total)?;

    ask_next(session, out)
}

/// Print the next question, or the summary if the pool ran out
fn ask_next<W: Write>(session: &mut QuizSession, out: &mut W) -> anyhow::Result<bool> {
    match session.next_question() {
        Ok(question) => {
            writeln!(out, "{}", question.word())?;
            for (i, option) in question.options().iter().enumerate() {
                writeln!(out, "  {}. {}", i + 1, option)?;
            }
            Ok(false)
        }
        Err(QuizError::InsufficientVocabulary { .. }) => {
            writeln!(out, "Not enough words left to ask about.")?;
            print_summary(session, out)?;
            Ok(true)
        }
        Err(e) => Err(e.into()),
    }
}

fn print_summary<W: Write>(session: &QuizSession, out: &mut W) -> anyhow::Result<()> {
    let score = session.score();
    writeln!(
        out,
        "Quiz over. Score: {}/{} ({:.0}%)",
        score.correct,
        score.total,
        score.accuracy() * 100.0
    )?;
    Ok(())
}
