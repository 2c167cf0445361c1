use std::io::Write;

use wordsmith_core::{StoreError, word_key};

use crate::events::render_record;
use crate::state::AppState;

pub fn handle_show<W: Write>(state: &AppState, input: &str, out: &mut W) -> anyhow::Result<()> {
    let Some(key) = word_key(input) else {
        writeln!(out, "Enter a word to show")?;
        return Ok(());
    };

    match state.store.get(&key) {
        Some(record) => write!(
            out,
            "{}",
            render_record(&record, state.image_slots.image(&key).as_deref())
        )?,
        None => writeln!(out, "'{key}' is not in your vocabulary")?,
    }

    Ok(())
}

pub fn handle_list<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    let words = state.store.snapshot();
    if words.is_empty() {
        writeln!(out, "No words learned yet")?;
        return Ok(());
    }

    for (word, record) in &words {
        writeln!(out, "{word} - {}", record.primary_definition())?;
    }
    writeln!(out, "Words learned: {}", words.len())?;

    Ok(())
}

pub fn handle_remove<W: Write>(state: &AppState, input: &str, out: &mut W) -> anyhow::Result<()> {
    let Some(key) = word_key(input) else {
        writeln!(out, "Enter a word to remove")?;
        return Ok(());
    };

    match state.store.remove(&key) {
        Ok(_) => {
            state.image_slots.forget(&key);
            writeln!(out, "Removed '{key}'")?;
        }
        Err(StoreError::NotFound(_)) => writeln!(out, "'{key}' is not in your vocabulary")?,
        Err(e @ StoreError::StorageWriteFailure(_)) => {
            tracing::error!("{}", e);
            state.image_slots.forget(&key);
            writeln!(out, "Removed '{key}', but {e}")?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}

pub fn handle_clear<W: Write>(state: &AppState, out: &mut W) -> anyhow::Result<()> {
    let words = state.store.words();

    let result = state.store.clear();
    for word in &words {
        state.image_slots.forget(word);
    }

    match result {
        Ok(()) => writeln!(out, "Cleared {} words", words.len())?,
        Err(e @ StoreError::StorageWriteFailure(_)) => {
            tracing::error!("{}", e);
            writeln!(out, "Cleared {} words, but {e}", words.len())?;
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
