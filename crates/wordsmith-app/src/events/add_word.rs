use std::io::Write;

use wordsmith_core::{NormalizeError, StoreError, word_key};
use wordsmith_lookup::spawn_image_fetch;

use crate::events::render_record;
use crate::state::AppState;

/// Look up `input`, normalize it and store the record.
///
/// A word that is already stored is shown as-is without calling the lookup
/// service, unless `overwrite` is set.
pub async fn handle_add_word<W: Write + Send>(
    state: &AppState,
    input: &str,
    overwrite: bool,
    out: &mut W,
) -> anyhow::Result<()> {
    let Some(key) = word_key(input) else {
        writeln!(out, "Enter a word to look up")?;
        return Ok(());
    };

    if !overwrite && let Some(record) = state.store.get(&key) {
        write!(out, "{}", render_record(&record, state.image_slots.image(&key).as_deref()))?;
        writeln!(out, "\nThe word '{key}' is already in your vocabulary list!")?;
        return Ok(());
    }

    let response = match state.lookup.lookup(&key).await {
        Ok(response) => response,
        Err(e) => {
            tracing::warn!("Lookup for '{}' failed: {}", key, e);
            writeln!(out, "Lookup failed for '{key}': {e}")?;
            return Ok(());
        }
    };

    let record = match response.into_record(&key) {
        Ok(record) => record,
        Err(NormalizeError::LookupNotFound(_)) => {
            writeln!(out, "Could not find word '{key}'")?;
            return Ok(());
        }
        Err(e @ NormalizeError::MalformedResponse(_)) => {
            tracing::warn!("{}", e);
            writeln!(out, "The dictionary returned an unusable entry for '{key}': {e}")?;
            return Ok(());
        }
    };

    match state.store.upsert(&key, record.clone(), overwrite) {
        Ok(()) => {
            tracing::info!("Added '{}'", key);
        }
        Err(StoreError::AlreadyExists(_)) => {
            // Another lookup for the same word finished first
            writeln!(out, "The word '{key}' is already in your vocabulary list!")?;
            return Ok(());
        }
        Err(e @ StoreError::StorageWriteFailure(_)) => {
            tracing::error!("{}", e);
            write!(out, "{}", render_record(&record, None))?;
            writeln!(out, "\nWarning: {e}")?;
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    }

    write!(out, "{}", render_record(&record, None))?;
    writeln!(out, "\nWords learned: {}", state.store.size())?;

    if let Some(fetcher) = &state.images {
        spawn_image_fetch(
            fetcher.clone(),
            key.clone(),
            state.image_slots.slot(&key),
            state.image_timeout(),
        );
    }

    Ok(())
}
