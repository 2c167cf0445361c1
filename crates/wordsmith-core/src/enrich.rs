use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

/// Write-once image path for a word.
///
/// Filled after the fact by a background fetch, if ever. Readers must treat an
/// empty slot as normal.
#[derive(Debug, Clone, Default)]
pub struct ImageSlot {
    path: Arc<OnceLock<PathBuf>>,
}

impl ImageSlot {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the path, returns false if the slot was already filled
    pub fn fill(&self, path: PathBuf) -> bool {
        self.path.set(path).is_ok()
    }

    pub fn get(&self) -> Option<&Path> {
        self.path.get().map(PathBuf::as_path)
    }
}

/// Image slots by word key. Kept apart from the vocabulary itself.
#[derive(Debug, Default)]
pub struct ImageSlots {
    slots: Mutex<HashMap<String, ImageSlot>>,
}

impl ImageSlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Slot for `word`, created empty on first use
    pub fn slot(&self, word: &str) -> ImageSlot {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(word.to_string())
            .or_default()
            .clone()
    }

    pub fn image(&self, word: &str) -> Option<PathBuf> {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(word)
            .and_then(|slot| slot.get().map(Path::to_path_buf))
    }

    pub fn forget(&self, word: &str) {
        self.slots
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(word);
    }
}
