use std::collections::HashSet;
use std::sync::{Condvar, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use indexmap::IndexMap;

use crate::backend::StoreBackend;
use crate::error::StoreError;
use crate::preprocess::{is_key, word_key};
use crate::record::{StoredRecord, WordRecord};

/// Word key → record, in insertion order
pub type Vocabulary = IndexMap<String, WordRecord>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    Loaded,
    /// Nothing stored yet
    Missing,
    /// Unreadable or unparsable, recovered as an empty vocabulary
    Corrupt(String),
}

#[derive(Debug)]
pub struct LoadOutcome {
    pub words: Vocabulary,
    pub status: LoadStatus,
}

impl LoadOutcome {
    fn corrupt(location: &str, reason: String) -> Self {
        tracing::warn!(
            "{}",
            StoreError::StorageCorrupt(format!("{location}: {reason}"))
        );
        Self {
            words: Vocabulary::new(),
            status: LoadStatus::Corrupt(reason),
        }
    }
}

/// Persistent vocabulary. Every successful mutation is written through.
pub struct VocabularyStore {
    backend: Box<dyn StoreBackend>,
    words: RwLock<Vocabulary>,
    in_flight: Mutex<HashSet<String>>,
    released: Condvar,
    // Serializes backend writes
    persist_lock: Mutex<()>,
    load_status: LoadStatus,
}

impl VocabularyStore {
    /// Load the backing resource once and wrap it
    pub fn open(backend: impl StoreBackend + 'static) -> Self {
        let LoadOutcome { words, status } = Self::load(&backend);

        Self {
            backend: Box::new(backend),
            words: RwLock::new(words),
            in_flight: Mutex::new(HashSet::new()),
            released: Condvar::new(),
            persist_lock: Mutex::new(()),
            load_status: status,
        }
    }

    /// Read a backend. Never fails: corrupt content yields an empty vocabulary.
    pub fn load(backend: &dyn StoreBackend) -> LoadOutcome {
        let location = backend.describe();

        let contents = match backend.read() {
            Ok(Some(contents)) => contents,
            Ok(None) => {
                tracing::info!("No vocabulary at {}, starting empty", location);
                return LoadOutcome {
                    words: Vocabulary::new(),
                    status: LoadStatus::Missing,
                };
            }
            Err(e) => return LoadOutcome::corrupt(&location, e.to_string()),
        };

        let stored: IndexMap<String, StoredRecord> = match serde_json::from_str(&contents) {
            Ok(stored) => stored,
            Err(e) => return LoadOutcome::corrupt(&location, e.to_string()),
        };

        let mut words = Vocabulary::with_capacity(stored.len());
        for (key, record) in stored {
            if !is_key(&key) {
                tracing::warn!("Dropping stored entry with invalid key {:?}", key);
                continue;
            }
            match record.into_record(&key) {
                Ok(record) => {
                    words.insert(key, record);
                }
                Err(e) => tracing::warn!("Dropping stored entry '{}': {}", key, e),
            }
        }

        tracing::info!("Loaded {} words from {}", words.len(), location);
        LoadOutcome {
            words,
            status: LoadStatus::Loaded,
        }
    }

    /// Serialize `words` and replace the backing resource in one step
    pub fn save(&self, words: &Vocabulary) -> Result<(), StoreError> {
        let _guard = lock(&self.persist_lock);
        self.write(words)
    }

    /// Insert `record` under `word`.
    ///
    /// Fails with [`StoreError::AlreadyExists`] when the word is present and
    /// `overwrite` is false. Concurrent upserts for the same key run one at a time.
    pub fn upsert(&self, word: &str, record: WordRecord, overwrite: bool) -> Result<(), StoreError> {
        let key = word_key(word).ok_or_else(|| StoreError::InvalidKey(word.to_string()))?;
        if record.word() != key {
            return Err(StoreError::InvalidKey(format!(
                "record for '{}' stored under '{}'",
                record.word(),
                key
            )));
        }

        let _claim = self.claim(&key);

        {
            let mut words = write(&self.words);
            if !overwrite && words.contains_key(&key) {
                return Err(StoreError::AlreadyExists(key));
            }
            words.insert(key.clone(), record);
        }

        tracing::debug!("Upserted '{}'", key);
        self.persist()
    }

    pub fn remove(&self, word: &str) -> Result<WordRecord, StoreError> {
        let key = word_key(word).ok_or_else(|| StoreError::InvalidKey(word.to_string()))?;

        let removed = write(&self.words)
            .shift_remove(&key)
            .ok_or_else(|| StoreError::NotFound(key.clone()))?;

        tracing::debug!("Removed '{}'", key);
        self.persist()?;
        Ok(removed)
    }

    pub fn clear(&self) -> Result<(), StoreError> {
        write(&self.words).clear();

        tracing::debug!("Cleared vocabulary");
        self.persist()
    }

    pub fn size(&self) -> usize {
        read(&self.words).len()
    }

    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    pub fn contains(&self, word: &str) -> bool {
        word_key(word).is_some_and(|key| read(&self.words).contains_key(&key))
    }

    pub fn get(&self, word: &str) -> Option<WordRecord> {
        let key = word_key(word)?;
        read(&self.words).get(&key).cloned()
    }

    /// Keys in insertion order
    pub fn words(&self) -> Vec<String> {
        read(&self.words).keys().cloned().collect()
    }

    pub fn snapshot(&self) -> Vocabulary {
        read(&self.words).clone()
    }

    /// Outcome of the load performed by [`VocabularyStore::open`]
    pub fn last_load_status(&self) -> &LoadStatus {
        &self.load_status
    }

    pub fn location(&self) -> String {
        self.backend.describe()
    }

    /// Write the current in-memory state
    fn persist(&self) -> Result<(), StoreError> {
        let _guard = lock(&self.persist_lock);
        // Snapshot under the persist lock so the latest state always lands last
        let words = self.snapshot();
        self.write(&words)
    }

    fn write(&self, words: &Vocabulary) -> Result<(), StoreError> {
        let contents = serde_json::to_string_pretty(words)
            .map_err(|e| StoreError::StorageWriteFailure(std::io::Error::other(e)))?;

        self.backend.write_atomic(&contents).map_err(|e| {
            tracing::error!("Failed to write vocabulary to {}: {}", self.location(), e);
            StoreError::StorageWriteFailure(e)
        })?;

        tracing::debug!("Saved {} words to {}", words.len(), self.location());
        Ok(())
    }

    /// Wait until no other upsert holds `key`, then hold it
    fn claim(&self, key: &str) -> KeyClaim<'_> {
        let mut in_flight = lock(&self.in_flight);
        while in_flight.contains(key) {
            in_flight = self
                .released
                .wait(in_flight)
                .unwrap_or_else(PoisonError::into_inner);
        }
        in_flight.insert(key.to_string());

        KeyClaim {
            store: self,
            key: key.to_string(),
        }
    }
}

struct KeyClaim<'a> {
    store: &'a VocabularyStore,
    key: String,
}

impl Drop for KeyClaim<'_> {
    fn drop(&mut self) {
        lock(&self.store.in_flight).remove(&self.key);
        self.store.released.notify_all();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
    lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
    lock.write().unwrap_or_else(PoisonError::into_inner)
}
