use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use serde_json::{Value, json};
use wordsmith_config::Config;
use wordsmith_core::{MemoryBackend, StoreBackend, VocabularyStore};
use wordsmith_lookup::{LookupError, LookupResponse, LookupService, ProviderMetadata};

use crate::state::AppState;

/// Canned lookup service that counts how often it is asked
#[derive(Default)]
pub struct FakeLookup {
    responses: Mutex<HashMap<String, Value>>,
    calls: AtomicUsize,
}

impl FakeLookup {
    pub fn with_words(words: &[&str]) -> Self {
        let fake = Self::default();
        for word in words {
            fake.insert(word, entry(word, &format!("meaning of {word}")));
        }
        fake
    }

    pub fn insert(&self, word: &str, payload: Value) {
        self.responses
            .lock()
            .unwrap()
            .insert(word.to_string(), payload);
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl LookupService for FakeLookup {
    async fn lookup(&self, word: &str) -> Result<LookupResponse, LookupError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.responses.lock().unwrap().get(word) {
            Some(payload) => Ok(LookupResponse::Found(payload.clone())),
            None => Ok(LookupResponse::NotFound),
        }
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "fake".to_string(),
            requires_api_key: false,
        }
    }
}

/// Lets a test keep a handle on the backend the store owns
pub struct SharedBackend(pub Arc<MemoryBackend>);

impl StoreBackend for SharedBackend {
    fn read(&self) -> std::io::Result<Option<String>> {
        self.0.read()
    }

    fn write_atomic(&self, contents: &str) -> std::io::Result<()> {
        self.0.write_atomic(contents)
    }

    fn describe(&self) -> String {
        self.0.describe()
    }
}

/// One dictionary entry with a single noun meaning
pub fn entry(word: &str, definition: &str) -> Value {
    json!([{
        "word": word,
        "phonetic": format!("/{word}/"),
        "meanings": [{
            "partOfSpeech": "noun",
            "definitions": [{ "definition": definition, "synonyms": [], "antonyms": [] }],
            "synonyms": [],
            "antonyms": []
        }]
    }])
}

pub fn app_state(lookup: Arc<FakeLookup>, backend: Arc<MemoryBackend>) -> Arc<AppState> {
    let store = VocabularyStore::open(SharedBackend(backend));
    Arc::new(AppState::new(Config::default(), store, lookup, None))
}

pub fn output(buf: Vec<u8>) -> String {
    String::from_utf8(buf).unwrap()
}
