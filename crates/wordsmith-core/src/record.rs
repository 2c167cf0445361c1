use serde::{Deserialize, Serialize};

use crate::error::NormalizeError;
use crate::ordered_set::OrderedSet;
use crate::preprocess::word_key;

/// Canonical knowledge about one word.
///
/// Only built through [`WordRecord::builder`] (or the normalizer, which uses it),
/// so every record has a key and at least one definition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WordRecord {
    /// Store key, carried by the surrounding map when persisted
    #[serde(skip)]
    word: String,
    #[serde(rename = "definition")]
    definitions: Vec<String>,
    synonyms: Vec<String>,
    antonyms: Vec<String>,
    phonetic: String,
    examples: Vec<String>,
}

/// Persisted value of one vocabulary entry, not yet validated.
///
/// Only turns into a [`WordRecord`] through [`StoredRecord::into_record`].
#[derive(Debug, Deserialize)]
pub(crate) struct StoredRecord {
    #[serde(rename = "definition")]
    definitions: Vec<String>,
    #[serde(default)]
    synonyms: Vec<String>,
    #[serde(default)]
    antonyms: Vec<String>,
    #[serde(default)]
    phonetic: String,
    #[serde(default)]
    examples: Vec<String>,
}

impl StoredRecord {
    /// Validate the entry stored under `key`
    pub(crate) fn into_record(self, key: &str) -> Result<WordRecord, NormalizeError> {
        let mut builder = WordRecordBuilder::new(key).phonetic(self.phonetic);
        builder.definitions = self.definitions;
        builder.examples = self.examples;
        builder.synonyms.fold(self.synonyms);
        builder.antonyms.fold(self.antonyms);
        builder.build()
    }
}

impl WordRecord {
    pub fn builder(word: &str) -> WordRecordBuilder {
        WordRecordBuilder::new(word)
    }

    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn phonetic(&self) -> &str {
        &self.phonetic
    }

    pub fn definitions(&self) -> &[String] {
        &self.definitions
    }

    /// First definition, the one used as a quiz option
    pub fn primary_definition(&self) -> &str {
        // Never empty, enforced by the builder
        &self.definitions[0]
    }

    pub fn examples(&self) -> &[String] {
        &self.examples
    }

    pub fn synonyms(&self) -> &[String] {
        &self.synonyms
    }

    pub fn antonyms(&self) -> &[String] {
        &self.antonyms
    }
}

#[derive(Debug, Clone)]
pub struct WordRecordBuilder {
    word: String,
    phonetic: String,
    definitions: Vec<String>,
    examples: Vec<String>,
    synonyms: OrderedSet,
    antonyms: OrderedSet,
}

impl WordRecordBuilder {
    fn new(word: &str) -> Self {
        Self {
            word: word.to_string(),
            phonetic: String::new(),
            definitions: Vec::new(),
            examples: Vec::new(),
            synonyms: OrderedSet::new(),
            antonyms: OrderedSet::new(),
        }
    }

    pub fn phonetic(mut self, phonetic: impl Into<String>) -> Self {
        self.phonetic = phonetic.into();
        self
    }

    pub fn definition(mut self, text: impl Into<String>) -> Self {
        self.push_definition(text);
        self
    }

    pub fn example(mut self, text: impl Into<String>) -> Self {
        self.push_example(text);
        self
    }

    pub fn synonyms<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.synonyms.fold(items);
        self
    }

    pub fn antonyms<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.antonyms.fold(items);
        self
    }

    pub(crate) fn push_definition(&mut self, text: impl Into<String>) {
        self.definitions.push(text.into());
    }

    pub(crate) fn push_example(&mut self, text: impl Into<String>) {
        self.examples.push(text.into());
    }

    pub(crate) fn fold_synonyms(&mut self, items: &[String]) {
        self.synonyms.fold(items.iter().cloned());
    }

    pub(crate) fn fold_antonyms(&mut self, items: &[String]) {
        self.antonyms.fold(items.iter().cloned());
    }

    pub fn build(self) -> Result<WordRecord, NormalizeError> {
        let word = word_key(&self.word)
            .ok_or_else(|| NormalizeError::MalformedResponse("empty word".to_string()))?;

        if self.definitions.is_empty() {
            return Err(NormalizeError::MalformedResponse(format!(
                "'{word}' has no definitions"
            )));
        }

        Ok(WordRecord {
            word,
            phonetic: self.phonetic,
            definitions: self.definitions,
            examples: self.examples,
            synonyms: self.synonyms.into_vec(),
            antonyms: self.antonyms.into_vec(),
        })
    }
}
