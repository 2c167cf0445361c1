use serde::Deserialize;
use serde_json::Value;

use crate::error::NormalizeError;
use crate::preprocess::word_key;
use crate::record::WordRecord;

// Shapes of the free dictionary API response
#[derive(Debug, Deserialize)]
struct RawEntry {
    #[serde(default)]
    phonetic: Option<String>,
    #[serde(default)]
    phonetics: Vec<RawPhonetic>,
    #[serde(default)]
    meanings: Vec<RawMeaning>,
}

#[derive(Debug, Deserialize)]
struct RawPhonetic {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawMeaning {
    #[serde(rename = "partOfSpeech")]
    part_of_speech: String,
    #[serde(default)]
    definitions: Vec<RawDefinition>,
    #[serde(default)]
    synonyms: Option<Vec<String>>,
    #[serde(default)]
    antonyms: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RawDefinition {
    #[serde(default)]
    definition: Option<String>,
    #[serde(default)]
    example: Option<String>,
    #[serde(default)]
    synonyms: Option<Vec<String>>,
    #[serde(default)]
    antonyms: Option<Vec<String>>,
}

impl RawEntry {
    fn phonetic(&self) -> String {
        self.phonetic
            .as_deref()
            .filter(|p| !p.is_empty())
            .or_else(|| {
                self.phonetics
                    .iter()
                    .filter_map(|p| p.text.as_deref())
                    .find(|t| !t.is_empty())
            })
            .unwrap_or_default()
            .to_string()
    }
}

/// Build a [`WordRecord`] for `query` from a raw lookup payload.
///
/// Meanings are walked in payload order. For each meaning its own
/// synonyms/antonyms are folded first, then its definitions in order.
pub fn normalize(query: &str, payload: &Value) -> Result<WordRecord, NormalizeError> {
    let key = word_key(query)
        .ok_or_else(|| NormalizeError::MalformedResponse("empty query".to_string()))?;

    let entry = select_entry(&key, payload)?;
    let entry = RawEntry::deserialize(entry)
        .map_err(|e| NormalizeError::MalformedResponse(format!("'{key}': {e}")))?;

    let mut builder = WordRecord::builder(&key).phonetic(entry.phonetic());

    for (m, meaning) in entry.meanings.iter().enumerate() {
        tracing::debug!(
            "'{}' meaning {}: {} ({} definitions)",
            key,
            m,
            meaning.part_of_speech,
            meaning.definitions.len()
        );

        builder.fold_synonyms(meaning.synonyms.as_deref().unwrap_or_default());
        builder.fold_antonyms(meaning.antonyms.as_deref().unwrap_or_default());

        for (d, definition) in meaning.definitions.iter().enumerate() {
            let text = definition
                .definition
                .as_deref()
                .filter(|t| !t.trim().is_empty())
                .ok_or_else(|| {
                    NormalizeError::MalformedResponse(format!(
                        "'{key}': meaning {m} definition {d} has no text"
                    ))
                })?;
            builder.push_definition(text);

            if let Some(example) = definition.example.as_deref()
                && !example.is_empty()
            {
                builder.push_example(example);
            }

            builder.fold_synonyms(definition.synonyms.as_deref().unwrap_or_default());
            builder.fold_antonyms(definition.antonyms.as_deref().unwrap_or_default());
        }
    }

    builder.build()
}

/// Pick the entry to normalize, or detect the service's not-found answer
fn select_entry<'a>(key: &str, payload: &'a Value) -> Result<&'a Value, NormalizeError> {
    match payload {
        Value::Null => Err(NormalizeError::LookupNotFound(key.to_string())),
        Value::Array(entries) => entries
            .first()
            .ok_or_else(|| NormalizeError::LookupNotFound(key.to_string())),
        Value::Object(map) if !map.contains_key("meanings") && map.contains_key("title") => {
            Err(NormalizeError::LookupNotFound(key.to_string()))
        }
        Value::Object(_) => Ok(payload),
        other => Err(NormalizeError::MalformedResponse(format!(
            "'{key}': expected a list of entries, got {other}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn sample() -> Value {
        json!([{
            "word": "run",
            "phonetic": "/ɹʌn/",
            "meanings": [
                {
                    "partOfSpeech": "verb",
                    "definitions": [
                        {
                            "definition": "To move swiftly on foot.",
                            "example": "Run to the store.",
                            "synonyms": ["sprint", "dash"],
                            "antonyms": ["walk"]
                        },
                        {
                            "definition": "To operate a machine.",
                            "synonyms": ["operate", "sprint"],
                            "antonyms": []
                        }
                    ],
                    "synonyms": ["jog", "dash"],
                    "antonyms": ["stop"]
                },
                {
                    "partOfSpeech": "noun",
                    "definitions": [
                        { "definition": "An act of running.", "example": "" }
                    ],
                    "synonyms": ["jog", "race"],
                    "antonyms": ["walk", "halt"]
                }
            ]
        }])
    }

    #[test]
    fn meaning_level_synonyms_come_first() {
        let payload = json!([{
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "a mark", "synonyms": ["dot"] }],
                "synonyms": ["mark"]
            }]
        }]);

        let record = normalize("dot", &payload).unwrap();
        assert_eq!(record.synonyms(), ["mark", "dot"]);
        assert_eq!(record.definitions(), ["a mark"]);
    }

    #[test]
    fn traversal_is_meaning_major() {
        let record = normalize(" Run ", &sample()).unwrap();

        assert_eq!(record.word(), "run");
        assert_eq!(record.phonetic(), "/ɹʌn/");
        assert_eq!(
            record.definitions(),
            [
                "To move swiftly on foot.",
                "To operate a machine.",
                "An act of running."
            ]
        );
        assert_eq!(record.examples(), ["Run to the store."]);
        assert_eq!(
            record.synonyms(),
            ["jog", "dash", "sprint", "operate", "race"]
        );
        assert_eq!(record.antonyms(), ["stop", "walk", "halt"]);
    }

    #[test]
    fn related_words_have_no_duplicates() {
        let record = normalize("run", &sample()).unwrap();
        for list in [record.synonyms(), record.antonyms()] {
            let mut seen = std::collections::HashSet::new();
            assert!(list.iter().all(|w| seen.insert(w)));
        }
    }

    #[test]
    fn phonetic_falls_back_to_phonetics_list() {
        let payload = json!([{
            "phonetics": [{ "audio": "x.mp3" }, { "text": "/tɛst/" }],
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "a trial" }]
            }]
        }]);
        assert_eq!(normalize("test", &payload).unwrap().phonetic(), "/tɛst/");
    }

    #[test]
    fn missing_phonetic_is_empty() {
        let payload = json!({
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "a trial" }],
                "synonyms": null
            }]
        });
        let record = normalize("test", &payload).unwrap();
        assert_eq!(record.phonetic(), "");
        assert!(record.synonyms().is_empty());
    }

    #[test]
    fn empty_result_is_not_found() {
        let err = normalize("zzxq", &json!([])).unwrap_err();
        assert!(matches!(err, NormalizeError::LookupNotFound(w) if w == "zzxq"));

        let err = normalize("zzxq", &Value::Null).unwrap_err();
        assert!(matches!(err, NormalizeError::LookupNotFound(_)));
    }

    #[test]
    fn service_error_object_is_not_found() {
        let payload = json!({
            "title": "No Definitions Found",
            "message": "Sorry pal, we couldn't find definitions for the word you were looking for.",
            "resolution": "You can try the search again at later time or head to the web instead."
        });
        let err = normalize("zzxq", &payload).unwrap_err();
        assert!(matches!(err, NormalizeError::LookupNotFound(_)));
    }

    #[test]
    fn definition_without_text_is_malformed() {
        let payload = json!([{
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "ok" }, { "example": "no text here" }]
            }]
        }]);
        let err = normalize("word", &payload).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedResponse(msg) if msg.contains("definition 1")));
    }

    #[test]
    fn blank_definition_text_is_malformed() {
        let payload = json!([{
            "meanings": [{
                "partOfSpeech": "noun",
                "definitions": [{ "definition": "   " }]
            }]
        }]);
        let err = normalize("word", &payload).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedResponse(msg) if msg.contains("definition 0")));
    }

    #[test]
    fn missing_part_of_speech_is_malformed() {
        let payload = json!([{
            "meanings": [{ "definitions": [{ "definition": "ok" }] }]
        }]);
        let err = normalize("word", &payload).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedResponse(_)));
    }

    #[test]
    fn unexpected_shapes_are_malformed() {
        for payload in [json!("text"), json!(42), json!([{ "meanings": "none" }])] {
            let err = normalize("word", &payload).unwrap_err();
            assert!(matches!(err, NormalizeError::MalformedResponse(_)), "{payload}");
        }
    }

    #[test]
    fn entry_without_definitions_is_malformed() {
        let payload = json!([{ "meanings": [{ "partOfSpeech": "noun", "definitions": [] }] }]);
        let err = normalize("word", &payload).unwrap_err();
        assert!(matches!(err, NormalizeError::MalformedResponse(_)));
    }

    #[test]
    fn only_first_entry_is_used() {
        let payload = json!([
            { "meanings": [{ "partOfSpeech": "noun", "definitions": [{ "definition": "first" }] }] },
            { "meanings": [{ "partOfSpeech": "verb", "definitions": [{ "definition": "second" }] }] }
        ]);
        assert_eq!(normalize("word", &payload).unwrap().definitions(), ["first"]);
    }
}
