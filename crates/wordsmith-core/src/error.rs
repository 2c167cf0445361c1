/// Failures while turning a lookup payload into a [`crate::WordRecord`].
#[derive(Debug, thiserror::Error)]
pub enum NormalizeError {
    #[error("No definitions found for '{0}'")]
    LookupNotFound(String),

    #[error("Malformed lookup response: {0}")]
    MalformedResponse(String),
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("'{0}' is already in the vocabulary")]
    AlreadyExists(String),

    #[error("'{0}' is not in the vocabulary")]
    NotFound(String),

    #[error("Not a valid word key: {0:?}")]
    InvalidKey(String),

    /// Recovered at load time; never returned from a mutation.
    #[error("Vocabulary storage is corrupt: {0}")]
    StorageCorrupt(String),

    /// The in-memory change was applied but could not be persisted.
    #[error("Failed to persist vocabulary, change may be lost on restart: {0}")]
    StorageWriteFailure(#[source] std::io::Error),
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum QuizError {
    #[error("At least {required} words are needed for a quiz, {available} available")]
    InsufficientVocabulary { available: usize, required: usize },

    #[error("No answer selected")]
    NoSelection,

    #[error("No open question to answer")]
    NoQuestion,

    #[error("Option {0} does not exist")]
    OptionOutOfRange(usize),
}
