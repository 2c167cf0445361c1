pub mod backend;
pub mod enrich;
pub mod error;
pub mod normalize;
pub mod ordered_set;
pub mod preprocess;
pub mod quiz;
pub mod record;
pub mod store;

pub use backend::{JsonFileBackend, MemoryBackend, StoreBackend};
pub use enrich::{ImageSlot, ImageSlots};
pub use error::{NormalizeError, QuizError, StoreError};
pub use normalize::normalize;
pub use ordered_set::OrderedSet;
pub use preprocess::word_key;
pub use quiz::{AnswerFeedback, Question, QuizSession, QuizState, Score};
pub use record::{WordRecord, WordRecordBuilder};
pub use store::{LoadOutcome, LoadStatus, Vocabulary, VocabularyStore};
