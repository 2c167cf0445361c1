use indexmap::IndexSet;
use rand::rngs::StdRng;
use rand::seq::{SliceRandom, index};
use rand::{Rng, SeedableRng};

use crate::error::QuizError;
use crate::record::WordRecord;
use crate::store::{Vocabulary, VocabularyStore};

/// Options shown per question
pub const OPTION_COUNT: usize = 4;
/// Words needed in the pool to build a question
pub const MIN_POOL: usize = OPTION_COUNT;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// Started, no question asked yet
    Idle,
    Active,
    /// Fewer than [`MIN_POOL`] words left to ask about
    Exhausted,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Score {
    pub correct: usize,
    pub total: usize,
}

impl Score {
    pub fn accuracy(&self) -> f32 {
        if self.total == 0 {
            return 0.0;
        }
        self.correct as f32 / self.total as f32
    }
}

#[derive(Debug, Clone)]
pub struct Question {
    word: String,
    options: Vec<String>,
    correct_index: usize,
    answered: bool,
}

impl Question {
    /// Word whose definition must be picked
    pub fn word(&self) -> &str {
        &self.word
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }
}

/// Everything the caller shows after an answer, right or wrong
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerFeedback {
    pub word: String,
    pub is_correct: bool,
    pub selected: usize,
    pub correct_index: usize,
    pub definitions: Vec<String>,
    pub synonyms: Vec<String>,
    pub antonyms: Vec<String>,
}

/// One quiz run over a snapshot of the vocabulary.
///
/// A word leaves the pool once it is answered correctly. The store itself is
/// never touched.
pub struct QuizSession<R = StdRng> {
    words: Vocabulary,
    pool: IndexSet<String>,
    current: Option<Question>,
    score: Score,
    state: QuizState,
    rng: R,
}

impl QuizSession {
    pub fn start(store: &VocabularyStore) -> Result<Self, QuizError> {
        Self::start_with_rng(store, StdRng::from_os_rng())
    }
}

impl<R: Rng> QuizSession<R> {
    pub fn start_with_rng(store: &VocabularyStore, rng: R) -> Result<Self, QuizError> {
        Self::from_vocabulary(store.snapshot(), rng)
    }

    pub fn from_vocabulary(words: Vocabulary, rng: R) -> Result<Self, QuizError> {
        if words.len() < MIN_POOL {
            return Err(QuizError::InsufficientVocabulary {
                available: words.len(),
                required: MIN_POOL,
            });
        }

        let pool = words.keys().cloned().collect();
        tracing::debug!("Quiz session started with {} words", words.len());

        Ok(Self {
            words,
            pool,
            current: None,
            score: Score::default(),
            state: QuizState::Idle,
            rng,
        })
    }

    /// Draw a target and three distractors from the pool and shuffle their
    /// first definitions into four options.
    ///
    /// Identical definition texts are kept as they are, so two options may read
    /// the same.
    pub fn next_question(&mut self) -> Result<&Question, QuizError> {
        let available = self.pool.len();
        if available < MIN_POOL {
            self.state = QuizState::Exhausted;
            self.current = None;
            return Err(QuizError::InsufficientVocabulary {
                available,
                required: MIN_POOL,
            });
        }

        let target = self.rng.random_range(0..available);
        // Sample among the others, skipping over the target's slot
        let distractors = index::sample(&mut self.rng, available - 1, OPTION_COUNT - 1)
            .into_iter()
            .map(|i| if i >= target { i + 1 } else { i });

        let candidates: Vec<&str> = std::iter::once(target)
            .chain(distractors)
            .map(|i| self.words[self.pool[i].as_str()].primary_definition())
            .collect();

        let mut order: Vec<usize> = (0..OPTION_COUNT).collect();
        order.shuffle(&mut self.rng);

        let options = order.iter().map(|&c| candidates[c].to_string()).collect();
        let correct_index = order.iter().position(|&c| c == 0).unwrap_or_default();

        let word = self.pool[target].clone();
        tracing::debug!("Next question: '{}' (answer {})", word, correct_index);

        self.state = QuizState::Active;
        Ok(self.current.insert(Question {
            word,
            options,
            correct_index,
            answered: false,
        }))
    }

    /// Score the open question. `None` means nothing was selected.
    pub fn submit_answer(&mut self, selected: Option<usize>) -> Result<AnswerFeedback, QuizError> {
        let question = self
            .current
            .as_mut()
            .filter(|q| !q.answered)
            .ok_or(QuizError::NoQuestion)?;

        let selected = selected.ok_or(QuizError::NoSelection)?;
        if selected >= OPTION_COUNT {
            return Err(QuizError::OptionOutOfRange(selected));
        }

        question.answered = true;
        let is_correct = selected == question.correct_index;

        self.score.total += 1;
        if is_correct {
            self.score.correct += 1;
            self.pool.swap_remove(&question.word);
        }

        let record = &self.words[question.word.as_str()];
        Ok(AnswerFeedback {
            word: question.word.clone(),
            is_correct,
            selected,
            correct_index: question.correct_index,
            definitions: record.definitions().to_vec(),
            synonyms: record.synonyms().to_vec(),
            antonyms: record.antonyms().to_vec(),
        })
    }

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn score(&self) -> Score {
        self.score
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.current.as_ref()
    }

    /// Words not yet answered correctly
    pub fn remaining(&self) -> usize {
        self.pool.len()
    }

    pub fn is_remaining(&self, word: &str) -> bool {
        self.pool.contains(word)
    }

    pub fn record(&self, word: &str) -> Option<&WordRecord> {
        self.words.get(word)
    }
}
