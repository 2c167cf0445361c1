mod client;
mod image;

pub use client::DictionaryApiClient;
pub use image::{HttpImageFetcher, ImageError, ImageFetcher, spawn_image_fetch};

use wordsmith_core::{NormalizeError, WordRecord};

/// Dictionary lookup provider interface
#[async_trait::async_trait]
pub trait LookupService: Send + Sync {
    /// Fetch the raw payload for an already keyed word
    async fn lookup(&self, word: &str) -> Result<LookupResponse, LookupError>;

    /// Provider metadata
    fn metadata(&self) -> ProviderMetadata;
}

#[derive(Debug, Clone)]
pub enum LookupResponse {
    /// Raw nested meaning/definition payload
    Found(serde_json::Value),
    NotFound,
}

impl LookupResponse {
    /// Normalize the payload into a record for `word`
    pub fn into_record(self, word: &str) -> Result<WordRecord, NormalizeError> {
        match self {
            LookupResponse::Found(payload) => wordsmith_core::normalize(word, &payload),
            LookupResponse::NotFound => Err(NormalizeError::LookupNotFound(word.to_string())),
        }
    }
}

#[derive(Debug, Clone)]
pub struct ProviderMetadata {
    pub name: String,
    pub requires_api_key: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum LookupError {
    #[error("API error: {0}")]
    ApiError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}
