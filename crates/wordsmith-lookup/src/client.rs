use std::time::Duration;

use async_trait::async_trait;
use reqwest::{StatusCode, Url};

use crate::{LookupError, LookupResponse, LookupService, ProviderMetadata};

/// Client for the free dictionary API (`{api_url}/{word}`)
#[derive(Clone)]
pub struct DictionaryApiClient {
    client: reqwest::Client,
    api_url: String,
}

impl DictionaryApiClient {
    pub fn new(api_url: String, timeout: Duration) -> Result<Self, LookupError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;

        Ok(Self { client, api_url })
    }

    fn entry_url(&self, word: &str) -> Result<Url, LookupError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| LookupError::ApiError(format!("Invalid API url {}: {}", self.api_url, e)))?;

        url.path_segments_mut()
            .map_err(|_| LookupError::ApiError(format!("API url cannot be a base: {}", self.api_url)))?
            .pop_if_empty()
            .push(word);

        Ok(url)
    }
}

/// Map a non-success status to an error, `None` for 404
fn status_error(status: StatusCode) -> Option<LookupError> {
    match status {
        StatusCode::NOT_FOUND => None,
        StatusCode::TOO_MANY_REQUESTS => Some(LookupError::RateLimitExceeded),
        status => Some(LookupError::ApiError(format!("HTTP {status}"))),
    }
}

#[async_trait]
impl LookupService for DictionaryApiClient {
    async fn lookup(&self, word: &str) -> Result<LookupResponse, LookupError> {
        let url = self.entry_url(word)?;
        tracing::debug!("Looking up '{}' at {}", word, url);

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            return match status_error(status) {
                None => {
                    tracing::debug!("'{}' not found", word);
                    Ok(LookupResponse::NotFound)
                }
                Some(e) => Err(e),
            };
        }

        let payload: serde_json::Value = response
            .json()
            .await
            .map_err(|e| LookupError::ApiError(format!("Failed to parse response: {e}")))?;

        Ok(LookupResponse::Found(payload))
    }

    fn metadata(&self) -> ProviderMetadata {
        ProviderMetadata {
            name: "Free Dictionary API".to_string(),
            requires_api_key: false,
        }
    }
}
