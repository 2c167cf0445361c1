use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use wordsmith_core::ImageSlot;

const IMAGE_EXTENSIONS: [&str; 5] = ["jpg", "jpeg", "png", "gif", "webp"];

/// Best-effort illustrative image source
#[async_trait]
pub trait ImageFetcher: Send + Sync {
    /// Fetch an image for `word` and return where it was stored
    async fn fetch(&self, word: &str) -> Result<PathBuf, ImageError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ImageError {
    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("HTTP {0}")]
    HttpStatus(reqwest::StatusCode),

    #[error("Unsupported content type: {0}")]
    UnsupportedContentType(String),
}

/// Downloads one image per word from a URL template with a `{word}` placeholder
#[derive(Clone)]
pub struct HttpImageFetcher {
    client: reqwest::Client,
    url_template: String,
    output_dir: PathBuf,
}

impl HttpImageFetcher {
    pub fn new(url_template: String, output_dir: PathBuf) -> Self {
        Self {
            client: reqwest::Client::new(),
            url_template,
            output_dir,
        }
    }

    fn word_dir(&self, word: &str) -> PathBuf {
        self.output_dir.join(word)
    }

    fn image_url(&self, word: &str) -> String {
        self.url_template.replace("{word}", word)
    }
}

/// First image file already downloaded into `dir`
async fn existing_image(dir: &Path) -> Option<PathBuf> {
    let mut entries = tokio::fs::read_dir(dir).await.ok()?;
    while let Ok(Some(entry)) = entries.next_entry().await {
        let path = entry.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str()));
        if is_image {
            return Some(path);
        }
    }
    None
}

fn extension_for(content_type: &str) -> Option<&'static str> {
    let mime = content_type.split(';').next()?.trim();
    match mime {
        "image/jpeg" | "image/jpg" => Some("jpg"),
        "image/png" => Some("png"),
        "image/gif" => Some("gif"),
        "image/webp" => Some("webp"),
        _ => None,
    }
}

#[async_trait]
impl ImageFetcher for HttpImageFetcher {
    async fn fetch(&self, word: &str) -> Result<PathBuf, ImageError> {
        let dir = self.word_dir(word);
        if let Some(path) = existing_image(&dir).await {
            tracing::debug!("Reusing image for '{}': {}", word, path.display());
            return Ok(path);
        }

        let response = self.client.get(self.image_url(word)).send().await?;
        if !response.status().is_success() {
            return Err(ImageError::HttpStatus(response.status()));
        }

        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or_default()
            .to_string();
        let ext = extension_for(&content_type)
            .ok_or_else(|| ImageError::UnsupportedContentType(content_type.clone()))?;

        let bytes = response.bytes().await?;
        tokio::fs::create_dir_all(&dir).await?;
        let path = dir.join(format!("image.{ext}"));
        tokio::fs::write(&path, &bytes).await?;

        Ok(path)
    }
}

/// Fetch an image for `word` in a detached task.
///
/// The outcome only ever lands in `slot`. Failures and timeouts are logged and
/// dropped, the task is never joined.
pub fn spawn_image_fetch(
    fetcher: Arc<dyn ImageFetcher>,
    word: String,
    slot: ImageSlot,
    timeout: Duration,
) {
    tokio::spawn(async move {
        match tokio::time::timeout(timeout, fetcher.fetch(&word)).await {
            Ok(Ok(path)) => {
                tracing::debug!("Image for '{}' ready at {}", word, path.display());
                slot.fill(path);
            }
            Ok(Err(e)) => tracing::warn!("Image fetch for '{}' failed: {}", word, e),
            Err(_) => tracing::debug!("Image fetch for '{}' timed out", word),
        }
    });
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::time::{sleep, timeout};

    use super::*;

    struct FixedFetcher(Result<PathBuf, ()>);

    #[async_trait]
    impl ImageFetcher for FixedFetcher {
        async fn fetch(&self, _word: &str) -> Result<PathBuf, ImageError> {
            self.0.clone().map_err(|_| {
                ImageError::IoError(std::io::Error::other("no images today"))
            })
        }
    }

    struct SlowFetcher;

    #[async_trait]
    impl ImageFetcher for SlowFetcher {
        async fn fetch(&self, _word: &str) -> Result<PathBuf, ImageError> {
            sleep(Duration::from_secs(60)).await;
            Ok(PathBuf::from("late.jpg"))
        }
    }

    async fn wait_for(slot: &ImageSlot) -> Option<PathBuf> {
        timeout(Duration::from_secs(2), async {
            loop {
                if let Some(path) = slot.get() {
                    return path.to_path_buf();
                }
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .ok()
    }

    #[tokio::test]
    async fn successful_fetch_fills_the_slot() {
        let slot = ImageSlot::new();
        spawn_image_fetch(
            Arc::new(FixedFetcher(Ok(PathBuf::from("downloads/cat/image.jpg")))),
            "cat".to_string(),
            slot.clone(),
            Duration::from_secs(1),
        );

        assert_eq!(
            wait_for(&slot).await,
            Some(PathBuf::from("downloads/cat/image.jpg"))
        );
    }

    #[tokio::test]
    async fn failed_fetch_leaves_the_slot_empty() {
        let slot = ImageSlot::new();
        spawn_image_fetch(
            Arc::new(FixedFetcher(Err(()))),
            "cat".to_string(),
            slot.clone(),
            Duration::from_secs(1),
        );

        sleep(Duration::from_millis(100)).await;
        assert!(slot.get().is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn slow_fetch_times_out() {
        let slot = ImageSlot::new();
        spawn_image_fetch(
            Arc::new(SlowFetcher),
            "cat".to_string(),
            slot.clone(),
            Duration::from_secs(5),
        );

        sleep(Duration::from_secs(120)).await;
        assert!(slot.get().is_none());
    }

    #[tokio::test]
    async fn existing_download_is_reused() {
        let dir = tempfile::tempdir().unwrap();
        let word_dir = dir.path().join("cat");
        std::fs::create_dir_all(&word_dir).unwrap();
        std::fs::write(word_dir.join("notes.txt"), "x").unwrap();
        std::fs::write(word_dir.join("Image.PNG"), "x").unwrap();

        // The template points nowhere, so only the cached file can satisfy this
        let fetcher = HttpImageFetcher::new(
            "http://127.0.0.1:9/{word}".to_string(),
            dir.path().to_path_buf(),
        );
        let path = fetcher.fetch("cat").await.unwrap();
        assert_eq!(path, word_dir.join("Image.PNG"));
    }

    #[test]
    fn content_types_map_to_extensions() {
        assert_eq!(extension_for("image/jpeg"), Some("jpg"));
        assert_eq!(extension_for("image/png; charset=binary"), Some("png"));
        assert_eq!(extension_for("text/html"), None);
        assert_eq!(extension_for(""), None);
    }

    #[test]
    fn template_placeholder_is_replaced() {
        let fetcher = HttpImageFetcher::new(
            "https://loremflickr.com/320/240/{word}".to_string(),
            PathBuf::from("downloads"),
        );
        assert_eq!(fetcher.image_url("cat"), "https://loremflickr.com/320/240/cat");
        assert_eq!(fetcher.word_dir("cat"), PathBuf::from("downloads/cat"));
    }
}
