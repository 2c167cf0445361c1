use std::sync::Arc;
use std::time::Duration;

use wordsmith_config::Config;
use wordsmith_core::{ImageSlots, JsonFileBackend, VocabularyStore};
use wordsmith_lookup::{DictionaryApiClient, HttpImageFetcher, ImageFetcher, LookupService};

pub struct AppState {
    pub config: Config,
    pub store: Arc<VocabularyStore>,
    pub lookup: Arc<dyn LookupService>,
    /// `None` when image enrichment is disabled
    pub images: Option<Arc<dyn ImageFetcher>>,
    pub image_slots: ImageSlots,
}

impl AppState {
    pub fn new(
        config: Config,
        store: VocabularyStore,
        lookup: Arc<dyn LookupService>,
        images: Option<Arc<dyn ImageFetcher>>,
    ) -> Self {
        Self {
            config,
            store: Arc::new(store),
            lookup,
            images,
            image_slots: ImageSlots::new(),
        }
    }

    /// Wire the file store, dictionary client and image fetcher from config
    pub fn from_config(config: Config) -> anyhow::Result<Self> {
        let store = VocabularyStore::open(JsonFileBackend::new(config.store.path.clone()));

        let lookup = DictionaryApiClient::new(
            config.lookup.api_url.clone(),
            Duration::from_secs(config.lookup.timeout_seconds),
        )?;
        let provider = lookup.metadata();
        tracing::info!(
            "Dictionary provider: {} ({})",
            provider.name,
            config.lookup.api_url
        );

        let images = if config.images.enabled {
            Some(Arc::new(HttpImageFetcher::new(
                config.images.url_template.clone(),
                config.images.output_dir.clone(),
            )) as Arc<dyn ImageFetcher>)
        } else {
            tracing::info!("Image enrichment disabled");
            None
        };

        Ok(Self::new(config, store, Arc::new(lookup), images))
    }

    pub fn image_timeout(&self) -> Duration {
        Duration::from_secs(self.config.images.timeout_seconds)
    }
}
