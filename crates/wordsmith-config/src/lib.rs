use std::env;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use self::images::ImageConfig;
use self::lookup::LookupConfig;
use self::store::StoreConfig;

pub mod images;
pub mod lookup;
pub mod store;

#[derive(Debug, Default, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct Config {
    pub lookup: LookupConfig,
    pub store: StoreConfig,
    pub images: ImageConfig,
}

impl Config {
    /// Defaults with environment overrides applied
    pub fn new() -> Self {
        let mut config = Config::default();
        config.apply_overrides(|key| env::var(key).ok());
        config
    }

    /// Apply `WORDSMITH_*` overrides read through `var`
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(api_url) = var("WORDSMITH_API_URL") {
            self.lookup.api_url = api_url;
        }

        if let Some(timeout) = var("WORDSMITH_LOOKUP_TIMEOUT_SECONDS").and_then(|v| v.parse().ok()) {
            self.lookup.timeout_seconds = timeout;
        }

        if let Some(path) = var("WORDSMITH_STORE_PATH") {
            self.store.path = PathBuf::from(path);
        }

        if let Some(enabled) = var("WORDSMITH_IMAGES").and_then(|v| parse_flag(&v)) {
            self.images.enabled = enabled;
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
