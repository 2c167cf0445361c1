use std::path::PathBuf;

use serde::{Deserialize, Serialize};

fn default_enabled() -> bool {
    true
}

fn default_url_template() -> String {
    "https://loremflickr.com/320/240/{word}".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("downloads")
}

fn default_timeout_seconds() -> u64 {
    60
}

#[derive(Debug, Serialize, Deserialize, Clone)]
#[serde(default)]
pub struct ImageConfig {
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    /// `{word}` is replaced by the word key
    #[serde(default = "default_url_template")]
    pub url_template: String,
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            url_template: default_url_template(),
            output_dir: default_output_dir(),
            timeout_seconds: default_timeout_seconds(),
        }
    }
}
