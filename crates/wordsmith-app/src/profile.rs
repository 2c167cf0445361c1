use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use anyhow::Context;
use wordsmith_config::Config;

const DEFAULT_CONFIG_FILE: &str = "wordsmith.json";

/// Load config from `path`, or `wordsmith.json` if present, else defaults.
///
/// Environment overrides always win over the file.
pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let (path, explicit) = match path {
        Some(path) => (path, true),
        None => (Path::new(DEFAULT_CONFIG_FILE), false),
    };

    if !path.exists() {
        if explicit {
            anyhow::bail!("Config file {} not found", path.display());
        }
        tracing::debug!("No config file, using defaults");
        return Ok(Config::new());
    }

    tracing::info!("Loading config from {}", path.display());
    let file = File::open(path).with_context(|| format!("Failed to open {}", path.display()))?;
    let mut config: Config = serde_json::from_reader(BufReader::new(file))
        .with_context(|| format!("Failed to parse {}", path.display()))?;
    config.apply_overrides(|key| std::env::var(key).ok());

    Ok(config)
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn explicit_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_config(Some(&dir.path().join("missing.json"))).is_err());
    }

    #[test]
    fn file_values_are_used() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"images": {"output_dir": "pics"}}"#).unwrap();

        let config = load_config(Some(&path)).unwrap();
        assert_eq!(config.images.output_dir, PathBuf::from("pics"));
    }

    #[test]
    fn invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "not json").unwrap();
        assert!(load_config(Some(&path)).is_err());
    }
}
