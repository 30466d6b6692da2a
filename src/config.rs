//! TOML configuration for the flower guide.
//!
//! Every field has a default, so an absent file or an empty table is a
//! valid configuration. See `config/flowers.example.toml`.

use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize, Clone, Default)]
pub struct Config {
    #[serde(default)]
    pub data: DataConfig,
    #[serde(default)]
    pub images: ImagesConfig,
}

/// Where the dataset lives and how its files are read.
#[derive(Debug, Deserialize, Clone)]
pub struct DataConfig {
    #[serde(default = "default_data_dir")]
    pub dir: PathBuf,
    /// File-name patterns, matched against entries directly under `dir`.
    #[serde(default = "default_include_globs")]
    pub include_globs: Vec<String>,
    /// Text encodings tried in order until one decodes the file cleanly.
    #[serde(default = "default_encodings")]
    pub encodings: Vec<String>,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: default_data_dir(),
            include_globs: default_include_globs(),
            encodings: default_encodings(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}
fn default_include_globs() -> Vec<String> {
    vec!["*.csv".to_string()]
}
fn default_encodings() -> Vec<String> {
    vec![
        "utf-8".to_string(),
        "shift_jis".to_string(),
        "windows-31j".to_string(),
    ]
}

#[derive(Debug, Deserialize, Clone)]
pub struct ImagesConfig {
    #[serde(default = "default_images_provider")]
    pub provider: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Appended to the flower name on the first search attempt.
    #[serde(default = "default_qualifier")]
    pub qualifier: String,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_ttl_secs")]
    pub ttl_secs: u64,
    /// Lifetime of cached failures. Falls back to `ttl_secs`.
    #[serde(default)]
    pub failure_ttl_secs: Option<u64>,
}

impl Default for ImagesConfig {
    fn default() -> Self {
        Self {
            provider: default_images_provider(),
            endpoint: default_endpoint(),
            qualifier: default_qualifier(),
            user_agent: default_user_agent(),
            timeout_secs: default_timeout_secs(),
            ttl_secs: default_ttl_secs(),
            failure_ttl_secs: None,
        }
    }
}

fn default_images_provider() -> String {
    "wikipedia".to_string()
}
fn default_endpoint() -> String {
    "https://ja.wikipedia.org/w/api.php".to_string()
}
fn default_qualifier() -> String {
    "植物".to_string()
}
fn default_user_agent() -> String {
    format!("FlowerGuide/{} (flower meaning reference)", env!("CARGO_PKG_VERSION"))
}
fn default_timeout_secs() -> u64 {
    5
}
fn default_ttl_secs() -> u64 {
    3600
}

impl ImagesConfig {
    pub fn failure_ttl_secs(&self) -> u64 {
        self.failure_ttl_secs.unwrap_or(self.ttl_secs)
    }
}

impl Config {
    /// Built-in defaults, used when no config file exists.
    pub fn minimal() -> Self {
        Self::default()
    }
}

pub fn load_config(path: &Path) -> Result<Config> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    let config: Config = toml::from_str(&content).with_context(|| "Failed to parse config file")?;
    validate(&config)?;
    Ok(config)
}

/// Load `path` if it exists, otherwise fall back to [`Config::minimal`].
pub fn load_or_default(path: &Path) -> Result<Config> {
    if path.exists() {
        load_config(path)
    } else {
        log::debug!("config {} not found, using defaults", path.display());
        Ok(Config::minimal())
    }
}

fn validate(config: &Config) -> Result<()> {
    if config.data.include_globs.is_empty() {
        bail!("data.include_globs must not be empty");
    }
    for pattern in &config.data.include_globs {
        globset::Glob::new(pattern)
            .with_context(|| format!("Invalid data.include_globs pattern: '{}'", pattern))?;
    }

    if config.data.encodings.is_empty() {
        bail!("data.encodings must not be empty");
    }
    for label in &config.data.encodings {
        if encoding_rs::Encoding::for_label(label.as_bytes()).is_none() {
            bail!("Unknown encoding in data.encodings: '{}'", label);
        }
    }

    match config.images.provider.as_str() {
        "wikipedia" | "disabled" => {}
        other => bail!(
            "Unknown image provider: '{}'. Must be wikipedia or disabled.",
            other
        ),
    }

    if config.images.timeout_secs == 0 {
        bail!("images.timeout_secs must be > 0");
    }
    if config.images.ttl_secs == 0 {
        bail!("images.ttl_secs must be > 0");
    }
    if config.images.failure_ttl_secs == Some(0) {
        bail!("images.failure_ttl_secs must be > 0 when set");
    }

    Ok(())
}
