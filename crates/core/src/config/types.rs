use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub api: ApiConfig,
    #[serde(default)]
    pub cache: CacheConfig,
    #[serde(default)]
    pub connectivity: ConnectivityConfig,
}

/// Remote catalog API configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ApiConfig {
    /// TMDB v3 API key, appended to every request
    pub api_key: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Image CDN base for poster URLs
    #[serde(default = "default_image_base_url")]
    pub image_base_url: String,
    /// Locale sent with every request
    #[serde(default = "default_language")]
    pub language: String,
    /// Per-request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            image_base_url: default_image_base_url(),
            language: default_language(),
            timeout_secs: default_timeout(),
        }
    }
}

fn default_base_url() -> String {
    "https://api.themoviedb.org/3".to_string()
}

fn default_image_base_url() -> String {
    "https://image.tmdb.org/t/p".to_string()
}

fn default_language() -> String {
    "en-US".to_string()
}

fn default_timeout() -> u64 {
    30
}

/// On-disk cache configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CacheConfig {
    #[serde(default = "default_cache_dir")]
    pub dir: PathBuf,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: default_cache_dir(),
        }
    }
}

fn default_cache_dir() -> PathBuf {
    PathBuf::from("cache")
}

/// Connectivity probe configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ConnectivityConfig {
    /// host:port the probe connects to
    #[serde(default = "default_probe_addr")]
    pub probe_addr: String,
    #[serde(default = "default_interval")]
    pub interval_secs: u64,
    #[serde(default = "default_probe_timeout")]
    pub probe_timeout_secs: u64,
}

impl Default for ConnectivityConfig {
    fn default() -> Self {
        Self {
            probe_addr: default_probe_addr(),
            interval_secs: default_interval(),
            probe_timeout_secs: default_probe_timeout(),
        }
    }
}

fn default_probe_addr() -> String {
    "api.themoviedb.org:443".to_string()
}

fn default_interval() -> u64 {
    5
}

fn default_probe_timeout() -> u64 {
    3
}

/// Sanitized config for display (API key redacted)
#[derive(Debug, Clone, Serialize)]
pub struct SanitizedConfig {
    pub api: SanitizedApiConfig,
    pub cache: CacheConfig,
    pub connectivity: ConnectivityConfig,
}

#[derive(Debug, Clone, Serialize)]
pub struct SanitizedApiConfig {
    pub base_url: String,
    pub image_base_url: String,
    pub language: String,
    pub timeout_secs: u64,
    pub api_key_configured: bool,
}

impl From<&Config> for SanitizedConfig {
    fn from(config: &Config) -> Self {
        Self {
            api: SanitizedApiConfig {
                base_url: config.api.base_url.clone(),
                image_base_url: config.api.image_base_url.clone(),
                language: config.api.language.clone(),
                timeout_secs: config.api.timeout_secs,
                api_key_configured: !config.api.api_key.is_empty(),
            },
            cache: config.cache.clone(),
            connectivity: config.connectivity.clone(),
        }
    }
}
