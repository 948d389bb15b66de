use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use super::platform;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub http: HttpConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub player: PlayerConfig,
}

/// Which backend answers search queries.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProviderKind {
    /// YouTube Data API v3 `search.list`.
    #[default]
    Youtube,
    /// Client-side filtering over the built-in fixture tracks.
    Fixture,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default)]
    pub provider: ProviderKind,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Name of the environment variable holding the API key.  Read at call
    /// time, so a missing key only surfaces when a search is made.
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
    #[serde(default = "default_max_results")]
    pub max_results: u32,
    /// Appended to every query before it is sent.
    #[serde(default = "default_query_suffix")]
    pub query_suffix: String,
    /// Unset by default: requests wait as long as the provider takes.
    #[serde(default)]
    pub timeout_secs: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    #[serde(default = "default_http_enabled")]
    pub enabled: bool,
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

/// Where the session catalog comes from at startup.  The catalog itself is
/// never written back.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// TOML seed file with `[[collection]]` tables (highest priority).
    #[serde(default = "default_seed_file")]
    pub seed_file: PathBuf,
    /// Fall back to the built-in demo collections when no seed file exists.
    #[serde(default = "default_seed_fixtures")]
    pub seed_fixtures: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct PlayerConfig {
    /// How long the simulated player "plays" before reporting the end of a
    /// track.  Unset means tracks never end on their own.
    #[serde(default)]
    pub simulated_track_secs: Option<u64>,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            provider: ProviderKind::default(),
            endpoint: default_endpoint(),
            api_key_env: default_api_key_env(),
            max_results: default_max_results(),
            query_suffix: default_query_suffix(),
            timeout_secs: None,
        }
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            enabled: default_http_enabled(),
            bind_address: default_bind_address(),
            port: default_port(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            seed_file: default_seed_file(),
            seed_fixtures: default_seed_fixtures(),
        }
    }
}

fn default_endpoint() -> String {
    "https://www.googleapis.com/youtube/v3/search".to_string()
}

fn default_api_key_env() -> String {
    "YOUTUBE_API_KEY".to_string()
}

fn default_max_results() -> u32 {
    10
}

fn default_query_suffix() -> String {
    "music".to_string()
}

fn default_http_enabled() -> bool {
    true
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    8990
}

fn default_seed_file() -> PathBuf {
    platform::config_dir().join("catalog.toml")
}

fn default_seed_fixtures() -> bool {
    true
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        Self::load_from(&Self::config_path())
    }

    /// Read `path`, writing a default config there first if it is missing.
    pub fn load_from(path: &Path) -> anyhow::Result<Self> {
        if !path.exists() {
            let config = Self::default();
            config.save_to(path)?;
            return Ok(config);
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    pub fn save_to(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        platform::config_dir().join("config.toml")
    }
}
