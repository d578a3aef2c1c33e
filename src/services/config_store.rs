// Configuration Storage Service
// Handles config file read/write and version backup

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use super::search_provider::GOOGLE_SEARCH_DEFAULT_URL;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AppConfig {
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub search: SearchConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub corpus: CorpusConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchConfig {
    #[serde(default)]
    pub api_key: Option<String>,
    #[serde(default)]
    pub search_engine_id: Option<String>,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_num_results")]
    pub num_results: u32,
    /// Leading normalized characters of the text used as the search query.
    #[serde(default = "default_query_chars")]
    pub query_chars: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            search_engine_id: None,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            num_results: default_num_results(),
            query_chars: default_query_chars(),
        }
    }
}

impl SearchConfig {
    /// Both credentials, trimmed; `None` if either is missing or blank.
    pub fn credentials(&self) -> Option<(&str, &str)> {
        let key = self.api_key.as_deref().map(str::trim).filter(|k| !k.is_empty())?;
        let cx = self
            .search_engine_id
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())?;
        Some((key, cx))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchingConfig {
    #[serde(default = "default_min_words")]
    pub min_words: usize,
    #[serde(default = "default_max_sources")]
    pub max_sources: usize,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            min_words: default_min_words(),
            max_sources: default_max_sources(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusConfig {
    #[serde(default = "default_min_similarity")]
    pub min_similarity: f64,
}

impl Default for CorpusConfig {
    fn default() -> Self {
        Self {
            min_similarity: default_min_similarity(),
        }
    }
}

fn default_endpoint() -> String { GOOGLE_SEARCH_DEFAULT_URL.to_string() }
fn default_timeout_secs() -> u64 { 10 }
fn default_num_results() -> u32 { 10 }
fn default_query_chars() -> usize { 100 }
fn default_min_words() -> usize { 3 }
fn default_max_sources() -> usize { 5 }
fn default_min_similarity() -> f64 { 50.0 }

pub struct ConfigStore {
    config_dir: PathBuf,
    config_file: PathBuf,
}

impl ConfigStore {
    pub fn new(config_dir: PathBuf) -> Self {
        let config_file = config_dir.join("config.json");
        Self { config_dir, config_file }
    }

    /// Get default config directory
    pub fn default_config_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("simcheck"))
    }

    /// Ensure config directory exists
    pub fn ensure_dir(&self) -> Result<(), String> {
        fs::create_dir_all(&self.config_dir)
            .map_err(|e| format!("Failed to create config dir: {}", e))
    }

    /// Load configuration from file
    pub fn load(&self) -> Result<AppConfig, String> {
        if !self.config_file.exists() {
            return Ok(AppConfig::default());
        }

        let content = fs::read_to_string(&self.config_file)
            .map_err(|e| format!("Failed to read config: {}", e))?;

        serde_json::from_str(&content)
            .map_err(|e| format!("Failed to parse config: {}", e))
    }

    /// Save configuration to file
    pub fn save(&self, config: &AppConfig) -> Result<(), String> {
        self.ensure_dir()?;

        if self.config_file.exists() {
            self.create_backup()?;
        }

        let content = serde_json::to_string_pretty(config)
            .map_err(|e| format!("Failed to serialize config: {}", e))?;

        fs::write(&self.config_file, content)
            .map_err(|e| format!("Failed to write config: {}", e))
    }

    fn create_backup(&self) -> Result<(), String> {
        let backup_dir = self.config_dir.join("backups");
        fs::create_dir_all(&backup_dir)
            .map_err(|e| format!("Failed to create backup dir: {}", e))?;

        let timestamp = chrono::Utc::now().format("%Y%m%d_%H%M%S%.3f");
        let backup_file = backup_dir.join(format!("config_{}.json", timestamp));

        fs::copy(&self.config_file, &backup_file)
            .map_err(|e| format!("Failed to create backup: {}", e))?;

        // Keep only last 10 backups
        self.cleanup_old_backups(&backup_dir, 10)
    }

    fn cleanup_old_backups(&self, backup_dir: &Path, keep: usize) -> Result<(), String> {
        let mut entries: Vec<_> = fs::read_dir(backup_dir)
            .map_err(|e| format!("Failed to read backup dir: {}", e))?
            .filter_map(|e| e.ok())
            .filter(|e| e.path().extension().is_some_and(|ext| ext == "json"))
            .collect();

        if entries.len() <= keep {
            return Ok(());
        }

        entries.sort_by_key(|e| {
            e.metadata()
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        });

        for entry in entries.iter().take(entries.len() - keep) {
            let _ = fs::remove_file(entry.path());
        }

        Ok(())
    }

    /// Store search credentials in the config file
    pub fn set_search_credentials(&self, api_key: &str, search_engine_id: &str) -> Result<(), String> {
        let mut config = self.load()?;
        config.search.api_key = Some(api_key.to_string());
        config.search.search_engine_id = Some(search_engine_id.to_string());
        self.save(&config)
    }

    /// Remove search credentials from the config file
    pub fn clear_search_credentials(&self) -> Result<(), String> {
        let mut config = self.load()?;
        config.search.api_key = None;
        config.search.search_engine_id = None;
        self.save(&config)
    }
}
