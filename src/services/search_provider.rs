// Search Provider Service
// Web search collaborator used by the external-source similarity check

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

use super::config_store::{ConfigStore, SearchConfig};

pub const GOOGLE_SEARCH_DEFAULT_URL: &str = "https://www.googleapis.com/customsearch/v1";

#[derive(Error, Debug)]
pub enum SearchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },
    #[error("JSON parse error: {0}")]
    Json(String),
    #[error("search credentials not configured")]
    MissingCredentials,
}

/// A single ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchItem {
    pub title: String,
    pub url: String,
    pub snippet: String,
}

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Up to `num` ranked results for `query`.
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchItem>, SearchError>;
}

#[derive(Debug, Deserialize)]
struct GoogleSearchResponse {
    #[serde(default)]
    items: Vec<GoogleSearchItem>,
}

#[derive(Debug, Deserialize)]
struct GoogleSearchItem {
    title: Option<String>,
    link: Option<String>,
    snippet: Option<String>,
}

impl From<GoogleSearchItem> for SearchItem {
    fn from(item: GoogleSearchItem) -> Self {
        Self {
            title: item.title.unwrap_or_else(|| "Unknown".to_string()),
            url: item.link.unwrap_or_default(),
            snippet: item.snippet.unwrap_or_default(),
        }
    }
}

/// Google Custom Search JSON API client.
pub struct GoogleSearchClient {
    client: Client,
    endpoint: String,
    api_key: String,
    search_engine_id: String,
}

impl GoogleSearchClient {
    pub fn new(api_key: &str, search_engine_id: &str, timeout: Duration) -> Self {
        Self::with_endpoint(GOOGLE_SEARCH_DEFAULT_URL, api_key, search_engine_id, timeout)
    }

    pub fn with_endpoint(endpoint: &str, api_key: &str, search_engine_id: &str, timeout: Duration) -> Self {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .unwrap_or_default();

        Self {
            client,
            endpoint: endpoint.to_string(),
            api_key: api_key.to_string(),
            search_engine_id: search_engine_id.to_string(),
        }
    }

    /// Build a client from config; `None` when either credential is blank.
    pub fn from_config(config: &SearchConfig) -> Option<Self> {
        let (api_key, engine_id) = config.credentials()?;
        Some(Self::with_endpoint(
            &config.endpoint,
            api_key,
            engine_id,
            Duration::from_secs(config.timeout_secs),
        ))
    }
}

#[async_trait]
impl SearchProvider for GoogleSearchClient {
    async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchItem>, SearchError> {
        if self.api_key.trim().is_empty() || self.search_engine_id.trim().is_empty() {
            return Err(SearchError::MissingCredentials);
        }

        let preview: String = query.chars().take(50).collect();
        info!("[SEARCH] Querying Google: {}...", preview);

        let num = num.to_string();
        let start = Instant::now();

        let response = self
            .client
            .get(&self.endpoint)
            .query(&[
                ("key", self.api_key.as_str()),
                ("cx", self.search_engine_id.as_str()),
                ("q", query),
                ("num", num.as_str()),
            ])
            .send()
            .await?;

        let latency_ms = start.elapsed().as_millis() as i64;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SearchError::Api {
                status: status.as_u16(),
                message: body,
            });
        }

        let data: GoogleSearchResponse = response
            .json()
            .await
            .map_err(|e| SearchError::Json(e.to_string()))?;

        debug!("[SEARCH] latency_ms={} items={}", latency_ms, data.items.len());
        Ok(data.items.into_iter().map(SearchItem::from).collect())
    }
}

fn first_env(keys: &[&str]) -> Option<String> {
    keys.iter()
        .filter_map(|k| env::var(k).ok())
        .map(|v| v.trim().to_string())
        .find(|v| !v.is_empty())
}

/// Fill search credentials from the environment, falling back to the config file.
pub fn resolve_search_credentials(mut config: SearchConfig) -> SearchConfig {
    if let Some(key) = first_env(&["GOOGLE_API_KEY", "SIMCHECK_GOOGLE_API_KEY"]) {
        config.api_key = Some(key);
    }
    if let Some(cx) = first_env(&["GOOGLE_SEARCH_ENGINE_ID", "SIMCHECK_GOOGLE_SEARCH_ENGINE_ID"]) {
        config.search_engine_id = Some(cx);
    }

    if config.credentials().is_none() {
        if let Some(config_dir) = ConfigStore::default_config_dir() {
            config = fill_from_store(config, &ConfigStore::new(config_dir));
        }
    }

    config
}

/// Fill missing credentials from the stored config; a broken file is logged
/// and leaves `config` untouched.
fn fill_from_store(mut config: SearchConfig, store: &ConfigStore) -> SearchConfig {
    match store.load() {
        Ok(stored) => {
            config.api_key = config.api_key.or(stored.search.api_key);
            config.search_engine_id = config.search_engine_id.or(stored.search.search_engine_id);
        }
        Err(e) => warn!("[SEARCH] Ignoring stored credentials: {}", e),
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_google_item_defaults() {
        let item: GoogleSearchItem = serde_json::from_str("{}").unwrap();
        let item = SearchItem::from(item);
        assert_eq!(item.title, "Unknown");
        assert_eq!(item.url, "");
        assert_eq!(item.snippet, "");
    }

    #[test]
    fn test_google_response_without_items() {
        let data: GoogleSearchResponse =
            serde_json::from_str(r#"{"kind":"customsearch#search"}"#).unwrap();
        assert!(data.items.is_empty());
    }

    fn temp_store(tag: &str) -> (ConfigStore, std::path::PathBuf) {
        let dir = std::env::temp_dir().join(format!("simcheck_search_{}_{}", tag, uuid::Uuid::new_v4()));
        (ConfigStore::new(dir.clone()), dir)
    }

    #[test]
    fn test_fill_from_store_keeps_explicit_values() {
        let (store, dir) = temp_store("fill");
        store.set_search_credentials("stored-key", "stored-cx").unwrap();

        let config = SearchConfig {
            api_key: Some("env-key".to_string()),
            ..SearchConfig::default()
        };
        let filled = fill_from_store(config, &store);
        assert_eq!(filled.credentials(), Some(("env-key", "stored-cx")));

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_fill_from_store_survives_corrupt_file() {
        let (store, dir) = temp_store("corrupt");
        store.ensure_dir().unwrap();
        std::fs::write(dir.join("config.json"), "{ not json").unwrap();

        let config = SearchConfig {
            api_key: Some("env-key".to_string()),
            ..SearchConfig::default()
        };
        let filled = fill_from_store(config, &store);
        assert_eq!(filled.api_key.as_deref(), Some("env-key"));
        assert!(filled.search_engine_id.is_none());

        let _ = std::fs::remove_dir_all(dir);
    }

    #[test]
    fn test_client_from_config_requires_both_credentials() {
        let mut config = SearchConfig::default();
        assert!(GoogleSearchClient::from_config(&config).is_none());

        config.api_key = Some("key".to_string());
        config.search_engine_id = Some("  ".to_string());
        assert!(GoogleSearchClient::from_config(&config).is_none());

        config.search_engine_id = Some("cx".to_string());
        let client = GoogleSearchClient::from_config(&config).unwrap();
        assert!(client.endpoint.contains("googleapis.com"));
    }

    #[tokio::test]
    async fn test_blank_credentials_fail_before_network() {
        let client = GoogleSearchClient::new("", "cx", Duration::from_secs(1));
        let err = client.search("anything", 10).await.unwrap_err();
        assert!(matches!(err, SearchError::MissingCredentials));
    }
}
