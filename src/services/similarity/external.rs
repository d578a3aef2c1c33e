// External Source Similarity
// Scores a text against web search snippets and aggregates the overlap
//
// Search failures are fail-open: they surface as `ExternalCheck::Unavailable`
// and are never retried.

use tracing::{info, warn};

use crate::models::{ExternalCheck, SimilarityReport, SourceCandidate};
use crate::services::config_store::{MatchingConfig, SearchConfig};
use crate::services::search_provider::{GoogleSearchClient, SearchItem, SearchProvider};
use crate::services::text_processor::normalize_text;

use super::highlighter::highlight;
use super::scorer::similarity;
use super::segment_matcher::{match_segments, merge_unique_case_insensitive};

/// Runs web-similarity checks with an explicitly supplied configuration.
pub struct ExternalSimilarityChecker<P: SearchProvider> {
    provider: Option<P>,
    search: SearchConfig,
    matching: MatchingConfig,
}

impl ExternalSimilarityChecker<GoogleSearchClient> {
    /// Google-backed checker; disabled when the config carries no credentials.
    pub fn from_config(search: SearchConfig, matching: MatchingConfig) -> Self {
        let provider = GoogleSearchClient::from_config(&search);
        Self {
            provider,
            search,
            matching,
        }
    }
}

impl<P: SearchProvider> ExternalSimilarityChecker<P> {
    pub fn new(provider: P, search: SearchConfig, matching: MatchingConfig) -> Self {
        Self {
            provider: Some(provider),
            search,
            matching,
        }
    }

    /// A checker that always reports `Disabled`.
    pub fn disabled() -> Self {
        Self {
            provider: None,
            search: SearchConfig::default(),
            matching: MatchingConfig::default(),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.provider.is_some()
    }

    pub async fn check(&self, text: &str) -> ExternalCheck {
        let Some(provider) = self.provider.as_ref() else {
            info!("[EXTERNAL] Search provider not configured, skipping");
            return ExternalCheck::Disabled;
        };

        let query = build_query(text, self.search.query_chars);
        let items = match provider.search(&query, self.search.num_results).await {
            Ok(items) => items,
            Err(e) => {
                warn!("[EXTERNAL] Search failed, treating as no evidence: {}", e);
                return ExternalCheck::Unavailable {
                    reason: e.to_string(),
                };
            }
        };

        info!("[EXTERNAL] Search returned {} results", items.len());
        ExternalCheck::Found(build_report(
            text,
            &items,
            self.matching.min_words,
            self.matching.max_sources,
        ))
    }
}

/// Leading `max_chars` characters of the normalized text.
pub fn build_query(text: &str, max_chars: usize) -> String {
    normalize_text(text).chars().take(max_chars).collect()
}

/// Score `text` against every search hit and assemble the ranked report.
pub fn build_report(
    text: &str,
    items: &[SearchItem],
    min_words: usize,
    max_sources: usize,
) -> SimilarityReport {
    if items.is_empty() {
        return SimilarityReport::empty(text);
    }

    let mut sources: Vec<SourceCandidate> = Vec::new();
    let mut all_matches: Vec<String> = Vec::new();
    let mut max_similarity: f64 = 0.0;

    for item in items {
        let score = similarity(text, &item.snippet);
        let segments = match_segments(text, &item.snippet, min_words);

        let title_preview: String = item.title.chars().take(50).collect();
        info!(
            "[EXTERNAL] Source: {}... similarity={}% matches={}",
            title_preview,
            score,
            segments.len()
        );

        if score <= 0.0 && segments.is_empty() {
            continue;
        }

        merge_unique_case_insensitive(&mut all_matches, &segments);
        max_similarity = max_similarity.max(score);
        sources.push(SourceCandidate {
            title: item.title.clone(),
            url: item.url.clone(),
            snippet: item.snippet.clone(),
            similarity: score,
            matching_segments: segments,
        });
    }

    // stable: ties keep search-result order
    sources.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    let total_sources = sources.len();
    sources.truncate(max_sources);

    info!("[EXTERNAL] Highlighting {} matching segments", all_matches.len());
    let highlighted_text = highlight(text, &all_matches);

    SimilarityReport {
        overall_similarity: max_similarity,
        sources,
        total_sources,
        all_matches,
        highlighted_text,
    }
}

/// Google-backed check with explicit credentials; `None` when credentials
/// are missing or the search could not be completed.
pub async fn check_external_similarity(
    text: &str,
    api_key: Option<&str>,
    search_engine_id: Option<&str>,
) -> Option<SimilarityReport> {
    let search = SearchConfig {
        api_key: api_key.map(str::to_string),
        search_engine_id: search_engine_id.map(str::to_string),
        ..SearchConfig::default()
    };
    ExternalSimilarityChecker::from_config(search, MatchingConfig::default())
        .check(text)
        .await
        .into_report()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::services::search_provider::SearchError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Canned search results; records every query it receives.
    pub(crate) struct StubSearch {
        pub(crate) result: Result<Vec<SearchItem>, u16>,
        pub(crate) queries: Mutex<Vec<(String, u32)>>,
    }

    impl StubSearch {
        pub(crate) fn with_items(items: Vec<SearchItem>) -> Self {
            Self {
                result: Ok(items),
                queries: Mutex::new(vec![]),
            }
        }

        pub(crate) fn failing(status: u16) -> Self {
            Self {
                result: Err(status),
                queries: Mutex::new(vec![]),
            }
        }
    }

    #[async_trait]
    impl SearchProvider for StubSearch {
        async fn search(&self, query: &str, num: u32) -> Result<Vec<SearchItem>, SearchError> {
            self.queries.lock().unwrap().push((query.to_string(), num));
            match &self.result {
                Ok(items) => Ok(items.clone()),
                Err(status) => Err(SearchError::Api {
                    status: *status,
                    message: "stub failure".to_string(),
                }),
            }
        }
    }

    pub(crate) fn item(title: &str, snippet: &str) -> SearchItem {
        SearchItem {
            title: title.to_string(),
            url: format!("https://example.com/{}", title.to_lowercase().replace(' ', "-")),
            snippet: snippet.to_string(),
        }
    }

    fn checker(stub: StubSearch) -> ExternalSimilarityChecker<StubSearch> {
        ExternalSimilarityChecker::new(stub, SearchConfig::default(), MatchingConfig::default())
    }

    #[test]
    fn test_build_query_uses_normalized_prefix() {
        let text = format!("  Hello\n\nWORLD {}", "x".repeat(200));
        let query = build_query(&text, 100);
        assert_eq!(query.chars().count(), 100);
        assert!(query.starts_with("hello world x"));
    }

    #[tokio::test]
    async fn test_disabled_without_provider() {
        let result = ExternalSimilarityChecker::<StubSearch>::disabled()
            .check("some text")
            .await;
        assert!(result.is_disabled());
    }

    #[tokio::test]
    async fn test_missing_credentials_is_absent() {
        assert!(check_external_similarity("some text", None, Some("cx")).await.is_none());
        assert!(check_external_similarity("some text", Some("  "), Some("cx")).await.is_none());
    }

    #[tokio::test]
    async fn test_provider_failure_is_unavailable() {
        let result = checker(StubSearch::failing(500)).check("some text").await;
        match result {
            ExternalCheck::Unavailable { reason } => assert!(reason.contains("500")),
            other => panic!("expected Unavailable, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_zero_results_returns_empty_report() {
        let text = "An Original text with nothing online.";
        let result = checker(StubSearch::with_items(vec![])).check(text).await;
        let report = result.into_report().unwrap();
        assert_eq!(report.overall_similarity, 0.0);
        assert!(report.sources.is_empty());
        assert!(report.all_matches.is_empty());
        assert_eq!(report.total_sources, 0);
        assert_eq!(report.highlighted_text, text);
    }

    #[tokio::test]
    async fn test_query_and_result_count_forwarded() {
        let stub = StubSearch::with_items(vec![]);
        let checker = checker(stub);
        checker.check("The Quick  brown fox").await;
        let provider = checker.provider.as_ref().unwrap();
        let queries = provider.queries.lock().unwrap();
        assert_eq!(queries.as_slice(), &[("the quick brown fox".to_string(), 10)]);
    }

    #[test]
    fn test_build_report_ranks_and_aggregates() {
        let text = "The quick brown fox jumps over the lazy dog near the river bank";
        let items = vec![
            item("Unrelated", "1234"),
            item("Partial", "a quick brown fox was seen"),
            item("Close", "the quick brown fox jumps over the lazy dog"),
        ];
        let report = build_report(text, &items, 3, 5);

        assert_eq!(report.sources[0].title, "Close");
        assert_eq!(report.overall_similarity, report.sources[0].similarity);
        assert!(report.sources.iter().all(|s| s.similarity > 0.0 || !s.matching_segments.is_empty()));
        assert!(!report.sources.iter().any(|s| s.title == "Unrelated"));
        assert_eq!(report.total_sources, report.sources.len());
        assert!(report.all_matches.contains(&"The quick brown fox jumps over the lazy dog".to_string()));
        assert!(report.highlighted_text.contains("<mark"));

        let lowered: Vec<String> = report.all_matches.iter().map(|m| m.to_lowercase()).collect();
        let mut unique = lowered.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), lowered.len());
    }

    #[test]
    fn test_build_report_truncates_but_counts_all() {
        let text = "alpha beta gamma delta epsilon";
        let items: Vec<SearchItem> = (0..8)
            .map(|i| item(&format!("Source {}", i), &format!("alpha beta gamma {}", "x".repeat(i))))
            .collect();
        let report = build_report(text, &items, 3, 5);
        assert_eq!(report.sources.len(), 5);
        assert_eq!(report.total_sources, 8);
        assert_eq!(report.all_matches, vec!["alpha beta gamma".to_string()]);

        for pair in report.sources.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
    }

    #[test]
    fn test_build_report_ties_keep_search_order() {
        let text = "one two three four";
        let items = vec![
            item("First", "one two three"),
            item("Second", "one two three"),
        ];
        let report = build_report(text, &items, 3, 5);
        assert_eq!(report.sources[0].title, "First");
        assert_eq!(report.sources[1].title, "Second");
    }

    #[test]
    fn test_overall_similarity_uses_all_sources() {
        // max is taken before truncation; with max_sources = 1 the top entry
        // must still carry the overall maximum
        let text = "shared words appear here today";
        let items = vec![
            item("Low", "shared"),
            item("High", "shared words appear here"),
        ];
        let report = build_report(text, &items, 3, 1);
        assert_eq!(report.sources.len(), 1);
        assert_eq!(report.total_sources, 2);
        assert_eq!(report.overall_similarity, report.sources[0].similarity);
    }
}
