// Simcheck Data Models
// Transient value objects returned by the similarity and detection engines

use serde::{Deserialize, Serialize};
use std::fmt;

// ============ External Source Similarity ============

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceCandidate {
    pub title: String,
    pub url: String,
    pub snippet: String,
    /// 0-100, two decimals.
    pub similarity: f64,
    #[serde(default)]
    pub matching_segments: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SimilarityReport {
    pub overall_similarity: f64,
    /// Top sources, highest similarity first.
    pub sources: Vec<SourceCandidate>,
    /// Number of retained sources before truncation.
    pub total_sources: usize,
    pub all_matches: Vec<String>,
    pub highlighted_text: String,
}

impl SimilarityReport {
    /// Report for a query that produced no search results.
    pub fn empty(text: &str) -> Self {
        Self {
            overall_similarity: 0.0,
            sources: vec![],
            total_sources: 0,
            all_matches: vec![],
            highlighted_text: text.to_string(),
        }
    }
}

/// Outcome of a web-similarity lookup.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "camelCase")]
pub enum ExternalCheck {
    /// Search credentials are not configured.
    Disabled,
    /// The search provider could not be reached or answered badly.
    Unavailable { reason: String },
    Found(SimilarityReport),
}

impl ExternalCheck {
    pub fn report(&self) -> Option<&SimilarityReport> {
        match self {
            ExternalCheck::Found(report) => Some(report),
            _ => None,
        }
    }

    /// Collapse to the single "absent" signal.
    pub fn into_report(self) -> Option<SimilarityReport> {
        match self {
            ExternalCheck::Found(report) => Some(report),
            _ => None,
        }
    }

    pub fn is_disabled(&self) -> bool {
        matches!(self, ExternalCheck::Disabled)
    }
}

// ============ AI Detection ============

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConfidenceBand {
    Low,
    Medium,
    High,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::Low => "low",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::High => "high",
        }
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentScores {
    /// 0-100, higher is more human-like.
    pub perplexity: f64,
    pub pattern_count: usize,
    /// 0-100, higher is more uniform.
    pub uniformity: f64,
    pub avg_sentence_length: f64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AiIndicator {
    pub phrase: String,
    pub context: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AiDetectionReport {
    pub ai_probability: f64,
    /// Always `100 - ai_probability`.
    pub human_probability: f64,
    pub confidence: ConfidenceBand,
    pub component_scores: ComponentScores,
    pub message: String,
    pub indicators: Vec<AiIndicator>,
    pub highlighted_text: String,
}

// ============ Plagiarism Check ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismRequest {
    pub text1: String,
    pub text2: String,
    #[serde(default)]
    pub check_external: bool,
    #[serde(default)]
    pub check_ai: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextMetadata {
    /// Length in characters.
    pub length: usize,
    pub word_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlagiarismResult {
    pub request_id: String,
    pub checked_at: String,
    pub similarity_score: f64,
    pub text1_metadata: TextMetadata,
    pub text2_metadata: TextMetadata,
    /// Higher of the two per-text external similarities, when either ran.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_similarity: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_text1: Option<ExternalCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_text2: Option<ExternalCheck>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_detection: Option<AiDetectionReport>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_detection_text2: Option<AiDetectionReport>,
    pub message: String,
}

// ============ Corpus Search ============

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusEntry {
    pub id: String,
    #[serde(default)]
    pub text1: String,
    #[serde(default)]
    pub text2: String,
    #[serde(default)]
    pub label: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusMatch {
    pub entry_id: String,
    pub similarity_score: f64,
    pub label: String,
    pub matched_text_preview: String,
    pub text1_preview: String,
    pub text2_preview: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CorpusSearchResult {
    pub matches_found: usize,
    pub matches: Vec<CorpusMatch>,
    pub highest_similarity: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_external_check_collapses_to_option() {
        assert!(ExternalCheck::Disabled.into_report().is_none());
        assert!(ExternalCheck::Unavailable {
            reason: "timeout".to_string()
        }
        .into_report()
        .is_none());

        let found = ExternalCheck::Found(SimilarityReport::empty("text"));
        assert_eq!(found.report().map(|r| r.total_sources), Some(0));
        assert_eq!(
            found.into_report().map(|r| r.highlighted_text),
            Some("text".to_string())
        );
    }

    #[test]
    fn test_external_check_serialization_is_tagged() {
        let json = serde_json::to_value(ExternalCheck::Unavailable {
            reason: "HTTP 503".to_string(),
        })
        .unwrap();
        assert_eq!(json["status"], "unavailable");
        assert_eq!(json["reason"], "HTTP 503");

        let json = serde_json::to_value(ExternalCheck::Found(SimilarityReport::empty("x"))).unwrap();
        assert_eq!(json["status"], "found");
        assert_eq!(json["overallSimilarity"], 0.0);
    }

    #[test]
    fn test_confidence_band_serializes_lowercase() {
        let json = serde_json::to_string(&ConfidenceBand::Medium).unwrap();
        assert_eq!(json, "\"medium\"");
        assert_eq!(ConfidenceBand::High.to_string(), "high");
    }
}
