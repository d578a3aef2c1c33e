// Plagiarism Check
// Pairwise comparison with optional web-source and AI-content checks

use thiserror::Error;
use tracing::info;

use crate::models::{ExternalCheck, PlagiarismRequest, PlagiarismResult, TextMetadata};
use crate::services::detection::detect_ai;
use crate::services::search_provider::SearchProvider;
use crate::services::text_processor::word_count;

use super::external::ExternalSimilarityChecker;
use super::scorer::similarity;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum PlagiarismError {
    #[error("Both text inputs are required")]
    MissingInput,
}

/// Compare two texts, optionally checking each against web sources and for
/// AI-typical writing.
///
/// The two web checks run concurrently; each fails open on its own.
pub async fn check_plagiarism<P: SearchProvider>(
    request: &PlagiarismRequest,
    checker: &ExternalSimilarityChecker<P>,
) -> Result<PlagiarismResult, PlagiarismError> {
    if request.text1.trim().is_empty() || request.text2.trim().is_empty() {
        return Err(PlagiarismError::MissingInput);
    }

    let similarity_score = similarity(&request.text1, &request.text2);
    info!("[PLAGIARISM] Pairwise similarity={}%", similarity_score);

    let (external_text1, external_text2) = if request.check_external {
        let (first, second) = tokio::join!(
            checker.check(&request.text1),
            checker.check(&request.text2)
        );
        (Some(first), Some(second))
    } else {
        (None, None)
    };

    let external_similarity = [external_text1.as_ref(), external_text2.as_ref()]
        .into_iter()
        .flatten()
        .filter_map(ExternalCheck::report)
        .map(|r| r.overall_similarity)
        .reduce(f64::max);

    let (ai_detection, ai_detection_text2) = if request.check_ai {
        (Some(detect_ai(&request.text1)), Some(detect_ai(&request.text2)))
    } else {
        (None, None)
    };

    Ok(PlagiarismResult {
        request_id: uuid::Uuid::new_v4().to_string(),
        checked_at: chrono::Utc::now().to_rfc3339(),
        similarity_score,
        text1_metadata: text_metadata(&request.text1),
        text2_metadata: text_metadata(&request.text2),
        external_similarity,
        external_text1,
        external_text2,
        ai_detection,
        ai_detection_text2,
        message: similarity_verdict(similarity_score).to_string(),
    })
}

pub fn text_metadata(text: &str) -> TextMetadata {
    TextMetadata {
        length: text.chars().count(),
        word_count: word_count(text),
    }
}

/// Verdict for a pairwise similarity score.
pub fn similarity_verdict(score: f64) -> &'static str {
    if score >= 80.0 {
        "High similarity detected - Likely plagiarism"
    } else if score >= 50.0 {
        "Moderate similarity detected - Review recommended"
    } else {
        "Low similarity - Content appears original"
    }
}

/// Verdict for a single text checked against online sources.
pub fn external_verdict(similarity: f64) -> &'static str {
    if similarity >= 80.0 {
        "High similarity with online sources - Potential plagiarism detected"
    } else if similarity >= 50.0 {
        "Moderate similarity with online sources - Review recommended"
    } else if similarity > 0.0 {
        "Low similarity with online sources - Mostly original content"
    } else {
        "No similar content found online - Content appears original"
    }
}
