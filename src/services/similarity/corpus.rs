// Corpus Search
// Ranks previously checked text pairs by similarity to a new text

use tracing::info;

use crate::models::{CorpusEntry, CorpusMatch, CorpusSearchResult};
use crate::services::text_processor::truncate_preview;

use super::scorer::similarity;

/// Texts shorter than this (trimmed) are not searched.
pub const MIN_QUERY_CHARS: usize = 50;

const MATCHED_PREVIEW_CHARS: usize = 200;
const ORIGINAL_PREVIEW_CHARS: usize = 100;
const DEFAULT_LABEL: &str = "Text Comparison";

/// Score `text` against both sides of every entry, keeping those at or above
/// `min_similarity`, best first.
pub fn search_corpus(text: &str, entries: &[CorpusEntry], min_similarity: f64) -> CorpusSearchResult {
    if text.trim().chars().count() < MIN_QUERY_CHARS {
        info!("[CORPUS] Query text too short, skipping search");
        return CorpusSearchResult::default();
    }

    let mut matches: Vec<CorpusMatch> = entries
        .iter()
        .filter_map(|entry| score_entry(text, entry, min_similarity))
        .collect();

    // stable: ties keep corpus order
    matches.sort_by(|a, b| {
        b.similarity_score
            .partial_cmp(&a.similarity_score)
            .unwrap_or(std::cmp::Ordering::Equal)
    });

    let highest_similarity = matches.first().map(|m| m.similarity_score).unwrap_or(0.0);
    info!(
        "[CORPUS] Searched {} entries, {} above {}%",
        entries.len(),
        matches.len(),
        min_similarity
    );

    CorpusSearchResult {
        matches_found: matches.len(),
        matches,
        highest_similarity,
    }
}

fn score_entry(text: &str, entry: &CorpusEntry, min_similarity: f64) -> Option<CorpusMatch> {
    let score1 = side_similarity(text, &entry.text1);
    let score2 = side_similarity(text, &entry.text2);

    let best = score1.max(score2);
    if best < min_similarity {
        return None;
    }

    let matched = if score1 > score2 { &entry.text1 } else { &entry.text2 };
    let label = entry
        .label
        .as_deref()
        .filter(|l| !l.trim().is_empty())
        .unwrap_or(DEFAULT_LABEL);

    Some(CorpusMatch {
        entry_id: entry.id.clone(),
        similarity_score: best,
        label: label.to_string(),
        matched_text_preview: truncate_preview(matched, MATCHED_PREVIEW_CHARS),
        text1_preview: truncate_preview(&entry.text1, ORIGINAL_PREVIEW_CHARS),
        text2_preview: truncate_preview(&entry.text2, ORIGINAL_PREVIEW_CHARS),
    })
}

fn side_similarity(text: &str, side: &str) -> f64 {
    if side.trim().is_empty() {
        return 0.0;
    }
    similarity(text, side)
}
