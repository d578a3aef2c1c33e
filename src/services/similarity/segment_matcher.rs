// Segment Matcher
// Word-aligned runs shared verbatim (case-insensitive) by two texts
//
// Every (i, j) start pair is extended greedily, so the cost is
// O(|original words| x |source words| x run length). Inputs are expected to
// be a document against short search snippets or two bounded documents.

use crate::services::text_processor::tokenize_with_spans;

pub const DEFAULT_MIN_WORDS: usize = 3;

/// Find every run of at least `min_words` identical words (case-insensitive)
/// that appears in both texts.
///
/// Each phrase is the verbatim slice of `original` covering the run, so its
/// casing and inner spacing come from `original`. Phrases whose lowercase form
/// was already collected are skipped; order follows the scan order.
pub fn match_segments(original: &str, source: &str, min_words: usize) -> Vec<String> {
    let min_words = min_words.max(1);
    let original_spans = tokenize_with_spans(original);
    let original_words: Vec<String> = original_spans.iter().map(|s| s.word.to_lowercase()).collect();
    let source_words: Vec<String> = source
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect();

    let mut matches: Vec<String> = Vec::new();
    let mut seen_lower: Vec<String> = Vec::new();

    for i in 0..original_words.len() {
        for j in 0..source_words.len() {
            let mut run = 0usize;
            while i + run < original_words.len()
                && j + run < source_words.len()
                && original_words[i + run] == source_words[j + run]
            {
                run += 1;
            }

            if run < min_words {
                continue;
            }

            let start = original_spans[i].start;
            let end = original_spans[i + run - 1].end;
            let phrase = &original[start..end];
            let lowered = phrase.to_lowercase();
            if !seen_lower.contains(&lowered) {
                seen_lower.push(lowered);
                matches.push(phrase.to_string());
            }
        }
    }

    matches
}

/// Append `incoming` phrases to `acc`, skipping any whose lowercase form is
/// already present. First-seen casing and order win.
pub fn merge_unique_case_insensitive(acc: &mut Vec<String>, incoming: &[String]) {
    for phrase in incoming {
        let lowered = phrase.to_lowercase();
        if !acc.iter().any(|m| m.to_lowercase() == lowered) {
            acc.push(phrase.clone());
        }
    }
}
