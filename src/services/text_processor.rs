// Text Processing Service
// Normalization, word spans and sentence splitting shared by every analyzer

use regex::Regex;
use std::sync::OnceLock;

/// Collapse every whitespace run to a single space, trim, and lowercase.
pub fn normalize_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// A whitespace-delimited word together with its byte span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WordSpan<'a> {
    pub word: &'a str,
    /// UTF-8 byte offset (0-based) of the first byte of the word.
    pub start: usize,
    /// UTF-8 byte offset (0-based, end-exclusive).
    pub end: usize,
}

/// Split on whitespace while recording where every word sits in `text`.
///
/// Separators of any width (tabs, newlines, repeated spaces) are skipped, so
/// slicing `text[first.start..last.end]` always yields the verbatim run of
/// words including whatever separated them.
pub fn tokenize_with_spans(text: &str) -> Vec<WordSpan<'_>> {
    let mut spans = Vec::new();
    let mut word_start: Option<usize> = None;

    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if let Some(start) = word_start.take() {
                spans.push(WordSpan {
                    word: &text[start..idx],
                    start,
                    end: idx,
                });
            }
        } else if word_start.is_none() {
            word_start = Some(idx);
        }
    }

    if let Some(start) = word_start {
        spans.push(WordSpan {
            word: &text[start..],
            start,
            end: text.len(),
        });
    }

    spans
}

fn sentence_boundary_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[.!?]+").expect("sentence boundary regex"))
}

/// Split on runs of `.`, `!` or `?`; returns trimmed, non-empty sentences.
pub fn split_sentences(text: &str) -> Vec<&str> {
    if text.is_empty() {
        return vec![];
    }

    sentence_boundary_re()
        .split(text)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Like `split_sentences`, but each piece keeps its surrounding whitespace.
/// Pieces that are blank once trimmed are dropped.
pub fn split_sentences_untrimmed(text: &str) -> Vec<&str> {
    sentence_boundary_re()
        .split(text)
        .filter(|s| !s.trim().is_empty())
        .collect()
}

/// Number of whitespace-delimited words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

/// First `max_chars` characters, with `...` appended when anything was cut.
pub fn truncate_preview(text: &str, max_chars: usize) -> String {
    let mut out: String = text.chars().take(max_chars).collect();
    if text.chars().count() > max_chars {
        out.push_str("...");
    }
    out
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_text_collapses_whitespace_and_case() {
        assert_eq!(normalize_text("  Hello \t\n  World  "), "hello world");
        assert_eq!(normalize_text(""), "");
        assert_eq!(normalize_text(" \n\t "), "");
    }

    #[test]
    fn test_normalize_text_is_idempotent() {
        let once = normalize_text("The  Quick\nBrown Fox");
        assert_eq!(normalize_text(&once), once);
    }

    #[test]
    fn test_tokenize_with_spans_tracks_irregular_separators() {
        let text = "  one\ttwo   three\n";
        let spans = tokenize_with_spans(text);
        assert_eq!(spans.len(), 3);
        assert_eq!(spans[0].word, "one");
        assert_eq!(&text[spans[0].start..spans[0].end], "one");
        assert_eq!(&text[spans[1].start..spans[2].end], "two   three");
    }

    #[test]
    fn test_tokenize_with_spans_multibyte() {
        let text = "café au lait";
        let spans = tokenize_with_spans(text);
        assert_eq!(spans[0].word, "café");
        assert_eq!(spans[1].start, "café ".len());
        assert_eq!(spans[2].end, text.len());
    }

    #[test]
    fn test_split_sentences() {
        let sentences = split_sentences("First one. Second?! Third...  ");
        assert_eq!(sentences, vec!["First one", "Second", "Third"]);
        assert!(split_sentences("").is_empty());
        assert!(split_sentences("...!?").is_empty());
    }

    #[test]
    fn test_split_sentences_untrimmed_keeps_padding() {
        let sentences = split_sentences_untrimmed("First one. Second?!  \n ");
        assert_eq!(sentences, vec!["First one", " Second"]);
    }

    #[test]
    fn test_truncate_preview() {
        assert_eq!(truncate_preview("short", 10), "short");
        assert_eq!(truncate_preview("abcdef", 3), "abc...");
        assert_eq!(truncate_preview("ééééé", 2), "éé...");
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(33.3333), 33.33);
        assert_eq!(round2(66.666), 66.67);
        assert_eq!(round2(100.0), 100.0);
    }
}
