// Highlighter
// Wraps matched segments in <mark> spans without letting them overlap

use regex::Regex;
use tracing::debug;

pub const MATCH_MARK_OPEN: &str = r#"<mark class="google-match">"#;
pub const MARK_CLOSE: &str = "</mark>";

/// Matches shorter than this (after trimming) are never highlighted.
const MIN_HIGHLIGHT_CHARS: usize = 3;

/// Mark the first non-overlapping occurrence of each match in `text`.
///
/// Matches are de-duplicated case-insensitively and processed longest first,
/// so a short phrase cannot split a longer one that contains it. Later
/// occurrences of an already-marked phrase stay unmarked.
pub fn highlight(text: &str, matches: &[String]) -> String {
    highlight_with(text, matches, MATCH_MARK_OPEN, MARK_CLOSE)
}

pub fn highlight_with(text: &str, matches: &[String], open: &str, close: &str) -> String {
    if matches.is_empty() {
        return text.to_string();
    }

    let spans = find_highlight_spans(text, matches);
    wrap_spans(text, &spans, open, close)
}

/// Case-insensitive matcher for `phrase` taken literally; `None` when the
/// compiled pattern is rejected (e.g. over the regex size limit).
pub fn literal_matcher(phrase: &str) -> Option<Regex> {
    match Regex::new(&format!("(?i){}", regex::escape(phrase))) {
        Ok(re) => Some(re),
        Err(e) => {
            debug!(
                "[HIGHLIGHT] Skipping phrase ({} chars), pattern rejected: {}",
                phrase.chars().count(),
                e
            );
            None
        }
    }
}

/// Byte spans that would be highlighted, sorted by start offset.
pub fn find_highlight_spans(text: &str, matches: &[String]) -> Vec<(usize, usize)> {
    let mut unique: Vec<&str> = Vec::new();
    let mut seen_lower: Vec<String> = Vec::new();
    for m in matches {
        let lowered = m.to_lowercase();
        if !seen_lower.contains(&lowered) {
            seen_lower.push(lowered);
            unique.push(m.as_str());
        }
    }
    // stable: equal lengths keep first-seen order
    unique.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()));

    let mut consumed: Vec<(usize, usize)> = Vec::new();
    for phrase in unique {
        if phrase.trim().chars().count() < MIN_HIGHLIGHT_CHARS {
            continue;
        }
        let Some(re) = literal_matcher(phrase) else {
            continue;
        };

        let free = re
            .find_iter(text)
            .map(|m| (m.start(), m.end()))
            .find(|&(start, end)| !consumed.iter().any(|&(s, e)| start < e && end > s));
        if let Some(span) = free {
            consumed.push(span);
        }
    }

    consumed.sort_unstable();
    consumed
}

fn wrap_spans(text: &str, spans: &[(usize, usize)], open: &str, close: &str) -> String {
    let mut out = String::with_capacity(text.len() + spans.len() * (open.len() + close.len()));
    let mut cursor = 0;
    for &(start, end) in spans {
        out.push_str(&text[cursor..start]);
        out.push_str(open);
        out.push_str(&text[start..end]);
        out.push_str(close);
        cursor = end;
    }
    out.push_str(&text[cursor..]);
    out
}
