// Detection Signals
// The three independent heuristics combined by the AI detector

use crate::models::AiIndicator;
use crate::services::text_processor::{split_sentences, split_sentences_untrimmed};

use super::phrases::AI_PHRASES;

/// Inputs with fewer words than this get a neutral perplexity score.
const MIN_WORDS_FOR_PERPLEXITY: usize = 10;
const NEUTRAL_PERPLEXITY: f64 = 50.0;

const DIVERSITY_SCALE: f64 = 60.0;
const DIVERSITY_CAP: f64 = 30.0;

/// Uniformity needs at least this many sentences to be meaningful.
const MIN_SENTENCES_FOR_STRUCTURE: usize = 3;
const NEUTRAL_UNIFORMITY: f64 = 50.0;

const CONTEXT_MAX_CHARS: usize = 100;

/// Sentence-length statistics behind the uniformity signal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SentenceStructure {
    /// 0-100, higher means more uniform sentence lengths.
    pub uniformity: f64,
    /// Mean words per sentence; 0 when too few sentences.
    pub avg_length: f64,
    pub variance: f64,
}

/// Perplexity-like score in 0-100; higher reads as more human.
///
/// Sum of four banded components: lexical diversity (up to 30), average
/// word length (10/15/20), average sentence length (10/20/30) and
/// burstiness of sentence lengths (10/15/20, only with two or more
/// sentences).
pub fn perplexity_score(text: &str) -> f64 {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered.split_whitespace().collect();
    if words.len() < MIN_WORDS_FOR_PERPLEXITY {
        return NEUTRAL_PERPLEXITY;
    }

    let total_words = words.len() as f64;
    let unique_words = {
        let mut seen: Vec<&str> = words.clone();
        seen.sort_unstable();
        seen.dedup();
        seen.len() as f64
    };
    let avg_word_length =
        words.iter().map(|w| w.chars().count()).sum::<usize>() as f64 / total_words;

    let sentences = split_sentences(text);
    let avg_sentence_length = total_words / sentences.len().max(1) as f64;

    let mut score = (unique_words / total_words * DIVERSITY_SCALE).min(DIVERSITY_CAP);
    score += word_length_points(avg_word_length);
    score += sentence_length_points(avg_sentence_length);

    if sentences.len() > 1 {
        // spread is measured around the document-wide words-per-sentence
        let lengths: Vec<f64> = sentences.iter().map(|s| s.split_whitespace().count() as f64).collect();
        score += burstiness_points(variance_around(&lengths, avg_sentence_length));
    }

    score.clamp(0.0, 100.0)
}

fn word_length_points(avg: f64) -> f64 {
    if (4.0..=6.0).contains(&avg) {
        20.0
    } else if (3.0..=7.0).contains(&avg) {
        15.0
    } else {
        10.0
    }
}

fn sentence_length_points(avg: f64) -> f64 {
    if (15.0..=25.0).contains(&avg) {
        30.0
    } else if (10.0..=30.0).contains(&avg) {
        20.0
    } else {
        10.0
    }
}

fn burstiness_points(variance: f64) -> f64 {
    if variance > 20.0 {
        20.0
    } else if variance > 10.0 {
        15.0
    } else {
        10.0
    }
}

fn variance_around(values: &[f64], mean: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64
}

/// Vocabulary phrases present in `text`, in vocabulary order.
///
/// Each indicator carries the first sentence containing the phrase, trimmed
/// and cut to 100 characters.
pub fn detect_patterns(text: &str) -> Vec<AiIndicator> {
    let lowered = text.to_lowercase();
    let sentences = split_sentences_untrimmed(text);

    AI_PHRASES
        .iter()
        .filter(|phrase| lowered.contains(*phrase))
        .filter_map(|phrase| {
            sentences
                .iter()
                .find(|s| s.to_lowercase().contains(phrase))
                .map(|sentence| AiIndicator {
                    phrase: phrase.to_string(),
                    context: indicator_context(sentence),
                })
        })
        .collect()
}

/// Trimmed sentence, cut to 100 characters. The ellipsis is decided on the
/// untrimmed length, so leading whitespace after a boundary counts.
fn indicator_context(sentence: &str) -> String {
    let trimmed = sentence.trim();
    if sentence.chars().count() > CONTEXT_MAX_CHARS {
        let mut context: String = trimmed.chars().take(CONTEXT_MAX_CHARS).collect();
        context.push_str("...");
        context
    } else {
        trimmed.to_string()
    }
}

/// Sentence-length uniformity; neutral below three sentences.
pub fn sentence_structure(text: &str) -> SentenceStructure {
    let sentences = split_sentences(text);
    if sentences.len() < MIN_SENTENCES_FOR_STRUCTURE {
        return SentenceStructure {
            uniformity: NEUTRAL_UNIFORMITY,
            avg_length: 0.0,
            variance: 0.0,
        };
    }

    let lengths: Vec<f64> = sentences.iter().map(|s| s.split_whitespace().count() as f64).collect();
    let avg_length = lengths.iter().sum::<f64>() / lengths.len() as f64;
    let variance = variance_around(&lengths, avg_length);

    SentenceStructure {
        uniformity: 100.0 - (variance * 2.0).min(100.0),
        avg_length,
        variance,
    }
}
