// AI Content Detector
// Combines the lexical, phrase and structure signals into one report

use regex::Captures;
use tracing::{debug, info};

use crate::models::{AiDetectionReport, AiIndicator, ComponentScores, ConfidenceBand};
use crate::services::similarity::highlighter::{literal_matcher, MARK_CLOSE};
use crate::services::text_processor::{normalize_text, round2};

use super::signals::{detect_patterns, perplexity_score, sentence_structure};

pub const AI_MARK_OPEN: &str = r#"<mark class="ai-pattern">"#;

/// Normalized texts shorter than this are not analyzed.
pub const MIN_ANALYZABLE_CHARS: usize = 50;

// Combination weights. Hand-tuned; kept fixed for output parity.
pub const PERPLEXITY_WEIGHT: f64 = 0.5;
pub const PATTERN_WEIGHT: f64 = 0.3;
pub const UNIFORMITY_WEIGHT: f64 = 0.2;
pub const PATTERN_POINTS_PER_HIT: f64 = 10.0;
pub const PATTERN_POINTS_CAP: f64 = 40.0;

const SHORT_TEXT_MESSAGE: &str = "Text too short for accurate analysis";

/// Estimate how likely `text` is machine-generated.
pub fn detect_ai(text: &str) -> AiDetectionReport {
    let normalized_len = normalize_text(text).chars().count();
    if normalized_len < MIN_ANALYZABLE_CHARS {
        debug!("[DETECTOR] Text too short ({} chars), skipping analysis", normalized_len);
        return short_text_report(text);
    }

    let perplexity = perplexity_score(text);
    let indicators = detect_patterns(text);
    let structure = sentence_structure(text);

    let ai_probability = round2(combine(perplexity, indicators.len(), structure.uniformity));
    let human_probability = round2(100.0 - ai_probability);
    let confidence = confidence_band(ai_probability);

    info!(
        "[DETECTOR] ai={} perplexity={:.2} patterns={} uniformity={:.2} confidence={}",
        ai_probability,
        perplexity,
        indicators.len(),
        structure.uniformity,
        confidence
    );

    AiDetectionReport {
        ai_probability,
        human_probability,
        confidence,
        component_scores: ComponentScores {
            perplexity: round2(perplexity),
            pattern_count: indicators.len(),
            uniformity: round2(structure.uniformity),
            avg_sentence_length: round2(structure.avg_length),
        },
        message: verdict_message(ai_probability).to_string(),
        highlighted_text: highlight_phrases(text, &indicators),
        indicators,
    }
}

/// Weighted AI probability in 0-100 from the three raw signals.
pub fn combine(perplexity: f64, pattern_count: usize, uniformity: f64) -> f64 {
    let perplexity_factor = 100.0 - perplexity;
    let pattern_factor = (pattern_count as f64 * PATTERN_POINTS_PER_HIT).min(PATTERN_POINTS_CAP);

    let score = perplexity_factor * PERPLEXITY_WEIGHT
        + pattern_factor * PATTERN_WEIGHT
        + uniformity * UNIFORMITY_WEIGHT;
    score.clamp(0.0, 100.0)
}

/// Confidence is highest at either extreme of the probability scale.
pub fn confidence_band(ai_probability: f64) -> ConfidenceBand {
    if ai_probability > 75.0 || ai_probability < 25.0 {
        ConfidenceBand::High
    } else if ai_probability > 60.0 || ai_probability < 40.0 {
        ConfidenceBand::Medium
    } else {
        ConfidenceBand::Low
    }
}

pub fn verdict_message(ai_probability: f64) -> &'static str {
    if ai_probability >= 70.0 {
        "High likelihood of AI-generated content"
    } else if ai_probability >= 50.0 {
        "Moderate indicators of AI-generated content"
    } else if ai_probability >= 30.0 {
        "Some AI patterns detected, likely human-written"
    } else {
        "Appears to be human-written content"
    }
}

/// Wrap the first case-insensitive occurrence of each indicator phrase.
///
/// Phrases are substituted one after another on the running output with no
/// overlap bookkeeping between them.
fn highlight_phrases(text: &str, indicators: &[AiIndicator]) -> String {
    let mut highlighted = text.to_string();
    for indicator in indicators {
        let Some(re) = literal_matcher(&indicator.phrase) else {
            continue;
        };
        highlighted = re
            .replacen(&highlighted, 1, |caps: &Captures| {
                format!("{}{}{}", AI_MARK_OPEN, &caps[0], MARK_CLOSE)
            })
            .into_owned();
    }
    highlighted
}

fn short_text_report(text: &str) -> AiDetectionReport {
    AiDetectionReport {
        ai_probability: 0.0,
        human_probability: 100.0,
        confidence: ConfidenceBand::Low,
        component_scores: ComponentScores::default(),
        message: SHORT_TEXT_MESSAGE.to_string(),
        indicators: vec![],
        highlighted_text: text.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-6
    }

    const CLICHE_TEXT: &str = "Furthermore, it is important to note that the landscape of modern work is multifaceted. \
Moreover, teams must delve into the intricate realm of remote collaboration. \
In conclusion, a holistic approach will revolutionize the way organizations operate.";

    #[test]
    fn test_short_text_short_circuits() {
        let report = detect_ai("Too short to judge.");
        assert_eq!(report.ai_probability, 0.0);
        assert_eq!(report.human_probability, 100.0);
        assert_eq!(report.confidence, ConfidenceBand::Low);
        assert_eq!(report.message, SHORT_TEXT_MESSAGE);
        assert!(report.indicators.is_empty());
        assert_eq!(report.component_scores, ComponentScores::default());
        assert_eq!(report.highlighted_text, "Too short to judge.");
    }

    #[test]
    fn test_short_text_measured_after_normalization() {
        // padded past 50 raw characters, but only a few real ones
        let padded = format!("{}Moreover, tiny.{}", " ".repeat(30), "\n".repeat(30));
        let report = detect_ai(&padded);
        assert_eq!(report.ai_probability, 0.0);
        assert!(report.indicators.is_empty());
        assert_eq!(report.highlighted_text, padded);
    }

    #[test]
    fn test_repetitive_text_scores() {
        let report =
            detect_ai("the cat sat on the mat. the cat sat on the mat. the cat sat on the mat.");
        // perplexity 51.67, uniformity 100, no phrases
        assert!(approx(report.component_scores.perplexity, 51.67));
        assert_eq!(report.component_scores.uniformity, 100.0);
        assert_eq!(report.component_scores.avg_sentence_length, 6.0);
        assert_eq!(report.component_scores.pattern_count, 0);
        assert!(approx(report.ai_probability, 44.17));
        assert!(approx(report.human_probability, 55.83));
        assert_eq!(report.confidence, ConfidenceBand::Low);
        assert_eq!(report.message, "Some AI patterns detected, likely human-written");
    }

    #[test]
    fn test_repetitive_text_scores_above_varied_human_text() {
        let repetitive = "the cat sat on the mat. the cat sat on the mat. the cat sat on the mat.";
        let varied = "I ran. The storm rolled over the hills before anyone could close the old red barn doors. Why?";
        assert_eq!(repetitive.split_whitespace().count(), 18);
        assert_eq!(varied.split_whitespace().count(), 18);

        let rep = detect_ai(repetitive);
        let human = detect_ai(varied);
        // sentence lengths 2, 15, 1
        assert!(human.component_scores.uniformity < 20.0);
        assert!(human.component_scores.perplexity > rep.component_scores.perplexity);
        assert!(human.indicators.is_empty());
        assert!(rep.ai_probability > human.ai_probability);
        assert_eq!(human.confidence, ConfidenceBand::High);
    }

    #[test]
    fn test_cliche_text_scores() {
        let report = detect_ai(CLICHE_TEXT);
        let phrases: Vec<&str> = report.indicators.iter().map(|i| i.phrase.as_str()).collect();
        assert_eq!(
            phrases,
            vec![
                "it is important to note",
                "furthermore",
                "moreover",
                "in conclusion",
                "delve into",
                "realm of",
                "landscape of",
                "intricate",
                "multifaceted",
                "holistic approach",
                "revolutionize",
            ]
        );
        assert_eq!(report.component_scores.pattern_count, 11);
        // sentence lengths 14, 11, 11
        assert_eq!(report.component_scores.perplexity, 80.0);
        assert!(approx(report.component_scores.uniformity, 96.0));
        assert!(approx(report.component_scores.avg_sentence_length, 12.0));
        // 0.5 * 20 + 0.3 * 40 + 0.2 * 96
        assert!(approx(report.ai_probability, 41.2));
        assert_eq!(report.confidence, ConfidenceBand::Low);
    }

    #[test]
    fn test_probabilities_sum_to_hundred() {
        for text in [
            CLICHE_TEXT,
            "the cat sat on the mat. the cat sat on the mat. the cat sat on the mat.",
            "I woke late, burned the toast, and still made the 8:15 train somehow! Nobody believed me.",
        ] {
            let report = detect_ai(text);
            assert!(approx(report.ai_probability + report.human_probability, 100.0));
            assert!((0.0..=100.0).contains(&report.ai_probability));
        }
    }

    #[test]
    fn test_highlight_preserves_casing_and_first_occurrence() {
        let report = detect_ai(CLICHE_TEXT);
        assert!(report
            .highlighted_text
            .starts_with(&format!("{}Furthermore{}", AI_MARK_OPEN, MARK_CLOSE)));
        assert!(report
            .highlighted_text
            .contains(&format!("{}In conclusion{}", AI_MARK_OPEN, MARK_CLOSE)));
        assert_eq!(report.highlighted_text.matches(AI_MARK_OPEN).count(), 11);
        let stripped = report
            .highlighted_text
            .replace(AI_MARK_OPEN, "")
            .replace(MARK_CLOSE, "");
        assert_eq!(stripped, CLICHE_TEXT);
    }

    #[test]
    fn test_highlight_only_first_occurrence_of_phrase() {
        let indicators = vec![AiIndicator {
            phrase: "moreover".to_string(),
            context: String::new(),
        }];
        let out = highlight_phrases("Moreover this, and MOREOVER that.", &indicators);
        assert_eq!(
            out,
            format!("{}Moreover{} this, and MOREOVER that.", AI_MARK_OPEN, MARK_CLOSE)
        );
    }

    #[test]
    fn test_combine_clamps_and_caps_patterns() {
        assert!(approx(combine(100.0, 0, 0.0), 0.0));
        assert!(approx(combine(0.0, 10, 100.0), 50.0 + 12.0 + 20.0));
        assert!(approx(combine(0.0, 4, 100.0), combine(0.0, 9, 100.0)));
    }

    #[test]
    fn test_confidence_bands() {
        assert_eq!(confidence_band(80.0), ConfidenceBand::High);
        assert_eq!(confidence_band(10.0), ConfidenceBand::High);
        assert_eq!(confidence_band(75.0), ConfidenceBand::Medium);
        assert_eq!(confidence_band(25.0), ConfidenceBand::Medium);
        assert_eq!(confidence_band(65.0), ConfidenceBand::Medium);
        assert_eq!(confidence_band(35.0), ConfidenceBand::Medium);
        assert_eq!(confidence_band(60.0), ConfidenceBand::Low);
        assert_eq!(confidence_band(40.0), ConfidenceBand::Low);
        assert_eq!(confidence_band(50.0), ConfidenceBand::Low);
    }

    #[test]
    fn test_verdict_messages() {
        assert_eq!(verdict_message(70.0), "High likelihood of AI-generated content");
        assert_eq!(verdict_message(69.99), "Moderate indicators of AI-generated content");
        assert_eq!(verdict_message(50.0), "Moderate indicators of AI-generated content");
        assert_eq!(verdict_message(30.0), "Some AI patterns detected, likely human-written");
        assert_eq!(verdict_message(29.99), "Appears to be human-written content");
    }
}
