// Detection Module
// Heuristic AI-content detection organized into specialized submodules:
// - phrases: Fixed vocabulary of machine-typical stock phrases
// - signals: Perplexity-like, phrase and sentence-uniformity signals
// - detector: Weighted combination, confidence band and highlighted report

pub mod phrases;
pub mod signals;
pub mod detector;

pub use phrases::AI_PHRASES;
pub use signals::{detect_patterns, perplexity_score, sentence_structure, SentenceStructure};
pub use detector::{combine, confidence_band, detect_ai, verdict_message, AI_MARK_OPEN};
