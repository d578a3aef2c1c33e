// Simcheck Core Services
// Similarity, detection and the collaborators they depend on

pub mod text_processor;
pub mod config_store;
pub mod search_provider;
pub mod similarity;
pub mod detection;

pub use text_processor::*;
pub use config_store::*;
pub use search_provider::*;

pub use similarity::{
    check_external_similarity,
    check_plagiarism,
    external_verdict,
    highlight,
    match_segments,
    search_corpus,
    similarity,
    similarity_verdict,
    ExternalSimilarityChecker,
    PlagiarismError,
};
pub use detection::detect_ai;
