// Similarity Module
// Text-similarity engine organized into specialized submodules:
// - scorer: Character-level similarity ratio between two texts
// - segment_matcher: Shared word runs between a text and a source
// - highlighter: Non-overlapping <mark> spans for matched segments
// - external: Web-search orchestration and source ranking
// - corpus: Ranking of previously checked text pairs
// - plagiarism: Pairwise check combining the pieces above

pub mod scorer;
pub mod segment_matcher;
pub mod highlighter;
pub mod external;
pub mod corpus;
pub mod plagiarism;

pub use scorer::similarity;
pub use segment_matcher::{match_segments, merge_unique_case_insensitive, DEFAULT_MIN_WORDS};
pub use highlighter::{highlight, highlight_with, MARK_CLOSE, MATCH_MARK_OPEN};
pub use external::{build_query, build_report, check_external_similarity, ExternalSimilarityChecker};
pub use corpus::search_corpus;
pub use plagiarism::{
    check_plagiarism,
    external_verdict,
    similarity_verdict,
    text_metadata,
    PlagiarismError,
};
