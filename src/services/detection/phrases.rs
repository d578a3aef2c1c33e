// AI Phrase Vocabulary
// Stock phrases that show up disproportionately in machine-generated prose

/// Lowercase phrases, matched as case-insensitive substrings.
pub const AI_PHRASES: &[&str] = &[
    "it's important to note",
    "it is important to note",
    "it's worth noting",
    "furthermore",
    "moreover",
    "in conclusion",
    "to summarize",
    "in summary",
    "delve into",
    "dive into",
    "realm of",
    "navigating the",
    "landscape of",
    "tapestry of",
    "intricate",
    "multifaceted",
    "holistic approach",
    "at the end of the day",
    "game changer",
    "revolutionize",
];
