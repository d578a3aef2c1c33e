use anyhow::{bail, Context, Result};
use serde::Serialize;
use simcheck_lib::models::{CorpusEntry, ExternalCheck, PlagiarismRequest, SimilarityReport};
use simcheck_lib::services::config_store::{AppConfig, ConfigStore};
use simcheck_lib::services::search_provider::resolve_search_credentials;
use simcheck_lib::services::similarity::{
    check_plagiarism, external_verdict, match_segments, search_corpus, ExternalSimilarityChecker,
    DEFAULT_MIN_WORDS,
};
use simcheck_lib::services::detection::detect_ai;
use tracing::warn;

const USAGE: &str = "Usage:
  simcheck compare <file1> <file2> [--external] [--ai] [--out <json_path>]
  simcheck detect <file> [--out <json_path>]
  simcheck external <file> [--out <json_path>]
  simcheck segments <file1> <file2> [--min-words <n>]
  simcheck corpus <file> <corpus.json> [--min-similarity <pct>] [--out <json_path>]
  simcheck credentials set <api_key> <search_engine_id>
  simcheck credentials clear

Notes:
  - Web search needs GOOGLE_API_KEY and GOOGLE_SEARCH_ENGINE_ID (or stored credentials).
  - SIMCHECK_DISABLE_FILE_LOG=1 keeps logs on the console only.";

fn preview(s: &str, max_chars: usize) -> String {
    let mut out: String = s.chars().take(max_chars).collect();
    if s.chars().count() > max_chars {
        out.push_str("...");
    }
    out.replace('\n', " ")
}

fn parse_arg_value(args: &[String], key: &str) -> Option<String> {
    args.iter()
        .position(|a| a == key)
        .and_then(|i| args.get(i + 1))
        .cloned()
}

fn has_flag(args: &[String], key: &str) -> bool {
    args.iter().any(|a| a == key)
}

fn positional(args: &[String], index: usize, name: &str) -> Result<String> {
    match args.get(index) {
        Some(v) if !v.starts_with("--") => Ok(v.clone()),
        _ => bail!("missing <{}>\n\n{}", name, USAGE),
    }
}

fn read_text(path: &str) -> Result<String> {
    let bytes = std::fs::read(path).with_context(|| format!("read file failed: {}", path))?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

fn write_json<T: Serialize>(out_path: Option<String>, value: &T) -> Result<()> {
    if let Some(out_path) = out_path {
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&out_path, json).with_context(|| format!("write out failed: {}", out_path))?;
        println!();
        println!("Wrote JSON: {}", out_path);
    }
    Ok(())
}

fn config_store() -> Option<ConfigStore> {
    ConfigStore::default_config_dir().map(ConfigStore::new)
}

fn load_config() -> AppConfig {
    let Some(store) = config_store() else {
        return AppConfig::default();
    };
    match store.load() {
        Ok(config) => config,
        Err(e) => {
            warn!("[CONFIG] {}, using defaults", e);
            AppConfig::default()
        }
    }
}

fn build_checker(config: &AppConfig) -> ExternalSimilarityChecker<simcheck_lib::services::GoogleSearchClient> {
    let search = resolve_search_credentials(config.search.clone());
    ExternalSimilarityChecker::from_config(search, config.matching.clone())
}

fn print_external(label: &str, check: &ExternalCheck) {
    match check {
        ExternalCheck::Disabled => println!("{}: web search not configured", label),
        ExternalCheck::Unavailable { reason } => println!("{}: web search unavailable ({})", label, reason),
        ExternalCheck::Found(report) => print_report(label, report),
    }
}

fn print_report(label: &str, report: &SimilarityReport) {
    println!(
        "{}: {}% ({} of {} sources shown) - {}",
        label,
        report.overall_similarity,
        report.sources.len(),
        report.total_sources,
        external_verdict(report.overall_similarity)
    );
    for (i, source) in report.sources.iter().enumerate() {
        println!(
            "  [{}] {}% {}  {}",
            i + 1,
            source.similarity,
            preview(&source.title, 60),
            source.url
        );
        for segment in &source.matching_segments {
            println!("      \"{}\"", preview(segment, 100));
        }
    }
}

async fn run_compare(args: &[String], config: &AppConfig) -> Result<()> {
    let path1 = positional(args, 2, "file1")?;
    let path2 = positional(args, 3, "file2")?;
    let request = PlagiarismRequest {
        text1: read_text(&path1)?,
        text2: read_text(&path2)?,
        check_external: has_flag(args, "--external"),
        check_ai: has_flag(args, "--ai"),
    };

    let checker = build_checker(config);
    let result = check_plagiarism(&request, &checker).await?;

    println!("Text 1: {} ({} chars, {} words)", path1, result.text1_metadata.length, result.text1_metadata.word_count);
    println!("Text 2: {} ({} chars, {} words)", path2, result.text2_metadata.length, result.text2_metadata.word_count);
    println!("Similarity: {}%", result.similarity_score);
    println!("Verdict: {}", result.message);

    if let Some(check) = &result.external_text1 {
        println!();
        print_external("Text 1 online", check);
    }
    if let Some(check) = &result.external_text2 {
        print_external("Text 2 online", check);
    }
    if let Some(external) = result.external_similarity {
        println!("Highest online similarity: {}%", external);
    }

    for (label, report) in [("Text 1", &result.ai_detection), ("Text 2", &result.ai_detection_text2)] {
        if let Some(report) = report {
            println!();
            println!(
                "{} AI estimate: {}% ({} confidence) - {}",
                label, report.ai_probability, report.confidence, report.message
            );
        }
    }

    write_json(parse_arg_value(args, "--out"), &result)
}

fn run_detect(args: &[String]) -> Result<()> {
    let path = positional(args, 2, "file")?;
    let text = read_text(&path)?;
    let report = detect_ai(&text);

    println!("File: {}", path);
    println!("AI probability: {}%", report.ai_probability);
    println!("Human probability: {}%", report.human_probability);
    println!("Confidence: {}", report.confidence);
    println!("Verdict: {}", report.message);
    println!(
        "Signals: perplexity={} patterns={} uniformity={} avg_sentence_length={}",
        report.component_scores.perplexity,
        report.component_scores.pattern_count,
        report.component_scores.uniformity,
        report.component_scores.avg_sentence_length
    );
    for indicator in &report.indicators {
        println!("  - \"{}\" in: {}", indicator.phrase, indicator.context);
    }

    write_json(parse_arg_value(args, "--out"), &report)
}

async fn run_external(args: &[String], config: &AppConfig) -> Result<()> {
    let path = positional(args, 2, "file")?;
    let text = read_text(&path)?;
    let checker = build_checker(config);
    if !checker.is_enabled() {
        eprintln!("Web search credentials not found; see `simcheck credentials set`.");
    }

    let check = checker.check(&text).await;
    println!("File: {}", path);
    print_external("Online", &check);

    write_json(parse_arg_value(args, "--out"), &check)
}

fn run_segments(args: &[String], config: &AppConfig) -> Result<()> {
    let path1 = positional(args, 2, "file1")?;
    let path2 = positional(args, 3, "file2")?;
    let min_words: usize = parse_arg_value(args, "--min-words")
        .and_then(|s| s.parse().ok())
        .unwrap_or(if config.matching.min_words > 0 {
            config.matching.min_words
        } else {
            DEFAULT_MIN_WORDS
        });

    let text1 = read_text(&path1)?;
    let text2 = read_text(&path2)?;
    let segments = match_segments(&text1, &text2, min_words);

    println!("Shared runs of {}+ words: {}", min_words, segments.len());
    for (i, segment) in segments.iter().enumerate() {
        println!("[M{:04}] {}", i, preview(segment, 140));
    }
    Ok(())
}

fn run_corpus(args: &[String], config: &AppConfig) -> Result<()> {
    let path = positional(args, 2, "file")?;
    let corpus_path = positional(args, 3, "corpus.json")?;
    let min_similarity: f64 = parse_arg_value(args, "--min-similarity")
        .and_then(|s| s.parse().ok())
        .unwrap_or(config.corpus.min_similarity);

    let text = read_text(&path)?;
    let entries: Vec<CorpusEntry> = serde_json::from_str(&read_text(&corpus_path)?)
        .with_context(|| format!("parse corpus failed: {}", corpus_path))?;
    let result = search_corpus(&text, &entries, min_similarity);

    println!(
        "Matches: {} of {} entries at or above {}% (highest {}%)",
        result.matches_found,
        entries.len(),
        min_similarity,
        result.highest_similarity
    );
    for m in &result.matches {
        println!("  [{}] {}% {}  {}", m.entry_id, m.similarity_score, m.label, preview(&m.matched_text_preview, 80));
    }

    write_json(parse_arg_value(args, "--out"), &result)
}

fn run_credentials(args: &[String]) -> Result<()> {
    let Some(store) = config_store() else {
        bail!("no config directory available on this platform");
    };
    match args.get(2).map(String::as_str) {
        Some("set") => {
            let api_key = positional(args, 3, "api_key")?;
            let engine_id = positional(args, 4, "search_engine_id")?;
            store.set_search_credentials(&api_key, &engine_id).map_err(anyhow::Error::msg)?;
            println!("Stored search credentials");
        }
        Some("clear") => {
            store.clear_search_credentials().map_err(anyhow::Error::msg)?;
            println!("Cleared search credentials");
        }
        _ => bail!("expected `set` or `clear`\n\n{}", USAGE),
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.len() < 2 || has_flag(&args, "--help") {
        eprintln!("{}", USAGE);
        return Ok(());
    }

    simcheck_lib::init_logging();
    let config = load_config();

    match args[1].as_str() {
        "compare" => run_compare(&args, &config).await,
        "detect" => run_detect(&args),
        "external" => run_external(&args, &config).await,
        "segments" => run_segments(&args, &config),
        "corpus" => run_corpus(&args, &config),
        "credentials" => run_credentials(&args),
        other => bail!("unknown command `{}`\n\n{}", other, USAGE),
    }
}
