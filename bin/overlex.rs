use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use overlex::{IntersectionMode, IntersectionPipeline, OverlexConfig, TokenListCorpus, Tokenizer};

#[derive(Parser, Debug)]
#[command(name = "overlex")]
#[command(about = "Token intersection engine with positional provenance", long_about = None)]
struct Args {
    /// Reference corpus: pre-tokenized JSON or plain text
    #[arg(long, env = "OVERLEX_REFERENCE")]
    reference: PathBuf,

    /// Query corpus: pre-tokenized JSON or plain text
    #[arg(long, env = "OVERLEX_QUERY")]
    query: PathBuf,

    /// Output file for the match report
    #[arg(long, short, env = "OVERLEX_OUTPUT", default_value = "report.json")]
    output: PathBuf,

    /// Intersection mode (nested-loops, quicksort, heapsort)
    #[arg(long, env = "OVERLEX_MODE", default_value = "nested-loops")]
    mode: String,

    /// Compare tokens case-sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Keep match blocks with a single surviving token
    #[arg(long)]
    keep_single_token_results: bool,

    /// Do not suppress stop words in match blocks
    #[arg(long)]
    no_stop_word_filter: bool,

    /// Export sentence offsets in addition to char and word offsets
    #[arg(long)]
    sentence_offsets: bool,

    /// Pretty-print the report JSON
    #[arg(long)]
    pretty: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(tracing::Level::INFO.into()))
        .init();

    let args = Args::parse();

    info!("Starting Overlex v{}", overlex::VERSION);

    let mode = match args.mode.to_lowercase().as_str() {
        "nested-loops" | "nested_loops" => IntersectionMode::NestedLoops,
        "quicksort" => IntersectionMode::QuicksortBinarySearch,
        "heapsort" => IntersectionMode::HeapsortBinarySearch,
        other => {
            warn!("Unknown mode '{}', using nested-loops", other);
            IntersectionMode::NestedLoops
        }
    };

    let mut config = OverlexConfig::default()
        .with_mode(mode)
        .with_stop_word_filter(!args.no_stop_word_filter)
        .with_keep_single_token_results(args.keep_single_token_results);
    config.tokenizer.lowercase = !args.case_sensitive;
    config.report.sentence_offsets = args.sentence_offsets;

    info!("  Mode:             {}", mode);
    info!("  Token comparison: {}", if args.case_sensitive { "case-sensitive" } else { "case-insensitive" });
    info!("  Stop word filter: {}", config.report.filter_stop_words);

    let tokenizer = Tokenizer::new(&config.tokenizer);
    let reference = load_corpus(&args.reference, &tokenizer)?;
    let query = load_corpus(&args.query, &tokenizer)?;
    info!(
        "Loaded {} reference lists and {} query lists",
        reference.len(),
        query.len()
    );

    let mut pipeline = IntersectionPipeline::new(config);
    let report = pipeline.run(&reference, &query)?;

    info!("  Full match sets:    {}", report.counters.full_sets);
    info!("  Partial match sets: {}", report.counters.partial_sets);
    info!(
        "  Matched tokens:     {}",
        report.counters.tokens_in_full_sets + report.counters.tokens_in_partial_sets
    );

    fs::write(&args.output, report.to_json(args.pretty)?)?;
    info!("Report written to {}", args.output.display());

    Ok(())
}

/// JSON corpora are recognized by extension; everything else is tokenized
/// as plain text.
fn load_corpus(path: &Path, tokenizer: &Tokenizer) -> Result<TokenListCorpus> {
    let corpus = if path.extension().map_or(false, |extension| extension == "json") {
        TokenListCorpus::from_json_file(path)?
    } else {
        TokenListCorpus::from_text_file(path, tokenizer)?
    };
    Ok(corpus)
}
