// Kanji-Parts Search CLI Tool
// Command-line interface for kanji decomposition search

use clap::Parser;
use kanji_parts::scorer::MAX_SCORE;
use kanji_parts::{
    parse_query, DataConfig, DataLoader, KanjiSearch, Region, SearchMode, TableSet,
};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Kanji Search Tool - Find kanji by their parts, or parts of a kanji
#[derive(Parser, Debug)]
#[command(name = "kanji-search")]
#[command(about = "Search kanji by components, or list the components of a kanji", long_about = None)]
#[command(version)]
struct Args {
    /// Query text; only Han characters are used
    /// - parts mode: components to look for (e.g., "水也")
    /// - char mode: a character to decompose (e.g., "池")
    #[arg(value_name = "QUERY")]
    query: String,

    /// Data directory holding the JSON tables
    #[arg(short, long, default_value = "data/sample")]
    data: PathBuf,

    /// JSON file overriding the data directory's file names
    #[arg(long, value_name = "FILE")]
    layout: Option<PathBuf>,

    /// Load tables from a binary snapshot instead of the data directory
    #[arg(long, value_name = "FILE", conflicts_with = "layout")]
    snapshot: Option<PathBuf>,

    /// Write the loaded tables to a binary snapshot
    #[arg(long, value_name = "FILE")]
    save_snapshot: Option<PathBuf>,

    /// Search direction
    #[arg(short, long, value_enum, default_value_t = SearchMode::PartsToChar)]
    mode: SearchMode,

    /// Region restriction (parts mode only)
    #[arg(short, long, value_enum, default_value_t = Region::Standard)]
    region: Region,

    /// Maximum number of results to display
    #[arg(short, long, default_value = "10")]
    limit: usize,

    /// Show relevance scores (multi-part parts mode only)
    #[arg(short, long)]
    scores: bool,

    /// Show code point, readings and region for each result
    #[arg(long)]
    details: bool,

    /// Show detailed information and debug logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    let default_level = if args.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    // Load tables
    if args.verbose {
        println!("🔍 Loading kanji tables...");
    }

    let tables = match (&args.snapshot, &args.layout) {
        (Some(path), _) => TableSet::load_snapshot(path)?,
        (None, Some(layout)) => {
            let config = DataConfig::from_file(layout)?;
            DataLoader::with_config(&args.data, config).load()?.0
        }
        (None, None) => DataLoader::new(&args.data).load()?.0,
    };

    if let Some(path) = &args.save_snapshot {
        tables.save_snapshot(path)?;
        if args.verbose {
            println!("💾 Snapshot written to {}", path.display());
        }
    }

    let search = KanjiSearch::from_tables(tables);

    if args.verbose {
        let info = search.stats();
        println!(
            "✅ Tables loaded: {} decompositions, {} patterns, {} variants, {} standard, {} historical\n",
            info.direct_entries,
            info.pattern_entries,
            info.variant_entries,
            info.standard_entries,
            info.historical_entries
        );
    }

    let parsed = parse_query(&args.query, args.mode, args.region);

    if args.verbose {
        println!(
            "🔎 Searching {} ({}): {}",
            args.mode,
            args.region,
            parsed.parts.concat()
        );
        println!("─────────────────────────────────────────────────\n");
    } else {
        println!("Mode: {}", args.mode);
    }

    if parsed.is_empty() {
        println!("❌ Query has no Han characters.");
        return Ok(());
    }

    let mut results = search.run(&parsed);
    results.truncate(args.limit);

    if results.is_empty() {
        println!("❌ No matches found.");
        return Ok(());
    }

    println!("✅ Found {} matches:\n", results.len());

    // Display results
    for (idx, result) in results.iter().enumerate() {
        println!("{}. {}", idx + 1, result.symbol);

        if args.scores {
            if let Some(score) = result.score {
                println!("      Score: {:.1} {}", score, score_bar(score));
            }
        }

        if args.details {
            let details = search.details(&result.symbol);
            print!("      {}", details.code_point);
            if details.standard {
                print!("  standard");
            }
            if let Some(modern) = &details.modern_form {
                print!("  old form of {}", modern);
            }
            println!();
            if !details.on_readings.is_empty() || !details.kun_readings.is_empty() {
                println!(
                    "      On: {}  Kun: {}",
                    details.on_readings.join("、"),
                    details.kun_readings.join("、")
                );
            }
            if !details.parts.is_empty() {
                println!("      Parts: {}", details.parts.join(" "));
            }
        }

        if args.scores || args.details {
            println!();
        }
    }

    if args.verbose {
        println!("─────────────────────────────────────────────────");
        println!("✨ Search completed successfully!");
    }

    Ok(())
}

/// Generate a visual score bar over the full score range
fn score_bar(score: f64) -> String {
    let bar_len = 10;
    let filled = ((score / MAX_SCORE).clamp(0.0, 1.0) * bar_len as f64) as usize;
    let mut bar = String::from("[");
    for i in 0..bar_len {
        if i < filled {
            bar.push('█');
        } else {
            bar.push('░');
        }
    }
    bar.push(']');
    bar
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_score_bar() {
        let bar = score_bar(75.0);
        assert_eq!(bar, "[█████░░░░░]");
    }

    #[test]
    fn test_score_bar_full() {
        assert_eq!(score_bar(MAX_SCORE), "[██████████]");
        // Out-of-range scores are clamped
        assert_eq!(score_bar(MAX_SCORE * 2.0), "[██████████]");
    }

    #[test]
    fn test_score_bar_empty() {
        assert_eq!(score_bar(0.0), "[░░░░░░░░░░]");
    }

    #[test]
    fn test_args_parse_modes() {
        let args = Args::try_parse_from(["kanji-search", "池", "--mode", "char"]).unwrap();
        assert_eq!(args.mode, SearchMode::CharToParts);
        assert_eq!(args.region, Region::Standard);
        assert_eq!(args.limit, 10);

        let args =
            Args::try_parse_from(["kanji-search", "水也", "-r", "unrestricted", "-l", "3"]).unwrap();
        assert_eq!(args.mode, SearchMode::PartsToChar);
        assert_eq!(args.region, Region::Unrestricted);
        assert_eq!(args.limit, 3);
    }

    #[test]
    fn test_args_reject_layout_with_snapshot() {
        let parsed = Args::try_parse_from([
            "kanji-search",
            "水",
            "--snapshot",
            "a.bin",
            "--layout",
            "b.json",
        ]);
        assert!(parsed.is_err());
    }
}
