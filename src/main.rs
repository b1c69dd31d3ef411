//! Duden-Crawl main entry point
//!
//! This is the command-line interface for the Duden lemma harvester.

use anyhow::Context;
use clap::Parser;
use duden_crawl::config::{parse_config, validate, Config};
use duden_crawl::crawler::Coordinator;
use duden_crawl::lemma::{LemmaFeature, PartOfSpeech};
use duden_crawl::output::print_statistics;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Duden-Crawl: fetch lemma information from duden.de
///
/// Searches the Duden online dictionary, follows every hit that passes the
/// filters and writes the requested features of each entry to a delimited
/// file.
#[derive(Parser, Debug)]
#[command(name = "duden-crawl")]
#[command(version)]
#[command(about = "Fetch lemma information from duden.de", long_about = None)]
struct Cli {
    /// Optional TOML configuration file; flags override its values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// The search term to start the lemma search with
    #[arg(short, long)]
    search: Option<String>,

    /// Path to store the results file
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Restrict results to certain parts of speech
    #[arg(short = 'p', long, num_args = 0.., value_enum)]
    part_of_speech: Option<Vec<PartOfSpeech>>,

    /// Restrict results to lemmas which start with the provided string
    #[arg(long)]
    starts_with: Option<String>,

    /// Restrict results to lemmas which do not start with any of the provided strings
    #[arg(long, num_args = 0..)]
    does_not_start_with: Option<Vec<String>>,

    /// Features to extract, in column order (default: all)
    #[arg(short, long, num_args = 0.., value_enum)]
    extract: Option<Vec<LemmaFeature>>,

    /// Field delimiter of the output file
    #[arg(short, long)]
    delimiter: Option<char>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let quiet = cli.quiet;
    let config = build_config(cli)?;

    // Creating the coordinator creates the output file, before any request
    let coordinator = match Coordinator::new(config) {
        Ok(coordinator) => coordinator,
        Err(e) => {
            tracing::error!("Failed to set up crawl: {}", e);
            return Err(e).context("crawl setup failed");
        }
    };

    let search = &coordinator.config().search;
    if search.filters.is_unconstrained() {
        tracing::info!("Searching for '{}', following every hit", search.term);
    } else {
        tracing::info!(
            "Searching for '{}' with filters {:?}",
            search.term,
            search.filters
        );
    }

    match coordinator.run().await {
        Ok(stats) => {
            if !quiet {
                print_statistics(&stats);
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            Err(e).context("crawl aborted")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("duden_crawl=info,warn"),
            1 => EnvFilter::new("duden_crawl=debug,info"),
            2 => EnvFilter::new("duden_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Layers command-line flags over the optional config file and validates
fn build_config(cli: Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            parse_config(path)
                .with_context(|| format!("failed to load {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(term) = cli.search {
        config.search.term = term;
    }
    if let Some(path) = cli.output {
        config.output.path = path;
    }
    if let Some(delimiter) = cli.delimiter {
        config.output.delimiter = delimiter;
    }
    // A bare --extract keeps every feature
    if let Some(features) = cli.extract.filter(|values| !values.is_empty()) {
        config.output.features = features;
    }

    // A flag given without values leaves that filter unconstrained
    if let Some(pos) = cli.part_of_speech.filter(|values| !values.is_empty()) {
        config.search.filters.part_of_speech = Some(pos.into_iter().collect());
    }
    if let Some(prefix) = cli.starts_with.filter(|s| !s.is_empty()) {
        config.search.filters.starts_with = Some(prefix);
    }
    if let Some(prefixes) = cli.does_not_start_with.filter(|values| !values.is_empty()) {
        config.search.filters.does_not_start_with = Some(prefixes);
    }

    validate(&config).context("invalid configuration")?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config_from(args: &[&str]) -> Config {
        let mut argv = vec!["duden-crawl", "-s", "Apfel", "-o", "apfel.csv"];
        argv.extend_from_slice(args);
        build_config(Cli::try_parse_from(argv).unwrap()).unwrap()
    }

    #[test]
    fn test_extract_selects_columns_in_order() {
        let config = config_from(&["-e", "hyphenation", "url"]);
        assert_eq!(
            config.output.features,
            vec![LemmaFeature::Hyphenation, LemmaFeature::Url]
        );
    }

    #[test]
    fn test_bare_extract_keeps_all_features() {
        let config = config_from(&["--extract"]);
        assert_eq!(config.output.features, LemmaFeature::ALL.to_vec());
    }

    #[test]
    fn test_bare_filter_flags_leave_filters_unconstrained() {
        let config = config_from(&["-p", "--does-not-start-with"]);
        assert!(config.search.filters.is_unconstrained());
    }

    #[test]
    fn test_part_of_speech_flag() {
        let config = config_from(&["-p", "Substantiv", "verb"]);
        let pos = config.search.filters.part_of_speech.unwrap();
        assert!(pos.contains(&PartOfSpeech::Noun));
        assert!(pos.contains(&PartOfSpeech::Verb));
        assert_eq!(pos.len(), 2);
    }
}
