//! Configuration module for Duden-Crawl
//!
//! This module handles loading, parsing, and validating TOML configuration
//! files. Command-line flags are layered on top of a parsed file by the
//! binary before `validate` runs.
//!
//! # Example
//!
//! ```no_run
//! use duden_crawl::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("duden.toml")).unwrap();
//! println!("Writing to: {}", config.output.path.display());
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, SearchConfig, DEFAULT_BASE_URL};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::validate;
