//! Configuration module for Devpost-Export
//!
//! This module handles loading, parsing, and validating the optional TOML
//! configuration file. Every key has a default, so an export can run with no
//! file at all.
//!
//! # Example
//!
//! ```no_run
//! use devpost_export::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("export.toml")).unwrap();
//! println!("Exporting with {} workers", config.crawler.workers);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, OutputFormat, SiteConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash, parse_config};
pub use validation::{validate, validate_workers, MAX_WORKERS};
