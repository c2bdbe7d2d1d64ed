//! Configuration module for the lawsuit tracker
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every key is optional; the defaults target the TJMG public consultation portal.
//!
//! # Example
//!
//! ```no_run
//! use lawsuit_tracker::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("lawsuit.toml")).unwrap();
//! println!("Saving lawsuits under: {}", config.output.directory);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, FailurePolicy, HttpConfig, OutputConfig, PortalConfig, RunConfig, DEFAULT_BASE_URL,
    DEFAULT_LINK_PATTERN,
};

// Re-export parser functions
pub use parser::{load_config, load_or_default, parse_config};
