//! Markdown manuals from CLI help output.
//!
//! This crate runs a command-line tool's built-in help (`<tool> --help`,
//! `<tool> <sub> --help`, ...), parses each help block into a
//! [`HelpRecord`], and renders the whole command tree as one Markdown
//! document.
//!
//! # Main entry points
//!
//! - [`parse_help_text`] — parse pre-captured help text without running
//!   anything.
//! - [`walker::ManualWalker`] — walk a command tree through any
//!   [`extractor::HelpSource`].
//! - [`write_manual`] — probe the configured program, walk its tree and
//!   write the manual file.
//!
//! # Example
//!
//! ```
//! use help_manual_discovery::parse_help_text;
//!
//! let help = "\
//! Root tool
//!
//! Usage: tool [OPTIONS] <COMMAND>
//!
//! Commands:
//!   build  Builds the project
//!   help   Print this message or the help of the given subcommand(s)
//!
//! Options:
//!   -h, --help  Print help
//! ";
//!
//! let record = parse_help_text(help);
//! assert_eq!(record.usage, "tool [OPTIONS] <COMMAND>");
//! assert_eq!(record.documented_commands().count(), 1);
//! assert_eq!(record.options[0].label, "-h, --help");
//! ```
//!
//! # Crate type
//!
//! This is a library-only crate. The `help-manual` binary lives in the
//! `help-manual-cli` crate.
//!
//! [`HelpRecord`]: help_manual_core::HelpRecord

pub mod config;
pub mod error;
pub mod extractor;
pub mod output;
pub mod parser;
pub mod render;
pub mod walker;

use std::path::PathBuf;

use tracing::info;

use help_manual_core::HelpRecord;

use config::ManualConfig;
use error::{ManualError, Result};
use parser::HelpParser;
use walker::ManualWalker;

/// Parses pre-captured help text into a record. Never fails.
pub fn parse_help_text(help_text: &str) -> HelpRecord {
    HelpParser::new(help_text).parse()
}

/// Summary of a written manual.
#[derive(Debug, Clone)]
pub struct ManualSummary {
    pub output: PathBuf,
    pub sections: usize,
    pub bytes: usize,
    pub warnings: Vec<String>,
}

/// Generates the manual described by `config` and writes it to
/// `config.output`.
///
/// The file is written once, after the whole tree has been walked. Any
/// failure before that point leaves an existing manual untouched.
///
/// # Errors
///
/// Returns [`ManualError::Config`] for an unusable configuration, any error
/// raised while probing or walking, and [`ManualError::Write`] if the file
/// cannot be written.
pub fn write_manual(config: &ManualConfig) -> Result<ManualSummary> {
    config.validate()?;

    let mut source = config.help_source();
    let outcome = ManualWalker::new(&mut source, config.walk_options()).walk()?;
    let sections = outcome.visited.len();
    let markdown = outcome.document.into_markdown();

    if let Some(parent) = config.output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|source| ManualError::Write {
            path: config.output.clone(),
            source,
        })?;
    }
    std::fs::write(&config.output, &markdown).map_err(|source| ManualError::Write {
        path: config.output.clone(),
        source,
    })?;

    info!(
        output = %config.output.display(),
        sections,
        bytes = markdown.len(),
        "Wrote manual"
    );

    Ok(ManualSummary {
        output: config.output.clone(),
        sections,
        bytes: markdown.len(),
        warnings: outcome.warnings,
    })
}
