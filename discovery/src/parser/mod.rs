//! Help output parser.
//!
//! Parses the fixed help layout printed by Clap-style CLIs:
//!
//! ```text
//! <one-line description>
//!
//! Usage: <usage string>
//!
//! Commands:
//!   <name>  <description>
//!
//! Arguments:
//!   <name>  <description>
//!
//! Options:
//!   <syntax>  <description>
//! ```
//!
//! The parser is a line-oriented state machine. Line 0 is the description;
//! every later line is trimmed and classified in priority order: a `Usage:`
//! line outside any section, a section header, or an entry row of the
//! active section. Blank lines close the active section. Anything else is
//! ignored, so the parser never fails: unexpected text only yields shorter
//! lists.
//!
//! Section order is not assumed; headers may repeat or interleave.

pub mod util;

use serde::Serialize;
use tracing::debug;

use help_manual_core::{HelpRecord, Section};

use util::{split_entry, usage_remainder};

/// Line accounting for a single parse run.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ParseDiagnostics {
    /// Non-blank lines after the description line.
    pub relevant_lines: usize,
    /// Lines that set the usage, opened a section or produced an entry.
    pub recognized_lines: usize,
    /// Non-blank lines dropped because no section was active.
    pub ignored_lines: Vec<String>,
}

impl ParseDiagnostics {
    pub fn coverage(&self) -> f64 {
        if self.relevant_lines == 0 {
            return 0.0;
        }
        self.recognized_lines as f64 / self.relevant_lines as f64
    }
}

/// Parser for one block of help text.
///
/// # Examples
///
/// ```
/// use help_manual_discovery::parser::HelpParser;
///
/// let help = "\
/// Root tool
///
/// Usage: tool [OPTIONS]
///
/// Commands:
///   build  Builds the project
/// ";
///
/// let mut parser = HelpParser::new(help);
/// let record = parser.parse();
/// assert_eq!(record.description, "Root tool");
/// assert_eq!(record.usage, "tool [OPTIONS]");
/// assert_eq!(record.commands[0].name, "build");
/// assert_eq!(parser.diagnostics().recognized_lines, 3);
/// ```
pub struct HelpParser<'a> {
    text: &'a str,
    diagnostics: ParseDiagnostics,
}

impl<'a> HelpParser<'a> {
    pub fn new(text: &'a str) -> Self {
        Self {
            text,
            diagnostics: ParseDiagnostics::default(),
        }
    }

    /// Runs the state machine over the whole text.
    pub fn parse(&mut self) -> HelpRecord {
        self.diagnostics = ParseDiagnostics::default();

        let mut lines = self.text.split('\n');
        let description = lines
            .next()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .unwrap_or_default();
        let mut record = HelpRecord::new(description);
        let mut current: Option<Section> = None;

        for raw in lines {
            let line = raw.trim();

            if line.is_empty() {
                current = None;
                continue;
            }
            self.diagnostics.relevant_lines += 1;

            if current.is_none() && line.starts_with("Usage:") {
                record.usage = usage_remainder(line);
                self.diagnostics.recognized_lines += 1;
                continue;
            }

            if let Some(section) = Section::from_header(line) {
                current = Some(section);
                self.diagnostics.recognized_lines += 1;
                continue;
            }

            match current {
                Some(section) => {
                    let (label, description) = split_entry(line);
                    record.push_entry(section, label, description);
                    self.diagnostics.recognized_lines += 1;
                }
                None => self.diagnostics.ignored_lines.push(line.to_string()),
            }
        }

        debug!(
            commands = record.commands.len(),
            arguments = record.arguments.len(),
            options = record.options.len(),
            ignored = self.diagnostics.ignored_lines.len(),
            "Parsed help text"
        );

        record
    }

    pub fn diagnostics(&self) -> &ParseDiagnostics {
        &self.diagnostics
    }
}
