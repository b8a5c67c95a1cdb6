//! Output formatting for single parsed help records.

use help_manual_core::{CommandPath, HelpEntry, HelpRecord};

use crate::error::Result;
use crate::render::{ManualDocument, RenderOptions};

/// Supported output formats.
#[derive(Debug, Clone, Copy)]
#[cfg_attr(feature = "clap", derive(clap::ValueEnum))]
pub enum OutputFormat {
    Json,
    Yaml,
    Markdown,
    Table,
}

/// Formats a record in the requested output format.
///
/// Markdown output is the same section the manual generator would write for
/// `path`, heading included.
pub fn format_record(
    record: &HelpRecord,
    path: &CommandPath,
    format: OutputFormat,
) -> Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(record)?),
        OutputFormat::Yaml => Ok(serde_yaml::to_string(record)?),
        OutputFormat::Markdown => Ok(record_to_section(record, path)),
        OutputFormat::Table => Ok(record_to_table(record)),
    }
}

fn record_to_section(record: &HelpRecord, path: &CommandPath) -> String {
    let options = RenderOptions::default();
    let mut document = ManualDocument::new();
    document.push_heading(path, &options);
    document.push_record(record, path, &options);
    document.into_markdown()
}

fn record_to_table(record: &HelpRecord) -> String {
    let mut out = String::new();

    out.push_str(&record.description);
    out.push('\n');
    if !record.usage.is_empty() {
        out.push_str(&format!("  Usage: {}\n", record.usage));
    }

    if !record.commands.is_empty() {
        out.push_str("\nCommands:\n");
        let width = record
            .commands
            .iter()
            .map(|c| c.name.len())
            .max()
            .unwrap_or(4);
        for command in &record.commands {
            out.push_str(&format!(
                "  {:<width$}  {}\n",
                command.name, command.description
            ));
        }
    }

    push_entries(&mut out, "Arguments", &record.arguments);
    push_entries(&mut out, "Options", &record.options);

    out
}

fn push_entries(out: &mut String, title: &str, entries: &[HelpEntry]) {
    if entries.is_empty() {
        return;
    }
    out.push_str(&format!("\n{title}:\n"));
    let width = entries.iter().map(|e| e.label.len()).max().unwrap_or(4);
    for entry in entries {
        out.push_str(&format!("  {:<width$}  {}\n", entry.label, entry.description));
    }
}
