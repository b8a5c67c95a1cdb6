//! Markdown rendering for manual sections.
//!
//! A [`ManualDocument`] is the sink the walker appends to. Each visited
//! command contributes a heading followed by its description, a fenced usage
//! block and up to three tables (Commands, Arguments, Options), each emitted
//! only when it has rows. Lines are joined with `\n` when the document is
//! finished.

use std::collections::HashSet;

use help_manual_core::{CommandPath, HelpEntry, HelpRecord};

/// Heading text used for the root section unless configured otherwise.
pub const DEFAULT_TITLE: &str = "Manual";

/// Options that change how sections are rendered.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Root heading text.
    pub title: String,
    /// Render command names as links to their own sections instead of
    /// plain code spans.
    pub link_commands: bool,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            title: DEFAULT_TITLE.to_string(),
            link_commands: true,
        }
    }
}

/// Ordered Markdown lines of a manual being built.
///
/// # Examples
///
/// ```
/// use help_manual_core::{CommandPath, HelpRecord};
/// use help_manual_discovery::render::{ManualDocument, RenderOptions};
///
/// let options = RenderOptions::default();
/// let mut doc = ManualDocument::new();
/// let path = CommandPath::root();
/// doc.push_heading(&path, &options);
/// doc.push_record(&HelpRecord::new("Root tool"), &path, &options);
///
/// let text = doc.into_markdown();
/// assert!(text.starts_with("# Manual\n\nRoot tool\n"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManualDocument {
    lines: Vec<String>,
}

impl ManualDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Appends the heading for `path` and the blank line after it.
    ///
    /// The heading level is one `#` per path token plus one.
    pub fn push_heading(&mut self, path: &CommandPath, options: &RenderOptions) {
        let marker = "#".repeat(path.depth() + 1);
        if path.is_root() {
            self.lines.push(format!("{marker} {}", options.title));
        } else {
            self.lines.push(format!("{marker} Command: {path}"));
        }
        self.lines.push(String::new());
    }

    /// Appends the body of a section: description, usage and tables.
    pub fn push_record(&mut self, record: &HelpRecord, path: &CommandPath, options: &RenderOptions) {
        self.lines.extend(record_to_markdown(record, path, options));
    }

    /// Joins all lines with `\n`. No trailing newline is added.
    pub fn into_markdown(self) -> String {
        self.lines.join("\n")
    }
}

/// Renders the body of one section, without its heading.
pub fn record_to_markdown(
    record: &HelpRecord,
    path: &CommandPath,
    options: &RenderOptions,
) -> Vec<String> {
    let mut lines = vec![
        record.description.clone(),
        String::new(),
        "<ins>**Usage:**</ins>".to_string(),
        String::new(),
        "```".to_string(),
        record.usage.clone(),
        "```".to_string(),
        String::new(),
    ];

    // A name listed twice gets one row, matching the single section the
    // walker renders for it.
    let mut listed = HashSet::new();
    let commands: Vec<_> = record
        .documented_commands()
        .filter(|command| listed.insert(command.name.as_str()))
        .collect();
    if !commands.is_empty() {
        push_table_header(&mut lines, "Commands", "Command");
        for command in commands {
            let name = if options.link_commands {
                format!(
                    "[{}](#{})",
                    escape_cell(&command.name),
                    path.child(&command.name).anchor()
                )
            } else {
                code_span(&command.name)
            };
            lines.push(format!("| {name} | {} |", escape_cell(&command.description)));
        }
        lines.push(String::new());
    }

    push_entry_table(&mut lines, "Arguments", "Argument", &record.arguments);
    push_entry_table(&mut lines, "Options", "Option", &record.options);

    lines
}

fn push_entry_table(lines: &mut Vec<String>, title: &str, column: &str, entries: &[HelpEntry]) {
    if entries.is_empty() {
        return;
    }
    push_table_header(lines, title, column);
    for entry in entries {
        lines.push(format!(
            "| {} | {} |",
            code_span(&entry.label),
            escape_cell(&entry.description)
        ));
    }
    lines.push(String::new());
}

fn push_table_header(lines: &mut Vec<String>, title: &str, column: &str) {
    lines.push(format!("<ins>**{title}:**</ins>"));
    lines.push(String::new());
    lines.push(format!("| {column} | Description |"));
    lines.push("| --- | --- |".to_string());
}

fn code_span(text: &str) -> String {
    format!("`{}`", escape_cell(text))
}

/// Escapes `|` so a cell cannot split its table row.
fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|")
}
