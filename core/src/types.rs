//! Type definitions for parsed help output and command paths.
//!
//! A [`HelpRecord`] is built fresh for every parsed help block and handed
//! to the caller; nothing here keeps a reference back to the text it came
//! from. All types serialize with [`serde`] so the CLI can print them as
//! JSON or YAML.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the pseudo-command most CLIs list under `Commands:`.
///
/// It is kept in [`HelpRecord::commands`] but never documented or recursed
/// into.
pub const HELP_COMMAND: &str = "help";

/// Section headers recognized inside help text.
///
/// # Examples
///
/// ```
/// use help_manual_core::Section;
///
/// assert_eq!(Section::from_header("Commands:"), Some(Section::Commands));
/// assert_eq!(Section::from_header("Flags:"), None);
/// assert_eq!(Section::Options.header(), "Options:");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Section {
    /// Subcommand list.
    Commands,
    /// Positional arguments.
    Arguments,
    /// Flags and options.
    Options,
}

impl Section {
    /// Header line introducing this section, e.g. `Commands:`.
    pub fn header(self) -> &'static str {
        match self {
            Section::Commands => "Commands:",
            Section::Arguments => "Arguments:",
            Section::Options => "Options:",
        }
    }

    /// Matches a trimmed line exactly against the known headers.
    pub fn from_header(line: &str) -> Option<Self> {
        match line {
            "Commands:" => Some(Section::Commands),
            "Arguments:" => Some(Section::Arguments),
            "Options:" => Some(Section::Options),
            _ => None,
        }
    }
}

/// A subcommand row from a `Commands:` section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandEntry {
    /// Subcommand name, the token used to invoke it.
    pub name: String,
    /// One-line description, possibly empty.
    pub description: String,
}

impl CommandEntry {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
        }
    }

    /// Returns `true` for the conventional `help` pseudo-command.
    pub fn is_help(&self) -> bool {
        self.name == HELP_COMMAND
    }
}

/// An argument or option row.
///
/// For arguments `label` is the argument name (e.g. `<FILE>`); for options
/// it is the whole syntax string (e.g. `-o, --output <PATH>`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpEntry {
    pub label: String,
    pub description: String,
}

impl HelpEntry {
    pub fn new(label: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            description: description.into(),
        }
    }
}

/// Structured form of one help invocation's output.
///
/// Entry order always matches the order of appearance in the source text.
///
/// # Examples
///
/// ```
/// use help_manual_core::{CommandEntry, HelpRecord};
///
/// let mut record = HelpRecord::new("Root tool");
/// assert!(record.is_empty());
///
/// record.commands.push(CommandEntry::new("build", "Builds the project"));
/// assert!(!record.is_empty());
/// assert_eq!(record.find_command("build").unwrap().description, "Builds the project");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HelpRecord {
    /// First line of the help text, verbatim.
    pub description: String,
    /// Text after `Usage:`, trimmed.
    pub usage: String,
    #[serde(default)]
    pub arguments: Vec<HelpEntry>,
    #[serde(default)]
    pub commands: Vec<CommandEntry>,
    #[serde(default)]
    pub options: Vec<HelpEntry>,
}

impl HelpRecord {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    /// Commands that get their own manual section, i.e. all but `help`.
    pub fn documented_commands(&self) -> impl Iterator<Item = &CommandEntry> {
        self.commands.iter().filter(|command| !command.is_help())
    }

    pub fn find_command(&self, name: &str) -> Option<&CommandEntry> {
        self.commands.iter().find(|command| command.name == name)
    }

    /// Returns `true` when no section produced any entry.
    pub fn is_empty(&self) -> bool {
        self.arguments.is_empty() && self.commands.is_empty() && self.options.is_empty()
    }

    /// Appends a parsed row to the list for `section`.
    pub fn push_entry(&mut self, section: Section, label: String, description: String) {
        match section {
            Section::Commands => self.commands.push(CommandEntry {
                name: label,
                description,
            }),
            Section::Arguments => self.arguments.push(HelpEntry { label, description }),
            Section::Options => self.options.push(HelpEntry { label, description }),
        }
    }
}

/// Subcommand tokens from the tool's root to one node of its command tree.
///
/// The empty path is the root. Each recursion level appends one token.
/// `Display` joins tokens with spaces, the way a user would type them.
///
/// # Examples
///
/// ```
/// use help_manual_core::CommandPath;
///
/// let path = CommandPath::root().child("media").child("upload");
/// assert_eq!(path.depth(), 2);
/// assert_eq!(path.to_string(), "media upload");
/// assert_eq!(path.anchor(), "command-media-upload");
/// assert_eq!(CommandPath::root().anchor(), "command");
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CommandPath(Vec<String>);

impl CommandPath {
    pub fn root() -> Self {
        Self(Vec::new())
    }

    pub fn from_tokens<I, S>(tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(tokens.into_iter().map(Into::into).collect())
    }

    /// Returns a new path extended by `name`.
    pub fn child(&self, name: &str) -> Self {
        let mut tokens = self.0.clone();
        tokens.push(name.to_string());
        Self(tokens)
    }

    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of tokens; the root has depth 0.
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    pub fn tokens(&self) -> &[String] {
        &self.0
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|token| token == name)
    }

    /// Markdown anchor of this path's `Command: ...` heading.
    ///
    /// Matches the slug GitHub generates for the heading text, which is
    /// `command` followed by every token, joined by `-`.
    pub fn anchor(&self) -> String {
        let mut anchor = String::from("command");
        for token in &self.0 {
            anchor.push('-');
            anchor.push_str(token);
        }
        anchor
    }
}

impl fmt::Display for CommandPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_documented_commands_skip_help() {
        let mut record = HelpRecord::new("tool");
        record.commands.push(CommandEntry::new("help", "Print help"));
        record.commands.push(CommandEntry::new("build", "Build"));
        record.commands.push(CommandEntry::new("helper", "Not the help command"));

        let names: Vec<_> = record
            .documented_commands()
            .map(|c| c.name.as_str())
            .collect();
        assert_eq!(names, ["build", "helper"]);
        assert_eq!(record.commands.len(), 3);
    }

    #[test]
    fn test_push_entry_routes_by_section() {
        let mut record = HelpRecord::default();
        record.push_entry(Section::Commands, "run".into(), "Run it".into());
        record.push_entry(Section::Arguments, "<FILE>".into(), "Input".into());
        record.push_entry(Section::Options, "-v, --verbose".into(), String::new());

        assert_eq!(record.commands, vec![CommandEntry::new("run", "Run it")]);
        assert_eq!(record.arguments, vec![HelpEntry::new("<FILE>", "Input")]);
        assert_eq!(record.options, vec![HelpEntry::new("-v, --verbose", "")]);
    }

    #[test]
    fn test_command_path_child_does_not_mutate_parent() {
        let parent = CommandPath::from_tokens(["album"]);
        let child = parent.child("list");

        assert_eq!(parent.depth(), 1);
        assert_eq!(child.tokens(), ["album", "list"]);
        assert!(child.contains("album"));
        assert!(!parent.contains("list"));
    }

    #[test]
    fn test_root_path_display_is_empty() {
        let root = CommandPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
    }

    #[test]
    fn test_record_serializes_with_snake_case_fields() {
        let mut record = HelpRecord::new("tool");
        record.usage = "tool [OPTIONS]".to_string();
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["description"], "tool");
        assert_eq!(json["usage"], "tool [OPTIONS]");
        assert!(json["commands"].as_array().unwrap().is_empty());

        let path = CommandPath::from_tokens(["a", "b"]);
        assert_eq!(serde_json::to_value(&path).unwrap(), serde_json::json!(["a", "b"]));
    }
}
