//! Core types for command manuals built from help output.
//!
//! This crate defines the data model shared by the parser, the tree walker
//! and the renderers:
//!
//! - [`HelpRecord`] — one parsed `--help` block (description, usage line,
//!   commands, arguments, options).
//! - [`CommandEntry`] — a subcommand row from a `Commands:` section.
//! - [`HelpEntry`] — an argument or option row (`label` + `description`).
//! - [`CommandPath`] — the subcommand tokens from the root to one node.
//! - [`Section`] — the section headers the parser recognizes.
//!
//! # Example
//!
//! ```
//! use help_manual_core::*;
//!
//! let mut record = HelpRecord::new("Media vault client");
//! record.usage = "pmv-cli [OPTIONS] <COMMAND>".to_string();
//! record.commands.push(CommandEntry::new("login", "Logs into the vault"));
//! record.commands.push(CommandEntry::new("help", "Print this message"));
//!
//! let names: Vec<_> = record.documented_commands().map(|c| c.name.as_str()).collect();
//! assert_eq!(names, ["login"]);
//!
//! let path = CommandPath::root().child("login");
//! assert_eq!(path.to_string(), "login");
//! ```

mod types;

pub use types::*;
