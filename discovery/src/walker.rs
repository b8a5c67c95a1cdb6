//! Recursive manual generation over a tool's command tree.
//!
//! The walk is depth-first and pre-order: a command's section is fully
//! rendered before any of its subcommands is probed, and subcommands are
//! visited in the order the parent's help lists them. Probes run one at a
//! time; the next starts only after the previous output has been parsed.
//!
//! The `help` pseudo-command is never visited. A subcommand may reuse an
//! ancestor's name (`tool user group user` is an ordinary leaf); the walk
//! aborts with [`ManualError::CommandCycle`] only when such a subcommand
//! prints exactly the help text of that ancestor. Paths deeper than
//! [`WalkOptions::max_depth`] abort with [`ManualError::DepthLimit`]. A path
//! listed twice under the same parent is rendered once.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use help_manual_core::CommandPath;

use crate::error::{ManualError, Result};
use crate::extractor::HelpSource;
use crate::parser::HelpParser;
use crate::render::{ManualDocument, RenderOptions};

/// Default bound on command path length.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Options for a walk.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    pub render: RenderOptions,
    pub max_depth: usize,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            render: RenderOptions::default(),
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Result of a completed walk.
#[derive(Debug, Clone, Default)]
pub struct WalkOutcome {
    pub document: ManualDocument,
    /// Command paths rendered, in visit order.
    pub visited: Vec<CommandPath>,
    pub warnings: Vec<String>,
}

/// Depth-first walker that renders every reachable command.
///
/// # Examples
///
/// ```
/// use help_manual_core::CommandPath;
/// use help_manual_discovery::extractor::StaticHelpSource;
/// use help_manual_discovery::walker::{ManualWalker, WalkOptions};
///
/// let mut source = StaticHelpSource::default()
///     .with_help(
///         CommandPath::root(),
///         "Root tool\n\nUsage: tool [OPTIONS]\n\nCommands:\n  build  Builds the project\n",
///     )
///     .with_help(CommandPath::root().child("build"), "Builds the project\n\nUsage: tool build\n");
///
/// let outcome = ManualWalker::new(&mut source, WalkOptions::default()).walk().unwrap();
/// assert_eq!(outcome.visited.len(), 2);
/// assert!(outcome.document.lines().contains(&"## Command: build".to_string()));
/// ```
pub struct ManualWalker<'s, S: HelpSource + ?Sized> {
    source: &'s mut S,
    options: WalkOptions,
    seen: HashSet<CommandPath>,
    /// Help text of every command on the current path, root first.
    ancestors: Vec<(CommandPath, String)>,
    outcome: WalkOutcome,
}

impl<'s, S: HelpSource + ?Sized> ManualWalker<'s, S> {
    pub fn new(source: &'s mut S, options: WalkOptions) -> Self {
        Self {
            source,
            options,
            seen: HashSet::new(),
            ancestors: Vec::new(),
            outcome: WalkOutcome::default(),
        }
    }

    /// Walks the whole tree starting at the root command.
    pub fn walk(self) -> Result<WalkOutcome> {
        self.walk_from(CommandPath::root())
    }

    /// Walks the subtree rooted at `start`.
    ///
    /// Heading levels follow the absolute depth of each path, so a subtree
    /// rendered on its own lines up with the same section of a full manual.
    pub fn walk_from(mut self, start: CommandPath) -> Result<WalkOutcome> {
        let mut document = ManualDocument::new();
        self.visit(&start, &mut document)?;
        info!(
            sections = self.outcome.visited.len(),
            warnings = self.outcome.warnings.len(),
            "Walked command tree"
        );
        self.outcome.document = document;
        Ok(self.outcome)
    }

    fn visit(&mut self, path: &CommandPath, document: &mut ManualDocument) -> Result<()> {
        if path.depth() > self.options.max_depth {
            return Err(ManualError::DepthLimit {
                path: path.to_string(),
                max_depth: self.options.max_depth,
            });
        }
        self.seen.insert(path.clone());
        self.outcome.visited.push(path.clone());

        document.push_heading(path, &self.options.render);

        let text = self.source.fetch_help(path)?;
        if let Some(ancestor) = self.repeated_ancestor(path, &text) {
            return Err(ManualError::CommandCycle {
                path: path.to_string(),
                ancestor: ancestor.to_string(),
            });
        }

        let mut parser = HelpParser::new(&text);
        let record = parser.parse();
        let ignored = parser.diagnostics().ignored_lines.len();
        if ignored > 0 {
            debug!(command = %path, ignored, "Dropped lines outside any section");
        }

        document.push_record(&record, path, &self.options.render);

        self.ancestors.push((path.clone(), text));
        for command in record.documented_commands() {
            let child = path.child(&command.name);
            if self.seen.contains(&child) {
                let message = format!("Skipping duplicate listing of '{child}'");
                warn!(command = %child, "Skipping duplicate subcommand listing");
                self.outcome.warnings.push(message);
                continue;
            }

            debug!(command = %child, depth = child.depth(), "Descending into subcommand");
            self.visit(&child, document)?;
        }
        self.ancestors.pop();

        Ok(())
    }

    /// Finds an ancestor named like `path` whose help text is identical.
    fn repeated_ancestor(&self, path: &CommandPath, text: &str) -> Option<&CommandPath> {
        let name = path.tokens().last()?;
        self.ancestors
            .iter()
            .find(|(ancestor, ancestor_text)| {
                ancestor.tokens().last() == Some(name) && ancestor_text == text
            })
            .map(|(ancestor, _)| ancestor)
    }
}

/// Walks the whole tree of `source` and returns the finished document.
pub fn generate_manual<S: HelpSource + ?Sized>(
    source: &mut S,
    options: WalkOptions,
) -> Result<ManualDocument> {
    ManualWalker::new(source, options)
        .walk()
        .map(|outcome| outcome.document)
}
