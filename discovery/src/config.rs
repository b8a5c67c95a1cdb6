//! Manual generation configuration.
//!
//! Loaded from YAML (typically `help-manual.yml` next to the project) and
//! overridden field by field from the command line.
//!
//! # Example YAML
//!
//! ```yaml
//! program: target/release/pmv-cli
//! args: []
//! output: MANUAL.md
//! help_flag: --help
//! title: Manual
//! link_commands: true
//! timeout_ms: 5000
//! max_depth: 32
//! ```
//!
//! Every key except `program` is optional.

use std::io::{BufReader, BufWriter};
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ManualError, Result};
use crate::extractor::{DEFAULT_HELP_FLAG, ProcessHelpSource};
use crate::render::{DEFAULT_TITLE, RenderOptions};
use crate::walker::{DEFAULT_MAX_DEPTH, WalkOptions};

/// Manual file written when no output path is configured.
pub const DEFAULT_OUTPUT: &str = "MANUAL.md";

/// Settings for one manual generation run.
///
/// # Examples
///
/// ```
/// use help_manual_discovery::config::ManualConfig;
///
/// let config: ManualConfig = serde_yaml::from_str("program: ./tool").unwrap();
/// assert_eq!(config.output.to_str(), Some("MANUAL.md"));
/// assert_eq!(config.help_flag, "--help");
/// assert!(config.link_commands);
/// assert!(config.timeout_ms.is_none());
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ManualConfig {
    /// Executable whose help system is walked.
    pub program: PathBuf,
    /// Arguments passed before the command path on every invocation.
    pub args: Vec<String>,
    /// Markdown file to (over)write.
    pub output: PathBuf,
    /// Flag appended to every invocation.
    pub help_flag: String,
    /// Root heading text.
    pub title: String,
    /// Link command names to their sections.
    pub link_commands: bool,
    /// Per-probe timeout; `None` waits indefinitely.
    pub timeout_ms: Option<u64>,
    /// Deepest command path the walker will visit.
    pub max_depth: usize,
}

impl Default for ManualConfig {
    fn default() -> Self {
        Self {
            program: PathBuf::new(),
            args: Vec::new(),
            output: PathBuf::from(DEFAULT_OUTPUT),
            help_flag: DEFAULT_HELP_FLAG.to_string(),
            title: DEFAULT_TITLE.to_string(),
            link_commands: true,
            timeout_ms: None,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl ManualConfig {
    /// Loads configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`Io`](ManualError::Io) if the file cannot be read, or
    /// [`Yaml`](ManualError::Yaml) if parsing fails.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = std::fs::File::open(path).map_err(|source| ManualError::Io {
            context: format!("failed to open config '{}'", path.display()),
            source,
        })?;
        let config = serde_yaml::from_reader(BufReader::new(file))?;
        Ok(config)
    }

    /// Saves the configuration as YAML.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file = std::fs::File::create(path).map_err(|source| ManualError::Write {
            path: path.to_path_buf(),
            source,
        })?;
        serde_yaml::to_writer(BufWriter::new(file), self)?;
        Ok(())
    }

    /// Checks that the configuration can drive a run.
    pub fn validate(&self) -> Result<()> {
        if self.program.as_os_str().is_empty() {
            return Err(ManualError::Config(
                "no program configured; pass --program or set `program`".to_string(),
            ));
        }
        if self.help_flag.trim().is_empty() {
            return Err(ManualError::Config("help_flag must not be empty".to_string()));
        }
        if self.output.as_os_str().is_empty() {
            return Err(ManualError::Config("output must not be empty".to_string()));
        }
        if self.timeout_ms == Some(0) {
            return Err(ManualError::Config(
                "timeout_ms must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_ms.map(Duration::from_millis)
    }

    /// Builds the process-backed help source for this configuration.
    pub fn help_source(&self) -> ProcessHelpSource {
        ProcessHelpSource::new(&self.program)
            .with_base_args(self.args.iter().cloned())
            .with_help_flag(&self.help_flag)
            .with_timeout(self.timeout())
    }

    pub fn walk_options(&self) -> WalkOptions {
        WalkOptions {
            render: RenderOptions {
                title: self.title.clone(),
                link_commands: self.link_commands,
            },
            max_depth: self.max_depth,
        }
    }
}
