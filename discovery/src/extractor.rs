//! Help text acquisition.
//!
//! The walker asks a [`HelpSource`] for the help text of each command path.
//! [`ProcessHelpSource`] runs the real tool as `<program> <path...> --help`
//! and returns everything it printed on stdout. Tests and offline callers can
//! implement the trait over captured text instead.
//!
//! # Example
//!
//! ```no_run
//! use help_manual_core::CommandPath;
//! use help_manual_discovery::extractor::{HelpSource, ProcessHelpSource};
//!
//! let mut source = ProcessHelpSource::new("cargo");
//! let text = source.fetch_help(&CommandPath::root().child("build")).unwrap();
//! println!("{text}");
//! ```

use std::collections::HashMap;
use std::io::Read;
use std::path::PathBuf;
use std::process::{Child, Command, ExitStatus, Stdio};
use std::thread::JoinHandle;
use std::time::Duration;

use tracing::{debug, warn};
use wait_timeout::ChildExt;

use help_manual_core::CommandPath;

use crate::error::{ManualError, Result};

/// Help flag appended to every invocation unless configured otherwise.
pub const DEFAULT_HELP_FLAG: &str = "--help";

/// Supplies raw help text for a command path.
pub trait HelpSource {
    fn fetch_help(&mut self, path: &CommandPath) -> Result<String>;
}

/// Help source backed by captured text, keyed by command path.
///
/// Paths with no entry produce empty text, which parses to an empty record.
///
/// # Examples
///
/// ```
/// use help_manual_core::CommandPath;
/// use help_manual_discovery::extractor::{HelpSource, StaticHelpSource};
///
/// let mut source = StaticHelpSource::default()
///     .with_help(CommandPath::root(), "Root tool\n\nUsage: tool");
/// assert_eq!(source.fetch_help(&CommandPath::root()).unwrap(), "Root tool\n\nUsage: tool");
/// assert_eq!(source.fetch_help(&CommandPath::root().child("x")).unwrap(), "");
/// assert_eq!(source.requests().len(), 2);
/// ```
#[derive(Debug, Clone, Default)]
pub struct StaticHelpSource {
    pages: HashMap<CommandPath, String>,
    requests: Vec<CommandPath>,
}

impl StaticHelpSource {
    pub fn with_help(mut self, path: CommandPath, text: impl Into<String>) -> Self {
        self.pages.insert(path, text.into());
        self
    }

    /// Paths requested so far, in request order.
    pub fn requests(&self) -> &[CommandPath] {
        &self.requests
    }
}

impl HelpSource for StaticHelpSource {
    fn fetch_help(&mut self, path: &CommandPath) -> Result<String> {
        self.requests.push(path.clone());
        Ok(self.pages.get(path).cloned().unwrap_or_default())
    }
}

/// Runs the external tool once per command path.
#[derive(Debug, Clone)]
pub struct ProcessHelpSource {
    program: PathBuf,
    base_args: Vec<String>,
    help_flag: String,
    timeout: Option<Duration>,
}

impl ProcessHelpSource {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            base_args: Vec::new(),
            help_flag: DEFAULT_HELP_FLAG.to_string(),
            timeout: None,
        }
    }

    /// Arguments placed before the command path on every invocation, e.g.
    /// `["run", "--quiet", "--"]` for `cargo`.
    pub fn with_base_args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<String>,
    {
        self.base_args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_help_flag(mut self, help_flag: impl Into<String>) -> Self {
        self.help_flag = help_flag.into();
        self
    }

    /// Kills probes that run longer than `timeout`. Without one the probe
    /// is waited on indefinitely.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Arguments passed to the program for `path`.
    pub fn argv(&self, path: &CommandPath) -> Vec<String> {
        let mut argv = self.base_args.clone();
        argv.extend(path.tokens().iter().cloned());
        argv.push(self.help_flag.clone());
        argv
    }

    fn display_argv(&self, argv: &[String]) -> String {
        let mut parts = vec![self.program.display().to_string()];
        parts.extend(argv.iter().cloned());
        parts.join(" ")
    }
}

impl HelpSource for ProcessHelpSource {
    fn fetch_help(&mut self, path: &CommandPath) -> Result<String> {
        let argv = self.argv(path);
        let shown = self.display_argv(&argv);
        debug!(command = %shown, "Probing help");

        let mut command = Command::new(&self.program);
        command
            .args(&argv)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());
        for (key, value) in probe_env() {
            command.env(key, value);
        }

        let mut child = command.spawn().map_err(|source| ManualError::Spawn {
            program: self.program.display().to_string(),
            source,
        })?;

        // Drain both pipes off-thread so a chatty child cannot fill a pipe
        // buffer and block before it exits.
        let stdout_reader = child.stdout.take().map(spawn_reader);
        let stderr_reader = child.stderr.take().map(spawn_reader);

        let status = match wait_for_child(&mut child, self.timeout) {
            Ok(Some(status)) => status,
            Ok(None) => {
                abandon_child(&mut child, &shown, [stdout_reader, stderr_reader]);
                return Err(ManualError::Timeout {
                    argv: shown,
                    timeout_ms: self
                        .timeout
                        .map_or(0, |timeout| timeout.as_millis() as u64),
                });
            }
            Err(source) => {
                abandon_child(&mut child, &shown, [stdout_reader, stderr_reader]);
                return Err(ManualError::Io {
                    context: format!("failed waiting for '{shown}'"),
                    source,
                });
            }
        };

        let stdout = join_reader(stdout_reader, &shown, "stdout")?;
        let stderr = join_reader(stderr_reader, &shown, "stderr")?;

        if !status.success() {
            warn!(
                command = %shown,
                exit_code = ?status.code(),
                stderr = %String::from_utf8_lossy(&stderr).trim(),
                "Help probe exited unsuccessfully; using its stdout anyway"
            );
        }

        let text = String::from_utf8_lossy(&stdout).into_owned();
        debug!(command = %shown, length = text.len(), "Got help output");
        Ok(text)
    }
}

type ReaderHandle = JoinHandle<std::io::Result<Vec<u8>>>;

fn spawn_reader<R>(mut pipe: R) -> ReaderHandle
where
    R: Read + Send + 'static,
{
    std::thread::spawn(move || {
        let mut buf = Vec::new();
        pipe.read_to_end(&mut buf)?;
        Ok(buf)
    })
}

fn join_reader(reader: Option<ReaderHandle>, shown: &str, stream: &str) -> Result<Vec<u8>> {
    let Some(handle) = reader else {
        return Ok(Vec::new());
    };
    match handle.join() {
        Ok(Ok(buf)) => Ok(buf),
        Ok(Err(source)) => Err(ManualError::Io {
            context: format!("failed reading {stream} of '{shown}'"),
            source,
        }),
        Err(_) => Err(ManualError::Io {
            context: format!("{stream} reader for '{shown}' panicked"),
            source: std::io::Error::other("reader thread panicked"),
        }),
    }
}

/// Kills and reaps a probe that will not be read to completion.
///
/// The reader threads are detached, not joined: a grandchild that inherited
/// the pipes (e.g. a tool started through `sh script`) can keep them open
/// after the child is killed. Each reader exits on its own once the last
/// writer of its pipe is gone, or with the process.
fn abandon_child(child: &mut Child, shown: &str, readers: [Option<ReaderHandle>; 2]) {
    if let Err(err) = child.kill() {
        debug!(command = %shown, error = %err, "Failed to kill help probe");
    }
    if let Err(err) = child.wait() {
        debug!(command = %shown, error = %err, "Failed to reap help probe");
    }
    let detached = readers.iter().flatten().filter(|reader| !reader.is_finished()).count();
    if detached > 0 {
        debug!(command = %shown, detached, "Leaving output readers detached");
    }
}

fn wait_for_child(
    child: &mut Child,
    timeout: Option<Duration>,
) -> std::io::Result<Option<ExitStatus>> {
    match timeout {
        Some(timeout) => child.wait_timeout(timeout),
        None => child.wait().map(Some),
    }
}

fn probe_env() -> [(&'static str, &'static str); 4] {
    [
        // Keep help output free of ANSI styling and pagers.
        ("NO_COLOR", "1"),
        ("CLICOLOR", "0"),
        ("TERM", "dumb"),
        ("PAGER", "cat"),
    ]
}
