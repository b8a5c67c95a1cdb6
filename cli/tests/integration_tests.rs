//! End-to-end tests for the `help-manual` binary.
//!
//! The external tool is a POSIX shell script run through `sh`, so these
//! tests only build on Unix.
#![cfg(unix)]

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn help_manual_bin() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_help-manual"))
}

/// Fake tool: answers `--help` for the root, `build` and `build release`.
const TREE_TOOL: &str = r#"
case "$*" in
  "--help")
    cat <<'HELP'
Root tool

Usage: tool [OPTIONS] <COMMAND>

Commands:
  build  Builds the project
  help   Print this message or the help of the given subcommand(s)

Options:
  -h, --help  Print help
HELP
    ;;
  "build --help")
    cat <<'HELP'
Builds the project

Usage: tool build [OPTIONS] <COMMAND>

Commands:
  release  Optimized build
  help     Print this message or the help of the given subcommand(s)

Arguments:
  [PATH]  Project directory

Options:
  -j, --jobs <N>  Parallel jobs
HELP
    ;;
  "build release --help")
    printf 'Optimized build\n\nUsage: tool build release\n'
    ;;
  *)
    echo "unexpected invocation: $*" >&2
    exit 2
    ;;
esac
"#;

/// Fake tool whose `loop` subcommand lists itself at every depth.
const CYCLE_TOOL: &str = r#"
case "$*" in
  "--help") printf 'Root\n\nCommands:\n  loop  Loops\n' ;;
  loop*"--help") printf 'Loop\n\nCommands:\n  loop  Loops again\n' ;;
esac
"#;

fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, body).expect("failed to write fake tool");
    path
}

fn run_generate(script: &Path, output: &Path, extra: &[&str]) -> Output {
    Command::new(help_manual_bin())
        .args(["generate", "--program", "sh", "--arg"])
        .arg(script)
        .arg("--output")
        .arg(output)
        .args(extra)
        .output()
        .expect("failed to run help-manual")
}

#[test]
fn test_generate_writes_full_manual() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "tool.sh", TREE_TOOL);
    let manual = dir.path().join("MANUAL.md");

    let output = run_generate(&script, &manual, &[]);
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );

    let markdown = fs::read_to_string(&manual).unwrap();
    assert!(markdown.starts_with("# Manual\n\nRoot tool\n"));
    assert!(markdown.contains("```\ntool [OPTIONS] <COMMAND>\n```"));
    assert!(markdown.contains("| [build](#command-build) | Builds the project |"));
    assert!(markdown.contains("\n## Command: build\n"));
    assert!(markdown.contains("| [release](#command-build-release) | Optimized build |"));
    assert!(markdown.contains("| `[PATH]` | Project directory |"));
    assert!(markdown.contains("| `-j, --jobs <N>` | Parallel jobs |"));
    assert!(markdown.contains("\n### Command: build release\n"));
    assert!(!markdown.contains("Command: help"));
    assert!(!markdown.ends_with("\n\n"));

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Wrote 3 sections"), "stdout: {stdout}");
}

#[test]
fn test_generate_is_deterministic() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "tool.sh", TREE_TOOL);
    let first = dir.path().join("first.md");
    let second = dir.path().join("second.md");

    assert!(run_generate(&script, &first, &[]).status.success());
    assert!(run_generate(&script, &second, &[]).status.success());
    assert_eq!(fs::read(&first).unwrap(), fs::read(&second).unwrap());
}

#[test]
fn test_generate_no_links_and_title() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "tool.sh", TREE_TOOL);
    let manual = dir.path().join("MANUAL.md");

    let output = run_generate(&script, &manual, &["--no-links", "--title", "Tool Reference"]);
    assert!(output.status.success());

    let markdown = fs::read_to_string(&manual).unwrap();
    assert!(markdown.starts_with("# Tool Reference\n"));
    assert!(markdown.contains("| `build` | Builds the project |"));
    assert!(!markdown.contains("](#command"));
}

#[test]
fn test_generate_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "tool.sh", TREE_TOOL);
    let manual = dir.path().join("docs").join("MANUAL.md");
    let config = dir.path().join("help-manual.yml");
    fs::write(
        &config,
        format!(
            "program: sh\nargs:\n  - {}\noutput: {}\ntitle: From Config\ntimeout_ms: 10000\n",
            script.display(),
            manual.display()
        ),
    )
    .unwrap();

    let output = Command::new(help_manual_bin())
        .args(["generate", "--config"])
        .arg(&config)
        .output()
        .expect("failed to run help-manual");
    assert!(
        output.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    assert!(fs::read_to_string(&manual).unwrap().starts_with("# From Config\n"));
}

#[test]
fn test_cycle_fails_and_keeps_previous_manual() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "cycle.sh", CYCLE_TOOL);
    let manual = dir.path().join("MANUAL.md");
    fs::write(&manual, "previous manual").unwrap();

    let output = run_generate(&script, &manual, &[]);
    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));

    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: command cycle: 'loop loop'"), "stderr: {stderr}");
    assert_eq!(fs::read_to_string(&manual).unwrap(), "previous manual");
}

#[test]
fn test_missing_program_fails_to_start() {
    let dir = tempfile::tempdir().unwrap();
    let manual = dir.path().join("MANUAL.md");

    let output = Command::new(help_manual_bin())
        .args(["generate", "--program", "/nonexistent/help-manual-fake-tool", "--output"])
        .arg(&manual)
        .output()
        .expect("failed to run help-manual");

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("error: failed to start"), "stderr: {stderr}");
    assert!(!manual.exists());
}

#[test]
fn test_generate_without_program_is_rejected() {
    let output = Command::new(help_manual_bin())
        .arg("generate")
        .output()
        .expect("failed to run help-manual");

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no program configured"));
}

#[test]
fn test_parse_stdin_json_output() {
    use std::io::Write;
    use std::process::Stdio;

    let mut child = Command::new(help_manual_bin())
        .args(["parse-stdin", "--format", "json"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .spawn()
        .expect("failed to run help-manual");
    child
        .stdin
        .take()
        .unwrap()
        .write_all(b"Root tool\n\nUsage: tool cmd [--opt VAL:TYPE]\n\nCommands:\n  foo    does a thing\n")
        .unwrap();
    let output = child.wait_with_output().unwrap();
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["description"], "Root tool");
    assert_eq!(parsed["usage"], "tool cmd [--opt VAL:TYPE]");
    assert_eq!(parsed["commands"][0]["name"], "foo");
    assert_eq!(parsed["commands"][0]["description"], "does a thing");
}

#[test]
fn test_parse_file_markdown_with_path() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("help.txt");
    fs::write(&input, "Get album\n\nUsage: tool album get <ALBUM>\n\nArguments:\n  <ALBUM>  Album ID\n").unwrap();

    let output = Command::new(help_manual_bin())
        .args(["parse-file", "--format", "markdown", "--path", "album get", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run help-manual");
    assert!(output.status.success());

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.starts_with("### Command: album get\n"));
    assert!(stdout.contains("| `<ALBUM>` | Album ID |"));
}

#[test]
fn test_parse_file_with_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("help.txt");
    fs::write(&input, "tool\nstray\nUsage: tool\n").unwrap();

    let output = Command::new(help_manual_bin())
        .args(["parse-file", "--with-report", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run help-manual");
    assert!(output.status.success());

    let parsed: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(parsed["record"]["usage"], "tool");
    assert_eq!(parsed["diagnostics"]["ignored_lines"][0], "stray");
    assert_eq!(parsed["coverage"], 0.5);
}

#[test]
fn test_parse_file_table_format_and_unknown_format() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("help.txt");
    fs::write(&input, "tool\n\nOptions:\n  -q, --quiet  Quiet\n").unwrap();

    let output = Command::new(help_manual_bin())
        .args(["parse-file", "--format", "table", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run help-manual");
    assert!(output.status.success());
    assert!(String::from_utf8_lossy(&output.stdout).contains("\nOptions:\n  -q, --quiet  Quiet\n"));

    let output = Command::new(help_manual_bin())
        .args(["parse-file", "--format", "html", "--input"])
        .arg(&input)
        .output()
        .expect("failed to run help-manual");
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("invalid value 'html'"));
}
