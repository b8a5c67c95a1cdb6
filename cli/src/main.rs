use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use help_manual_core::CommandPath;
use help_manual_discovery::config::ManualConfig;
use help_manual_discovery::output::{OutputFormat, format_record};
use help_manual_discovery::parser::HelpParser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "help-manual", version)]
#[command(about = "Generate a Markdown manual from a CLI tool's built-in help")]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug). RUST_LOG takes precedence.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Walk a program's help tree and write the Markdown manual.
    Generate(GenerateArgs),
    /// Parse help text from a file without executing commands.
    ParseFile(ParseFileArgs),
    /// Parse help text from stdin without executing commands.
    ParseStdin(ParseStdinArgs),
}

#[derive(Debug, Args)]
struct GenerateArgs {
    /// YAML config file; flags below override its values.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Program whose help is walked.
    #[arg(long)]
    program: Option<PathBuf>,
    /// Argument placed before the command path on every invocation (repeatable).
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    args: Vec<String>,
    /// Markdown file to write (default: MANUAL.md).
    #[arg(long)]
    output: Option<PathBuf>,
    /// Help flag appended to every invocation (default: --help).
    #[arg(long, allow_hyphen_values = true)]
    help_flag: Option<String>,
    /// Root heading text (default: Manual).
    #[arg(long)]
    title: Option<String>,
    /// Render command names as code spans instead of section links.
    #[arg(long)]
    no_links: bool,
    /// Kill a help probe after this many milliseconds.
    #[arg(long)]
    timeout_ms: Option<u64>,
    /// Deepest subcommand nesting to follow.
    #[arg(long)]
    max_depth: Option<usize>,
}

#[derive(Debug, Args)]
struct ParseFileArgs {
    /// Path to file containing help text.
    #[arg(long)]
    input: PathBuf,
    #[command(flatten)]
    shared: ParseArgs,
}

#[derive(Debug, Args)]
struct ParseStdinArgs {
    #[command(flatten)]
    shared: ParseArgs,
}

#[derive(Debug, Args)]
struct ParseArgs {
    /// Space-separated command path the help text belongs to (e.g. "album get").
    #[arg(long, default_value = "")]
    path: String,
    /// Output parse diagnostics together with the record.
    #[arg(long)]
    with_report: bool,
    /// Output format.
    #[arg(long, value_enum, default_value_t = OutputFormat::Json)]
    format: OutputFormat,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Command::Generate(args) => run_generate(args),
        Command::ParseFile(args) => run_parse_file(args),
        Command::ParseStdin(args) => run_parse_stdin(args),
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run_generate(args: GenerateArgs) -> Result<(), String> {
    let config = resolve_config(args)?;
    let summary = help_manual_discovery::write_manual(&config).map_err(|err| err.to_string())?;

    for warning in &summary.warnings {
        eprintln!("warning: {warning}");
    }
    println!(
        "Wrote {} sections ({} bytes) to {}",
        summary.sections,
        summary.bytes,
        summary.output.display()
    );
    Ok(())
}

fn resolve_config(args: GenerateArgs) -> Result<ManualConfig, String> {
    let mut config = match &args.config {
        Some(path) => ManualConfig::load(path).map_err(|err| err.to_string())?,
        None => ManualConfig::default(),
    };

    if let Some(program) = args.program {
        config.program = program;
    }
    if !args.args.is_empty() {
        config.args = args.args;
    }
    if let Some(output) = args.output {
        config.output = output;
    }
    if let Some(help_flag) = args.help_flag {
        config.help_flag = help_flag;
    }
    if let Some(title) = args.title {
        config.title = title;
    }
    if args.no_links {
        config.link_commands = false;
    }
    if args.timeout_ms.is_some() {
        config.timeout_ms = args.timeout_ms;
    }
    if let Some(max_depth) = args.max_depth {
        config.max_depth = max_depth;
    }

    config.validate().map_err(|err| err.to_string())?;
    debug!(
        program = %config.program.display(),
        output = %config.output.display(),
        timeout_ms = ?config.timeout_ms,
        max_depth = config.max_depth,
        "Resolved configuration"
    );
    Ok(config)
}

fn run_parse_file(args: ParseFileArgs) -> Result<(), String> {
    let help_text = fs::read_to_string(&args.input)
        .map_err(|err| format!("Failed to read '{}': {err}", args.input.display()))?;
    run_parse_help_text(&help_text, &args.shared)
}

fn run_parse_stdin(args: ParseStdinArgs) -> Result<(), String> {
    let mut help_text = String::new();
    std::io::stdin()
        .read_to_string(&mut help_text)
        .map_err(|err| format!("Failed to read stdin: {err}"))?;
    run_parse_help_text(&help_text, &args.shared)
}

fn run_parse_help_text(help_text: &str, args: &ParseArgs) -> Result<(), String> {
    let path = CommandPath::from_tokens(args.path.split_whitespace());
    let mut parser = HelpParser::new(help_text);
    let record = parser.parse();
    let format = args.format;

    if args.with_report {
        #[derive(serde::Serialize)]
        struct ParseOutput<'a> {
            path: &'a CommandPath,
            record: &'a help_manual_core::HelpRecord,
            diagnostics: &'a help_manual_discovery::parser::ParseDiagnostics,
            coverage: f64,
        }

        let output = ParseOutput {
            path: &path,
            record: &record,
            diagnostics: parser.diagnostics(),
            coverage: parser.diagnostics().coverage(),
        };

        match format {
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{json}");
                return Ok(());
            }
            OutputFormat::Yaml => {
                let yaml = serde_yaml::to_string(&output)
                    .map_err(|e| format!("Failed to serialize output: {e}"))?;
                println!("{yaml}");
                return Ok(());
            }
            OutputFormat::Markdown | OutputFormat::Table => {
                let diagnostics = parser.diagnostics();
                eprintln!(
                    "recognized {}/{} lines, {} ignored",
                    diagnostics.recognized_lines,
                    diagnostics.relevant_lines,
                    diagnostics.ignored_lines.len()
                );
            }
        }
    }

    let rendered = format_record(&record, &path, format).map_err(|err| err.to_string())?;
    println!("{rendered}");
    Ok(())
}
