//! CLI Application logic
//!
//! Contains the command-line interface implementation.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use glob::glob;
use rayon::prelude::*;
use serde::Serialize;

use adoc_callouts_core::{
    BlockReport, BlockStatus, CalloutConverter, Format, Settings, Warning, CONFIG_FILE_NAME,
};

/// Output format for reports
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for tool consumption
    Json,
}

/// Callout output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CalloutFormat {
    /// Definition list after the block
    Deflist,
    /// Bulleted list after the block
    Bullets,
    /// Trailing comments on the code lines
    Comments,
}

impl From<CalloutFormat> for Format {
    fn from(format: CalloutFormat) -> Self {
        match format {
            CalloutFormat::Deflist => Format::Deflist,
            CalloutFormat::Bullets => Format::Bullets,
            CalloutFormat::Comments => Format::Comments,
        }
    }
}

#[derive(Parser)]
#[command(name = "adoc-callouts")]
#[command(author, version, about = "Convert AsciiDoc callouts to lists or comments", long_about = None)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Convert callouts in AsciiDoc files
    Convert {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Callout output format
        #[arg(short, long, value_enum)]
        format: Option<CalloutFormat>,

        /// Longest inline comment before falling back to a definition list
        #[arg(short, long)]
        max_comment_length: Option<usize>,

        /// Report what would change without writing files
        #[arg(long)]
        dry_run: bool,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,
    },

    /// Report callout blocks without modifying files
    Check {
        /// Files, directories or glob patterns
        #[arg(required = true)]
        paths: Vec<PathBuf>,

        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output format (text or json)
        #[arg(long, value_enum, default_value = "text")]
        output_format: OutputFormat,

        /// Strict mode: exit with error code if any block cannot be converted
        #[arg(long)]
        strict: bool,
    },
}

/// Run the CLI application
///
/// This is the main entry point for the command-line interface.
/// It parses arguments and dispatches to the appropriate command.
pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Convert {
            paths,
            format,
            max_comment_length,
            dry_run,
            config,
            output_format,
        } => {
            let mut settings = load_settings(config.as_deref())?;
            apply_overrides(&mut settings, format, max_comment_length)?;
            convert_command(&paths, &settings, dry_run, output_format)?;
        }
        Commands::Check {
            paths,
            config,
            output_format,
            strict,
        } => {
            let settings = load_settings(config.as_deref())?;
            check_command(&paths, &settings, output_format, strict)?;
        }
    }

    Ok(())
}

/// Apply `--format` and `--max-comment-length` on top of loaded settings
fn apply_overrides(
    settings: &mut Settings,
    format: Option<CalloutFormat>,
    max_comment_length: Option<usize>,
) -> Result<()> {
    if let Some(format) = format {
        settings.convert.format = format.into();
    }
    if let Some(max) = max_comment_length {
        if max == 0 {
            anyhow::bail!("--max-comment-length must be greater than zero");
        }
        settings.convert.max_comment_length = max;
    }
    Ok(())
}

/// Log to stderr, `warn` by default, `debug` with `--verbose`
///
/// `RUST_LOG` takes precedence when `--verbose` is not given.
fn init_tracing(verbose: bool) {
    let filter = if verbose {
        tracing_subscriber::EnvFilter::new("debug")
    } else {
        tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"))
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Load settings from `--config`, or from `adoc-callouts.toml` in the
/// working directory when present
pub fn load_settings(config: Option<&Path>) -> Result<Settings> {
    match config {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Configuration file not found: {}", path.display());
            }
            Settings::load(path)
                .with_context(|| format!("Failed to load configuration: {}", path.display()))
        }
        None => Settings::discover(Path::new("."))
            .with_context(|| format!("Failed to load {}", CONFIG_FILE_NAME)),
    }
}

/// Expand files, directories (`**/*.adoc`) and glob patterns into a sorted
/// list of files
pub fn expand_paths(paths: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        if path.is_file() {
            files.push(path.clone());
        } else if path.is_dir() {
            let pattern = path.join("**").join("*.adoc");
            collect_glob(&pattern.to_string_lossy(), &mut files)?;
        } else {
            let before = files.len();
            collect_glob(&path.to_string_lossy(), &mut files)?;
            if files.len() == before {
                anyhow::bail!("No files found for: {}", path.display());
            }
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(count = files.len(), "files to process");
    Ok(files)
}

fn collect_glob(pattern: &str, files: &mut Vec<PathBuf>) -> Result<()> {
    let entries = glob(pattern).with_context(|| format!("Invalid glob pattern: {}", pattern))?;
    for entry in entries {
        let path = entry.with_context(|| format!("Failed to read entry for: {}", pattern))?;
        if path.is_file() {
            files.push(path);
        }
    }
    Ok(())
}

/// Conversion result for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileOutcome {
    /// File path
    pub path: PathBuf,
    /// Blocks converted
    pub conversions: usize,
    /// Whether the file was rewritten
    pub written: bool,
    /// Warnings raised for the file
    pub warnings: Vec<Warning>,
}

/// Inspection result for one file
#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    /// File path
    pub path: PathBuf,
    /// Callout blocks in document order
    pub blocks: Vec<BlockReport>,
}

impl FileReport {
    /// Blocks that cannot be converted as they stand
    pub fn blocked(&self) -> usize {
        self.blocks
            .iter()
            .filter(|b| b.status != BlockStatus::Convertible)
            .count()
    }
}

#[derive(Serialize)]
struct ConvertSummary<'a> {
    files: &'a [FileOutcome],
    conversions: usize,
    warnings: usize,
    dry_run: bool,
}

fn convert_file(path: &Path, converter: &CalloutConverter, dry_run: bool) -> Result<FileOutcome> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read input file: {}", path.display()))?;

    let outcome = converter
        .clone()
        .with_file_hint(path.display().to_string())
        .convert(&content);

    let written = !dry_run && outcome.new_text != content;
    if written {
        fs::write(path, &outcome.new_text)
            .with_context(|| format!("Failed to write file: {}", path.display()))?;
        tracing::debug!(path = %path.display(), blocks = outcome.conversion_count, "file rewritten");
    }

    Ok(FileOutcome {
        path: path.to_path_buf(),
        conversions: outcome.conversion_count,
        written,
        warnings: outcome.warnings,
    })
}

/// Convert every file in parallel
///
/// All files are attempted; failures are reported together afterwards.
pub fn convert_paths(
    paths: &[PathBuf],
    settings: &Settings,
    dry_run: bool,
) -> Result<Vec<FileOutcome>> {
    let files = expand_paths(paths)?;
    let converter = CalloutConverter::from_settings(settings);

    let results: Vec<(PathBuf, Result<FileOutcome>)> = files
        .par_iter()
        .map(|file| (file.clone(), convert_file(file, &converter, dry_run)))
        .collect();

    collect_results(results)
}

/// Inspect every file in parallel
pub fn check_paths(paths: &[PathBuf], settings: &Settings) -> Result<Vec<FileReport>> {
    let files = expand_paths(paths)?;
    let converter = CalloutConverter::from_settings(settings);

    let results: Vec<(PathBuf, Result<FileReport>)> = files
        .par_iter()
        .map(|file| {
            let report = fs::read_to_string(file)
                .with_context(|| format!("Failed to read input file: {}", file.display()))
                .map(|content| FileReport {
                    path: file.clone(),
                    blocks: converter.inspect(&content),
                });
            (file.clone(), report)
        })
        .collect();

    collect_results(results)
}

fn collect_results<T>(results: Vec<(PathBuf, Result<T>)>) -> Result<Vec<T>> {
    let (successes, errors): (Vec<_>, Vec<_>) =
        results.into_iter().partition(|(_, result)| result.is_ok());

    if !errors.is_empty() {
        eprintln!("\nFailed to process {} file(s):", errors.len());
        for (file, error) in &errors {
            if let Err(e) = error {
                eprintln!("  {}: {:#}", file.display(), e);
            }
        }
        anyhow::bail!("Failed to process {} file(s)", errors.len());
    }

    Ok(successes
        .into_iter()
        .filter_map(|(_, result)| result.ok())
        .collect())
}

/// Execute the convert command
pub fn convert_command(
    paths: &[PathBuf],
    settings: &Settings,
    dry_run: bool,
    output: OutputFormat,
) -> Result<()> {
    let outcomes = convert_paths(paths, settings, dry_run)?;
    let conversions: usize = outcomes.iter().map(|o| o.conversions).sum();
    let warnings: Vec<(&Path, &Warning)> = outcomes
        .iter()
        .flat_map(|o| o.warnings.iter().map(move |w| (o.path.as_path(), w)))
        .collect();

    match output {
        OutputFormat::Json => {
            let summary = ConvertSummary {
                files: &outcomes,
                conversions,
                warnings: warnings.len(),
                dry_run,
            };
            let json = serde_json::to_string_pretty(&summary)
                .context("Failed to serialize conversion report to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for outcome in outcomes.iter().filter(|o| o.conversions > 0) {
                let verb = if dry_run { "would convert" } else { "converted" };
                println!(
                    "✓ {}: {} {} block(s)",
                    outcome.path.display(),
                    verb,
                    outcome.conversions
                );
            }
            println!(
                "Processed {} file(s), {} block(s) {}",
                outcomes.len(),
                conversions,
                if dry_run { "to convert" } else { "converted" }
            );

            if !warnings.is_empty() {
                println!();
                for (path, warning) in &warnings {
                    if warning.file_hint().is_none() {
                        println!("{}:", path.display());
                    }
                    println!("{}", warning);
                    println!();
                }
                println!("Found {} warning(s)", warnings.len());
                if warnings.iter().any(|(_, w)| w.is_skip()) {
                    println!("Fix the reported callouts and re-run to convert the skipped blocks.");
                }
            }
        }
    }

    Ok(())
}

/// Execute the check command
pub fn check_command(
    paths: &[PathBuf],
    settings: &Settings,
    output: OutputFormat,
    strict: bool,
) -> Result<()> {
    let reports = check_paths(paths, settings)?;
    let total: usize = reports.iter().map(|r| r.blocks.len()).sum();
    let blocked: usize = reports.iter().map(FileReport::blocked).sum();

    match output {
        OutputFormat::Json => {
            let json = serde_json::to_string_pretty(&reports)
                .context("Failed to serialize block reports to JSON")?;
            println!("{}", json);
        }
        OutputFormat::Text => {
            for report in &reports {
                for block in &report.blocks {
                    let shape = block
                        .explanation_shape
                        .map(|s| s.to_string())
                        .unwrap_or_else(|| "no explanation".to_string());
                    println!(
                        "{}:{}: {} ({})",
                        report.path.display(),
                        block.line_range,
                        block.status,
                        shape
                    );
                }
            }
            if total == 0 {
                println!("✓ No callout blocks found");
            } else {
                println!(
                    "Found {} callout block(s): {} convertible, {} need attention",
                    total,
                    total - blocked,
                    blocked
                );
            }
        }
    }

    // Exit with error code in strict mode if a block cannot be converted
    if strict && blocked > 0 {
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_parse_convert_overrides() {
        let args = vec![
            "adoc-callouts",
            "convert",
            "docs",
            "--format",
            "comments",
            "--max-comment-length",
            "80",
            "--dry-run",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Convert {
                paths,
                format,
                max_comment_length,
                dry_run,
                config,
                output_format,
            } => {
                assert_eq!(paths, vec![PathBuf::from("docs")]);
                assert_eq!(format, Some(CalloutFormat::Comments));
                assert_eq!(max_comment_length, Some(80));
                assert!(dry_run);
                assert!(config.is_none());
                assert!(matches!(output_format, OutputFormat::Text));

                let mut settings = Settings::default();
                apply_overrides(&mut settings, format, max_comment_length).unwrap();
                assert_eq!(settings.convert.format, Format::Comments);
                assert_eq!(settings.convert.max_comment_length, 80);
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_parse_convert_zero_comment_length() {
        let args = vec![
            "adoc-callouts",
            "convert",
            "guide.adoc",
            "--format",
            "comments",
            "--max-comment-length",
            "0",
        ];
        let cli = Cli::try_parse_from(args).unwrap();

        match cli.command {
            Commands::Convert {
                format,
                max_comment_length,
                ..
            } => {
                let mut settings = Settings::default();
                let err = apply_overrides(&mut settings, format, max_comment_length).unwrap_err();
                assert!(err.to_string().contains("--max-comment-length"));
            }
            _ => panic!("Expected Convert command"),
        }
    }

    #[test]
    fn test_cli_parse_convert_requires_paths() {
        assert!(Cli::try_parse_from(vec!["adoc-callouts", "convert"]).is_err());
        assert!(
            Cli::try_parse_from(vec!["adoc-callouts", "convert", "a.adoc", "--format", "table"])
                .is_err()
        );
    }

    #[test]
    fn test_cli_parse_check_strict() {
        let args = vec![
            "adoc-callouts",
            "-v",
            "check",
            "a.adoc",
            "b.adoc",
            "--strict",
            "--output-format",
            "json",
        ];
        let cli = Cli::try_parse_from(args).unwrap();
        assert!(cli.verbose);

        match cli.command {
            Commands::Check {
                paths,
                config,
                output_format,
                strict,
            } => {
                assert_eq!(paths.len(), 2);
                assert!(config.is_none());
                assert!(matches!(output_format, OutputFormat::Json));
                assert!(strict);
            }
            _ => panic!("Expected Check command"),
        }
    }
}
