//! CLI entry point for media-mirror.
//!
//! This binary materializes a media library's shadow tree into structured
//! records and reports on them.
//!
//! # Usage
//!
//! ```bash
//! media-mirror [OPTIONS] <COMMAND>
//!
//! # Materialize every entry and show a summary
//! media-mirror --root /srv/mirror run
//!
//! # Report filenames the grammar does not fully account for
//! media-mirror --root /srv/mirror check
//!
//! # Tally one field across the library
//! media-mirror --root /srv/mirror stats --field quality_title
//!
//! # Write all records as CSV
//! media-mirror report --format csv --output library.csv
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

use std::io::Write;

use camino::Utf8PathBuf;
use clap::{Parser, Subcommand, ValueEnum};
use mm_core::{Config, Field, Record};
use mm_shadow::{ConsistencyChecker, FrequencyTable, Mirror, RunReport, StatsSnapshot};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// CLI ARGUMENT TYPES
// =============================================================================

/// Turns a media library's shadow tree into structured metadata records.
#[derive(Parser)]
#[command(name = "media-mirror", version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    command: Commands,

    /// Root of the shadow tree (overrides `mirror.root` in the config file).
    #[arg(short, long, global = true, env = "MEDIA_MIRROR_ROOT")]
    root: Option<Utf8PathBuf>,

    /// JSON configuration file.
    #[arg(short, long, global = true, env = "MEDIA_MIRROR_CONFIG")]
    config: Option<Utf8PathBuf>,

    /// Enable verbose logging (debug level).
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    no_color: bool,
}

/// Available subcommands.
#[derive(Subcommand)]
enum Commands {
    /// Materialize every shadow entry and display a summary.
    Run {
        /// List per-entry errors and warnings.
        #[arg(short, long)]
        detailed: bool,
    },

    /// Materialize, then check records against their filenames.
    Check,

    /// Materialize, then tally the values of one field.
    Stats {
        /// Field name, e.g. `quality_title` or `release_group`.
        #[arg(short, long)]
        field: Field,
    },

    /// Materialize, then write every record.
    Report {
        /// Output format.
        #[arg(short, long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// Output file (defaults to stdout).
        #[arg(short, long)]
        output: Option<Utf8PathBuf>,
    },
}

/// Report output format.
#[derive(Clone, Copy, ValueEnum)]
enum ReportFormat {
    /// JSON format.
    Json,
    /// CSV format.
    Csv,
}

// =============================================================================
// INITIALIZATION FUNCTIONS
// =============================================================================

/// Initializes the tracing subscriber for logging.
///
/// Respects the `RUST_LOG` environment variable if set. Otherwise, uses
/// `debug` level if `--verbose` is set, or `info` level by default.
fn init_tracing(verbose: bool, no_color: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        let level = if verbose { "debug" } else { "info" };
        EnvFilter::new(format!("{level},ignore=warn,globset=warn"))
    });

    // Check if colors should be disabled (flag or NO_COLOR env var)
    let use_ansi = !no_color && std::env::var("NO_COLOR").is_err();

    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_ansi(use_ansi).with_writer(std::io::stderr))
        .with(filter)
        .init();
}

/// Builds a [`Config`] from the config file and CLI arguments.
///
/// # Errors
///
/// Returns an error if the config file is invalid or no root is given.
fn build_config(cli: &Cli) -> color_eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    if let Some(root) = &cli.root {
        config.mirror.root.clone_from(root);
    }
    if config.mirror.root.as_str().is_empty() {
        return Err(color_eyre::eyre::eyre!(
            "no shadow root given; pass --root or set mirror.root in the config file"
        ));
    }
    config.validate()?;

    Ok(config)
}

/// Runs one materialization pass.
fn materialize(config: &Config) -> color_eyre::Result<RunReport> {
    let mirror = Mirror::new(config.mirror.clone())?;
    Ok(mirror.run()?)
}

// =============================================================================
// COMMAND IMPLEMENTATIONS
// =============================================================================

/// Materializes the tree and prints a summary.
fn run_run(config: &Config, detailed: bool) -> color_eyre::Result<()> {
    let report = materialize(config)?;
    print_stats_summary(&report.stats);

    if detailed {
        print_detailed_problems(&report)?;
    } else if !report.errors.is_empty() {
        let stderr = std::io::stderr();
        let mut handle = stderr.lock();
        writeln!(handle)?;
        writeln!(handle, "{} entries failed; rerun with --detailed to list them", report.errors.len())?;
    }

    Ok(())
}

/// Materializes the tree and prints consistency findings.
fn run_check(config: &Config) -> color_eyre::Result<()> {
    let report = materialize(config)?;
    let checker = ConsistencyChecker::new(&config.check);
    let findings = checker.check_all(&report.records);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    for finding in &findings {
        writeln!(handle, "{finding}")?;
    }
    writeln!(handle)?;
    writeln!(
        handle,
        "{} of {} records need attention",
        findings.len(),
        report.records.len()
    )?;

    Ok(())
}

/// Materializes the tree and prints a frequency table for `field`.
fn run_stats(config: &Config, field: Field) -> color_eyre::Result<()> {
    let report = materialize(config)?;
    let table = FrequencyTable::from_records(&report.records, field);

    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    write!(handle, "{table}")?;
    writeln!(handle, "{} records", table.total())?;

    Ok(())
}

/// Materializes the tree and writes every record in `format`.
fn run_report(config: &Config, format: ReportFormat, output: Option<Utf8PathBuf>) -> color_eyre::Result<()> {
    info!(root = %config.mirror.root, "Generating report");

    let report = materialize(config)?;
    let content = match format {
        ReportFormat::Json => generate_json_report(&report)?,
        ReportFormat::Csv => generate_csv_report(&report.records),
    };

    if let Some(output_path) = output {
        std::fs::write(output_path.as_std_path(), &content)?;
        info!(path = %output_path, "Report written");
    } else {
        let stdout = std::io::stdout();
        let mut handle = stdout.lock();
        write!(handle, "{content}")?;
    }

    Ok(())
}

// =============================================================================
// OUTPUT HELPERS
// =============================================================================

/// Prints a summary of run statistics.
fn print_stats_summary(stats: &StatsSnapshot) {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let _ = writeln!(handle);
    let _ = writeln!(handle, "Materialization Summary");
    let _ = writeln!(handle, "=======================");
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Shadow entries:     {}", stats.entries);
    let _ = writeln!(handle, "  Built:            {} (parsed and persisted)", stats.built);
    let _ = writeln!(handle, "  Loaded:           {} (already materialized)", stats.loaded);
    let _ = writeln!(handle, "  Errors:           {}", stats.errors);
    let _ = writeln!(handle, "Warnings:           {}", stats.warnings);
    let _ = writeln!(handle);
    let _ = writeln!(handle, "Success rate: {:.1}%", stats.success_rate());
}

/// Prints every entry error and build warning.
fn print_detailed_problems(report: &RunReport) -> std::io::Result<()> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    if !report.errors.is_empty() {
        writeln!(handle)?;
        writeln!(handle, "Errors ({}):", report.errors.len())?;
        for error in &report.errors {
            writeln!(handle, "  {error}")?;
        }
    }

    if !report.warnings.is_empty() {
        writeln!(handle)?;
        writeln!(handle, "Warnings ({}):", report.warnings.len())?;
        for warning in &report.warnings {
            writeln!(handle, "  {warning}")?;
        }
    }

    Ok(())
}

/// Generates a JSON report.
fn generate_json_report(report: &RunReport) -> color_eyre::Result<String> {
    #[derive(serde::Serialize)]
    struct Problem {
        path: String,
        message: String,
    }

    #[derive(serde::Serialize)]
    struct Report<'a> {
        stats: &'a StatsSnapshot,
        records: &'a [Record],
        errors: Vec<Problem>,
        warnings: Vec<Problem>,
    }

    let report = Report {
        stats: &report.stats,
        records: &report.records,
        errors: report
            .errors
            .iter()
            .map(|error| Problem {
                path: error.path().to_string(),
                message: error.to_string(),
            })
            .collect(),
        warnings: report
            .warnings
            .iter()
            .map(|warning| Problem {
                path: warning.path().to_string(),
                message: warning.to_string(),
            })
            .collect(),
    };
    serde_json::to_string_pretty(&report).map_err(|e| color_eyre::eyre::eyre!("Failed to serialize JSON: {}", e))
}

/// Generates a CSV report with one column per modeled field.
///
/// Fields a record's kind does not model are left empty.
fn generate_csv_report(records: &[Record]) -> String {
    use std::fmt::Write;

    let columns: Vec<Field> = Field::ALL
        .iter()
        .copied()
        .filter(|field| !matches!(field, Field::IdType | Field::Id))
        .collect();

    let mut output = columns.iter().map(|field| field.as_str()).collect::<Vec<_>>().join(",");
    output.push('\n');

    for record in records {
        let row = columns
            .iter()
            .map(|field| record.field(*field).map(|value| escape_csv(&value)).unwrap_or_default())
            .collect::<Vec<_>>()
            .join(",");
        let _ = writeln!(output, "{row}");
    }

    output
}

/// Escapes a string for CSV output.
fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_owned()
    }
}

// =============================================================================
// MAIN ENTRY POINT
// =============================================================================

/// Application entry point.
fn main() -> color_eyre::Result<()> {
    // 1. Install color-eyre FIRST (before any potential panics)
    color_eyre::install()?;

    // 2. Parse CLI arguments
    let cli = Cli::parse();

    // 3. Initialize tracing (handles --no-color for log output)
    init_tracing(cli.verbose, cli.no_color);

    // 4. Route to appropriate command
    let config = build_config(&cli)?;
    match &cli.command {
        Commands::Run { detailed } => run_run(&config, *detailed),
        Commands::Check => run_check(&config),
        Commands::Stats { field } => run_stats(&config, *field),
        Commands::Report { format, output } => run_report(&config, *format, output.clone()),
    }
}
