mod baseline;
mod checksum;
mod cli;
mod diff;
mod dir_list;
mod engine;
mod fingerprint;
mod report;
mod scan;

use cli::{Cli, LogLevel, Mode};
use engine::{Sentinel, SentinelConfig, ensure_target};
use std::fmt as stdfmt;
use std::io::{IsTerminal, stderr};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{Event, Level, Subscriber, error, warn};
use tracing_subscriber::filter::EnvFilter;
use tracing_subscriber::fmt as tracing_fmt;
use tracing_subscriber::fmt::FmtContext;
use tracing_subscriber::fmt::format::{FormatEvent, FormatFields, Writer};
use tracing_subscriber::prelude::*;
use tracing_subscriber::registry::LookupSpan;

struct SentinelExitCode;

impl SentinelExitCode {
    /// Exit code used when the check found deviations from the baseline.
    fn deviations_found() -> ExitCode {
        ExitCode::from(1)
    }

    /// Exit code used for other errors (I/O errors, invalid arguments, etc.).
    fn any_error() -> ExitCode {
        ExitCode::from(255)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    init_tracing(cli.verbose, cli.log_level);

    let (Some(mode), Some(directory)) = (cli.mode, cli.directory) else {
        println!("{}", cli::USAGE);
        return ExitCode::SUCCESS;
    };

    let config = SentinelConfig {
        baseline_path: cli.baseline,
    };

    match run(&mode, directory, config) {
        Ok(exit_code) => exit_code,
        Err(err) => {
            report_fatal(&err);
            SentinelExitCode::any_error()
        }
    }
}

/// Fatal errors are printed even when logging is filtered below `error`.
fn report_fatal(err: &anyhow::Error) {
    if tracing::enabled!(Level::ERROR) {
        error!("{err}");
    } else {
        eprintln!("ERROR: {err}");
    }
}

fn run(mode: &str, directory: PathBuf, config: SentinelConfig) -> anyhow::Result<ExitCode> {
    // The directory is validated before the mode.
    ensure_target(&directory)?;
    let mode: Mode = mode.parse()?;

    let sentinel = Sentinel::new(directory.clone(), config);

    match mode {
        Mode::Init => handle_init(&sentinel, &directory),
        Mode::Check => handle_check(&sentinel, &directory),
    }
}

fn handle_init(sentinel: &Sentinel, directory: &Path) -> anyhow::Result<ExitCode> {
    println!("[*] Scanning directory: {}...", directory.display());

    let summary = sentinel.init()?;

    println!(
        "[+] Baseline created successfully with {} files tracked.",
        summary.files_tracked
    );
    println!("[+] Saved to {}", summary.baseline_path.display());

    Ok(ExitCode::SUCCESS)
}

fn handle_check(sentinel: &Sentinel, directory: &Path) -> anyhow::Result<ExitCode> {
    let baseline = sentinel.load_baseline()?;

    println!("[*] Loading baseline...");
    if let Some(created) = baseline.created_at_local() {
        println!("[*] Baseline created {}", created);
    }

    println!("[*] Scanning directory: {}...", directory.display());
    let report = sentinel.check(&baseline)?;

    report::print_report(&report);

    if report.is_clean() {
        return Ok(ExitCode::SUCCESS);
    }

    warn!(
        "{} deviation(s) from baseline {}",
        report.deviations().len(),
        sentinel.baseline_path().display()
    );

    Ok(SentinelExitCode::deviations_found())
}

/// Explicit flags win over RUST_LOG, which wins over the default of `warn`.
fn init_tracing(verbose: u8, log_level: Option<LogLevel>) {
    let stderr_is_terminal = stderr().is_terminal();
    let formatter = LevelPrefixFormatter { stderr_is_terminal };

    let explicit_level = match (log_level, verbose) {
        (Some(level), _) => Some(level.as_filter()),
        (None, 0) => None,
        (None, 1) => Some("info"),
        (None, _) => Some("debug"),
    };

    let filter = match explicit_level {
        Some(level) => EnvFilter::new(level),
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
    };

    let fmt_layer = tracing_fmt::layer()
        .event_format(formatter)
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .init();
}

struct LevelPrefixFormatter {
    stderr_is_terminal: bool,
}

impl<S, N> FormatEvent<S, N> for LevelPrefixFormatter
where
    S: Subscriber + for<'a> LookupSpan<'a>,
    N: for<'a> FormatFields<'a> + 'static,
{
    fn format_event(
        &self,
        ctx: &FmtContext<'_, S, N>,
        mut writer: Writer<'_>,
        event: &Event<'_>,
    ) -> stdfmt::Result {
        if self.stderr_is_terminal {
            match *event.metadata().level() {
                Level::INFO => write!(writer, "ℹ️ ")?,
                Level::WARN => write!(writer, "⚠️  ")?,
                Level::ERROR => write!(writer, "❌️ ")?,
                _ => write!(writer, "🔍 ")?,
            }
        } else {
            match *event.metadata().level() {
                Level::DEBUG => writer.write_str("DEBUG: ")?,
                Level::INFO => writer.write_str("INFO: ")?,
                Level::WARN => writer.write_str("WARN: ")?,
                Level::ERROR => writer.write_str("ERROR: ")?,
                _ => writer.write_str("TRACE: ")?,
            }
        }

        ctx.format_fields(writer.by_ref(), event)?;
        writeln!(writer)
    }
}
