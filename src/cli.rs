mod help_text;

use clap::{ArgAction, Parser, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

use crate::baseline::DEFAULT_BASELINE_FILENAME;

/// Baseline a tree of files and detect modified, deleted and new files
#[derive(Parser, Debug)]
#[command(
    name = "sentinel",
    version,
    about,
    long_about = help_text::ROOT_LONG_ABOUT,
    override_usage = "sentinel [OPTIONS] <MODE> <DIRECTORY>"
)]
pub struct Cli {
    /// Operation to perform: 'init' or 'check'
    #[arg(value_name = "MODE")]
    pub mode: Option<String>,

    /// Directory tree to baseline or check
    #[arg(value_name = "DIRECTORY")]
    pub directory: Option<PathBuf>,

    /// Location of the baseline file
    #[arg(long, value_name = "FILE", default_value = DEFAULT_BASELINE_FILENAME)]
    pub baseline: PathBuf,

    /// Increase log verbosity (-v info, -vv debug). Takes precedence over RUST_LOG.
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Set the log level explicitly. Takes precedence over RUST_LOG.
    #[arg(
        long,
        value_name = "LEVEL",
        value_enum,
        conflicts_with = "verbose",
        global = true
    )]
    pub log_level: Option<LogLevel>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_filter(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Init,
    Check,
}

#[derive(Debug, thiserror::Error)]
#[error("Invalid mode '{0}'. Use 'init' or 'check'.")]
pub struct InvalidMode(String);

impl FromStr for Mode {
    type Err = InvalidMode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "init" => Ok(Mode::Init),
            "check" => Ok(Mode::Check),
            other => Err(InvalidMode(other.to_string())),
        }
    }
}

pub const USAGE: &str = "\
Usage: sentinel <mode> <directory_to_watch>
Modes:
  init    -> Create a new baseline
  check   -> Check for changes";
