use std::path::PathBuf;

use clap::{ArgAction, Parser};
use toaster::config::BackendKind;

#[derive(Parser, Debug)]
#[command(author, version, about = "Show short toast notifications", long_about = None)]
pub struct Cli {
    /// Path to a TOML settings file (optional unless given explicitly).
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Presenter to use: auto, native or log.
    #[arg(long, value_name = "BACKEND")]
    pub backend: Option<BackendKind>,

    /// Keep each toast up for the long duration instead of the short one.
    #[arg(long, action = ArgAction::SetTrue)]
    pub long: bool,

    /// Only log what would be displayed.
    #[arg(long, action = ArgAction::SetTrue)]
    pub dry_run: bool,

    /// Use the JSON log layer (`--features json-logs`).
    #[arg(long, action = ArgAction::SetTrue)]
    pub json_logs: bool,

    /// Explicit log filter (e.g. "toaster=debug").
    #[arg(long, value_name = "FILTER")]
    pub log_filter: Option<String>,

    /// Messages to show, one toast each.
    #[arg(value_name = "TEXT", required = true)]
    pub texts: Vec<String>,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}
