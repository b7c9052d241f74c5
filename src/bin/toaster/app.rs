use std::path::PathBuf;

use toaster::Result;
use toaster::config::{BackendKind, ToastSettings};
use toaster::error::NotifyError;
use toaster::telemetry::init_tracing;
use toaster::{ToastLength, configure, try_show_long_toast, try_show_short_toast};
use tracing::{debug, info, warn};

use super::cli::Cli;

const DEFAULT_CONFIG: &str = "toaster.toml";

pub fn run(cli: Cli) -> Result<()> {
    init_tracing(cli.log_filter.as_deref(), cli.json_logs)?;

    let settings = resolve_settings(cli.config.as_ref(), cli.backend, cli.dry_run)?;
    debug!(
        backend = %settings.backend,
        appname = %settings.appname,
        "toast settings resolved"
    );
    configure(&settings)?;

    let length = if cli.long {
        ToastLength::Long
    } else {
        ToastLength::Short
    };
    dispatch(&cli.texts, |text| match length {
        ToastLength::Short => try_show_short_toast(text),
        ToastLength::Long => try_show_long_toast(text),
    })?;
    Ok(())
}

/// Shows every text, one request each, even after a failure.
///
/// Returns the last failure so the process exits non-zero when any toast was
/// refused.
fn dispatch<F>(texts: &[String], mut show: F) -> std::result::Result<(), NotifyError>
where
    F: FnMut(&str) -> std::result::Result<(), NotifyError>,
{
    let mut failures = 0_usize;
    let mut last_err = None;
    for text in texts {
        if let Err(err) = show(text) {
            warn!(error = %err, "toast not shown");
            failures += 1;
            last_err = Some(err);
        }
    }
    info!(requested = texts.len(), failures, "toasts dispatched");
    last_err.map_or(Ok(()), Err)
}

fn resolve_settings(
    explicit: Option<&PathBuf>,
    backend: Option<BackendKind>,
    dry_run: bool,
) -> Result<ToastSettings> {
    let mut settings = match explicit {
        Some(path) => ToastSettings::from_env_and_required_file(path)?,
        None => ToastSettings::from_env_and_file(DEFAULT_CONFIG)?,
    };
    if let Some(backend) = backend {
        settings.backend = backend;
    }
    if dry_run {
        settings.backend = BackendKind::Log;
    }
    Ok(settings)
}
