use tracing_subscriber::{EnvFilter, Registry, layer::SubscriberExt};

use crate::Result;
use crate::error::Error;

const FALLBACK_FILTER: &str = "info";

/// Installs the global tracing subscriber.
///
/// The filter is taken from `explicit_filter`, then `RUST_LOG`, then `info`;
/// the first candidate that parses wins. Events go to stderr.
///
/// # Errors
///
/// Returns an error if no filter candidate parses, if JSON output is requested
/// from a build without the `json-logs` feature, or if a global subscriber is
/// already installed.
pub fn init_tracing(explicit_filter: Option<&str>, use_json: bool) -> Result<()> {
    let filter = resolve_filter(explicit_filter, std::env::var("RUST_LOG").ok())?;

    #[cfg(feature = "json-logs")]
    if use_json {
        let subscriber = Registry::default().with(filter).with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true)
                .json()
                .flatten_event(true),
        );
        tracing::subscriber::set_global_default(subscriber)
            .map_err(|err| Error::Telemetry(err.to_string()))?;
        return Ok(());
    }

    #[cfg(not(feature = "json-logs"))]
    if use_json {
        return Err(Error::Telemetry(
            "binary was built without the `json-logs` feature".to_string(),
        ));
    }

    let subscriber = Registry::default().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true),
    );
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|err| Error::Telemetry(err.to_string()))
}

fn resolve_filter(explicit: Option<&str>, from_env: Option<String>) -> Result<EnvFilter> {
    explicit
        .map(str::to_string)
        .into_iter()
        .chain(from_env)
        .chain(std::iter::once(FALLBACK_FILTER.to_string()))
        .find_map(|candidate| EnvFilter::try_new(candidate).ok())
        .ok_or_else(|| Error::Telemetry("invalid log filter".to_string()))
}

#[cfg(test)]
mod tests {
    use super::resolve_filter;

    #[test]
    fn explicit_filter_wins_over_env() {
        let filter = match resolve_filter(Some("toaster=debug"), Some("warn".to_string())) {
            Ok(filter) => filter,
            Err(err) => panic!("filter should resolve: {err}"),
        };
        assert_eq!(filter.to_string(), "toaster=debug");
    }

    #[test]
    fn unparsable_candidates_fall_through_to_info() {
        let from_env = Some("toaster=verbose".to_string());
        let filter = match resolve_filter(Some("toaster=loudest"), from_env) {
            Ok(filter) => filter,
            Err(err) => panic!("filter should resolve: {err}"),
        };
        assert_eq!(filter.to_string(), "info");
    }
}
