use std::fmt::Display;
use std::time::Duration;

use humantime::parse_duration;

use crate::error::ConfigError;

/// Where override values come from: the process environment in production.
pub(super) type Lookup<'a> =
    &'a dyn Fn(&'static str) -> std::result::Result<Option<String>, ConfigError>;

pub(super) fn process_env(key: &'static str) -> std::result::Result<Option<String>, ConfigError> {
    match std::env::var(key) {
        Ok(value) => Ok(Some(value)),
        Err(std::env::VarError::NotPresent) => Ok(None),
        Err(err) => Err(ConfigError::InvalidField {
            field: key,
            message: err.to_string(),
        }),
    }
}

/// Reads `key` and parses it with `parse`. Unset and blank values both yield `None`.
pub(super) fn env_with<T, E>(
    lookup: Lookup<'_>,
    key: &'static str,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> std::result::Result<Option<T>, ConfigError>
where
    E: Display,
{
    parse_override(key, lookup(key)?, parse)
}

pub(super) fn env_duration(
    lookup: Lookup<'_>,
    key: &'static str,
) -> std::result::Result<Option<Duration>, ConfigError> {
    env_with(lookup, key, parse_duration)
}

fn parse_override<T, E>(
    key: &'static str,
    value: Option<String>,
    parse: impl FnOnce(&str) -> std::result::Result<T, E>,
) -> std::result::Result<Option<T>, ConfigError>
where
    E: Display,
{
    let Some(value) = value else {
        return Ok(None);
    };
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse(trimmed)
        .map(Some)
        .map_err(|err| ConfigError::InvalidField {
            field: key,
            message: err.to_string(),
        })
}
