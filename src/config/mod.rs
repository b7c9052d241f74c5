use std::fmt::{self, Display};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use crate::Result;
use crate::error::{ConfigError, Error as ToastError};

mod defaults;
mod env;
mod raw;
mod serde;

pub(crate) use self::serde::HumantimeDuration;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToastSettings {
    pub appname: String,
    pub icon: Option<PathBuf>,
    pub backend: BackendKind,
    pub short_duration: Duration,
    pub long_duration: Duration,
}

/// Which presenter shows the toasts.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum BackendKind {
    /// Native desktop notification, falling back to the log on failure.
    ///
    /// The log fallback is only visible when a `tracing` subscriber is
    /// installed; otherwise a failed native toast disappears silently.
    Auto,
    Native,
    Log,
}

impl Default for ToastSettings {
    fn default() -> Self {
        Self {
            appname: defaults::default_appname(),
            icon: None,
            backend: BackendKind::Auto,
            short_duration: defaults::default_short_duration(),
            long_duration: defaults::default_long_duration(),
        }
    }
}

impl ToastSettings {
    /// Load settings from an optional TOML file and the environment.
    ///
    /// A missing file is not an error; defaults apply.
    ///
    /// # Errors
    ///
    /// Returns an error when the file cannot be parsed, when environment
    /// overrides are invalid, or when the resulting values fail validation.
    pub fn from_env_and_file(path: impl AsRef<Path>) -> Result<Self> {
        let mut raw = raw::load(path).map_err(ToastError::from)?;
        raw.apply_env_overrides().map_err(ToastError::from)?;
        raw.validate_and_build()
    }

    /// Same as [`Self::from_env_and_file`], but the file must exist.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::FileRead`] when the file is not accessible, plus
    /// every error of [`Self::from_env_and_file`].
    pub fn from_env_and_required_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|source| ConfigError::FileRead {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_env_and_file(path)
    }

    /// Display length requested for a toast, in milliseconds.
    #[must_use]
    pub fn millis_for(&self, length: crate::ToastLength) -> u32 {
        let duration = match length {
            crate::ToastLength::Short => self.short_duration,
            crate::ToastLength::Long => self.long_duration,
        };
        // validated to fit when loaded; saturate for hand-built settings
        u32::try_from(duration.as_millis()).unwrap_or(u32::MAX)
    }
}

impl BackendKind {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Auto => "auto",
            Self::Native => "native",
            Self::Log => "log",
        }
    }
}

impl Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for BackendKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "auto" => Ok(Self::Auto),
            "native" | "desktop" => Ok(Self::Native),
            "log" | "console" => Ok(Self::Log),
            other => Err(format!("unknown toast backend: {other}")),
        }
    }
}
