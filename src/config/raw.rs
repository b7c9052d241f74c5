use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use serde::Deserialize;
use serde_with::serde_as;

use crate::Result;
use crate::error::ConfigError;

use super::defaults::{
    default_appname, default_backend, default_long_duration, default_short_duration,
};
use super::env::{Lookup, env_duration, env_with, process_env};
use super::{BackendKind, HumantimeDuration, ToastSettings};

const ENV_PREFIX: &str = "TOASTER";

pub(super) fn load(path: impl AsRef<Path>) -> std::result::Result<RawConfig, ConfigError> {
    let path = path.as_ref();
    build(::config::File::from(path).required(false), None)
}

/// `layered_env` replaces the process environment for the `TOASTER__*` layer when set.
fn build<S>(
    file: S,
    layered_env: Option<::config::Map<String, String>>,
) -> std::result::Result<RawConfig, ConfigError>
where
    S: ::config::Source + Send + Sync + 'static,
{
    ::config::Config::builder()
        .add_source(file)
        .add_source(
            ::config::Environment::with_prefix(ENV_PREFIX)
                .separator("__")
                .try_parsing(true)
                .source(layered_env),
        )
        .build()
        .map_err(|err| ConfigError::Other(err.to_string()))?
        .try_deserialize()
        .map_err(|err| ConfigError::Parse(err.to_string()))
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct RawConfig {
    #[serde(default)]
    pub(super) toast: RawToast,
}

#[serde_as]
#[derive(Debug, Deserialize)]
pub(super) struct RawToast {
    #[serde(default = "default_appname")]
    pub(super) appname: String,
    #[serde(default)]
    pub(super) icon: Option<PathBuf>,
    #[serde(default = "default_backend")]
    pub(super) backend: String,
    #[serde(default = "default_short_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) short_duration: Duration,
    #[serde(default = "default_long_duration")]
    #[serde_as(as = "HumantimeDuration")]
    pub(super) long_duration: Duration,
}

impl Default for RawToast {
    fn default() -> Self {
        Self {
            appname: default_appname(),
            icon: None,
            backend: default_backend(),
            short_duration: default_short_duration(),
            long_duration: default_long_duration(),
        }
    }
}

impl RawConfig {
    pub(super) fn apply_env_overrides(&mut self) -> std::result::Result<(), ConfigError> {
        self.apply_overrides_from(&process_env)
    }

    fn apply_overrides_from(
        &mut self,
        lookup: Lookup<'_>,
    ) -> std::result::Result<(), ConfigError> {
        let text = |s: &str| Ok::<_, String>(s.to_string());
        if let Some(appname) = env_with(lookup, "TOAST_APPNAME", text)? {
            self.toast.appname = appname;
        }
        let path = |s: &str| Ok::<_, String>(PathBuf::from(s));
        if let Some(icon) = env_with(lookup, "TOAST_ICON", path)? {
            self.toast.icon = Some(icon);
        }
        if let Some(backend) = env_with(lookup, "TOAST_BACKEND", text)? {
            self.toast.backend = backend;
        }
        if let Some(short) = env_duration(lookup, "TOAST_SHORT_DURATION")? {
            self.toast.short_duration = short;
        }
        if let Some(long) = env_duration(lookup, "TOAST_LONG_DURATION")? {
            self.toast.long_duration = long;
        }
        Ok(())
    }

    pub(super) fn validate_and_build(self) -> Result<ToastSettings> {
        let RawToast {
            appname,
            icon,
            backend,
            short_duration,
            long_duration,
        } = self.toast;

        if appname.trim().is_empty() {
            return Err(ConfigError::InvalidField {
                field: "toast.appname",
                message: "application name cannot be empty".to_string(),
            }
            .into());
        }

        let backend =
            BackendKind::from_str(&backend).map_err(|message| ConfigError::InvalidField {
                field: "toast.backend",
                message,
            })?;

        check_duration("toast.short_duration", short_duration)?;
        check_duration("toast.long_duration", long_duration)?;
        if short_duration > long_duration {
            return Err(ConfigError::InvalidField {
                field: "toast.short_duration",
                message: format!(
                    "short duration ({}) exceeds long duration ({})",
                    humantime::format_duration(short_duration),
                    humantime::format_duration(long_duration)
                ),
            }
            .into());
        }

        Ok(ToastSettings {
            appname,
            icon: icon.filter(|path| !path.as_os_str().is_empty()),
            backend,
            short_duration,
            long_duration,
        })
    }
}

fn check_duration(field: &'static str, value: Duration) -> std::result::Result<(), ConfigError> {
    if value.is_zero() {
        return Err(ConfigError::InvalidField {
            field,
            message: "duration must be greater than zero".to_string(),
        });
    }
    if u32::try_from(value.as_millis()).is_err() {
        return Err(ConfigError::InvalidField {
            field,
            message: format!("duration must not exceed {} ms", u32::MAX),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{RawConfig, build};
    use crate::config::{BackendKind, ToastSettings};
    use crate::error::{ConfigError, Error};
    use config::{File, FileFormat, Map};
    use std::path::PathBuf;
    use std::time::Duration;

    fn from_toml(toml: &str) -> RawConfig {
        match build(File::from_str(toml, FileFormat::Toml), Some(Map::new())) {
            Ok(raw) => raw,
            Err(err) => panic!("toml should load: {err}"),
        }
    }

    fn with_layered_env(toml: &str, vars: &[(&str, &str)]) -> RawConfig {
        let env: Map<String, String> = vars
            .iter()
            .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
            .collect();
        match build(File::from_str(toml, FileFormat::Toml), Some(env)) {
            Ok(raw) => raw,
            Err(err) => panic!("layered env should load: {err}"),
        }
    }

    fn overrides(
        raw: &mut RawConfig,
        vars: &[(&'static str, &'static str)],
    ) -> Result<(), ConfigError> {
        let lookup = |key: &'static str| {
            Ok::<_, ConfigError>(
                vars.iter()
                    .find(|(name, _)| *name == key)
                    .map(|(_, value)| (*value).to_string()),
            )
        };
        raw.apply_overrides_from(&lookup)
    }

    fn invalid_field(result: crate::Result<ToastSettings>) -> Option<&'static str> {
        match result {
            Err(Error::Config(ConfigError::InvalidField { field, .. })) => Some(field),
            _ => None,
        }
    }

    #[test]
    fn empty_document_yields_defaults() {
        let settings = match from_toml("").validate_and_build() {
            Ok(settings) => settings,
            Err(err) => panic!("defaults should validate: {err}"),
        };
        assert_eq!(settings, ToastSettings::default());
    }

    #[test]
    fn file_values_are_honoured() {
        let raw = from_toml(
            r#"
            [toast]
            appname = "Scene Viewer"
            icon = "/usr/share/icons/viewer.png"
            backend = "log"
            short_duration = "1500ms"
            long_duration = 4000
            "#,
        );
        let settings = match raw.validate_and_build() {
            Ok(settings) => settings,
            Err(err) => panic!("settings should validate: {err}"),
        };
        assert_eq!(settings.appname, "Scene Viewer");
        assert_eq!(
            settings.icon,
            Some(PathBuf::from("/usr/share/icons/viewer.png"))
        );
        assert_eq!(settings.backend, BackendKind::Log);
        assert_eq!(settings.short_duration, Duration::from_millis(1_500));
        assert_eq!(settings.long_duration, Duration::from_secs(4));
    }

    #[test]
    fn blank_appname_is_rejected() {
        let raw = from_toml("[toast]\nappname = \"  \"\n");
        assert_eq!(invalid_field(raw.validate_and_build()), Some("toast.appname"));
    }

    #[test]
    fn unknown_backend_is_rejected() {
        let raw = from_toml("[toast]\nbackend = \"snackbar\"\n");
        assert_eq!(invalid_field(raw.validate_and_build()), Some("toast.backend"));
    }

    #[test]
    fn zero_duration_is_rejected() {
        let raw = from_toml("[toast]\nshort_duration = \"0s\"\n");
        assert_eq!(
            invalid_field(raw.validate_and_build()),
            Some("toast.short_duration")
        );
    }

    #[test]
    fn short_longer_than_long_is_rejected() {
        let raw = from_toml("[toast]\nshort_duration = \"10s\"\nlong_duration = \"5s\"\n");
        assert_eq!(
            invalid_field(raw.validate_and_build()),
            Some("toast.short_duration")
        );
    }

    #[test]
    fn oversized_duration_is_rejected() {
        let raw = from_toml("[toast]\nlong_duration = \"60days\"\n");
        assert_eq!(
            invalid_field(raw.validate_and_build()),
            Some("toast.long_duration")
        );
    }

    #[test]
    fn empty_icon_path_means_no_icon() {
        let raw = from_toml("[toast]\nicon = \"\"\n");
        let settings = match raw.validate_and_build() {
            Ok(settings) => settings,
            Err(err) => panic!("settings should validate: {err}"),
        };
        assert_eq!(settings.icon, None);
    }

    #[test]
    fn layered_env_overrides_the_file() {
        let raw = with_layered_env(
            "[toast]\nappname = \"From File\"\nbackend = \"native\"\n",
            &[
                ("TOASTER__TOAST__APPNAME", "From Env"),
                ("TOASTER__TOAST__SHORT_DURATION", "1500"),
                ("TOASTER__TOAST__LONG_DURATION", "5s"),
            ],
        );
        let settings = match raw.validate_and_build() {
            Ok(settings) => settings,
            Err(err) => panic!("settings should validate: {err}"),
        };
        assert_eq!(settings.appname, "From Env");
        assert_eq!(settings.backend, BackendKind::Native);
        assert_eq!(settings.short_duration, Duration::from_millis(1_500));
        assert_eq!(settings.long_duration, Duration::from_secs(5));
    }

    #[test]
    fn layered_env_ignores_other_prefixes() {
        let raw = with_layered_env("", &[("OTHER__TOAST__APPNAME", "Nope")]);
        assert_eq!(raw.toast.appname, "Toaster");
    }

    #[test]
    fn toast_variables_override_everything() {
        let mut raw = with_layered_env(
            "[toast]\nappname = \"From File\"\n",
            &[("TOASTER__TOAST__BACKEND", "native")],
        );
        let applied = overrides(
            &mut raw,
            &[
                ("TOAST_APPNAME", "Scene Viewer"),
                ("TOAST_ICON", "/usr/share/icons/viewer.png"),
                ("TOAST_BACKEND", "log"),
                ("TOAST_SHORT_DURATION", "1s"),
                ("TOAST_LONG_DURATION", "  4s  "),
            ],
        );
        assert!(applied.is_ok());
        let settings = match raw.validate_and_build() {
            Ok(settings) => settings,
            Err(err) => panic!("settings should validate: {err}"),
        };
        assert_eq!(settings.appname, "Scene Viewer");
        assert_eq!(
            settings.icon,
            Some(PathBuf::from("/usr/share/icons/viewer.png"))
        );
        assert_eq!(settings.backend, BackendKind::Log);
        assert_eq!(settings.short_duration, Duration::from_secs(1));
        assert_eq!(settings.long_duration, Duration::from_secs(4));
    }

    #[test]
    fn blank_toast_variables_keep_current_values() {
        let mut raw = from_toml("[toast]\nappname = \"From File\"\n");
        assert!(overrides(&mut raw, &[("TOAST_APPNAME", "   ")]).is_ok());
        assert_eq!(raw.toast.appname, "From File");
    }

    #[test]
    fn malformed_toast_duration_names_the_variable() {
        let mut raw = from_toml("");
        let result = overrides(&mut raw, &[("TOAST_SHORT_DURATION", "briefly")]);
        assert!(matches!(
            result,
            Err(ConfigError::InvalidField {
                field: "TOAST_SHORT_DURATION",
                ..
            })
        ));
    }
}
