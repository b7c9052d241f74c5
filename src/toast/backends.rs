use tracing::{info, warn};

use crate::config::{BackendKind, ToastSettings};
use crate::error::NotifyError;

use super::{ToastLength, ToastPresenter};

/// Picks the presenter for `settings.backend`.
#[must_use]
pub fn presenter_for(settings: &ToastSettings) -> Box<dyn ToastPresenter> {
    match settings.backend {
        BackendKind::Native => Box::new(NativePresenter::new(settings.clone())),
        BackendKind::Log => Box::new(LogPresenter::new(&settings.appname)),
        BackendKind::Auto => Box::new(FallbackPresenter::new(
            Box::new(NativePresenter::new(settings.clone())),
            Box::new(LogPresenter::new(&settings.appname)),
        )),
    }
}

/// Desktop notification of the running platform.
pub struct NativePresenter {
    settings: ToastSettings,
}

impl NativePresenter {
    #[must_use]
    pub const fn new(settings: ToastSettings) -> Self {
        Self { settings }
    }
}

impl ToastPresenter for NativePresenter {
    fn name(&self) -> &'static str {
        "native"
    }

    fn show(&self, text: &str, length: ToastLength) -> Result<(), NotifyError> {
        send_toast(&self.settings, text, length)
    }
}

/// Writes the toast to the log instead of the screen.
///
/// The toast is a `tracing` event at `info` level on target `toaster::toast::backends`.
/// Without a subscriber (see [`crate::telemetry::init_tracing`]) nothing is
/// printed, yet `show` still reports success.
pub struct LogPresenter {
    appname: String,
}

impl LogPresenter {
    #[must_use]
    pub fn new(appname: &str) -> Self {
        Self {
            appname: appname.to_string(),
        }
    }
}

impl ToastPresenter for LogPresenter {
    fn name(&self) -> &'static str {
        "log"
    }

    fn show(&self, text: &str, length: ToastLength) -> Result<(), NotifyError> {
        info!(appname = %self.appname, ?length, text, "toast");
        Ok(())
    }
}

/// Tries `primary`, hands the toast to `secondary` when it fails.
pub struct FallbackPresenter {
    primary: Box<dyn ToastPresenter>,
    secondary: Box<dyn ToastPresenter>,
}

impl FallbackPresenter {
    #[must_use]
    pub fn new(primary: Box<dyn ToastPresenter>, secondary: Box<dyn ToastPresenter>) -> Self {
        Self { primary, secondary }
    }
}

impl ToastPresenter for FallbackPresenter {
    fn name(&self) -> &'static str {
        "fallback"
    }

    fn show(&self, text: &str, length: ToastLength) -> Result<(), NotifyError> {
        match self.primary.show(text, length) {
            Ok(()) => Ok(()),
            Err(err) => {
                warn!(
                    error = %err,
                    primary = self.primary.name(),
                    secondary = self.secondary.name(),
                    "toast presenter failed, falling back"
                );
                self.secondary.show(text, length)
            }
        }
    }
}

#[cfg(target_os = "linux")]
fn send_toast(settings: &ToastSettings, text: &str, length: ToastLength) -> Result<(), NotifyError> {
    linux::send_toast(settings, text, length)
}

#[cfg(target_os = "windows")]
fn send_toast(settings: &ToastSettings, text: &str, length: ToastLength) -> Result<(), NotifyError> {
    winrt::send_toast(settings, text, length)
}

#[cfg(not(any(target_os = "linux", target_os = "windows")))]
fn send_toast(
    _settings: &ToastSettings,
    _text: &str,
    _length: ToastLength,
) -> Result<(), NotifyError> {
    Err(NotifyError::Unsupported {
        platform: std::env::consts::OS,
    })
}

#[cfg(target_os = "linux")]
mod linux {
    use notify_rust::{Notification, Timeout};
    use tracing::trace;

    use crate::config::ToastSettings;
    use crate::error::NotifyError;
    use crate::toast::ToastLength;

    pub(super) fn send_toast(
        settings: &ToastSettings,
        text: &str,
        length: ToastLength,
    ) -> Result<(), NotifyError> {
        let mut builder = Notification::new();
        builder
            .summary(text)
            .appname(&settings.appname)
            .timeout(Timeout::Milliseconds(settings.millis_for(length)));

        if let Some(icon_path) = settings.icon.as_deref() {
            builder.icon(&icon_path.to_string_lossy());
        }

        // fire-and-forget: the handle is not waited on
        let _handle = builder.show().map_err(NotifyError::backend)?;
        trace!(?length, "desktop toast shown");
        Ok(())
    }
}

#[cfg(target_os = "windows")]
mod winrt {
    use tauri_winrt_notification::{Duration as WinDuration, IconCrop, Toast};
    use windows::UI::Notifications::{NotificationSetting, ToastNotificationManager};
    use windows::core::HSTRING;

    use crate::config::ToastSettings;
    use crate::error::NotifyError;
    use crate::toast::ToastLength;

    pub(super) fn send_toast(
        settings: &ToastSettings,
        text: &str,
        length: ToastLength,
    ) -> Result<(), NotifyError> {
        let app_id = Toast::POWERSHELL_APP_ID;
        warn_if_disabled(app_id);

        let mut toast = Toast::new(app_id).title(text).duration(match length {
            ToastLength::Short => WinDuration::Short,
            ToastLength::Long => WinDuration::Long,
        });
        if let Some(icon_path) = settings.icon.as_deref() {
            toast = toast.icon(icon_path, IconCrop::Square, &settings.appname);
        }

        toast.show().map_err(|err| {
            tracing::warn!(error = %err, "windows toast failed");
            NotifyError::backend(err)
        })?;
        tracing::trace!(?length, "windows toast shown");
        Ok(())
    }

    fn warn_if_disabled(app_id: &str) {
        match ToastNotificationManager::CreateToastNotifierWithId(&HSTRING::from(app_id)) {
            Ok(notifier) => {
                if let Ok(setting) = notifier.Setting() {
                    if setting != NotificationSetting::Enabled {
                        tracing::warn!(?setting, "toast notifications are disabled for this app");
                    }
                }
            }
            Err(err) => {
                tracing::debug!(error = %err, "failed to query toast manager");
            }
        }
    }
}
