use std::time::Duration;

pub(super) fn default_appname() -> String {
    "Toaster".to_string()
}

pub(super) fn default_backend() -> String {
    "auto".to_string()
}

pub(super) const fn default_short_duration() -> Duration {
    Duration::from_millis(2_000)
}

pub(super) const fn default_long_duration() -> Duration {
    Duration::from_millis(3_500)
}
