//! Process-wide toast entry points.
//!
//! Callers use the free functions ([`show_short_toast`] and friends); they
//! forward the text untouched to the installed [`ToastPresenter`]. There is no
//! helper value to construct and nothing is kept between calls.

use std::sync::{Arc, OnceLock};

use tracing::{debug, warn};

use crate::config::ToastSettings;
use crate::error::NotifyError;

mod backends;

pub use backends::{FallbackPresenter, LogPresenter, NativePresenter, presenter_for};

/// How long the presenter is asked to keep a toast on screen.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ToastLength {
    Short,
    Long,
}

/// The external mechanism that actually displays a toast.
pub trait ToastPresenter: Send + Sync {
    fn name(&self) -> &'static str;

    /// Displays `text` once.
    ///
    /// # Errors
    ///
    /// Whatever the underlying mechanism reports; callers see it unchanged.
    fn show(&self, text: &str, length: ToastLength) -> Result<(), NotifyError>;
}

impl<P> ToastPresenter for Arc<P>
where
    P: ToastPresenter + ?Sized,
{
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn show(&self, text: &str, length: ToastLength) -> Result<(), NotifyError> {
        (**self).show(text, length)
    }
}

static PRESENTER: OnceLock<Box<dyn ToastPresenter>> = OnceLock::new();

/// Installs the presenter used by every toast call of this process.
///
/// # Errors
///
/// [`NotifyError::AlreadyInstalled`] if a presenter was installed before, or
/// if a toast was already shown with the default presenter.
pub fn install_presenter(presenter: Box<dyn ToastPresenter>) -> Result<(), NotifyError> {
    let name = presenter.name();
    PRESENTER
        .set(presenter)
        .map_err(|_| NotifyError::AlreadyInstalled)?;
    debug!(presenter = name, "toast presenter installed");
    Ok(())
}

/// Builds the presenter described by `settings` and installs it.
///
/// # Errors
///
/// Same as [`install_presenter`].
pub fn configure(settings: &ToastSettings) -> Result<(), NotifyError> {
    install_presenter(presenter_for(settings))
}

fn presenter() -> &'static dyn ToastPresenter {
    PRESENTER
        .get_or_init(|| presenter_for(&ToastSettings::default()))
        .as_ref()
}

/// Shows `text` briefly. Failures are logged, never returned.
pub fn show_short_toast(text: &str) {
    show_with(presenter(), text, ToastLength::Short);
}

/// Shows `text` for the long duration. Failures are logged, never returned.
pub fn show_long_toast(text: &str) {
    show_with(presenter(), text, ToastLength::Long);
}

/// Like [`show_short_toast`], but hands back the presenter's error.
///
/// # Errors
///
/// The installed presenter's error, unchanged.
pub fn try_show_short_toast(text: &str) -> Result<(), NotifyError> {
    presenter().show(text, ToastLength::Short)
}

/// Like [`show_long_toast`], but hands back the presenter's error.
///
/// # Errors
///
/// The installed presenter's error, unchanged.
pub fn try_show_long_toast(text: &str) -> Result<(), NotifyError> {
    presenter().show(text, ToastLength::Long)
}

fn show_with(presenter: &dyn ToastPresenter, text: &str, length: ToastLength) {
    if let Err(err) = presenter.show(text, length) {
        warn!(
            error = %err,
            presenter = presenter.name(),
            ?length,
            "failed to show toast"
        );
    }
}
