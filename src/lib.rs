#![forbid(unsafe_code)]
#![deny(clippy::unwrap_used, clippy::expect_used)]

pub mod config;
pub mod error;
pub mod telemetry;
pub mod toast;

pub use toast::{
    ToastLength, ToastPresenter, configure, install_presenter, show_long_toast, show_short_toast,
    try_show_long_toast, try_show_short_toast,
};

pub type Result<T> = std::result::Result<T, error::Error>;
