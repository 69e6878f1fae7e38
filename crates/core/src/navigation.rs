//! Side effects the API client needs from its host
//!
//! In a browser these change `window.location` and show toasts. Other hosts
//! substitute their own behaviour.

use std::fmt;

/// Path of the sign-in view
pub const LOGIN_PATH: &str = "/signin";

/// Message shown when a session cannot be recovered
pub const SESSION_EXPIRED_MESSAGE: &str = "Session expired. Please login again.";

/// Moves the user to another view
pub trait Navigator: Send + Sync {
    fn navigate(&self, path: &str);
}

/// Severity of a user-visible notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

impl fmt::Display for NoticeLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Success => write!(f, "success"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Shows transient notices to the user
pub trait Notifier: Send + Sync {
    fn notify(&self, level: NoticeLevel, message: &str);
}

/// Navigator that only records the request in the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, path: &str) {
        tracing::info!(path, "Navigation requested");
    }
}

/// Notifier that writes notices to the log
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        match level {
            NoticeLevel::Error => tracing::warn!("{message}"),
            NoticeLevel::Info | NoticeLevel::Success => tracing::info!("{message}"),
        }
    }
}
