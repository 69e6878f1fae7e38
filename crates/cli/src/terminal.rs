//! Terminal implementations of the client's UI hooks

use gallery_core::{Navigator, NoticeLevel, Notifier};
use tracing::debug;

/// The terminal has no views; a redirect to sign-in becomes a hint
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNavigator;

impl Navigator for TerminalNavigator {
    fn navigate(&self, path: &str) {
        debug!(path, "Navigation requested");
        eprintln!("You are signed out. Run `gallery signin` to start a new session.");
    }
}

/// Prints notices to stderr
#[derive(Debug, Default, Clone, Copy)]
pub struct TerminalNotifier;

impl Notifier for TerminalNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        eprintln!("{level}: {message}");
    }
}
