//! Browser navigation

use gallery_core::Navigator;

/// Navigates by assigning `window.location`
#[derive(Debug, Default, Clone, Copy)]
pub struct BrowserNavigator;

impl Navigator for BrowserNavigator {
    fn navigate(&self, path: &str) {
        let Some(window) = web_sys::window() else {
            tracing::warn!(path, "No window to navigate");
            return;
        };
        if let Err(e) = window.location().set_href(path) {
            tracing::error!(path, "Navigation failed: {e:?}");
        }
    }
}
