//! Global notification handler
//!
//! The UI registers a callback (usually one that shows a toast) and the API
//! client reaches it through [`CallbackNotifier`] without holding any UI
//! state itself.

use gallery_core::{NoticeLevel, Notifier};
use std::cell::RefCell;
use std::rc::Rc;

/// Callback receiving notices
pub type NoticeCallback = Rc<dyn Fn(NoticeLevel, &str)>;

thread_local! {
    /// Global notice callback
    static NOTICE_CALLBACK: RefCell<Option<NoticeCallback>> = const { RefCell::new(None) };
}

/// Set the global notice callback
pub fn set_notice_callback(callback: NoticeCallback) {
    NOTICE_CALLBACK.with(|cb| {
        *cb.borrow_mut() = Some(callback);
    });
}

/// Clear the notice callback
pub fn clear_notice_callback() {
    NOTICE_CALLBACK.with(|cb| {
        *cb.borrow_mut() = None;
    });
}

/// Deliver a notice; falls back to the log when no UI is listening
pub fn show_notice(level: NoticeLevel, message: &str) {
    let callback = NOTICE_CALLBACK.with(|cb| cb.borrow().clone());
    match callback {
        Some(callback) => callback(level, message),
        None => tracing::info!(%level, "{message}"),
    }
}

/// Notifier that forwards to the registered callback
#[derive(Debug, Default, Clone, Copy)]
pub struct CallbackNotifier;

impl Notifier for CallbackNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) {
        show_notice(level, message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notices_reach_callback() {
        let received = Rc::new(RefCell::new(Vec::new()));
        let sink = received.clone();
        set_notice_callback(Rc::new(move |level, message| {
            sink.borrow_mut().push((level, message.to_string()));
        }));

        CallbackNotifier.notify(NoticeLevel::Error, "Session expired. Please login again.");
        clear_notice_callback();
        CallbackNotifier.notify(NoticeLevel::Info, "dropped");

        assert_eq!(
            *received.borrow(),
            vec![(
                NoticeLevel::Error,
                "Session expired. Please login again.".to_string()
            )]
        );
    }
}
