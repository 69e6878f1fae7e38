//! Gallery core types and utilities
//!
//! Everything the API client and its hosts share: the session model,
//! access-token inspection, persisted storage, host capabilities, form
//! validation and the optimistic image ordering.

pub mod error;
pub mod gallery;
pub mod navigation;
pub mod session;
pub mod storage;
pub mod token;
pub mod validation;

#[cfg(any(test, feature = "tests"))]
pub mod testing;

pub use error::{CoreError, CoreResult};
pub use gallery::{Gallery, Image, ImageOrder};
pub use navigation::{LOGIN_PATH, LogNavigator, LogNotifier, Navigator, NoticeLevel, Notifier};
pub use session::{MemorySessionStore, PersistedSessionStore, Session, SessionStore};
pub use storage::{MemoryStorage, TokenStorage};
pub use token::{AccessToken, TokenClaims};
pub use validation::FieldErrors;
