//! Gallery HTTP module providing the API client and wire types
//!
//! The client talks to the gallery backend on behalf of a browser or a
//! terminal host. Host-specific behaviour (storage, navigation,
//! notifications) is injected through the traits in `gallery-core`.

pub mod client;
pub mod types;

pub use client::error::ClientError;
pub use client::{ApiRequest, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, GalleryClient, GalleryClientBuilder};
