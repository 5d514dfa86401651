//! # wptsync-remote
//!
//! HTTP access to the web-platform-tests repository.
//!
//! [`HttpFetcher`] downloads raw files at a pinned commit for the sync
//! pipeline. [`ContentsClient`] answers the metadata questions `init` and
//! `add` need: the latest commit and the `.js` files under a path.
//!
//! All requests are blocking and bounded by a caller-supplied
//! [`wptsync_core::Deadline`]. No retries.

pub mod contents;
pub mod endpoints;
pub mod error;
pub mod fetch;

pub use contents::ContentsClient;
pub use endpoints::Endpoints;
pub use error::FetchError;
pub use fetch::{Body, Fetcher, HttpFetcher};

/// Shared agent settings for every client in this crate.
pub(crate) fn agent() -> ureq::Agent {
    ureq::AgentBuilder::new()
        .user_agent(concat!("wptsync/", env!("CARGO_PKG_VERSION")))
        .build()
}
