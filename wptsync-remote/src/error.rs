//! Error types for wptsync-remote.

use thiserror::Error;

use wptsync_core::Expired;

/// All errors that can arise talking to the remote repository.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The server answered with anything other than 200.
    #[error("unexpected status {status} {text} from {url}")]
    Status {
        url: String,
        status: u16,
        text: String,
    },

    /// Connection, DNS, TLS or timeout failure before a response arrived.
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<ureq::Transport>,
    },

    /// The response body was not the JSON we expected.
    #[error("decode response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: std::io::Error,
    },

    /// The listing API has no such path at the pinned commit.
    #[error("path {path:?} not found in repository")]
    NotFound { path: String },

    /// The commits API returned an empty `sha`.
    #[error("empty commit SHA in response")]
    EmptyCommit,

    /// The run budget was exhausted before the request could start.
    #[error(transparent)]
    Timeout(#[from] Expired),
}

/// Convert a `ureq` call failure into a [`FetchError`] for `url`.
pub(crate) fn from_ureq(url: &str, err: ureq::Error) -> FetchError {
    match err {
        ureq::Error::Status(status, response) => FetchError::Status {
            url: url.to_string(),
            status,
            text: response.status_text().to_string(),
        },
        ureq::Error::Transport(transport) => FetchError::Transport {
            url: url.to_string(),
            source: Box::new(transport),
        },
    }
}
