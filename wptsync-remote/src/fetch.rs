//! Raw file download.

use std::io::Read;

use wptsync_core::Deadline;

use crate::endpoints::Endpoints;
use crate::error::{from_ureq, FetchError};

/// Streamed body of one remote file, verbatim.
pub type Body = Box<dyn Read + Send>;

/// Source of remote file contents at a pinned commit.
pub trait Fetcher {
    /// Open `src` at `commit`. The returned reader yields the file verbatim.
    fn fetch(&self, commit: &str, src: &str, deadline: &Deadline) -> Result<Body, FetchError>;

    /// Human-readable origin, shown in the sync header.
    fn origin(&self) -> &str;
}

/// [`Fetcher`] that issues one HTTP GET per file against the raw endpoint.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    endpoints: Endpoints,
}

impl HttpFetcher {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            agent: crate::agent(),
            endpoints: endpoints.clone(),
        }
    }
}

impl Fetcher for HttpFetcher {
    fn fetch(&self, commit: &str, src: &str, deadline: &Deadline) -> Result<Body, FetchError> {
        let url = self.endpoints.raw_url(commit, src);
        let remaining = deadline.remaining()?;
        tracing::debug!("GET {url}");

        let response = self
            .agent
            .get(&url)
            .timeout(remaining)
            .call()
            .map_err(|e| from_ureq(&url, e))?;

        if response.status() != 200 {
            return Err(FetchError::Status {
                url,
                status: response.status(),
                text: response.status_text().to_string(),
            });
        }

        Ok(Box::new(response.into_reader()))
    }

    fn origin(&self) -> &str {
        &self.endpoints.raw_base
    }
}
