//! GitHub contents/commits API client used by `init` and `add`.
//!
//! The contents endpoint answers a file path with a single JSON object and a
//! directory path with an array of items tagged `file` or `dir`. Directories
//! are expanded depth-first in listing order.

use serde::Deserialize;

use wptsync_core::config::SOURCE_EXTENSION;
use wptsync_core::Deadline;

use crate::endpoints::{Endpoints, DEFAULT_BRANCH};
use crate::error::{from_ureq, FetchError};

const ACCEPT: &str = "application/vnd.github.v3+json";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
enum ItemKind {
    File,
    Dir,
    #[serde(other)]
    Other,
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    path: String,
    #[serde(rename = "type")]
    kind: ItemKind,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Single(ContentItem),
    Listing(Vec<ContentItem>),
}

#[derive(Debug, Deserialize)]
struct CommitResponse {
    #[serde(default)]
    sha: String,
}

/// Client for the repository metadata API.
#[derive(Debug, Clone)]
pub struct ContentsClient {
    agent: ureq::Agent,
    endpoints: Endpoints,
}

impl ContentsClient {
    pub fn new(endpoints: &Endpoints) -> Self {
        Self {
            agent: crate::agent(),
            endpoints: endpoints.clone(),
        }
    }

    /// SHA of the head of the default branch.
    pub fn latest_commit(&self, deadline: &Deadline) -> Result<String, FetchError> {
        let url = self.endpoints.latest_commit_url(DEFAULT_BRANCH);
        let commit: CommitResponse = self.get_json(&url, deadline)?;
        if commit.sha.is_empty() {
            return Err(FetchError::EmptyCommit);
        }
        Ok(commit.sha)
    }

    /// Every `.js` file at or below `path` at `commit`, in listing order.
    pub fn list_files(
        &self,
        commit: &str,
        path: &str,
        deadline: &Deadline,
    ) -> Result<Vec<String>, FetchError> {
        let mut files = Vec::new();
        self.walk(commit, path.trim_matches('/'), deadline, &mut files)?;
        Ok(files)
    }

    fn walk(
        &self,
        commit: &str,
        path: &str,
        deadline: &Deadline,
        files: &mut Vec<String>,
    ) -> Result<(), FetchError> {
        let url = self.endpoints.contents_url(path, commit);
        let response: ContentsResponse = match self.get_json(&url, deadline) {
            Err(FetchError::Status { status: 404, .. }) => {
                return Err(FetchError::NotFound {
                    path: path.to_string(),
                })
            }
            other => other?,
        };

        match response {
            ContentsResponse::Single(item) => {
                if item.kind == ItemKind::File && item.path.ends_with(SOURCE_EXTENSION) {
                    files.push(item.path);
                }
            }
            ContentsResponse::Listing(items) => {
                for item in items {
                    match item.kind {
                        ItemKind::File if item.path.ends_with(SOURCE_EXTENSION) => {
                            files.push(item.path)
                        }
                        ItemKind::Dir => self.walk(commit, &item.path, deadline, files)?,
                        _ => {}
                    }
                }
            }
        }
        Ok(())
    }

    fn get_json<T>(&self, url: &str, deadline: &Deadline) -> Result<T, FetchError>
    where
        T: for<'de> Deserialize<'de>,
    {
        let remaining = deadline.remaining()?;
        tracing::debug!("GET {url}");

        let response = self
            .agent
            .get(url)
            .set("Accept", ACCEPT)
            .timeout(remaining)
            .call()
            .map_err(|e| from_ureq(url, e))?;

        if response.status() != 200 {
            return Err(FetchError::Status {
                url: url.to_string(),
                status: response.status(),
                text: response.status_text().to_string(),
            });
        }

        response.into_json().map_err(|source| FetchError::Decode {
            url: url.to_string(),
            source,
        })
    }
}
