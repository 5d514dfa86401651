//! Remote endpoint configuration.

/// Raw file content, addressed as `{raw_base}/{commit}/{path}`.
pub const DEFAULT_RAW_BASE: &str = "https://raw.githubusercontent.com/web-platform-tests/wpt";

/// GitHub REST API root for the repository.
pub const DEFAULT_API_BASE: &str = "https://api.github.com/repos/web-platform-tests/wpt";

/// Branch whose head `init` pins to.
pub const DEFAULT_BRANCH: &str = "master";

/// Base URLs for every remote call. Tests point these at a local stub.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    pub raw_base: String,
    pub api_base: String,
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            raw_base: DEFAULT_RAW_BASE.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }
}

impl Endpoints {
    pub fn new(raw_base: impl Into<String>, api_base: impl Into<String>) -> Self {
        Self {
            raw_base: raw_base.into(),
            api_base: api_base.into(),
        }
    }

    /// `{raw_base}/{commit}/{src}`, with any leading `/` stripped from `src`.
    pub fn raw_url(&self, commit: &str, src: &str) -> String {
        format!(
            "{}/{}/{}",
            self.raw_base.trim_end_matches('/'),
            commit,
            src.trim_start_matches('/')
        )
    }

    /// `{api_base}/commits/{branch}`.
    pub fn latest_commit_url(&self, branch: &str) -> String {
        format!("{}/commits/{}", self.api_base.trim_end_matches('/'), branch)
    }

    /// `{api_base}/contents/{path}?ref={commit}`.
    pub fn contents_url(&self, path: &str, commit: &str) -> String {
        format!(
            "{}/contents/{}?ref={}",
            self.api_base.trim_end_matches('/'),
            path.trim_matches('/'),
            commit
        )
    }
}
