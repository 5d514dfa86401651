pub mod add;
pub mod init;
pub mod sync;

use std::time::Duration;

use clap::Args;

use wptsync_remote::endpoints::{DEFAULT_API_BASE, DEFAULT_RAW_BASE};
use wptsync_remote::Endpoints;

/// Options shared by every command that talks to the remote repository.
#[derive(Args, Debug, Clone)]
pub struct RemoteArgs {
    /// Overall time budget in seconds (default: 120 for sync, 30 for init/add).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Log debug diagnostics to stderr.
    #[arg(long, short = 'v')]
    pub verbose: bool,

    /// Base URL for raw file downloads.
    #[arg(long, env = "WPTSYNC_RAW_URL", default_value = DEFAULT_RAW_BASE, hide = true)]
    pub raw_url: String,

    /// Base URL for the repository API.
    #[arg(long, env = "WPTSYNC_API_URL", default_value = DEFAULT_API_BASE, hide = true)]
    pub api_url: String,
}

impl RemoteArgs {
    pub fn endpoints(&self) -> Endpoints {
        Endpoints::new(self.raw_url.as_str(), self.api_url.as_str())
    }

    /// `--timeout` if given, `default` otherwise.
    pub fn budget(&self, default: Duration) -> Duration {
        self.timeout.map(Duration::from_secs).unwrap_or(default)
    }
}
