//! wptsync core library: config model, persistence, errors, time budgets.
//!
//! - [`types`]: [`Config`] and [`FileEntry`]
//! - [`config`]: load / validate / save / init / add
//! - [`error`]: [`ConfigError`]
//! - [`budget`]: [`Deadline`] shared by every blocking call

pub mod budget;
pub mod config;
pub mod error;
pub mod types;

pub use budget::{Deadline, Expired, METADATA_BUDGET, SYNC_BUDGET};
pub use error::ConfigError;
pub use types::{Config, FileEntry};
