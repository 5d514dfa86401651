//! Wall-clock budgets.
//!
//! A single [`Deadline`] is created per command and threaded through every
//! blocking call, so the budget covers the whole run rather than each
//! request separately.

use std::fmt;
use std::time::{Duration, Instant};

/// Budget for a whole `sync` run.
pub const SYNC_BUDGET: Duration = Duration::from_secs(120);

/// Budget for metadata-only calls (`init`, `add`).
pub const METADATA_BUDGET: Duration = Duration::from_secs(30);

/// A fixed point in time after which in-flight work must be abandoned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Deadline {
    expires_at: Instant,
    budget: Duration,
}

/// The budget ran out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Expired {
    pub budget: Duration,
}

impl fmt::Display for Expired {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "timed out after {}s", self.budget.as_secs())
    }
}

impl std::error::Error for Expired {}

impl Deadline {
    /// A deadline `budget` from now.
    pub fn after(budget: Duration) -> Self {
        Self {
            expires_at: Instant::now() + budget,
            budget,
        }
    }

    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Time left, or [`Expired`] once the deadline has passed.
    pub fn remaining(&self) -> Result<Duration, Expired> {
        match self.expires_at.checked_duration_since(Instant::now()) {
            Some(left) if !left.is_zero() => Ok(left),
            _ => Err(Expired {
                budget: self.budget,
            }),
        }
    }

    pub fn is_expired(&self) -> bool {
        self.remaining().is_err()
    }
}
