//! Diagnostic logging.
//!
//! Progress goes to stdout with `println!`; tracing output goes to stderr so
//! the two never interleave in a pipe. `RUST_LOG` wins over `--verbose`.

use tracing_subscriber::{fmt, EnvFilter};

pub fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
