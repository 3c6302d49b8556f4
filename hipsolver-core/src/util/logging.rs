//! Diagnostic output.
//!
//! Structured events go through `tracing`. The one-line stderr messages here
//! are for failures a user should see without installing a subscriber, and
//! are gated by the caller's verbosity switch.

use std::fmt;

/// Read a boolean switch from the environment.
///
/// Unset means `None`. `""`, `0`, `false`, `off` and `no` (any case) are
/// `Some(false)`; any other value is `Some(true)`.
pub fn env_flag(name: &str) -> Option<bool> {
    std::env::var(name).ok().map(|v| parse_flag(&v))
}

pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "" | "0" | "false" | "off" | "no"
    )
}

/// Write a `hipsolver:`-prefixed line to stderr.
pub fn diag(args: fmt::Arguments<'_>) {
    eprintln!("hipsolver: {}", args);
}
