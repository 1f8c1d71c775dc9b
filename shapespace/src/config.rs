// SPDX-License-Identifier: AGPL-3.0-only

//! Run configuration for the validation binaries.
//!
//! Read once at startup from the environment:
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `SHAPESPACE_N` | 3 | dimension of the headline analysis (≥ 2) |
//! | `SHAPESPACE_MAX_N` | 8 | upper end of the ratio sweep (≥ `SHAPESPACE_N`) |
//! | `SHAPESPACE_JSON` | off | also print verdicts and summary as JSON |
//! | `SHAPESPACE_THREADS` | rayon default | worker threads for the catalog run |
//!
//! Logging verbosity follows `RUST_LOG` (default `warn`).

use std::env;

use tracing::warn;
use tracing_subscriber::EnvFilter;

/// Env var for the headline dimension.
pub const ENV_N: &str = "SHAPESPACE_N";
/// Env var for the sweep bound.
pub const ENV_MAX_N: &str = "SHAPESPACE_MAX_N";
/// Env var enabling JSON output.
pub const ENV_JSON: &str = "SHAPESPACE_JSON";
/// Env var for the rayon pool size.
pub const ENV_THREADS: &str = "SHAPESPACE_THREADS";

/// Settings shared by every binary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Dimension of the headline analysis
    pub n: usize,
    /// Largest dimension in the ratio sweep
    pub max_n: usize,
    /// Print JSON after the human-readable report
    pub json: bool,
    /// Dedicated rayon pool size, if set
    pub threads: Option<usize>,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            n: 3,
            max_n: 8,
            json: false,
            threads: None,
        }
    }
}

impl RunConfig {
    /// Read the process environment.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key → value lookup. Invalid values are logged and
    /// replaced by their defaults.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let n = parse_count(&lookup, ENV_N, 2).unwrap_or(defaults.n);
        let max_n = match parse_count(&lookup, ENV_MAX_N, 2) {
            Some(m) if m >= n => m,
            Some(m) => {
                warn!(max_n = m, n, "{ENV_MAX_N} below {ENV_N}, sweeping to {ENV_N} only");
                n
            }
            None => defaults.max_n.max(n),
        };
        let json = lookup(ENV_JSON).is_some_and(|v| parse_flag(&v));
        let threads = parse_count(&lookup, ENV_THREADS, 1);
        Self {
            n,
            max_n,
            json,
            threads,
        }
    }
}

/// Parse a count of at least `min`; `None` if unset or invalid.
fn parse_count<F>(lookup: &F, key: &str, min: usize) -> Option<usize>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(key)?;
    match raw.trim().parse::<usize>() {
        Ok(v) if v >= min => Some(v),
        _ => {
            warn!(key, value = %raw, min, "ignoring invalid setting, using default");
            None
        }
    }
}

fn parse_flag(raw: &str) -> bool {
    matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

/// Install the `fmt` subscriber with `RUST_LOG` filtering (default `warn`).
///
/// Safe to call more than once; later calls are no-ops.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
