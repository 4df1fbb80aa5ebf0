// Runtime configuration.
// Read from TAU_* environment variables with defaults for the TAU services.

use std::path::PathBuf;
use std::time::Duration;

use crate::cache::default_cache_dir;
use crate::error::{Result, TauError};

pub const DEFAULT_MOODLE_URL: &str = "https://moodle.tau.ac.il";
pub const DEFAULT_IMS_URL: &str = "https://www.ims.tau.ac.il";
pub const DEFAULT_LOG_FILTER: &str = "info";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Directory holding cache files and logs.
    pub cache_dir: PathBuf,
    /// TTL for course, assignment, recording, and grade entries.
    pub cache_ttl: Duration,
    pub moodle_url: String,
    pub ims_url: String,
    /// tracing filter directive.
    pub log_filter: String,
}

impl Config {
    /// Build the configuration from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build the configuration from an arbitrary variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let cache_dir = match lookup("TAU_CACHE_DIR") {
            Some(dir) if !dir.is_empty() => PathBuf::from(dir),
            _ => default_cache_dir().ok_or(TauError::MissingHomeDir)?,
        };

        let cache_ttl = match lookup("TAU_CACHE_TTL_SECS") {
            Some(secs) => Duration::from_secs(secs.trim().parse().map_err(|_| {
                TauError::Other(format!(
                    "TAU_CACHE_TTL_SECS must be a whole number of seconds, got {:?}",
                    secs
                ))
            })?),
            None => Duration::ZERO,
        };

        Ok(Self {
            cache_dir,
            cache_ttl,
            moodle_url: base_url(lookup("TAU_MOODLE_URL"), DEFAULT_MOODLE_URL),
            ims_url: base_url(lookup("TAU_IMS_URL"), DEFAULT_IMS_URL),
            log_filter: lookup("TAU_LOG").unwrap_or_else(|| DEFAULT_LOG_FILTER.to_string()),
        })
    }
}

fn base_url(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_string())
        .trim_end_matches('/')
        .to_string()
}
