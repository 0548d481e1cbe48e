//! Configuration Module
//!
//! Handles loading cache configuration from environment variables.

use std::env;
use std::str::FromStr;

use crate::cache::KeyStrategy;
use crate::error::{CacheError, Result};

pub const CAPACITY_VAR: &str = "REPO_CACHE_CAPACITY";
pub const KEY_STRATEGY_VAR: &str = "REPO_CACHE_KEY_STRATEGY";
pub const STATS_INTERVAL_VAR: &str = "REPO_CACHE_STATS_INTERVAL";

/// Cache configuration parameters.
///
/// All values can be configured via environment variables; unset variables
/// fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheConfig {
    /// Maximum number of keys kept, 0 = unbounded
    pub capacity: usize,
    /// Identifier choice for documents without a name
    pub key_strategy: KeyStrategy,
    /// Seconds between statistics reports, 0 = no reporter
    pub stats_interval: u64,
}

impl CacheConfig {
    /// Creates a new CacheConfig from environment variables.
    ///
    /// # Environment Variables
    /// - `REPO_CACHE_CAPACITY` - Maximum cached keys (default: 0, unbounded)
    /// - `REPO_CACHE_KEY_STRATEGY` - `generate-name` or `content-hash` (default: generate-name)
    /// - `REPO_CACHE_STATS_INTERVAL` - Report frequency in seconds (default: 60)
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| env::var(var).ok())
    }

    /// Builds a config from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let defaults = Self::default();

        let capacity = match lookup(CAPACITY_VAR) {
            Some(raw) => parse_number(CAPACITY_VAR, &raw)?,
            None => defaults.capacity,
        };
        let key_strategy = match lookup(KEY_STRATEGY_VAR) {
            Some(raw) => raw.parse()?,
            None => defaults.key_strategy,
        };
        let stats_interval = match lookup(STATS_INTERVAL_VAR) {
            Some(raw) => parse_number(STATS_INTERVAL_VAR, &raw)?,
            None => defaults.stats_interval,
        };

        Ok(Self {
            capacity,
            key_strategy,
            stats_interval,
        })
    }

    pub fn is_bounded(&self) -> bool {
        self.capacity > 0
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            capacity: 0,
            key_strategy: KeyStrategy::GenerateName,
            stats_interval: 60,
        }
    }
}

fn parse_number<T: FromStr>(var: &'static str, raw: &str) -> Result<T> {
    raw.trim().parse().map_err(|_| CacheError::InvalidConfig {
        var,
        value: raw.to_string(),
        reason: "expected a non-negative integer".to_string(),
    })
}
