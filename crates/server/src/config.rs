//! Environment-driven configuration for the serving process.

use anyhow::{anyhow, Context, Result};
use std::env;

/// Default number of recommendations per query.
pub const DEFAULT_NUM_RECOMMENDATIONS: usize = 3;

/// Default listen address for the HTTP surface.
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8000";

/// Runtime configuration.
///
/// - `BASE_URL` (required): root of the upstream data source; the snapshot
///   path is appended by the snapshot client
/// - `NUM_RECOMMENDATIONS` (optional): positive integer, default 3
/// - `BIND_ADDR` (optional): listen address, default `0.0.0.0:8000`
/// - `SNAPSHOT_CACHE` (optional): "1"/"true" enables the
///   memoized-by-fingerprint retrain cache, default off
#[derive(Debug, Clone)]
pub struct Config {
    pub base_url: String,
    pub num_recommendations: usize,
    pub bind_addr: String,
    pub snapshot_cache: bool,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any key→value lookup (the env in production, a map in
    /// tests).
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let base_url = lookup("BASE_URL")
            .context("BASE_URL must be set to the upstream data source root")?;

        let num_recommendations = match lookup("NUM_RECOMMENDATIONS") {
            Some(raw) => raw
                .trim()
                .parse::<usize>()
                .ok()
                .filter(|&n| n > 0)
                .ok_or_else(|| {
                    anyhow!(
                        "NUM_RECOMMENDATIONS must be a positive integer, got {:?}",
                        raw
                    )
                })?,
            None => DEFAULT_NUM_RECOMMENDATIONS,
        };

        let bind_addr = lookup("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string());
        let snapshot_cache = lookup("SNAPSHOT_CACHE")
            .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
            .unwrap_or(false);

        Ok(Self {
            base_url,
            num_recommendations,
            bind_addr,
            snapshot_cache,
        })
    }
}
