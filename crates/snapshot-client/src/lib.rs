//! Snapshot client for the upstream catalog/order data source.
//!
//! This crate fetches the users/products/orders snapshot served by the
//! upstream API and applies the boundary validation contract. It handles:
//! - The HTTP GET against `{base_url}/recommender/data`
//! - Decoding the JSON payload
//! - Rejecting payloads that are not successful or lack a data section
//! - Fingerprinting the raw body for the opt-in retrain cache
//!
//! Transport problems and payload problems surface as distinct error
//! variants so the serving layer can map them to different outcomes.

use data_processor::SnapshotPayload;
use std::hash::{DefaultHasher, Hash, Hasher};
use thiserror::Error;
use tracing::{debug, info};

/// Path of the snapshot resource under the upstream base URL.
pub const SNAPSHOT_PATH: &str = "/recommender/data";

/// Errors that can occur while obtaining a snapshot
#[derive(Error, Debug)]
pub enum SnapshotError {
    /// The upstream could not be reached or the transfer failed
    #[error("upstream request failed: {0}")]
    Upstream(#[source] reqwest::Error),

    /// The body arrived but is not a usable snapshot payload
    #[error("invalid snapshot payload: {0}")]
    InvalidPayload(String),
}

/// A validated snapshot plus the fingerprint of its raw body.
#[derive(Debug, Clone)]
pub struct FetchedSnapshot {
    pub payload: SnapshotPayload,
    pub fingerprint: u64,
}

/// Client for the upstream snapshot endpoint.
pub struct SnapshotClient {
    http: reqwest::Client,
    url: String,
}

impl SnapshotClient {
    /// Create a client for the given upstream base URL
    /// (e.g., "http://localhost:8080").
    pub fn new(base_url: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            url: format!("{}{}", base_url.trim_end_matches('/'), SNAPSHOT_PATH),
        }
    }

    /// Fetch, decode, and validate the current snapshot.
    pub async fn fetch(&self) -> Result<FetchedSnapshot, SnapshotError> {
        debug!("fetching snapshot from {}", self.url);
        let response = self
            .http
            .get(&self.url)
            .send()
            .await
            .map_err(SnapshotError::Upstream)?;
        let body = response.bytes().await.map_err(SnapshotError::Upstream)?;

        let payload: SnapshotPayload = serde_json::from_slice(&body)
            .map_err(|e| SnapshotError::InvalidPayload(e.to_string()))?;
        validate_payload(&payload)?;

        let fingerprint = fingerprint_bytes(&body);
        info!(
            "fetched snapshot ({} bytes, fingerprint {:016x})",
            body.len(),
            fingerprint
        );
        Ok(FetchedSnapshot {
            payload,
            fingerprint,
        })
    }

    /// The resolved snapshot URL this client targets.
    pub fn url(&self) -> &str {
        &self.url
    }
}

/// Boundary validation: the payload must report success and carry all
/// three record sections. Anything that fails here never reaches the
/// data processor.
pub fn validate_payload(payload: &SnapshotPayload) -> Result<(), SnapshotError> {
    if !payload.success {
        return Err(SnapshotError::InvalidPayload(
            "upstream reported success=false".to_string(),
        ));
    }
    let Some(data) = payload.data.as_ref() else {
        return Err(SnapshotError::InvalidPayload(
            "missing data section".to_string(),
        ));
    };
    for (section, present) in [
        ("users", data.users.is_some()),
        ("products", data.products.is_some()),
        ("orderHistories", data.order_histories.is_some()),
    ] {
        if !present {
            return Err(SnapshotError::InvalidPayload(format!(
                "missing section: {}",
                section
            )));
        }
    }
    Ok(())
}

/// Stable within-process fingerprint of a raw snapshot body.
///
/// Used only to detect "same snapshot as last time" for the opt-in
/// retrain cache, never persisted.
pub fn fingerprint_bytes(bytes: &[u8]) -> u64 {
    let mut hasher = DefaultHasher::new();
    bytes.hash(&mut hasher);
    hasher.finish()
}
