//! # Hybrid Recommendation Orchestrator
//!
//! This module coordinates the full retrain-then-recommend cycle:
//! 1. Process the snapshot into tables
//! 2. Train the collaborative filter from the interaction matrix
//! 3. Train the content filter from the product feature matrix
//! 4. Fetch per-user context (feature vector + purchase history)
//! 5. Query both recommenders
//! 6. Merge under a fixed priority policy and truncate to the slot budget
//!
//! Training is fail-loud: serving from a half-trained state would be
//! silently wrong, so any failure propagates and leaves the orchestrator
//! non-trained and safe to retry. Recommendation is fail-soft: recommender
//! faults are logged and collapse to an empty contribution.

use anyhow::{Context, Result};
use data_processor::{DataProcessor, SnapshotPayload, VariantId};
use recommenders::{CollaborativeFilter, ContentFilter};
use std::collections::HashSet;
use tracing::{debug, error, info};

/// Owns the processor and both recommenders for one serving session.
///
/// All trained state lives here and is replaced wholesale by each `train`
/// call; nothing survives across snapshots unless the fingerprint cache
/// is explicitly enabled.
#[derive(Default)]
pub struct HybridRecommender {
    processor: DataProcessor,
    collaborative: CollaborativeFilter,
    content: ContentFilter,
    is_trained: bool,
    cache_enabled: bool,
    last_fingerprint: Option<u64>,
}

impl HybridRecommender {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable the memoized-by-snapshot-fingerprint cache.
    ///
    /// Off by default: every query retrains. With the cache on,
    /// `train_fingerprinted` skips retraining when the fingerprint matches
    /// the last trained snapshot.
    pub fn with_snapshot_cache(mut self) -> Self {
        self.cache_enabled = true;
        self
    }

    pub fn is_trained(&self) -> bool {
        self.is_trained
    }

    /// Borrow the processed tables (for enrichment/display by callers).
    pub fn processor(&self) -> &DataProcessor {
        &self.processor
    }

    /// Train both recommenders from one snapshot.
    ///
    /// The trained flag is cleared first: a failure anywhere in the
    /// sequence leaves the orchestrator non-trained and retry-safe.
    pub fn train(&mut self, payload: &SnapshotPayload) -> Result<()> {
        self.is_trained = false;
        self.last_fingerprint = None;

        self.processor
            .process(payload)
            .context("Failed to process snapshot")?;

        // The two recommenders are independent; order does not matter
        self.collaborative.train(self.processor.user_product_matrix());
        self.content.train(self.processor.product_features());

        self.is_trained = true;
        info!("trained hybrid recommender");
        Ok(())
    }

    /// Train unless the cache is enabled and this snapshot fingerprint is
    /// the one already trained.
    pub fn train_fingerprinted(
        &mut self,
        payload: &SnapshotPayload,
        fingerprint: u64,
    ) -> Result<()> {
        if self.cache_enabled && self.is_trained && self.last_fingerprint == Some(fingerprint) {
            debug!("snapshot fingerprint unchanged, skipping retrain");
            return Ok(());
        }
        self.train(payload)?;
        self.last_fingerprint = Some(fingerprint);
        Ok(())
    }

    /// Up to `n` merged recommendations for a user.
    ///
    /// Collaborative results strictly take priority over content results;
    /// merging is deduplicating concatenation, not score blending.
    pub fn recommend(&self, user_id: &str, n: usize) -> Vec<VariantId> {
        if !self.is_trained {
            error!("recommend called before training, returning empty");
            return Vec::new();
        }

        let user_features = self.processor.user_features(user_id);
        let purchased = self.processor.purchased_variants(user_id);
        debug!(
            "user {} context: {} purchased variants",
            user_id,
            purchased.len()
        );

        let behavioral = match self.collaborative.recommend(user_id, n) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!("collaborative recommender fault: {}", e);
                Vec::new()
            }
        };
        let attribute = match self.content.recommend(&user_features, &purchased, n) {
            Ok(recommendations) => recommendations,
            Err(e) => {
                error!("content recommender fault: {}", e);
                Vec::new()
            }
        };
        info!(
            "merging {} collaborative and {} content recommendations for user {}",
            behavioral.len(),
            attribute.len(),
            user_id
        );

        merge_recommendations(behavioral, attribute, &purchased, n)
    }
}

/// Fill an `n`-slot budget from collaborative results first, then content,
/// skipping anything already purchased or already taken.
fn merge_recommendations(
    collaborative: Vec<VariantId>,
    content: Vec<VariantId>,
    purchased: &[VariantId],
    n: usize,
) -> Vec<VariantId> {
    let purchased: HashSet<&str> = purchased.iter().map(String::as_str).collect();
    let mut combined: Vec<VariantId> = Vec::with_capacity(n);
    for candidate in collaborative.into_iter().chain(content) {
        if combined.len() >= n {
            break;
        }
        if purchased.contains(candidate.as_str()) || combined.contains(&candidate) {
            continue;
        }
        combined.push(candidate);
    }
    combined
}
