//! Collaborative recommender over user purchase behavior.
//!
//! "Users who bought what you bought also bought these products."
//!
//! ## Algorithm
//! 1. Locate the user's row in the interaction matrix
//! 2. Rank all users by cosine similarity to that row, keep the top
//!    `NEIGHBOR_POOL_SIZE` (the user itself ranks first and is skipped)
//! 3. Walk the neighbors most-similar first; emit each product a neighbor
//!    has a positive interaction for that the user has not purchased
//! 4. Stop once `n` recommendations are collected or neighbors run out

use crate::similarity::cosine_similarity_matrix;
use crate::RecommendError;
use data_processor::{InteractionMatrix, Matrix, VariantId};
use std::cmp::Ordering;
use tracing::{debug, info};

/// Size of the similar-user pool consulted per query.
///
/// A deliberately small, fixed neighborhood: the behavioral signal stays
/// cheap and bounded instead of scanning the full user base.
pub const NEIGHBOR_POOL_SIZE: usize = 5;

struct TrainedState {
    interactions: InteractionMatrix,
    similarity: Matrix,
}

/// Recommends product variants bought by behaviorally similar users.
///
/// Training replaces the held matrices wholesale; there is no incremental
/// update.
#[derive(Default)]
pub struct CollaborativeFilter {
    state: Option<TrainedState>,
}

impl CollaborativeFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Store the interaction matrix and compute its user × user cosine
    /// similarity matrix.
    pub fn train(&mut self, interactions: InteractionMatrix) {
        let similarity = cosine_similarity_matrix(interactions.matrix());
        info!(
            "trained collaborative filter: {} users x {} variants",
            interactions.user_count(),
            interactions.variant_count()
        );
        self.state = Some(TrainedState {
            interactions,
            similarity,
        });
    }

    /// Up to `n` variant ids for a user.
    ///
    /// `Err(NotTrained)` before the first `train`; `Ok` with an empty list
    /// for a user with no interaction row (cold start, no behavioral
    /// signal). Duplicates across neighbors are not removed here; the
    /// merge layer deduplicates.
    pub fn recommend(&self, user_id: &str, n: usize) -> Result<Vec<VariantId>, RecommendError> {
        let state = self.state.as_ref().ok_or(RecommendError::NotTrained)?;
        if n == 0 {
            return Ok(Vec::new());
        }
        let Some(user_row) = state.interactions.user_position(user_id) else {
            debug!("user {} has no interaction row, cold start", user_id);
            return Ok(Vec::new());
        };

        // Stable ascending argsort by similarity; the neighbor pool is the
        // tail. Self-similarity is maximal, so the user itself lands in
        // the pool and is skipped during the walk.
        let similarities = state.similarity.row(user_row);
        let mut order: Vec<usize> = (0..similarities.len()).collect();
        order.sort_by(|&a, &b| {
            similarities[a]
                .partial_cmp(&similarities[b])
                .unwrap_or(Ordering::Equal)
        });
        let pool = &order[order.len().saturating_sub(NEIGHBOR_POOL_SIZE)..];

        let own_row = state.interactions.matrix().row(user_row);
        let mut recommendations = Vec::new();
        for &neighbor in pool.iter().rev() {
            if neighbor == user_row {
                continue;
            }
            let neighbor_row = state.interactions.matrix().row(neighbor);
            for (col, &quantity) in neighbor_row.iter().enumerate() {
                if quantity > 0.0 && own_row[col] <= 0.0 {
                    recommendations.push(state.interactions.variant_at(col).clone());
                    if recommendations.len() >= n {
                        return Ok(recommendations);
                    }
                }
            }
        }
        Ok(recommendations)
    }
}
