//! Content recommender over product attributes.
//!
//! "Products like the ones you already bought."
//!
//! ## Algorithm
//! 1. Look up the similarity row of each purchased product present in the
//!    trained index
//! 2. Average those rows into one aggregate score per candidate product
//! 3. Rank candidates by aggregate score, descending
//! 4. Emit unpurchased candidates in ranked order until `n` are collected
//!
//! The caller also passes the user's feature vector. It selects nothing
//! today: the ranking is driven entirely by the purchased rows. The
//! parameter is kept so a user-level signal can be wired in without
//! changing the call sites.

use crate::similarity::cosine_similarity_matrix;
use crate::RecommendError;
use data_processor::{FeatureMatrix, Matrix, ProductId, VariantId, USER_FEATURE_LEN};
use std::cmp::Ordering;
use std::collections::HashSet;
use tracing::{debug, info};

struct TrainedState {
    features: FeatureMatrix,
    similarity: Matrix,
}

/// Recommends products whose attributes resemble the user's purchases.
#[derive(Default)]
pub struct ContentFilter {
    state: Option<TrainedState>,
}

impl ContentFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// Store the feature matrix and compute its product × product cosine
    /// similarity matrix.
    pub fn train(&mut self, features: FeatureMatrix) {
        let similarity = cosine_similarity_matrix(features.matrix());
        info!(
            "trained content filter: {} products x {} attribute columns",
            features.product_count(),
            features.column_count()
        );
        self.state = Some(TrainedState {
            features,
            similarity,
        });
    }

    /// Up to `n` product ids ranked by similarity to the purchase history.
    ///
    /// `Err(NotTrained)` before the first `train`; `Ok` with an empty list
    /// when none of `purchased` appears in the trained product index.
    pub fn recommend(
        &self,
        _user_features: &[f64; USER_FEATURE_LEN],
        purchased: &[VariantId],
        n: usize,
    ) -> Result<Vec<ProductId>, RecommendError> {
        let state = self.state.as_ref().ok_or(RecommendError::NotTrained)?;
        if n == 0 {
            return Ok(Vec::new());
        }

        let purchased_rows: Vec<usize> = purchased
            .iter()
            .filter_map(|id| state.features.position(id))
            .collect();
        if purchased_rows.is_empty() {
            debug!("no purchased product in the trained index, cold start");
            return Ok(Vec::new());
        }

        // Element-wise average of the purchased products' similarity rows
        let count = state.features.product_count();
        let mut aggregate = vec![0.0; count];
        for &row in &purchased_rows {
            for (col, &value) in state.similarity.row(row).iter().enumerate() {
                aggregate[col] += value;
            }
        }
        let scale = purchased_rows.len() as f64;
        for value in &mut aggregate {
            *value /= scale;
        }

        let mut order: Vec<usize> = (0..count).collect();
        order.sort_by(|&a, &b| {
            aggregate[b]
                .partial_cmp(&aggregate[a])
                .unwrap_or(Ordering::Equal)
        });

        let purchased_set: HashSet<&str> = purchased.iter().map(String::as_str).collect();
        let mut recommendations = Vec::new();
        for row in order {
            let product_id = state.features.product_at(row);
            if purchased_set.contains(product_id.as_str()) {
                continue;
            }
            recommendations.push(product_id.clone());
            if recommendations.len() >= n {
                break;
            }
        }
        Ok(recommendations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use data_processor::types::Product;

    fn product(id: &str, category: &str, brand: &str, price: Option<f64>) -> Product {
        Product {
            id: id.to_string(),
            variant_id: id.to_string(),
            name: format!("Product {}", id),
            category: category.to_string(),
            brand: brand.to_string(),
            material: "cotton".to_string(),
            feature: "plain".to_string(),
            price,
        }
    }

    fn trained_filter(products: &[Product]) -> ContentFilter {
        let mut filter = ContentFilter::new();
        filter.train(FeatureMatrix::from_products(products));
        filter
    }

    const NO_USER: [f64; USER_FEATURE_LEN] = [0.0; USER_FEATURE_LEN];

    #[test]
    fn test_untrained_is_a_fault() {
        let filter = ContentFilter::new();
        assert!(matches!(
            filter.recommend(&NO_USER, &["p1".to_string()], 3),
            Err(RecommendError::NotTrained)
        ));
    }

    #[test]
    fn test_unknown_purchases_are_empty() {
        let filter = trained_filter(&[product("p1", "shirts", "acme", Some(10.0))]);
        let recommendations = filter
            .recommend(&NO_USER, &["elsewhere".to_string()], 3)
            .unwrap();
        assert!(recommendations.is_empty());
    }

    #[test]
    fn test_ranks_similar_products_first() {
        // p2 shares category and brand with the purchased p1; p3 shares
        // nothing but the material/feature defaults
        let filter = trained_filter(&[
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", Some(12.0)),
            product("p3", "pants", "other", Some(80.0)),
        ]);

        let recommendations = filter
            .recommend(&NO_USER, &["p1".to_string()], 2)
            .unwrap();
        assert_eq!(recommendations, vec!["p2", "p3"]);
    }

    #[test]
    fn test_excludes_purchased() {
        let filter = trained_filter(&[
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", Some(12.0)),
        ]);

        let purchased = vec!["p1".to_string(), "p2".to_string()];
        assert!(filter.recommend(&NO_USER, &purchased, 3).unwrap().is_empty());
    }

    #[test]
    fn test_never_exceeds_n() {
        let filter = trained_filter(&[
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", Some(11.0)),
            product("p3", "shirts", "acme", Some(12.0)),
            product("p4", "shirts", "acme", Some(13.0)),
        ]);

        let recommendations = filter
            .recommend(&NO_USER, &["p1".to_string()], 2)
            .unwrap();
        assert_eq!(recommendations.len(), 2);
    }

    #[test]
    fn test_averages_multiple_purchases() {
        // With both p1 and p3 purchased, p2 (similar to p1) and p4
        // (similar to p3) are both reachable; the most similar of the
        // remaining candidates comes first
        let filter = trained_filter(&[
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", Some(10.0)),
            product("p3", "pants", "other", Some(50.0)),
            product("p4", "pants", "other", Some(50.0)),
        ]);

        let purchased = vec!["p1".to_string(), "p3".to_string()];
        let recommendations = filter.recommend(&NO_USER, &purchased, 4).unwrap();
        assert_eq!(recommendations.len(), 2);
        assert!(recommendations.contains(&"p2".to_string()));
        assert!(recommendations.contains(&"p4".to_string()));
    }
}
