//! The DataProcessor: snapshot payload in, tables and matrices out.
//!
//! `process` ingests the three record collections into relational tables;
//! the extraction methods derive the per-user feature vector, the product
//! feature matrix, and the user × variant interaction matrix from them.
//! Extraction is fail-soft: no data yields an empty table, never an error.

use crate::coerce::{coerce_order, coerce_product, coerce_user};
use crate::error::{ProcessError, Result};
use crate::matrix::{FeatureMatrix, InteractionMatrix};
use crate::types::{Order, Product, SnapshotPayload, User, UserId, VariantId};
use std::collections::{HashMap, HashSet};
use tracing::{debug, info};

/// Number of entries in a user feature vector: `[age, gender]`.
pub const USER_FEATURE_LEN: usize = 2;

/// Holds the three snapshot tables and derives the numeric matrices.
///
/// Every `process` call replaces the tables wholesale; nothing is merged
/// across snapshots.
#[derive(Debug, Default)]
pub struct DataProcessor {
    users: Vec<User>,
    user_index: HashMap<UserId, usize>,
    products: Vec<Product>,
    orders: Vec<Order>,
}

impl DataProcessor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Ingest a snapshot payload into the three tables.
    ///
    /// Fail-loud: a payload without the `data` envelope or one of its three
    /// sections is structurally malformed and errors. Field-level problems
    /// (bad age, bad price, bad quantity) coerce to missing values instead.
    pub fn process(&mut self, payload: &SnapshotPayload) -> Result<()> {
        let data = payload
            .data
            .as_ref()
            .ok_or(ProcessError::MissingSection { section: "data" })?;
        let users = data
            .users
            .as_ref()
            .ok_or(ProcessError::MissingSection { section: "users" })?;
        let products = data
            .products
            .as_ref()
            .ok_or(ProcessError::MissingSection { section: "products" })?;
        let orders = data
            .order_histories
            .as_ref()
            .ok_or(ProcessError::MissingSection {
                section: "orderHistories",
            })?;

        self.users = users.iter().map(coerce_user).collect();
        // Duplicate ids: last write wins in the lookup, rows are kept as-is
        self.user_index = self
            .users
            .iter()
            .enumerate()
            .map(|(row, user)| (user.id.clone(), row))
            .collect();
        self.products = products.iter().map(coerce_product).collect();
        self.orders = orders.iter().map(coerce_order).collect();

        info!(
            "processed snapshot: {} users, {} products, {} orders",
            self.users.len(),
            self.products.len(),
            self.orders.len()
        );
        Ok(())
    }

    /// Fixed-length numeric feature vector `[age, gender]` for a user.
    ///
    /// Missing values and unknown users both yield zeros; callers treat a
    /// zero vector as "unknown user", not as a failure.
    pub fn user_features(&self, user_id: &str) -> [f64; USER_FEATURE_LEN] {
        match self.user_index.get(user_id).map(|&row| &self.users[row]) {
            Some(user) => [user.age.unwrap_or(0.0), user.gender.unwrap_or(0.0)],
            None => {
                debug!("no user row for {}, returning zero features", user_id);
                [0.0; USER_FEATURE_LEN]
            }
        }
    }

    /// The normalized product feature matrix; empty when there are no
    /// product rows.
    pub fn product_features(&self) -> FeatureMatrix {
        FeatureMatrix::from_products(&self.products)
    }

    /// The user × variant interaction matrix, aggregated by summed
    /// quantity; empty when there are no orders.
    pub fn user_product_matrix(&self) -> InteractionMatrix {
        InteractionMatrix::from_orders(&self.orders)
    }

    /// Distinct variant ids the user has ordered, in first-encounter order.
    pub fn purchased_variants(&self, user_id: &str) -> Vec<VariantId> {
        let mut seen = HashSet::new();
        self.orders
            .iter()
            .filter(|order| order.client_id == user_id)
            .filter(|order| seen.insert(order.variant_id.clone()))
            .map(|order| order.variant_id.clone())
            .collect()
    }

    // Getters - these return references into the tables

    pub fn get_user(&self, user_id: &str) -> Option<&User> {
        self.user_index.get(user_id).map(|&row| &self.users[row])
    }

    pub fn get_product_by_variant(&self, variant_id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.variant_id == variant_id)
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn orders(&self) -> &[Order] {
        &self.orders
    }

    /// Table sizes for debugging/validation: (users, products, orders)
    pub fn counts(&self) -> (usize, usize, usize) {
        (self.users.len(), self.products.len(), self.orders.len())
    }
}
