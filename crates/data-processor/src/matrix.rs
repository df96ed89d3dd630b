//! Label-indexed dense matrices derived from the snapshot tables.
//!
//! Two derived structures feed the recommenders:
//! - `InteractionMatrix`: user × product-variant, cell = summed quantity
//! - `FeatureMatrix`: product × attribute, one-hot categoricals + z-scored price
//!
//! Both wrap a plain row-major `Matrix` and carry their row/column labels
//! alongside `HashMap` indices for O(1) label lookups.

use crate::types::{Order, Product, ProductId, UserId, VariantId};
use std::collections::{BTreeSet, HashMap};

/// Dense row-major f64 matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Create a matrix filled with zeros.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0.0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    /// True when the matrix has no cells at all.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    pub fn get(&self, row: usize, col: usize) -> f64 {
        self.data[row * self.cols + col]
    }

    pub fn set(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] = value;
    }

    pub fn add(&mut self, row: usize, col: usize, value: f64) {
        self.data[row * self.cols + col] += value;
    }

    /// Borrow one row as a slice.
    pub fn row(&self, row: usize) -> &[f64] {
        &self.data[row * self.cols..(row + 1) * self.cols]
    }
}

// =============================================================================
// Interaction Matrix
// =============================================================================

/// User × product-variant interaction matrix.
///
/// Rows are the distinct client ids appearing in orders, columns the
/// distinct variant ids, both sorted lexicographically so the same order
/// table always pivots to the same matrix. A user or variant with no
/// orders has no row/column.
#[derive(Debug, Clone)]
pub struct InteractionMatrix {
    user_ids: Vec<UserId>,
    variant_ids: Vec<VariantId>,
    user_index: HashMap<UserId, usize>,
    variant_index: HashMap<VariantId, usize>,
    matrix: Matrix,
}

impl InteractionMatrix {
    /// An interaction matrix with no rows or columns.
    pub fn empty() -> Self {
        Self {
            user_ids: Vec::new(),
            variant_ids: Vec::new(),
            user_index: HashMap::new(),
            variant_index: HashMap::new(),
            matrix: Matrix::zeros(0, 0),
        }
    }

    /// Pivot the order table: cell = sum of quantities for (client, variant).
    pub fn from_orders(orders: &[Order]) -> Self {
        if orders.is_empty() {
            return Self::empty();
        }

        let user_ids: Vec<UserId> = orders
            .iter()
            .map(|o| o.client_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();
        let variant_ids: Vec<VariantId> = orders
            .iter()
            .map(|o| o.variant_id.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect();

        let user_index: HashMap<UserId, usize> = user_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();
        let variant_index: HashMap<VariantId, usize> = variant_ids
            .iter()
            .enumerate()
            .map(|(i, id)| (id.clone(), i))
            .collect();

        let mut matrix = Matrix::zeros(user_ids.len(), variant_ids.len());
        for order in orders {
            let row = user_index[&order.client_id];
            let col = variant_index[&order.variant_id];
            matrix.add(row, col, order.quantity);
        }

        Self {
            user_ids,
            variant_ids,
            user_index,
            variant_index,
            matrix,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn user_count(&self) -> usize {
        self.user_ids.len()
    }

    pub fn variant_count(&self) -> usize {
        self.variant_ids.len()
    }

    /// Row position for a user id, `None` when the user has no orders.
    pub fn user_position(&self, user_id: &str) -> Option<usize> {
        self.user_index.get(user_id).copied()
    }

    pub fn variant_position(&self, variant_id: &str) -> Option<usize> {
        self.variant_index.get(variant_id).copied()
    }

    pub fn user_at(&self, row: usize) -> &UserId {
        &self.user_ids[row]
    }

    pub fn variant_at(&self, col: usize) -> &VariantId {
        &self.variant_ids[col]
    }

    pub fn user_ids(&self) -> &[UserId] {
        &self.user_ids
    }

    pub fn variant_ids(&self) -> &[VariantId] {
        &self.variant_ids
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

// =============================================================================
// Feature Matrix
// =============================================================================

/// The attribute fields expanded into indicator columns, in block order.
const ONE_HOT_FIELDS: [(&str, fn(&Product) -> &str); 4] = [
    ("category", |p| p.category.as_str()),
    ("brand", |p| p.brand.as_str()),
    ("material", |p| p.material.as_str()),
    ("feature", |p| p.feature.as_str()),
];

/// Product × attribute feature matrix.
///
/// One row per product record in table order. Columns are one indicator
/// per distinct value of each attribute field (named `<field>_<value>`,
/// values sorted within each field block), plus a final `price` column
/// z-score normalized over the products whose price is present.
///
/// The column set is fixed at construction: an attribute value unseen here
/// cannot be represented later.
#[derive(Debug, Clone)]
pub struct FeatureMatrix {
    product_ids: Vec<ProductId>,
    columns: Vec<String>,
    index: HashMap<ProductId, usize>,
    matrix: Matrix,
}

impl FeatureMatrix {
    /// A feature matrix with no rows or columns.
    pub fn empty() -> Self {
        Self {
            product_ids: Vec::new(),
            columns: Vec::new(),
            index: HashMap::new(),
            matrix: Matrix::zeros(0, 0),
        }
    }

    pub fn from_products(products: &[Product]) -> Self {
        if products.is_empty() {
            return Self::empty();
        }

        // Column layout: one sorted indicator block per attribute field
        let mut columns = Vec::new();
        let mut column_index: HashMap<String, usize> = HashMap::new();
        for (field, value_of) in ONE_HOT_FIELDS {
            let values: BTreeSet<&str> = products.iter().map(|p| value_of(p)).collect();
            for value in values {
                let name = format!("{}_{}", field, value);
                column_index.insert(name.clone(), columns.len());
                columns.push(name);
            }
        }
        let price_col = columns.len();
        columns.push("price".to_string());

        let mut matrix = Matrix::zeros(products.len(), columns.len());
        for (row, product) in products.iter().enumerate() {
            for (field, value_of) in ONE_HOT_FIELDS {
                let name = format!("{}_{}", field, value_of(product));
                matrix.set(row, column_index[&name], 1.0);
            }
        }

        // Z-score the price column over the prices that are present.
        // Sample standard deviation (n - 1); a zero or undefined deviation
        // leaves every normalized price at 0, as does a missing price.
        let present: Vec<f64> = products.iter().filter_map(|p| p.price).collect();
        let (mean, std) = price_stats(&present);
        if std > 0.0 {
            for (row, product) in products.iter().enumerate() {
                if let Some(price) = product.price {
                    matrix.set(row, price_col, (price - mean) / std);
                }
            }
        }

        let product_ids: Vec<ProductId> = products.iter().map(|p| p.id.clone()).collect();
        let mut index = HashMap::new();
        for (row, id) in product_ids.iter().enumerate() {
            // First occurrence wins for duplicate product ids
            index.entry(id.clone()).or_insert(row);
        }

        Self {
            product_ids,
            columns,
            index,
            matrix,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.matrix.is_empty()
    }

    pub fn product_count(&self) -> usize {
        self.product_ids.len()
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row position for a product id, `None` when the id is not in the index.
    pub fn position(&self, product_id: &str) -> Option<usize> {
        self.index.get(product_id).copied()
    }

    pub fn product_at(&self, row: usize) -> &ProductId {
        &self.product_ids[row]
    }

    pub fn product_ids(&self) -> &[ProductId] {
        &self.product_ids
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn matrix(&self) -> &Matrix {
        &self.matrix
    }
}

/// Mean and sample standard deviation; (0, 0) when undefined.
fn price_stats(values: &[f64]) -> (f64, f64) {
    if values.len() < 2 {
        return (values.first().copied().unwrap_or(0.0), 0.0);
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1.0);
    (mean, variance.sqrt())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(client: &str, variant: &str, quantity: f64) -> Order {
        Order {
            client_id: client.to_string(),
            variant_id: variant.to_string(),
            quantity,
            purchased_at: None,
        }
    }

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

    #[test]
    fn test_empty_interaction_matrix() {
        let matrix = InteractionMatrix::from_orders(&[]);
        assert!(matrix.is_empty());
        assert_eq!(matrix.user_count(), 0);
        assert_eq!(matrix.variant_count(), 0);
    }

    #[test]
    fn test_pivot_sums_quantities() {
        let orders = vec![
            order("u1", "p1", 2.0),
            order("u1", "p1", 3.0),
            order("u1", "p2", 1.0),
            order("u2", "p2", 4.0),
        ];
        let matrix = InteractionMatrix::from_orders(&orders);

        assert_eq!(matrix.user_count(), 2);
        assert_eq!(matrix.variant_count(), 2);

        let u1 = matrix.user_position("u1").unwrap();
        let u2 = matrix.user_position("u2").unwrap();
        let p1 = matrix.variant_position("p1").unwrap();
        let p2 = matrix.variant_position("p2").unwrap();

        assert_eq!(matrix.matrix().get(u1, p1), 5.0);
        assert_eq!(matrix.matrix().get(u1, p2), 1.0);
        // Missing pair stays zero
        assert_eq!(matrix.matrix().get(u2, p1), 0.0);
        assert_eq!(matrix.matrix().get(u2, p2), 4.0);
    }

    #[test]
    fn test_pivot_axes_are_sorted() {
        let orders = vec![
            order("zoe", "p9", 1.0),
            order("amy", "p1", 1.0),
            order("mia", "p5", 1.0),
        ];
        let matrix = InteractionMatrix::from_orders(&orders);

        assert_eq!(matrix.user_ids(), &["amy", "mia", "zoe"]);
        assert_eq!(matrix.variant_ids(), &["p1", "p5", "p9"]);
    }

    #[test]
    fn test_feature_matrix_columns() {
        let products = vec![
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "pants", "acme", Some(20.0)),
        ];
        let features = FeatureMatrix::from_products(&products);

        // Indicator blocks sorted within each field, price last
        assert_eq!(
            features.columns(),
            &[
                "category_pants",
                "category_shirts",
                "brand_acme",
                "material_cotton",
                "feature_plain",
                "price",
            ]
        );
        assert_eq!(features.product_count(), 2);

        let p1 = features.position("p1").unwrap();
        assert_eq!(features.matrix().get(p1, 1), 1.0); // category_shirts
        assert_eq!(features.matrix().get(p1, 0), 0.0); // category_pants
    }

    #[test]
    fn test_price_z_score() {
        let products = vec![
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", Some(20.0)),
            product("p3", "shirts", "acme", Some(30.0)),
        ];
        let features = FeatureMatrix::from_products(&products);
        let price_col = features.column_count() - 1;

        // mean 20, sample std 10
        assert!((features.matrix().get(0, price_col) + 1.0).abs() < 1e-9);
        assert!((features.matrix().get(1, price_col)).abs() < 1e-9);
        assert!((features.matrix().get(2, price_col) - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_variance_price_normalizes_to_zero() {
        let products = vec![
            product("p1", "shirts", "acme", Some(15.0)),
            product("p2", "pants", "acme", Some(15.0)),
        ];
        let features = FeatureMatrix::from_products(&products);
        let price_col = features.column_count() - 1;

        assert_eq!(features.matrix().get(0, price_col), 0.0);
        assert_eq!(features.matrix().get(1, price_col), 0.0);
    }

    #[test]
    fn test_missing_price_excluded_from_stats() {
        let products = vec![
            product("p1", "shirts", "acme", Some(10.0)),
            product("p2", "shirts", "acme", None),
            product("p3", "shirts", "acme", Some(30.0)),
        ];
        let features = FeatureMatrix::from_products(&products);
        let price_col = features.column_count() - 1;

        // Stats over {10, 30}: mean 20, sample std ~14.142
        let std = (200.0_f64).sqrt();
        assert!((features.matrix().get(0, price_col) - (10.0 - 20.0) / std).abs() < 1e-9);
        // The row with no price normalizes to 0
        assert_eq!(features.matrix().get(1, price_col), 0.0);
    }

    #[test]
    fn test_empty_feature_matrix() {
        let features = FeatureMatrix::from_products(&[]);
        assert!(features.is_empty());
        assert_eq!(features.column_count(), 0);
    }
}
