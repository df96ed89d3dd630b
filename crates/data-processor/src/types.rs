//! Core domain types for the product snapshot.
//!
//! This module defines the snapshot payload as it arrives on the wire
//! (loosely typed, tolerant of missing fields) and the processed records
//! the rest of the system works with.

use chrono::{DateTime, Utc};
use serde::Deserialize;

// =============================================================================
// Type Aliases
// =============================================================================
// These make the domain clearer and prevent mixing up user ids with product ids

/// Unique identifier for a user (the upstream `id` / `clientId` field)
pub type UserId = String;

/// Unique identifier for a product record
pub type ProductId = String;

/// Unique identifier for a sellable product variant
pub type VariantId = String;

// =============================================================================
// Wire Types
// =============================================================================

/// A scalar field as the upstream emits it: the same field can arrive as a
/// number, a quoted number, or a flag string depending on the record.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum RawScalar {
    Bool(bool),
    Number(f64),
    Text(String),
}

/// A user record as delivered in the snapshot payload.
#[derive(Debug, Clone, Deserialize)]
pub struct RawUser {
    #[serde(default)]
    pub id: UserId,
    #[serde(default)]
    pub age: Option<RawScalar>,
    #[serde(default)]
    pub gender: Option<RawScalar>,
}

/// A product record as delivered in the snapshot payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawProduct {
    #[serde(default)]
    pub id: ProductId,
    #[serde(default)]
    pub product_variant_id: VariantId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub brand: String,
    #[serde(default)]
    pub material: String,
    #[serde(default)]
    pub feature: String,
    #[serde(default)]
    pub price: Option<RawScalar>,
}

/// An order-history record as delivered in the snapshot payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawOrder {
    #[serde(default)]
    pub client_id: UserId,
    #[serde(default)]
    pub product_variant_id: VariantId,
    #[serde(default)]
    pub quantity: Option<RawScalar>,
    /// Epoch milliseconds
    #[serde(default)]
    pub purchase_timestamp: Option<i64>,
}

/// The full snapshot payload served by the upstream data source.
///
/// `data` and its sections are optional at the wire level so that a
/// malformed payload deserializes and can be rejected with a precise
/// validation error instead of a serde failure.
#[derive(Debug, Clone, Deserialize)]
pub struct SnapshotPayload {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<SnapshotData>,
}

/// The three record collections inside a snapshot.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotData {
    #[serde(default)]
    pub users: Option<Vec<RawUser>>,
    #[serde(default)]
    pub products: Option<Vec<RawProduct>>,
    #[serde(default)]
    pub order_histories: Option<Vec<RawOrder>>,
}

// =============================================================================
// Processed Records
// =============================================================================

/// A user row after coercion.
///
/// `None` means the upstream value was absent or unparseable; the value is
/// only defaulted to 0 at feature-extraction time.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub age: Option<f64>,
    /// 1.0 for "true", 0.0 for "false"
    pub gender: Option<f64>,
}

/// A product row after coercion.
#[derive(Debug, Clone)]
pub struct Product {
    pub id: ProductId,
    pub variant_id: VariantId,
    pub name: String,
    pub category: String,
    pub brand: String,
    pub material: String,
    pub feature: String,
    /// `None` when missing or unparseable; excluded from normalization stats
    pub price: Option<f64>,
}

/// An order row after coercion.
#[derive(Debug, Clone)]
pub struct Order {
    pub client_id: UserId,
    pub variant_id: VariantId,
    pub quantity: f64,
    /// `None` when the epoch-millisecond timestamp was absent or out of range
    pub purchased_at: Option<DateTime<Utc>>,
}
