//! Coercion of loosely-typed snapshot fields into numeric values.
//!
//! The upstream serializes the same field as a number in one record and a
//! string in the next. Coercion failures become missing values, never
//! errors: a row with a bad field still lands in its table.

use crate::types::{Order, Product, RawOrder, RawProduct, RawScalar, RawUser, User};
use chrono::{DateTime, Utc};

/// Coerce a scalar to a number.
///
/// Numeric strings parse; flag values and junk strings become `None`.
pub fn coerce_number(value: Option<&RawScalar>) -> Option<f64> {
    match value? {
        RawScalar::Number(n) => Some(*n),
        RawScalar::Text(s) => s.trim().parse().ok(),
        RawScalar::Bool(_) => None,
    }
}

/// Coerce a boolean-like flag to 1.0 / 0.0.
///
/// Only `"true"` / `"false"` (or a real boolean) map; anything else is `None`.
pub fn coerce_flag(value: Option<&RawScalar>) -> Option<f64> {
    match value? {
        RawScalar::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
        RawScalar::Text(s) => match s.as_str() {
            "true" => Some(1.0),
            "false" => Some(0.0),
            _ => None,
        },
        RawScalar::Number(_) => None,
    }
}

/// Convert epoch milliseconds to an absolute instant.
pub fn coerce_timestamp(millis: Option<i64>) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis(millis?)
}

pub fn coerce_user(raw: &RawUser) -> User {
    User {
        id: raw.id.clone(),
        age: coerce_number(raw.age.as_ref()),
        gender: coerce_flag(raw.gender.as_ref()),
    }
}

pub fn coerce_product(raw: &RawProduct) -> Product {
    Product {
        id: raw.id.clone(),
        variant_id: raw.product_variant_id.clone(),
        name: raw.name.clone(),
        category: raw.category.clone(),
        brand: raw.brand.clone(),
        material: raw.material.clone(),
        feature: raw.feature.clone(),
        price: coerce_number(raw.price.as_ref()),
    }
}

pub fn coerce_order(raw: &RawOrder) -> Order {
    Order {
        client_id: raw.client_id.clone(),
        variant_id: raw.product_variant_id.clone(),
        // A quantity that fails coercion contributes nothing to the pivot
        quantity: coerce_number(raw.quantity.as_ref()).unwrap_or(0.0),
        purchased_at: coerce_timestamp(raw.purchase_timestamp),
    }
}
