//! # Data Processor Crate
//!
//! This crate ingests the upstream snapshot payload and derives the data
//! structures the recommenders train on.
//!
//! ## Main Components
//!
//! - **types**: wire-level payload records and the processed table rows
//! - **coerce**: loose-field numeric coercion (failures become missing values)
//! - **processor**: the three tables plus feature/matrix extraction
//! - **matrix**: label-indexed dense matrices (interaction + product features)
//! - **error**: error types for snapshot processing
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_processor::{DataProcessor, SnapshotPayload};
//!
//! let payload: SnapshotPayload = serde_json::from_slice(&body)?;
//! let mut processor = DataProcessor::new();
//! processor.process(&payload)?;
//!
//! let interactions = processor.user_product_matrix();
//! let features = processor.product_features();
//! let profile = processor.user_features("u1");
//! ```

// Public modules
pub mod coerce;
pub mod error;
pub mod matrix;
pub mod processor;
pub mod types;

// Re-export commonly used types for convenience
pub use error::{ProcessError, Result};
pub use matrix::{FeatureMatrix, InteractionMatrix, Matrix};
pub use processor::{DataProcessor, USER_FEATURE_LEN};
pub use types::{
    // Type aliases
    UserId,
    ProductId,
    VariantId,
    // Processed rows
    User,
    Product,
    Order,
    // Wire types
    RawScalar,
    SnapshotData,
    SnapshotPayload,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_processor_is_empty() {
        let processor = DataProcessor::new();
        assert_eq!(processor.counts(), (0, 0, 0));
        assert!(processor.user_product_matrix().is_empty());
        assert!(processor.product_features().is_empty());
    }

    #[test]
    fn test_payload_tolerates_malformed_shape() {
        // A payload without `data` still deserializes; rejection happens in
        // validation / processing, with a precise error
        let payload: SnapshotPayload = serde_json::from_str(r#"{ "success": false }"#).unwrap();
        assert!(!payload.success);
        assert!(payload.data.is_none());
    }
}
