//! # Recommenders Crate
//!
//! Two independent similarity-based recommenders over the matrices the
//! data processor derives:
//!
//! ### Collaborative Filter
//! User × user cosine similarity over the interaction matrix:
//! - "Users who bought what you bought also bought..."
//! - Bounded to a small fixed neighbor pool per query
//!
//! ### Content Filter
//! Product × product cosine similarity over the attribute matrix:
//! - "Products like the ones you already bought"
//! - Ranks by the averaged similarity rows of the purchase history
//!
//! Both are trained wholesale from a single snapshot and replaced on the
//! next training call. `recommend` distinguishes an internal fault
//! (`Err(RecommendError)`) from an empty-but-valid result (`Ok(vec![])`);
//! the orchestrator collapses both to an empty list at the boundary.
//!
//! ## Example Usage
//!
//! ```ignore
//! use recommenders::{CollaborativeFilter, ContentFilter};
//!
//! let mut collaborative = CollaborativeFilter::new();
//! collaborative.train(processor.user_product_matrix());
//!
//! let mut content = ContentFilter::new();
//! content.train(processor.product_features());
//!
//! let behavioral = collaborative.recommend("u1", 3)?;
//! let attribute = content.recommend(&profile, &purchased, 3)?;
//! ```

use thiserror::Error;

// Public modules
pub mod collaborative;
pub mod content;
pub mod similarity;

// Re-export commonly used types
pub use collaborative::{CollaborativeFilter, NEIGHBOR_POOL_SIZE};
pub use content::ContentFilter;
pub use similarity::{cosine, cosine_similarity_matrix};

/// Internal faults a recommender can report.
///
/// An empty recommendation list is not an error; this type covers the
/// cases where the recommender could not even evaluate the query.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum RecommendError {
    /// `recommend` was called before any `train`
    #[error("recommender has not been trained")]
    NotTrained,
}
