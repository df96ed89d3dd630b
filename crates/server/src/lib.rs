//! Server crate for the hybrid product recommendation engine.
//!
//! This crate contains the orchestrator that coordinates the pipeline,
//! the environment configuration, and the HTTP query surface.

pub mod api;
pub mod config;
pub mod orchestrator;

pub use api::{router, AppState, RecommendationResponse};
pub use config::Config;
pub use orchestrator::HybridRecommender;
