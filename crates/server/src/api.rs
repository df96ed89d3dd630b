//! HTTP query surface for the recommendation pipeline.
//!
//! One route: `GET /api/recommendations/{user_id}`. Each request runs the
//! full fetch → validate → train → recommend cycle against the current
//! upstream snapshot.
//!
//! Failure outcomes are kept distinct at the boundary:
//! - upstream unreachable → 503
//! - payload fails validation → 400
//! - training fails internally → 500
//!
//! All failure bodies carry `success: false` and an empty recommendation
//! list.

use crate::config::Config;
use crate::orchestrator::HybridRecommender;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::Serialize;
use snapshot_client::{SnapshotClient, SnapshotError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{error, info};

/// Shared state behind the router.
///
/// The orchestrator sits behind a Mutex: the pipeline is synchronous and
/// single-flight by design, so concurrent requests serialize on it.
pub struct AppState {
    recommender: Mutex<HybridRecommender>,
    client: SnapshotClient,
    config: Config,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        let client = SnapshotClient::new(&config.base_url);
        let recommender = if config.snapshot_cache {
            HybridRecommender::new().with_snapshot_cache()
        } else {
            HybridRecommender::new()
        };
        Self {
            recommender: Mutex::new(recommender),
            client,
            config,
        }
    }
}

/// Response body for the recommendation route.
#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub success: bool,
    pub message: String,
    pub recommendations: Vec<String>,
}

/// Build the application router.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/recommendations/:user_id", get(get_recommendations))
        .with_state(state)
}

async fn get_recommendations(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<String>,
) -> (StatusCode, Json<RecommendationResponse>) {
    let fetched = match state.client.fetch().await {
        Ok(fetched) => fetched,
        Err(SnapshotError::Upstream(e)) => {
            error!("upstream fetch failed: {}", e);
            return failure(
                StatusCode::SERVICE_UNAVAILABLE,
                "Error fetching data from upstream",
            );
        }
        Err(e @ SnapshotError::InvalidPayload(_)) => {
            error!("snapshot rejected: {}", e);
            return failure(StatusCode::BAD_REQUEST, "Invalid data received from upstream");
        }
    };

    let mut recommender = state.recommender.lock().await;
    let trained = if state.config.snapshot_cache {
        recommender.train_fingerprinted(&fetched.payload, fetched.fingerprint)
    } else {
        recommender.train(&fetched.payload)
    };
    if let Err(e) = trained {
        error!("training failed: {:#}", e);
        return failure(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error generating recommendations",
        );
    }

    let recommendations = recommender.recommend(&user_id, state.config.num_recommendations);
    info!(
        "returning {} recommendations for user {}",
        recommendations.len(),
        user_id
    );
    (
        StatusCode::OK,
        Json(RecommendationResponse {
            success: true,
            message: "Recommendations generated successfully".to_string(),
            recommendations,
        }),
    )
}

fn failure(status: StatusCode, message: &str) -> (StatusCode, Json<RecommendationResponse>) {
    (
        status,
        Json(RecommendationResponse {
            success: false,
            message: message.to_string(),
            recommendations: Vec::new(),
        }),
    )
}
