//! HTTP surface.
//!
//! JSON API Endpoints:
//! - `GET  /api/products`  - full catalog, catalog order
//! - `GET  /api/health`    - liveness probe
//! - `POST /api/recommend` - free-text preference to recommended products
//!
//! When `server.static_dir` is configured the client bundle is served at `/`;
//! API routes always win.

use std::path::Path;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::services::ServeDir;
use tracing::{error, info, warn};
use uuid::Uuid;

use shelfwise_agent::runtime::RecommendationRuntime;
use shelfwise_core::domain::product::Product;
use shelfwise_core::reconcile::{ParseMode, ReconcileOutcome};

#[derive(Clone)]
pub struct ApiState {
    pub runtime: Arc<RecommendationRuntime>,
}

// ---------------------------------------------------------------------------
// Request / Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct RecommendRequest {
    #[serde(rename = "userInput", default)]
    pub user_input: String,
}

#[derive(Debug, Serialize)]
pub struct RecommendResponse {
    pub products: Vec<Product>,
    pub message: String,
    #[serde(rename = "aiResponse")]
    pub ai_response: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub message: &'static str,
}

// ---------------------------------------------------------------------------
// Router
// ---------------------------------------------------------------------------

pub fn router(state: ApiState, static_dir: Option<&Path>) -> Router {
    let router = Router::new()
        .route("/api/products", get(list_products))
        .route("/api/health", get(health))
        .route("/api/recommend", post(recommend))
        .with_state(state);

    match static_dir {
        Some(dir) => router.fallback_service(ServeDir::new(dir)),
        None => router,
    }
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

pub async fn list_products(State(state): State<ApiState>) -> Json<Vec<Product>> {
    Json(state.runtime.catalog().all().to_vec())
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "OK", message: "Server is running" })
}

pub async fn recommend(
    State(state): State<ApiState>,
    Json(body): Json<RecommendRequest>,
) -> Result<Json<RecommendResponse>, (StatusCode, Json<ApiError>)> {
    let correlation_id = Uuid::new_v4().simple().to_string();

    let user_input = body.user_input.trim();
    if user_input.is_empty() {
        warn!(
            event_name = "recommend.input_missing",
            correlation_id = %correlation_id,
            "recommendation requested without user input"
        );
        return Err((
            StatusCode::BAD_REQUEST,
            Json(ApiError { error: "User input is required".to_string(), details: None }),
        ));
    }

    info!(
        event_name = "recommend.request_received",
        correlation_id = %correlation_id,
        user_input = %user_input,
        "recommendation requested"
    );

    match state.runtime.recommend(user_input).await {
        Ok(recommendation) => {
            if recommendation.parse_mode != ParseMode::Json {
                warn!(
                    event_name = "recommend.parse_degraded",
                    correlation_id = %correlation_id,
                    parse_mode = ?recommendation.parse_mode,
                    ai_response = %recommendation.ai_response,
                    "advisor response was not a strict JSON id array"
                );
            }
            if recommendation.outcome != ReconcileOutcome::Validated {
                info!(
                    event_name = "recommend.fallback_applied",
                    correlation_id = %correlation_id,
                    outcome = ?recommendation.outcome,
                    "advisor candidates failed validation, fallback applied"
                );
            }
            info!(
                event_name = "recommend.resolved",
                correlation_id = %correlation_id,
                category = recommendation.category.map(|category| category.as_str()),
                result_count = recommendation.products.len(),
                "recommendation resolved"
            );

            Ok(Json(RecommendResponse {
                products: recommendation.products,
                message: recommendation.message,
                ai_response: recommendation.ai_response,
            }))
        }
        Err(advisor_error) => {
            error!(
                event_name = "recommend.advisor_failed",
                correlation_id = %correlation_id,
                error = %advisor_error,
                "advisor call failed"
            );
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "Failed to get recommendations".to_string(),
                    details: Some(advisor_error.to_string()),
                }),
            ))
        }
    }
}
