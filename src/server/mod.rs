//! HTTP API
//!
//! axum router over the feedback store, analytics, exporters, the alt text
//! provider and the fine-tuning manager.

pub mod error;
pub mod handlers;

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::feedback::FeedbackStore;
use crate::finetune::FineTuningManager;
use crate::vision::{AltTextProvider, UploadLimits};

pub use error::ApiError;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<FeedbackStore>,
    pub provider: Arc<dyn AltTextProvider>,
    pub fine_tuning: Arc<FineTuningManager>,
    pub upload_limits: UploadLimits,
    /// Target of the feedback-only training export
    pub export_path: PathBuf,
    pub has_openai: bool,
}

/// Build the application router
pub fn build_router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/api/feedback", post(handlers::submit_feedback_handler))
        .route("/api/generate-alt-text", post(handlers::generate_alt_text_handler))
        .route("/api/admin/analytics", get(handlers::analytics_handler))
        .route(
            "/api/admin/generate-training-data",
            post(handlers::generate_training_data_handler),
        )
        .route(
            "/api/admin/generate-complete-training-data",
            post(handlers::generate_complete_training_data_handler),
        )
        .route("/api/admin/fine-tune", post(handlers::create_fine_tune_handler))
        .route(
            "/api/admin/fine-tune/:job_id",
            get(handlers::fine_tune_status_handler),
        )
        .route(
            "/api/admin/fine-tuned/generate",
            post(handlers::fine_tuned_generate_handler),
        )
        .fallback(handlers::not_found_handler)
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
