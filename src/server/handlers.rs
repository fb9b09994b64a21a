//! Route handlers

use axum::extract::multipart::{MultipartError, MultipartRejection};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Multipart, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use chrono::{SecondsFormat, Utc};
use serde::Deserialize;
use serde_json::{json, Value};
use tracing::{debug, info, warn};

use crate::analytics::{summarize_store, AnalyticsSummary};
use crate::errors::AppError;
use crate::feedback::FeedbackSubmission;
use crate::server::error::ApiError;
use crate::server::AppState;
use crate::training::export_training_data;
use crate::vision::{ImageUpload, UploadLimits};

/// Multipart field carrying the image
const IMAGE_FIELD: &str = "image";

/// Returned for JSON bodies that fail to parse; parser detail is only logged
const INVALID_BODY: &str = "Invalid request body";

fn json_rejection(rejection: JsonRejection) -> ApiError {
    warn!(reason = %rejection.body_text(), "rejected request body");
    ApiError::bad_request(INVALID_BODY)
}

pub async fn health_handler(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "timestamp": Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        "hasOpenAI": state.has_openai,
    }))
}

pub async fn submit_feedback_handler(
    State(state): State<AppState>,
    body: Result<Json<FeedbackSubmission>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    const GENERIC: &str = "Failed to save feedback";

    let Json(submission) = body.map_err(json_rejection)?;
    let input = submission
        .into_input()
        .map_err(|e| ApiError::from_app(e, GENERIC))?;

    let record = state
        .store
        .append(input)
        .await
        .map_err(|e| ApiError::from_app(e, GENERIC))?;
    info!(id = %record.id, rating = record.rating, "feedback saved");

    Ok(Json(json!({ "success": true, "message": "Feedback saved successfully" })))
}

pub async fn analytics_handler(State(state): State<AppState>) -> Json<AnalyticsSummary> {
    Json(summarize_store(&state.store).await)
}

pub async fn generate_training_data_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    const GENERIC: &str = "Failed to generate training data";

    let records = state
        .store
        .read_all()
        .await
        .map_err(|e| ApiError::from_app(e, GENERIC))?;
    let export = export_training_data(&records).map_err(|e| ApiError::from_app(e, GENERIC))?;
    export
        .write_to(&state.export_path)
        .await
        .map_err(|e| ApiError::from_app(e, GENERIC))?;

    let count = export.count();
    Ok(Json(json!({
        "success": true,
        "message": format!("Generated {} training examples", count),
        "count": count,
    })))
}

pub async fn generate_alt_text_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    const GENERIC: &str = "Failed to generate alt text. Please try again.";

    let multipart = multipart.map_err(|_| ApiError::bad_request("No image file provided"))?;

    let image = read_image_field(multipart, &state)
        .await
        .map_err(|e| ApiError::from_app(e, GENERIC))?;
    debug!(mime = image.mime_type(), bytes = image.len(), provider = state.provider.name(), "generating alt text");

    let alt_text = state
        .provider
        .generate(&image)
        .await
        .map_err(|e| ApiError::from_app(e, GENERIC))?;

    Ok(Json(json!({ "altText": alt_text })))
}

/// Pull the `image` field out of the form and validate it
async fn read_image_field(mut multipart: Multipart, state: &AppState) -> Result<ImageUpload, AppError> {
    let limits = state.upload_limits;
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| multipart_error(e, limits))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let mime_type = field.content_type().unwrap_or_default().to_string();
        if !mime_type.starts_with("image/") {
            return Err(AppError::Validation("Only image files are allowed!".to_string()));
        }

        let data = field.bytes().await.map_err(|e| multipart_error(e, limits))?;
        return ImageUpload::validate(&mime_type, data, limits);
    }

    Err(AppError::Validation("No image file provided".to_string()))
}

fn multipart_error(err: MultipartError, limits: UploadLimits) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        limits.too_large()
    } else {
        warn!(reason = %err.body_text(), "malformed multipart upload");
        AppError::Validation("Invalid upload".to_string())
    }
}

pub async fn generate_complete_training_data_handler(
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let report = state
        .fine_tuning
        .generate_complete_training_data()
        .await
        .map_err(|e| ApiError::from_app(e, "Failed to generate training data"))?;

    Ok(Json(json!({
        "success": true,
        "totalExamples": report.total_examples,
        "baseExamples": report.base_examples,
        "feedbackExamples": report.feedback_examples,
    })))
}

pub async fn create_fine_tune_handler(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    let summary = state
        .fine_tuning
        .create_fine_tuned_model()
        .await
        .map_err(|e| ApiError::from_app_upstream(e, "Failed to create fine-tuning job"))?;
    Ok(Json(summary))
}

pub async fn fine_tune_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let status = state
        .fine_tuning
        .check_fine_tuning_status(&job_id)
        .await
        .map_err(|e| ApiError::from_app_upstream(e, "Failed to check fine-tuning status"))?;
    Ok(Json(status))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FineTunedGenerateRequest {
    pub image_description: String,
}

pub async fn fine_tuned_generate_handler(
    State(state): State<AppState>,
    body: Result<Json<FineTunedGenerateRequest>, JsonRejection>,
) -> Result<Json<Value>, ApiError> {
    let Json(request) = body.map_err(json_rejection)?;
    let alt_text = state
        .fine_tuning
        .generate_with_fine_tuned_model(&request.image_description)
        .await
        .map_err(|e| ApiError::from_app_upstream(e, "Failed to generate alt text"))?;

    Ok(Json(json!({ "altText": alt_text })))
}

pub async fn not_found_handler() -> ApiError {
    ApiError::not_found()
}
