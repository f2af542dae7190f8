//! POST /feedback

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::{debug, error};

use aria_chat::{FeedbackRequest, FeedbackResponse};
use aria_core::Error;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/feedback", post(submit_feedback))
}

async fn submit_feedback(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<FeedbackRequest>, JsonRejection>,
) -> Response {
    let message = match payload {
        Ok(Json(req)) => req.message.unwrap_or_default(),
        Err(rejection) => {
            debug!("Rejected /feedback body: {}", rejection);
            String::new()
        }
    };
    match state.assistant.submit_feedback(&message) {
        Ok(_) => Json(FeedbackResponse {
            success: true,
            message: "Thanks for your feedback!".into(),
        })
        .into_response(),
        Err(Error::Validation(msg)) => (
            StatusCode::BAD_REQUEST,
            Json(serde_json::json!({ "error": msg })),
        )
            .into_response(),
        Err(e) => {
            error!("Failed to save feedback: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Failed to save feedback" })),
            )
                .into_response()
        }
    }
}
