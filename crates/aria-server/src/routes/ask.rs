//! POST /ask

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::post;
use axum::{Json, Router};
use tracing::debug;

use aria_chat::AskRequest;

use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/ask", post(ask))
}

/// Answers are always `{answer, source}`; an `error` source is sent as 500.
///
/// A body that is not a JSON object with a string `question` gets the same
/// 400 as a blank question.
async fn ask(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            debug!("Rejected /ask body: {}", rejection);
            AskRequest::default()
        }
    };
    let question = match req.question.as_deref().map(str::trim) {
        Some(q) if !q.is_empty() => q,
        _ => {
            return (
                StatusCode::BAD_REQUEST,
                Json(serde_json::json!({ "error": "Question is required" })),
            )
                .into_response();
        }
    };

    let response = state.assistant.ask(question).await;
    let status = if response.is_error() {
        StatusCode::INTERNAL_SERVER_ERROR
    } else {
        StatusCode::OK
    };
    (status, Json(response)).into_response()
}
