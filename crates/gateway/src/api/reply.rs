//! `POST /`: generate a reply for an inbound email.

use axum::extract::rejection::JsonRejection;
use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Deserialize;

use rd_domain::error::GenerationError;

use crate::state::AppState;

pub const MISSING_EMAIL: &str = "Missing email content";

#[derive(Deserialize)]
pub struct ReplyRequest {
    #[serde(default)]
    email: Option<serde_json::Value>,
}

impl ReplyRequest {
    /// The email body, if it is a string with visible content.
    fn email(&self) -> Option<&str> {
        self.email
            .as_ref()
            .and_then(|v| v.as_str())
            .filter(|s| !s.trim().is_empty())
    }
}

/// Build a standardized JSON error response: `{ "error": "<message>" }`.
fn api_error(status: StatusCode, message: impl Into<String>) -> Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

pub async fn reply(
    State(state): State<AppState>,
    body: Result<Json<ReplyRequest>, JsonRejection>,
) -> Response {
    let req = match body {
        Ok(Json(req)) => req,
        Err(rejection) => {
            tracing::debug!(error = %rejection, "rejected reply request body");
            return api_error(StatusCode::BAD_REQUEST, MISSING_EMAIL);
        }
    };
    let Some(email) = req.email() else {
        return api_error(StatusCode::BAD_REQUEST, MISSING_EMAIL);
    };

    match state.replies.generate_reply(email).await {
        Ok(reply) => Json(serde_json::json!({ "reply": reply })).into_response(),
        // Cause already logged by the generator.
        Err(_) => api_error(StatusCode::INTERNAL_SERVER_ERROR, GenerationError::MESSAGE),
    }
}
