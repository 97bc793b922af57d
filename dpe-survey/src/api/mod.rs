//! HTTP API handlers for dpe-survey
//!
//! All survey state mutation happens here: each endpoint is an explicit
//! command against one session, and the page re-renders from the view state
//! every handler returns.

pub mod health;
pub mod session;
pub mod survey;
pub mod ui;
pub mod view;

pub use health::health_routes;
pub use session::{create_session, get_session, update_reviewer};
pub use survey::{get_audio, next_sample, select_option, set_genre, submit};
pub use ui::{serve_app_js, serve_index};
pub use view::SessionView;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde_json::json;

/// API errors mapped to JSON `{error}` responses
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        let body = Json(json!({
            "error": message,
        }));

        (status, body).into_response()
    }
}

impl From<crate::Error> for ApiError {
    fn from(err: crate::Error) -> Self {
        ApiError::Internal(err.to_string())
    }
}
