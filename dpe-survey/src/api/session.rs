//! Session lifecycle handlers

use axum::extract::{Path, State};
use axum::http::HeaderMap;
use axum::Json;
use serde::Deserialize;
use tracing::info;
use uuid::Uuid;

use super::survey::ensure_active_sample;
use super::{ApiError, SessionView};
use crate::ipinfo;
use crate::session::{Reviewer, Session};
use crate::AppState;

/// Reviewer fields accepted at session creation
///
/// All fields are optional; the survey works for raters who leave the form
/// blank. `ip` carries the page's best-effort public-IP lookup result.
#[derive(Debug, Default, Deserialize)]
pub struct CreateSessionRequest {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub ip: Option<String>,
}

/// Reviewer fields accepted on update (identifier is immutable)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateReviewerRequest {
    #[serde(default)]
    pub age: String,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub background: Option<String>,
    #[serde(default)]
    pub email: String,
}

/// POST /api/session
///
/// Create a survey session, resolve the reviewer identifier, and pick the
/// first sample.
pub async fn create_session(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Option<Json<CreateSessionRequest>>,
) -> Result<Json<SessionView>, ApiError> {
    let Json(request) = body.unwrap_or_default();

    let identifier = ipinfo::resolve_identifier(
        request.ip.as_deref(),
        &headers,
        dpe_common::time::now_ms(),
    );

    let reviewer = Reviewer {
        age: request.age,
        gender: or_unspecified(request.gender),
        background: or_unspecified(request.background),
        email: request.email,
        identifier,
    };

    let id = Uuid::new_v4();
    let mut session = Session::new(id, reviewer);
    ensure_active_sample(&mut session, &state.catalog);

    let view = SessionView::build(&session, &state.catalog);
    state.sessions.write().await.insert(id, session);
    info!("Created survey session {}", id);

    Ok(Json(view))
}

/// GET /api/session/:id
///
/// Full view state for a re-render pass.
pub async fn get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    session_view(&state, id).await
}

/// PUT /api/session/:id/reviewer
///
/// Update reviewer metadata; the resolved identifier is kept.
pub async fn update_reviewer(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateReviewerRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    session.reviewer.age = request.age;
    session.reviewer.gender = or_unspecified(request.gender);
    session.reviewer.background = or_unspecified(request.background);
    session.reviewer.email = request.email;

    Ok(Json(SessionView::build(session, &state.catalog)))
}

/// Shared lookup: view state for a session id
pub(crate) async fn session_view(
    state: &AppState,
    id: Uuid,
) -> Result<Json<SessionView>, ApiError> {
    let sessions = state.sessions.read().await;
    let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
    Ok(Json(SessionView::build(session, &state.catalog)))
}

pub(crate) fn session_not_found(id: Uuid) -> ApiError {
    ApiError::NotFound(format!("Session not found: {}", id))
}

/// Radio-button fields fall back to the "Rather not say" default
fn or_unspecified(value: Option<String>) -> String {
    match value {
        Some(v) if !v.is_empty() => v,
        _ => "Rather not say".to_string(),
    }
}
