//! Survey command handlers: select, genre filter, submit, next, audio

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use tracing::{error, info, warn};
use uuid::Uuid;

use super::session::{session_not_found, session_view};
use super::{ApiError, SessionView};
use crate::catalog::{Catalog, ANY_GENRE};
use crate::record;
use crate::selector;
use crate::session::{Session, SubmitOutcome, STORAGE_FAILURE_STATUS};
use crate::survey::Question;
use crate::AppState;

/// Body of POST /api/session/:id/select
#[derive(Debug, Deserialize)]
pub struct SelectRequest {
    /// 1-based ordinal question id
    pub question: u8,
    /// Option index within the question's allowed responses
    pub option: u8,
}

/// Body of POST /api/session/:id/genre
#[derive(Debug, Deserialize)]
pub struct GenreRequest {
    pub genre: String,
}

/// POST /api/session/:id/select
///
/// Mark one response option active; any other option on the same question
/// is cleared. Ignored while inputs are disabled.
pub async fn select_option(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SelectRequest>,
) -> Result<Json<SessionView>, ApiError> {
    let question = Question::from_id(request.question)
        .ok_or_else(|| ApiError::BadRequest(format!("Unknown question id: {}", request.question)))?;
    if usize::from(request.option) >= question.option_count() {
        return Err(ApiError::BadRequest(format!(
            "Question {} has no option {}",
            request.question, request.option
        )));
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;
    session.select(question, request.option);

    Ok(Json(SessionView::build(session, &state.catalog)))
}

/// POST /api/session/:id/genre
///
/// Set the genre filter. A change while awaiting input clears the active
/// sample and picks a fresh one; after submission the filter takes effect on
/// the next advance.
pub async fn set_genre(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<GenreRequest>,
) -> Result<Json<SessionView>, ApiError> {
    if request.genre != ANY_GENRE && !state.catalog.genres().contains(&request.genre) {
        return Err(ApiError::BadRequest(format!(
            "Unknown genre: {}",
            request.genre
        )));
    }

    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    if session.set_genre_filter(request.genre) {
        ensure_active_sample(session, &state.catalog);
    }

    Ok(Json(SessionView::build(session, &state.catalog)))
}

/// POST /api/session/:id/submit
///
/// Submit the current ratings. On success the record is written to object
/// storage best-effort; a failed write only changes the status line.
pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let pending = {
        let mut sessions = state.sessions.write().await;
        let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

        match session.submit(dpe_common::time::now_ms()) {
            SubmitOutcome::Evaluated { record } => {
                let key = record::storage_key(
                    state.storage.key_prefix(),
                    &session.reviewer.identifier,
                    record.timestamp,
                );
                let body = record.to_json().map_err(ApiError::from)?;
                Some((key, body))
            }
            SubmitOutcome::NothingSelected
            | SubmitOutcome::NoActiveSample
            | SubmitOutcome::AlreadySubmitted => None,
        }
    };

    if let Some((key, body)) = pending {
        match state.storage.put_record(&key, body).await {
            Ok(()) => info!("Stored submission record: {}", key),
            Err(e) => {
                error!("Failed to store submission record {}: {}", key, e);
                let mut sessions = state.sessions.write().await;
                if let Some(session) = sessions.get_mut(&id) {
                    session.status = STORAGE_FAILURE_STATUS.to_string();
                }
            }
        }
    }

    session_view(&state, id).await
}

/// POST /api/session/:id/next
///
/// Advance to a fresh sample after a submission.
pub async fn next_sample(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionView>, ApiError> {
    let mut sessions = state.sessions.write().await;
    let session = sessions.get_mut(&id).ok_or_else(|| session_not_found(id))?;

    session.advance();
    ensure_active_sample(session, &state.catalog);

    Ok(Json(SessionView::build(session, &state.catalog)))
}

/// GET /api/session/:id/audio
///
/// Bytes of the active sample for playback.
pub async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, ApiError> {
    let path = {
        let sessions = state.sessions.read().await;
        let session = sessions.get(&id).ok_or_else(|| session_not_found(id))?;
        let sample = session
            .active_sample
            .as_ref()
            .ok_or_else(|| ApiError::NotFound("No active sample".to_string()))?;
        state.catalog.audio_path(sample)
    };

    let bytes = tokio::fs::read(&path).await.map_err(|e| {
        error!("Failed to read audio file {}: {}", path.display(), e);
        ApiError::from(crate::Error::Io(e))
    })?;

    Ok(([(header::CONTENT_TYPE, "audio/wav")], bytes).into_response())
}

/// Pick a sample when none is active
///
/// An empty filtered catalog is not fatal: the status line carries the
/// user-facing message and the session stays sample-less.
pub(crate) fn ensure_active_sample(session: &mut Session, catalog: &Catalog) {
    if session.active_sample.is_some() {
        return;
    }
    let mut rng = rand::thread_rng();
    match selector::pick(catalog.samples(), &session.genre_filter, &mut rng) {
        Ok(sample) => session.active_sample = Some(sample.clone()),
        Err(e) => {
            warn!("Sample selection failed for session {}: {}", session.id, e);
            session.status = e.to_string();
        }
    }
}
