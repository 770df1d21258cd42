//! Notepad HTTP handlers.
//!
//! Every handler resolves the acting user first and only touches that
//! user's notepads. Storage calls run on the blocking pool.

use crate::error::ApiError;
use crate::identity::CurrentUser;
use crate::payload::{DraftPayload, ResponseFormat};
use crate::render;
use crate::AppState;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::Json;
use log::debug;
use notepad_core::{NotepadId, NotepadService, SqliteNotepadRepository};
use serde_json::json;

pub const LIST_PATH: &str = "/notepad";

pub async fn health_check() -> impl IntoResponse {
    Json(json!({
        "status": notepad_core::ping(),
        "version": notepad_core::core_version(),
    }))
}

pub async fn list_notepads(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let notepads = with_service(&state, move |service| {
        Ok(service.list_notepads(owner)?)
    })
    .await?;

    Ok(match ResponseFormat::from_headers(&headers) {
        ResponseFormat::Json => Json(json!({ "notepads": notepads })).into_response(),
        ResponseFormat::Html => Html(render::list_page(&notepads)).into_response(),
    })
}

pub async fn create_form(CurrentUser(_owner): CurrentUser) -> Html<String> {
    Html(render::create_form_page())
}

pub async fn create_notepad(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    payload: DraftPayload,
) -> Result<Response, ApiError> {
    let DraftPayload { draft, format } = payload;
    let created = with_service(&state, move |service| {
        Ok(service.create_notepad(owner, &draft)?)
    })
    .await?;

    Ok(match format {
        ResponseFormat::Json => (StatusCode::CREATED, Json(created)).into_response(),
        ResponseFormat::Html => Redirect::to(LIST_PATH).into_response(),
    })
}

pub async fn show_notepad(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let id = parse_notepad_id(&raw_id)?;
    let notepad = with_service(&state, move |service| {
        service.get_notepad(owner, id)?.ok_or(ApiError::NotFound)
    })
    .await?;

    Ok(match ResponseFormat::from_headers(&headers) {
        ResponseFormat::Json => Json(notepad).into_response(),
        ResponseFormat::Html => Html(render::detail_page(&notepad)).into_response(),
    })
}

pub async fn edit_form(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(raw_id): Path<String>,
) -> Result<Html<String>, ApiError> {
    let id = parse_notepad_id(&raw_id)?;
    let notepad = with_service(&state, move |service| {
        service.get_notepad(owner, id)?.ok_or(ApiError::NotFound)
    })
    .await?;
    Ok(Html(render::edit_form_page(&notepad)))
}

pub async fn edit_notepad(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(raw_id): Path<String>,
    payload: DraftPayload,
) -> Result<Response, ApiError> {
    let id = parse_notepad_id(&raw_id)?;
    let DraftPayload { draft, format } = payload;
    let updated = with_service(&state, move |service| {
        Ok(service.update_notepad(owner, id, &draft)?)
    })
    .await?;

    Ok(match format {
        ResponseFormat::Json => Json(updated).into_response(),
        ResponseFormat::Html => {
            Redirect::to(&format!("{LIST_PATH}/{}", updated.id)).into_response()
        }
    })
}

pub async fn delete_notepad(
    State(state): State<AppState>,
    CurrentUser(owner): CurrentUser,
    Path(raw_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    let format = ResponseFormat::from_headers(&headers);
    // An unparseable id cannot name a stored notepad, so there is nothing to
    // remove; deletion stays idempotent for the caller.
    if let Ok(id) = parse_notepad_id(&raw_id) {
        with_service(&state, move |service| Ok(service.delete_notepad(owner, id)?)).await?;
    }

    Ok(match format {
        ResponseFormat::Json => StatusCode::NO_CONTENT.into_response(),
        ResponseFormat::Html => Redirect::to(LIST_PATH).into_response(),
    })
}

fn parse_notepad_id(raw: &str) -> Result<NotepadId, ApiError> {
    NotepadId::parse_str(raw).map_err(|_| {
        debug!("event=notepad_id_parse module=http status=rejected");
        ApiError::NotFound
    })
}

/// Runs `op` against a service bound to the shared connection, off the
/// async executor.
async fn with_service<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&NotepadService<SqliteNotepadRepository<'_>>) -> Result<T, ApiError>
        + Send
        + 'static,
{
    let db = state.db.clone();
    tokio::task::spawn_blocking(move || {
        let conn = db
            .lock()
            .map_err(|_| ApiError::Internal("database mutex poisoned".to_string()))?;
        let service = NotepadService::new(SqliteNotepadRepository::try_new(&conn)?);
        op(&service)
    })
    .await
    .map_err(|err| ApiError::Internal(format!("storage task failed: {err}")))?
}
