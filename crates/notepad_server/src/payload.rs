//! Request body decoding and response format selection.
//!
//! Create and edit accept either JSON or an urlencoded form. The body kind
//! also decides the success response: JSON in, JSON out; form in, redirect
//! out.

use crate::error::ApiError;
use axum::extract::{FromRequest, Request};
use axum::http::header::{ACCEPT, CONTENT_TYPE};
use axum::http::HeaderMap;
use axum::{Form, Json};
use notepad_core::NotepadDraft;

const JSON_MIME: &str = "application/json";

/// How the caller wants to be answered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseFormat {
    Html,
    Json,
}

impl ResponseFormat {
    /// JSON when the request body or the `Accept` header asks for it.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if header_mentions_json(headers, CONTENT_TYPE.as_str())
            || header_mentions_json(headers, ACCEPT.as_str())
        {
            Self::Json
        } else {
            Self::Html
        }
    }
}

/// A create/edit draft together with the format it arrived in.
#[derive(Debug, Clone)]
pub struct DraftPayload {
    pub draft: NotepadDraft,
    pub format: ResponseFormat,
}

impl<S> FromRequest<S> for DraftPayload
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let format = ResponseFormat::from_headers(req.headers());
        if header_mentions_json(req.headers(), CONTENT_TYPE.as_str()) {
            let Json(draft) = Json::<NotepadDraft>::from_request(req, state)
                .await
                .map_err(|rejection| ApiError::BadPayload(rejection.body_text()))?;
            return Ok(Self { draft, format });
        }

        let Form(draft) = Form::<NotepadDraft>::from_request(req, state)
            .await
            .map_err(|rejection| ApiError::BadPayload(rejection.body_text()))?;
        Ok(Self { draft, format })
    }
}

fn header_mentions_json(headers: &HeaderMap, name: &str) -> bool {
    headers
        .get(name)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.to_ascii_lowercase().contains(JSON_MIME))
}
