use crate::error::{AppError, Result};
use crate::handlers::parse_short_id;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::header::{HeaderName, LOCATION, REFERER, USER_AGENT};
use axum::http::{HeaderMap, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use linkpulse_redirector::VisitRequest;
use tracing::trace;

fn header_str(headers: &HeaderMap, name: HeaderName) -> Option<&str> {
    headers.get(name).and_then(|value| value.to_str().ok())
}

/// Records the visit, then answers `307 Temporary Redirect`.
///
/// The redirect is temporary so that clients come back through here on every
/// visit instead of caching the target.
pub async fn redirect_handler(
    State(state): State<AppState>,
    Path(short_id): Path<String>,
    headers: HeaderMap,
) -> Result<Response> {
    let id = parse_short_id(short_id)?;
    let request = VisitRequest::new(
        header_str(&headers, USER_AGENT).unwrap_or_default(),
        header_str(&headers, REFERER).map(str::to_string),
    );
    trace!(short_id = %id, "resolving redirect");

    let target = state.recorder().record_visit(&id, request).await?;
    let location = HeaderValue::try_from(target.long_url.as_str()).map_err(|e| {
        AppError::Internal(format!("target of {id} is not a valid Location: {e}"))
    })?;

    Ok((StatusCode::TEMPORARY_REDIRECT, [(LOCATION, location)]).into_response())
}
