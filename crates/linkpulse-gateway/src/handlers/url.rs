use crate::error::{AppError, Result};
use crate::extract::OwnerId;
use crate::handlers::parse_short_id;
use crate::model::{CreateUrlRequest, CreateUrlResponse, LinkView, ListUrlsResponse};
use crate::state::AppState;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use linkpulse_core::ShortenParams;

pub async fn create_url_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    payload: std::result::Result<Json<CreateUrlRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreateUrlResponse>)> {
    let Json(request) = payload.map_err(|e| AppError::BadRequest(e.body_text()))?;

    let link = state
        .shortener()
        .shorten(ShortenParams {
            owner,
            long_url: request.long_url,
        })
        .await?;

    let short_url = state.short_url(&link.short_id);
    Ok((
        StatusCode::CREATED,
        Json(CreateUrlResponse::new(link, short_url)),
    ))
}

pub async fn list_urls_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
) -> Result<Json<ListUrlsResponse>> {
    let urls = state
        .shortener()
        .list(&owner)
        .await?
        .into_iter()
        .map(|link| {
            let short_url = state.short_url(&link.short_id);
            LinkView::new(link, short_url)
        })
        .collect();

    Ok(Json(ListUrlsResponse { urls }))
}

pub async fn get_url_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Path(short_id): Path<String>,
) -> Result<Json<LinkView>> {
    let id = parse_short_id(short_id)?;
    let link = state.shortener().get(&owner, &id).await?;

    let short_url = state.short_url(&link.short_id);
    Ok(Json(LinkView::new(link, short_url)))
}

pub async fn delete_url_handler(
    State(state): State<AppState>,
    OwnerId(owner): OwnerId,
    Path(short_id): Path<String>,
) -> Result<StatusCode> {
    let id = parse_short_id(short_id)?;
    state.shortener().delete(&owner, &id).await?;

    Ok(StatusCode::NO_CONTENT)
}
