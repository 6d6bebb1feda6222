use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parallax_persist::{ApiEntry, ApiEntryUpdate, NewApiEntry};
use serde::Serialize;
use std::sync::Arc;

use crate::{error::ApiResult, extract::ApiJson, state::AppState};

/// API entry as returned over HTTP: the key is masked
#[derive(Debug, Serialize)]
pub struct ApiEntryView {
    pub id: String,
    pub name: String,
    pub provider: String,
    pub key: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub active: bool,
}

impl From<ApiEntry> for ApiEntryView {
    fn from(entry: ApiEntry) -> Self {
        Self {
            key: entry.masked_key(),
            id: entry.id,
            name: entry.name,
            provider: entry.provider,
            url: entry.url,
            active: entry.active,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListApisResponse {
    pub apis: Vec<ApiEntryView>,
}

pub async fn list_apis(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListApisResponse>> {
    let apis = state.persist.apis().list().await?;
    Ok(Json(ListApisResponse {
        apis: apis.into_iter().map(ApiEntryView::from).collect(),
    }))
}

pub async fn add_api(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NewApiEntry>,
) -> ApiResult<(StatusCode, Json<ApiEntryView>)> {
    let entry = state.persist.apis().add(req).await?;
    state.reload_providers().await?;
    Ok((StatusCode::CREATED, Json(entry.into())))
}

/// Update an entry; `{"active": false}` toggles it off
pub async fn update_api(
    State(state): State<Arc<AppState>>,
    Path(api_id): Path<String>,
    ApiJson(req): ApiJson<ApiEntryUpdate>,
) -> ApiResult<Json<ApiEntryView>> {
    let entry = state.persist.apis().update(&api_id, req).await?;
    state.reload_providers().await?;
    Ok(Json(entry.into()))
}

pub async fn delete_api(
    State(state): State<Arc<AppState>>,
    Path(api_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.apis().delete(&api_id).await?;
    state.reload_providers().await?;
    Ok(StatusCode::NO_CONTENT)
}
