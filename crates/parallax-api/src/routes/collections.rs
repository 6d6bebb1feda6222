use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parallax_persist::Collection;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, extract::ApiJson, state::AppState};

#[derive(Debug, Deserialize)]
pub struct CollectionRequest {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddPromptRequest {
    #[serde(default)]
    pub prompt_id: String,
}

#[derive(Debug, Serialize)]
pub struct ListCollectionsResponse {
    pub collections: Vec<Collection>,
}

pub async fn list_collections(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListCollectionsResponse>> {
    let collections = state.persist.collections().list().await?;
    Ok(Json(ListCollectionsResponse { collections }))
}

pub async fn create_collection(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CollectionRequest>,
) -> ApiResult<(StatusCode, Json<Collection>)> {
    let collection = state.persist.collections().create(&req.name).await?;
    Ok((StatusCode::CREATED, Json(collection)))
}

pub async fn get_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
) -> ApiResult<Json<Collection>> {
    Ok(Json(state.persist.collections().get(&collection_id).await?))
}

/// Rename a collection
pub async fn update_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    ApiJson(req): ApiJson<CollectionRequest>,
) -> ApiResult<Json<Collection>> {
    let collection = state
        .persist
        .collections()
        .rename(&collection_id, &req.name)
        .await?;
    Ok(Json(collection))
}

pub async fn delete_collection(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.collections().delete(&collection_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_prompt(
    State(state): State<Arc<AppState>>,
    Path(collection_id): Path<String>,
    ApiJson(req): ApiJson<AddPromptRequest>,
) -> ApiResult<Json<Collection>> {
    let collection = state
        .persist
        .collections()
        .add_prompt(&collection_id, &req.prompt_id)
        .await?;
    Ok(Json(collection))
}

pub async fn remove_prompt(
    State(state): State<Arc<AppState>>,
    Path((collection_id, prompt_id)): Path<(String, String)>,
) -> ApiResult<Json<Collection>> {
    let collection = state
        .persist
        .collections()
        .remove_prompt(&collection_id, &prompt_id)
        .await?;
    Ok(Json(collection))
}
