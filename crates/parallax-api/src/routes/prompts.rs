use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use parallax_persist::{NewPrompt, Prompt, PromptUpdate};
use serde::Serialize;
use std::sync::Arc;

use crate::{error::ApiResult, extract::ApiJson, state::AppState};

#[derive(Debug, Serialize)]
pub struct ListPromptsResponse {
    pub prompts: Vec<Prompt>,
}

pub async fn list_prompts(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListPromptsResponse>> {
    let prompts = state.persist.prompts().list().await?;
    Ok(Json(ListPromptsResponse { prompts }))
}

pub async fn create_prompt(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<NewPrompt>,
) -> ApiResult<(StatusCode, Json<Prompt>)> {
    let prompt = state.persist.prompts().create(req).await?;
    Ok((StatusCode::CREATED, Json(prompt)))
}

pub async fn get_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<String>,
) -> ApiResult<Json<Prompt>> {
    Ok(Json(state.persist.prompts().get(&prompt_id).await?))
}

pub async fn update_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<String>,
    ApiJson(req): ApiJson<PromptUpdate>,
) -> ApiResult<Json<Prompt>> {
    Ok(Json(state.persist.prompts().update(&prompt_id, req).await?))
}

pub async fn delete_prompt(
    State(state): State<Arc<AppState>>,
    Path(prompt_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.prompts().delete(&prompt_id).await?;
    Ok(StatusCode::NO_CONTENT)
}
