use axum::{extract::State, Json};
use parallax_persist::ConversationLog;
use parallax_types::{ModelResponse, ThreadMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{error::ApiResult, extract::ApiJson, routes::validate_turn, state::AppState};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompareRequest {
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub previous_messages: Vec<ThreadMessage>,
}

#[derive(Debug, Serialize)]
pub struct CompareResponse {
    pub responses: Vec<ModelResponse>,
}

/// Stateless comparison: send one prompt to every model, nothing is stored
/// except the conversation log
pub async fn compare(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<CompareRequest>,
) -> ApiResult<Json<CompareResponse>> {
    let models = validate_turn(&req.prompt, &req.models)?;
    
    let responses = state
        .dispatcher()
        .await
        .dispatch(&req.prompt, &models, &req.previous_messages)
        .await;
    
    state
        .persist
        .logs()
        .record(&ConversationLog::new(None, req.prompt, models, responses.clone()))
        .await;
    
    Ok(Json(CompareResponse { responses }))
}
