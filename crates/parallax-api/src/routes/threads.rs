use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use parallax_persist::{filter_for_model, ConversationLog, ThreadReconciler};
use parallax_types::{ModelResponse, Thread, ThreadMessage};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::{
    error::{ApiError, ApiResult},
    extract::{ApiJson, OptionalJson},
    routes::validate_turn,
    state::AppState,
};

#[derive(Debug, Default, Deserialize)]
pub struct CreateThreadRequest {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub models: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ListThreadsResponse {
    pub threads: Vec<Thread>,
}

#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    #[serde(default)]
    pub model: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub thread_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    pub messages: Vec<ThreadMessage>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadChatRequest {
    #[serde(default)]
    pub thread_id: Option<String>,
    /// Id the server generated before the client adopted `thread_id`
    #[serde(default)]
    pub previous_thread_id: Option<String>,
    #[serde(default)]
    pub prompt: String,
    #[serde(default)]
    pub models: Vec<String>,
    #[serde(default)]
    pub previous_messages: Vec<ThreadMessage>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadChatResponse {
    pub thread_id: String,
    pub responses: Vec<ModelResponse>,
    pub messages: Vec<ThreadMessage>,
}

/// List every thread, most recently updated first
pub async fn list_threads(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<ListThreadsResponse>> {
    let threads = state.persist.threads().list_all().await?;
    Ok(Json(ListThreadsResponse { threads }))
}

/// Create a thread, generating an id when none is given
pub async fn create_thread(
    State(state): State<Arc<AppState>>,
    OptionalJson(req): OptionalJson<CreateThreadRequest>,
) -> ApiResult<(StatusCode, Json<Thread>)> {
    let thread_id = ThreadReconciler::resolve(req.id.as_deref());
    
    let threads = state.persist.threads();
    let mut thread = threads.get_or_create(&thread_id).await?;
    if !req.models.is_empty() {
        thread.add_models(&req.models);
        thread.touch();
        threads.save(&thread).await?;
    }
    
    Ok((StatusCode::CREATED, Json(thread)))
}

/// Delete every thread
pub async fn delete_all_threads(
    State(state): State<Arc<AppState>>,
) -> ApiResult<StatusCode> {
    let removed = state.persist.threads().delete_all().await?;
    tracing::info!(removed, "Deleted all threads");
    Ok(StatusCode::NO_CONTENT)
}

/// Get a specific thread by ID
pub async fn get_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<Thread>> {
    let thread = state.persist.threads().get(&thread_id).await?;
    Ok(Json(thread))
}

/// Delete a thread
pub async fn delete_thread(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<StatusCode> {
    state.persist.threads().delete(&thread_id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// History as one model sees it (`?model=`), or the full history
pub async fn thread_model_history(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<HistoryResponse>> {
    let thread = state.persist.threads().get(&thread_id).await?;
    let model = query.model.filter(|m| !m.trim().is_empty());
    let messages = match model.as_deref() {
        Some(model) => filter_for_model(&thread.messages, model),
        None => thread.messages,
    };
    
    Ok(Json(HistoryResponse {
        thread_id,
        model,
        messages,
    }))
}

/// Full stored history of a thread
pub async fn thread_history(
    State(state): State<Arc<AppState>>,
    Path(thread_id): Path<String>,
) -> ApiResult<Json<HistoryResponse>> {
    let thread = state
        .persist
        .threads()
        .find(&thread_id)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("thread not found: {}", thread_id)))?;
    
    Ok(Json(HistoryResponse {
        thread_id,
        model: None,
        messages: thread.messages,
    }))
}

/// Submit one turn of a threaded comparison
/// 
/// Resolves (and if needed migrates) the thread, sends the prompt to every
/// model with its own slice of the history, then stores the prompt and the
/// successful answers.
pub async fn thread_chat(
    State(state): State<Arc<AppState>>,
    ApiJson(req): ApiJson<ThreadChatRequest>,
) -> ApiResult<Json<ThreadChatResponse>> {
    let models = validate_turn(&req.prompt, &req.models)?;
    let reconciler = state.persist.reconciler();
    
    let turn = reconciler
        .prepare_turn(
            req.thread_id.as_deref(),
            req.previous_thread_id.as_deref(),
            &req.previous_messages,
        )
        .await?;
    
    let responses = state
        .dispatcher()
        .await
        .dispatch(&req.prompt, &models, &turn.history)
        .await;
    
    let thread = reconciler
        .save_turn(&turn.thread_id, &req.prompt, &responses, &models)
        .await?;
    
    tracing::info!(
        thread_id = %thread.id,
        models = models.len(),
        failed = responses.iter().filter(|r| r.is_error()).count(),
        "Thread turn saved"
    );
    
    state
        .persist
        .logs()
        .record(&ConversationLog::new(
            Some(thread.id.clone()),
            req.prompt,
            models,
            responses.clone(),
        ))
        .await;
    
    Ok(Json(ThreadChatResponse {
        thread_id: thread.id,
        responses,
        messages: thread.messages,
    }))
}
