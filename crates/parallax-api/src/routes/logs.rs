use axum::{
    extract::{Path, State},
    Json,
};
use parallax_persist::ConversationLog;
use serde::Serialize;
use std::sync::Arc;

use crate::{error::ApiResult, state::AppState};

#[derive(Debug, Serialize)]
pub struct LogDatesResponse {
    pub dates: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LogEntriesResponse {
    pub date: String,
    pub logs: Vec<ConversationLog>,
}

/// Dates that have conversation logs, newest first
pub async fn list_log_dates(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<LogDatesResponse>> {
    let dates = state.persist.logs().list_dates().await?;
    Ok(Json(LogDatesResponse { dates }))
}

pub async fn list_logs(
    State(state): State<Arc<AppState>>,
    Path(date): Path<String>,
) -> ApiResult<Json<LogEntriesResponse>> {
    let logs = state.persist.logs().list(&date).await?;
    Ok(Json(LogEntriesResponse { date, logs }))
}
