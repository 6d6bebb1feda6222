pub mod health;
pub mod chat;
pub mod threads;
pub mod prompts;
pub mod collections;
pub mod apis;
pub mod logs;

use crate::error::{ApiError, ApiResult};

/// Trimmed prompt and the non-empty model ids, or 400
pub(crate) fn validate_turn(prompt: &str, models: &[String]) -> ApiResult<Vec<String>> {
    if prompt.trim().is_empty() {
        return Err(ApiError::BadRequest("prompt is required".to_string()));
    }
    let models: Vec<String> = models
        .iter()
        .map(|m| m.trim())
        .filter(|m| !m.is_empty())
        .map(str::to_string)
        .collect();
    if models.is_empty() {
        return Err(ApiError::BadRequest("at least one model is required".to_string()));
    }
    Ok(models)
}
