use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use parallax_persist::PersistError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),
    
    #[error("Invalid request: {0}")]
    BadRequest(String),
    
    #[error("Persistence error: {0}")]
    Persist(PersistError),
}

impl From<PersistError> for ApiError {
    fn from(err: PersistError) -> Self {
        match err {
            PersistError::NotFound { .. } => ApiError::NotFound(err.to_string()),
            PersistError::Validation(msg) | PersistError::InvalidId(msg) => ApiError::BadRequest(msg),
            other => ApiError::Persist(other),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NotFound(_) => {
                (StatusCode::NOT_FOUND, self.to_string())
            }
            ApiError::BadRequest(_) => {
                (StatusCode::BAD_REQUEST, self.to_string())
            }
            ApiError::Persist(ref e) => {
                tracing::error!("Persistence error: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Storage error".to_string())
            }
        };
        
        let body = Json(json!({
            "error": message
        }));
        
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    
    #[test]
    fn test_persist_errors_map_to_status() {
        let cases = [
            (PersistError::not_found("thread", "t1"), StatusCode::NOT_FOUND),
            (PersistError::Validation("name is required".to_string()), StatusCode::BAD_REQUEST),
            (PersistError::InvalidId("..".to_string()), StatusCode::BAD_REQUEST),
            (
                PersistError::Storage(std::io::Error::new(std::io::ErrorKind::Other, "disk full")),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).into_response().status(), status);
        }
    }
}
