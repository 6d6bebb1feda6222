use thiserror::Error;

#[derive(Error, Debug)]
pub enum PersistError {
    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
    
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),
    
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    
    #[error("Validation error: {0}")]
    Validation(String),
    
    #[error("Invalid id: {0}")]
    InvalidId(String),
}

impl PersistError {
    pub fn not_found(kind: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound { kind, id: id.into() }
    }
    
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, PersistError>;
