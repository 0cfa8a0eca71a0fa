use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("storage error: {0}")]
    Storage(String),
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ServiceError {
    pub fn storage(action: &str, path: &std::path::Path, err: std::io::Error) -> Self {
        Self::Storage(format!("{action} {}: {err}", path.display()))
    }
}
