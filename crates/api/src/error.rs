#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Not found: {0}")]
    NotFound(String),
}

pub type ApiResult<T> = std::result::Result<T, ApiError>;
