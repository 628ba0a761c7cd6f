use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error(transparent)]
    Core(#[from] pk_core::Error),

    #[error("invalid base URL: {0}")]
    BaseUrl(String),
}

pub type Result<T> = std::result::Result<T, ClientError>;
