use thiserror::Error;

/// Errors raised while turning a call into a [`Request`](crate::request::Request).
#[derive(Debug, Error)]
pub enum RequestError {
    #[error("missing required argument: {0}")]
    MissingArgument(&'static str),

    #[error("invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("failed to serialize request body: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, RequestError>;
