use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use lectern_db::StoreError;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("invalid credentials")]
    Unauthorized,

    #[error("insufficient role")]
    Forbidden,

    #[error(transparent)]
    Join(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self {
            // Validation messages pass through to the client verbatim.
            ApiError::Store(StoreError::UsernameTaken) => StatusCode::CONFLICT,
            ApiError::Store(e) if e.is_validation() => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => return StatusCode::UNAUTHORIZED.into_response(),
            ApiError::Forbidden => return StatusCode::FORBIDDEN.into_response(),
            _ => {
                error!("request failed: {}", self);
                return StatusCode::INTERNAL_SERVER_ERROR.into_response();
            }
        };

        (status, self.to_string()).into_response()
    }
}
