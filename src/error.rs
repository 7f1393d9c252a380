use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// Every failure a handler can surface, each mapped to exactly one status
/// code. Store and decode faults are always 500; a missing or invalid
/// session is the only 401.
#[derive(Error, Debug)]
pub enum AppError {
    #[error("{0}")]
    BadRequest(&'static str),

    #[error("Unauthorized")]
    Unauthorized,

    #[error("{0}")]
    Forbidden(&'static str),

    #[error("{0}")]
    NotFound(&'static str),

    #[error("Store error: {0}")]
    Database(#[from] redis::RedisError),

    #[error("Decode error: {0}")]
    Decode(#[from] serde_json::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Database(_) | AppError::Decode(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        // Internals stay in the log; the client gets a generic message.
        let message = if status.is_server_error() {
            error!("request failed: {self}");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(json!({ "message": message }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn each_variant_maps_to_one_status() {
        assert_eq!(
            AppError::BadRequest("nope").status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(AppError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(AppError::Forbidden("nope").status(), StatusCode::FORBIDDEN);
        assert_eq!(AppError::NotFound("nope").status(), StatusCode::NOT_FOUND);

        let store = AppError::Database(redis::RedisError::from((
            redis::ErrorKind::IoError,
            "connection reset",
        )));
        assert_eq!(store.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let decode = AppError::Decode(serde_json::from_str::<i32>("{").unwrap_err());
        assert_eq!(decode.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn client_errors_keep_their_message() {
        assert_eq!(
            AppError::BadRequest("You are already friends").to_string(),
            "You are already friends"
        );
    }
}
