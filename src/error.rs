use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use uuid::Uuid;

pub type AppResult<T> = Result<T, AppError>;

/// Failure taxonomy of the booking core. `Busy` is the only retryable
/// kind; everything else is terminal for the request.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum AppError {
    #[error("{0} not found")]
    NotFound(String),

    #[error("seats do not belong to the showing's screen: {0:?}")]
    InvalidSeat(Vec<Uuid>),

    #[error("seats already booked: {0:?}")]
    SeatUnavailable(Vec<Uuid>),

    #[error("showing is busy, retry later")]
    Busy,

    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            AppError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                json!({ "error": self.to_string() }),
            ),
            AppError::InvalidSeat(seats) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": "seats do not belong to the showing's screen", "seats": seats }),
            ),
            AppError::SeatUnavailable(seats) => (
                StatusCode::CONFLICT,
                json!({ "error": "seats already booked", "seats": seats }),
            ),
            AppError::Busy => (
                StatusCode::SERVICE_UNAVAILABLE,
                json!({ "error": self.to_string(), "retryable": true }),
            ),
            AppError::InvalidInput(_) => (
                StatusCode::BAD_REQUEST,
                json!({ "error": self.to_string() }),
            ),
            AppError::Internal(_) => {
                tracing::error!("{}", self);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "internal server error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}
