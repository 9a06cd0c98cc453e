pub mod events;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use plancal_core::PlanCalError;
use plancal_core::protocol::ErrorResponse;
use tracing::warn;

/// Converts errors to JSON responses, picking the status from the error kind.
pub struct AppError {
    status: StatusCode,
    error: anyhow::Error,
}

fn status_for(error: &anyhow::Error) -> StatusCode {
    match error.downcast_ref::<PlanCalError>() {
        Some(PlanCalError::EventNotFound(_)) => StatusCode::NOT_FOUND,
        Some(PlanCalError::Form(_) | PlanCalError::InvalidDate(_)) => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            warn!(error = %self.error, "request failed");
        }
        let body = Json(ErrorResponse {
            error: self.error.to_string(),
        });
        (self.status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        let error = err.into();
        AppError {
            status: status_for(&error),
            error,
        }
    }
}
