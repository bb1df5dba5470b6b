use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use super::agreement::AgreementError;
use super::registry::SessionId;

/// Misuse of a session's lifecycle. Validation problems are not errors; they are reported
/// through the submission outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("unknown field '{0}'")]
    UnknownField(String),
    #[error("invalid value '{value}' for {field}")]
    InvalidValue { field: &'static str, value: String },
    #[error("session has already been submitted")]
    Finalized,
    #[error("session has not been submitted yet")]
    NotFinalized,
    #[error("location is being resolved")]
    LocationBusy,
    #[error(transparent)]
    Agreement(#[from] AgreementError),
}

/// Error raised by the intake services.
#[derive(Debug, thiserror::Error)]
pub enum IntakeServiceError {
    #[error("session {0} not found")]
    SessionNotFound(SessionId),
    #[error(transparent)]
    Session(#[from] SessionError),
}

impl IntakeServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            IntakeServiceError::SessionNotFound(_) => StatusCode::NOT_FOUND,
            IntakeServiceError::Session(
                SessionError::UnknownField(_) | SessionError::InvalidValue { .. },
            ) => StatusCode::BAD_REQUEST,
            IntakeServiceError::Session(_) => StatusCode::CONFLICT,
        }
    }
}

impl IntoResponse for IntakeServiceError {
    fn into_response(self) -> Response {
        let payload = json!({ "error": self.to_string() });
        (self.status_code(), axum::Json(payload)).into_response()
    }
}
