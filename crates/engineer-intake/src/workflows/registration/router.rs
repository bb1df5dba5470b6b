use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post, put},
    Json, Router,
};
use serde::Serialize;

use super::service::{RegistrationService, RegistrationView};
use crate::workflows::intake::{
    AttachmentCheck, FieldChange, FileDescriptor, IntakeHandoff, IntakeServiceError,
    RegistrationField, SessionId, SubmissionOutcome, AGREEMENT_TEXT, AGREEMENT_TITLE,
};

/// Router builder exposing the engineer registration flow as JSON endpoints.
pub fn registration_router<H>(service: Arc<RegistrationService<H>>) -> Router
where
    H: IntakeHandoff + 'static,
{
    Router::new()
        .route("/api/v1/agreements/engineer", get(agreement_text_handler))
        .route("/api/v1/registrations", post(open_handler::<H>))
        .route(
            "/api/v1/registrations/:session_id",
            get(view_handler::<H>).delete(close_handler::<H>),
        )
        .route(
            "/api/v1/registrations/:session_id/fields",
            patch(field_handler::<H>),
        )
        .route(
            "/api/v1/registrations/:session_id/attachment",
            put(attachment_handler::<H>).delete(remove_attachment_handler::<H>),
        )
        .route(
            "/api/v1/registrations/:session_id/agreement/:action",
            post(agreement_handler::<H>),
        )
        .route(
            "/api/v1/registrations/:session_id/submit",
            post(submit_handler::<H>),
        )
        .with_state(service)
}

#[derive(Debug, Serialize)]
pub(crate) struct AgreementDocument {
    title: &'static str,
    text: &'static str,
}

#[derive(Debug, Serialize)]
pub(crate) struct AttachmentResponse {
    check: AttachmentCheck,
    session: RegistrationView,
}

pub(crate) async fn agreement_text_handler() -> Json<AgreementDocument> {
    Json(AgreementDocument {
        title: AGREEMENT_TITLE,
        text: AGREEMENT_TEXT,
    })
}

pub(crate) async fn open_handler<H>(State(service): State<Arc<RegistrationService<H>>>) -> Response
where
    H: IntakeHandoff + 'static,
{
    (StatusCode::CREATED, Json(service.open())).into_response()
}

pub(crate) async fn view_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<RegistrationView>, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    service.view(&SessionId(session_id)).map(Json)
}

pub(crate) async fn close_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    service.close(&SessionId(session_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn field_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
    Json(change): Json<FieldChange>,
) -> Result<Json<RegistrationView>, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    service
        .change_field(&SessionId(session_id), &change.field, &change.value)
        .map(Json)
}

pub(crate) async fn attachment_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
    Json(file): Json<FileDescriptor>,
) -> Result<Json<AttachmentResponse>, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    let (check, session) = service.select_file(&SessionId(session_id), file)?;
    Ok(Json(AttachmentResponse { check, session }))
}

pub(crate) async fn remove_attachment_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<RegistrationView>, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    service.remove_file(&SessionId(session_id)).map(Json)
}

pub(crate) async fn agreement_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path((session_id, action)): Path<(String, String)>,
) -> Result<Response, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    let id = SessionId(session_id);
    let view = match action.as_str() {
        "accept" => service.accept_agreement(&id)?,
        "decline" => service.decline_agreement(&id)?,
        "reopen" => service.reopen_agreement(&id)?,
        "dismiss" => service.dismiss_agreement(&id)?,
        _ => return Ok(StatusCode::NOT_FOUND.into_response()),
    };
    Ok(Json(view).into_response())
}

pub(crate) async fn submit_handler<H>(
    State(service): State<Arc<RegistrationService<H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmissionOutcome<RegistrationField>>, IntakeServiceError>
where
    H: IntakeHandoff + 'static,
{
    service.submit(&SessionId(session_id)).map(Json)
}
