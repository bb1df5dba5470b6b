use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Json, Router,
};
use chrono::Local;

use super::service::{BookingService, BookingView, LocationRequestOutcome};
use crate::workflows::intake::{
    BookingField, DeviceReport, FieldChange, IntakeHandoff, IntakeServiceError, ReverseGeocoder,
    SessionId, SubmissionOutcome,
};

/// Router builder exposing the booking flow as JSON endpoints.
pub fn booking_router<G, H>(service: Arc<BookingService<G, H>>) -> Router
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    Router::new()
        .route("/api/v1/bookings", post(open_handler::<G, H>))
        .route(
            "/api/v1/bookings/:session_id",
            get(view_handler::<G, H>).delete(close_handler::<G, H>),
        )
        .route(
            "/api/v1/bookings/:session_id/fields",
            patch(field_handler::<G, H>),
        )
        .route(
            "/api/v1/bookings/:session_id/location",
            post(location_handler::<G, H>),
        )
        .route(
            "/api/v1/bookings/:session_id/submit",
            post(submit_handler::<G, H>),
        )
        .route(
            "/api/v1/bookings/:session_id/reset",
            post(reset_handler::<G, H>),
        )
        .with_state(service)
}

pub(crate) async fn open_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
) -> Response
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    (StatusCode::CREATED, Json(service.open())).into_response()
}

pub(crate) async fn view_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<BookingView>, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    service.view(&SessionId(session_id)).map(Json)
}

pub(crate) async fn close_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
) -> Result<StatusCode, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    service.close(&SessionId(session_id))?;
    Ok(StatusCode::NO_CONTENT)
}

pub(crate) async fn field_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
    Json(change): Json<FieldChange>,
) -> Result<Json<BookingView>, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    service
        .change_field(&SessionId(session_id), &change.field, &change.value)
        .map(Json)
}

pub(crate) async fn location_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
    Json(report): Json<DeviceReport>,
) -> Result<Json<LocationRequestOutcome>, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    service
        .request_location(&SessionId(session_id), &report)
        .await
        .map(Json)
}

pub(crate) async fn submit_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<SubmissionOutcome<BookingField>>, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    let today = Local::now().date_naive();
    service.submit(&SessionId(session_id), today).map(Json)
}

pub(crate) async fn reset_handler<G, H>(
    State(service): State<Arc<BookingService<G, H>>>,
    Path(session_id): Path<String>,
) -> Result<Json<BookingView>, IntakeServiceError>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    service.book_another(&SessionId(session_id)).map(Json)
}
