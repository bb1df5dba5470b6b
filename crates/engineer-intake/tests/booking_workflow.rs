use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::NaiveDate;
use engineer_intake::workflows::booking::{BookingService, LocationRequestOutcome};
use engineer_intake::workflows::intake::{
    BookingField, Coordinates, DeviceReport, FinalizedIntake, GeocodeError, HandoffError,
    IntakeHandoff, LocationResolution, ReverseGeocoder, SessionStatus, SubmissionOutcome,
};

struct SpringfieldGeocoder;

#[async_trait]
impl ReverseGeocoder for SpringfieldGeocoder {
    async fn display_name(&self, at: Coordinates) -> Result<Option<String>, GeocodeError> {
        if (at.latitude - 39.78).abs() < 0.1 && (at.longitude + 89.65).abs() < 0.1 {
            return Ok(Some("12 Main St, Springfield".to_string()));
        }
        Ok(None)
    }
}

#[derive(Default)]
struct Outbox {
    sent: Mutex<Vec<FinalizedIntake>>,
}

impl IntakeHandoff for Outbox {
    fn hand_off(&self, intake: FinalizedIntake) -> Result<(), HandoffError> {
        self.sent.lock().expect("outbox mutex").push(intake);
        Ok(())
    }
}

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

#[tokio::test]
async fn customer_books_an_engineer_using_device_location() {
    let outbox = Arc::new(Outbox::default());
    let service = BookingService::new(SpringfieldGeocoder, outbox.clone());
    let id = service.open().session_id;

    let first = service.submit(&id, today()).expect("session exists");
    match first {
        SubmissionOutcome::ValidationFailed(errors) => {
            assert_eq!(errors.len(), 5);
            assert_eq!(errors.get(BookingField::Location), Some("Location is required"));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }

    for (field, value) in [
        ("name", "Jane Doe"),
        ("email", "jane@x.com"),
        ("phone", "555-1000"),
        ("serviceType", "Electrical Engineering"),
        ("scheduleMode", "scheduled"),
        ("scheduleDate", "2025-06-09"),
        ("scheduleTime", "14:00"),
    ] {
        service.change_field(&id, field, value).expect("accepted");
    }

    let located = service
        .request_location(
            &id,
            &DeviceReport::Position {
                latitude: 39.7817,
                longitude: -89.6501,
            },
        )
        .await
        .expect("session exists");
    let view = match located {
        LocationRequestOutcome::Applied { resolution, session } => {
            assert!(matches!(resolution, LocationResolution::Resolved { .. }));
            session
        }
        other => panic!("expected applied location, got {other:?}"),
    };
    assert_eq!(view.state.form.location, "12 Main St, Springfield");
    assert!(!view.state.errors.contains(BookingField::Location));

    let past = service.submit(&id, today()).expect("session exists");
    match past {
        SubmissionOutcome::ValidationFailed(errors) => {
            assert_eq!(errors.len(), 1);
            assert_eq!(
                errors.get(BookingField::ScheduleDate),
                Some("Date cannot be in the past")
            );
        }
        other => panic!("expected past date rejection, got {other:?}"),
    }

    service
        .change_field(&id, "scheduleDate", "2025-06-11")
        .expect("accepted");
    let outcome = service.submit(&id, today()).expect("session exists");
    let confirmation = outcome.confirmation().expect("submitted");
    assert_eq!(confirmation.message, "Scheduled for 2025-06-11 at 14:00.");

    let view = service.view(&id).expect("session exists");
    assert_eq!(view.state.status, SessionStatus::Submitted);
    assert_eq!(outbox.sent.lock().expect("outbox mutex").len(), 1);
}

#[tokio::test]
async fn denied_permission_leaves_manual_entry_available() {
    let outbox = Arc::new(Outbox::default());
    let service = BookingService::new(SpringfieldGeocoder, outbox);
    let id = service.open().session_id;

    let outcome = service
        .request_location(&id, &DeviceReport::PermissionDenied)
        .await
        .expect("session exists");

    let view = match outcome {
        LocationRequestOutcome::Applied { session, .. } => session,
        other => panic!("expected applied failure, got {other:?}"),
    };
    assert_eq!(
        view.state.location_error,
        Some("Unable to retrieve your location. Please type it manually.")
    );

    let view = service
        .change_field(&id, "location", "Typed Address")
        .expect("manual entry accepted");
    assert_eq!(view.state.form.location, "Typed Address");
}
