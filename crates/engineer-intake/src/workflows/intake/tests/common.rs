use std::sync::Mutex;

use async_trait::async_trait;
use axum::response::Response;
use chrono::NaiveDate;
use serde_json::Value;

use crate::workflows::intake::{
    BookingForm, BookingSession, Coordinates, FileDescriptor, FinalizedIntake, GeocodeError,
    HandoffError, IntakeHandoff, RegistrationForm, RegistrationSession, ReverseGeocoder,
    ScheduleMode,
};

pub(crate) fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 10).expect("valid date")
}

pub(crate) fn booking_form() -> BookingForm {
    BookingForm {
        name: "Jane Doe".to_string(),
        email: "jane@x.com".to_string(),
        phone: "555-1000".to_string(),
        location: "12 Main St".to_string(),
        service_type: "Electrical Engineering".to_string(),
        description: "Panel keeps tripping".to_string(),
        schedule_mode: ScheduleMode::Immediate,
        schedule_date: String::new(),
        schedule_time: String::new(),
    }
}

pub(crate) fn scheduled_booking_form() -> BookingForm {
    BookingForm {
        schedule_mode: ScheduleMode::Scheduled,
        schedule_date: "2025-06-12".to_string(),
        schedule_time: "09:30".to_string(),
        ..booking_form()
    }
}

pub(crate) fn registration_form() -> RegistrationForm {
    RegistrationForm {
        first_name: "Ana".to_string(),
        last_name: "Lee".to_string(),
        email: "ana@eng.io".to_string(),
        phone: "1".to_string(),
        discipline: "Civil Engineering".to_string(),
        license_number: "PE-4471".to_string(),
        years_experience: "5".to_string(),
        city: "Lagos".to_string(),
        country: "NG".to_string(),
    }
}

pub(crate) fn pdf(size_bytes: u64) -> FileDescriptor {
    FileDescriptor::new("degree.pdf", "application/pdf", size_bytes)
}

pub(crate) fn booking_session(form: BookingForm) -> BookingSession {
    BookingSession {
        form,
        ..BookingSession::default()
    }
}

/// Registration with a valid form and an accepted certificate, agreement still unset.
pub(crate) fn registration_ready_for_agreement() -> RegistrationSession {
    let mut session = RegistrationSession {
        form: registration_form(),
        ..RegistrationSession::default()
    };
    session
        .on_file_selected(pdf(2_000_000))
        .expect("editing session accepts files");
    session
}

#[derive(Default)]
pub(crate) struct MemoryHandoff {
    intakes: Mutex<Vec<FinalizedIntake>>,
}

impl MemoryHandoff {
    pub(crate) fn intakes(&self) -> Vec<FinalizedIntake> {
        self.intakes.lock().expect("handoff mutex poisoned").clone()
    }
}

impl IntakeHandoff for MemoryHandoff {
    fn hand_off(&self, intake: FinalizedIntake) -> Result<(), HandoffError> {
        self.intakes
            .lock()
            .expect("handoff mutex poisoned")
            .push(intake);
        Ok(())
    }
}

pub(crate) struct FailingHandoff;

impl IntakeHandoff for FailingHandoff {
    fn hand_off(&self, _intake: FinalizedIntake) -> Result<(), HandoffError> {
        Err(HandoffError::Transport("queue offline".to_string()))
    }
}

/// Geocoder answering every lookup with the same display name.
pub(crate) struct StubGeocoder(pub(crate) Option<String>);

impl StubGeocoder {
    pub(crate) fn named(name: &str) -> Self {
        Self(Some(name.to_string()))
    }
}

#[async_trait]
impl ReverseGeocoder for StubGeocoder {
    async fn display_name(&self, _at: Coordinates) -> Result<Option<String>, GeocodeError> {
        Ok(self.0.clone())
    }
}

pub(crate) struct FailingGeocoder;

#[async_trait]
impl ReverseGeocoder for FailingGeocoder {
    async fn display_name(&self, _at: Coordinates) -> Result<Option<String>, GeocodeError> {
        Err(GeocodeError::Transport("connection refused".to_string()))
    }
}

/// Geocoder whose lookups never finish.
pub(crate) struct HangingGeocoder;

#[async_trait]
impl ReverseGeocoder for HangingGeocoder {
    async fn display_name(&self, _at: Coordinates) -> Result<Option<String>, GeocodeError> {
        std::future::pending().await
    }
}

pub(crate) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
