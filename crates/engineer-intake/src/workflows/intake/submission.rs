//! Finalization of intake sessions.
//!
//! Submission runs its checks in a fixed order and stops at the first one that fails:
//! field validation, then (registrations only) the degree certificate, then the agreement gate.

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::NaiveDate;
use serde::Serialize;

use super::agreement::AgreementStatus;
use super::fields::{BookingField, FieldErrors, IntakeKind, RegistrationField, ScheduleMode};
use super::session::{BookingSession, RegistrationSession};
use super::validation::{validate_booking, validate_registration};

pub const MISSING_ATTACHMENT_MESSAGE: &str = "Please upload your degree certificate (PDF).";
const IMMEDIATE_ASSIGNMENT_MESSAGE: &str =
    "We'll assign an available engineer and contact you shortly.";

static BOOKING_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static REGISTRATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_reference(kind: IntakeKind) -> String {
    match kind {
        IntakeKind::Booking => {
            let id = BOOKING_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            format!("BK-{id:06}")
        }
        IntakeKind::Registration => {
            let id = REGISTRATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
            format!("REG-{id:06}")
        }
    }
}

/// Data echoed back once a session is finalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Confirmation {
    pub kind: IntakeKind,
    pub reference: String,
    pub headline: &'static str,
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Every way a submit attempt can end. None of these are failures of the service itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SubmissionOutcome<F: Ord> {
    Submitted(Confirmation),
    ValidationFailed(FieldErrors<F>),
    AttachmentMissing,
    AgreementRequired,
    AgreementDeclined,
}

impl<F: Ord> SubmissionOutcome<F> {
    pub fn label(&self) -> &'static str {
        match self {
            SubmissionOutcome::Submitted(_) => "submitted",
            SubmissionOutcome::ValidationFailed(_) => "validation_failed",
            SubmissionOutcome::AttachmentMissing => "attachment_missing",
            SubmissionOutcome::AgreementRequired => "agreement_required",
            SubmissionOutcome::AgreementDeclined => "agreement_declined",
        }
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        match self {
            SubmissionOutcome::Submitted(confirmation) => Some(confirmation),
            _ => None,
        }
    }
}

pub(crate) fn submit_booking(
    session: &mut BookingSession,
    today: NaiveDate,
) -> SubmissionOutcome<BookingField> {
    if let Some(confirmation) = &session.confirmation {
        return SubmissionOutcome::Submitted(confirmation.clone());
    }

    let errors = validate_booking(&session.form, today);
    session.errors = errors.clone();
    if !errors.is_empty() {
        return SubmissionOutcome::ValidationFailed(errors);
    }

    let form = &session.form;
    let message = match form.schedule_mode {
        ScheduleMode::Immediate => IMMEDIATE_ASSIGNMENT_MESSAGE.to_string(),
        ScheduleMode::Scheduled => format!(
            "Scheduled for {} at {}.",
            form.schedule_date.trim(),
            form.schedule_time.trim()
        ),
    };

    let confirmation = Confirmation {
        kind: IntakeKind::Booking,
        reference: next_reference(IntakeKind::Booking),
        headline: "Booking Confirmed!",
        name: form.name.trim().to_string(),
        email: form.email.trim().to_string(),
        message,
    };
    session.confirmation = Some(confirmation.clone());
    SubmissionOutcome::Submitted(confirmation)
}

pub(crate) fn submit_registration(
    session: &mut RegistrationSession,
) -> SubmissionOutcome<RegistrationField> {
    if let Some(confirmation) = &session.confirmation {
        return SubmissionOutcome::Submitted(confirmation.clone());
    }

    let errors = validate_registration(&session.form);
    session.errors = errors.clone();
    if !errors.is_empty() {
        return SubmissionOutcome::ValidationFailed(errors);
    }

    if session.degree_document.is_none() {
        session.attachment_error = Some(MISSING_ATTACHMENT_MESSAGE.to_string());
        return SubmissionOutcome::AttachmentMissing;
    }

    match session.agreement.current_status() {
        AgreementStatus::Unset => {
            session.agreement.present();
            return SubmissionOutcome::AgreementRequired;
        }
        AgreementStatus::Declined => return SubmissionOutcome::AgreementDeclined,
        AgreementStatus::Agreed => {}
    }

    let form = &session.form;
    let email = form.email.trim().to_string();
    let confirmation = Confirmation {
        kind: IntakeKind::Registration,
        reference: next_reference(IntakeKind::Registration),
        headline: "Application Submitted",
        name: form.first_name.trim().to_string(),
        message: format!(
            "Your engineer registration is under review. We'll verify your credentials \
             and notify you at {email} within 2-3 business days."
        ),
        email,
    };
    session.confirmation = Some(confirmation.clone());
    SubmissionOutcome::Submitted(confirmation)
}
