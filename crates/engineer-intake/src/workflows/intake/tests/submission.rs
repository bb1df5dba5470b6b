use super::common::*;
use crate::workflows::intake::submission::MISSING_ATTACHMENT_MESSAGE;
use crate::workflows::intake::{
    AgreementStatus, BookingField, BookingSession, IntakeKind, RegistrationField,
    RegistrationSession, SubmissionOutcome,
};

#[test]
fn immediate_booking_confirms_with_assignment_message() {
    let mut session = booking_session(booking_form());

    let confirmation = match session.on_submit(today()) {
        SubmissionOutcome::Submitted(confirmation) => confirmation,
        other => panic!("expected submission, got {other:?}"),
    };

    assert_eq!(confirmation.kind, IntakeKind::Booking);
    assert_eq!(confirmation.headline, "Booking Confirmed!");
    assert_eq!(confirmation.name, "Jane Doe");
    assert_eq!(confirmation.email, "jane@x.com");
    assert_eq!(
        confirmation.message,
        "We'll assign an available engineer and contact you shortly."
    );
    assert!(confirmation.reference.starts_with("BK-"));
}

#[test]
fn scheduled_booking_echoes_slot() {
    let mut session = booking_session(scheduled_booking_form());

    let outcome = session.on_submit(today());

    assert_eq!(
        outcome.confirmation().map(|c| c.message.as_str()),
        Some("Scheduled for 2025-06-12 at 09:30.")
    );
}

#[test]
fn invalid_booking_reports_errors_and_stays_editable() {
    let mut session = BookingSession::new();

    match session.on_submit(today()) {
        SubmissionOutcome::ValidationFailed(errors) => {
            assert_eq!(errors.get(BookingField::Name), Some("Name is required"));
            assert_eq!(&errors, session.errors());
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert!(session.confirmation().is_none());
}

#[test]
fn resubmitting_a_booking_returns_the_same_confirmation() {
    let mut session = booking_session(booking_form());
    let first = session.on_submit(today());
    let second = session.on_submit(today());

    assert_eq!(first, second);
}

#[test]
fn references_are_unique_per_submission() {
    let mut first = booking_session(booking_form());
    let mut second = booking_session(booking_form());

    let a = first.on_submit(today());
    let b = second.on_submit(today());

    assert_ne!(
        a.confirmation().map(|c| c.reference.clone()),
        b.confirmation().map(|c| c.reference.clone())
    );
}

#[test]
fn registration_without_document_reports_attachment_missing() {
    let mut session = RegistrationSession {
        form: registration_form(),
        ..RegistrationSession::default()
    };

    assert_eq!(session.on_submit(), SubmissionOutcome::AttachmentMissing);
    assert_eq!(session.attachment_error(), Some(MISSING_ATTACHMENT_MESSAGE));
    assert!(session.confirmation().is_none());
}

#[test]
fn validation_runs_before_attachment_and_agreement() {
    let mut session = RegistrationSession::new();

    match session.on_submit() {
        SubmissionOutcome::ValidationFailed(errors) => {
            assert!(errors.contains(RegistrationField::FirstName));
        }
        other => panic!("expected validation failure, got {other:?}"),
    }
    assert_eq!(session.attachment_error(), None);
    assert!(!session.agreement().is_presenting());
}

#[test]
fn unset_agreement_presents_the_gate() {
    let mut session = registration_ready_for_agreement();

    assert_eq!(session.on_submit(), SubmissionOutcome::AgreementRequired);
    assert!(session.agreement().is_presenting());
    assert_eq!(session.agreement().current_status(), AgreementStatus::Unset);
    assert!(session.confirmation().is_none());
}

#[test]
fn declined_agreement_blocks_submission() {
    let mut session = registration_ready_for_agreement();
    session.on_agreement_decline().expect("editing");

    assert_eq!(session.on_submit(), SubmissionOutcome::AgreementDeclined);
    assert!(!session.agreement().is_presenting());
    assert!(session.confirmation().is_none());
}

#[test]
fn registration_end_to_end() {
    let mut session = RegistrationSession {
        form: registration_form(),
        ..RegistrationSession::default()
    };
    assert_eq!(session.on_submit(), SubmissionOutcome::AttachmentMissing);

    session.on_file_selected(pdf(2_000_000)).expect("editing");
    assert_eq!(session.attachment_error(), None);
    assert_eq!(session.on_submit(), SubmissionOutcome::AgreementRequired);

    session.on_agreement_accept().expect("editing");
    let confirmation = match session.on_submit() {
        SubmissionOutcome::Submitted(confirmation) => confirmation,
        other => panic!("expected submission, got {other:?}"),
    };

    assert_eq!(confirmation.kind, IntakeKind::Registration);
    assert_eq!(confirmation.headline, "Application Submitted");
    assert_eq!(confirmation.name, "Ana");
    assert!(confirmation.message.contains("ana@eng.io"));
    assert!(confirmation.reference.starts_with("REG-"));
    assert_eq!(session.on_submit(), SubmissionOutcome::Submitted(confirmation));
}

#[test]
fn outcome_serializes_with_tag_and_detail() {
    let mut session = BookingSession::new();
    let outcome = session.on_submit(today());

    let json = serde_json::to_value(&outcome).expect("serializes");

    assert_eq!(json["outcome"], "validation_failed");
    assert_eq!(json["detail"]["name"], "Name is required");
    assert_eq!(outcome.label(), "validation_failed");
}
