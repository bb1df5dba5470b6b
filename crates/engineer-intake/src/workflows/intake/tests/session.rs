use super::common::*;
use crate::workflows::intake::{
    AgreementStatus, AttachmentCheck, BookingField, BookingSession, FileDescriptor,
    RegistrationField, RegistrationSession, ScheduleMode, SessionError, SessionStatus,
    SubmissionOutcome,
};

#[test]
fn field_change_clears_only_that_fields_error() {
    let mut session = BookingSession::new();
    let outcome = session.on_submit(today());
    assert!(matches!(outcome, SubmissionOutcome::ValidationFailed(_)));
    assert!(session.errors().contains(BookingField::Name));
    assert!(session.errors().contains(BookingField::Email));

    session
        .on_field_change(BookingField::Name, "Jane Doe")
        .expect("editing session accepts changes");

    assert!(!session.errors().contains(BookingField::Name));
    assert!(session.errors().contains(BookingField::Email));
}

#[test]
fn field_change_does_not_revalidate() {
    let mut session = booking_session(booking_form());
    session
        .on_field_change(BookingField::Email, "not-an-email")
        .expect("editing session accepts changes");
    assert!(session.errors().is_empty());
}

#[test]
fn switching_back_to_immediate_clears_schedule_errors() {
    let mut form = scheduled_booking_form();
    form.schedule_date.clear();
    form.schedule_time.clear();
    let mut session = booking_session(form);
    session.on_submit(today());
    assert!(session.errors().contains(BookingField::ScheduleDate));
    assert!(session.errors().contains(BookingField::ScheduleTime));

    session
        .on_named_field_change("scheduleMode", "immediate")
        .expect("schedule mode parses");

    assert_eq!(session.form().schedule_mode, ScheduleMode::Immediate);
    assert!(session.errors().is_empty());
}

#[test]
fn named_changes_reject_unknown_fields_and_modes() {
    let mut session = BookingSession::new();

    assert_eq!(
        session.on_named_field_change("favouriteColour", "blue"),
        Err(SessionError::UnknownField("favouriteColour".to_string()))
    );
    assert_eq!(
        session.on_named_field_change("scheduleMode", "whenever"),
        Err(SessionError::InvalidValue {
            field: "scheduleMode",
            value: "whenever".to_string(),
        })
    );
}

#[test]
fn submitted_booking_is_read_only() {
    let mut session = booking_session(booking_form());
    assert!(session.on_submit(today()).confirmation().is_some());
    assert_eq!(session.status(), SessionStatus::Submitted);

    assert_eq!(
        session.on_field_change(BookingField::Name, "Someone Else"),
        Err(SessionError::Finalized)
    );
    assert_eq!(session.begin_location_request(), None);
    assert_eq!(session.form().name, "Jane Doe");
}

#[test]
fn abandoned_request_only_releases_its_own_booking() {
    let mut session = booking_session(booking_form());
    let stale = session.begin_location_request().expect("idle booking");
    assert!(session.abandon_location_request(stale));
    assert!(!session.is_locating());
    assert!(!session.abandon_location_request(stale));

    let stale = session.begin_location_request().expect("released");
    session.on_submit(today());
    session.book_another().expect("submitted");
    let current = session.begin_location_request().expect("fresh booking");

    assert!(!session.abandon_location_request(stale));
    assert!(session.is_locating());
    assert!(session.abandon_location_request(current));
    assert!(!session.is_locating());
}

#[test]
fn book_another_requires_a_submitted_booking() {
    let mut session = booking_session(booking_form());
    assert_eq!(session.book_another(), Err(SessionError::NotFinalized));

    session.on_submit(today());
    session.book_another().expect("submitted booking can reset");

    assert_eq!(session.status(), SessionStatus::Editing);
    assert_eq!(session.form(), &Default::default());
    assert!(session.errors().is_empty());
    assert!(session.confirmation().is_none());
}

#[test]
fn accepted_file_replaces_previous_document() {
    let mut session = RegistrationSession::new();
    session.on_file_selected(pdf(1_000)).expect("editing");
    let replacement = FileDescriptor::new("masters.pdf", "application/pdf", 2_000);

    let check = session
        .on_file_selected(replacement.clone())
        .expect("editing");

    assert!(check.is_accepted());
    assert_eq!(session.degree_document(), Some(&replacement));
    assert_eq!(session.attachment_error(), None);
}

#[test]
fn rejected_file_keeps_previous_document() {
    let mut session = RegistrationSession::new();
    session.on_file_selected(pdf(1_000)).expect("editing");

    let check = session
        .on_file_selected(FileDescriptor::new("scan.png", "image/png", 1_000))
        .expect("editing");

    assert!(matches!(check, AttachmentCheck::Rejected { .. }));
    assert_eq!(session.degree_document(), Some(&pdf(1_000)));
    assert_eq!(
        session.attachment_error(),
        Some("Only PDF files are accepted.")
    );
}

#[test]
fn remove_attachment_clears_document_and_error() {
    let mut session = RegistrationSession::new();
    session.on_file_selected(pdf(1_000)).expect("editing");
    session
        .on_file_selected(pdf(20 * 1024 * 1024))
        .expect("editing");
    assert_eq!(session.attachment_error(), Some("File must be under 10MB."));

    let removed = session.remove_attachment().expect("editing");

    assert_eq!(removed, Some(pdf(1_000)));
    assert_eq!(session.degree_document(), None);
    assert_eq!(session.attachment_error(), None);
}

#[test]
fn registration_field_change_clears_its_error() {
    let mut session = RegistrationSession::new();
    session.on_submit();
    assert!(session.errors().contains(RegistrationField::City));

    session
        .on_named_field_change("city", "Lagos")
        .expect("known field");

    assert!(!session.errors().contains(RegistrationField::City));
    assert!(session.errors().contains(RegistrationField::Country));
}

#[test]
fn agreement_transitions_through_session() {
    let mut session = RegistrationSession::new();

    assert_eq!(
        session.on_agreement_decline(),
        Ok(AgreementStatus::Declined)
    );
    session.reopen_agreement().expect("declined can reopen");
    assert!(session.agreement().is_presenting());
    session.dismiss_agreement().expect("editing");
    assert!(!session.agreement().is_presenting());

    assert_eq!(session.on_agreement_accept(), Ok(AgreementStatus::Agreed));
    assert!(matches!(
        session.reopen_agreement(),
        Err(SessionError::Agreement(_))
    ));
}

#[test]
fn submitted_registration_is_read_only() {
    let mut session = registration_ready_for_agreement();
    session.on_agreement_accept().expect("editing");
    assert!(session.on_submit().confirmation().is_some());

    assert_eq!(
        session.on_field_change(RegistrationField::City, "Accra"),
        Err(SessionError::Finalized)
    );
    assert_eq!(
        session.on_file_selected(pdf(5)),
        Err(SessionError::Finalized)
    );
    assert_eq!(session.remove_attachment(), Err(SessionError::Finalized));
    assert_eq!(session.on_agreement_decline(), Err(SessionError::Finalized));
    assert!(session.degree_document().is_some());
}

#[test]
fn snapshot_serializes_camel_case() {
    let mut session = booking_session(booking_form());
    session.on_submit(today());

    let json = serde_json::to_value(session.snapshot()).expect("serializes");

    assert_eq!(json["status"], "submitted");
    assert_eq!(json["form"]["serviceType"], "Electrical Engineering");
    assert_eq!(json["form"]["scheduleMode"], "immediate");
    assert_eq!(json["locating"], false);
    assert_eq!(json["confirmation"]["headline"], "Booking Confirmed!");
}
