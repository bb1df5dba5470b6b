use chrono::NaiveDate;
use serde::Serialize;

use super::agreement::{AgreementGate, AgreementStatus, AgreementView};
use super::attachment::{AttachmentCheck, FileAttachmentGuard, FileDescriptor};
use super::error::SessionError;
use super::fields::{BookingField, FieldErrors, RegistrationField, ScheduleMode};
use super::forms::{BookingForm, RegistrationForm};
use super::location::LocationResolution;
use super::submission::{self, Confirmation, SubmissionOutcome};

/// Lifecycle position shared by both intake kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    Editing,
    Submitted,
}

/// Proof that a location request was started against a particular incarnation of a booking.
/// Results presented with a stale ticket are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationTicket {
    generation: u64,
}

/// One in-progress booking interaction.
#[derive(Debug, Clone, Default)]
pub struct BookingSession {
    pub(crate) form: BookingForm,
    pub(crate) errors: FieldErrors<BookingField>,
    pub(crate) locating: bool,
    pub(crate) location_error: Option<&'static str>,
    pub(crate) generation: u64,
    pub(crate) confirmation: Option<Confirmation>,
}

impl BookingSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &BookingForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors<BookingField> {
        &self.errors
    }

    pub fn is_locating(&self) -> bool {
        self.locating
    }

    pub fn location_error(&self) -> Option<&'static str> {
        self.location_error
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        if self.confirmation.is_some() {
            SessionStatus::Submitted
        } else {
            SessionStatus::Editing
        }
    }

    pub fn on_field_change(
        &mut self,
        field: BookingField,
        value: &str,
    ) -> Result<(), SessionError> {
        self.ensure_editing()?;
        if field == BookingField::Location && self.locating {
            return Err(SessionError::LocationBusy);
        }

        self.form.set(field, value)?;
        self.errors.clear(field);

        let back_to_immediate = self.form.schedule_mode == ScheduleMode::Immediate;
        if field == BookingField::ScheduleMode && back_to_immediate {
            self.errors.clear(BookingField::ScheduleDate);
            self.errors.clear(BookingField::ScheduleTime);
        }
        Ok(())
    }

    pub fn on_named_field_change(&mut self, field: &str, value: &str) -> Result<(), SessionError> {
        let field: BookingField = field.parse()?;
        self.on_field_change(field, value)
    }

    /// Mark a location request as in flight. Returns `None` while another request is pending or
    /// once the booking is submitted.
    pub fn begin_location_request(&mut self) -> Option<LocationTicket> {
        if self.locating || self.confirmation.is_some() {
            return None;
        }
        self.locating = true;
        self.location_error = None;
        Some(LocationTicket {
            generation: self.generation,
        })
    }

    /// Apply a finished resolution. Returns `false` when the result was discarded.
    pub fn complete_location_request(
        &mut self,
        ticket: LocationTicket,
        resolution: &LocationResolution,
    ) -> bool {
        if ticket.generation != self.generation || !self.locating {
            return false;
        }
        self.locating = false;

        if self.confirmation.is_some() {
            return false;
        }

        match resolution {
            LocationResolution::Resolved { address } => {
                self.form.location = address.clone();
                self.errors.clear(BookingField::Location);
            }
            LocationResolution::Unsupported | LocationResolution::Unavailable { .. } => {
                self.location_error = resolution.error_message();
            }
        }
        true
    }

    /// Release the location field for a request that will never complete. A ticket from an
    /// earlier incarnation of the booking leaves the current request alone.
    pub fn abandon_location_request(&mut self, ticket: LocationTicket) -> bool {
        if ticket.generation != self.generation || !self.locating {
            return false;
        }
        self.locating = false;
        true
    }

    pub fn on_submit(&mut self, today: NaiveDate) -> SubmissionOutcome<BookingField> {
        submission::submit_booking(self, today)
    }

    /// Start over with an empty form after a confirmed booking.
    pub fn book_another(&mut self) -> Result<(), SessionError> {
        if self.confirmation.is_none() {
            return Err(SessionError::NotFinalized);
        }
        let generation = self.generation + 1;
        *self = Self {
            generation,
            ..Self::default()
        };
        Ok(())
    }

    pub fn snapshot(&self) -> BookingSnapshot {
        BookingSnapshot {
            status: self.status(),
            form: self.form.clone(),
            errors: self.errors.clone(),
            locating: self.locating,
            location_error: self.location_error,
            confirmation: self.confirmation.clone(),
        }
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        if self.confirmation.is_some() {
            return Err(SessionError::Finalized);
        }
        Ok(())
    }
}

/// Render-ready state of a booking.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingSnapshot {
    pub status: SessionStatus,
    pub form: BookingForm,
    pub errors: FieldErrors<BookingField>,
    pub locating: bool,
    pub location_error: Option<&'static str>,
    pub confirmation: Option<Confirmation>,
}

/// One in-progress engineer registration.
#[derive(Debug, Clone, Default)]
pub struct RegistrationSession {
    pub(crate) form: RegistrationForm,
    pub(crate) errors: FieldErrors<RegistrationField>,
    pub(crate) degree_document: Option<FileDescriptor>,
    pub(crate) attachment_error: Option<String>,
    pub(crate) agreement: AgreementGate,
    pub(crate) confirmation: Option<Confirmation>,
    pub(crate) guard: FileAttachmentGuard,
}

impl RegistrationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_guard(guard: FileAttachmentGuard) -> Self {
        Self {
            guard,
            ..Self::default()
        }
    }

    pub fn form(&self) -> &RegistrationForm {
        &self.form
    }

    pub fn errors(&self) -> &FieldErrors<RegistrationField> {
        &self.errors
    }

    pub fn degree_document(&self) -> Option<&FileDescriptor> {
        self.degree_document.as_ref()
    }

    pub fn attachment_error(&self) -> Option<&str> {
        self.attachment_error.as_deref()
    }

    pub fn agreement(&self) -> &AgreementGate {
        &self.agreement
    }

    pub fn confirmation(&self) -> Option<&Confirmation> {
        self.confirmation.as_ref()
    }

    pub fn status(&self) -> SessionStatus {
        if self.confirmation.is_some() {
            SessionStatus::Submitted
        } else {
            SessionStatus::Editing
        }
    }

    pub fn on_field_change(
        &mut self,
        field: RegistrationField,
        value: &str,
    ) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.form.set(field, value);
        self.errors.clear(field);
        Ok(())
    }

    pub fn on_named_field_change(&mut self, field: &str, value: &str) -> Result<(), SessionError> {
        let field: RegistrationField = field.parse()?;
        self.on_field_change(field, value)
    }

    /// Run the attachment guard; only an accepted file replaces the current document.
    pub fn on_file_selected(
        &mut self,
        file: FileDescriptor,
    ) -> Result<AttachmentCheck, SessionError> {
        self.ensure_editing()?;
        let check = self.guard.check(file);
        match &check {
            AttachmentCheck::Accepted { file } => {
                self.degree_document = Some(file.clone());
                self.attachment_error = None;
            }
            AttachmentCheck::Rejected { message, .. } => {
                self.attachment_error = Some(message.clone());
            }
        }
        Ok(check)
    }

    pub fn remove_attachment(&mut self) -> Result<Option<FileDescriptor>, SessionError> {
        self.ensure_editing()?;
        self.attachment_error = None;
        Ok(self.degree_document.take())
    }

    pub fn on_agreement_accept(&mut self) -> Result<AgreementStatus, SessionError> {
        self.ensure_editing()?;
        Ok(self.agreement.accept())
    }

    pub fn on_agreement_decline(&mut self) -> Result<AgreementStatus, SessionError> {
        self.ensure_editing()?;
        Ok(self.agreement.decline()?)
    }

    pub fn reopen_agreement(&mut self) -> Result<(), SessionError> {
        self.ensure_editing()?;
        Ok(self.agreement.reopen()?)
    }

    pub fn dismiss_agreement(&mut self) -> Result<(), SessionError> {
        self.ensure_editing()?;
        self.agreement.dismiss();
        Ok(())
    }

    pub fn on_submit(&mut self) -> SubmissionOutcome<RegistrationField> {
        submission::submit_registration(self)
    }

    pub fn snapshot(&self) -> RegistrationSnapshot {
        RegistrationSnapshot {
            status: self.status(),
            form: self.form.clone(),
            errors: self.errors.clone(),
            degree_document: self.degree_document.clone(),
            attachment_error: self.attachment_error.clone(),
            agreement: self.agreement.view(),
            confirmation: self.confirmation.clone(),
        }
    }

    fn ensure_editing(&self) -> Result<(), SessionError> {
        if self.confirmation.is_some() {
            return Err(SessionError::Finalized);
        }
        Ok(())
    }
}

/// Render-ready state of a registration.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationSnapshot {
    pub status: SessionStatus,
    pub form: RegistrationForm,
    pub errors: FieldErrors<RegistrationField>,
    pub degree_document: Option<FileDescriptor>,
    pub attachment_error: Option<String>,
    pub agreement: AgreementView,
    pub confirmation: Option<Confirmation>,
}
