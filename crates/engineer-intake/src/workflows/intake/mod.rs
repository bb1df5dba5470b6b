//! Shared intake core: field rules, attachment guard, agreement gate, location lookup and the
//! submission controller used by both the booking and the registration flows.

pub mod agreement;
pub mod attachment;
pub mod error;
pub mod fields;
pub mod forms;
pub mod geocoder;
pub mod handoff;
pub mod location;
pub mod registry;
pub mod session;
pub mod submission;
pub mod validation;

#[cfg(test)]
pub(crate) mod tests;

pub use agreement::{
    AgreementError, AgreementGate, AgreementStatus, AgreementView, AGREEMENT_TEXT, AGREEMENT_TITLE,
};
pub use attachment::{
    AttachmentCheck, AttachmentRejection, FileAttachmentGuard, FileDescriptor,
    MAX_ATTACHMENT_BYTES,
};
pub use error::{IntakeServiceError, SessionError};
pub use fields::{
    BookingField, Discipline, FieldErrors, IntakeKind, RegistrationField, ScheduleMode,
    ServiceType,
};
pub use forms::{BookingForm, FieldChange, RegistrationForm};
pub use geocoder::{GeocodeError, NominatimGeocoder};
pub use handoff::{FinalizedIntake, HandoffError, IntakeHandoff, LoggingHandoff};
pub use location::{
    Coordinates, DeviceLocationError, DeviceLocator, DeviceReport, LocationResolution,
    LocationResolver, ReverseGeocoder,
};
pub use registry::{SessionId, SessionRegistry, SessionView};
pub use session::{
    BookingSession, BookingSnapshot, LocationTicket, RegistrationSession, RegistrationSnapshot,
    SessionStatus,
};
pub use submission::{Confirmation, SubmissionOutcome};
pub use validation::{validate_booking, validate_registration};
