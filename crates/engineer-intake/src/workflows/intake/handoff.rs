use serde::Serialize;
use tracing::info;

use super::attachment::FileDescriptor;
use super::forms::{BookingForm, RegistrationForm};
use super::submission::Confirmation;

/// A session that reached its terminal state, handed to downstream processing once.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FinalizedIntake {
    Booking {
        form: BookingForm,
        confirmation: Confirmation,
    },
    Registration {
        form: RegistrationForm,
        degree_document: FileDescriptor,
        confirmation: Confirmation,
    },
}

impl FinalizedIntake {
    pub fn confirmation(&self) -> &Confirmation {
        match self {
            FinalizedIntake::Booking { confirmation, .. }
            | FinalizedIntake::Registration { confirmation, .. } => confirmation,
        }
    }
}

/// Outbound hook for finalized intakes (dispatching, credential review, e-mail).
/// Callers treat it as fire-and-forget: a failure is logged and never changes the outcome.
pub trait IntakeHandoff: Send + Sync {
    fn hand_off(&self, intake: FinalizedIntake) -> Result<(), HandoffError>;
}

#[derive(Debug, thiserror::Error)]
pub enum HandoffError {
    #[error("hand-off transport unavailable: {0}")]
    Transport(String),
}

/// Hand-off that only records the intake in the service log.
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingHandoff;

impl IntakeHandoff for LoggingHandoff {
    fn hand_off(&self, intake: FinalizedIntake) -> Result<(), HandoffError> {
        let confirmation = intake.confirmation();
        info!(
            kind = confirmation.kind.label(),
            reference = %confirmation.reference,
            "intake finalized"
        );
        Ok(())
    }
}

pub(crate) fn dispatch<H>(handoff: &H, intake: FinalizedIntake)
where
    H: IntakeHandoff + ?Sized,
{
    let reference = intake.confirmation().reference.clone();
    if let Err(err) = handoff.hand_off(intake) {
        tracing::warn!(%reference, error = %err, "intake hand-off failed");
    }
}
