use serde::{Deserialize, Serialize};

pub const AGREEMENT_TITLE: &str = "Engineer Registration Agreement";

/// Full agreement text presented before a registration can be finalized.
pub const AGREEMENT_TEXT: &str = include_str!("engineer_agreement.txt");

/// Decision recorded against the engineer agreement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AgreementStatus {
    #[default]
    Unset,
    Agreed,
    Declined,
}

/// Errors raised when a transition is requested that the gate does not allow.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AgreementError {
    #[error("the agreement has already been accepted")]
    AlreadyAgreed,
}

/// Gate that registration finalization waits on.
///
/// `presenting` tracks whether the view should currently show the agreement. It changes on its
/// own (`reopen`, `dismiss`, or a submit that needs a decision) while the status only changes
/// through `accept`/`decline`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AgreementGate {
    status: AgreementStatus,
    presenting: bool,
}

impl AgreementGate {
    pub fn current_status(&self) -> AgreementStatus {
        self.status
    }

    pub fn is_presenting(&self) -> bool {
        self.presenting
    }

    pub fn accept(&mut self) -> AgreementStatus {
        self.status = AgreementStatus::Agreed;
        self.presenting = false;
        self.status
    }

    pub fn decline(&mut self) -> Result<AgreementStatus, AgreementError> {
        self.ensure_open()?;
        self.status = AgreementStatus::Declined;
        self.presenting = false;
        Ok(self.status)
    }

    /// Present the agreement again without touching the recorded decision.
    pub fn reopen(&mut self) -> Result<(), AgreementError> {
        self.ensure_open()?;
        self.presenting = true;
        Ok(())
    }

    /// Close the presentation without deciding.
    pub fn dismiss(&mut self) {
        self.presenting = false;
    }

    pub(crate) fn present(&mut self) {
        if self.status != AgreementStatus::Agreed {
            self.presenting = true;
        }
    }

    pub fn notice(&self) -> &'static str {
        match self.status {
            AgreementStatus::Unset => concat!(
                "By submitting, you'll be asked to review and agree to the ",
                "Engineer Registration Agreement."
            ),
            AgreementStatus::Agreed => "You have agreed to the Engineer Registration Agreement.",
            AgreementStatus::Declined => "You must agree to the terms to register.",
        }
    }

    pub fn view(&self) -> AgreementView {
        AgreementView {
            status: self.status,
            presenting: self.presenting,
            notice: self.notice(),
        }
    }

    fn ensure_open(&self) -> Result<(), AgreementError> {
        if self.status == AgreementStatus::Agreed {
            return Err(AgreementError::AlreadyAgreed);
        }
        Ok(())
    }
}

/// Observable gate state rendered by the view layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AgreementView {
    pub status: AgreementStatus,
    pub presenting: bool,
    pub notice: &'static str,
}
