use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::workflows::intake::handoff::{dispatch, FinalizedIntake, IntakeHandoff};
use crate::workflows::intake::{
    AttachmentCheck, FileAttachmentGuard, FileDescriptor, IntakeServiceError, RegistrationField,
    RegistrationSession, RegistrationSnapshot, SessionError, SessionId, SessionRegistry,
    SessionView, SubmissionOutcome,
};

pub type RegistrationView = SessionView<RegistrationSnapshot>;

/// Service owning live engineer registrations.
pub struct RegistrationService<H> {
    sessions: SessionRegistry<RegistrationSession>,
    guard: FileAttachmentGuard,
    handoff: Arc<H>,
}

impl<H> RegistrationService<H>
where
    H: IntakeHandoff + 'static,
{
    pub fn new(handoff: Arc<H>) -> Self {
        Self::with_guard(FileAttachmentGuard::default(), handoff)
    }

    pub fn with_guard(guard: FileAttachmentGuard, handoff: Arc<H>) -> Self {
        Self {
            sessions: SessionRegistry::default(),
            guard,
            handoff,
        }
    }

    pub fn open(&self) -> RegistrationView {
        let session = RegistrationSession::with_guard(self.guard.clone());
        let state = session.snapshot();
        let session_id = self.sessions.insert(session);
        info!(%session_id, "registration session opened");
        SessionView { session_id, state }
    }

    pub fn view(&self, id: &SessionId) -> Result<RegistrationView, IntakeServiceError> {
        self.snapshot(id)
    }

    pub fn change_field(
        &self,
        id: &SessionId,
        field: &str,
        value: &str,
    ) -> Result<RegistrationView, IntakeServiceError> {
        self.sessions
            .with(id, |session| session.on_named_field_change(field, value))??;
        self.snapshot(id)
    }

    pub fn select_file(
        &self,
        id: &SessionId,
        file: FileDescriptor,
    ) -> Result<(AttachmentCheck, RegistrationView), IntakeServiceError> {
        let check = self
            .sessions
            .with(id, |session| session.on_file_selected(file))??;
        if let AttachmentCheck::Rejected { rejection, .. } = &check {
            warn!(session_id = %id, ?rejection, "degree certificate rejected");
        }
        Ok((check, self.snapshot(id)?))
    }

    pub fn remove_file(&self, id: &SessionId) -> Result<RegistrationView, IntakeServiceError> {
        self.sessions
            .with(id, RegistrationSession::remove_attachment)??;
        self.snapshot(id)
    }

    pub fn accept_agreement(&self, id: &SessionId) -> Result<RegistrationView, IntakeServiceError> {
        self.agreement_transition(id, |session| session.on_agreement_accept().map(|_| ()))
    }

    pub fn decline_agreement(
        &self,
        id: &SessionId,
    ) -> Result<RegistrationView, IntakeServiceError> {
        self.agreement_transition(id, |session| session.on_agreement_decline().map(|_| ()))
    }

    pub fn reopen_agreement(&self, id: &SessionId) -> Result<RegistrationView, IntakeServiceError> {
        self.agreement_transition(id, RegistrationSession::reopen_agreement)
    }

    pub fn dismiss_agreement(
        &self,
        id: &SessionId,
    ) -> Result<RegistrationView, IntakeServiceError> {
        self.agreement_transition(id, RegistrationSession::dismiss_agreement)
    }

    /// Run the submission checks. The hand-off fires only on the first successful submit.
    pub fn submit(
        &self,
        id: &SessionId,
    ) -> Result<SubmissionOutcome<RegistrationField>, IntakeServiceError> {
        let (outcome, finalized) = self.sessions.with(id, |session| {
            let already_submitted = session.confirmation().is_some();
            let outcome = session.on_submit();
            let finalized = match (&outcome, already_submitted, session.degree_document()) {
                (SubmissionOutcome::Submitted(confirmation), false, Some(document)) => {
                    Some(FinalizedIntake::Registration {
                        form: session.form().clone(),
                        degree_document: document.clone(),
                        confirmation: confirmation.clone(),
                    })
                }
                _ => None,
            };
            (outcome, finalized)
        })?;

        info!(session_id = %id, outcome = outcome.label(), "registration submit attempted");
        if let Some(intake) = finalized {
            dispatch(self.handoff.as_ref(), intake);
        }
        Ok(outcome)
    }

    /// Forget sessions left idle for at least `max_idle`, such as forms a client abandoned.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted = self.sessions.evict_idle(max_idle);
        if evicted > 0 {
            info!(evicted, "idle registration sessions evicted");
        }
        evicted
    }

    pub fn close(&self, id: &SessionId) -> Result<(), IntakeServiceError> {
        self.sessions.remove(id)?;
        info!(session_id = %id, "registration session closed");
        Ok(())
    }

    fn agreement_transition(
        &self,
        id: &SessionId,
        transition: impl FnOnce(&mut RegistrationSession) -> Result<(), SessionError>,
    ) -> Result<RegistrationView, IntakeServiceError> {
        self.sessions.with(id, transition)??;
        let view = self.snapshot(id)?;
        info!(
            session_id = %id,
            status = ?view.state.agreement.status,
            presenting = view.state.agreement.presenting,
            "agreement updated"
        );
        Ok(view)
    }

    fn snapshot(&self, id: &SessionId) -> Result<RegistrationView, IntakeServiceError> {
        let state = self.sessions.with(id, |session| session.snapshot())?;
        Ok(SessionView {
            session_id: id.clone(),
            state,
        })
    }
}
