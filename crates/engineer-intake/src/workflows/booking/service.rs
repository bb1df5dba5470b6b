use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info};

use crate::workflows::intake::handoff::{dispatch, FinalizedIntake, IntakeHandoff};
use crate::workflows::intake::{
    BookingField, BookingSession, BookingSnapshot, DeviceLocator, IntakeServiceError,
    LocationResolution, LocationResolver, LocationTicket, ReverseGeocoder, SessionId,
    SessionRegistry, SessionView, SubmissionOutcome,
};

pub type BookingView = SessionView<BookingSnapshot>;

/// What happened to a location request.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "request", rename_all = "snake_case")]
pub enum LocationRequestOutcome {
    /// The resolution finished and was applied to the booking.
    Applied {
        resolution: LocationResolution,
        session: BookingView,
    },
    /// Another request was already in flight, or the booking is submitted.
    Ignored { session: BookingView },
    /// The booking ended or was reset while the lookup was running.
    Discarded { resolution: LocationResolution },
}

/// Service owning live booking sessions and the location resolver they share.
pub struct BookingService<G, H> {
    sessions: SessionRegistry<BookingSession>,
    resolver: LocationResolver<G>,
    handoff: Arc<H>,
}

impl<G, H> BookingService<G, H>
where
    G: ReverseGeocoder + 'static,
    H: IntakeHandoff + 'static,
{
    pub fn new(geocoder: G, handoff: Arc<H>) -> Self {
        Self {
            sessions: SessionRegistry::default(),
            resolver: LocationResolver::new(geocoder),
            handoff,
        }
    }

    pub fn open(&self) -> BookingView {
        let session = BookingSession::new();
        let state = session.snapshot();
        let session_id = self.sessions.insert(session);
        info!(%session_id, "booking session opened");
        SessionView { session_id, state }
    }

    pub fn view(&self, id: &SessionId) -> Result<BookingView, IntakeServiceError> {
        self.snapshot(id)
    }

    pub fn change_field(
        &self,
        id: &SessionId,
        field: &str,
        value: &str,
    ) -> Result<BookingView, IntakeServiceError> {
        self.sessions
            .with(id, |session| session.on_named_field_change(field, value))??;
        self.snapshot(id)
    }

    /// Resolve the device position and write the address into the booking's location field.
    /// The session is only locked before and after the lookup, never across it.
    pub async fn request_location(
        &self,
        id: &SessionId,
        locator: &dyn DeviceLocator,
    ) -> Result<LocationRequestOutcome, IntakeServiceError> {
        let ticket = match self.sessions.with(id, BookingSession::begin_location_request)? {
            Some(ticket) => ticket,
            None => {
                debug!(session_id = %id, "location request ignored");
                return Ok(LocationRequestOutcome::Ignored {
                    session: self.snapshot(id)?,
                });
            }
        };

        let mut pending = PendingLocation {
            sessions: &self.sessions,
            id,
            ticket,
            settled: false,
        };
        let resolution = self.resolver.resolve(locator).await;
        pending.settled = true;

        let applied = match self
            .sessions
            .with(id, |session| session.complete_location_request(ticket, &resolution))
        {
            Ok(applied) => applied,
            Err(IntakeServiceError::SessionNotFound(_)) => false,
            Err(other) => return Err(other),
        };

        if !applied {
            debug!(session_id = %id, "location result discarded");
            return Ok(LocationRequestOutcome::Discarded { resolution });
        }

        Ok(LocationRequestOutcome::Applied {
            resolution,
            session: self.snapshot(id)?,
        })
    }

    /// Run the submission checks. The hand-off fires only on the first successful submit.
    pub fn submit(
        &self,
        id: &SessionId,
        today: NaiveDate,
    ) -> Result<SubmissionOutcome<BookingField>, IntakeServiceError> {
        let (outcome, finalized) = self.sessions.with(id, |session| {
            let already_submitted = session.confirmation().is_some();
            let outcome = session.on_submit(today);
            let finalized = match (&outcome, already_submitted) {
                (SubmissionOutcome::Submitted(confirmation), false) => {
                    Some(FinalizedIntake::Booking {
                        form: session.form().clone(),
                        confirmation: confirmation.clone(),
                    })
                }
                _ => None,
            };
            (outcome, finalized)
        })?;

        info!(session_id = %id, outcome = outcome.label(), "booking submit attempted");
        if let Some(intake) = finalized {
            dispatch(self.handoff.as_ref(), intake);
        }
        Ok(outcome)
    }

    pub fn book_another(&self, id: &SessionId) -> Result<BookingView, IntakeServiceError> {
        self.sessions.with(id, BookingSession::book_another)??;
        self.snapshot(id)
    }

    /// Forget sessions left idle for at least `max_idle`, such as forms a client abandoned.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let evicted = self.sessions.evict_idle(max_idle);
        if evicted > 0 {
            info!(evicted, "idle booking sessions evicted");
        }
        evicted
    }

    pub fn close(&self, id: &SessionId) -> Result<(), IntakeServiceError> {
        self.sessions.remove(id)?;
        info!(session_id = %id, "booking session closed");
        Ok(())
    }

    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    fn snapshot(&self, id: &SessionId) -> Result<BookingView, IntakeServiceError> {
        let state = self.sessions.with(id, |session| session.snapshot())?;
        Ok(SessionView {
            session_id: id.clone(),
            state,
        })
    }
}

/// Held across the lookup so a request whose future is dropped mid-flight hands the location
/// field back to manual entry.
struct PendingLocation<'a> {
    sessions: &'a SessionRegistry<BookingSession>,
    id: &'a SessionId,
    ticket: LocationTicket,
    settled: bool,
}

impl Drop for PendingLocation<'_> {
    fn drop(&mut self) {
        if self.settled || std::thread::panicking() {
            return;
        }
        let ticket = self.ticket;
        if let Ok(true) = self
            .sessions
            .with(self.id, |session| session.abandon_location_request(ticket))
        {
            debug!(session_id = %self.id, "location request abandoned");
        }
    }
}
