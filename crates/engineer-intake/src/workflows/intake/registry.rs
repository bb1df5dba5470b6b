use std::collections::HashMap;
use std::fmt;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use serde::{Deserialize, Serialize};

use super::error::IntakeServiceError;

/// Opaque identifier handed to the view layer for one form interaction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SessionId(pub String);

impl SessionId {
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Session state paired with the id the view layer uses to address it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionView<T> {
    pub session_id: SessionId,
    #[serde(flatten)]
    pub state: T,
}

/// Ephemeral sessions keyed by id. Each closure runs with exclusive access to one session and
/// must not await; the lock is never held across the geocoding round trip.
pub struct SessionRegistry<S> {
    sessions: Mutex<HashMap<SessionId, Entry<S>>>,
}

struct Entry<S> {
    session: S,
    touched: Instant,
}

impl<S> Default for SessionRegistry<S> {
    fn default() -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
        }
    }
}

impl<S> SessionRegistry<S> {
    pub fn insert(&self, session: S) -> SessionId {
        let id = SessionId::generate();
        let entry = Entry {
            session,
            touched: Instant::now(),
        };
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .insert(id.clone(), entry);
        id
    }

    pub fn with<T>(
        &self,
        id: &SessionId,
        apply: impl FnOnce(&mut S) -> T,
    ) -> Result<T, IntakeServiceError> {
        let mut guard = self.sessions.lock().expect("session registry mutex poisoned");
        let entry = guard
            .get_mut(id)
            .ok_or_else(|| IntakeServiceError::SessionNotFound(id.clone()))?;
        entry.touched = Instant::now();
        Ok(apply(&mut entry.session))
    }

    pub fn remove(&self, id: &SessionId) -> Result<S, IntakeServiceError> {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .remove(id)
            .map(|entry| entry.session)
            .ok_or_else(|| IntakeServiceError::SessionNotFound(id.clone()))
    }

    /// Drop every session nobody has touched for at least `max_idle`. Returns how many went.
    pub fn evict_idle(&self, max_idle: Duration) -> usize {
        let mut guard = self.sessions.lock().expect("session registry mutex poisoned");
        let before = guard.len();
        guard.retain(|_, entry| entry.touched.elapsed() < max_idle);
        before - guard.len()
    }

    pub fn len(&self) -> usize {
        self.sessions
            .lock()
            .expect("session registry mutex poisoned")
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
