// session_manager.rs
use crate::config::{DEFAULT_MAX_SESSIONS, DEFAULT_SESSION_TTL_MINS};
use crate::error::TukiError;
use crate::wizard::OnboardingWizard;

use chrono::{DateTime, Utc};
use log::debug;
use std::collections::HashMap;
use std::time::Duration;
use uuid::Uuid;

struct Session {
    wizard: OnboardingWizard,
    last_seen: DateTime<Utc>,
}

/// Onboarding sessions opened through the HTTP API. Idle sessions expire and
/// the map never holds more than `max_sessions` entries.
pub struct SessionManager {
    sessions: HashMap<Uuid, Session>,
    max_sessions: usize,
    ttl: Duration,
}

impl Default for SessionManager {
    fn default() -> Self {
        Self::with_limits(
            DEFAULT_MAX_SESSIONS,
            Duration::from_secs(DEFAULT_SESSION_TTL_MINS * 60),
        )
    }
}

impl SessionManager {
    pub fn with_limits(max_sessions: usize, ttl: Duration) -> Self {
        SessionManager {
            sessions: HashMap::new(),
            max_sessions: max_sessions.max(1),
            ttl,
        }
    }

    pub fn create_session(&mut self) -> Uuid {
        self.create_session_at(Utc::now())
    }

    fn create_session_at(&mut self, now: DateTime<Utc>) -> Uuid {
        self.prune(now);
        while self.sessions.len() >= self.max_sessions {
            let oldest = self
                .sessions
                .iter()
                .min_by_key(|(_, s)| s.last_seen)
                .map(|(id, _)| *id);
            match oldest {
                Some(id) => {
                    debug!("Evicting onboarding session {}", id);
                    self.sessions.remove(&id);
                }
                None => break,
            }
        }

        let session_id = Uuid::new_v4();
        self.sessions.insert(
            session_id,
            Session {
                wizard: OnboardingWizard::start(),
                last_seen: now,
            },
        );
        session_id
    }

    pub fn get_session(&mut self, session_id: &Uuid) -> Result<&mut OnboardingWizard, TukiError> {
        self.get_session_at(session_id, Utc::now())
    }

    fn get_session_at(
        &mut self,
        session_id: &Uuid,
        now: DateTime<Utc>,
    ) -> Result<&mut OnboardingWizard, TukiError> {
        if self
            .sessions
            .get(session_id)
            .map_or(false, |s| self.is_expired(s, now))
        {
            debug!("Onboarding session {} expired", session_id);
            self.sessions.remove(session_id);
        }

        let session = self
            .sessions
            .get_mut(session_id)
            .ok_or(TukiError::SessionNotFound(*session_id))?;
        session.last_seen = now;
        Ok(&mut session.wizard)
    }

    fn is_expired(&self, session: &Session, now: DateTime<Utc>) -> bool {
        (now - session.last_seen)
            .to_std()
            .map_or(false, |idle| idle > self.ttl)
    }

    fn prune(&mut self, now: DateTime<Utc>) {
        let ttl = self.ttl;
        self.sessions.retain(|_, s| {
            (now - s.last_seen)
                .to_std()
                .map_or(true, |idle| idle <= ttl)
        });
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }
}
