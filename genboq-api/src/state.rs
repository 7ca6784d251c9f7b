use crate::error::{ApiError, ApiResult};
use genboq_core::{BoqGenerator, ExchangeRates, RequestTicket, Session};
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};
use std::time::{Duration, Instant, SystemTime};
use uuid::Uuid;

pub type SharedSession = Arc<Mutex<Session>>;

pub struct AppState {
    pub generator: Arc<BoqGenerator>,
    pub sessions: SessionRegistry,
    rates: RwLock<ExchangeRates>,
    pub start_time: SystemTime,
}

impl AppState {
    pub fn new(generator: BoqGenerator) -> Self {
        Self::with_session_ttl(generator, None)
    }

    pub fn with_session_ttl(generator: BoqGenerator, idle_ttl: Option<Duration>) -> Self {
        Self {
            generator: Arc::new(generator),
            sessions: SessionRegistry::with_idle_ttl(idle_ttl),
            rates: RwLock::new(ExchangeRates::pending()),
            start_time: SystemTime::now(),
        }
    }

    pub fn rates(&self) -> ApiResult<ExchangeRates> {
        self.rates
            .read()
            .map(|r| r.clone())
            .map_err(|e| ApiError::Internal(format!("Failed to acquire rates lock: {e}")))
    }

    /// Stores the resolved rates and pushes them into every open session
    pub fn install_rates(&self, rates: ExchangeRates) -> ApiResult<()> {
        {
            let mut cached = self
                .rates
                .write()
                .map_err(|e| ApiError::Internal(format!("Failed to acquire rates lock: {e}")))?;
            *cached = rates.clone();
        }

        for session in self.sessions.all()? {
            lock_session(&session)?.install_rates(rates.clone());
        }
        Ok(())
    }

    pub fn create_session(&self) -> ApiResult<(String, SharedSession)> {
        self.sessions.create(|| self.rates())
    }
}

struct RegistryEntry {
    session: SharedSession,
    last_access: Instant,
}

/// Open sessions by id. Neither lock is held across an await.
#[derive(Default)]
pub struct SessionRegistry {
    sessions: RwLock<HashMap<String, RegistryEntry>>,
    idle_ttl: Option<Duration>,
}

impl SessionRegistry {
    /// Sessions idle for longer than `idle_ttl` are discarded by [`SessionRegistry::sweep`]
    pub fn with_idle_ttl(idle_ttl: Option<Duration>) -> Self {
        Self {
            sessions: RwLock::default(),
            idle_ttl,
        }
    }

    fn create(
        &self,
        rates: impl FnOnce() -> ApiResult<ExchangeRates>,
    ) -> ApiResult<(String, SharedSession)> {
        self.sweep(Instant::now())?;
        let mut sessions = self.write()?;
        // Rates are read under the registry lock so a concurrent install cannot miss this session
        let session = Arc::new(Mutex::new(Session::with_rates(rates()?)));
        let id = Uuid::new_v4().to_string();
        sessions.insert(
            id.clone(),
            RegistryEntry {
                session: session.clone(),
                last_access: Instant::now(),
            },
        );
        tracing::info!(session_id = %id, "Session created");
        Ok((id, session))
    }

    /// Looks up a session and marks it as used
    pub fn get(&self, id: &str) -> ApiResult<SharedSession> {
        let mut sessions = self.write()?;
        let entry = sessions
            .get_mut(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        entry.last_access = Instant::now();
        Ok(entry.session.clone())
    }

    /// Removes the session; an outstanding call's result will be discarded
    pub fn remove(&self, id: &str) -> ApiResult<()> {
        let entry = self
            .write()?
            .remove(id)
            .ok_or_else(|| ApiError::SessionNotFound(id.to_string()))?;
        lock_session(&entry.session)?.abandon_request();
        tracing::info!(session_id = %id, "Session deleted");
        Ok(())
    }

    /// Drops sessions idle past the TTL as of `now`. Busy sessions are kept.
    pub fn sweep(&self, now: Instant) -> ApiResult<usize> {
        let Some(ttl) = self.idle_ttl else {
            return Ok(0);
        };

        let mut sessions = self.write()?;
        let before = sessions.len();
        sessions.retain(|id, entry| {
            if now.saturating_duration_since(entry.last_access) <= ttl {
                return true;
            }
            let busy = match entry.session.try_lock() {
                Ok(session) => session.is_busy(),
                Err(_) => true,
            };
            if !busy {
                tracing::info!(session_id = %id, "Session expired");
            }
            busy
        });
        Ok(before - sessions.len())
    }

    pub fn all(&self) -> ApiResult<Vec<SharedSession>> {
        Ok(self
            .sessions
            .read()
            .map_err(|e| ApiError::Internal(format!("Failed to acquire sessions lock: {e}")))?
            .values()
            .map(|entry| entry.session.clone())
            .collect())
    }

    pub fn len(&self) -> usize {
        self.sessions.read().map(|s| s.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn write(&self) -> ApiResult<std::sync::RwLockWriteGuard<'_, HashMap<String, RegistryEntry>>> {
        self.sessions
            .write()
            .map_err(|e| ApiError::Internal(format!("Failed to acquire sessions lock: {e}")))
    }
}

pub fn lock_session(session: &Mutex<Session>) -> ApiResult<MutexGuard<'_, Session>> {
    session
        .lock()
        .map_err(|e| ApiError::Internal(format!("Failed to acquire session lock: {e}")))
}

/// Releases the session's in-flight marker if the handler is dropped before completing
pub struct InFlightGuard {
    session: SharedSession,
    ticket: RequestTicket,
    armed: bool,
}

impl InFlightGuard {
    pub fn new(session: SharedSession, ticket: RequestTicket) -> Self {
        Self {
            session,
            ticket,
            armed: true,
        }
    }

    pub fn ticket(&self) -> RequestTicket {
        self.ticket
    }

    pub fn disarm(&mut self) {
        self.armed = false;
    }
}

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut session) = self.session.lock() {
            tracing::warn!("Request dropped before completion, releasing session");
            session.release_request(self.ticket);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use genboq_core::GenerationSettings;
    use genboq_llm_sdk::client::LlmClient;
    use genboq_llm_sdk::error::LlmError;
    use genboq_llm_sdk::types::{CompletionRequest, CompletionResponse};
    use shared_types::Currency;

    struct UnusedClient;

    #[async_trait::async_trait]
    impl LlmClient for UnusedClient {
        async fn complete(&self, _: CompletionRequest) -> Result<CompletionResponse, LlmError> {
            Err(LlmError::internal("not used"))
        }

        fn provider_name(&self) -> &str {
            "unused"
        }

        fn model_name(&self) -> &str {
            "unused"
        }
    }

    fn generator() -> BoqGenerator {
        let client: Arc<dyn LlmClient> = Arc::new(UnusedClient);
        BoqGenerator::new(client, GenerationSettings::default())
    }

    fn state() -> AppState {
        AppState::new(generator())
    }

    #[test]
    fn test_install_rates_reaches_existing_sessions() {
        let state = state();
        let (_, before) = state.create_session().unwrap();
        assert!(!lock_session(&before).unwrap().rates().is_loaded());

        state.install_rates(ExchangeRates::identity()).unwrap();

        assert!(lock_session(&before).unwrap().rates().is_loaded());
        let (_, after) = state.create_session().unwrap();
        assert!(lock_session(&after).unwrap().rates().is_loaded());
        lock_session(&after).unwrap().set_currency(Currency::Eur).unwrap();
    }

    #[test]
    fn test_remove_session() {
        let state = state();
        let (id, _) = state.create_session().unwrap();
        assert_eq!(state.sessions.len(), 1);

        state.sessions.remove(&id).unwrap();
        assert!(state.sessions.is_empty());
        assert!(matches!(
            state.sessions.get(&id),
            Err(ApiError::SessionNotFound(_))
        ));
        assert!(matches!(
            state.sessions.remove(&id),
            Err(ApiError::SessionNotFound(_))
        ));
    }

    #[test]
    fn test_guard_releases_dropped_request() {
        let state = state();
        let (_, session) = state.create_session().unwrap();
        let ticket = lock_session(&session).unwrap().begin_request().unwrap();

        drop(InFlightGuard::new(session.clone(), ticket));
        assert!(!lock_session(&session).unwrap().is_busy());

        let ticket = lock_session(&session).unwrap().begin_request().unwrap();
        let mut guard = InFlightGuard::new(session.clone(), ticket);
        guard.disarm();
        drop(guard);
        assert!(lock_session(&session).unwrap().is_busy());
    }

    #[test]
    fn test_sweep_discards_idle_sessions() {
        let state = AppState::with_session_ttl(generator(), Some(Duration::from_secs(60)));
        let (idle, _) = state.create_session().unwrap();
        let (busy, busy_session) = state.create_session().unwrap();
        lock_session(&busy_session).unwrap().begin_request().unwrap();

        assert_eq!(state.sessions.sweep(Instant::now()).unwrap(), 0);
        assert_eq!(state.sessions.len(), 2);

        let later = Instant::now() + Duration::from_secs(61);
        assert_eq!(state.sessions.sweep(later).unwrap(), 1);
        assert!(matches!(
            state.sessions.get(&idle),
            Err(ApiError::SessionNotFound(_))
        ));
        assert!(state.sessions.get(&busy).is_ok());
    }

    #[test]
    fn test_sweep_without_ttl_keeps_sessions() {
        let state = state();
        state.create_session().unwrap();
        let far_future = Instant::now() + Duration::from_secs(365 * 24 * 60 * 60);
        assert_eq!(state.sessions.sweep(far_future).unwrap(), 0);
        assert_eq!(state.sessions.len(), 1);
    }
}
