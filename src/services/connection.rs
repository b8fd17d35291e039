use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tracing::{info, warn};

use crate::services::{error::StorageError, retry::RetryPolicy, transport::StorageTransport};

/// Live authenticated handle to the storage backend. Read-only from the
/// executor's perspective except for the validity flag, so concurrent
/// transfers may share one Session without locking.
#[derive(Debug)]
pub struct Session {
    token: String,
    established_at: DateTime<Utc>,
    valid: AtomicBool,
}

impl Session {
    fn new(token: String) -> Self {
        Self {
            token,
            established_at: Utc::now(),
            valid: AtomicBool::new(true),
        }
    }

    pub fn token(&self) -> &str {
        &self.token
    }

    pub fn established_at(&self) -> DateTime<Utc> {
        self.established_at
    }

    pub fn is_valid(&self) -> bool {
        self.valid.load(Ordering::Acquire)
    }

    /// Single atomic transition; once dead, every holder observes it.
    fn invalidate(&self) {
        self.valid.store(false, Ordering::Release);
    }
}

/// Owns the one shared Session and serializes its establishment. Concurrent
/// callers waiting on a session block on the cache lock and then observe the
/// result of the one in-flight attempt instead of issuing their own.
pub struct ConnectionManager {
    transport: Arc<dyn StorageTransport>,
    policy: RetryPolicy,
    connect_timeout: Duration,
    session: tokio::sync::Mutex<Option<Arc<Session>>>,
}

impl ConnectionManager {
    pub fn new(
        transport: Arc<dyn StorageTransport>,
        policy: RetryPolicy,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            policy,
            connect_timeout,
            session: tokio::sync::Mutex::new(None),
        }
    }

    /// Returns the cached Session if still valid, otherwise establishes a
    /// new one under the retry policy. Callers never observe a stale
    /// Session as valid.
    pub async fn get_session(&self) -> Result<Arc<Session>, StorageError> {
        let mut cached = self.session.lock().await;

        if let Some(session) = cached.as_ref() {
            if session.is_valid() {
                return Ok(Arc::clone(session));
            }
        }
        *cached = None;

        let session = Arc::new(self.establish().await?);
        *cached = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Marks the Session dead and drops it from the cache so the next
    /// `get_session` re-establishes instead of reusing a dead handle.
    pub async fn invalidate(&self, session: &Session) {
        session.invalidate();
        let age_ms = (Utc::now() - session.established_at()).num_milliseconds();
        warn!(session_age_ms = age_ms, "Storage session invalidated");
        let mut cached = self.session.lock().await;
        if let Some(current) = cached.as_ref() {
            if !current.is_valid() {
                *cached = None;
            }
        }
    }

    async fn establish(&self) -> Result<Session, StorageError> {
        let mut attempts = 0u32;
        loop {
            attempts += 1;

            let result = match tokio::time::timeout(self.connect_timeout, self.transport.connect())
                .await
            {
                Ok(result) => result,
                Err(_) => Err(StorageError::Timeout),
            };

            match result {
                Ok(token) => {
                    info!(attempts, "Storage session established");
                    return Ok(Session::new(token));
                }
                Err(e) if e.is_transient() && self.policy.has_attempts_left(attempts) => {
                    let delay = self.policy.backoff_delay(attempts);
                    warn!(
                        attempt = attempts,
                        delay_ms = delay.as_millis() as u64,
                        error = %e,
                        "Session establishment failed, retrying"
                    );
                    tokio::time::sleep(delay).await;
                }
                Err(e) if e.is_transient() => {
                    return Err(StorageError::RetriesExhausted {
                        attempts,
                        last: Box::new(e),
                    });
                }
                Err(e) => {
                    warn!(attempt = attempts, error = %e, "Session establishment rejected");
                    return Err(e);
                }
            }
        }
    }
}
