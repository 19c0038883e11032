use crate::Result;
use parking_lot::Mutex;
use std::sync::Arc;

use super::session::{CallConfig, CallProvider, CallSession};

/// Holds the single active call session for a process.
///
/// Share one registry (behind an `Arc`) between every transport that may
/// create sessions. Creating a session destroys the previous one first, so
/// two calls never overlap.
pub struct SessionRegistry {
    provider: Arc<dyn CallProvider>,
    active: Mutex<Option<Arc<dyn CallSession>>>,
}

impl SessionRegistry {
    #[must_use]
    pub fn new(provider: Arc<dyn CallProvider>) -> Self {
        Self {
            provider,
            active: Mutex::new(None),
        }
    }

    /// Destroy any active session, then create and register a new one.
    ///
    /// # Errors
    /// Returns an error if destroying the stale session or creating the new
    /// one fails. The stale session is unregistered either way.
    pub async fn create(&self, config: CallConfig) -> Result<Arc<dyn CallSession>> {
        let stale = self.active.lock().take();
        if let Some(stale) = stale {
            tracing::debug!("Destroying stale call session before creating a new one");
            stale.destroy().await?;
        }

        let session = self.provider.create_session(config)?;
        *self.active.lock() = Some(Arc::clone(&session));
        Ok(session)
    }

    /// Destroy `session` and unregister it if it is the active one.
    ///
    /// # Errors
    /// Returns an error if the session fails to shut down.
    pub async fn destroy(&self, session: &Arc<dyn CallSession>) -> Result<()> {
        {
            let mut active = self.active.lock();
            if active.as_ref().is_some_and(|current| same_session(current, session)) {
                *active = None;
            }
        }
        session.destroy().await
    }

    #[must_use]
    pub fn active(&self) -> Option<Arc<dyn CallSession>> {
        self.active.lock().clone()
    }

    #[must_use]
    pub fn is_active(&self, session: &Arc<dyn CallSession>) -> bool {
        self.active
            .lock()
            .as_ref()
            .is_some_and(|current| same_session(current, session))
    }
}

impl std::fmt::Debug for SessionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionRegistry")
            .field("active", &self.active.lock().is_some())
            .finish_non_exhaustive()
    }
}

fn same_session(a: &Arc<dyn CallSession>, b: &Arc<dyn CallSession>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}
