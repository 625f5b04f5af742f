//! In-memory [`AuthProvider`] accepting any credentials.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::broadcast;

use crate::domain::UserId;
use crate::error::Result;
use crate::port::auth::{AuthProvider, SessionEvent};

struct Inner {
    user: RwLock<Option<UserId>>,
    tx: broadcast::Sender<SessionEvent>,
}

/// Auth stub for tests: any email/password pair signs in, with the email
/// doubling as the user ID. Clones share one session, so a test can keep
/// a handle while the service owns another.
#[derive(Clone)]
pub struct MemoryAuth {
    inner: Arc<Inner>,
}

impl MemoryAuth {
    /// Create a signed-out auth stub.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = broadcast::channel(16);
        Self {
            inner: Arc::new(Inner {
                user: RwLock::new(None),
                tx,
            }),
        }
    }

    /// Create a stub already signed in as `user`, without emitting a
    /// session event.
    #[must_use]
    pub fn signed_in(user: impl Into<String>) -> Self {
        let auth = Self::new();
        *auth.inner.user.write() = Some(UserId::new(user));
        auth
    }
}

impl Default for MemoryAuth {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthProvider for MemoryAuth {
    fn current_user(&self) -> Option<UserId> {
        self.inner.user.read().clone()
    }

    async fn sign_in(&self, email: &str, _password: &str) -> Result<UserId> {
        let user = UserId::new(email);
        *self.inner.user.write() = Some(user.clone());
        let _ = self.inner.tx.send(SessionEvent::SignedIn(user.clone()));
        Ok(user)
    }

    async fn sign_up(&self, email: &str, password: &str) -> Result<UserId> {
        self.sign_in(email, password).await
    }

    async fn sign_out(&self) -> Result<()> {
        *self.inner.user.write() = None;
        let _ = self.inner.tx.send(SessionEvent::SignedOut);
        Ok(())
    }

    fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.inner.tx.subscribe()
    }
}
