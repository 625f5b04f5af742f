//! Auth collaborator port.
//!
//! The core never validates credentials itself; it asks the auth
//! collaborator for the current user and reacts to session changes
//! (fetch-on-login, clear-on-logout).

use std::future::Future;

use tokio::sync::broadcast;

use crate::domain::UserId;
use crate::error::Result;

/// Session lifecycle notifications.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// A user signed in and owns the records from now on.
    SignedIn(UserId),
    /// The session ended; cached data must be cleared.
    SignedOut,
}

/// Trait for authentication providers.
pub trait AuthProvider: Send + Sync {
    /// The currently signed-in user, if any.
    fn current_user(&self) -> Option<UserId>;

    /// Sign in with credentials. Resolves to the signed-in user.
    fn sign_in(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserId>> + Send;

    /// Create an account and sign in. Resolves to the new user.
    fn sign_up(
        &self,
        email: &str,
        password: &str,
    ) -> impl Future<Output = Result<UserId>> + Send;

    /// End the current session.
    fn sign_out(&self) -> impl Future<Output = Result<()>> + Send;

    /// Subscribe to session change notifications.
    fn subscribe(&self) -> broadcast::Receiver<SessionEvent>;
}
