//! Port for observing the authenticated session.

use tokio::sync::watch;

use crate::domain::Session;

/// Source of session snapshots owned by the identity provider.
#[cfg_attr(test, mockall::automock)]
pub trait SessionProvider: Send + Sync {
    /// Latest session snapshot.
    fn current(&self) -> Session;

    /// Receiver notified whenever the session changes.
    fn subscribe(&self) -> watch::Receiver<Session>;
}
