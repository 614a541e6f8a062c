//! Session provider backed by a `tokio::sync::watch` channel.

use tokio::sync::watch;
use tracing::debug;

use crate::domain::Session;
use crate::domain::ports::SessionProvider;

/// Holds the latest session and notifies observers when it changes.
///
/// Starts in [`Session::Loading`]; the identity integration calls
/// [`WatchSessionProvider::resolve`] once the session is known.
pub struct WatchSessionProvider {
    sender: watch::Sender<Session>,
}

impl Default for WatchSessionProvider {
    fn default() -> Self {
        Self::new(Session::Loading)
    }
}

impl WatchSessionProvider {
    /// Create a provider holding `initial`.
    pub fn new(initial: Session) -> Self {
        let (sender, _) = watch::channel(initial);
        Self { sender }
    }

    /// Publish a new session snapshot.
    pub fn resolve(&self, session: Session) {
        debug!(signed_in = session.is_signed_in(), "session resolved");
        self.sender.send_replace(session);
    }
}

impl SessionProvider for WatchSessionProvider {
    fn current(&self) -> Session {
        self.sender.borrow().clone()
    }

    fn subscribe(&self) -> watch::Receiver<Session> {
        self.sender.subscribe()
    }
}
