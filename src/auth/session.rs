use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use tokio::sync::broadcast;
use tracing::debug;

/// Capacity of the logout broadcast channel. The protocol produces at most
/// one notification per session termination, so a small buffer suffices.
const LOGOUT_CHANNEL_CAPACITY: usize = 4;

/// Process-local record of the current access token.
///
/// Exactly one writer (the API client) and any number of readers share a
/// `Session` behind an `Arc`. The token lives only in memory; nothing is
/// persisted to disk. The lock is never held across an await point.
pub struct Session {
    token: RwLock<Option<TokenState>>,
    logout_tx: broadcast::Sender<()>,
}

#[derive(Debug, Clone)]
struct TokenState {
    token: String,
    set_at: DateTime<Utc>,
}

impl Session {
    pub fn new() -> Self {
        let (logout_tx, _) = broadcast::channel(LOGOUT_CHANNEL_CAPACITY);
        Self {
            token: RwLock::new(None),
            logout_tx,
        }
    }

    /// Replace the session token. Idempotent.
    pub fn set_token(&self, token: impl Into<String>) {
        *self.token.write() = Some(TokenState {
            token: token.into(),
            set_at: Utc::now(),
        });
    }

    /// Drop the session token. Idempotent; subsequent requests are sent
    /// without an Authorization header until a new token is set.
    pub fn clear_token(&self) {
        *self.token.write() = None;
    }

    /// Snapshot of the current token, if any.
    pub fn token(&self) -> Option<String> {
        self.token.read().as_ref().map(|s| s.token.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.read().is_some()
    }

    /// How long ago the current token was installed. Informational only;
    /// tokens are not proactively expired on a timer, the client relies on
    /// reactive 401 detection.
    pub fn token_age(&self) -> Option<chrono::Duration> {
        self.token.read().as_ref().map(|s| Utc::now() - s.set_at)
    }

    /// Register a logout observer. Every live subscriber receives one
    /// notification per session termination.
    pub fn subscribe(&self) -> broadcast::Receiver<()> {
        self.logout_tx.subscribe()
    }

    /// Clear the token and notify observers that the session has ended.
    /// Invoked only when a token refresh fails terminally.
    pub(crate) fn end_session(&self) {
        self.clear_token();
        debug!("session ended, notifying logout observers");
        // Err here means no live subscribers, which is fine.
        let _ = self.logout_tx.send(());
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_clear_returns_to_initial_state() {
        let session = Session::new();
        assert!(!session.is_authenticated());

        session.set_token("abc");
        assert_eq!(session.token().as_deref(), Some("abc"));
        assert!(session.token_age().is_some());

        session.clear_token();
        assert!(!session.is_authenticated());
        assert_eq!(session.token(), None);
        assert!(session.token_age().is_none());

        // Clearing again is a no-op
        session.clear_token();
        assert!(!session.is_authenticated());
    }

    #[test]
    fn set_token_replaces_previous_value() {
        let session = Session::new();
        session.set_token("first");
        session.set_token("second");
        assert_eq!(session.token().as_deref(), Some("second"));
    }

    #[test]
    fn end_session_notifies_each_subscriber_once() {
        let session = Session::new();
        let mut rx_a = session.subscribe();
        let mut rx_b = session.subscribe();

        session.set_token("abc");
        session.end_session();

        assert!(session.token().is_none());
        assert!(rx_a.try_recv().is_ok());
        assert!(rx_a.try_recv().is_err());
        assert!(rx_b.try_recv().is_ok());
    }

    #[test]
    fn end_session_without_subscribers_does_not_panic() {
        let session = Session::new();
        session.set_token("abc");
        session.end_session();
        assert!(session.token().is_none());
    }
}
