use tokio::sync::broadcast;

/// Process-wide authentication signals. The transport emits these; the
/// core never consumes them. Listener ordering is unspecified.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthEvent {
    /// Credentials were invalidated (401 observed); navigation and route
    /// guards should return the user to the login flow.
    LoggedOut,
}

#[derive(Clone)]
pub struct AuthEvents {
    tx: broadcast::Sender<AuthEvent>,
}

impl Default for AuthEvents {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthEvents {
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(16);
        Self { tx }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AuthEvent> {
        self.tx.subscribe()
    }

    pub fn emit(&self, event: AuthEvent) {
        // No receivers is fine; nothing to notify
        let _ = self.tx.send(event);
    }
}
