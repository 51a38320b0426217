use tokio::sync::broadcast;

/// Session lifecycle notifications published by the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Login or registration stored a new session.
    Established,
    /// A new access token was obtained with the refresh token.
    Refreshed,
    /// The user logged out.
    LoggedOut,
    /// An unrecoverable 401 cleared the session; the user must log in again.
    Invalidated,
}

/// Broadcast channel the hosting application subscribes to.
#[derive(Debug, Clone)]
pub struct SessionEvents {
    sender: broadcast::Sender<SessionEvent>,
}

impl SessionEvents {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.sender.subscribe()
    }

    pub fn emit(&self, event: SessionEvent) {
        tracing::debug!(?event, "session event");
        // No subscribers is fine
        let _ = self.sender.send(event);
    }
}

impl Default for SessionEvents {
    fn default() -> Self {
        Self::new(16)
    }
}
