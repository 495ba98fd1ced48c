//! Session bookkeeping for the streamable HTTP transport.
//!
//! Delegates to rmcp's `LocalSessionManager` with two limits on how long a
//! session may stay in the table:
//! - a session that has not sent `initialize` within the handshake timeout
//!   is closed (rmcp opens a session before it looks at the first message);
//! - an initialized session with no traffic for the idle timeout is closed.

use futures::Stream;
use rmcp::model::{ClientJsonRpcMessage, ServerJsonRpcMessage};
use rmcp::transport::common::server_side_http::ServerSseMessage;
use rmcp::transport::streamable_http_server::session::SessionId;
use rmcp::transport::streamable_http_server::session::SessionManager;
use rmcp::transport::streamable_http_server::session::local::{
    LocalSessionManager, SessionConfig,
};
use std::collections::HashSet;
use std::future::Future;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tracing::{debug, info};

/// How long a new session may wait for its `initialize` request.
pub const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(30);

type LocalError = <LocalSessionManager as SessionManager>::Error;

pub struct GeocoderSessions {
    inner: Arc<LocalSessionManager>,
    initialized: Arc<Mutex<HashSet<SessionId>>>,
    handshake_timeout: Duration,
}

impl GeocoderSessions {
    pub fn new(idle_timeout: Duration, handshake_timeout: Duration) -> Self {
        let inner = LocalSessionManager {
            session_config: SessionConfig {
                keep_alive: Some(idle_timeout),
                ..SessionConfig::default()
            },
            ..LocalSessionManager::default()
        };

        Self {
            inner: Arc::new(inner),
            initialized: Arc::new(Mutex::new(HashSet::new())),
            handshake_timeout,
        }
    }

    fn mark(&self, id: &SessionId, initialized: bool) {
        let mut set = self
            .initialized
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if initialized {
            set.insert(id.clone());
        } else {
            set.remove(id);
        }
    }

    async fn create_session_impl(
        &self,
    ) -> Result<(SessionId, <LocalSessionManager as SessionManager>::Transport), LocalError> {
        let (id, transport) = self.inner.create_session().await?;
        debug!(session = %id, "Session opened");

        let inner = self.inner.clone();
        let initialized = self.initialized.clone();
        let deadline = self.handshake_timeout;
        let pending = id.clone();
        tokio::spawn(async move {
            tokio::time::sleep(deadline).await;
            let done = initialized
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .contains(&pending);
            if !done {
                info!(session = %pending, "Closing session that never initialized");
                let _ = inner.close_session(&pending).await;
            }
        });

        Ok((id, transport))
    }

    async fn close_session_impl(&self, id: &SessionId) -> Result<(), LocalError> {
        self.mark(id, false);
        debug!(session = %id, "Session closed");
        self.inner.close_session(id).await
    }
}

impl SessionManager for GeocoderSessions {
    type Error = LocalError;
    type Transport = <LocalSessionManager as SessionManager>::Transport;

    fn create_session(
        &self,
    ) -> impl Future<Output = Result<(SessionId, Self::Transport), Self::Error>> + Send {
        self.create_session_impl()
    }

    fn initialize_session(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> impl Future<Output = Result<ServerJsonRpcMessage, Self::Error>> + Send {
        self.mark(id, true);
        self.inner.initialize_session(id, message)
    }

    fn has_session(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<bool, Self::Error>> + Send {
        self.inner.has_session(id)
    }

    fn close_session(
        &self,
        id: &SessionId,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.close_session_impl(id)
    }

    fn create_stream(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> impl Future<
        Output = Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error>,
    > + Send {
        self.inner.create_stream(id, message)
    }

    fn accept_message(
        &self,
        id: &SessionId,
        message: ClientJsonRpcMessage,
    ) -> impl Future<Output = Result<(), Self::Error>> + Send {
        self.inner.accept_message(id, message)
    }

    fn create_standalone_stream(
        &self,
        id: &SessionId,
    ) -> impl Future<
        Output = Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error>,
    > + Send {
        self.inner.create_standalone_stream(id)
    }

    fn resume(
        &self,
        id: &SessionId,
        last_event_id: String,
    ) -> impl Future<
        Output = Result<impl Stream<Item = ServerSseMessage> + Send + Sync + 'static, Self::Error>,
    > + Send {
        self.inner.resume(id, last_event_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_uninitialized_session_is_reaped() {
        let sessions = GeocoderSessions::new(Duration::from_secs(60), Duration::from_millis(50));

        let (id, _transport) = sessions.create_session().await.unwrap();
        assert!(sessions.has_session(&id).await.unwrap());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert!(!sessions.has_session(&id).await.unwrap());
        assert!(sessions.inner.sessions.read().await.is_empty());
    }

    #[tokio::test]
    async fn test_close_forgets_session() {
        let sessions = GeocoderSessions::new(Duration::from_secs(60), Duration::from_secs(60));

        let (id, _transport) = sessions.create_session().await.unwrap();
        let _ = sessions.close_session(&id).await;

        assert!(!sessions.has_session(&id).await.unwrap());
    }
}
