use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    domain::events::{ClientEvent, ConnectionState, ServerEvent},
    infra::secrets::BearerToken,
    usecases::contracts::RoomChannel,
};

use super::transport::{EventTransport, TransportError, TransportEvent};

const CONNECT_SKIPPED_ALREADY_ACTIVE: &str = "REALTIME_CONNECT_SKIPPED_ALREADY_ACTIVE";
const CONNECT_HANDSHAKE_FAILED: &str = "REALTIME_CONNECT_HANDSHAKE_FAILED";
const CONNECTION_ESTABLISHED: &str = "REALTIME_CONNECTION_ESTABLISHED";
const CONNECTION_LOST: &str = "REALTIME_CONNECTION_LOST";
const JOIN_QUEUED_UNTIL_CONNECTED: &str = "REALTIME_JOIN_QUEUED_UNTIL_CONNECTED";

/// What the rest of the client sees from the session connection.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    Server(ServerEvent),
    ConnectionLost { reason: String },
}

/// Owner of the single per-session connection.
///
/// Holds the only handle to the transport: no other component may create or
/// destroy the connection. `connect` is idempotent, joins issued before the
/// handshake completes are queued and flushed on `connected`, and a
/// mid-session drop surfaces as a `ConnectionLost` event. There is no
/// automatic reconnect; callers retry `connect` on their own terms.
pub struct ConnectionManager<T: EventTransport> {
    transport: T,
    state: ConnectionState,
    last_error: Option<String>,
    incoming: Option<UnboundedReceiver<TransportEvent>>,
    pending_joins: Vec<String>,
}

impl<T: EventTransport> ConnectionManager<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            state: ConnectionState::Disconnected,
            last_error: None,
            incoming: None,
            pending_joins: Vec::new(),
        }
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn state(&self) -> ConnectionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.state == ConnectionState::Connected
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Establishes the session connection. A no-op while a connection is
    /// already in flight or established.
    pub async fn connect(&mut self, credential: &BearerToken) -> Result<(), TransportError> {
        if matches!(
            self.state,
            ConnectionState::Connecting | ConnectionState::Connected
        ) {
            tracing::debug!(
                code = CONNECT_SKIPPED_ALREADY_ACTIVE,
                state = self.state.as_label(),
                "connect request ignored"
            );
            return Ok(());
        }

        self.state = ConnectionState::Connecting;

        match self.transport.connect(credential).await {
            Ok(receiver) => {
                self.incoming = Some(receiver);
                self.state = ConnectionState::Connected;
                self.last_error = None;
                tracing::info!(code = CONNECTION_ESTABLISHED, "session connection established");
                self.flush_pending_joins();
                Ok(())
            }
            Err(error) => {
                self.state = ConnectionState::Errored;
                self.last_error = Some(error.to_string());
                tracing::warn!(
                    code = CONNECT_HANDSHAKE_FAILED,
                    error = %error,
                    "session handshake failed"
                );
                Err(error)
            }
        }
    }

    /// Tears the connection down. Safe when already disconnected.
    pub async fn disconnect(&mut self) {
        self.transport.disconnect().await;
        self.incoming = None;
        self.pending_joins.clear();
        self.state = ConnectionState::Disconnected;
    }

    /// Awaits the next event from the backend. Returns None when no
    /// connection is established.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        let receiver = self.incoming.as_mut()?;

        let event = match receiver.recv().await {
            Some(TransportEvent::Server(event)) => SessionEvent::Server(event),
            Some(TransportEvent::Dropped { reason }) => self.record_loss(reason),
            None => self.record_loss("event stream closed".to_owned()),
        };

        Some(event)
    }

    fn record_loss(&mut self, reason: String) -> SessionEvent {
        tracing::warn!(code = CONNECTION_LOST, reason = %reason, "session connection lost");
        self.incoming = None;
        self.state = ConnectionState::Disconnected;
        self.last_error = Some(reason.clone());
        SessionEvent::ConnectionLost { reason }
    }

    fn flush_pending_joins(&mut self) {
        for order_id in std::mem::take(&mut self.pending_joins) {
            if let Err(error) = self.transport.emit(&ClientEvent::JoinOrderRoom {
                order_id: order_id.clone(),
            }) {
                tracing::warn!(order_id = %order_id, error = %error, "queued join failed");
            }
        }
    }
}

impl<T: EventTransport> RoomChannel for ConnectionManager<T> {
    /// Joins the order room, deferring the emission until the handshake has
    /// completed. Duplicate queued joins collapse.
    fn join(&mut self, order_id: &str) -> anyhow::Result<()> {
        if self.is_connected() {
            self.transport.emit(&ClientEvent::JoinOrderRoom {
                order_id: order_id.to_owned(),
            })?;
            return Ok(());
        }

        if !self.pending_joins.iter().any(|queued| queued == order_id) {
            self.pending_joins.push(order_id.to_owned());
        }
        tracing::debug!(
            code = JOIN_QUEUED_UNTIL_CONNECTED,
            order_id,
            "join deferred until the session connection is up"
        );
        Ok(())
    }

    fn leave(&mut self, order_id: &str) -> anyhow::Result<()> {
        self.pending_joins.retain(|queued| queued != order_id);
        if self.is_connected() {
            self.transport.emit(&ClientEvent::LeaveOrderRoom {
                order_id: order_id.to_owned(),
            })?;
        }
        Ok(())
    }

    fn signal(&mut self, event: ClientEvent) -> anyhow::Result<()> {
        if !self.is_connected() {
            return Err(TransportError::NotConnected.into());
        }
        self.transport.emit(&event)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::sync::mpsc::{self, UnboundedSender};

    use crate::realtime::transport::TransportEvent;

    struct FakeTransport {
        connect_attempts: usize,
        fail_connect: bool,
        emitted: Vec<ClientEvent>,
        pending_receiver: Option<UnboundedReceiver<TransportEvent>>,
    }

    impl FakeTransport {
        fn new() -> (Self, UnboundedSender<TransportEvent>) {
            let (tx, rx) = mpsc::unbounded_channel();
            (
                Self {
                    connect_attempts: 0,
                    fail_connect: false,
                    emitted: Vec::new(),
                    pending_receiver: Some(rx),
                },
                tx,
            )
        }

        fn failing() -> Self {
            Self {
                connect_attempts: 0,
                fail_connect: true,
                emitted: Vec::new(),
                pending_receiver: None,
            }
        }
    }

    #[async_trait::async_trait]
    impl EventTransport for FakeTransport {
        async fn connect(
            &mut self,
            _credential: &BearerToken,
        ) -> Result<UnboundedReceiver<TransportEvent>, TransportError> {
            self.connect_attempts += 1;
            if self.fail_connect {
                return Err(TransportError::Handshake {
                    url: "wss://fake".to_owned(),
                    detail: "401 unauthorized".to_owned(),
                });
            }
            Ok(self
                .pending_receiver
                .take()
                .expect("fake transport connected twice"))
        }

        fn emit(&mut self, event: &ClientEvent) -> Result<(), TransportError> {
            self.emitted.push(event.clone());
            Ok(())
        }

        async fn disconnect(&mut self) {}
    }

    fn token() -> BearerToken {
        BearerToken::new("test-token-123")
    }

    #[tokio::test]
    async fn connect_transitions_to_connected() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        manager.connect(&token()).await.expect("connect must succeed");

        assert!(manager.is_connected());
        assert_eq!(manager.state(), ConnectionState::Connected);
        assert_eq!(manager.last_error(), None);
    }

    #[tokio::test]
    async fn repeated_connect_performs_one_handshake() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        manager.connect(&token()).await.expect("first connect");
        manager.connect(&token()).await.expect("second connect is a no-op");
        manager.connect(&token()).await.expect("third connect is a no-op");

        assert_eq!(manager.transport.connect_attempts, 1);
    }

    #[tokio::test]
    async fn failed_handshake_records_error_state() {
        let mut manager = ConnectionManager::new(FakeTransport::failing());

        let result = manager.connect(&token()).await;

        assert!(result.is_err());
        assert_eq!(manager.state(), ConnectionState::Errored);
        assert!(manager
            .last_error()
            .expect("error detail must be recorded")
            .contains("401"));
    }

    #[tokio::test]
    async fn connect_after_failure_retries_the_handshake() {
        let mut manager = ConnectionManager::new(FakeTransport::failing());

        let _ = manager.connect(&token()).await;
        let _ = manager.connect(&token()).await;

        assert_eq!(manager.transport.connect_attempts, 2);
    }

    #[tokio::test]
    async fn join_before_connect_is_queued_and_flushed_on_handshake() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        manager.join("ord-1").expect("join must queue");
        manager.join("ord-1").expect("duplicate join must collapse");
        assert!(manager.transport.emitted.is_empty());

        manager.connect(&token()).await.expect("connect must succeed");

        assert_eq!(
            manager.transport.emitted,
            vec![ClientEvent::JoinOrderRoom {
                order_id: "ord-1".to_owned()
            }]
        );
    }

    #[tokio::test]
    async fn join_while_connected_emits_immediately() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);
        manager.connect(&token()).await.expect("connect must succeed");

        manager.join("ord-2").expect("join must emit");

        assert_eq!(
            manager.transport.emitted,
            vec![ClientEvent::JoinOrderRoom {
                order_id: "ord-2".to_owned()
            }]
        );
    }

    #[tokio::test]
    async fn leave_removes_a_queued_join() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        manager.join("ord-1").expect("join must queue");
        manager.leave("ord-1").expect("leave must drop the queued join");
        manager.connect(&token()).await.expect("connect must succeed");

        assert!(manager.transport.emitted.is_empty());
    }

    #[tokio::test]
    async fn signal_while_disconnected_is_rejected() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        let result = manager.signal(ClientEvent::TypingStart {
            order_id: "ord-1".to_owned(),
        });

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn server_events_flow_through_next_event() {
        let (fake, tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);
        manager.connect(&token()).await.expect("connect must succeed");

        tx.send(TransportEvent::Server(ServerEvent::OrderUpdated {
            order_id: "ord-5".to_owned(),
        }))
        .expect("fake event must send");

        let event = manager.next_event().await.expect("event must arrive");

        assert_eq!(
            event,
            SessionEvent::Server(ServerEvent::OrderUpdated {
                order_id: "ord-5".to_owned()
            })
        );
        assert!(manager.is_connected());
    }

    #[tokio::test]
    async fn transport_drop_surfaces_connection_lost_and_disconnects() {
        let (fake, tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);
        manager.connect(&token()).await.expect("connect must succeed");

        tx.send(TransportEvent::Dropped {
            reason: "peer closed".to_owned(),
        })
        .expect("fake event must send");

        let event = manager.next_event().await.expect("loss must surface");

        assert_eq!(
            event,
            SessionEvent::ConnectionLost {
                reason: "peer closed".to_owned()
            }
        );
        assert_eq!(manager.state(), ConnectionState::Disconnected);
        assert_eq!(manager.last_error(), Some("peer closed"));
    }

    #[tokio::test]
    async fn next_event_without_connection_returns_none() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        assert_eq!(manager.next_event().await, None);
    }

    #[tokio::test]
    async fn disconnect_is_safe_when_already_disconnected() {
        let (fake, _tx) = FakeTransport::new();
        let mut manager = ConnectionManager::new(fake);

        manager.disconnect().await;
        manager.disconnect().await;

        assert_eq!(manager.state(), ConnectionState::Disconnected);
    }
}
