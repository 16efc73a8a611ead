//! Injected transport capability for the persistent session connection.
//!
//! The connection manager talks to the backend only through this trait, so
//! tests substitute a fake transport instead of a live socket.

use async_trait::async_trait;
use thiserror::Error;
use tokio::sync::mpsc::UnboundedReceiver;

use crate::{
    domain::events::{ClientEvent, ServerEvent},
    infra::secrets::BearerToken,
};

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("handshake with {url} failed: {detail}")]
    Handshake { url: String, detail: String },
    #[error("no established connection")]
    NotConnected,
    #[error("failed to encode outbound event: {0}")]
    Encode(#[source] serde_json::Error),
}

/// What the transport surfaces to the connection manager.
#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    Server(ServerEvent),
    /// The established connection went away mid-session.
    Dropped { reason: String },
}

#[async_trait]
pub trait EventTransport {
    /// Performs the authenticated handshake. The credential is presented
    /// once, during the handshake, never per-message. On success the
    /// returned receiver carries every server-pushed event until the
    /// connection drops.
    async fn connect(
        &mut self,
        credential: &BearerToken,
    ) -> Result<UnboundedReceiver<TransportEvent>, TransportError>;

    /// Sends one client event over the established connection.
    fn emit(&mut self, event: &ClientEvent) -> Result<(), TransportError>;

    /// Tears the connection down. Safe to call when not connected.
    async fn disconnect(&mut self);
}
