use anyhow::Result;

use crate::domain::events::ClientEvent;

/// Emission seam between a room session and the session connection.
///
/// Join/leave are separate from plain signals because the connection owner
/// defers joins issued before the handshake completes.
pub trait RoomChannel {
    fn join(&mut self, order_id: &str) -> Result<()>;
    fn leave(&mut self, order_id: &str) -> Result<()>;
    fn signal(&mut self, event: ClientEvent) -> Result<()>;
}
