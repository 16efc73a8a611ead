//! Use case for sending a chat message to an order room.
//!
//! The message goes out over REST; the live `new-message` broadcast (which
//! the sender also receives) is what lands it in the local message list.

use async_trait::async_trait;

use crate::domain::message::Message;

/// Command to send a message into a specific order room.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendMessageCommand {
    pub order_id: String,
    pub body: String,
}

/// Errors that can occur at the source level (chat REST API).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendSourceError {
    /// Credential was rejected.
    Unauthorized,
    /// Target order was not found or is not accessible.
    OrderNotFound,
    /// Service is temporarily unavailable.
    Unavailable,
    /// Response did not match the expected shape.
    InvalidData,
}

/// Domain-level errors for the send operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// Body is empty after trimming whitespace; rejected before any
    /// network call.
    EmptyBody,
    Unauthorized,
    OrderNotFound,
    TemporarilyUnavailable,
    DataContractViolation,
}

#[async_trait]
pub trait MessageSender {
    /// Submits a message body and returns the server-created echo.
    async fn send_message(&self, order_id: &str, body: &str)
        -> Result<Message, SendSourceError>;
}

/// Validates and sends a message, returning the created message echo.
///
/// The echo is informational: callers must not append it locally, since
/// the broadcast for the same message id arrives over the live stream.
pub async fn send_message(
    sender: &dyn MessageSender,
    command: SendMessageCommand,
) -> Result<Message, SendMessageError> {
    let body = command.body.trim();
    if body.is_empty() {
        return Err(SendMessageError::EmptyBody);
    }

    sender
        .send_message(&command.order_id, body)
        .await
        .map_err(map_source_error)
}

fn map_source_error(error: SendSourceError) -> SendMessageError {
    match error {
        SendSourceError::Unauthorized => SendMessageError::Unauthorized,
        SendSourceError::OrderNotFound => SendMessageError::OrderNotFound,
        SendSourceError::Unavailable => SendMessageError::TemporarilyUnavailable,
        SendSourceError::InvalidData => SendMessageError::DataContractViolation,
    }
}
