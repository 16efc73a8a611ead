//! Per-order chat session: one orchestrator over the room state machines
//! and the injected gateway/channel seams.
//!
//! The same component serves two modes. `Live` rooms join the session
//! connection, load history over REST, and emit typing/read signals.
//! `Draft` rooms back the chat panel of a not-yet-submitted order: no
//! network at all, sends echo locally.

use crate::domain::{
    compose_state::ComposeState,
    events::{ClientEvent, ServerEvent},
    message::{Message, MessageKind, Sender},
    room_state::RoomState,
    typing_state::{LocalTyping, TypingPresence, TypingSignal},
};

use super::{
    contracts::RoomChannel,
    fetch_unread::{fetch_unread_count, FetchUnreadError, UnreadSource},
    load_history::{load_history, HistorySource, LoadHistoryError, LoadHistoryQuery},
    send_message::{send_message, MessageSender, SendMessageCommand, SendMessageError},
};

const SIGNAL_DROPPED: &str = "ROOM_SIGNAL_DROPPED";
const JOIN_FAILED: &str = "ROOM_JOIN_FAILED";
const LEAVE_FAILED: &str = "ROOM_LEAVE_FAILED";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionMode {
    Live,
    Draft,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    HistoryFetch(LoadHistoryError),
    UnreadFetch(FetchUnreadError),
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::HistoryFetch(_) => f.write_str("failed to load chat history"),
            Self::UnreadFetch(_) => f.write_str("failed to load unread count"),
        }
    }
}

impl std::error::Error for SessionError {}

pub struct RoomSession<G, C>
where
    G: HistorySource + MessageSender + UnreadSource,
    C: RoomChannel,
{
    order_id: String,
    mode: SessionMode,
    author: Sender,
    gateway: G,
    channel: C,
    room: RoomState,
    presence: TypingPresence,
    local_typing: LocalTyping,
    compose: ComposeState,
    draft_seq: u32,
}

impl<G, C> RoomSession<G, C>
where
    G: HistorySource + MessageSender + UnreadSource,
    C: RoomChannel,
{
    pub fn live(order_id: impl Into<String>, author: Sender, gateway: G, channel: C) -> Self {
        Self::with_mode(order_id, SessionMode::Live, author, gateway, channel)
    }

    pub fn draft(order_id: impl Into<String>, author: Sender, gateway: G, channel: C) -> Self {
        Self::with_mode(order_id, SessionMode::Draft, author, gateway, channel)
    }

    fn with_mode(
        order_id: impl Into<String>,
        mode: SessionMode,
        author: Sender,
        gateway: G,
        channel: C,
    ) -> Self {
        Self {
            order_id: order_id.into(),
            mode,
            author,
            gateway,
            channel,
            room: RoomState::default(),
            presence: TypingPresence::default(),
            local_typing: LocalTyping::default(),
            compose: ComposeState::default(),
            draft_seq: 0,
        }
    }

    pub fn order_id(&self) -> &str {
        &self.order_id
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn mode(&self) -> SessionMode {
        self.mode
    }

    pub fn room(&self) -> &RoomState {
        &self.room
    }

    pub fn presence(&self) -> &TypingPresence {
        &self.presence
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn compose_text(&self) -> &str {
        self.compose.text()
    }

    /// The underlying channel, for callers that also drive its event pump.
    pub fn channel_mut(&mut self) -> &mut C {
        &mut self.channel
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn can_send(&self) -> bool {
        self.compose.is_sendable()
    }

    /// Joins the room and loads its message view. History lands in the room
    /// state as Ready or Error (the loading flag never sticks); the unread
    /// badge is seeded by a second, dedicated call.
    pub async fn open(&mut self) -> Result<(), SessionError> {
        self.room.set_loading(&self.order_id);

        if self.mode == SessionMode::Draft {
            self.room.set_ready(Vec::new());
            return Ok(());
        }

        if let Err(error) = self.channel.join(&self.order_id) {
            tracing::warn!(code = JOIN_FAILED, order_id = %self.order_id, error = %error, "room join failed");
        }

        match load_history(&self.gateway, LoadHistoryQuery::new(self.order_id.clone())).await {
            Ok(output) => self.room.set_ready(output.messages),
            Err(error) => {
                self.room.set_error(history_failure_text(&error));
                return Err(SessionError::HistoryFetch(error));
            }
        }

        match fetch_unread_count(&self.gateway, &self.order_id).await {
            Ok(count) => self.room.set_unread(count),
            Err(error) => return Err(SessionError::UnreadFetch(error)),
        }

        Ok(())
    }

    /// Applies one event from the session connection. Events scoped to a
    /// different order leave this session untouched: the transport is
    /// shared across every joined room.
    pub fn apply_event(&mut self, event: &ServerEvent) {
        match event {
            ServerEvent::NewMessage { order_id, message } if *order_id == self.order_id => {
                self.room.accept_live(message.clone());
            }
            ServerEvent::UserTyping {
                email,
                order_id,
                is_typing,
            } if *order_id == self.order_id => {
                self.presence.apply(email, *is_typing);
            }
            ServerEvent::MessageRead { order_id, .. } if *order_id == self.order_id => {
                self.room.mark_all_read();
            }
            _ => {}
        }
    }

    /// Records a compose-input change and re-emits the typing-start signal.
    /// Receivers treat starts as idempotent, so the per-keystroke re-emit
    /// is harmless and keeps the remote indicator fresh.
    pub fn input_changed(&mut self, text: &str, now_unix_ms: u128) {
        if !self.compose.set_text(text) {
            return;
        }
        if self.mode == SessionMode::Draft {
            return;
        }

        self.local_typing.input(now_unix_ms);
        self.emit_signal(ClientEvent::TypingStart {
            order_id: self.order_id.clone(),
        });
    }

    /// Drives the typing debounce clock; emits the stop signal once the
    /// idle window after the last input has elapsed.
    pub fn poll_typing(&mut self, now_unix_ms: u128) {
        if self.local_typing.poll(now_unix_ms) == Some(TypingSignal::Stop) {
            self.emit_signal(ClientEvent::TypingStop {
                order_id: self.order_id.clone(),
            });
        }
    }

    /// Compose input lost focus.
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn blur(&mut self) {
        self.stop_typing_now();
    }

    /// Sends the compose buffer. On success the buffer clears and typing
    /// stops; the message itself arrives via the live broadcast. On failure
    /// the buffer is kept for retry.
    pub async fn send(&mut self) -> Result<(), SendMessageError> {
        if self.mode == SessionMode::Draft {
            return self.send_draft();
        }

        let command = SendMessageCommand {
            order_id: self.order_id.clone(),
            body: self.compose.text().to_owned(),
        };
        send_message(&self.gateway, command).await?;

        self.compose.clear();
        self.stop_typing_now();
        Ok(())
    }

    /// Signals that the user has seen this room. The unread reset happens
    /// when the remote `message-read` acknowledgment comes back.
    pub fn mark_read(&mut self) {
        if self.mode == SessionMode::Draft {
            self.room.mark_all_read();
            return;
        }
        self.emit_signal(ClientEvent::MarkRead {
            order_id: self.order_id.clone(),
        });
    }

    /// Tears the session down: stops an active typing burst so peers are
    /// not left with a stale indicator, leaves the room, drops presence.
    pub fn close(&mut self) {
        self.stop_typing_now();
        if self.mode == SessionMode::Live {
            if let Err(error) = self.channel.leave(&self.order_id) {
                tracing::warn!(code = LEAVE_FAILED, order_id = %self.order_id, error = %error, "room leave failed");
            }
        }
        self.presence.clear();
    }

    fn send_draft(&mut self) -> Result<(), SendMessageError> {
        let body = self.compose.sendable_body();
        if body.is_empty() {
            return Err(SendMessageError::EmptyBody);
        }

        let now = chrono::Utc::now();
        self.draft_seq += 1;
        let message = Message {
            id: format!("draft-{}", self.draft_seq),
            order_id: self.order_id.clone(),
            sender: self.author.clone(),
            body: body.to_owned(),
            kind: MessageKind::Text,
            is_read: true,
            created_at: now,
            updated_at: now,
        };
        self.room.append_own(message);
        self.compose.clear();
        self.local_typing.interrupt();
        Ok(())
    }

    fn stop_typing_now(&mut self) {
        if self.local_typing.interrupt() == Some(TypingSignal::Stop) {
            self.emit_signal(ClientEvent::TypingStop {
                order_id: self.order_id.clone(),
            });
        }
    }

    fn emit_signal(&mut self, event: ClientEvent) {
        if self.mode == SessionMode::Draft {
            return;
        }
        if let Err(error) = self.channel.signal(event) {
            // Typing and read signals are ephemeral; while offline they are
            // simply lost, never buffered.
            tracing::debug!(code = SIGNAL_DROPPED, error = %error, "live signal dropped");
        }
    }
}

fn history_failure_text(error: &LoadHistoryError) -> &'static str {
    match error {
        LoadHistoryError::MissingOrderId => "No order selected",
        LoadHistoryError::Unauthorized => "You are not authorized to view this chat",
        LoadHistoryError::OrderNotFound => "Chat for this order was not found",
        LoadHistoryError::TemporarilyUnavailable => "Chat service is temporarily unavailable",
        LoadHistoryError::DataContractViolation => "Chat history could not be read",
    }
}
