//! Typing presence: the remote "who is composing" set and the local
//! debounced typing state machine.

use std::time::{SystemTime, UNIX_EPOCH};

/// Inactivity window after the last input before typing is considered over.
pub const TYPING_IDLE_TIMEOUT_MS: u128 = 3_000;

pub fn now_unix_ms() -> u128 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypingSignal {
    Start,
    Stop,
}

/// Debounce state for the local user's typing indicator.
///
/// Driven with explicit unix-ms timestamps so callers own the clock. Every
/// input re-emits `Start` (receivers treat starts as idempotent) and re-arms
/// the deadline; `Stop` fires once when the deadline elapses or the caller
/// interrupts (blur, send, teardown).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocalTyping {
    deadline_unix_ms: Option<u128>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl LocalTyping {
    pub fn is_typing(&self) -> bool {
        self.deadline_unix_ms.is_some()
    }

    pub fn input(&mut self, now_unix_ms: u128) -> TypingSignal {
        self.deadline_unix_ms = Some(now_unix_ms + TYPING_IDLE_TIMEOUT_MS);
        TypingSignal::Start
    }

    pub fn poll(&mut self, now_unix_ms: u128) -> Option<TypingSignal> {
        match self.deadline_unix_ms {
            Some(deadline) if now_unix_ms >= deadline => {
                self.deadline_unix_ms = None;
                Some(TypingSignal::Stop)
            }
            _ => None,
        }
    }

    pub fn interrupt(&mut self) -> Option<TypingSignal> {
        self.deadline_unix_ms.take().map(|_| TypingSignal::Stop)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypingEntry {
    pub email: String,
}

/// Remote typing set for one room: at most one entry per user, absence
/// means "not typing".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypingPresence {
    entries: Vec<TypingEntry>,
}

#[cfg_attr(not(test), allow(dead_code))]
impl TypingPresence {
    pub fn entries(&self) -> &[TypingEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn apply(&mut self, email: &str, is_typing: bool) {
        let position = self.entries.iter().position(|entry| entry.email == email);

        match (position, is_typing) {
            (None, true) => self.entries.push(TypingEntry {
                email: email.to_owned(),
            }),
            (Some(index), false) => {
                self.entries.remove(index);
            }
            _ => {}
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Rendering rule for the typing line under the message list.
    pub fn label(&self) -> Option<String> {
        match self.entries.as_slice() {
            [] => None,
            [one] => Some(format!("{} is typing", one.email)),
            [first, second] => Some(format!("{} and {} are typing", first.email, second.email)),
            _ => Some("Several people are typing".to_owned()),
        }
    }
}
