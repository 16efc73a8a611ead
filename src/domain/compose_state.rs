//! State for the message compose buffer.

/// Maximum accepted compose length (backend message body limit).
const MAX_COMPOSE_LENGTH: usize = 4_000;

/// Compose buffer for the open room.
///
/// The buffer is cleared only after a send succeeds; a failed send keeps the
/// text so the user can retry.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ComposeState {
    text: String,
}

#[cfg_attr(not(test), allow(dead_code))]
impl ComposeState {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// True when the trimmed buffer has content to send. Drives the send
    /// affordance: whitespace-only input never reaches the network.
    pub fn is_sendable(&self) -> bool {
        !self.text.trim().is_empty()
    }

    /// Replaces the buffer. Returns false and keeps the previous content
    /// when the replacement would exceed the length limit.
    pub fn set_text(&mut self, text: &str) -> bool {
        if text.chars().count() > MAX_COMPOSE_LENGTH {
            return false;
        }
        self.text = text.to_owned();
        true
    }

    /// Returns the trimmed body to submit.
    pub fn sendable_body(&self) -> &str {
        self.text.trim()
    }

    pub fn clear(&mut self) {
        self.text.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_empty_and_not_sendable() {
        let compose = ComposeState::default();

        assert!(compose.is_empty());
        assert!(!compose.is_sendable());
    }

    #[test]
    fn set_text_replaces_content() {
        let mut compose = ComposeState::default();

        assert!(compose.set_text("over-height load on SR-99"));
        assert_eq!(compose.text(), "over-height load on SR-99");
        assert!(compose.is_sendable());
    }

    #[test]
    fn whitespace_only_text_is_not_sendable() {
        let mut compose = ComposeState::default();
        compose.set_text("   \n\t ");

        assert!(!compose.is_empty());
        assert!(!compose.is_sendable());
    }

    #[test]
    fn sendable_body_is_trimmed() {
        let mut compose = ComposeState::default();
        compose.set_text("  hello world  ");

        assert_eq!(compose.sendable_body(), "hello world");
    }

    #[test]
    fn set_text_rejects_oversized_input_and_keeps_previous() {
        let mut compose = ComposeState::default();
        compose.set_text("keep me");

        let oversized = "x".repeat(MAX_COMPOSE_LENGTH + 1);

        assert!(!compose.set_text(&oversized));
        assert_eq!(compose.text(), "keep me");
    }

    #[test]
    fn set_text_accepts_input_at_the_limit() {
        let mut compose = ComposeState::default();
        let at_limit = "x".repeat(MAX_COMPOSE_LENGTH);

        assert!(compose.set_text(&at_limit));
        assert_eq!(compose.text().chars().count(), MAX_COMPOSE_LENGTH);
    }

    #[test]
    fn clear_empties_the_buffer() {
        let mut compose = ComposeState::default();
        compose.set_text("pending");

        compose.clear();

        assert!(compose.is_empty());
    }
}
