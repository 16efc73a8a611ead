use super::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RoomUiState {
    Empty,
    Loading,
    Ready,
    Error,
}

/// Message view for one joined order room.
///
/// Holds the merged result of the REST history snapshot and the live event
/// tail. Messages are ordered by creation timestamp, ties broken by arrival
/// order, and de-duplicated by server-assigned id so a message delivered by
/// both paths renders once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RoomState {
    order_id: Option<String>,
    ui_state: RoomUiState,
    messages: Vec<Message>,
    error: Option<String>,
    unread_count: u32,
}

impl Default for RoomState {
    fn default() -> Self {
        Self {
            order_id: None,
            ui_state: RoomUiState::Empty,
            messages: Vec::new(),
            error: None,
            unread_count: 0,
        }
    }
}

#[cfg_attr(not(test), allow(dead_code))]
impl RoomState {
    pub fn order_id(&self) -> Option<&str> {
        self.order_id.as_deref()
    }

    pub fn ui_state(&self) -> RoomUiState {
        self.ui_state.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.ui_state == RoomUiState::Loading
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn unread_count(&self) -> u32 {
        self.unread_count
    }

    pub fn is_open(&self) -> bool {
        self.order_id.is_some()
    }

    /// Starts the history fetch for an order. Messages held for the same
    /// order are kept so live arrivals during the fetch survive the merge.
    pub fn set_loading(&mut self, order_id: &str) {
        if self.order_id.as_deref() != Some(order_id) {
            self.messages.clear();
            self.unread_count = 0;
        }
        self.order_id = Some(order_id.to_owned());
        self.ui_state = RoomUiState::Loading;
        self.error = None;
    }

    /// Installs the fetched history, merging in any live messages that were
    /// accepted while the fetch was pending and are absent from the snapshot.
    pub fn set_ready(&mut self, snapshot: Vec<Message>) {
        let mut merged = snapshot;
        let held = std::mem::take(&mut self.messages);

        for message in held {
            if merged.iter().any(|m| m.id == message.id) {
                continue;
            }
            let at = merged
                .iter()
                .rposition(|m| m.created_at <= message.created_at)
                .map(|index| index + 1)
                .unwrap_or(0);
            merged.insert(at, message);
        }

        self.messages = merged;
        self.ui_state = RoomUiState::Ready;
        self.error = None;
    }

    /// Records a failed history fetch. The held message list is untouched.
    pub fn set_error(&mut self, message: &str) {
        self.ui_state = RoomUiState::Error;
        self.error = Some(message.to_owned());
    }

    /// Appends a live inbound message.
    ///
    /// Returns false without touching state when the message belongs to a
    /// different order or its id is already held.
    pub fn accept_live(&mut self, message: Message) -> bool {
        if self.order_id.as_deref() != Some(message.order_id.as_str()) {
            return false;
        }
        if self.messages.iter().any(|m| m.id == message.id) {
            return false;
        }

        self.messages.push(message);
        self.unread_count += 1;
        true
    }

    /// Appends one of the local user's own messages, already read. Used by
    /// draft rooms, where there is no server echo to wait for.
    pub fn append_own(&mut self, mut message: Message) {
        message.is_read = true;
        self.messages.push(message);
    }

    /// Seeds the unread counter from the dedicated REST endpoint.
    pub fn set_unread(&mut self, count: u32) {
        self.unread_count = count;
    }

    /// Applies a remote read acknowledgment: every held message is flagged
    /// read and the counter resets.
    pub fn mark_all_read(&mut self) {
        for message in &mut self.messages {
            message.is_read = true;
        }
        self.unread_count = 0;
    }

    pub fn clear(&mut self) {
        self.order_id = None;
        self.ui_state = RoomUiState::Empty;
        self.messages.clear();
        self.error = None;
        self.unread_count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::{MessageKind, Sender};
    use chrono::{TimeZone, Utc};

    fn msg(id: &str, order_id: &str, at_secs: i64) -> Message {
        let at = Utc.timestamp_opt(at_secs, 0).unwrap();
        Message {
            id: id.to_owned(),
            order_id: order_id.to_owned(),
            sender: Sender {
                id: "u-1".to_owned(),
                email: "a@x.com".to_owned(),
            },
            body: format!("body of {}", id),
            kind: MessageKind::Text,
            is_read: false,
            created_at: at,
            updated_at: at,
        }
    }

    fn ids(state: &RoomState) -> Vec<&str> {
        state.messages().iter().map(|m| m.id.as_str()).collect()
    }

    #[test]
    fn default_state_is_empty() {
        let state = RoomState::default();

        assert_eq!(state.ui_state(), RoomUiState::Empty);
        assert!(!state.is_open());
        assert!(state.messages().is_empty());
        assert_eq!(state.unread_count(), 0);
        assert_eq!(state.error(), None);
    }

    #[test]
    fn set_loading_opens_the_room() {
        let mut state = RoomState::default();

        state.set_loading("ord-1");

        assert!(state.is_loading());
        assert_eq!(state.order_id(), Some("ord-1"));
    }

    #[test]
    fn set_ready_installs_snapshot_in_order() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");

        state.set_ready(vec![msg("a", "ord-1", 100), msg("b", "ord-1", 200)]);

        assert_eq!(state.ui_state(), RoomUiState::Ready);
        assert_eq!(ids(&state), vec!["a", "b"]);
        assert!(!state.is_loading());
    }

    #[test]
    fn live_message_appends_to_tail_after_snapshot() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![msg("a", "ord-1", 100), msg("b", "ord-1", 200)]);

        let accepted = state.accept_live(msg("c", "ord-1", 300));

        assert!(accepted);
        assert_eq!(ids(&state), vec!["a", "b", "c"]);
    }

    #[test]
    fn message_for_foreign_order_is_rejected() {
        let mut state = RoomState::default();
        state.set_loading("ord-a");
        state.set_ready(vec![msg("a", "ord-a", 100)]);

        let accepted = state.accept_live(msg("x", "ord-b", 200));

        assert!(!accepted);
        assert_eq!(ids(&state), vec!["a"]);
        assert_eq!(state.unread_count(), 0);
    }

    #[test]
    fn duplicate_message_id_is_rejected() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![msg("a", "ord-1", 100)]);

        let accepted = state.accept_live(msg("a", "ord-1", 100));

        assert!(!accepted);
        assert_eq!(state.messages().len(), 1);
        assert_eq!(state.unread_count(), 0);
    }

    #[test]
    fn snapshot_merge_retains_live_arrivals_missing_from_snapshot() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        // Live event races the history fetch.
        state.accept_live(msg("live", "ord-1", 250));

        state.set_ready(vec![msg("a", "ord-1", 100), msg("b", "ord-1", 300)]);

        assert_eq!(ids(&state), vec!["a", "live", "b"]);
    }

    #[test]
    fn snapshot_merge_drops_live_duplicates_by_id() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.accept_live(msg("b", "ord-1", 200));

        state.set_ready(vec![msg("a", "ord-1", 100), msg("b", "ord-1", 200)]);

        assert_eq!(ids(&state), vec!["a", "b"]);
    }

    #[test]
    fn merge_keeps_arrival_order_for_equal_timestamps() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.accept_live(msg("late", "ord-1", 200));

        state.set_ready(vec![msg("a", "ord-1", 200)]);

        assert_eq!(ids(&state), vec!["a", "late"]);
    }

    #[test]
    fn set_error_keeps_previous_messages() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![msg("a", "ord-1", 100)]);
        state.set_loading("ord-1");

        state.set_error("history fetch failed");

        assert_eq!(state.ui_state(), RoomUiState::Error);
        assert_eq!(state.error(), Some("history fetch failed"));
        assert_eq!(ids(&state), vec!["a"]);
    }

    #[test]
    fn reloading_a_different_order_clears_held_messages() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![msg("a", "ord-1", 100)]);

        state.set_loading("ord-2");

        assert!(state.messages().is_empty());
        assert_eq!(state.order_id(), Some("ord-2"));
    }

    #[test]
    fn unread_counts_each_accepted_live_message() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![]);

        state.accept_live(msg("a", "ord-1", 100));
        state.accept_live(msg("b", "ord-1", 200));
        state.accept_live(msg("c", "ord-1", 300));

        assert_eq!(state.unread_count(), 3);
    }

    #[test]
    fn mark_all_read_flags_messages_and_resets_counter() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![]);
        state.accept_live(msg("a", "ord-1", 100));
        state.accept_live(msg("b", "ord-1", 200));

        state.mark_all_read();

        assert_eq!(state.unread_count(), 0);
        assert!(state.messages().iter().all(|m| m.is_read));
    }

    #[test]
    fn append_own_lands_read_without_touching_unread() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![]);

        state.append_own(msg("mine", "ord-1", 100));

        assert_eq!(state.unread_count(), 0);
        assert!(state.messages()[0].is_read);
    }

    #[test]
    fn set_unread_seeds_counter_from_rest() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");

        state.set_unread(7);

        assert_eq!(state.unread_count(), 7);
    }

    #[test]
    fn clear_resets_to_empty() {
        let mut state = RoomState::default();
        state.set_loading("ord-1");
        state.set_ready(vec![msg("a", "ord-1", 100)]);

        state.clear();

        assert_eq!(state.ui_state(), RoomUiState::Empty);
        assert!(!state.is_open());
        assert!(state.messages().is_empty());
    }
}
