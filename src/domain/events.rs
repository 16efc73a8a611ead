//! Wire events exchanged over the persistent session connection.
//!
//! Both directions use the same envelope: `{"event": "<kebab-name>",
//! "data": {...}}` with camelCase payload fields.

use serde::{Deserialize, Serialize};

use super::{message::Message, notification::Notification};

/// Events pushed by the backend over the session connection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ServerEvent {
    Notification(Notification),
    #[serde(rename_all = "camelCase")]
    OrderUpdated { order_id: String },
    #[serde(rename_all = "camelCase")]
    NewMessage { order_id: String, message: Message },
    #[serde(rename_all = "camelCase")]
    UserTyping {
        email: String,
        order_id: String,
        is_typing: bool,
    },
    #[serde(rename_all = "camelCase")]
    MessageRead {
        order_id: String,
        user_id: String,
        timestamp: chrono::DateTime<chrono::Utc>,
    },
}

/// Events emitted by this client over the session connection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "kebab-case")]
pub enum ClientEvent {
    #[serde(rename_all = "camelCase")]
    JoinOrderRoom { order_id: String },
    #[serde(rename_all = "camelCase")]
    LeaveOrderRoom { order_id: String },
    #[serde(rename_all = "camelCase")]
    TypingStart { order_id: String },
    #[serde(rename_all = "camelCase")]
    TypingStop { order_id: String },
    #[serde(rename_all = "camelCase")]
    MarkRead { order_id: String },
}

impl ClientEvent {
    #[cfg_attr(not(test), allow(dead_code))]
    pub fn order_id(&self) -> &str {
        match self {
            ClientEvent::JoinOrderRoom { order_id }
            | ClientEvent::LeaveOrderRoom { order_id }
            | ClientEvent::TypingStart { order_id }
            | ClientEvent::TypingStop { order_id }
            | ClientEvent::MarkRead { order_id } => order_id,
        }
    }
}

/// State of the single per-session connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Connecting,
    Connected,
    Errored,
}

impl ConnectionState {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::Disconnected => "CONNECTION_DISCONNECTED",
            Self::Connecting => "CONNECTION_CONNECTING",
            Self::Connected => "CONNECTION_CONNECTED",
            Self::Errored => "CONNECTION_ERRORED",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::message::{MessageKind, Sender};
    use chrono::TimeZone;

    #[test]
    fn client_event_encodes_with_envelope_and_camel_case_payload() {
        let event = ClientEvent::JoinOrderRoom {
            order_id: "ord-12".to_owned(),
        };

        let encoded = serde_json::to_value(&event).expect("event must encode");

        assert_eq!(
            encoded,
            serde_json::json!({"event": "join-order-room", "data": {"orderId": "ord-12"}})
        );
    }

    #[test]
    fn typing_signals_encode_with_distinct_event_names() {
        let start = ClientEvent::TypingStart {
            order_id: "ord-1".to_owned(),
        };
        let stop = ClientEvent::TypingStop {
            order_id: "ord-1".to_owned(),
        };

        let start_value = serde_json::to_value(&start).expect("start must encode");
        let stop_value = serde_json::to_value(&stop).expect("stop must encode");

        assert_eq!(start_value["event"], "typing-start");
        assert_eq!(stop_value["event"], "typing-stop");
    }

    #[test]
    fn user_typing_event_decodes_from_wire_frame() {
        let raw = r#"{
            "event": "user-typing",
            "data": {"email": "a@x.com", "orderId": "ord-3", "isTyping": true}
        }"#;

        let event: ServerEvent = serde_json::from_str(raw).expect("frame must decode");

        assert_eq!(
            event,
            ServerEvent::UserTyping {
                email: "a@x.com".to_owned(),
                order_id: "ord-3".to_owned(),
                is_typing: true,
            }
        );
    }

    #[test]
    fn new_message_event_decodes_with_nested_message() {
        let raw = r#"{
            "event": "new-message",
            "data": {
                "orderId": "ord-3",
                "message": {
                    "id": "m-1",
                    "orderId": "ord-3",
                    "sender": {"id": "u-1", "email": "a@x.com"},
                    "body": "loaded and rolling",
                    "createdAt": "2024-05-01T10:00:00Z",
                    "updatedAt": "2024-05-01T10:00:00Z"
                }
            }
        }"#;

        let event: ServerEvent = serde_json::from_str(raw).expect("frame must decode");

        match event {
            ServerEvent::NewMessage { order_id, message } => {
                assert_eq!(order_id, "ord-3");
                assert_eq!(message.body, "loaded and rolling");
                assert_eq!(message.kind, MessageKind::Text);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn message_read_event_round_trips() {
        let event = ServerEvent::MessageRead {
            order_id: "ord-3".to_owned(),
            user_id: "u-2".to_owned(),
            timestamp: chrono::Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        };

        let encoded = serde_json::to_string(&event).expect("event must encode");
        let decoded: ServerEvent = serde_json::from_str(&encoded).expect("event must decode");

        assert_eq!(decoded, event);
    }

    #[test]
    fn order_id_accessor_covers_every_client_event() {
        let events = [
            ClientEvent::JoinOrderRoom {
                order_id: "ord-9".to_owned(),
            },
            ClientEvent::LeaveOrderRoom {
                order_id: "ord-9".to_owned(),
            },
            ClientEvent::TypingStart {
                order_id: "ord-9".to_owned(),
            },
            ClientEvent::TypingStop {
                order_id: "ord-9".to_owned(),
            },
            ClientEvent::MarkRead {
                order_id: "ord-9".to_owned(),
            },
        ];

        for event in events {
            assert_eq!(event.order_id(), "ord-9");
        }
    }

    #[test]
    fn connection_state_labels_are_stable() {
        assert_eq!(
            ConnectionState::Disconnected.as_label(),
            "CONNECTION_DISCONNECTED"
        );
        assert_eq!(ConnectionState::Connected.as_label(), "CONNECTION_CONNECTED");
    }

    #[test]
    fn sender_is_shared_between_message_and_events() {
        let sender = Sender {
            id: "u-1".to_owned(),
            email: "a@x.com".to_owned(),
        };

        assert_eq!(
            serde_json::to_value(&sender).expect("sender must encode"),
            serde_json::json!({"id": "u-1", "email": "a@x.com"})
        );
    }
}
