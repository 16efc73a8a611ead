use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Kind of a chat message as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageKind {
    #[default]
    Text,
    System,
}

impl MessageKind {
    /// Returns a display tag for non-ordinary messages, or None for plain text.
    pub fn display_tag(&self) -> Option<&'static str> {
        match self {
            MessageKind::Text => None,
            MessageKind::System => Some("[System]"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sender {
    pub id: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub id: String,
    pub order_id: String,
    pub sender: Sender,
    pub body: String,
    #[serde(default)]
    pub kind: MessageKind,
    #[serde(default)]
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Message {
    /// Returns the display content: kind tag + body, or just the body for text.
    pub fn display_content(&self) -> String {
        match self.kind.display_tag() {
            Some(tag) if self.body.is_empty() => tag.to_owned(),
            Some(tag) => format!("{} {}", tag, self.body),
            None => self.body.clone(),
        }
    }
}
