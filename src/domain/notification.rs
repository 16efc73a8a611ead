use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category of a session-wide notification pushed by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NotificationKind {
    OrderCreated,
    OrderUpdated,
    OrderDeleted,
    NewMessage,
    UserJoined,
    FileUploaded,
    FileDeleted,
    SystemAnnouncement,
}

impl NotificationKind {
    /// Returns the badge tag rendered next to a notification of this kind.
    pub fn badge_tag(&self) -> &'static str {
        match self {
            NotificationKind::OrderCreated => "[Order+]",
            NotificationKind::OrderUpdated => "[Order]",
            NotificationKind::OrderDeleted => "[Order-]",
            NotificationKind::NewMessage => "[Chat]",
            NotificationKind::UserJoined => "[Joined]",
            NotificationKind::FileUploaded => "[File+]",
            NotificationKind::FileDeleted => "[File-]",
            NotificationKind::SystemAnnouncement => "[System]",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationStatus {
    Unread,
    Read,
    Archived,
}

/// Optional identifiers attaching a notification to dashboard entities.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationMeta {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub chat_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationAction {
    pub url: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub recipient_id: String,
    pub kind: NotificationKind,
    pub status: NotificationStatus,
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub meta: NotificationMeta,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub action: Option<NotificationAction>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Notification {
    pub fn is_unread(&self) -> bool {
        self.status == NotificationStatus::Unread
    }
}
