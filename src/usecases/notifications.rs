//! Session-wide notification fan-in.
//!
//! Independent of any order room: it consumes the `notification` events of
//! the session connection and the bulk REST surface, and feeds the global
//! badge, list, and transient alerts.

use async_trait::async_trait;

use crate::{
    domain::{
        events::ServerEvent,
        notification::Notification,
        notification_feed::NotificationFeed,
    },
    infra::contracts::{AlertSink, Toast},
};

const CHIME_FAILED: &str = "NOTIFY_CHIME_FAILED";
const MARK_READ_CONFIRM_FAILED: &str = "NOTIFY_MARK_READ_CONFIRM_FAILED";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationQuery {
    pub page: u32,
    pub limit: u32,
    pub unread_only: bool,
}

impl Default for NotificationQuery {
    fn default() -> Self {
        Self {
            page: 1,
            limit: 20,
            unread_only: false,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationPage {
    pub notifications: Vec<Notification>,
    pub total: u32,
    pub page: u32,
    pub limit: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationSourceError {
    Unauthorized,
    Unavailable,
    InvalidData,
}

#[async_trait]
pub trait NotificationSource {
    async fn list_notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<NotificationPage, NotificationSourceError>;
}

#[async_trait]
pub trait NotificationWriter {
    async fn mark_read(&self, notification_ids: &[String]) -> Result<(), NotificationSourceError>;
    async fn mark_all_read(&self) -> Result<(), NotificationSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationError {
    Unauthorized,
    TemporarilyUnavailable,
    DataContractViolation,
}

impl std::fmt::Display for NotificationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Unauthorized => f.write_str("not authorized"),
            Self::TemporarilyUnavailable => f.write_str("notification service unavailable"),
            Self::DataContractViolation => f.write_str("notification payload could not be read"),
        }
    }
}

impl std::error::Error for NotificationError {}

/// Orchestrator for the session-wide notification stream.
pub struct NotificationCenter<S, A>
where
    S: NotificationSource + NotificationWriter,
    A: AlertSink,
{
    source: S,
    alerts: A,
    feed: NotificationFeed,
}

impl<S, A> NotificationCenter<S, A>
where
    S: NotificationSource + NotificationWriter,
    A: AlertSink,
{
    pub fn new(source: S, alerts: A) -> Self {
        Self {
            source,
            alerts,
            feed: NotificationFeed::default(),
        }
    }

    pub fn feed(&self) -> &NotificationFeed {
        &self.feed
    }

    pub fn has_unread(&self) -> bool {
        self.feed.has_unread()
    }

    /// Applies one event from the session connection. Only `notification`
    /// events matter here; everything else belongs to order rooms.
    pub fn apply_event(&mut self, event: &ServerEvent) {
        let ServerEvent::Notification(notification) = event else {
            return;
        };

        self.alerts.toast(&Toast {
            title: notification.title.clone(),
            body: notification.body.clone(),
            action: notification.action.clone(),
        });
        if let Err(error) = self.alerts.chime() {
            tracing::debug!(code = CHIME_FAILED, error = %error, "notification chime failed");
        }
        self.feed.push_incoming(notification.clone());
    }

    /// Bulk-loads a page of notifications into the feed.
    pub async fn refresh(&mut self, query: &NotificationQuery) -> Result<(), NotificationError> {
        let page = self
            .source
            .list_notifications(query)
            .await
            .map_err(map_source_error)?;
        self.feed.set_snapshot(page.notifications);
        Ok(())
    }

    /// Marks the named notifications read: the feed flips immediately, the
    /// confirming REST call runs underneath. A confirmation failure is
    /// returned for a toast but the local flip stays.
    pub async fn mark_read(&mut self, ids: Vec<String>) -> Result<(), NotificationError> {
        self.feed.mark_read(&ids);

        self.source.mark_read(&ids).await.map_err(|error| {
            tracing::warn!(
                code = MARK_READ_CONFIRM_FAILED,
                count = ids.len(),
                "mark-read confirmation failed; local state kept"
            );
            map_source_error(error)
        })
    }

    /// Marks everything read, same optimistic-then-confirm shape.
    pub async fn mark_all_read(&mut self) -> Result<(), NotificationError> {
        self.feed.mark_all_read();

        self.source.mark_all_read().await.map_err(|error| {
            tracing::warn!(
                code = MARK_READ_CONFIRM_FAILED,
                "mark-all-read confirmation failed; local state kept"
            );
            map_source_error(error)
        })
    }
}

fn map_source_error(error: NotificationSourceError) -> NotificationError {
    match error {
        NotificationSourceError::Unauthorized => NotificationError::Unauthorized,
        NotificationSourceError::Unavailable => NotificationError::TemporarilyUnavailable,
        NotificationSourceError::InvalidData => NotificationError::DataContractViolation,
    }
}
