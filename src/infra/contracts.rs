use anyhow::Result;

use crate::{domain::notification::NotificationAction, infra::config::AppConfig};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// A transient user-facing alert.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub body: String,
    pub action: Option<NotificationAction>,
}

/// Surface for transient alerts and the notification chime.
///
/// `chime` is best-effort: callers swallow its failures, they never reach
/// the user or interrupt the primary flow.
pub trait AlertSink {
    fn toast(&self, toast: &Toast);
    fn chime(&self) -> Result<()>;
}
