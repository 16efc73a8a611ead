use super::notification::{Notification, NotificationStatus};

/// Session-wide notification list, newest first.
///
/// Live pushes are prepended; bulk loads replace the list. Read marks are
/// applied locally first; the confirming REST call runs underneath and a
/// failure there is surfaced by the caller, not rolled back here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotificationFeed {
    items: Vec<Notification>,
}

impl NotificationFeed {
    pub fn items(&self) -> &[Notification] {
        &self.items
    }

    #[cfg_attr(not(test), allow(dead_code))]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// True iff at least one entry is unread. Drives the pulsing badge.
    pub fn has_unread(&self) -> bool {
        self.items.iter().any(Notification::is_unread)
    }

    /// Prepends a live-pushed notification.
    pub fn push_incoming(&mut self, notification: Notification) {
        self.items.insert(0, notification);
    }

    /// Replaces the list with a bulk-fetched page.
    pub fn set_snapshot(&mut self, items: Vec<Notification>) {
        self.items = items;
    }

    /// Flips the named entries to read. Unknown ids are ignored.
    pub fn mark_read(&mut self, ids: &[String]) {
        for item in &mut self.items {
            if ids.iter().any(|id| id == &item.id) {
                item.status = NotificationStatus::Read;
            }
        }
    }

    /// Flips every unread entry to read. Archived entries are untouched.
    pub fn mark_all_read(&mut self) {
        for item in &mut self.items {
            if item.status == NotificationStatus::Unread {
                item.status = NotificationStatus::Read;
            }
        }
    }
}
