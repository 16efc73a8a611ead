//! Use case layer: chat and notification workflows over injected seams.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod fetch_unread;
pub mod load_history;
pub mod notifications;
pub mod room_session;
pub mod send_message;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
