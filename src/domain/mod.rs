//! Domain layer: chat and notification state machines, wire event types.

pub mod compose_state;
pub mod events;
pub mod message;
pub mod notification;
pub mod notification_feed;
pub mod room_state;
pub mod typing_state;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
