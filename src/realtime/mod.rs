//! Realtime layer: the persistent session connection and its transport.

pub mod connection;
pub mod transport;
pub mod ws;

/// Returns the realtime module name for smoke checks.
pub fn module_name() -> &'static str {
    "realtime"
}
