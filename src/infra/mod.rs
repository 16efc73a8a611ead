//! Infrastructure layer: config, logging, secrets, and alert adapters.

pub mod alerts;
pub mod config;
pub mod contracts;
pub mod error;
pub mod logging;
pub mod secrets;
pub mod stubs;

/// Returns the infra module name for smoke checks.
pub fn module_name() -> &'static str {
    "infra"
}
