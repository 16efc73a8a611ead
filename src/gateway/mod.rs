//! Gateway layer: REST adapters over the backend API.

mod chat;
mod notifications;
mod rest;

pub use rest::RestClient;

/// Returns the gateway module name for smoke checks.
pub fn module_name() -> &'static str {
    "gateway"
}
