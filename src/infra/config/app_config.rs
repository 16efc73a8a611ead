use std::path::PathBuf;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct AppConfig {
    pub logging: LogConfig,
    pub server: ServerConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct LogConfig {
    pub level: String,
    /// When set, diagnostics go to a rolling file in this directory instead
    /// of stderr, keeping the interactive chat output clean.
    pub directory: Option<PathBuf>,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_owned(),
            directory: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ServerConfig {
    /// Base URL of the REST API.
    pub rest_url: String,
    /// URL of the realtime event socket.
    pub events_url: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            rest_url: "http://localhost:3000/api".to_owned(),
            events_url: "ws://localhost:3000/events".to_owned(),
        }
    }
}
