use anyhow::Result;

use crate::infra::contracts::{AlertSink, Toast};

#[cfg(test)]
use crate::infra::{config::AppConfig, contracts::ConfigAdapter};

#[cfg(test)]
#[derive(Debug, Clone, Default)]
pub struct StubConfigAdapter;

#[cfg(test)]
impl ConfigAdapter for StubConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        Ok(AppConfig::default())
    }
}

/// Alert sink that drops everything. Used by one-shot commands where
/// transient alerts have nowhere sensible to go.
#[derive(Debug, Clone, Default)]
pub struct SilentAlertSink;

impl AlertSink for SilentAlertSink {
    fn toast(&self, _toast: &Toast) {}

    fn chime(&self) -> Result<()> {
        Ok(())
    }
}
