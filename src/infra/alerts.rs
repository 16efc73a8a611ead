use std::io::Write;

use anyhow::Result;

use crate::infra::contracts::{AlertSink, Toast};

/// Terminal implementation of the alert surface: toasts print to stderr so
/// they interleave with but never corrupt the chat output on stdout; the
/// chime is the terminal bell.
#[derive(Debug, Clone, Default)]
pub struct TerminalAlertSink;

impl AlertSink for TerminalAlertSink {
    fn toast(&self, toast: &Toast) {
        match &toast.action {
            Some(action) => eprintln!(
                "[!] {}: {} ({}: {})",
                toast.title, toast.body, action.label, action.url
            ),
            None => eprintln!("[!] {}: {}", toast.title, toast.body),
        }
    }

    fn chime(&self) -> Result<()> {
        let mut stderr = std::io::stderr();
        stderr.write_all(b"\x07")?;
        stderr.flush()?;
        Ok(())
    }
}
