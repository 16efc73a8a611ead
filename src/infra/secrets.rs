use std::panic;

const REDACTED: &str = "[redacted]";

const SENSITIVE_MARKERS: [&str; 6] = [
    "token",
    "bearer",
    "secret",
    "password",
    "authorization",
    "credential",
];

/// Shortest contiguous alphanumeric run treated as an opaque credential.
const OPAQUE_VALUE_MIN_LEN: usize = 20;

/// Opaque bearer credential for the backend.
///
/// The client never parses, refreshes, or validates it. It is presented
/// once during the connection handshake and on REST calls. Debug and
/// Display render a placeholder so the raw value cannot leak into logs.
#[derive(Clone)]
pub struct BearerToken(String);

impl BearerToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::fmt::Debug for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("BearerToken([redacted])")
    }
}

impl std::fmt::Display for BearerToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(REDACTED)
    }
}

/// Scrubs credential-looking fragments out of free-form text.
pub fn redact_text(input: &str) -> String {
    input
        .split_whitespace()
        .map(redact_chunk)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Replaces the panic hook with one that scrubs the payload before it
/// reaches stderr. Panic payloads can embed request context, and request
/// context can embed the bearer credential.
pub fn install_panic_redaction_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        let scrubbed = redact_text(&payload);

        match panic_info.location() {
            Some(location) => eprintln!(
                "loadroom panic: {} at {}:{}:{}",
                scrubbed,
                location.file(),
                location.line(),
                location.column()
            ),
            None => eprintln!("loadroom panic: {}", scrubbed),
        }
    }));
}

fn redact_chunk(chunk: &str) -> String {
    let lowered = chunk.to_ascii_lowercase();
    let marked = SENSITIVE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker));

    if marked || looks_like_opaque_value(chunk) {
        REDACTED.to_owned()
    } else {
        chunk.to_owned()
    }
}

fn looks_like_opaque_value(value: &str) -> bool {
    let trimmed = value.trim_matches(|ch: char| !ch.is_ascii_alphanumeric());
    trimmed.len() >= OPAQUE_VALUE_MIN_LEN
        && trimmed
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_' || ch == '.')
}
