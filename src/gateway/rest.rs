use reqwest::StatusCode;
use url::Url;

use crate::infra::secrets::BearerToken;

/// Shared REST plumbing: one HTTP client, the API base URL, and the bearer
/// credential attached to every call. No client-side timeout is layered on
/// top of the HTTP client's own defaults.
pub struct RestClient {
    pub(crate) http: reqwest::Client,
    base_url: Url,
    token: BearerToken,
}

impl RestClient {
    pub fn new(base_url: Url, token: BearerToken) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url,
            token,
        }
    }

    pub(crate) fn bearer(&self) -> &str {
        self.token.expose()
    }

    /// Builds an endpoint URL by appending path segments to the base. The
    /// base path is preserved whether or not it carries a trailing slash.
    pub(crate) fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut path) = url.path_segments_mut() {
            path.pop_if_empty();
            for segment in segments {
                path.push(segment);
            }
        }
        url
    }
}

/// Transport-agnostic classification of a REST response status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ApiFailure {
    Unauthorized,
    NotFound,
    Unavailable,
}

pub(crate) fn classify_status(status: StatusCode) -> Result<(), ApiFailure> {
    if status.is_success() {
        return Ok(());
    }
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Err(ApiFailure::Unauthorized),
        StatusCode::NOT_FOUND => Err(ApiFailure::NotFound),
        _ => Err(ApiFailure::Unavailable),
    }
}
