use async_trait::async_trait;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UnreadSourceError {
    Unauthorized,
    OrderNotFound,
    Unavailable,
    InvalidData,
}

#[async_trait]
pub trait UnreadSource {
    async fn unread_count(&self, order_id: &str) -> Result<u32, UnreadSourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchUnreadError {
    Unauthorized,
    OrderNotFound,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Seeds the unread badge for a freshly joined room. The history fetch
/// does not report a count, so this is a dedicated call.
pub async fn fetch_unread_count(
    source: &dyn UnreadSource,
    order_id: &str,
) -> Result<u32, FetchUnreadError> {
    source
        .unread_count(order_id)
        .await
        .map_err(map_source_error)
}

fn map_source_error(error: UnreadSourceError) -> FetchUnreadError {
    match error {
        UnreadSourceError::Unauthorized => FetchUnreadError::Unauthorized,
        UnreadSourceError::OrderNotFound => FetchUnreadError::OrderNotFound,
        UnreadSourceError::Unavailable => FetchUnreadError::TemporarilyUnavailable,
        UnreadSourceError::InvalidData => FetchUnreadError::DataContractViolation,
    }
}
