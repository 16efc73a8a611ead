use async_trait::async_trait;

use crate::domain::message::Message;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadHistoryQuery {
    pub order_id: String,
}

impl LoadHistoryQuery {
    pub fn new(order_id: impl Into<String>) -> Self {
        Self {
            order_id: order_id.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadHistoryOutput {
    pub messages: Vec<Message>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistorySourceError {
    Unauthorized,
    OrderNotFound,
    Unavailable,
    InvalidData,
}

#[async_trait]
pub trait HistorySource {
    async fn list_messages(&self, order_id: &str) -> Result<Vec<Message>, HistorySourceError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadHistoryError {
    MissingOrderId,
    Unauthorized,
    OrderNotFound,
    TemporarilyUnavailable,
    DataContractViolation,
}

/// Fetches the full ordered message history for one order. The backend
/// returns the complete set in one call; there is no pagination cursor.
pub async fn load_history(
    source: &dyn HistorySource,
    query: LoadHistoryQuery,
) -> Result<LoadHistoryOutput, LoadHistoryError> {
    let order_id = query.order_id.trim();
    if order_id.is_empty() {
        return Err(LoadHistoryError::MissingOrderId);
    }

    let messages = source
        .list_messages(order_id)
        .await
        .map_err(map_source_error)?;

    Ok(LoadHistoryOutput { messages })
}

fn map_source_error(error: HistorySourceError) -> LoadHistoryError {
    match error {
        HistorySourceError::Unauthorized => LoadHistoryError::Unauthorized,
        HistorySourceError::OrderNotFound => LoadHistoryError::OrderNotFound,
        HistorySourceError::Unavailable => LoadHistoryError::TemporarilyUnavailable,
        HistorySourceError::InvalidData => LoadHistoryError::DataContractViolation,
    }
}
