//! Chat REST endpoints behind the usecase source traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    domain::message::Message,
    usecases::{
        fetch_unread::{UnreadSource, UnreadSourceError},
        load_history::{HistorySource, HistorySourceError},
        send_message::{MessageSender, SendSourceError},
    },
};

use super::rest::{classify_status, ApiFailure, RestClient};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct SendMessageRequest<'a> {
    message: &'a str,
    order_id: &'a str,
}

#[derive(Debug, Deserialize)]
struct UnreadCountResponse {
    count: u32,
}

#[async_trait]
impl HistorySource for RestClient {
    async fn list_messages(&self, order_id: &str) -> Result<Vec<Message>, HistorySourceError> {
        let url = self.endpoint(&["chat", "orders", order_id, "messages"]);
        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|_| HistorySourceError::Unavailable)?;

        classify_status(response.status()).map_err(history_failure)?;

        response
            .json::<Vec<Message>>()
            .await
            .map_err(|_| HistorySourceError::InvalidData)
    }
}

#[async_trait]
impl MessageSender for RestClient {
    async fn send_message(
        &self,
        order_id: &str,
        body: &str,
    ) -> Result<Message, SendSourceError> {
        let url = self.endpoint(&["chat", "messages"]);
        let response = self
            .http
            .post(url)
            .bearer_auth(self.bearer())
            .json(&SendMessageRequest {
                message: body,
                order_id,
            })
            .send()
            .await
            .map_err(|_| SendSourceError::Unavailable)?;

        classify_status(response.status()).map_err(send_failure)?;

        response
            .json::<Message>()
            .await
            .map_err(|_| SendSourceError::InvalidData)
    }
}

#[async_trait]
impl UnreadSource for RestClient {
    async fn unread_count(&self, order_id: &str) -> Result<u32, UnreadSourceError> {
        let url = self.endpoint(&["chat", "orders", order_id, "unread-count"]);
        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|_| UnreadSourceError::Unavailable)?;

        classify_status(response.status()).map_err(unread_failure)?;

        response
            .json::<UnreadCountResponse>()
            .await
            .map(|payload| payload.count)
            .map_err(|_| UnreadSourceError::InvalidData)
    }
}

fn history_failure(failure: ApiFailure) -> HistorySourceError {
    match failure {
        ApiFailure::Unauthorized => HistorySourceError::Unauthorized,
        ApiFailure::NotFound => HistorySourceError::OrderNotFound,
        ApiFailure::Unavailable => HistorySourceError::Unavailable,
    }
}

fn send_failure(failure: ApiFailure) -> SendSourceError {
    match failure {
        ApiFailure::Unauthorized => SendSourceError::Unauthorized,
        ApiFailure::NotFound => SendSourceError::OrderNotFound,
        ApiFailure::Unavailable => SendSourceError::Unavailable,
    }
}

fn unread_failure(failure: ApiFailure) -> UnreadSourceError {
    match failure {
        ApiFailure::Unauthorized => UnreadSourceError::Unauthorized,
        ApiFailure::NotFound => UnreadSourceError::OrderNotFound,
        ApiFailure::Unavailable => UnreadSourceError::Unavailable,
    }
}
