//! Notification REST endpoints behind the usecase source traits.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    domain::notification::Notification,
    usecases::notifications::{
        NotificationPage, NotificationQuery, NotificationSource, NotificationSourceError,
        NotificationWriter,
    },
};

use super::rest::{classify_status, ApiFailure, RestClient};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct NotificationPageDto {
    notifications: Vec<Notification>,
    total: u32,
    page: u32,
    limit: u32,
}

impl From<NotificationPageDto> for NotificationPage {
    fn from(dto: NotificationPageDto) -> Self {
        Self {
            notifications: dto.notifications,
            total: dto.total,
            page: dto.page,
            limit: dto.limit,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct MarkReadRequest<'a> {
    notification_ids: &'a [String],
}

#[async_trait]
impl NotificationSource for RestClient {
    async fn list_notifications(
        &self,
        query: &NotificationQuery,
    ) -> Result<NotificationPage, NotificationSourceError> {
        let url = self.endpoint(&["notifications"]);
        let response = self
            .http
            .get(url)
            .bearer_auth(self.bearer())
            .query(&[
                ("page", query.page.to_string()),
                ("limit", query.limit.to_string()),
                ("unreadOnly", query.unread_only.to_string()),
            ])
            .send()
            .await
            .map_err(|_| NotificationSourceError::Unavailable)?;

        classify_status(response.status()).map_err(notification_failure)?;

        response
            .json::<NotificationPageDto>()
            .await
            .map(NotificationPage::from)
            .map_err(|_| NotificationSourceError::InvalidData)
    }
}

#[async_trait]
impl NotificationWriter for RestClient {
    async fn mark_read(
        &self,
        notification_ids: &[String],
    ) -> Result<(), NotificationSourceError> {
        let url = self.endpoint(&["notifications", "mark-read"]);
        let response = self
            .http
            .patch(url)
            .bearer_auth(self.bearer())
            .json(&MarkReadRequest { notification_ids })
            .send()
            .await
            .map_err(|_| NotificationSourceError::Unavailable)?;

        classify_status(response.status()).map_err(notification_failure)
    }

    async fn mark_all_read(&self) -> Result<(), NotificationSourceError> {
        let url = self.endpoint(&["notifications", "mark-all-read"]);
        let response = self
            .http
            .patch(url)
            .bearer_auth(self.bearer())
            .send()
            .await
            .map_err(|_| NotificationSourceError::Unavailable)?;

        classify_status(response.status()).map_err(notification_failure)
    }
}

fn notification_failure(failure: ApiFailure) -> NotificationSourceError {
    match failure {
        ApiFailure::Unauthorized => NotificationSourceError::Unauthorized,
        // The notification surface has no per-resource 404 semantics.
        ApiFailure::NotFound | ApiFailure::Unavailable => NotificationSourceError::Unavailable,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mark_read_request_serializes_with_camel_case_ids() {
        let ids = vec!["n-1".to_owned(), "n-2".to_owned()];
        let request = MarkReadRequest {
            notification_ids: &ids,
        };

        let encoded = serde_json::to_value(&request).expect("request must encode");

        assert_eq!(
            encoded,
            serde_json::json!({"notificationIds": ["n-1", "n-2"]})
        );
    }

    #[test]
    fn page_dto_decodes_and_converts() {
        let raw = r#"{
            "notifications": [],
            "total": 0,
            "page": 1,
            "limit": 20
        }"#;

        let dto: NotificationPageDto = serde_json::from_str(raw).expect("dto must decode");
        let page = NotificationPage::from(dto);

        assert_eq!(page.total, 0);
        assert_eq!(page.page, 1);
        assert_eq!(page.limit, 20);
    }
}
