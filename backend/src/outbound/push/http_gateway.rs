//! Reqwest-backed push gateway adapter.
//!
//! Speaks the Expo push HTTP contract: one JSON message per POST, the notice
//! identifier under `data.noticeId` for tap-through navigation. This adapter
//! owns transport details only — timeouts, status mapping, serialisation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::Serialize;

use crate::domain::ports::{PushGateway, PushGatewayError, PushMessage};

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Push gateway adapter performing HTTP POST requests against one endpoint.
pub struct HttpPushGateway {
    client: Client,
    endpoint: Url,
}

impl HttpPushGateway {
    /// Build an adapter with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(endpoint: Url) -> Result<Self, reqwest::Error> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    /// Build an adapter with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_timeout(endpoint: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client, endpoint })
    }
}

#[derive(Debug, Serialize)]
struct PushRequestDto<'a> {
    to: &'a str,
    title: &'a str,
    body: &'a str,
    sound: &'static str,
    priority: &'static str,
    data: PushDataDto<'a>,
}

#[derive(Debug, Serialize)]
struct PushDataDto<'a> {
    #[serde(rename = "noticeId")]
    notice_id: &'a str,
}

impl<'a> From<&'a PushMessage> for PushRequestDto<'a> {
    fn from(message: &'a PushMessage) -> Self {
        Self {
            to: message.to.as_ref(),
            title: &message.title,
            body: &message.body,
            sound: "default",
            priority: "high",
            data: PushDataDto {
                notice_id: &message.notice_id,
            },
        }
    }
}

#[async_trait]
impl PushGateway for HttpPushGateway {
    async fn deliver(&self, message: &PushMessage) -> Result<(), PushGatewayError> {
        let response = self
            .client
            .post(self.endpoint.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .json(&PushRequestDto::from(message))
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.unwrap_or_default();
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> PushGatewayError {
    PushGatewayError::transport(error.to_string())
}

fn map_status_error(status: StatusCode, body: &[u8]) -> PushGatewayError {
    let preview = body_preview(body);
    let message = if preview.is_empty() {
        format!("status {}", status.as_u16())
    } else {
        format!("status {}: {}", status.as_u16(), preview)
    };
    if status.is_server_error() {
        PushGatewayError::transport(message)
    } else {
        PushGatewayError::rejected(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 120;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::PushToken;
    use rstest::rstest;
    use serde_json::Value;

    #[test]
    fn request_body_carries_the_notice_id_payload() {
        let message = PushMessage {
            to: PushToken::new("ExponentPushToken[abc]").expect("token"),
            title: "Exam".to_owned(),
            body: "Hall 3".to_owned(),
            notice_id: "n1".to_owned(),
        };
        let value = serde_json::to_value(PushRequestDto::from(&message)).expect("serialise");
        assert_eq!(
            value.get("to").and_then(Value::as_str),
            Some("ExponentPushToken[abc]")
        );
        assert_eq!(
            value
                .get("data")
                .and_then(|data| data.get("noticeId"))
                .and_then(Value::as_str),
            Some("n1")
        );
        assert_eq!(value.get("sound").and_then(Value::as_str), Some("default"));
    }

    #[rstest]
    #[case::client_error(StatusCode::BAD_REQUEST, true)]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_statuses_to_rejected_or_transport(#[case] status: StatusCode, #[case] rejected: bool) {
        let error = map_status_error(status, b"{\"errors\":[]}");
        match error {
            PushGatewayError::Rejected { .. } => assert!(rejected, "{status} should be transport"),
            PushGatewayError::Transport { .. } => assert!(!rejected, "{status} should be rejected"),
        }
    }

    #[test]
    fn long_bodies_are_trimmed_in_error_messages() {
        let body = "x".repeat(500);
        let error = map_status_error(StatusCode::BAD_REQUEST, body.as_bytes());
        let text = error.to_string();
        assert!(text.len() < 300, "preview must be bounded, got {}", text.len());
        assert!(text.ends_with("..."));
    }
}
