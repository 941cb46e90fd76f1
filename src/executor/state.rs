//! Observable lifecycle of an executor.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use crate::executor::error::RequestError;
use crate::transport::TransportResponse;

/// Lifecycle status. Exactly one is active at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestStatus {
    #[default]
    Idle,
    Loading,
    Success,
    Error,
    Timeout,
}

impl RequestStatus {
    /// Success, Error or Timeout.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Success | Self::Error | Self::Timeout)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Error | Self::Timeout)
    }
}

/// Decoded response body.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Payload {
    Json(Value),
    Text(String),
}

impl Payload {
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            Payload::Json(value) => Some(value),
            Payload::Text(_) => None,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            Payload::Text(text) => Some(text),
            Payload::Json(_) => None,
        }
    }

    /// Deserialize a JSON payload into a typed value.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        match self {
            Payload::Json(value) => serde_json::from_value(value.clone()),
            Payload::Text(text) => serde_json::from_str(text),
        }
    }

    /// Application-level message carried by an error body, if any.
    fn error_message(&self) -> Option<String> {
        let obj = self.as_json()?.as_object()?;
        ["message", "error"]
            .iter()
            .find_map(|key| obj.get(*key).and_then(Value::as_str))
            .filter(|msg| !msg.is_empty())
            .map(str::to_string)
    }
}

/// Decode a settled response: JSON when declared, text otherwise, then
/// reject anything outside 2xx.
pub fn decode_response(response: TransportResponse) -> Result<Payload, RequestError> {
    let status = response.status;

    let payload = if response.is_json() {
        if response.body.iter().all(u8::is_ascii_whitespace) {
            Payload::Json(Value::Null)
        } else {
            let value = serde_json::from_slice(&response.body)
                .map_err(|e| RequestError::decode(status, &e))?;
            Payload::Json(value)
        }
    } else {
        Payload::Text(String::from_utf8_lossy(&response.body).into_owned())
    };

    if !(200..300).contains(&status) {
        let message = payload
            .error_message()
            .unwrap_or_else(|| format!("request failed with status {}", status));
        return Err(RequestError::http(status, message));
    }

    Ok(payload)
}

/// Snapshot of an executor's single request slot.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct RequestState {
    pub status: RequestStatus,
    pub data: Option<Payload>,
    pub error: Option<RequestError>,
    pub retry_count: u32,
}

impl RequestState {
    pub fn loading() -> Self {
        Self {
            status: RequestStatus::Loading,
            ..Self::default()
        }
    }

    pub fn success(data: Payload, retry_count: u32) -> Self {
        Self {
            status: RequestStatus::Success,
            data: Some(data),
            error: None,
            retry_count,
        }
    }

    /// Error or Timeout, depending on the failure.
    pub fn failed(error: RequestError, retry_count: u32) -> Self {
        let status = if error.is_timeout {
            RequestStatus::Timeout
        } else {
            RequestStatus::Error
        };
        Self {
            status,
            data: None,
            error: Some(error),
            retry_count,
        }
    }

    pub fn is_idle(&self) -> bool {
        self.status == RequestStatus::Idle
    }

    pub fn is_loading(&self) -> bool {
        self.status == RequestStatus::Loading
    }

    pub fn is_success(&self) -> bool {
        self.status == RequestStatus::Success
    }

    /// True only for non-timeout failures.
    pub fn is_error(&self) -> bool {
        self.status == RequestStatus::Error
    }

    pub fn is_timeout(&self) -> bool {
        self.status == RequestStatus::Timeout
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::executor::error::ErrorKind;
    use serde_json::json;

    #[test]
    fn test_decode_json_success() {
        let response = TransportResponse::new(200, Some("application/json"), r#"{"ok":true}"#);
        assert_eq!(decode_response(response).unwrap(), Payload::Json(json!({"ok": true})));
    }

    #[test]
    fn test_decode_text_success() {
        let response = TransportResponse::new(200, Some("text/plain"), "pong");
        assert_eq!(decode_response(response).unwrap(), Payload::Text("pong".into()));
    }

    #[test]
    fn test_empty_json_body_is_null() {
        let response = TransportResponse::new(204, Some("application/json"), "");
        assert_eq!(decode_response(response).unwrap(), Payload::Json(Value::Null));
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let response = TransportResponse::new(200, Some("application/json"), "{not json");
        let err = decode_response(response).unwrap_err();
        assert_eq!(err.kind, ErrorKind::Decode);
        assert_eq!(err.http_status, Some(200));
    }

    #[test]
    fn test_error_body_message_is_used() {
        let response = TransportResponse::new(
            422,
            Some("application/json"),
            r#"{"message":"quotation already approved"}"#,
        );
        let err = decode_response(response).unwrap_err();
        assert_eq!(err.message, "quotation already approved");
        assert_eq!(err.http_status, Some(422));
        assert_eq!(err.kind, ErrorKind::Client);
    }

    #[test]
    fn test_error_field_fallback() {
        let response = TransportResponse::new(400, Some("application/json"), r#"{"error":"bad po"}"#);
        assert_eq!(decode_response(response).unwrap_err().message, "bad po");

        let response = TransportResponse::new(404, Some("text/html"), "<h1>Not Found</h1>");
        assert_eq!(
            decode_response(response).unwrap_err().message,
            "request failed with status 404"
        );
    }

    #[test]
    fn test_failed_state_status() {
        let timeout = RequestState::failed(RequestError::timeout(std::time::Duration::from_secs(1)), 3);
        assert!(timeout.is_timeout());
        assert!(!timeout.is_error());
        assert_eq!(timeout.retry_count, 3);

        let error = RequestState::failed(RequestError::http(404, "missing"), 0);
        assert!(error.is_error());
        assert!(!error.is_timeout());
        assert!(error.data.is_none());
    }

    #[test]
    fn test_typed_payload() {
        #[derive(serde::Deserialize)]
        struct Lead {
            id: u32,
        }
        let payload = Payload::Json(json!({"id": 42}));
        let lead: Lead = payload.json().unwrap();
        assert_eq!(lead.id, 42);
    }
}
