//! Per-call request options and credentials.

use std::fmt;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue, InvalidHeaderValue, CONTENT_TYPE};
use reqwest::Method;
use serde::Serialize;

use crate::executor::error::RequestError;

/// Method, headers and body of one logical call.
#[derive(Debug, Clone, Default)]
pub struct RequestOptions {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Option<Vec<u8>>,
}

impl RequestOptions {
    pub fn new(method: Method) -> Self {
        Self {
            method,
            ..Self::default()
        }
    }

    pub fn header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.insert(name, value);
        self
    }

    pub fn body(mut self, body: impl Into<Vec<u8>>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Mark the call as exchanging JSON.
    pub fn json_content(self) -> Self {
        self.header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
    }

    /// Serialize `body` as JSON and set the content type.
    pub fn json<B: Serialize + ?Sized>(self, body: &B) -> Result<Self, RequestError> {
        let bytes = serde_json::to_vec(body)
            .map_err(|e| RequestError::invalid_request(format!("failed to serialize body: {}", e)))?;
        Ok(self.json_content().body(bytes))
    }
}

/// Explicit caller credential attached to outbound requests.
#[derive(Clone, PartialEq, Eq)]
pub enum Credential {
    Bearer(String),
}

impl Credential {
    /// Value for the `Authorization` header.
    pub fn header_value(&self) -> Result<HeaderValue, InvalidHeaderValue> {
        match self {
            Credential::Bearer(token) => {
                let mut value = HeaderValue::from_str(&format!("Bearer {}", token))?;
                value.set_sensitive(true);
                Ok(value)
            }
        }
    }
}

// Tokens never reach logs.
impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Bearer(_) => f.write_str("Bearer(<redacted>)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_body() {
        let options = RequestOptions::new(Method::POST)
            .json(&serde_json::json!({"customer": "ACME Tubes"}))
            .unwrap();
        assert_eq!(options.headers[CONTENT_TYPE], "application/json");
        assert_eq!(options.body.unwrap(), br#"{"customer":"ACME Tubes"}"#.to_vec());
    }

    #[test]
    fn test_default_is_get() {
        let options = RequestOptions::default();
        assert_eq!(options.method, Method::GET);
        assert!(options.body.is_none());
    }

    #[test]
    fn test_credential_is_redacted() {
        let credential = Credential::Bearer("s3cret".into());
        assert_eq!(format!("{:?}", credential), "Bearer(<redacted>)");
        let value = credential.header_value().unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer s3cret");
    }
}
