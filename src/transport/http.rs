//! `reqwest`-backed transport.

use std::error::Error as StdError;
use std::io;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;
use reqwest::Client;

use crate::transport::{
    OutboundRequest, Transport, TransportError, TransportErrorKind, TransportResponse,
};

/// HTTP transport over a shared `reqwest::Client`.
///
/// The client is built without its own request timeout; the executor owns the
/// per-attempt deadline.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, TransportError> {
        let client = Client::builder()
            .user_agent(concat!("request-executor/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::new(TransportErrorKind::InvalidRequest, e.to_string()))?;
        Ok(Self { client })
    }

    /// Wrap an existing client (custom TLS, proxies, pooling).
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: OutboundRequest) -> Result<TransportResponse, TransportError> {
        let mut builder = self
            .client
            .request(request.method, request.url)
            .headers(request.headers);
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(classify_reqwest_error)?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response.bytes().await.map_err(classify_reqwest_error)?;

        Ok(TransportResponse {
            status,
            content_type,
            body: body.to_vec(),
        })
    }
}

/// Map a `reqwest` error onto a structured transport kind.
fn classify_reqwest_error(err: reqwest::Error) -> TransportError {
    let message = error_chain_message(&err);

    let kind = if err.is_builder() {
        TransportErrorKind::InvalidRequest
    } else if err.is_timeout() {
        TransportErrorKind::TimedOut
    } else if is_dns_failure(&err) {
        TransportErrorKind::Dns
    } else if err.is_connect() {
        TransportErrorKind::Connect
    } else if has_reset_cause(&err) {
        TransportErrorKind::Reset
    } else if err.is_body() || err.is_decode() {
        TransportErrorKind::Body
    } else {
        TransportErrorKind::Other
    };

    TransportError::new(kind, message)
}

fn error_chain_message(err: &(dyn StdError + 'static)) -> String {
    let mut message = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    message
}

fn has_reset_cause(err: &(dyn StdError + 'static)) -> bool {
    let mut source = err.source();
    while let Some(cause) = source {
        if let Some(io_err) = cause.downcast_ref::<io::Error>() {
            if matches!(
                io_err.kind(),
                io::ErrorKind::ConnectionReset
                    | io::ErrorKind::ConnectionAborted
                    | io::ErrorKind::BrokenPipe
                    | io::ErrorKind::UnexpectedEof
            ) {
                return true;
            }
        }
        source = cause.source();
    }
    false
}

// hyper's connector reports resolver failures as an opaque "dns error" cause.
fn is_dns_failure(err: &reqwest::Error) -> bool {
    err.is_connect() && error_chain_message(err).to_ascii_lowercase().contains("dns error")
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::HeaderMap;
    use reqwest::Method;

    #[tokio::test]
    async fn test_connection_refused_is_connect_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let transport = HttpTransport::with_client(Client::builder().no_proxy().build().unwrap());
        let request = OutboundRequest {
            method: Method::GET,
            url: format!("http://{}/", addr).parse().unwrap(),
            headers: HeaderMap::new(),
            body: None,
        };

        let err = transport.send(request).await.unwrap_err();
        assert_eq!(err.kind, TransportErrorKind::Connect);
    }
}
