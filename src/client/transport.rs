//! Injectable HTTP transport.
//!
//! The executor never talks to the network directly. It hands each prepared
//! [`HttpRequest`] to an [`HttpTransport`] and interprets whatever comes back.
//! [`ReqwestTransport`] is the default implementation; tests and embedders can
//! substitute their own.

use crate::client::ClientConfig;
use crate::error::BoxError;
use crate::types::{HttpRequest, TransportResponse};
use async_trait::async_trait;
use http::{HeaderName, HeaderValue};
use std::collections::BTreeMap;
use std::time::Duration;

/// Sends prepared requests.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send `request`.
    ///
    /// `Ok(None)` means the exchange completed without HTTP response metadata.
    /// Errors are passed to the caller unchanged.
    async fn send(&self, request: HttpRequest) -> Result<Option<TransportResponse>, BoxError>;
}

/// Transport backed by a pooled `reqwest::Client`.
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    client: reqwest::Client,
    enable_logging: bool,
}

impl ReqwestTransport {
    /// Transport with the default [`ClientConfig`].
    pub fn new() -> Result<Self, BoxError> {
        Self::with_config(&ClientConfig::default())
    }

    /// Transport configured from `config`.
    ///
    /// # Errors
    ///
    /// Fails when the proxy URL is invalid or the TLS backend cannot start.
    pub fn with_config(config: &ClientConfig) -> Result<Self, BoxError> {
        let mut builder = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.request_timeout_ms))
            .pool_idle_timeout(Duration::from_secs(config.pool_idle_timeout_secs))
            .pool_max_idle_per_host(config.max_idle_connections_per_host as usize)
            .cookie_store(config.cookie_store);

        if !config.proxy_url.is_empty() {
            builder = builder.proxy(reqwest::Proxy::all(&config.proxy_url)?);
        }

        Ok(ReqwestTransport {
            client: builder.build()?,
            enable_logging: config.enable_logging,
        })
    }

    /// Wrap an already configured client.
    pub fn from_client(client: reqwest::Client) -> Self {
        ReqwestTransport {
            client,
            enable_logging: false,
        }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn send(&self, request: HttpRequest) -> Result<Option<TransportResponse>, BoxError> {
        if self.enable_logging {
            tracing::debug!(method = %request.method, url = %request.url, "sending request");
        }

        let mut req_builder = self
            .client
            .request(request.method.into(), request.url.clone());

        for (name, value) in request.headers() {
            let name = HeaderName::try_from(name)?;
            let value = HeaderValue::try_from(value)?;
            req_builder = req_builder.header(name, value);
        }

        if let Some(body) = request.body {
            req_builder = req_builder.body(body);
        }

        let response = req_builder.send().await?;
        let status = response.status().as_u16();

        let headers = collect_headers(response.headers());
        let body = response.bytes().await?;

        if self.enable_logging {
            tracing::debug!(status, bytes = body.len(), "received response");
        }

        Ok(Some(TransportResponse {
            status,
            headers,
            body,
        }))
    }
}

/// Flatten response headers. Values that are not valid UTF-8 are kept with
/// replacement characters; repeated names keep the last value.
fn collect_headers(map: &http::HeaderMap) -> BTreeMap<String, String> {
    map.iter()
        .map(|(name, value)| {
            (
                name.as_str().to_string(),
                String::from_utf8_lossy(value.as_bytes()).into_owned(),
            )
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::HttpMethod;
    use bytes::Bytes;
    use url::Url;

    #[test]
    fn test_invalid_proxy_rejected() {
        let config = ClientConfig {
            proxy_url: "not a proxy".into(),
            ..Default::default()
        };
        assert!(ReqwestTransport::with_config(&config).is_err());
    }

    #[tokio::test]
    async fn test_round_trip_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("PUT", "/items/1")
            .match_header("x-request-id", "abc")
            .match_body("payload")
            .with_status(201)
            .with_header("etag", "\"v2\"")
            .with_body("created")
            .create_async()
            .await;

        let mut request = HttpRequest::new(
            HttpMethod::Put,
            Url::parse(&format!("{}/items/1", server.url())).unwrap(),
        );
        request.set_header("X-Request-Id", "abc");
        request.body = Some(Bytes::from_static(b"payload"));

        let transport = ReqwestTransport::new().unwrap();
        let response = transport.send(request).await.unwrap().unwrap();

        mock.assert_async().await;
        assert_eq!(response.status, 201);
        assert_eq!(response.headers.get("etag").map(String::as_str), Some("\"v2\""));
        assert_eq!(&response.body[..], b"created");
    }

    #[test]
    fn test_non_utf8_header_values_kept_lossily() {
        let mut map = http::HeaderMap::new();
        map.insert("x-plain", HeaderValue::from_static("ok"));
        map.insert("x-latin1", HeaderValue::from_bytes(b"caf\xe9").unwrap());

        let headers = collect_headers(&map);
        assert_eq!(headers.get("x-plain").map(String::as_str), Some("ok"));
        assert_eq!(headers.get("x-latin1").map(String::as_str), Some("caf\u{FFFD}"));
    }

    #[tokio::test]
    async fn test_invalid_header_is_transport_error() {
        let mut request = HttpRequest::new(
            HttpMethod::Get,
            Url::parse("http://127.0.0.1:9/never").unwrap(),
        );
        request.set_header("Bad Header", "x");

        let transport = ReqwestTransport::new().unwrap();
        assert!(transport.send(request).await.is_err());
    }
}
