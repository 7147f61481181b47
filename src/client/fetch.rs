//! Client facade.
//!
//! [`NetworkClient`] ties a base URL to one [`RequestExecutor`]. Every builder
//! it creates shares that executor, so all of them share one transport and
//! one refresh coordinator. Clones of the client share them too.
//!
//! # Examples
//!
//! ## Default transport
//!
//! ```
//! use netman::{HttpMethod, NetworkClient};
//!
//! # fn main() -> netman::Result<()> {
//! let client = NetworkClient::new("https://api.test/v1")?;
//! let request = client.build("users", HttpMethod::Get)?;
//! assert_eq!(request.request().url.as_str(), "https://api.test/v1/users");
//! # Ok(())
//! # }
//! ```
//!
//! ## Refresh on 401
//!
//! ```ignore
//! use netman::{HttpMethod, NetworkClient, Refresh, Status};
//!
//! let client = NetworkClient::builder("https://api.test/v1")
//!     .refresh(Refresh::new(Status::Unauthorized, move || {
//!         let tokens = tokens.clone();
//!         async move { tokens.renew().await }
//!     }))
//!     .build()?;
//!
//! let me: Profile = client
//!     .build("me", HttpMethod::Get)?
//!     .modifier(&auth)
//!     .with_refresh()
//!     .send()
//!     .await?;
//! ```

use crate::client::{
    BodyDecoder, ClientConfig, HttpTransport, MimeLookup, MultipartAssembler,
    MultipartRequestBuilder, Refresh, RequestBuilder, RequestExecutor, ReqwestTransport,
};
use crate::error::{NetworkError, Result};
use crate::protocol::{HttpMethod, MultipartMethod};
use crate::types::HttpRequest;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::path::Path;
use std::sync::Arc;

/// Entry point for building and executing requests against one base URL.
#[derive(Debug, Clone)]
pub struct NetworkClient {
    base_url: Arc<str>,
    executor: Arc<RequestExecutor>,
}

impl NetworkClient {
    /// Client using the reqwest transport with the default configuration.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Transport`] when the HTTP client cannot be created.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::builder(base_url).build()
    }

    /// Start configuring a client.
    pub fn builder(base_url: impl Into<String>) -> NetworkClientBuilder {
        NetworkClientBuilder::new(base_url)
    }

    /// Client over an existing executor.
    pub fn from_executor(base_url: impl Into<String>, executor: Arc<RequestExecutor>) -> Self {
        NetworkClient {
            base_url: Arc::from(base_url.into()),
            executor,
        }
    }

    /// Base URL requests are resolved against.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// The shared executor.
    pub fn executor(&self) -> &Arc<RequestExecutor> {
        &self.executor
    }

    /// Start a request for `path`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UrlConstruction`] when the base URL is invalid.
    pub fn build(&self, path: &str, method: HttpMethod) -> Result<RequestBuilder> {
        RequestBuilder::new(Arc::clone(&self.executor), &self.base_url, path, method)
    }

    /// Start a multipart upload of `file` for `path`.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UrlConstruction`] or [`NetworkError::Io`].
    pub async fn build_multipart(
        &self,
        path: &str,
        file: &Path,
        method: MultipartMethod,
    ) -> Result<MultipartRequestBuilder> {
        MultipartRequestBuilder::from_file(Arc::clone(&self.executor), &self.base_url, path, file, method)
            .await
    }

    /// Like [`build_multipart`](Self::build_multipart) with a caller-supplied
    /// assembler.
    pub async fn build_multipart_with<M: MimeLookup>(
        &self,
        path: &str,
        file: &Path,
        method: MultipartMethod,
        assembler: &MultipartAssembler<M>,
    ) -> Result<MultipartRequestBuilder> {
        MultipartRequestBuilder::from_file_with(
            Arc::clone(&self.executor),
            &self.base_url,
            path,
            file,
            method,
            assembler,
        )
        .await
    }

    /// Execute a prepared request and return the raw success body.
    pub async fn execute(&self, request: HttpRequest, allow_refresh: bool) -> Result<Bytes> {
        self.executor.execute(request, allow_refresh).await
    }

    /// Execute a prepared request and decode the success body.
    pub async fn execute_decoded<T, D>(
        &self,
        request: HttpRequest,
        allow_refresh: bool,
        decoder: &D,
    ) -> Result<T>
    where
        T: DeserializeOwned,
        D: BodyDecoder + ?Sized,
    {
        self.executor
            .execute_decoded(request, allow_refresh, decoder)
            .await
    }

    /// Execute a prepared request without refresh.
    pub async fn fetch(&self, request: HttpRequest) -> Result<Bytes> {
        self.execute(request, false).await
    }
}

/// Configures a [`NetworkClient`].
pub struct NetworkClientBuilder {
    base_url: String,
    config: ClientConfig,
    transport: Option<Arc<dyn HttpTransport>>,
    refresh: Option<Refresh>,
}

impl NetworkClientBuilder {
    fn new(base_url: impl Into<String>) -> Self {
        NetworkClientBuilder {
            base_url: base_url.into(),
            config: ClientConfig::default(),
            transport: None,
            refresh: None,
        }
    }

    /// Configuration for the default transport. Ignored when a transport is
    /// supplied.
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Use `transport` instead of the reqwest transport.
    pub fn transport<T: HttpTransport + 'static>(self, transport: T) -> Self {
        self.shared_transport(Arc::new(transport))
    }

    /// Use an already shared transport.
    pub fn shared_transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Refresh credentials when `refresh`'s trigger status is received.
    pub fn refresh(mut self, refresh: Refresh) -> Self {
        self.refresh = Some(refresh);
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// [`NetworkError::Transport`] when the default transport cannot be
    /// created from the configuration.
    pub fn build(self) -> Result<NetworkClient> {
        let transport: Arc<dyn HttpTransport> = match self.transport {
            Some(transport) => transport,
            None => Arc::new(
                ReqwestTransport::with_config(&self.config).map_err(NetworkError::Transport)?,
            ),
        };

        if self.config.enable_logging {
            tracing::debug!(base_url = %self.base_url, refresh = self.refresh.is_some(), "network client created");
        }

        let executor = match self.refresh {
            Some(refresh) => RequestExecutor::with_refresh(transport, refresh),
            None => RequestExecutor::new(transport),
        };
        Ok(NetworkClient::from_executor(self.base_url, Arc::new(executor)))
    }
}

impl std::fmt::Debug for NetworkClientBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NetworkClientBuilder")
            .field("base_url", &self.base_url)
            .field("config", &self.config)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JsonCodec;
    use crate::protocol::Status;

    #[test]
    fn test_client_creation() {
        let client = NetworkClient::new("https://api.test").unwrap();
        assert_eq!(client.base_url(), "https://api.test");
        assert!(client.executor().refresh().is_none());
    }

    #[test]
    fn test_invalid_proxy_surfaces_as_transport_error() {
        let err = NetworkClient::builder("https://api.test")
            .config(ClientConfig {
                proxy_url: "::not a proxy::".into(),
                ..Default::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, NetworkError::Transport(_)));
    }

    #[test]
    fn test_invalid_base_url_fails_at_build() {
        let client = NetworkClient::new("api.test without scheme").unwrap();
        let err = client.build("users", HttpMethod::Get).unwrap_err();
        assert!(matches!(err, NetworkError::UrlConstruction(_)));
    }

    #[test]
    fn test_clones_share_executor() {
        let client = NetworkClient::builder("https://api.test")
            .refresh(Refresh::new(Status::Unauthorized, || async {
                Ok::<_, std::io::Error>(())
            }))
            .build()
            .unwrap();
        let clone = client.clone();
        assert!(Arc::ptr_eq(client.executor(), clone.executor()));
        assert_eq!(
            clone.executor().refresh().map(|r| r.refresh().status()),
            Some(Status::Unauthorized)
        );
    }

    #[tokio::test]
    async fn test_fetch_against_mock_server() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/v1/items")
            .match_query(mockito::Matcher::UrlEncoded("page".into(), "1".into()))
            .with_status(200)
            .with_body(r#"[1,2,3]"#)
            .expect(2)
            .create_async()
            .await;

        let client = NetworkClient::new(format!("{}/v1/", server.url())).unwrap();
        let request = client
            .build("/items", HttpMethod::Get)
            .unwrap()
            .query_items([("page", "1")])
            .unwrap()
            .into_request();

        let items: Vec<u32> = client.execute_decoded(request.clone(), false, &JsonCodec).await.unwrap();
        assert_eq!(items, vec![1, 2, 3]);
        assert_eq!(&client.fetch(request).await.unwrap()[..], b"[1,2,3]");
        mock.assert_async().await;
    }
}
