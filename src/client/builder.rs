//! Request builder.
//!
//! A [`RequestBuilder`] accumulates one request through consuming steps and
//! dispatches it through the shared [`RequestExecutor`]. The kind parameter
//! decides which steps exist:
//!
//! - [`Standard`] builders accept an encoded body through [`body`] or
//!   [`body_with`].
//! - [`Multipart`] builders get their body and `Content-Type` from a file at
//!   construction time and have no body step.
//!
//! Terminal steps borrow the builder, so one builder can be dispatched any
//! number of times. Each dispatch hands the executor a copy of the request.
//!
//! # Examples
//!
//! ```
//! use netman::{HttpMethod, NetworkClient};
//!
//! # fn main() -> netman::Result<()> {
//! let client = NetworkClient::new("https://api.test/v1/")?;
//! let builder = client
//!     .build("/users", HttpMethod::Post)?
//!     .query_items([("page", "2")])?
//!     .header("X-Trace-Id", "42")
//!     .body(&serde_json::json!({ "name": "Ada" }))?
//!     .with_refresh();
//!
//! assert_eq!(builder.request().url.as_str(), "https://api.test/v1/users?page=2");
//! assert_eq!(builder.request().header("Content-Type"), Some("application/json"));
//! assert!(builder.refresh_enabled());
//! # Ok(())
//! # }
//! ```
//!
//! [`body`]: RequestBuilder::body
//! [`body_with`]: RequestBuilder::body_with

use crate::client::{
    BodyDecoder, BodyEncoder, JsonCodec, MimeLookup, MultipartAssembler, RequestExecutor,
    RequestModifier,
};
use crate::error::{NetworkError, Result};
use crate::protocol::{HttpHeader, HttpMethod, MultipartMethod};
use crate::types::HttpRequest;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::path::Path;
use std::sync::Arc;
use url::Url;

/// Builder kind for requests with an encoded body.
#[derive(Debug, Clone, Copy)]
pub struct Standard;

/// Builder kind for single-file multipart uploads.
#[derive(Debug, Clone, Copy)]
pub struct Multipart;

/// Builder for multipart uploads.
pub type MultipartRequestBuilder = RequestBuilder<Multipart>;

/// Accumulates a request and dispatches it.
pub struct RequestBuilder<K = Standard> {
    executor: Arc<RequestExecutor>,
    request: HttpRequest,
    refresh: bool,
    _kind: PhantomData<K>,
}

impl<K> Clone for RequestBuilder<K> {
    fn clone(&self) -> Self {
        RequestBuilder {
            executor: Arc::clone(&self.executor),
            request: self.request.clone(),
            refresh: self.refresh,
            _kind: PhantomData,
        }
    }
}

impl<K> fmt::Debug for RequestBuilder<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBuilder")
            .field("request", &self.request)
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

impl RequestBuilder<Standard> {
    /// Start a request for `path` under `base_url`.
    ///
    /// The base path and `path` are joined with exactly one `/`, whatever
    /// slashes either side carries.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UrlConstruction`] when `base_url` does not parse or
    /// cannot carry a path.
    pub fn new(
        executor: Arc<RequestExecutor>,
        base_url: &str,
        path: &str,
        method: HttpMethod,
    ) -> Result<Self> {
        let url = join_url(base_url, path)?;
        Ok(RequestBuilder {
            executor,
            request: HttpRequest::new(method, url),
            refresh: false,
            _kind: PhantomData,
        })
    }

    /// Encode `value` as JSON and use it as the body.
    ///
    /// # Errors
    ///
    /// See [`body_with`](Self::body_with).
    pub fn body<T>(self, value: &T) -> Result<Self>
    where
        T: Serialize + ?Sized,
    {
        self.body_with(value, &JsonCodec)
    }

    /// Encode `value` with `encoder` and use it as the body.
    ///
    /// `Content-Type` is taken from the encoder unless the request already
    /// has one.
    ///
    /// # Errors
    ///
    /// [`NetworkError::BodyNotAllowed`] for GET requests and
    /// [`NetworkError::BodyEncoding`] when the encoder fails.
    pub fn body_with<T, E>(mut self, value: &T, encoder: &E) -> Result<Self>
    where
        T: Serialize + ?Sized,
        E: BodyEncoder,
    {
        if !self.request.method.allows_body() {
            return Err(NetworkError::BodyNotAllowed {
                method: self.request.method,
            });
        }

        let encoded = encoder.encode(value).map_err(NetworkError::BodyEncoding)?;
        self.request.body = Some(encoded);

        if let Some(content_type) = encoder.content_type() {
            if self.request.header(HttpHeader::ContentType.as_str()).is_none() {
                self.request.set_header(HttpHeader::ContentType, content_type);
            }
        }
        Ok(self)
    }
}

impl RequestBuilder<Multipart> {
    /// Start a multipart upload of `file` for `path` under `base_url`.
    ///
    /// Every call draws a fresh boundary.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UrlConstruction`] as for standard builders and
    /// [`NetworkError::Io`] when the file cannot be read.
    pub async fn from_file(
        executor: Arc<RequestExecutor>,
        base_url: &str,
        path: &str,
        file: &Path,
        method: MultipartMethod,
    ) -> Result<Self> {
        Self::from_file_with(executor, base_url, path, file, method, &MultipartAssembler::new()).await
    }

    /// Like [`from_file`](Self::from_file) with a caller-supplied assembler.
    pub async fn from_file_with<M: MimeLookup>(
        executor: Arc<RequestExecutor>,
        base_url: &str,
        path: &str,
        file: &Path,
        method: MultipartMethod,
        assembler: &MultipartAssembler<M>,
    ) -> Result<Self> {
        let base = RequestBuilder::<Standard>::new(executor, base_url, path, method.into())?;
        let part = assembler.assemble(file).await?;

        let mut request = base.request;
        request.body = Some(part.body);
        request.set_header(HttpHeader::ContentType, part.content_type);

        Ok(RequestBuilder {
            executor: base.executor,
            request,
            refresh: base.refresh,
            _kind: PhantomData,
        })
    }
}

impl<K> RequestBuilder<K> {
    /// Replace the query component with `items`, in order.
    ///
    /// Duplicate keys are kept. An empty list removes the query.
    ///
    /// # Errors
    ///
    /// [`NetworkError::UrlConstruction`] when the current URL cannot be
    /// decomposed and [`NetworkError::QueryParameters`] when it cannot be
    /// rebuilt afterwards.
    pub fn query_items<I, N, V>(mut self, items: I) -> Result<Self>
    where
        I: IntoIterator<Item = (N, V)>,
        N: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.request.url.clone();
        if url.cannot_be_a_base() {
            return Err(NetworkError::UrlConstruction(url.to_string()));
        }

        let items: Vec<(N, V)> = items.into_iter().collect();
        if items.is_empty() {
            url.set_query(None);
        } else {
            url.query_pairs_mut().clear().extend_pairs(items);
        }

        self.request.url =
            Url::parse(url.as_str()).map_err(|e| NetworkError::QueryParameters(e.to_string()))?;
        Ok(self)
    }

    /// Set every header in `headers`, replacing existing values.
    pub fn headers<I, H, V>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = (H, V)>,
        H: Into<HttpHeader>,
        V: Into<String>,
    {
        for (name, value) in headers {
            self.request.set_header(name, value);
        }
        self
    }

    /// Set one header, replacing an existing value.
    pub fn header(mut self, name: impl Into<HttpHeader>, value: impl Into<String>) -> Self {
        self.request.set_header(name, value);
        self
    }

    /// Allow one credential refresh and retry for this request.
    pub fn with_refresh(mut self) -> Self {
        self.refresh = true;
        self
    }

    /// Replace the request with `modifier`'s output.
    pub fn modifier<M>(mut self, modifier: &M) -> Self
    where
        M: RequestModifier + ?Sized,
    {
        self.request = modifier.modify(self.request);
        self
    }

    /// The request as built so far.
    pub fn request(&self) -> &HttpRequest {
        &self.request
    }

    /// Whether refresh is enabled.
    pub fn refresh_enabled(&self) -> bool {
        self.refresh
    }

    /// Consume the builder and return the request.
    pub fn into_request(self) -> HttpRequest {
        self.request
    }

    /// Dispatch and return the raw success body.
    pub async fn send_raw(&self) -> Result<Bytes> {
        self.executor.execute(self.request.clone(), self.refresh).await
    }

    /// Dispatch and decode the success body as JSON.
    pub async fn send<T: DeserializeOwned>(&self) -> Result<T> {
        self.send_with(&JsonCodec).await
    }

    /// Dispatch and decode the success body with `decoder`.
    pub async fn send_with<T, D>(&self, decoder: &D) -> Result<T>
    where
        T: DeserializeOwned,
        D: BodyDecoder + ?Sized,
    {
        self.executor
            .execute_decoded(self.request.clone(), self.refresh, decoder)
            .await
    }

    /// Dispatch and discard the success body.
    pub async fn send_empty(&self) -> Result<()> {
        self.send_raw().await.map(|_| ())
    }
}

fn join_url(base_url: &str, path: &str) -> Result<Url> {
    let mut url =
        Url::parse(base_url).map_err(|_| NetworkError::UrlConstruction(base_url.to_string()))?;
    if url.cannot_be_a_base() {
        return Err(NetworkError::UrlConstruction(base_url.to_string()));
    }

    let joined = format!(
        "{}/{}",
        url.path().trim_end_matches('/'),
        path.trim_start_matches('/')
    );
    url.set_path(&joined);
    Ok(url)
}
