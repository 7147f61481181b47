//! Request execution: transport call, status interpretation, refresh retry.
//!
//! [`RequestExecutor::execute`] runs one request through these steps:
//!
//! 1. Send a clone of the request through the transport. Transport failures
//!    are returned as [`NetworkError::Transport`] without further handling.
//! 2. No response metadata: [`NetworkError::EmptyResponse`].
//! 3. Status in `[200, 300)`: return the body.
//! 4. Status equals the refresh trigger and the call is refresh-eligible:
//!    join or start the single-flight refresh, then send the request once
//!    more with refresh disabled. A refresh failure is returned as
//!    [`NetworkError::Refresh`] and the request is not retried.
//! 5. Anything else: [`NetworkError::ServerStatus`] with the raw body.
//!
//! Because the retry runs with refresh disabled, a second trigger status in
//! the same call chain ends in step 5.

use crate::client::{BodyDecoder, HttpTransport, Refresh, RefreshCoordinator};
use crate::error::{NetworkError, Result};
use crate::protocol::Status;
use crate::types::HttpRequest;
use bytes::Bytes;
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::Arc;
use tracing::{instrument, Span};

/// Executes requests over an injected transport.
///
/// One executor is shared by every request built from the same client, and
/// so is its refresh coordinator.
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    refresh: Option<RefreshCoordinator>,
}

impl RequestExecutor {
    /// Executor without a refresh descriptor.
    pub fn new(transport: Arc<dyn HttpTransport>) -> Self {
        RequestExecutor {
            transport,
            refresh: None,
        }
    }

    /// Executor that runs `refresh` when its trigger status is received.
    pub fn with_refresh(transport: Arc<dyn HttpTransport>, refresh: Refresh) -> Self {
        RequestExecutor {
            transport,
            refresh: Some(RefreshCoordinator::new(refresh)),
        }
    }

    /// The refresh coordinator, if one is configured.
    pub fn refresh(&self) -> Option<&RefreshCoordinator> {
        self.refresh.as_ref()
    }

    /// Execute `request` and return the raw success body.
    ///
    /// # Errors
    ///
    /// See the module documentation for the full list of outcomes.
    #[instrument(
        name = "netman_request",
        skip_all,
        fields(
            http.method = %request.method,
            http.url = %request.url,
            http.status_code = tracing::field::Empty,
            allow_refresh,
        )
    )]
    pub async fn execute(&self, request: HttpRequest, allow_refresh: bool) -> Result<Bytes> {
        let mut allow_refresh = allow_refresh;

        loop {
            let response = self
                .transport
                .send(request.clone())
                .await
                .map_err(NetworkError::Transport)?
                .ok_or(NetworkError::EmptyResponse)?;

            Span::current().record("http.status_code", response.status);
            let status = Status::from_code(response.status);

            if status.is_success() {
                tracing::debug!(bytes = response.body.len(), "request succeeded");
                return Ok(response.body);
            }

            match &self.refresh {
                Some(coordinator)
                    if allow_refresh && coordinator.refresh().is_triggered_by(response.status) =>
                {
                    tracing::warn!(status = response.status, "refresh trigger received, refreshing credentials");
                    if let Err(err) = coordinator.run().await {
                        tracing::warn!(error = %err, "credential refresh failed");
                        return Err(NetworkError::Refresh(err));
                    }
                    allow_refresh = false;
                }
                _ => {
                    tracing::debug!(status = response.status, "request rejected by server");
                    return Err(NetworkError::ServerStatus {
                        status,
                        body: response.body,
                    });
                }
            }
        }
    }

    /// Execute `request` and decode the success body with `decoder`.
    ///
    /// # Errors
    ///
    /// Everything [`execute`](Self::execute) returns, plus
    /// [`NetworkError::ResponseDecoding`] when the body does not decode.
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
        let body = self.execute(request, allow_refresh).await?;
        decoder.decode(&body).map_err(NetworkError::ResponseDecoding)
    }
}

impl fmt::Debug for RequestExecutor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestExecutor")
            .field("refresh", &self.refresh)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::JsonCodec;
    use crate::error::BoxError;
    use crate::protocol::HttpMethod;
    use crate::types::TransportResponse;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use url::Url;

    /// Replays canned outcomes and records what it was sent.
    #[derive(Default)]
    struct Scripted {
        outcomes: Mutex<VecDeque<std::result::Result<Option<TransportResponse>, BoxError>>>,
        sent: Mutex<Vec<HttpRequest>>,
    }

    impl Scripted {
        fn with(outcomes: Vec<std::result::Result<Option<TransportResponse>, BoxError>>) -> Arc<Self> {
            Arc::new(Scripted {
                outcomes: Mutex::new(outcomes.into()),
                sent: Mutex::new(Vec::new()),
            })
        }

        fn status(code: u16, body: &'static str) -> std::result::Result<Option<TransportResponse>, BoxError> {
            Ok(Some(TransportResponse::new(code, body)))
        }
    }

    #[async_trait]
    impl HttpTransport for Scripted {
        async fn send(&self, request: HttpRequest) -> std::result::Result<Option<TransportResponse>, BoxError> {
            self.sent.lock().push(request);
            self.outcomes
                .lock()
                .pop_front()
                .unwrap_or_else(|| Err("script exhausted".into()))
        }
    }

    fn request() -> HttpRequest {
        HttpRequest::new(HttpMethod::Get, Url::parse("https://api.test/v1/users").unwrap())
    }

    fn counting_refresh(calls: Arc<AtomicUsize>) -> Refresh {
        Refresh::new(Status::Unauthorized, move || {
            let calls = Arc::clone(&calls);
            async move {
                calls.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(())
            }
        })
    }

    #[tokio::test]
    async fn test_success_returns_body() {
        let transport = Scripted::with(vec![Scripted::status(204, "done")]);
        let executor = RequestExecutor::new(transport.clone());
        let body = executor.execute(request(), false).await.unwrap();
        assert_eq!(&body[..], b"done");
        assert_eq!(transport.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_empty_response() {
        let executor = RequestExecutor::new(Scripted::with(vec![Ok(None)]));
        let err = executor.execute(request(), true).await.unwrap_err();
        assert!(matches!(err, NetworkError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_server_status_carries_body() {
        let executor = RequestExecutor::new(Scripted::with(vec![Scripted::status(404, "no such user")]));
        let err = executor.execute(request(), true).await.unwrap_err();
        match err {
            NetworkError::ServerStatus { status, body } => {
                assert_eq!(status, Status::NotFound);
                assert_eq!(&body[..], b"no such user");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_refresh_then_retry_same_request() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Scripted::with(vec![Scripted::status(401, ""), Scripted::status(200, "ok")]);
        let executor = RequestExecutor::with_refresh(transport.clone(), counting_refresh(Arc::clone(&calls)));

        let body = executor.execute(request(), true).await.unwrap();
        assert_eq!(&body[..], b"ok");
        assert_eq!(calls.load(Ordering::SeqCst), 1);

        let sent = transport.sent.lock();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0], sent[1]);
    }

    #[tokio::test]
    async fn test_trigger_without_eligibility_is_server_status() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Scripted::with(vec![Scripted::status(401, "expired")]);
        let executor = RequestExecutor::with_refresh(transport, counting_refresh(Arc::clone(&calls)));

        let err = executor.execute(request(), false).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::Unauthorized));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_second_trigger_is_not_retried() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Scripted::with(vec![
            Scripted::status(401, "expired"),
            Scripted::status(401, "still expired"),
        ]);
        let executor = RequestExecutor::with_refresh(transport.clone(), counting_refresh(Arc::clone(&calls)));

        let err = executor.execute(request(), true).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::Unauthorized));
        assert_eq!(&err.error_body().unwrap()[..], b"still expired");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(transport.sent.lock().len(), 2);
    }

    #[tokio::test]
    async fn test_non_trigger_status_skips_refresh() {
        let calls = Arc::new(AtomicUsize::new(0));
        let transport = Scripted::with(vec![Scripted::status(403, "")]);
        let executor = RequestExecutor::with_refresh(transport, counting_refresh(Arc::clone(&calls)));

        let err = executor.execute(request(), true).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::Forbidden));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_refresh_failure_is_not_retried() {
        let transport = Scripted::with(vec![Scripted::status(401, "")]);
        let refresh = Refresh::new(Status::Unauthorized, || async {
            Err::<(), _>(anyhow::anyhow!("invalid_grant"))
        });
        let executor = RequestExecutor::with_refresh(transport.clone(), refresh);

        let err = executor.execute(request(), true).await.unwrap_err();
        assert!(matches!(&err, NetworkError::Refresh(inner) if inner.to_string() == "invalid_grant"));
        assert_eq!(transport.sent.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_passes_through() {
        let calls = Arc::new(AtomicUsize::new(0));
        let refused = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused");
        let transport = Scripted::with(vec![Err(Box::new(refused) as BoxError)]);
        let executor = RequestExecutor::with_refresh(transport, counting_refresh(Arc::clone(&calls)));

        let err = executor.execute(request(), true).await.unwrap_err();
        let NetworkError::Transport(inner) = err else {
            panic!("expected transport error");
        };
        let io = inner.downcast_ref::<std::io::Error>().unwrap();
        assert_eq!(io.kind(), std::io::ErrorKind::ConnectionRefused);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_decoded_success_and_failure() {
        #[derive(Debug, serde::Deserialize)]
        struct User {
            name: String,
        }

        let transport = Scripted::with(vec![
            Scripted::status(200, r#"{"name":"Ada"}"#),
            Scripted::status(200, "<html>"),
        ]);
        let executor = RequestExecutor::new(transport);

        let user: User = executor.execute_decoded(request(), false, &JsonCodec).await.unwrap();
        assert_eq!(user.name, "Ada");

        let err = executor
            .execute_decoded::<User, _>(request(), false, &JsonCodec)
            .await
            .unwrap_err();
        assert!(matches!(err, NetworkError::ResponseDecoding(_)));
    }

    #[tokio::test]
    async fn test_bad_gateway_trigger_matches_502_only() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let refresh = Refresh::new(Status::BadGateway, move || {
            let counter = Arc::clone(&counter);
            async move {
                counter.fetch_add(1, Ordering::SeqCst);
                Ok::<_, BoxError>(())
            }
        });
        let transport = Scripted::with(vec![
            Scripted::status(503, ""),
            Scripted::status(502, ""),
            Scripted::status(200, "up"),
        ]);
        let executor = RequestExecutor::with_refresh(transport, refresh);

        let err = executor.execute(request(), true).await.unwrap_err();
        assert_eq!(err.status(), Some(Status::ServiceUnavailable));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        let body = executor.execute(request(), true).await.unwrap();
        assert_eq!(&body[..], b"up");
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
