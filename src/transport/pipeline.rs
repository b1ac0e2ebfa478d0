//! The request-processing pipeline.
//!
//! Each stage implements [`Communicator`] and wraps the next one, so the full
//! chain is ordinary type composition built once at transport construction:
//!
//! ```text
//! ContentReader<ErrorClassifier<Authenticator<BaseSender>>>
//! ```
//!
//! Any stage can be recomposed over a different inner communicator, e.g. a
//! stub sender in tests, without touching the others.

use reqwest::{header, RequestBuilder, Response};
use tracing::debug;

use crate::error::{Error, Result};

/// A send capability: takes a prepared request, produces a typed output.
///
/// Stages that transform the request delegate with `Output = C::Output`;
/// stages that consume the response fix `Output` themselves.
#[allow(async_fn_in_trait)]
pub trait Communicator {
    /// What this stage hands back to its caller.
    type Output;

    /// Execute the request through this stage and the ones it wraps.
    async fn send(&self, request: RequestBuilder) -> Result<Self::Output>;
}

/// Basic-auth credentials held by the [`Authenticator`] stage.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub login: Option<String>,
    pub password: Option<String>,
}

/// The terminal stage: performs the actual network exchange.
///
/// Adds `Accept-Encoding: gzip` to every outgoing request. Connection-level
/// failures surface as [`Error::Network`]; a response whose transfer breaks
/// mid-decode surfaces as [`Error::Format`].
#[derive(Debug, Default)]
pub struct BaseSender;

impl Communicator for BaseSender {
    type Output = Response;

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let request = request.header(header::ACCEPT_ENCODING, "gzip");
        let response = request.send().await.map_err(|e| {
            if e.is_decode() {
                Error::format(e)
            } else {
                Error::Network(e)
            }
        })?;
        debug!(status = %response.status(), url = %response.url(), "response received");
        Ok(response)
    }
}

/// Attaches HTTP Basic credentials before delegating.
///
/// Credentials can be swapped at runtime through
/// [`set_credentials`](Authenticator::set_credentials) without rebuilding the
/// chain. When no login is set the request passes through untouched, which is
/// the API-key and unauthenticated mode.
#[derive(Debug)]
pub struct Authenticator<C> {
    inner: C,
    credentials: Credentials,
}

impl<C> Authenticator<C> {
    pub fn new(inner: C) -> Self {
        Authenticator {
            inner,
            credentials: Credentials::default(),
        }
    }

    /// Replace the credentials used for all subsequent requests.
    pub fn set_credentials(&mut self, login: Option<String>, password: Option<String>) {
        self.credentials = Credentials { login, password };
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }
}

impl<C: Communicator> Communicator for Authenticator<C> {
    type Output = C::Output;

    async fn send(&self, request: RequestBuilder) -> Result<C::Output> {
        let request = match &self.credentials.login {
            Some(login) => request.basic_auth(login, self.credentials.password.as_deref()),
            None => request,
        };
        self.inner.send(request).await
    }
}

/// Inspects the response status after the inner stage returns.
///
/// 401/403 map to [`Error::Auth`], 404 to [`Error::NotFound`] carrying the
/// request path, and any other non-2xx status to [`Error::Status`] with the
/// response body attached.
#[derive(Debug)]
pub struct ErrorClassifier<C> {
    inner: C,
}

impl<C> ErrorClassifier<C> {
    pub fn new(inner: C) -> Self {
        ErrorClassifier { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Communicator<Output = Response>> Communicator for ErrorClassifier<C> {
    type Output = Response;

    async fn send(&self, request: RequestBuilder) -> Result<Response> {
        let response = self.inner.send(request).await?;
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let path = response.url().path().to_string();
        let body = response.text().await.unwrap_or_default();
        debug!(%status, %path, "classifying error response");
        Err(Error::from_status(status, &path, body))
    }
}

/// Reads the response body to a string for JSON consumers.
///
/// Operations that need the raw response (`download`) go through
/// [`inner`](ContentReader::inner) instead, skipping this stage.
#[derive(Debug)]
pub struct ContentReader<C> {
    inner: C,
}

impl<C> ContentReader<C> {
    pub fn new(inner: C) -> Self {
        ContentReader { inner }
    }

    pub fn inner(&self) -> &C {
        &self.inner
    }

    pub fn inner_mut(&mut self) -> &mut C {
        &mut self.inner
    }
}

impl<C: Communicator<Output = Response>> Communicator for ContentReader<C> {
    type Output = String;

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        let response = self.inner.send(request).await?;
        response.text().await.map_err(Error::Network)
    }
}

/// The standard chain used by the transport.
pub type Pipeline = ContentReader<ErrorClassifier<Authenticator<BaseSender>>>;

/// Build the standard chain.
pub fn standard_pipeline() -> Pipeline {
    ContentReader::new(ErrorClassifier::new(Authenticator::new(BaseSender)))
}
