//! The transport core: typed CRUD against the Redmine REST API.
//!
//! Combines the URI builder, the entity descriptors and the request pipeline
//! into the operations the manager layer consumes. All calls are sequential;
//! the transport introduces no concurrency of its own, and pagination issues
//! its requests serially so offsets stay consistent against a server-side
//! result set that may be changing underneath.

pub mod envelope;
pub mod pipeline;
pub mod uri;

mod upload;

use std::future::Future;

use reqwest::{header, Body, Client, RequestBuilder, Response};
use tokio::io::AsyncRead;
use tokio_util::io::ReaderStream;
use tracing::{debug, instrument};

use crate::entity::{Entity, Identifiable, WritableEntity};
use crate::error::{Error, Result};
use crate::models::{Upload, User};

pub use envelope::ResultsPage;
pub use pipeline::{Authenticator, BaseSender, Communicator, ContentReader, ErrorClassifier};
pub use uri::UriBuilder;

use pipeline::Pipeline;
use upload::MarkedStream;

/// Objects fetched per request when paginating, unless overridden.
pub const DEFAULT_PAGE_SIZE: u32 = 25;

const CONTENT_TYPE_JSON: &str = "application/json; charset=utf-8";
const CONTENT_TYPE_OCTET_STREAM: &str = "application/octet-stream";
const SWITCH_USER_HEADER: &str = "X-Redmine-Switch-User";

/// The transport façade.
///
/// Holds the per-instance request context: credentials, impersonation user
/// and page size. None of it is synchronized; concurrent mutation from
/// multiple tasks needs one transport per identity or external locking.
#[derive(Debug)]
pub struct Transport {
    client: Client,
    pipeline: Pipeline,
    uri: UriBuilder,
    on_behalf_of: Option<String>,
    page_size: u32,
    login: Option<String>,
    password: Option<String>,
}

impl Transport {
    /// Create a transport over the given endpoint and HTTP client.
    ///
    /// The pipeline is composed here, once: content reading over error
    /// classification over authentication over the base sender.
    pub fn new(uri: UriBuilder, client: Client) -> Self {
        Transport {
            client,
            pipeline: pipeline::standard_pipeline(),
            uri,
            on_behalf_of: None,
            page_size: DEFAULT_PAGE_SIZE,
            login: None,
            password: None,
        }
    }

    /// Replace the basic-auth credentials for all subsequent requests.
    pub fn set_credentials(&mut self, login: Option<String>, password: Option<String>) {
        self.login = login.clone();
        self.password = password.clone();
        self.authenticator_mut().set_credentials(login, password);
    }

    /// Change the login, keeping the current password.
    pub fn set_login(&mut self, login: Option<String>) {
        let password = self.password.clone();
        self.set_credentials(login, password);
    }

    /// Change the password, keeping the current login.
    pub fn set_password(&mut self, password: Option<String>) {
        let login = self.login.clone();
        self.set_credentials(login, password);
    }

    /// Act as the given user on subsequent requests, via the switch-user
    /// header. `None` clears impersonation.
    pub fn set_on_behalf_of(&mut self, login: Option<String>) {
        self.on_behalf_of = login;
    }

    /// Set how many objects each pagination request asks for.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] for a zero page size.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        if page_size == 0 {
            return Err(Error::Config(format!(
                "page size must be greater than zero, got {}",
                page_size
            )));
        }
        self.page_size = page_size;
        Ok(())
    }

    /// The current page size.
    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    fn authenticator_mut(&mut self) -> &mut Authenticator<BaseSender> {
        self.pipeline.inner_mut().inner_mut()
    }

    /// Attach per-request context that lives outside the pipeline.
    fn prepare(&self, request: RequestBuilder) -> RequestBuilder {
        match &self.on_behalf_of {
            Some(user) => request.header(SWITCH_USER_HEADER, user),
            None => request,
        }
    }

    async fn send(&self, request: RequestBuilder) -> Result<String> {
        self.pipeline.send(self.prepare(request)).await
    }

    /// Fetch a single object by key.
    #[instrument(skip(self), fields(entity = T::SINGULAR))]
    pub async fn get_object<T: Entity>(&self, key: &str, params: &[(&str, &str)]) -> Result<T> {
        let url = self.uri.object::<T>(key, params);
        let body = self.send(self.client.get(url)).await?;
        envelope::parse_single(&body)
    }

    /// Fetch one page of a collection without touching limit or offset;
    /// the caller controls paging explicitly.
    #[instrument(skip(self), fields(entity = T::SINGULAR))]
    pub async fn get_objects_list_no_paging<T: Entity>(
        &self,
        params: &[(&str, &str)],
    ) -> Result<ResultsPage<T>> {
        let url = self.uri.collection::<T>(params);
        let body = self.send(self.client.get(url)).await?;
        envelope::parse_page(&body)
    }

    /// Fetch all objects of a type, paginating until the server-reported
    /// total is reached.
    ///
    /// Each request asks for `page_size` objects; the offset advances by the
    /// number of results actually returned, so a short final page terminates
    /// the loop. The loop also stops when the server omits `total_count`
    /// (paging unsupported for the type, e.g. trackers) and when a page comes
    /// back empty before the total is reached — the latter even if the
    /// reported total implies more results exist.
    #[instrument(skip(self), fields(entity = T::SINGULAR))]
    pub async fn get_objects_list<T: Entity>(&self, params: &[(&str, &str)]) -> Result<Vec<T>> {
        let mut results = Vec::new();
        let mut offset: u64 = 0;
        loop {
            let limit = self.page_size.to_string();
            let offset_param = offset.to_string();
            let mut page_params = params.to_vec();
            page_params.push(("limit", limit.as_str()));
            page_params.push(("offset", offset_param.as_str()));

            let page = self.get_objects_list_no_paging::<T>(&page_params).await?;
            let fetched = page.results.len() as u64;
            results.extend(page.results);

            let Some(total) = page.total_count else {
                break;
            };
            if fetched == 0 {
                break;
            }
            offset += fetched;
            if offset >= total {
                break;
            }
        }
        debug!(count = results.len(), "collection fetched");
        Ok(results)
    }

    /// Create an object; returns the server's version of it.
    #[instrument(skip(self, object), fields(entity = T::SINGULAR))]
    pub async fn add_object<T: WritableEntity>(
        &self,
        object: &T,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.uri.collection::<T>(params);
        let body = envelope::to_envelope(object)?;
        let response = self.send(self.json_body(self.client.post(url), body)).await?;
        envelope::parse_single(&response)
    }

    /// Create an object under a parent, e.g. a relation under an issue.
    #[instrument(skip(self, object), fields(parent = P::SINGULAR, entity = T::SINGULAR))]
    pub async fn add_child_entry<P: Entity, T: WritableEntity>(
        &self,
        parent_key: &str,
        object: &T,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.uri.child_collection::<P, T>(parent_key, params);
        let body = envelope::to_envelope(object)?;
        let response = self.send(self.json_body(self.client.post(url), body)).await?;
        envelope::parse_single(&response)
    }

    /// Update an existing object.
    ///
    /// The object must carry its server id; a missing id is a caller contract
    /// violation reported as [`Error::Config`] before any network call. The
    /// server returns no body on update, so there is no return value and no
    /// way to report server-side field corrections.
    #[instrument(skip(self, object), fields(entity = T::SINGULAR))]
    pub async fn update_object<T: WritableEntity + Identifiable>(
        &self,
        object: &T,
        params: &[(&str, &str)],
    ) -> Result<()> {
        let id = object.id().ok_or_else(|| {
            Error::Config(format!(
                "cannot update '{}' without an id: it is required to identify \
                 the object in the target system",
                T::SINGULAR
            ))
        })?;
        let url = self.uri.object::<T>(&id.to_string(), params);
        let body = envelope::to_envelope(object)?;
        self.send(self.json_body(self.client.put(url), body)).await?;
        Ok(())
    }

    /// Delete an object by id.
    #[instrument(skip(self), fields(entity = T::SINGULAR))]
    pub async fn delete_object<T: Entity>(&self, id: &str) -> Result<()> {
        let url = self.uri.object::<T>(id, &[]);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// Delete a child item under a parent, e.g. a watcher from an issue.
    #[instrument(skip(self), fields(parent = P::SINGULAR, entity = C::SINGULAR))]
    pub async fn delete_child_id<P: Entity, C: Entity>(
        &self,
        parent_key: &str,
        child_id: &str,
    ) -> Result<()> {
        let url = self.uri.child_item::<P, C>(parent_key, child_id, &[]);
        self.send(self.client.delete(url)).await?;
        Ok(())
    }

    /// Fetch a child collection, e.g. the versions of a project.
    ///
    /// A response without the collection array is a format error; an empty
    /// array is a valid empty collection.
    #[instrument(skip(self), fields(parent = P::SINGULAR, entity = T::SINGULAR))]
    pub async fn get_child_entries<P: Entity, T: Entity>(
        &self,
        parent_key: &str,
        params: &[(&str, &str)],
    ) -> Result<Vec<T>> {
        let limit = self.page_size.to_string();
        let mut all_params = params.to_vec();
        all_params.push(("limit", limit.as_str()));
        let url = self.uri.child_collection::<P, T>(parent_key, &all_params);
        let body = self.send(self.client.get(url)).await?;
        envelope::parse_list_required(&body)
    }

    /// Fetch a single child item under a parent.
    #[instrument(skip(self), fields(parent = P::SINGULAR, entity = T::SINGULAR))]
    pub async fn get_child_entry<P: Entity, T: Entity>(
        &self,
        parent_key: &str,
        child_id: &str,
        params: &[(&str, &str)],
    ) -> Result<T> {
        let url = self.uri.child_item::<P, T>(parent_key, child_id, params);
        let body = self.send(self.client.get(url)).await?;
        envelope::parse_single(&body)
    }

    /// Fetch the authenticated (or impersonated) user.
    #[instrument(skip(self))]
    pub async fn get_current_user(&self, params: &[(&str, &str)]) -> Result<User> {
        let url = self.uri.free_form("users/current.json", params);
        let body = self.send(self.client.get(url)).await?;
        envelope::parse_single(&body)
    }

    /// Upload raw content, returning the server's attachment token.
    ///
    /// `size` set means a fixed content length; `None` means unknown length,
    /// sent with chunked transfer. If reading `content` fails locally the
    /// original I/O error is surfaced as [`Error::UploadRead`] instead of the
    /// request failure the pipeline saw.
    #[instrument(skip(self, content))]
    pub async fn upload<R>(&self, content: R, size: Option<u64>) -> Result<String>
    where
        R: AsyncRead + Send + Sync + Unpin + 'static,
    {
        let url = self.uri.upload();
        let (stream, captured) = MarkedStream::new(ReaderStream::new(content));
        let mut request = self
            .client
            .post(url)
            .header(header::CONTENT_TYPE, CONTENT_TYPE_OCTET_STREAM)
            .body(Body::wrap_stream(stream));
        if let Some(size) = size {
            request = request.header(header::CONTENT_LENGTH, size);
        }

        let body = match self.send(request).await {
            Ok(body) => body,
            Err(transport_err) => {
                return Err(match captured.take() {
                    Some(read_err) => Error::UploadRead(read_err),
                    None => transport_err,
                });
            }
        };
        let upload: Upload = envelope::parse_single(&body)?;
        Ok(upload.token)
    }

    /// Fetch an arbitrary URI, typically attachment content, handing the
    /// error-checked raw response to the handler instead of decoding JSON.
    /// Bypasses the entity registry entirely.
    pub async fn download<T, F, Fut>(&self, uri: &str, handler: F) -> Result<T>
    where
        F: FnOnce(Response) -> Fut,
        Fut: Future<Output = Result<T>>,
    {
        let request = self.prepare(self.client.get(uri));
        let response = self.pipeline.inner().send(request).await?;
        handler(response).await
    }

    fn json_body(&self, request: RequestBuilder, body: String) -> RequestBuilder {
        request
            .header(header::CONTENT_TYPE, CONTENT_TYPE_JSON)
            .body(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Issue;

    fn transport() -> Transport {
        let uri = UriBuilder::new("https://issues.example.com", None).unwrap();
        Transport::new(uri, Client::new())
    }

    #[test]
    fn test_default_page_size() {
        assert_eq!(transport().page_size(), 25);
    }

    #[test]
    fn test_set_page_size_rejects_zero() {
        let mut t = transport();
        assert!(matches!(t.set_page_size(0), Err(Error::Config(_))));
        assert_eq!(t.page_size(), 25);
    }

    #[test]
    fn test_set_page_size() {
        let mut t = transport();
        t.set_page_size(100).unwrap();
        assert_eq!(t.page_size(), 100);
    }

    #[test]
    fn test_set_login_keeps_password() {
        let mut t = transport();
        t.set_credentials(Some("alice".to_string()), Some("secret".to_string()));
        t.set_login(Some("bob".to_string()));
        let credentials = t.pipeline.inner().inner().credentials();
        assert_eq!(credentials.login.as_deref(), Some("bob"));
        assert_eq!(credentials.password.as_deref(), Some("secret"));
    }

    #[tokio::test]
    async fn test_update_without_id_fails_before_network() {
        // Endpoint resolves nowhere; the config error must win regardless.
        let t = transport();
        let issue = Issue {
            subject: Some("no id".to_string()),
            ..Issue::default()
        };
        let err = t.update_object(&issue, &[]).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
