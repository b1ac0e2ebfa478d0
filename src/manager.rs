//! Entry point for the client: construction and access to the per-entity
//! managers.

use std::time::Duration;

use reqwest::Client;

use crate::error::{Error, Result};
use crate::managers::{AttachmentManager, IssueManager, ProjectManager, UserManager};
use crate::transport::{Transport, UriBuilder};

/// Default request timeout in seconds for the built-in HTTP client.
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// A connection to one Redmine server under one identity.
///
/// Obtain per-entity managers from it:
///
/// ```no_run
/// # async fn demo() -> redmine_client::Result<()> {
/// let redmine = redmine_client::RedmineManager::with_api_key(
///     "https://issues.example.com",
///     "0123456789abcdef",
/// )?;
/// let issues = redmine.issues().get_issues(&[]).await?;
/// # Ok(()) }
/// ```
#[derive(Debug)]
pub struct RedmineManager {
    transport: Transport,
}

impl RedmineManager {
    /// Connect using an API access key, passed as a query parameter on every
    /// request.
    pub fn with_api_key(endpoint: &str, api_key: &str) -> Result<Self> {
        let uri = UriBuilder::new(endpoint, Some(api_key.to_string()))?;
        Ok(RedmineManager {
            transport: Transport::new(uri, default_client()?),
        })
    }

    /// Connect using HTTP Basic login and password.
    pub fn with_user_auth(endpoint: &str, login: &str, password: &str) -> Result<Self> {
        let uri = UriBuilder::new(endpoint, None)?;
        let mut transport = Transport::new(uri, default_client()?);
        transport.set_credentials(Some(login.to_string()), Some(password.to_string()));
        Ok(RedmineManager { transport })
    }

    /// Connect without credentials, for servers with public access enabled.
    pub fn unauthenticated(endpoint: &str) -> Result<Self> {
        let uri = UriBuilder::new(endpoint, None)?;
        Ok(RedmineManager {
            transport: Transport::new(uri, default_client()?),
        })
    }

    /// Wrap an already-configured transport, e.g. one built over a custom
    /// `reqwest::Client`.
    pub fn from_transport(transport: Transport) -> Self {
        RedmineManager { transport }
    }

    /// Issue, relation and time-entry operations.
    pub fn issues(&self) -> IssueManager<'_> {
        IssueManager::new(&self.transport)
    }

    /// Project, version, category and membership operations.
    pub fn projects(&self) -> ProjectManager<'_> {
        ProjectManager::new(&self.transport)
    }

    /// User and group operations.
    pub fn users(&self) -> UserManager<'_> {
        UserManager::new(&self.transport)
    }

    /// Attachment upload and download.
    pub fn attachments(&self) -> AttachmentManager<'_> {
        AttachmentManager::new(&self.transport)
    }

    /// The underlying transport.
    pub fn transport(&self) -> &Transport {
        &self.transport
    }

    /// Mutable access for context changes (credentials, impersonation,
    /// page size).
    pub fn transport_mut(&mut self) -> &mut Transport {
        &mut self.transport
    }

    /// Act as the given user on subsequent requests. Requires admin
    /// privileges on the authenticated account.
    pub fn set_on_behalf_of(&mut self, login: Option<String>) {
        self.transport.set_on_behalf_of(login);
    }

    /// Set the pagination page size.
    pub fn set_page_size(&mut self, page_size: u32) -> Result<()> {
        self.transport.set_page_size(page_size)
    }
}

fn default_client() -> Result<Client> {
    Client::builder()
        .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
        .build()
        .map_err(Error::Network)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_api_key_rejects_bad_endpoint() {
        let result = RedmineManager::with_api_key("", "key");
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn test_with_user_auth_builds() {
        let redmine =
            RedmineManager::with_user_auth("https://issues.example.com", "alice", "secret");
        assert!(redmine.is_ok());
    }

    #[test]
    fn test_set_page_size_delegates() {
        let mut redmine = RedmineManager::unauthenticated("https://issues.example.com").unwrap();
        assert!(redmine.set_page_size(0).is_err());
        redmine.set_page_size(50).unwrap();
        assert_eq!(redmine.transport().page_size(), 50);
    }
}
