//! Endpoint URI construction.
//!
//! Maps entity path segments to absolute request URIs, appending the `.json`
//! suffix, caller query parameters, and the configured API key. When basic
//! auth is in use no key parameter exists, so credentials never appear twice
//! on a request.

use url::Url;

use crate::entity::Entity;
use crate::error::{Error, Result};

const URL_SUFFIX: &str = ".json";

/// Builds absolute URIs for a fixed base endpoint.
#[derive(Debug, Clone)]
pub struct UriBuilder {
    base: Url,
    api_key: Option<String>,
}

impl UriBuilder {
    /// Create a builder for the given base endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the endpoint is empty, unparsable, or not
    /// a hierarchical URL.
    pub fn new(endpoint: &str, api_key: Option<String>) -> Result<Self> {
        if endpoint.trim().is_empty() {
            return Err(Error::Config("base endpoint is empty".to_string()));
        }
        let base = Url::parse(endpoint)
            .map_err(|e| Error::Config(format!("invalid base endpoint '{}': {}", endpoint, e)))?;
        if base.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base endpoint '{}' cannot carry a path",
                endpoint
            )));
        }
        Ok(UriBuilder { base, api_key })
    }

    /// URI of a type's collection, e.g. `issues.json`.
    pub fn collection<E: Entity>(&self, params: &[(&str, &str)]) -> Url {
        self.build(E::PATH, None, params)
    }

    /// URI of a single object, e.g. `issues/12.json`.
    pub fn object<E: Entity>(&self, key: &str, params: &[(&str, &str)]) -> Url {
        self.build(E::PATH, Some(key), params)
    }

    /// URI of a nested child collection, e.g. `issues/12/relations.json`.
    pub fn child_collection<P: Entity, C: Entity>(
        &self,
        parent_key: &str,
        params: &[(&str, &str)],
    ) -> Url {
        let path = format!("{}/{}/{}", P::PATH, parent_key, C::PATH);
        self.build(&path, None, params)
    }

    /// URI of a nested child item, e.g. `issues/12/watchers/3.json`.
    pub fn child_item<P: Entity, C: Entity>(
        &self,
        parent_key: &str,
        child_id: &str,
        params: &[(&str, &str)],
    ) -> Url {
        let path = format!("{}/{}/{}", P::PATH, parent_key, C::PATH);
        self.build(&path, Some(child_id), params)
    }

    /// URI of the upload endpoint.
    pub fn upload(&self) -> Url {
        self.build("uploads", None, &[])
    }

    /// URI for a free-form query path that already carries its suffix,
    /// e.g. `users/current.json`.
    pub fn free_form(&self, query: &str, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            // Checked hierarchical at construction.
            let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
            segments.pop_if_empty();
            segments.extend(query.split('/'));
        }
        self.append_query(&mut url, params);
        url
    }

    fn build(&self, path: &str, id: Option<&str>, params: &[(&str, &str)]) -> Url {
        let mut url = self.base.clone();
        {
            let mut segments = url.path_segments_mut().unwrap_or_else(|_| unreachable!());
            segments.pop_if_empty();
            let mut parts = path.split('/').peekable();
            while let Some(part) = parts.next() {
                if parts.peek().is_some() || id.is_some() {
                    segments.push(part);
                } else {
                    segments.push(&format!("{}{}", part, URL_SUFFIX));
                }
            }
            if let Some(id) = id {
                segments.push(&format!("{}{}", id, URL_SUFFIX));
            }
        }
        self.append_query(&mut url, params);
        url
    }

    fn append_query(&self, url: &mut Url, params: &[(&str, &str)]) {
        if params.is_empty() && self.api_key.is_none() {
            return;
        }
        let mut pairs = url.query_pairs_mut();
        pairs.extend_pairs(params);
        if let Some(key) = &self.api_key {
            pairs.append_pair("key", key);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, IssuePriority, Project, Version, Watcher};

    fn builder() -> UriBuilder {
        UriBuilder::new("https://issues.example.com", None).unwrap()
    }

    #[test]
    fn test_rejects_empty_endpoint() {
        assert!(matches!(UriBuilder::new("", None), Err(Error::Config(_))));
        assert!(matches!(UriBuilder::new("  ", None), Err(Error::Config(_))));
    }

    #[test]
    fn test_rejects_malformed_endpoint() {
        assert!(matches!(
            UriBuilder::new("not a url", None),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            UriBuilder::new("mailto:someone@example.com", None),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_collection_uri() {
        let url = builder().collection::<Issue>(&[]);
        assert_eq!(url.as_str(), "https://issues.example.com/issues.json");
    }

    #[test]
    fn test_object_uri_with_params() {
        let url = builder().object::<Issue>("12", &[("include", "relations,attachments")]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/issues/12.json?include=relations%2Cattachments"
        );
    }

    #[test]
    fn test_nested_path_segment() {
        let url = builder().collection::<IssuePriority>(&[]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/enumerations/issue_priorities.json"
        );
    }

    #[test]
    fn test_child_collection_uri() {
        let url = builder().child_collection::<Project, Version>("test-project", &[]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/projects/test-project/versions.json"
        );
    }

    #[test]
    fn test_child_item_uri() {
        let url = builder().child_item::<Issue, Watcher>("12", "3", &[]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/issues/12/watchers/3.json"
        );
    }

    #[test]
    fn test_api_key_appended_last() {
        let b = UriBuilder::new("https://issues.example.com", Some("secret".to_string())).unwrap();
        let url = b.collection::<Issue>(&[("limit", "25")]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/issues.json?limit=25&key=secret"
        );
    }

    #[test]
    fn test_no_key_param_without_api_key() {
        let url = builder().collection::<Issue>(&[]);
        assert!(url.query().is_none());
    }

    #[test]
    fn test_base_path_preserved() {
        let b = UriBuilder::new("https://example.com/redmine/", None).unwrap();
        let url = b.object::<Issue>("7", &[]);
        assert_eq!(url.as_str(), "https://example.com/redmine/issues/7.json");
    }

    #[test]
    fn test_upload_uri() {
        let url = builder().upload();
        assert_eq!(url.as_str(), "https://issues.example.com/uploads.json");
    }

    #[test]
    fn test_free_form_uri() {
        let b = UriBuilder::new("https://issues.example.com", Some("k".to_string())).unwrap();
        let url = b.free_form("users/current.json", &[]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/users/current.json?key=k"
        );
    }

    #[test]
    fn test_params_are_encoded() {
        let url = builder().collection::<Issue>(&[("subject", "a b&c")]);
        assert_eq!(
            url.as_str(),
            "https://issues.example.com/issues.json?subject=a+b%26c"
        );
    }
}
