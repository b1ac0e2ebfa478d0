//! JSON envelope encoding and decoding.
//!
//! Redmine wraps every payload in an object keyed by the entity's wire name:
//! `{"issue": {...}}` for single objects, `{"issues": [...], "total_count":
//! N}` for collections. These helpers peel and apply that wrapping; field
//! data itself is handled by serde derives on the models.

use serde_json::Value;

use crate::entity::{Entity, WritableEntity};
use crate::error::{Error, Result};

const KEY_TOTAL_COUNT: &str = "total_count";

/// One server response to a paged list query.
#[derive(Debug, Clone)]
pub struct ResultsPage<T> {
    /// Total matching objects on the server; `None` when the server does not
    /// report it, which the pagination loop treats as "paging unsupported".
    pub total_count: Option<u64>,
    /// The decoded items of this page. Never null; empty when the page is.
    pub results: Vec<T>,
}

fn parse_root(body: &str) -> Result<Value> {
    serde_json::from_str(body)
        .map_err(|e| Error::Format(format!("response is not valid JSON: {}", e)))
}

/// Decode a single-object envelope keyed by the type's singular wire name.
pub fn parse_single<T: Entity>(body: &str) -> Result<T> {
    let mut root = parse_root(body)?;
    let inner = root
        .get_mut(T::SINGULAR)
        .map(Value::take)
        .ok_or_else(|| Error::Format(format!("missing '{}' key in response", T::SINGULAR)))?;
    serde_json::from_value(inner)
        .map_err(|e| Error::Format(format!("cannot decode '{}': {}", T::SINGULAR, e)))
}

fn plural_key<T: Entity>() -> Result<&'static str> {
    T::PLURAL.ok_or_else(|| {
        Error::Config(format!(
            "'{}' objects cannot be listed: no collection wire name",
            T::SINGULAR
        ))
    })
}

/// Decode a collection envelope into a [`ResultsPage`].
///
/// An absent collection key yields an empty page rather than an error; some
/// endpoints omit it when there are no results.
pub fn parse_page<T: Entity>(body: &str) -> Result<ResultsPage<T>> {
    let key = plural_key::<T>()?;
    let mut root = parse_root(body)?;
    let total_count = root.get(KEY_TOTAL_COUNT).and_then(Value::as_u64);
    let results = match root.get_mut(key).map(Value::take) {
        Some(items) => decode_items::<T>(key, items)?,
        None => Vec::new(),
    };
    Ok(ResultsPage {
        total_count,
        results,
    })
}

/// Decode a collection envelope where the array is required.
///
/// A missing array is a hard format error, distinct from an empty one.
pub fn parse_list_required<T: Entity>(body: &str) -> Result<Vec<T>> {
    let key = plural_key::<T>()?;
    let mut root = parse_root(body)?;
    let items = root
        .get_mut(key)
        .map(Value::take)
        .ok_or_else(|| Error::Format(format!("missing '{}' array in response", key)))?;
    decode_items::<T>(key, items)
}

fn decode_items<T: Entity>(key: &str, items: Value) -> Result<Vec<T>> {
    serde_json::from_value(items)
        .map_err(|e| Error::Format(format!("cannot decode '{}' items: {}", key, e)))
}

/// Serialize an object under its singular wire name.
pub fn to_envelope<T: WritableEntity>(object: &T) -> Result<String> {
    let inner = serde_json::to_value(object)
        .map_err(|e| Error::Format(format!("cannot serialize '{}': {}", T::SINGULAR, e)))?;
    let envelope = serde_json::json!({ T::SINGULAR: inner });
    serde_json::to_string(&envelope)
        .map_err(|e| Error::Format(format!("cannot serialize '{}': {}", T::SINGULAR, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Issue, Tracker, Upload};

    #[test]
    fn test_parse_single() {
        let issue: Issue =
            parse_single(r#"{"issue": {"id": 5, "subject": "Broken build"}}"#).unwrap();
        assert_eq!(issue.id, Some(5));
        assert_eq!(issue.subject.as_deref(), Some("Broken build"));
    }

    #[test]
    fn test_parse_single_missing_key() {
        let err = parse_single::<Issue>(r#"{"something_else": {}}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_single_invalid_json() {
        let err = parse_single::<Issue>("<html>proxy error</html>").unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_page_with_total() {
        let page: ResultsPage<Issue> = parse_page(
            r#"{"issues": [{"id": 1}, {"id": 2}], "total_count": 17, "offset": 0, "limit": 2}"#,
        )
        .unwrap();
        assert_eq!(page.total_count, Some(17));
        assert_eq!(page.results.len(), 2);
    }

    #[test]
    fn test_parse_page_without_total() {
        let page: ResultsPage<Tracker> =
            parse_page(r#"{"trackers": [{"id": 1, "name": "Bug"}]}"#).unwrap();
        assert_eq!(page.total_count, None);
        assert_eq!(page.results.len(), 1);
    }

    #[test]
    fn test_parse_page_missing_array_is_empty() {
        let page: ResultsPage<Issue> = parse_page(r#"{"total_count": 0}"#).unwrap();
        assert!(page.results.is_empty());
        assert_eq!(page.total_count, Some(0));
    }

    #[test]
    fn test_parse_page_unlistable_type() {
        let err = parse_page::<Upload>(r#"{}"#).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_parse_list_required_missing_array() {
        let err = parse_list_required::<Issue>(r#"{"total_count": 3}"#).unwrap_err();
        assert!(matches!(err, Error::Format(_)));
    }

    #[test]
    fn test_parse_list_required_empty_array_ok() {
        let items: Vec<Issue> = parse_list_required(r#"{"issues": []}"#).unwrap();
        assert!(items.is_empty());
    }

    #[test]
    fn test_to_envelope_wraps_singular_name() {
        let issue = Issue {
            subject: Some("New".to_string()),
            ..Issue::default()
        };
        let body = to_envelope(&issue).unwrap();
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["issue"]["subject"], "New");
    }
}
