//! Redmine API object types.
//!
//! Compact models of the Redmine REST resources. Fields the server omits are
//! `Option` and are skipped on serialization, so a partially-filled object
//! round-trips only what the caller set. Timestamps are carried verbatim as
//! strings.

use serde::{Deserialize, Serialize};

use crate::entity::{Entity, Identifiable, WritableEntity};

/// A reference to another object by id, with an optional display name.
///
/// Redmine embeds these everywhere (`"project": {"id": 1, "name": "..."}`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamedRef {
    /// The referenced object's id.
    pub id: i32,
    /// The referenced object's display name, when the server includes it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl NamedRef {
    /// Create a reference to the object with the given id.
    pub fn new(id: i32) -> Self {
        NamedRef { id, name: None }
    }
}

/// A Redmine issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Project id used when creating an issue.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracker: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fixed_version: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub done_ratio: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_hours: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
    /// Attachments already on the issue (read side).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub attachments: Option<Vec<Attachment>>,
    /// Relations, present when requested via `include=relations`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relations: Option<Vec<IssueRelation>>,
    /// Upload tokens to attach on create/update (write side).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub uploads: Option<Vec<Upload>>,
}

impl Issue {
    /// Create an otherwise-empty issue addressing an existing server object.
    pub fn with_id(id: i32) -> Self {
        Issue {
            id: Some(id),
            ..Issue::default()
        }
    }
}

impl Entity for Issue {
    const SINGULAR: &'static str = "issue";
    const PLURAL: Option<&'static str> = Some("issues");
    const PATH: &'static str = "issues";
}
impl WritableEntity for Issue {}
impl Identifiable for Issue {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A Redmine project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Project {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The project's string key, unique across the server.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub identifier: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub homepage: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_public: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
}

impl Entity for Project {
    const SINGULAR: &'static str = "project";
    const PLURAL: Option<&'static str> = Some("projects");
    const PATH: &'static str = "projects";
}
impl WritableEntity for Project {}
impl Identifiable for Project {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A Redmine user account.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct User {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub login: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub firstname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lastname: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mail: Option<String>,
    /// Only sent when creating a user.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_login_on: Option<String>,
    /// The user's API access key; only visible to administrators.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Entity for User {
    const SINGULAR: &'static str = "user";
    const PLURAL: Option<&'static str> = Some("users");
    const PATH: &'static str = "users";
}
impl WritableEntity for User {}
impl Identifiable for User {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A user group.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl Entity for Group {
    const SINGULAR: &'static str = "group";
    const PLURAL: Option<&'static str> = Some("groups");
    const PATH: &'static str = "groups";
}
impl WritableEntity for Group {}
impl Identifiable for Group {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A project membership: a user or group with a set of roles in a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Membership {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub roles: Option<Vec<NamedRef>>,
    /// Used on the write side instead of the expanded `user` reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role_ids: Option<Vec<i32>>,
}

impl Entity for Membership {
    const SINGULAR: &'static str = "membership";
    const PLURAL: Option<&'static str> = Some("memberships");
    const PATH: &'static str = "memberships";
}
impl WritableEntity for Membership {}
impl Identifiable for Membership {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A project version (milestone).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Version {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// One of `open`, `locked`, `closed`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub due_date: Option<String>,
}

impl Entity for Version {
    const SINGULAR: &'static str = "version";
    const PLURAL: Option<&'static str> = Some("versions");
    const PATH: &'static str = "versions";
}
impl WritableEntity for Version {}
impl Identifiable for Version {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// An issue category within a project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueCategory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub assigned_to: Option<NamedRef>,
}

impl Entity for IssueCategory {
    const SINGULAR: &'static str = "issue_category";
    const PLURAL: Option<&'static str> = Some("issue_categories");
    const PATH: &'static str = "issue_categories";
}
impl WritableEntity for IssueCategory {}
impl Identifiable for IssueCategory {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A typed link between two issues.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueRelation {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_to_id: Option<i32>,
    /// Relation type, e.g. `relates`, `blocks`, `precedes`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub relation_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delay: Option<i32>,
}

impl Entity for IssueRelation {
    const SINGULAR: &'static str = "relation";
    const PLURAL: Option<&'static str> = Some("relations");
    const PATH: &'static str = "relations";
}
impl WritableEntity for IssueRelation {}
impl Identifiable for IssueRelation {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// A time entry booked against an issue or project.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TimeEntry {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub activity: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hours: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comments: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub spent_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_on: Option<String>,
}

impl Entity for TimeEntry {
    const SINGULAR: &'static str = "time_entry";
    const PLURAL: Option<&'static str> = Some("time_entries");
    const PATH: &'static str = "time_entries";
}
impl WritableEntity for TimeEntry {}
impl Identifiable for TimeEntry {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

/// An issue tracker kind (bug, feature, ...). Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Tracker {
    pub id: i32,
    pub name: String,
}

impl Entity for Tracker {
    const SINGULAR: &'static str = "tracker";
    const PLURAL: Option<&'static str> = Some("trackers");
    const PATH: &'static str = "trackers";
}

/// An issue workflow status. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssueStatus {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub is_closed: bool,
    #[serde(default)]
    pub is_default: bool,
}

impl Entity for IssueStatus {
    const SINGULAR: &'static str = "status";
    const PLURAL: Option<&'static str> = Some("issue_statuses");
    const PATH: &'static str = "issue_statuses";
}

/// An issue priority enumeration value. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IssuePriority {
    pub id: i32,
    pub name: String,
    #[serde(default)]
    pub is_default: bool,
}

impl Entity for IssuePriority {
    const SINGULAR: &'static str = "issue_priority";
    const PLURAL: Option<&'static str> = Some("issue_priorities");
    const PATH: &'static str = "enumerations/issue_priorities";
}

/// A saved issue query. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavedQuery {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_id: Option<i32>,
    #[serde(default)]
    pub is_public: bool,
}

impl Entity for SavedQuery {
    const SINGULAR: &'static str = "query";
    const PLURAL: Option<&'static str> = Some("queries");
    const PATH: &'static str = "queries";
}

/// A file attached to an issue. Created through the upload flow, never
/// written directly.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filesize: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
}

impl Entity for Attachment {
    const SINGULAR: &'static str = "attachment";
    const PLURAL: Option<&'static str> = Some("attachments");
    const PATH: &'static str = "attachments";
}

/// A news entry on a project. Read-only.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct News {
    pub id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub author: Option<NamedRef>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_on: Option<String>,
}

impl Entity for News {
    const SINGULAR: &'static str = "news";
    const PLURAL: Option<&'static str> = Some("news");
    const PATH: &'static str = "news";
}

/// A pending upload: the token returned by `POST /uploads.json`, plus the
/// metadata sent back when attaching it to an issue.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Upload {
    pub token: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filename: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Entity for Upload {
    const SINGULAR: &'static str = "upload";
    const PLURAL: Option<&'static str> = None;
    const PATH: &'static str = "uploads";
}

/// A user watching an issue. Lives only under an issue: added and removed
/// through the child-entry operations, never addressed at the top level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Watcher {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Write side: the user to add as a watcher.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<i32>,
}

impl Entity for Watcher {
    const SINGULAR: &'static str = "watcher";
    const PLURAL: Option<&'static str> = Some("watchers");
    const PATH: &'static str = "watchers";
}
impl WritableEntity for Watcher {}
impl Identifiable for Watcher {
    fn id(&self) -> Option<i32> {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_skips_unset_fields() {
        let issue = Issue {
            subject: Some("Crash on startup".to_string()),
            project_id: Some(7),
            ..Issue::default()
        };
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["subject"], "Crash on startup");
        assert_eq!(json["project_id"], 7);
        assert!(json.get("description").is_none());
        assert!(json.get("id").is_none());
    }

    #[test]
    fn test_issue_with_id() {
        let issue = Issue::with_id(42);
        assert_eq!(issue.id, Some(42));
        assert!(issue.subject.is_none());
    }

    #[test]
    fn test_issue_deserializes_server_shape() {
        let json = r#"{
            "id": 1,
            "subject": "Printer broken",
            "project": {"id": 3, "name": "Office"},
            "status": {"id": 1, "name": "New"},
            "done_ratio": 0,
            "created_on": "2024-03-01T10:00:00Z"
        }"#;
        let issue: Issue = serde_json::from_str(json).unwrap();
        assert_eq!(issue.id, Some(1));
        assert_eq!(issue.project.as_ref().unwrap().id, 3);
        assert_eq!(issue.status.as_ref().unwrap().name.as_deref(), Some("New"));
    }

    #[test]
    fn test_tracker_is_plain() {
        let tracker: Tracker = serde_json::from_str(r#"{"id": 2, "name": "Feature"}"#).unwrap();
        assert_eq!(tracker.id, 2);
        assert_eq!(tracker.name, "Feature");
    }

    #[test]
    fn test_upload_serializes_token() {
        let upload = Upload {
            token: "7167.ed1ccdb0".to_string(),
            filename: Some("log.txt".to_string()),
            content_type: Some("text/plain".to_string()),
            description: None,
        };
        let json = serde_json::to_value(&upload).unwrap();
        assert_eq!(json["token"], "7167.ed1ccdb0");
        assert!(json.get("description").is_none());
    }
}
