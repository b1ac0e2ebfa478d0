//! Issue operations: CRUD, relations, time entries and the read-only
//! enumerations around them.

use crate::error::Result;
use crate::models::{
    Issue, IssuePriority, IssueRelation, IssueStatus, SavedQuery, TimeEntry, Tracker, Watcher,
};
use crate::transport::Transport;

/// Related sub-resources that can be requested alongside an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Include {
    Journals,
    Relations,
    Attachments,
    Watchers,
    Children,
}

impl Include {
    fn as_str(self) -> &'static str {
        match self {
            Include::Journals => "journals",
            Include::Relations => "relations",
            Include::Attachments => "attachments",
            Include::Watchers => "watchers",
            Include::Children => "children",
        }
    }

    /// Join flags into the comma-separated `include` parameter value.
    pub fn join(flags: &[Include]) -> String {
        flags
            .iter()
            .map(|f| f.as_str())
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Issue operations over a borrowed transport.
#[derive(Debug, Clone, Copy)]
pub struct IssueManager<'a> {
    transport: &'a Transport,
}

impl<'a> IssueManager<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        IssueManager { transport }
    }

    /// Fetch one issue by id, optionally with related sub-resources.
    pub async fn get_issue(&self, id: i32, include: &[Include]) -> Result<Issue> {
        let joined = Include::join(include);
        let mut params: Vec<(&str, &str)> = Vec::new();
        if !include.is_empty() {
            params.push(("include", joined.as_str()));
        }
        self.transport.get_object(&id.to_string(), &params).await
    }

    /// Fetch all issues matching the given filter parameters, across all
    /// pages. Filters pass through to the server untouched, e.g.
    /// `("status_id", "open")` or `("assigned_to_id", "me")`.
    pub async fn get_issues(&self, params: &[(&str, &str)]) -> Result<Vec<Issue>> {
        self.transport.get_objects_list(params).await
    }

    /// Fetch all issues of one project.
    pub async fn get_issues_by_project(&self, project_key: &str) -> Result<Vec<Issue>> {
        self.get_issues(&[("project_id", project_key)]).await
    }

    /// Create an issue.
    pub async fn create_issue(&self, issue: &Issue) -> Result<Issue> {
        self.transport.add_object(issue, &[]).await
    }

    /// Update an issue; the issue must carry its id.
    pub async fn update_issue(&self, issue: &Issue) -> Result<()> {
        self.transport.update_object(issue, &[]).await
    }

    /// Delete an issue by id.
    pub async fn delete_issue(&self, id: i32) -> Result<()> {
        self.transport.delete_object::<Issue>(&id.to_string()).await
    }

    /// Link two issues with the given relation type (`relates`, `blocks`,
    /// `precedes`, ...).
    pub async fn create_relation(
        &self,
        issue_id: i32,
        issue_to_id: i32,
        relation_type: &str,
    ) -> Result<IssueRelation> {
        let relation = IssueRelation {
            issue_to_id: Some(issue_to_id),
            relation_type: Some(relation_type.to_string()),
            ..IssueRelation::default()
        };
        self.transport
            .add_child_entry::<Issue, _>(&issue_id.to_string(), &relation, &[])
            .await
    }

    /// Fetch the relations of an issue.
    pub async fn get_relations(&self, issue_id: i32) -> Result<Vec<IssueRelation>> {
        self.transport
            .get_child_entries::<Issue, IssueRelation>(&issue_id.to_string(), &[])
            .await
    }

    /// Delete one relation by its own id.
    pub async fn delete_relation(&self, id: i32) -> Result<()> {
        self.transport
            .delete_object::<IssueRelation>(&id.to_string())
            .await
    }

    /// Add a user as a watcher of an issue.
    pub async fn add_watcher(&self, issue_id: i32, user_id: i32) -> Result<Watcher> {
        let watcher = Watcher {
            user_id: Some(user_id),
            ..Watcher::default()
        };
        self.transport
            .add_child_entry::<Issue, _>(&issue_id.to_string(), &watcher, &[])
            .await
    }

    /// Stop a user watching an issue.
    pub async fn remove_watcher(&self, issue_id: i32, user_id: i32) -> Result<()> {
        self.transport
            .delete_child_id::<Issue, Watcher>(&issue_id.to_string(), &user_id.to_string())
            .await
    }

    /// Book time against an issue or project.
    pub async fn create_time_entry(&self, entry: &TimeEntry) -> Result<TimeEntry> {
        self.transport.add_object(entry, &[]).await
    }

    /// Fetch one time entry by id.
    pub async fn get_time_entry(&self, id: i32) -> Result<TimeEntry> {
        self.transport.get_object(&id.to_string(), &[]).await
    }

    /// Fetch all time entries visible to the current user.
    pub async fn get_time_entries(&self) -> Result<Vec<TimeEntry>> {
        self.transport.get_objects_list(&[]).await
    }

    /// Fetch the time entries booked on one issue.
    pub async fn get_time_entries_for_issue(&self, issue_id: i32) -> Result<Vec<TimeEntry>> {
        let id = issue_id.to_string();
        self.transport
            .get_objects_list(&[("issue_id", id.as_str())])
            .await
    }

    /// Update a time entry; must carry its id.
    pub async fn update_time_entry(&self, entry: &TimeEntry) -> Result<()> {
        self.transport.update_object(entry, &[]).await
    }

    /// Delete a time entry by id.
    pub async fn delete_time_entry(&self, id: i32) -> Result<()> {
        self.transport
            .delete_object::<TimeEntry>(&id.to_string())
            .await
    }

    /// The server's issue priorities. Read-only.
    pub async fn get_priorities(&self) -> Result<Vec<IssuePriority>> {
        self.transport.get_objects_list(&[]).await
    }

    /// The server's issue statuses. Read-only.
    pub async fn get_statuses(&self) -> Result<Vec<IssueStatus>> {
        self.transport.get_objects_list(&[]).await
    }

    /// The server's trackers. Read-only.
    pub async fn get_trackers(&self) -> Result<Vec<Tracker>> {
        self.transport.get_objects_list(&[]).await
    }

    /// The saved queries visible to the current user. Read-only.
    pub async fn get_saved_queries(&self) -> Result<Vec<SavedQuery>> {
        self.transport.get_objects_list(&[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_join() {
        assert_eq!(
            Include::join(&[Include::Relations, Include::Attachments]),
            "relations,attachments"
        );
        assert_eq!(Include::join(&[]), "");
        assert_eq!(Include::join(&[Include::Journals]), "journals");
    }
}
