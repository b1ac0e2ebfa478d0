//! Project operations and the collections nested under a project.

use crate::error::Result;
use crate::models::{IssueCategory, Membership, News, Project, Version};
use crate::transport::Transport;

/// Project operations over a borrowed transport.
#[derive(Debug, Clone, Copy)]
pub struct ProjectManager<'a> {
    transport: &'a Transport,
}

impl<'a> ProjectManager<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        ProjectManager { transport }
    }

    /// Fetch all projects visible to the current user.
    pub async fn get_projects(&self) -> Result<Vec<Project>> {
        self.transport.get_objects_list(&[]).await
    }

    /// Fetch one project by its string key or numeric id.
    pub async fn get_project(&self, key: &str) -> Result<Project> {
        self.transport.get_object(key, &[]).await
    }

    /// Create a project.
    pub async fn create_project(&self, project: &Project) -> Result<Project> {
        self.transport.add_object(project, &[]).await
    }

    /// Update a project; must carry its id.
    pub async fn update_project(&self, project: &Project) -> Result<()> {
        self.transport.update_object(project, &[]).await
    }

    /// Delete a project by key.
    pub async fn delete_project(&self, key: &str) -> Result<()> {
        self.transport.delete_object::<Project>(key).await
    }

    /// The versions defined in a project.
    pub async fn get_versions(&self, project_key: &str) -> Result<Vec<Version>> {
        self.transport
            .get_child_entries::<Project, Version>(project_key, &[])
            .await
    }

    /// Fetch one version by its own id.
    pub async fn get_version(&self, id: i32) -> Result<Version> {
        self.transport.get_object(&id.to_string(), &[]).await
    }

    /// Create a version in a project.
    pub async fn create_version(&self, project_key: &str, version: &Version) -> Result<Version> {
        self.transport
            .add_child_entry::<Project, _>(project_key, version, &[])
            .await
    }

    /// Delete a version by its own id.
    pub async fn delete_version(&self, id: i32) -> Result<()> {
        self.transport.delete_object::<Version>(&id.to_string()).await
    }

    /// The issue categories of a project.
    pub async fn get_categories(&self, project_key: &str) -> Result<Vec<IssueCategory>> {
        self.transport
            .get_child_entries::<Project, IssueCategory>(project_key, &[])
            .await
    }

    /// Create an issue category in a project.
    pub async fn create_category(
        &self,
        project_key: &str,
        category: &IssueCategory,
    ) -> Result<IssueCategory> {
        self.transport
            .add_child_entry::<Project, _>(project_key, category, &[])
            .await
    }

    /// Delete an issue category by its own id.
    pub async fn delete_category(&self, id: i32) -> Result<()> {
        self.transport
            .delete_object::<IssueCategory>(&id.to_string())
            .await
    }

    /// The memberships of a project.
    pub async fn get_memberships(&self, project_key: &str) -> Result<Vec<Membership>> {
        self.transport
            .get_child_entries::<Project, Membership>(project_key, &[])
            .await
    }

    /// Add a user or group to a project with a set of roles.
    pub async fn add_membership(
        &self,
        project_key: &str,
        membership: &Membership,
    ) -> Result<Membership> {
        self.transport
            .add_child_entry::<Project, _>(project_key, membership, &[])
            .await
    }

    /// Remove a membership by its own id.
    pub async fn delete_membership(&self, id: i32) -> Result<()> {
        self.transport
            .delete_object::<Membership>(&id.to_string())
            .await
    }

    /// News entries, either of one project or across the whole server.
    pub async fn get_news(&self, project_key: Option<&str>) -> Result<Vec<News>> {
        match project_key {
            Some(key) => self.transport.get_child_entries::<Project, News>(key, &[]).await,
            None => self.transport.get_objects_list(&[]).await,
        }
    }
}
