//! User and group administration.
//!
//! Most of these require administrator privileges on the authenticated
//! account; the server answers 403 otherwise, surfaced as the authentication
//! error.

use crate::error::Result;
use crate::models::{Group, User};
use crate::transport::Transport;

/// User operations over a borrowed transport.
#[derive(Debug, Clone, Copy)]
pub struct UserManager<'a> {
    transport: &'a Transport,
}

impl<'a> UserManager<'a> {
    pub(crate) fn new(transport: &'a Transport) -> Self {
        UserManager { transport }
    }

    /// The authenticated user, or the impersonated one when a switch-user
    /// login is set.
    pub async fn get_current_user(&self) -> Result<User> {
        self.transport.get_current_user(&[]).await
    }

    /// Fetch all users. Admin only.
    pub async fn get_users(&self) -> Result<Vec<User>> {
        self.transport.get_objects_list(&[]).await
    }

    /// Fetch one user by id.
    pub async fn get_user(&self, id: i32) -> Result<User> {
        self.transport.get_object(&id.to_string(), &[]).await
    }

    /// Create a user. Admin only.
    pub async fn create_user(&self, user: &User) -> Result<User> {
        self.transport.add_object(user, &[]).await
    }

    /// Update a user; must carry its id.
    pub async fn update_user(&self, user: &User) -> Result<()> {
        self.transport.update_object(user, &[]).await
    }

    /// Delete a user by id. Admin only.
    pub async fn delete_user(&self, id: i32) -> Result<()> {
        self.transport.delete_object::<User>(&id.to_string()).await
    }

    /// Fetch all groups. Admin only.
    pub async fn get_groups(&self) -> Result<Vec<Group>> {
        self.transport.get_objects_list(&[]).await
    }

    /// Fetch one group by id.
    pub async fn get_group(&self, id: i32) -> Result<Group> {
        self.transport.get_object(&id.to_string(), &[]).await
    }

    /// Create a group. Admin only.
    pub async fn create_group(&self, group: &Group) -> Result<Group> {
        self.transport.add_object(group, &[]).await
    }

    /// Delete a group by id. Admin only.
    pub async fn delete_group(&self, id: i32) -> Result<()> {
        self.transport.delete_object::<Group>(&id.to_string()).await
    }

    /// Remove a user from a group.
    pub async fn remove_user_from_group(&self, user_id: i32, group_id: i32) -> Result<()> {
        self.transport
            .delete_child_id::<Group, User>(&group_id.to_string(), &user_id.to_string())
            .await
    }
}
