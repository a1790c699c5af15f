//! User CRUD service.

use std::sync::Arc;

use crate::domain::{AuthError, User};
use crate::ports::{UserStore, UserUpdate};

/// Plain CRUD over registered users, used by the admin surface.
pub struct UserService {
    users: Arc<dyn UserStore>,
}

impl UserService {
    pub fn new(users: Arc<dyn UserStore>) -> Self {
        Self { users }
    }

    /// Lists all users.
    pub async fn list(&self) -> Result<Vec<User>, AuthError> {
        Ok(self.users.list().await?)
    }

    /// Fetches one user by internal id.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` for an unknown id.
    pub async fn get(&self, id: i64) -> Result<User, AuthError> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or(AuthError::UserNotFound)
    }

    /// Updates profile fields, returning the updated user.
    ///
    /// The external subject id is immutable and not part of the update.
    pub async fn update(&self, id: i64, update: UserUpdate) -> Result<User, AuthError> {
        // Existence check first so a missing id reports UserNotFound rather
        // than an opaque storage error.
        self.get(id).await?;
        self.users.update(id, update).await?;
        self.get(id).await
    }

    /// Deletes a user. Owned login-history and refresh-credential rows are
    /// cascaded by the store.
    pub async fn delete(&self, id: i64) -> Result<(), AuthError> {
        self.get(id).await?;
        Ok(self.users.delete(id).await?)
    }
}
