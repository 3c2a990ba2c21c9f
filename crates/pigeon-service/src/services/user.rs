//! User service
//!
//! Handles login (find-or-create), profile updates, and user lookups.

use pigeon_core::entities::User;
use pigeon_core::error::DomainError;
use pigeon_core::value_objects::UserId;
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// User service
pub struct UserService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> UserService<'a> {
    /// Create a new UserService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Log a user in, creating the account on first sight of the name
    ///
    /// A duplicate name is not an error: the existing user is returned, so
    /// logging in twice with the same name yields the same identity.
    #[instrument(skip(self))]
    pub async fn login(&self, name: &str) -> ServiceResult<User> {
        if !User::name_is_valid(name) {
            return Err(DomainError::InvalidUsername(name.to_string()).into());
        }

        let user = self.ctx.user_repo().create(name).await?;

        info!(user_id = %user.id, name = %user.name, "User logged in");

        Ok(user)
    }

    /// Change a user's display name
    #[instrument(skip(self))]
    pub async fn rename(&self, user_id: UserId, name: &str) -> ServiceResult<()> {
        if !User::name_is_valid(name) {
            return Err(DomainError::InvalidUsername(name.to_string()).into());
        }

        self.ctx.user_repo().update_name(user_id, name).await?;

        info!(user_id = %user_id, name = %name, "Username updated");

        Ok(())
    }

    /// Store a profile photo and record its reference
    #[instrument(skip(self, photo))]
    pub async fn set_photo(&self, user_id: UserId, photo: &[u8]) -> ServiceResult<String> {
        // Resolve the user first so a bad id does not leave an orphan blob
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;

        let reference = self.ctx.blob_store().store(photo).await?;
        self.ctx.user_repo().update_photo(user_id, &reference).await?;

        info!(user_id = %user_id, reference = %reference, "User photo updated");

        Ok(reference)
    }

    /// Get a user by ID
    #[instrument(skip(self))]
    pub async fn get(&self, user_id: UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    /// Get a user by display name
    #[instrument(skip(self))]
    pub async fn get_by_name(&self, name: &str) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_name(name)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", name.to_string()))
    }

    /// List all users
    #[instrument(skip(self))]
    pub async fn list(&self) -> ServiceResult<Vec<User>> {
        self.ctx.user_repo().list_all().await.map_err(Into::into)
    }
}
