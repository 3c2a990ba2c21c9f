//! Reaction service
//!
//! Handles per-message, per-user reaction upserts and removal.

use pigeon_core::entities::Reaction;
use pigeon_core::value_objects::{MessageId, UserId};
use tracing::{info, instrument};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Reaction service
pub struct ReactionService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ReactionService<'a> {
    /// Create a new ReactionService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// React to a message
    ///
    /// A user holds at most one reaction per message; reacting again
    /// replaces the emoji. Any caller with a valid message id may react.
    #[instrument(skip(self))]
    pub async fn upsert(
        &self,
        message_id: MessageId,
        user_id: UserId,
        emoji: String,
    ) -> ServiceResult<Reaction> {
        // The message must exist; soft-deleted messages still count
        self.ctx
            .message_repo()
            .find_by_id(message_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", message_id.to_string()))?;

        let reaction = Reaction::new(message_id, user_id, emoji);
        self.ctx.reaction_repo().upsert(&reaction).await?;

        info!(
            message_id = %message_id,
            user_id = %user_id,
            emoji = %reaction.emoji,
            "Reaction set"
        );

        Ok(reaction)
    }

    /// Remove a user's reaction from a message
    #[instrument(skip(self))]
    pub async fn remove(&self, message_id: MessageId, user_id: UserId) -> ServiceResult<()> {
        self.ctx.reaction_repo().remove(message_id, user_id).await?;

        info!(message_id = %message_id, user_id = %user_id, "Reaction removed");

        Ok(())
    }

    /// List all reactions on a message
    #[instrument(skip(self))]
    pub async fn list_by_message(&self, message_id: MessageId) -> ServiceResult<Vec<Reaction>> {
        self.ctx
            .reaction_repo()
            .list_by_message(message_id)
            .await
            .map_err(Into::into)
    }
}
