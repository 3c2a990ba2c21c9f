//! Conversation service
//!
//! Handles direct-conversation deduplication, group creation, membership,
//! and conversation reads.

use pigeon_core::entities::{Conversation, DeliveryStatus, Message};
use pigeon_core::error::DomainError;
use pigeon_core::value_objects::{ConversationId, UserId};
use serde::Serialize;
use tracing::{info, instrument};

use super::access;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// A conversation together with its visible message history
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationView {
    pub conversation: Conversation,
    pub messages: Vec<Message>,
}

/// Conversation service
pub struct ConversationService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> ConversationService<'a> {
    /// Create a new ConversationService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Find or create the direct conversation between two users
    ///
    /// Idempotent in both argument orders; the store owns the atomicity of
    /// the find-or-create, so concurrent identical calls converge on one
    /// conversation.
    #[instrument(skip(self))]
    pub async fn create_direct(
        &self,
        user_a: UserId,
        user_b: UserId,
    ) -> ServiceResult<Conversation> {
        if user_a == user_b {
            return Err(DomainError::DirectWithSelf.into());
        }

        self.resolve_user(user_a).await?;
        self.resolve_user(user_b).await?;

        let conversation = self
            .ctx
            .conversation_repo()
            .create_direct(user_a, user_b)
            .await?;

        info!(
            conversation_id = %conversation.id,
            user_a = %user_a,
            user_b = %user_b,
            "Direct conversation ready"
        );

        Ok(conversation)
    }

    /// Create a group conversation
    ///
    /// The creator is always a member, whether or not the caller listed
    /// them; duplicate ids collapse to one membership.
    #[instrument(skip(self, participant_ids))]
    pub async fn create_group(
        &self,
        name: &str,
        creator_id: UserId,
        participant_ids: &[UserId],
    ) -> ServiceResult<Conversation> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyGroupName.into());
        }

        let mut members: Vec<UserId> = vec![creator_id];
        for &id in participant_ids {
            if !members.contains(&id) {
                members.push(id);
            }
        }

        for &id in &members {
            self.resolve_user(id).await?;
        }

        let conversation = self
            .ctx
            .conversation_repo()
            .create_group(name, &members)
            .await?;

        info!(
            conversation_id = %conversation.id,
            creator_id = %creator_id,
            members = members.len(),
            "Group conversation created"
        );

        Ok(conversation)
    }

    /// Get a conversation with its message history
    ///
    /// Only participants may read. Opening a conversation marks the other
    /// senders' `Received` messages as `Read`.
    #[instrument(skip(self))]
    pub async fn get(
        &self,
        conversation_id: ConversationId,
        viewer: UserId,
    ) -> ServiceResult<ConversationView> {
        let conversation = self.resolve_conversation(conversation_id).await?;
        access::require_participant(&conversation, viewer)?;

        let mut messages = self
            .ctx
            .message_repo()
            .list_by_conversation(conversation_id)
            .await?;

        for message in &mut messages {
            message.reactions = self.ctx.reaction_repo().list_by_message(message.id).await?;

            if message.sender.user_id != viewer && message.status == DeliveryStatus::Received {
                self.ctx
                    .message_repo()
                    .update_status(message.id, DeliveryStatus::Read)
                    .await?;
                message.status = DeliveryStatus::Read;
            }
        }

        Ok(ConversationView {
            conversation,
            messages,
        })
    }

    /// List a user's conversations, most recently active first
    #[instrument(skip(self))]
    pub async fn list_for_user(&self, user_id: UserId) -> ServiceResult<Vec<Conversation>> {
        self.ctx
            .conversation_repo()
            .list_by_user(user_id)
            .await
            .map_err(Into::into)
    }

    /// Add a user to a group
    #[instrument(skip(self))]
    pub async fn add_member(
        &self,
        group_id: ConversationId,
        user_id: UserId,
        acting_user: UserId,
    ) -> ServiceResult<()> {
        let conversation = self.resolve_group(group_id).await?;
        access::require_participant(&conversation, acting_user)?;

        self.resolve_user(user_id).await?;

        if conversation.has_participant(user_id) {
            return Err(DomainError::AlreadyParticipant(user_id).into());
        }

        self.ctx
            .conversation_repo()
            .add_participant(group_id, user_id)
            .await?;

        info!(group_id = %group_id, user_id = %user_id, "Member added");

        Ok(())
    }

    /// Remove a user from a group
    ///
    /// Leaving and removing another member are the same operation; any
    /// current participant may invoke it.
    #[instrument(skip(self))]
    pub async fn remove_member(
        &self,
        group_id: ConversationId,
        user_id: UserId,
    ) -> ServiceResult<()> {
        let conversation = self.resolve_group(group_id).await?;

        if !conversation.has_participant(user_id) {
            return Err(DomainError::ParticipantNotFound(user_id).into());
        }

        self.ctx
            .conversation_repo()
            .remove_participant(group_id, user_id)
            .await?;

        info!(group_id = %group_id, user_id = %user_id, "Member removed");

        Ok(())
    }

    /// Rename a group
    #[instrument(skip(self))]
    pub async fn rename(
        &self,
        group_id: ConversationId,
        name: &str,
        acting_user: UserId,
    ) -> ServiceResult<()> {
        if name.trim().is_empty() {
            return Err(DomainError::EmptyGroupName.into());
        }

        let conversation = self.resolve_group(group_id).await?;
        access::require_participant(&conversation, acting_user)?;

        self.ctx.conversation_repo().rename_group(group_id, name).await?;

        info!(group_id = %group_id, name = %name, "Group renamed");

        Ok(())
    }

    /// Store a group photo and record its reference
    #[instrument(skip(self, photo))]
    pub async fn set_photo(
        &self,
        group_id: ConversationId,
        photo: &[u8],
        acting_user: UserId,
    ) -> ServiceResult<String> {
        let conversation = self.resolve_group(group_id).await?;
        access::require_participant(&conversation, acting_user)?;

        let reference = self.ctx.blob_store().store(photo).await?;
        self.ctx
            .conversation_repo()
            .set_group_photo(group_id, &reference)
            .await?;

        info!(group_id = %group_id, reference = %reference, "Group photo updated");

        Ok(reference)
    }

    /// Resolve a user id or fail with not found
    async fn resolve_user(&self, user_id: UserId) -> ServiceResult<()> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))?;
        Ok(())
    }

    /// Resolve a conversation id or fail with not found
    async fn resolve_conversation(&self, id: ConversationId) -> ServiceResult<Conversation> {
        self.ctx
            .conversation_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", id.to_string()))
    }

    /// Resolve a conversation that must be a group
    async fn resolve_group(&self, id: ConversationId) -> ServiceResult<Conversation> {
        let conversation = self.resolve_conversation(id).await?;
        if !conversation.is_group() {
            return Err(DomainError::NotAGroup(id).into());
        }
        Ok(conversation)
    }
}
