//! Message service
//!
//! Handles the message lifecycle: send, edit, soft delete, forwarding,
//! delivery-status progression, and history reads.

use chrono::Utc;
use pigeon_core::entities::{Conversation, DeliveryStatus, Message, MessageKind, User};
use pigeon_core::error::DomainError;
use pigeon_core::value_objects::{ConversationId, MessageId, UserId};
use tracing::{info, instrument};

use super::access;
use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Message service
pub struct MessageService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> MessageService<'a> {
    /// Create a new MessageService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Send a text message
    ///
    /// `reply_to` is stored as given; the referenced message is not
    /// resolved here.
    #[instrument(skip(self, content))]
    pub async fn send(
        &self,
        sender_id: UserId,
        conversation_id: ConversationId,
        content: String,
        reply_to: Option<MessageId>,
    ) -> ServiceResult<Message> {
        self.deliver(sender_id, conversation_id, content, MessageKind::Text, reply_to)
            .await
    }

    /// Send a photo message
    ///
    /// The bytes go to the blob store first; the message carries the
    /// returned reference as its content.
    #[instrument(skip(self, photo))]
    pub async fn send_photo(
        &self,
        sender_id: UserId,
        conversation_id: ConversationId,
        photo: &[u8],
        reply_to: Option<MessageId>,
    ) -> ServiceResult<Message> {
        let reference = self.ctx.blob_store().store(photo).await?;
        self.deliver(
            sender_id,
            conversation_id,
            reference,
            MessageKind::Photo,
            reply_to,
        )
        .await
    }

    /// Forward a message into another conversation
    ///
    /// Creates a fresh message in the target copying content and kind; the
    /// original is untouched.
    #[instrument(skip(self))]
    pub async fn forward(
        &self,
        acting_user: UserId,
        message_id: MessageId,
        target_conversation_id: ConversationId,
    ) -> ServiceResult<Message> {
        let original = self.resolve_message(message_id).await?;
        if original.is_deleted() {
            return Err(DomainError::MessageDeleted(message_id).into());
        }

        let sender = self.resolve_user(acting_user).await?;
        let target = self.resolve_conversation(target_conversation_id).await?;
        access::require_participant(&target, acting_user)?;

        let forwarded = original.forward_to(
            MessageId::generate(),
            target_conversation_id,
            sender.snapshot(),
        );

        self.ctx.message_repo().create(&forwarded).await?;
        self.ctx
            .conversation_repo()
            .bump_recency(target_conversation_id, forwarded.sent_at)
            .await?;
        self.ctx.schedule_received(forwarded.id);

        info!(
            message_id = %message_id,
            forwarded_id = %forwarded.id,
            target = %target_conversation_id,
            "Message forwarded"
        );

        Ok(forwarded)
    }

    /// Edit a message's content in place
    ///
    /// Sender-only. Status, timestamp, and deletion state stay untouched.
    #[instrument(skip(self, content))]
    pub async fn edit(
        &self,
        acting_user: UserId,
        message_id: MessageId,
        content: String,
    ) -> ServiceResult<Message> {
        let mut message = self.resolve_message(message_id).await?;
        if message.is_deleted() {
            return Err(DomainError::MessageDeleted(message_id).into());
        }
        access::require_sender(&message, acting_user)?;

        self.ctx
            .message_repo()
            .update_content(message_id, &content)
            .await?;
        message.edit(content);

        info!(message_id = %message_id, "Message edited");

        Ok(message)
    }

    /// Soft delete a message
    ///
    /// Sender-only. The row persists and stays retrievable by id; a second
    /// delete is a no-op that keeps the original deletion timestamp.
    #[instrument(skip(self))]
    pub async fn soft_delete(
        &self,
        acting_user: UserId,
        message_id: MessageId,
    ) -> ServiceResult<()> {
        let message = self.resolve_message(message_id).await?;
        access::require_sender(&message, acting_user)?;

        if message.is_deleted() {
            return Ok(());
        }

        self.ctx
            .message_repo()
            .soft_delete(message_id, Utc::now())
            .await?;

        info!(message_id = %message_id, "Message deleted");

        Ok(())
    }

    /// Mark a message as received
    #[instrument(skip(self))]
    pub async fn mark_received(&self, message_id: MessageId) -> ServiceResult<()> {
        self.advance_status(message_id, DeliveryStatus::Received).await
    }

    /// Mark a message as read
    #[instrument(skip(self))]
    pub async fn mark_read(&self, message_id: MessageId) -> ServiceResult<()> {
        self.advance_status(message_id, DeliveryStatus::Read).await
    }

    /// List a conversation's messages, oldest first, reactions included
    #[instrument(skip(self))]
    pub async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> ServiceResult<Vec<Message>> {
        self.resolve_conversation(conversation_id).await?;

        let mut messages = self
            .ctx
            .message_repo()
            .list_by_conversation(conversation_id)
            .await?;

        for message in &mut messages {
            message.reactions = self.ctx.reaction_repo().list_by_message(message.id).await?;
        }

        Ok(messages)
    }

    /// Shared path of send and send_photo
    async fn deliver(
        &self,
        sender_id: UserId,
        conversation_id: ConversationId,
        content: String,
        kind: MessageKind,
        reply_to: Option<MessageId>,
    ) -> ServiceResult<Message> {
        let sender = self.resolve_user(sender_id).await?;
        let conversation = self.resolve_conversation(conversation_id).await?;
        access::require_participant(&conversation, sender_id)?;

        let message = match reply_to {
            Some(reply_to) => Message::new_reply(
                MessageId::generate(),
                conversation_id,
                sender.snapshot(),
                content,
                kind,
                reply_to,
            ),
            None => Message::new(
                MessageId::generate(),
                conversation_id,
                sender.snapshot(),
                content,
                kind,
            ),
        };

        self.ctx.message_repo().create(&message).await?;
        self.ctx
            .conversation_repo()
            .bump_recency(conversation_id, message.sent_at)
            .await?;

        // Best-effort background advance to Received; never blocks the
        // sender and its failure stays out of this result.
        self.ctx.schedule_received(message.id);

        info!(
            message_id = %message.id,
            conversation_id = %conversation_id,
            kind = kind.as_str(),
            "Message sent"
        );

        Ok(message)
    }

    /// Move a message's status forward; regressions are rejected
    async fn advance_status(
        &self,
        message_id: MessageId,
        status: DeliveryStatus,
    ) -> ServiceResult<()> {
        let message = self.resolve_message(message_id).await?;

        if message.status == status {
            return Ok(());
        }
        if !message.status.can_advance_to(status) {
            return Err(DomainError::StatusRegression {
                from: message.status,
                to: status,
            }
            .into());
        }

        self.ctx
            .message_repo()
            .update_status(message_id, status)
            .await?;

        Ok(())
    }

    async fn resolve_user(&self, user_id: UserId) -> ServiceResult<User> {
        self.ctx
            .user_repo()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| ServiceError::not_found("User", user_id.to_string()))
    }

    async fn resolve_conversation(&self, id: ConversationId) -> ServiceResult<Conversation> {
        self.ctx
            .conversation_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Conversation", id.to_string()))
    }

    async fn resolve_message(&self, id: MessageId) -> ServiceResult<Message> {
        self.ctx
            .message_repo()
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found("Message", id.to_string()))
    }
}
