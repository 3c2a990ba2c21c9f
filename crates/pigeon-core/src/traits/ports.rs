//! Collaborator ports - define the interface for data and blob access
//!
//! The domain layer defines what it needs from the persistence and blob
//! collaborators; the infrastructure layer provides the implementations.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::entities::{Conversation, DeliveryStatus, Message, Reaction, User};
use crate::error::DomainError;
use crate::value_objects::{ConversationId, MessageId, UserId};

/// Result type for collaborator operations
pub type RepoResult<T> = Result<T, DomainError>;

// ============================================================================
// User Repository
// ============================================================================

#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Create a user with the given name, or return the existing user if
    /// the name is already registered (login semantics)
    async fn create(&self, name: &str) -> RepoResult<User>;

    /// Find user by ID
    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>>;

    /// Find user by display name
    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>>;

    /// Update the display name; fails with `UsernameTaken` on duplicates
    async fn update_name(&self, id: UserId, name: &str) -> RepoResult<()>;

    /// Update the photo reference
    async fn update_photo(&self, id: UserId, photo: &str) -> RepoResult<()>;

    /// List all users
    async fn list_all(&self) -> RepoResult<Vec<User>>;
}

// ============================================================================
// Conversation Repository
// ============================================================================

#[async_trait]
pub trait ConversationRepository: Send + Sync {
    /// Atomically find or create the direct conversation between two users
    ///
    /// Concurrent identical calls must converge on one conversation; the
    /// implementation owns the uniqueness of the unordered user pair.
    async fn create_direct(&self, user_a: UserId, user_b: UserId) -> RepoResult<Conversation>;

    /// Create a group conversation with the given members
    async fn create_group(&self, name: &str, participant_ids: &[UserId])
        -> RepoResult<Conversation>;

    /// Find a conversation by ID, hydrated with participants and its last message
    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>>;

    /// List a user's conversations, most recently active first
    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<Conversation>>;

    /// Add a member; fails with `AlreadyParticipant` on duplicates
    async fn add_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()>;

    /// Remove a member; fails with `ParticipantNotFound` if absent
    async fn remove_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()>;

    /// Rename a group conversation
    async fn rename_group(&self, id: ConversationId, name: &str) -> RepoResult<()>;

    /// Set a group conversation's photo reference
    async fn set_group_photo(&self, id: ConversationId, photo: &str) -> RepoResult<()>;

    /// Move a conversation to the top of the recency ordering
    async fn bump_recency(&self, id: ConversationId, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Message Repository
// ============================================================================

#[async_trait]
pub trait MessageRepository: Send + Sync {
    /// Persist a new message
    async fn create(&self, message: &Message) -> RepoResult<()>;

    /// Find a message by ID
    ///
    /// Soft-deleted messages are still returned here; only listings mask them.
    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>>;

    /// List a conversation's messages, timestamp ascending, excluding
    /// soft-deleted ones
    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> RepoResult<Vec<Message>>;

    /// Overwrite message content (edit)
    async fn update_content(&self, id: MessageId, content: &str) -> RepoResult<()>;

    /// Set the delivery status
    async fn update_status(&self, id: MessageId, status: DeliveryStatus) -> RepoResult<()>;

    /// Set the deletion marker; a no-op if the message is already deleted
    async fn soft_delete(&self, id: MessageId, at: DateTime<Utc>) -> RepoResult<()>;
}

// ============================================================================
// Reaction Repository
// ============================================================================

#[async_trait]
pub trait ReactionRepository: Send + Sync {
    /// Insert the reaction, or replace the emoji if the (message, user)
    /// pair already has one
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()>;

    /// Remove a user's reaction; fails with `ReactionNotFound` if absent
    async fn remove(&self, message_id: MessageId, user_id: UserId) -> RepoResult<()>;

    /// Find a user's reaction on a message
    async fn find(&self, message_id: MessageId, user_id: UserId) -> RepoResult<Option<Reaction>>;

    /// List all reactions on a message
    async fn list_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Reaction>>;
}

// ============================================================================
// Blob Store
// ============================================================================

/// Durable store for opaque byte blobs (user, group, and message photos)
///
/// The core assumes nothing about the bytes; format and size validation
/// happen upstream.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Store the bytes and return a stable reference to them
    async fn store(&self, data: &[u8]) -> RepoResult<String>;
}
