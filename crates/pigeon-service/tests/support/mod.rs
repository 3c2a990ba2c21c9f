//! In-memory implementations of the collaborator ports for service tests.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;
use uuid::Uuid;

use pigeon_core::entities::{Conversation, DeliveryStatus, Message, Reaction, User};
use pigeon_core::error::DomainError;
use pigeon_core::traits::{
    BlobStore, ConversationRepository, MessageRepository, ReactionRepository, RepoResult,
    UserRepository,
};
use pigeon_core::value_objects::{ConversationId, MessageId, UserId};
use pigeon_service::ServiceContext;

/// One shared in-memory backend standing in for the persistence and blob
/// collaborators.
#[derive(Default)]
pub struct MemoryBackend {
    users: Mutex<Vec<User>>,
    conversations: Mutex<Vec<Conversation>>,
    messages: Mutex<Vec<Message>>,
    reactions: Mutex<Vec<Reaction>>,
    recency: Mutex<HashMap<ConversationId, DateTime<Utc>>>,
    blobs: Mutex<HashMap<String, Vec<u8>>>,
}

impl MemoryBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn user_snapshot(&self, user_id: UserId) -> RepoResult<pigeon_core::entities::Participant> {
        self.users
            .lock()
            .iter()
            .find(|u| u.id == user_id)
            .map(User::snapshot)
            .ok_or(DomainError::UserNotFound(user_id))
    }

    /// Raw message access for assertions
    pub fn stored_message(&self, id: MessageId) -> Option<Message> {
        self.messages.lock().iter().find(|m| m.id == id).cloned()
    }

    /// Raw blob access for assertions
    pub fn stored_blob(&self, reference: &str) -> Option<Vec<u8>> {
        self.blobs.lock().get(reference).cloned()
    }
}

#[async_trait]
impl UserRepository for MemoryBackend {
    async fn create(&self, name: &str) -> RepoResult<User> {
        let mut users = self.users.lock();
        if let Some(existing) = users.iter().find(|u| u.name == name) {
            return Ok(existing.clone());
        }
        let user = User::new(UserId::generate(), name.to_string());
        users.push(user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: UserId) -> RepoResult<Option<User>> {
        Ok(self.users.lock().iter().find(|u| u.id == id).cloned())
    }

    async fn find_by_name(&self, name: &str) -> RepoResult<Option<User>> {
        Ok(self.users.lock().iter().find(|u| u.name == name).cloned())
    }

    async fn update_name(&self, id: UserId, name: &str) -> RepoResult<()> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.name == name && u.id != id) {
            return Err(DomainError::UsernameTaken(name.to_string()));
        }
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.set_name(name.to_string());
        Ok(())
    }

    async fn update_photo(&self, id: UserId, photo: &str) -> RepoResult<()> {
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.id == id)
            .ok_or(DomainError::UserNotFound(id))?;
        user.set_photo(Some(photo.to_string()));
        Ok(())
    }

    async fn list_all(&self) -> RepoResult<Vec<User>> {
        let mut users = self.users.lock().clone();
        users.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(users)
    }
}

#[async_trait]
impl ConversationRepository for MemoryBackend {
    async fn create_direct(&self, user_a: UserId, user_b: UserId) -> RepoResult<Conversation> {
        {
            let conversations = self.conversations.lock();
            if let Some(existing) = conversations.iter().find(|c| {
                c.is_direct() && c.has_participant(user_a) && c.has_participant(user_b)
            }) {
                return Ok(existing.clone());
            }
        }

        let conversation = Conversation::new_direct(
            ConversationId::generate(),
            self.user_snapshot(user_a)?,
            self.user_snapshot(user_b)?,
        );
        self.recency.lock().insert(conversation.id, Utc::now());
        self.conversations.lock().push(conversation.clone());
        Ok(conversation)
    }

    async fn create_group(
        &self,
        name: &str,
        participant_ids: &[UserId],
    ) -> RepoResult<Conversation> {
        let mut participants = Vec::with_capacity(participant_ids.len());
        for &id in participant_ids {
            participants.push(self.user_snapshot(id)?);
        }
        let conversation =
            Conversation::new_group(ConversationId::generate(), name.to_string(), participants);
        self.recency.lock().insert(conversation.id, Utc::now());
        self.conversations.lock().push(conversation.clone());
        Ok(conversation)
    }

    async fn find_by_id(&self, id: ConversationId) -> RepoResult<Option<Conversation>> {
        Ok(self
            .conversations
            .lock()
            .iter()
            .find(|c| c.id == id)
            .cloned())
    }

    async fn list_by_user(&self, user_id: UserId) -> RepoResult<Vec<Conversation>> {
        let recency = self.recency.lock();
        let mut result: Vec<Conversation> = self
            .conversations
            .lock()
            .iter()
            .filter(|c| c.has_participant(user_id))
            .cloned()
            .collect();
        result.sort_by_key(|c| {
            std::cmp::Reverse(recency.get(&c.id).copied().unwrap_or(DateTime::<Utc>::MIN_UTC))
        });
        Ok(result)
    }

    async fn add_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()> {
        let snapshot = self.user_snapshot(user_id)?;
        let mut conversations = self.conversations.lock();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;
        if conversation.has_participant(user_id) {
            return Err(DomainError::AlreadyParticipant(user_id));
        }
        conversation.participants.push(snapshot);
        Ok(())
    }

    async fn remove_participant(
        &self,
        conversation_id: ConversationId,
        user_id: UserId,
    ) -> RepoResult<()> {
        let mut conversations = self.conversations.lock();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == conversation_id)
            .ok_or(DomainError::ConversationNotFound(conversation_id))?;
        let before = conversation.participants.len();
        conversation.participants.retain(|p| p.user_id != user_id);
        if conversation.participants.len() == before {
            return Err(DomainError::ParticipantNotFound(user_id));
        }
        Ok(())
    }

    async fn rename_group(&self, id: ConversationId, name: &str) -> RepoResult<()> {
        let mut conversations = self.conversations.lock();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id && c.is_group())
            .ok_or(DomainError::ConversationNotFound(id))?;
        conversation.name = Some(name.to_string());
        Ok(())
    }

    async fn set_group_photo(&self, id: ConversationId, photo: &str) -> RepoResult<()> {
        let mut conversations = self.conversations.lock();
        let conversation = conversations
            .iter_mut()
            .find(|c| c.id == id && c.is_group())
            .ok_or(DomainError::ConversationNotFound(id))?;
        conversation.photo = Some(photo.to_string());
        Ok(())
    }

    async fn bump_recency(&self, id: ConversationId, at: DateTime<Utc>) -> RepoResult<()> {
        self.recency.lock().insert(id, at);
        Ok(())
    }
}

#[async_trait]
impl MessageRepository for MemoryBackend {
    async fn create(&self, message: &Message) -> RepoResult<()> {
        self.messages.lock().push(message.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: MessageId) -> RepoResult<Option<Message>> {
        Ok(self.messages.lock().iter().find(|m| m.id == id).cloned())
    }

    async fn list_by_conversation(
        &self,
        conversation_id: ConversationId,
    ) -> RepoResult<Vec<Message>> {
        let mut result: Vec<Message> = self
            .messages
            .lock()
            .iter()
            .filter(|m| m.conversation_id == conversation_id && !m.is_deleted())
            .cloned()
            .collect();
        result.sort_by_key(|m| m.sent_at);
        Ok(result)
    }

    async fn update_content(&self, id: MessageId, content: &str) -> RepoResult<()> {
        let mut messages = self.messages.lock();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id && !m.is_deleted())
            .ok_or(DomainError::MessageNotFound(id))?;
        message.edit(content.to_string());
        Ok(())
    }

    async fn update_status(&self, id: MessageId, status: DeliveryStatus) -> RepoResult<()> {
        let mut messages = self.messages.lock();
        let message = messages
            .iter_mut()
            .find(|m| m.id == id)
            .ok_or(DomainError::MessageNotFound(id))?;
        message.status = status;
        Ok(())
    }

    async fn soft_delete(&self, id: MessageId, at: DateTime<Utc>) -> RepoResult<()> {
        if let Some(message) = self.messages.lock().iter_mut().find(|m| m.id == id) {
            message.mark_deleted(at);
        }
        Ok(())
    }
}

#[async_trait]
impl ReactionRepository for MemoryBackend {
    async fn upsert(&self, reaction: &Reaction) -> RepoResult<()> {
        let mut reactions = self.reactions.lock();
        if let Some(existing) = reactions
            .iter_mut()
            .find(|r| r.message_id == reaction.message_id && r.user_id == reaction.user_id)
        {
            existing.emoji = reaction.emoji.clone();
        } else {
            reactions.push(reaction.clone());
        }
        Ok(())
    }

    async fn remove(&self, message_id: MessageId, user_id: UserId) -> RepoResult<()> {
        let mut reactions = self.reactions.lock();
        let before = reactions.len();
        reactions.retain(|r| !(r.message_id == message_id && r.user_id == user_id));
        if reactions.len() == before {
            return Err(DomainError::ReactionNotFound {
                message_id,
                user_id,
            });
        }
        Ok(())
    }

    async fn find(&self, message_id: MessageId, user_id: UserId) -> RepoResult<Option<Reaction>> {
        Ok(self
            .reactions
            .lock()
            .iter()
            .find(|r| r.message_id == message_id && r.user_id == user_id)
            .cloned())
    }

    async fn list_by_message(&self, message_id: MessageId) -> RepoResult<Vec<Reaction>> {
        Ok(self
            .reactions
            .lock()
            .iter()
            .filter(|r| r.message_id == message_id)
            .cloned()
            .collect())
    }
}

#[async_trait]
impl BlobStore for MemoryBackend {
    async fn store(&self, data: &[u8]) -> RepoResult<String> {
        let reference = format!("blobs/{}", Uuid::new_v4());
        self.blobs.lock().insert(reference.clone(), data.to_vec());
        Ok(reference)
    }
}

/// Build a service context over a fresh in-memory backend
///
/// The delivery delay is long enough that the background advance never
/// fires inside a test.
pub fn test_context() -> (ServiceContext, Arc<MemoryBackend>) {
    let backend = MemoryBackend::new();
    let ctx = ServiceContext::new(
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        backend.clone(),
        Duration::from_secs(600),
    );
    (ctx, backend)
}
